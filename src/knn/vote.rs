//! Voting over a neighbor set: plain majority or inverse-distance weighted.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::common_types::Neighbor;
use crate::error::{KnnError, Result};

/// Added to every distance before inverting it, so an exact match does not divide by zero.
pub const DISTANCE_EPSILON: f64 = 1.0e-12;

/// How much each neighbor's vote counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voting {
    /// One vote per neighbor. The reference rule.
    #[default]
    Majority,
    /// Each neighbor votes `1 / (distance + DISTANCE_EPSILON)`.
    Distance,
}

impl Voting {
    pub fn weight(&self, distance: f64) -> f64 {
        match self {
            Voting::Majority => 1.0,
            Voting::Distance => 1.0 / (distance + DISTANCE_EPSILON),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Vote<L> {
    label: L,
    weight: f64,
    best_distance: f64,
}

/// Per-label vote weights in first-seen order.
///
/// Labels are stored in a `Vec` rather than a hash map: the label domain of a
/// neighbor set is tiny and insertion order decides majority ties.
///
/// Ranking is by weight, highest first. Under [`Voting::Majority`] equal weights keep
/// first-seen order. Under [`Voting::Distance`] equal weights go to the label with the
/// closest single neighbor, then to the lesser label.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteTally<L> {
    voting: Voting,
    votes: Vec<Vote<L>>,
}

impl<L> Default for VoteTally<L> {
    fn default() -> Self {
        Self { voting: Voting::default(), votes: Vec::new() }
    }
}

impl<L: Clone + PartialOrd> VoteTally<L> {
    pub fn new(voting: Voting) -> Self {
        Self { voting, votes: Vec::new() }
    }

    /// Tallies the label of every neighbor, in slice order.
    pub fn from_neighbors<F>(neighbors: &[Neighbor<'_, F, L>], voting: Voting) -> Self {
        let mut tally = Self::new(voting);
        for neighbor in neighbors {
            tally.record(neighbor.label(), neighbor.distance);
        }
        tally
    }

    /// Counts one neighbor at `distance`, weighted by this tally's voting rule.
    pub fn record(&mut self, label: &L, distance: f64) {
        let weight = self.voting.weight(distance);
        self.record_weighted(label, weight, distance);
    }

    pub fn record_weighted(&mut self, label: &L, weight: f64, distance: f64) {
        match self.votes.iter_mut().find(|v| v.label == *label) {
            Some(vote) => {
                vote.weight += weight;
                vote.best_distance = vote.best_distance.min(distance);
            }
            None => self.votes.push(Vote { label: label.clone(), weight, best_distance: distance }),
        }
    }

    pub fn voting(&self) -> Voting {
        self.voting
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    /// Total weight cast. Under majority voting this is the number of votes.
    pub fn total(&self) -> f64 {
        self.votes.iter().map(|v| v.weight).sum()
    }

    /// Labels with their weights, winner first.
    pub fn ranked(&self) -> Vec<(&L, f64)> {
        let mut ranked: Vec<&Vote<L>> = self.votes.iter().collect();
        // sort_by is stable, so majority ties keep first-seen order
        ranked.sort_by(|a, b| {
            let by_weight = b.weight.total_cmp(&a.weight);
            match self.voting {
                Voting::Majority => by_weight,
                Voting::Distance => by_weight
                    .then(a.best_distance.total_cmp(&b.best_distance))
                    .then_with(|| a.label.partial_cmp(&b.label).unwrap_or(Ordering::Equal)),
            }
        });
        ranked.into_iter().map(|v| (&v.label, v.weight)).collect()
    }

    /// The winning label and its weight: the head of [`VoteTally::ranked`].
    pub fn majority(&self) -> Option<(&L, f64)> {
        self.ranked().into_iter().next()
    }

    /// Share of the total weight held by the winning label.
    pub fn confidence(&self) -> Option<f64> {
        let (_, top) = self.majority()?;
        Some(top / self.total())
    }
}

/// Returns the most frequent label among `neighbors`.
///
/// When several labels share the highest count, the one seen first wins. Neighbor sets
/// come out of [`super::get_neighbors`] nearest first, so that is the tied label whose
/// first vote came from the closest neighbor.
///
/// # Errors
/// `EmptyNeighborSet` if `neighbors` is empty.
pub fn get_response<F, L: Clone + PartialOrd>(neighbors: &[Neighbor<'_, F, L>]) -> Result<L> {
    get_weighted_response(neighbors, Voting::Majority)
}

/// [`get_response`] under an explicit voting rule.
pub fn get_weighted_response<F, L: Clone + PartialOrd>(
    neighbors: &[Neighbor<'_, F, L>],
    voting: Voting,
) -> Result<L> {
    VoteTally::from_neighbors(neighbors, voting)
        .majority()
        .map(|(label, _)| label.clone())
        .ok_or(KnnError::EmptyNeighborSet)
}
