//! The k-nearest-neighbors classifier.

use num_traits::{AsPrimitive, Float};
use rayon::prelude::*;

use super::{get_neighbors, Metric, VoteTally, Voting};
use crate::common_types::{FeatureVector, Neighbor, Prediction};
use crate::error::{KnnError, Result};

/// A lazy learner: the "model" is the borrowed training set itself.
///
/// Holds no mutable state, so one classifier can serve any number of queries,
/// including concurrently.
#[derive(Debug, Clone, Copy)]
pub struct KnnClassifier<'a, F, L> {
    training: &'a [FeatureVector<F, L>],
    k: usize,
    metric: Metric,
    voting: Voting,
}

impl<'a, F, L> KnnClassifier<'a, F, L>
where
    F: Float + AsPrimitive<f64> + Send + Sync,
    L: Clone + PartialOrd + Send + Sync,
{
    /// Wraps `training` after checking that `k` neighbors can always be found in it.
    ///
    /// # Errors
    /// `EmptyTrainingSet`, `InvalidK` (unless `1 <= k <= training.len()`), or
    /// `InvalidConfig` for a metric with bad parameters.
    pub fn new(training: &'a [FeatureVector<F, L>], k: usize, metric: Metric) -> Result<Self> {
        if training.is_empty() {
            return Err(KnnError::EmptyTrainingSet);
        }
        if k == 0 || k > training.len() {
            return Err(KnnError::InvalidK { k, training_size: training.len() });
        }
        metric.validate()?;
        Ok(Self { training, k, metric, voting: Voting::default() })
    }

    /// Sets how neighbor votes are weighted. Majority voting is the default.
    #[must_use]
    pub fn with_voting(mut self, voting: Voting) -> Self {
        self.voting = voting;
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn voting(&self) -> Voting {
        self.voting
    }

    pub fn training(&self) -> &'a [FeatureVector<F, L>] {
        self.training
    }

    /// The `k` training instances nearest to `query`, nearest first.
    pub fn neighbors(&self, query: &[F]) -> Result<Vec<Neighbor<'a, F, L>>> {
        get_neighbors(self.training, query, self.k, self.metric)
    }

    /// Classifies one query by a vote among its neighbors.
    pub fn predict(&self, query: &[F]) -> Result<Prediction<L>> {
        let neighbors = self.neighbors(query)?;
        let tally = VoteTally::from_neighbors(&neighbors, self.voting);
        let (label, weight) = tally.majority().ok_or(KnnError::EmptyNeighborSet)?;
        Ok(Prediction {
            label: label.clone(),
            confidence: weight / tally.total(),
        })
    }

    /// Classifies every instance of `test` by its features.
    ///
    /// Queries run in parallel; the result is aligned positionally with `test`.
    /// The first error encountered aborts the batch.
    pub fn predict_all(&self, test: &[FeatureVector<F, L>]) -> Result<Vec<Prediction<L>>> {
        test.par_iter().map(|instance| self.predict(&instance.features)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iris_like() -> Vec<FeatureVector<f64, String>> {
        vec![
            FeatureVector::new(vec![1.0, 1.0], "A".to_string()),
            FeatureVector::new(vec![1.0, 2.0], "A".to_string()),
            FeatureVector::new(vec![2.0, 1.0], "A".to_string()),
            FeatureVector::new(vec![5.0, 5.0], "B".to_string()),
            FeatureVector::new(vec![5.0, 6.0], "B".to_string()),
            FeatureVector::new(vec![6.0, 5.0], "B".to_string()),
        ]
    }

    #[test]
    fn test_predict_simple_case() {
        let training = iris_like();
        let classifier = KnnClassifier::new(&training, 3, Metric::Euclidean).unwrap();

        let a = classifier.predict(&[1.5, 1.5]).unwrap();
        assert_eq!(a.label, "A");
        assert_eq!(a.confidence, 1.0);

        let b = classifier.predict(&[5.5, 5.5]).unwrap();
        assert_eq!(b.label, "B");
    }

    #[test]
    fn test_end_to_end_k1() {
        let training = vec![
            FeatureVector::new(vec![0.0, 0.0, 0.0, 0.0], "A"),
            FeatureVector::new(vec![10.0, 10.0, 10.0, 10.0], "B"),
        ];
        let classifier = KnnClassifier::new(&training, 1, Metric::Euclidean).unwrap();
        let neighbors = classifier.neighbors(&[0.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(neighbors.len(), 1);
        assert_eq!(neighbors[0].point, &training[0]);
        assert_eq!(classifier.predict(&[0.0, 0.0, 0.0, 0.0]).unwrap().label, "A");
    }

    #[test]
    fn test_end_to_end_k2_tie_is_deterministic() {
        let training = vec![
            FeatureVector::new(vec![0.0, 0.0, 0.0, 0.0], "A"),
            FeatureVector::new(vec![10.0, 10.0, 10.0, 10.0], "B"),
        ];
        let classifier = KnnClassifier::new(&training, 2, Metric::Euclidean).unwrap();

        // One vote each: the nearer neighbor's label is tallied first and wins.
        let near_b = classifier.predict(&[9.0, 9.0, 9.0, 9.0]).unwrap();
        assert_eq!(near_b.label, "B");
        assert_eq!(near_b.confidence, 0.5);

        // Equidistant: the stable sort keeps training order, so "A" is first.
        let middle = classifier.predict(&[5.0, 5.0, 5.0, 5.0]).unwrap();
        assert_eq!(middle.label, "A");
    }

    #[test]
    fn test_distance_voting_changes_the_answer() {
        // Two "B"s outvote one "A" unless distance weighting is on.
        let training = vec![
            FeatureVector::new(vec![0.0], "A"),
            FeatureVector::new(vec![3.0], "B"),
            FeatureVector::new(vec![4.0], "B"),
        ];
        let majority = KnnClassifier::new(&training, 3, Metric::Euclidean).unwrap();
        assert_eq!(majority.voting(), Voting::Majority);
        assert_eq!(majority.predict(&[0.5]).unwrap().label, "B");

        let weighted = majority.with_voting(Voting::Distance);
        let prediction = weighted.predict(&[0.5]).unwrap();
        assert_eq!(prediction.label, "A");
        assert!(prediction.confidence > 0.5 && prediction.confidence <= 1.0);
    }

    #[test]
    fn test_new_rejects_oversized_k() {
        let training = iris_like();
        let err = KnnClassifier::new(&training, 7, Metric::Euclidean).unwrap_err();
        assert!(matches!(err, KnnError::InvalidK { k: 7, training_size: 6 }));
    }

    #[test]
    fn test_new_rejects_bad_metric() {
        let training = iris_like();
        assert!(KnnClassifier::new(&training, 1, Metric::Minkowski { p: 0.0 }).is_err());
    }

    #[test]
    fn test_predict_all_preserves_order() {
        let training = iris_like();
        let classifier = KnnClassifier::new(&training, 1, Metric::Manhattan).unwrap();
        let test: Vec<_> = (0..50)
            .map(|i| {
                let (x, label) = if i % 2 == 0 { (1.2, "A") } else { (5.2, "B") };
                FeatureVector::new(vec![x, x], label.to_string())
            })
            .collect();
        let predictions = classifier.predict_all(&test).unwrap();
        assert_eq!(predictions.len(), test.len());
        for (p, t) in predictions.iter().zip(&test) {
            assert_eq!(p.label, t.label);
        }
    }

    #[test]
    fn test_predict_all_surfaces_dimension_errors() {
        let training = iris_like();
        let classifier = KnnClassifier::new(&training, 1, Metric::Euclidean).unwrap();
        let test = vec![FeatureVector::new(vec![1.0, 1.0, 1.0], "A".to_string())];
        assert!(matches!(
            classifier.predict_all(&test),
            Err(KnnError::DimensionMismatch { expected: 3, actual: 2 })
        ));
    }
}
