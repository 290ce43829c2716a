//! This module contains the data structures shared by the loader, the classifier and the scorer.

use serde::{Deserialize, Serialize};

/// A single observation: its feature values and its class label.
///
/// - `F`: The type of the features (e.g., `f64`, `f32`).
/// - `L`: The type of the label (e.g., `String`, `&str`, an enum).
///
/// The label lives in its own field, so every "length" in this crate counts features only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector<F, L> {
    pub features: Vec<F>,
    pub label: L,
}

impl<F, L> FeatureVector<F, L> {
    pub fn new(features: Vec<F>, label: L) -> Self {
        FeatureVector { features, label }
    }

    /// Number of features, i.e. the dimensionality D of this vector.
    pub fn dimension(&self) -> usize {
        self.features.len()
    }
}

/// An ordered sequence of feature vectors (a training or test partition).
pub type Dataset<F, L> = Vec<FeatureVector<F, L>>;

/// One entry of a neighbor set: a borrowed training instance and its distance to the query.
#[derive(Debug, Clone, Copy)]
pub struct Neighbor<'a, F, L> {
    pub point: &'a FeatureVector<F, L>,
    pub distance: f64,
}

impl<'a, F, L> Neighbor<'a, F, L> {
    pub fn label(&self) -> &'a L {
        &self.point.label
    }
}

/// The classifier's answer for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction<L> {
    pub label: L,
    /// Share of the k neighbors that voted for `label`, in `(0, 1]`.
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_excludes_label() {
        let fv = FeatureVector::new(vec![5.1, 3.5, 1.4, 0.2], "Iris-setosa");
        assert_eq!(fv.dimension(), 4);
    }

    #[test]
    fn neighbor_label_borrows_from_point() {
        let fv = FeatureVector::new(vec![0.0], String::from("A"));
        let n = Neighbor { point: &fv, distance: 0.0 };
        assert_eq!(n.label(), "A");
    }
}
