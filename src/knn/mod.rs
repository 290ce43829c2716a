//! Brute-force k-nearest-neighbors: distance metrics, neighbor search, voting
//! and a classifier tying them together.

use num_traits::{AsPrimitive, Float};
use serde::{Deserialize, Serialize};

use crate::error::{KnnError, Result};

pub mod classifier;
pub mod neighbors;
pub mod vote;

/// Distance metric used to rank training instances against a query.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Metric {
    /// Straight-line distance. The reference metric.
    #[default]
    Euclidean,
    Manhattan,
    Minkowski { p: f64 }, // p is the order; p = 2 matches Euclidean up to rounding
}

impl Metric {
    /// Checks that the metric's parameters describe an actual metric.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Metric::Minkowski { p } if !(p.is_finite() && p >= 1.0) => Err(KnnError::InvalidConfig(
                format!("Minkowski order must be a finite number >= 1, got {p}"),
            )),
            _ => Ok(()),
        }
    }

    /// Distance between the first `length` components of `a` and `b`.
    pub fn distance<F>(&self, a: &[F], b: &[F], length: usize) -> Result<f64>
    where
        F: Float + AsPrimitive<f64>,
    {
        match *self {
            Metric::Euclidean => euclidean_distance(a, b, length),
            Metric::Manhattan => manhattan_distance(a, b, length),
            Metric::Minkowski { p } => minkowski_distance(a, b, length, p),
        }
    }
}

/// Returns the leading `length` components of both slices, or the dimension error
/// for whichever one is too short.
fn prefixes<'a, F>(a: &'a [F], b: &'a [F], length: usize) -> Result<(&'a [F], &'a [F])> {
    for v in [a, b] {
        if v.len() < length {
            return Err(KnnError::DimensionMismatch { expected: length, actual: v.len() });
        }
    }
    Ok((&a[..length], &b[..length]))
}

/// Euclidean distance over the first `length` components: the square root of the
/// summed squared differences. No normalization or weighting is applied.
///
/// # Errors
/// `KnnError::DimensionMismatch` if either vector has fewer than `length` components.
pub fn euclidean_distance<F>(a: &[F], b: &[F], length: usize) -> Result<f64>
where
    F: Float + AsPrimitive<f64>,
{
    let (a, b) = prefixes(a, b, length)?;
    let sum_sq_diff: f64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| {
            let diff: f64 = (x - y).as_();
            diff * diff
        })
        .sum();
    Ok(sum_sq_diff.sqrt())
}

pub fn manhattan_distance<F>(a: &[F], b: &[F], length: usize) -> Result<f64>
where
    F: Float + AsPrimitive<f64>,
{
    let (a, b) = prefixes(a, b, length)?;
    Ok(a.iter().zip(b).map(|(&x, &y)| -> f64 { (x - y).abs().as_() }).sum())
}

pub fn minkowski_distance<F>(a: &[F], b: &[F], length: usize, p: f64) -> Result<f64>
where
    F: Float + AsPrimitive<f64>,
{
    let (a, b) = prefixes(a, b, length)?;
    let sum_of_powers: f64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| {
            let diff: f64 = (x - y).abs().as_();
            diff.powf(p)
        })
        .sum();
    Ok(sum_of_powers.powf(1.0 / p))
}

pub use classifier::KnnClassifier;
pub use neighbors::get_neighbors;
pub use vote::{get_response, get_weighted_response, VoteTally, Voting};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_euclidean_distance_known_value() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 5.0, 6.0];
        let d = euclidean_distance(&a, &b, 3).unwrap();
        assert!((d - 27.0_f64.sqrt()).abs() < EPSILON, "expected sqrt(27), got {}", d);
    }

    #[test]
    fn test_distance_ignores_components_past_length() {
        // Trailing components differ wildly but are outside the compared prefix.
        let a = [0.0, 0.0, 100.0];
        let b = [3.0, 4.0, -100.0];
        assert_eq!(euclidean_distance(&a, &b, 2).unwrap(), 5.0);
    }

    #[test]
    fn test_distance_rejects_short_vectors() {
        let a = [1.0, 2.0];
        let b = [1.0, 2.0, 3.0, 4.0];
        let err = euclidean_distance(&a, &b, 4).unwrap_err();
        assert!(matches!(err, KnnError::DimensionMismatch { expected: 4, actual: 2 }));
        let err = euclidean_distance(&b, &a, 4).unwrap_err();
        assert!(matches!(err, KnnError::DimensionMismatch { expected: 4, actual: 2 }));
    }

    #[test]
    fn test_zero_length_distance_is_zero() {
        let empty: [f64; 0] = [];
        assert_eq!(euclidean_distance(&empty, &empty, 0).unwrap(), 0.0);
    }

    #[test]
    fn test_metric_dispatch() {
        let a = [1.0_f32, 2.0, 3.0];
        let b = [4.0_f32, 5.0, 6.0];
        assert!((Metric::Manhattan.distance(&a, &b, 3).unwrap() - 9.0).abs() < 1e-6);
        let d3 = Metric::Minkowski { p: 3.0 }.distance(&a, &b, 3).unwrap();
        assert!((d3 - 81.0_f64.cbrt()).abs() < 1e-6, "Minkowski p=3 failed, got {}", d3);
        let d2 = Metric::Minkowski { p: 2.0 }.distance(&a, &b, 3).unwrap();
        let e = Metric::Euclidean.distance(&a, &b, 3).unwrap();
        assert!((d2 - e).abs() < 1e-6);
    }

    #[test]
    fn test_minkowski_order_validation() {
        assert!(Metric::Minkowski { p: 0.5 }.validate().is_err());
        assert!(Metric::Minkowski { p: f64::NAN }.validate().is_err());
        assert!(Metric::Minkowski { p: 1.0 }.validate().is_ok());
        assert!(Metric::Euclidean.validate().is_ok());
    }

    fn vector(len: usize) -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(-1.0e3..1.0e3, len)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_distance_to_self_is_zero(a in vector(4)) {
            prop_assert_eq!(euclidean_distance(&a, &a, 4).unwrap(), 0.0);
        }

        #[test]
        fn prop_distance_is_symmetric(a in vector(4), b in vector(4), length in 0..=4usize) {
            let ab = euclidean_distance(&a, &b, length).unwrap();
            let ba = euclidean_distance(&b, &a, length).unwrap();
            prop_assert_eq!(ab, ba);
            prop_assert!(ab >= 0.0);
        }
    }
}
