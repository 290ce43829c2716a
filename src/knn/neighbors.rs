//! Brute-force neighbor search: every training instance is scored against the query.

use num_traits::{AsPrimitive, Float};
use ordered_float::OrderedFloat;

use super::Metric;
use crate::common_types::{FeatureVector, Neighbor};
use crate::error::{KnnError, Result};

/// Returns the `k` training instances closest to `query`, nearest first.
///
/// Distances are computed over `query.len()` components, so `query` holds features only.
/// The sort is stable: instances at equal distance keep their training-set order.
///
/// # Errors
/// - `EmptyTrainingSet` if `training` is empty.
/// - `InvalidK` unless `1 <= k <= training.len()`; `k` is never clamped.
/// - `DimensionMismatch` if a training instance has fewer features than the query.
pub fn get_neighbors<'a, F, L>(
    training: &'a [FeatureVector<F, L>],
    query: &[F],
    k: usize,
    metric: Metric,
) -> Result<Vec<Neighbor<'a, F, L>>>
where
    F: Float + AsPrimitive<f64>,
{
    if training.is_empty() {
        return Err(KnnError::EmptyTrainingSet);
    }
    if k == 0 || k > training.len() {
        return Err(KnnError::InvalidK { k, training_size: training.len() });
    }

    let length = query.len();
    let mut distances = training
        .iter()
        .map(|point| -> Result<Neighbor<'a, F, L>> {
            let distance = metric.distance(query, &point.features, length)?;
            Ok(Neighbor { point, distance })
        })
        .collect::<Result<Vec<_>>>()?;

    // slice::sort_by_key is stable
    distances.sort_by_key(|n| OrderedFloat(n.distance));
    distances.truncate(k);
    Ok(distances)
}
