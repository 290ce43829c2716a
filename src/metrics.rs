//! Scoring predictions against the true labels of a test set.

use crate::common_types::FeatureVector;
use crate::error::{KnnError, Result};

/// Percentage (0 to 100) of positions where `predictions[i]` equals `test[i].label`.
///
/// # Errors
/// - `EmptyTestSet` if `test` is empty, instead of dividing by zero.
/// - `LengthMismatch` if the two sequences are not the same length.
pub fn get_accuracy<F, L: PartialEq>(test: &[FeatureVector<F, L>], predictions: &[L]) -> Result<f64> {
    if test.is_empty() {
        return Err(KnnError::EmptyTestSet);
    }
    if predictions.len() != test.len() {
        return Err(KnnError::LengthMismatch { expected: test.len(), actual: predictions.len() });
    }
    let correct = test
        .iter()
        .zip(predictions)
        .filter(|(instance, predicted)| instance.label == **predicted)
        .count();
    Ok(correct as f64 / test.len() as f64 * 100.0)
}
