//! Error types for loading, classifying and scoring.

use thiserror::Error;

/// Every failure the crate can surface. None of them is retried.
#[derive(Debug, Error)]
pub enum KnnError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// A feature field is not a number.
    #[error("row {row}: column {column} is not a number: {value:?}")]
    Parse {
        row: usize,
        column: usize,
        value: String,
    },

    /// A record that cannot be turned into a feature vector.
    #[error("row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("k must satisfy 1 <= k <= {training_size}, got {k}")]
    InvalidK { k: usize, training_size: usize },

    #[error("vector has {actual} components, {expected} required")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("test set is empty")]
    EmptyTestSet,

    #[error("cannot take a majority vote over an empty neighbor set")]
    EmptyNeighborSet,

    #[error("expected {expected} predictions, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, KnnError>;
