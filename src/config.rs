//! Run parameters and their validation.

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::dataset::{validate_split, LoaderOptions, Partition, IRIS_FEATURE_COUNT};
use crate::error::{KnnError, Result};
use crate::knn::{Metric, Voting};

pub const DEFAULT_DATA_PATH: &str = "iris.data";
/// Probability that a row lands in the training set.
pub const DEFAULT_SPLIT: f64 = 0.67;
pub const DEFAULT_K: usize = 3;

/// Everything one classification run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub data_path: PathBuf,
    pub split: f64,
    pub k: usize,
    /// Seed for the train/test assignment. `None` draws one from the OS.
    pub seed: Option<u64>,
    pub metric: Metric,
    pub voting: Voting,
    pub feature_count: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            split: DEFAULT_SPLIT,
            k: DEFAULT_K,
            seed: None,
            metric: Metric::default(),
            voting: Voting::default(),
            feature_count: IRIS_FEATURE_COUNT,
        }
    }
}

impl RunConfig {
    /// Checks the parameters that can be judged before any data is read.
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(KnnError::InvalidConfig("k must be at least 1".into()));
        }
        if self.feature_count == 0 {
            return Err(KnnError::InvalidConfig("feature_count must be at least 1".into()));
        }
        validate_split(self.split)?;
        self.metric.validate()
    }

    /// Checks that a loaded partition can be classified and scored with this config.
    pub fn validate_partition(&self, partition: &Partition) -> Result<()> {
        if partition.training.is_empty() {
            return Err(KnnError::EmptyTrainingSet);
        }
        if partition.test.is_empty() {
            return Err(KnnError::EmptyTestSet);
        }
        if self.k > partition.training.len() {
            return Err(KnnError::InvalidK { k: self.k, training_size: partition.training.len() });
        }
        Ok(())
    }

    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions { feature_count: self.feature_count }
    }

    /// The random source for the train/test assignment.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
