//! k-nearest-neighbors classification over a small in-memory labelled dataset.
//!
//! The pipeline is linear: [`dataset::load_dataset`] reads and randomly partitions a
//! CSV file, [`knn::KnnClassifier`] labels each test instance by majority vote among its
//! `k` nearest training instances, and [`metrics::get_accuracy`] scores the result.
//! [`pipeline::run`] strings the three together.

pub mod common_types;
pub mod config;
pub mod dataset;
pub mod error;
pub mod knn;
pub mod metrics;
pub mod pipeline;

#[cfg(feature = "python")]
mod python;

pub use common_types::{Dataset, FeatureVector, Neighbor, Prediction};
pub use config::RunConfig;
pub use dataset::{load_dataset, load_from_reader, LoaderOptions, Partition};
pub use error::{KnnError, Result};
pub use knn::{get_neighbors, get_response, get_weighted_response, KnnClassifier, Metric, VoteTally, Voting};
pub use metrics::get_accuracy;
pub use pipeline::{run, run_with_rng, Outcome, Report};
