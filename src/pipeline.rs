//! The end-to-end run: load, partition, classify every test instance, score.

use std::fmt;

use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::config::RunConfig;
use crate::dataset::load_dataset;
use crate::error::Result;
use crate::knn::KnnClassifier;
use crate::metrics::get_accuracy;

/// Predicted and true label for one test instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub predicted: String,
    pub actual: String,
    pub confidence: f64,
}

impl Outcome {
    pub fn is_correct(&self) -> bool {
        self.predicted == self.actual
    }
}

/// Structured result of a run. `outcomes` is aligned with the test set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub train_size: usize,
    pub test_size: usize,
    pub outcomes: Vec<Outcome>,
    /// Percent correct, 0 to 100.
    pub accuracy: f64,
}

/// Console rendering: set sizes, one line per test instance, then accuracy.
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Train set: {}", self.train_size)?;
        writeln!(f, "Test set: {}", self.test_size)?;
        for outcome in &self.outcomes {
            writeln!(f, "> predicted='{}', actual='{}'", outcome.predicted, outcome.actual)?;
        }
        writeln!(f, "Accuracy: {:?}%", self.accuracy)
    }
}

/// Runs with the random source described by `config.seed`.
pub fn run(config: &RunConfig) -> Result<Report> {
    let mut rng = config.rng();
    run_with_rng(config, &mut rng)
}

/// Runs with an explicit random source for the train/test assignment.
pub fn run_with_rng<R: Rng>(config: &RunConfig, rng: &mut R) -> Result<Report> {
    config.validate()?;
    let partition = load_dataset(&config.data_path, config.split, rng, &config.loader_options())?;
    config.validate_partition(&partition)?;
    info!(
        training = partition.training.len(),
        test = partition.test.len(),
        k = config.k,
        metric = ?config.metric,
        voting = ?config.voting,
        "classifying"
    );

    let classifier =
        KnnClassifier::new(&partition.training, config.k, config.metric)?.with_voting(config.voting);
    let predictions = classifier.predict_all(&partition.test)?;
    let labels: Vec<String> = predictions.iter().map(|p| p.label.clone()).collect();
    let accuracy = get_accuracy(&partition.test, &labels)?;

    let outcomes: Vec<Outcome> = predictions
        .into_iter()
        .zip(&partition.test)
        .map(|(prediction, instance)| Outcome {
            predicted: prediction.label,
            actual: instance.label.clone(),
            confidence: prediction.confidence,
        })
        .collect();
    info!(accuracy, correct = outcomes.iter().filter(|o| o.is_correct()).count(), "run complete");

    Ok(Report {
        train_size: partition.training.len(),
        test_size: partition.test.len(),
        outcomes,
        accuracy,
    })
}
