//! iris-knn: classify a CSV dataset with k-nearest-neighbors and report accuracy.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use iris_knn::config::{DEFAULT_DATA_PATH, DEFAULT_K, DEFAULT_SPLIT};
use iris_knn::dataset::IRIS_FEATURE_COUNT;
use iris_knn::{Metric, RunConfig, Voting};

#[derive(Parser)]
#[command(name = "iris-knn")]
#[command(about = "k-nearest-neighbors classification of a labelled CSV dataset")]
#[command(version)]
struct Cli {
    /// CSV file: feature columns followed by a class label, no header
    #[arg(default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,

    /// Probability that a row is assigned to the training set
    #[arg(long, default_value_t = DEFAULT_SPLIT)]
    split: f64,

    /// Number of neighbors consulted per prediction
    #[arg(short, default_value_t = DEFAULT_K)]
    k: usize,

    /// Random seed for the train/test assignment
    #[arg(long)]
    seed: Option<u64>,

    /// Distance metric
    #[arg(long, value_enum, default_value = "euclidean")]
    metric: MetricArg,

    /// How neighbor votes are weighted
    #[arg(long, value_enum, default_value = "majority")]
    voting: VotingArg,

    /// Order of the Minkowski metric
    #[arg(long, default_value_t = 3.0)]
    p: f64,

    /// Number of leading feature columns per row
    #[arg(long, default_value_t = IRIS_FEATURE_COUNT)]
    features: usize,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum MetricArg {
    Euclidean,
    Manhattan,
    Minkowski,
}

#[derive(Clone, Copy, ValueEnum)]
enum VotingArg {
    /// One vote per neighbor
    Majority,
    /// Each vote weighs the inverse of the neighbor's distance
    Distance,
}

impl From<VotingArg> for Voting {
    fn from(arg: VotingArg) -> Self {
        match arg {
            VotingArg::Majority => Voting::Majority,
            VotingArg::Distance => Voting::Distance,
        }
    }
}

impl Cli {
    fn into_config(self) -> RunConfig {
        let metric = match self.metric {
            MetricArg::Euclidean => Metric::Euclidean,
            MetricArg::Manhattan => Metric::Manhattan,
            MetricArg::Minkowski => Metric::Minkowski { p: self.p },
        };
        RunConfig {
            data_path: self.data,
            split: self.split,
            k: self.k,
            seed: self.seed,
            metric,
            voting: self.voting.into(),
            feature_count: self.features,
        }
    }
}

/// Logs go to stderr so stdout carries only the report.
fn init_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    let json = cli.json;
    let config = cli.into_config();

    let report = match iris_knn::run(&config) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{text}"),
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{report}");
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_match_run_config() {
        let config = Cli::parse_from(["iris-knn"]).into_config();
        assert_eq!(config.feature_count, IRIS_FEATURE_COUNT);
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn test_voting_and_metric_flags() {
        let config = Cli::parse_from(["iris-knn", "--voting", "distance", "--metric", "minkowski", "--p", "4"])
            .into_config();
        assert_eq!(config.voting, Voting::Distance);
        assert_eq!(config.metric, Metric::Minkowski { p: 4.0 });
    }
}
