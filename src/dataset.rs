//! Loading a delimited dataset and partitioning it into training and test sets.
//!
//! Each record is `f1,f2,...,fD,label` with no header row. Rows are assigned to the
//! training set independently at random, so the split ratio is a probability rather
//! than a cut point. The random source is always supplied by the caller.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::common_types::{Dataset, FeatureVector};
use crate::error::{KnnError, Result};

/// Number of leading feature columns in the iris dataset.
pub const IRIS_FEATURE_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderOptions {
    /// How many leading fields of each row are parsed as features.
    pub feature_count: usize,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self { feature_count: IRIS_FEATURE_COUNT }
    }
}

/// A loaded dataset, already split.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub training: Dataset<f64, String>,
    pub test: Dataset<f64, String>,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.training.len() + self.test.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Rejects split ratios that are not a probability.
pub fn validate_split(split: f64) -> Result<()> {
    if (0.0..=1.0).contains(&split) {
        Ok(())
    } else {
        Err(KnnError::InvalidConfig(format!("split must be within [0, 1], got {split}")))
    }
}

/// Opens `path` and loads it with [`load_from_reader`].
pub fn load_dataset<P, R>(path: P, split: f64, rng: &mut R, options: &LoaderOptions) -> Result<Partition>
where
    P: AsRef<Path>,
    R: Rng,
{
    let path = path.as_ref();
    validate_split(split)?;
    let file = File::open(path).map_err(|e| {
        KnnError::Io(std::io::Error::new(e.kind(), format!("cannot open {}: {e}", path.display())))
    })?;
    debug!(path = %path.display(), split, "loading dataset");
    load_from_reader(file, split, rng, options)
}

/// Parses every record from `reader` and assigns each one to the training set when a
/// uniform draw from `[0, 1)` falls below `split`, otherwise to the test set.
///
/// Empty lines never reach the parser. A final record made only of blank fields
/// (e.g. a line of spaces at end of file) is skipped; a blank record anywhere else is
/// an error, as is any row with fewer than `feature_count + 1` fields. The label is the
/// last field of the row.
pub fn load_from_reader<Rd, R>(reader: Rd, split: f64, rng: &mut R, options: &LoaderOptions) -> Result<Partition>
where
    Rd: Read,
    R: Rng,
{
    validate_split(split)?;
    if options.feature_count == 0 {
        return Err(KnnError::InvalidConfig("feature_count must be at least 1".into()));
    }

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let records = rdr.records().collect::<std::result::Result<Vec<_>, csv::Error>>()?;

    let mut partition = Partition { training: Vec::new(), test: Vec::new() };
    let last = records.len().saturating_sub(1);
    for (idx, record) in records.iter().enumerate() {
        let row = row_number(record, idx);
        if is_blank(record) {
            if idx == last {
                warn!(row, "skipping blank trailing record");
                continue;
            }
            return Err(KnnError::MalformedRow { row, reason: "blank record".into() });
        }

        let instance = parse_record(record, row, options.feature_count)?;
        if rng.gen_range(0.0..1.0) < split {
            partition.training.push(instance);
        } else {
            partition.test.push(instance);
        }
    }

    debug!(
        training = partition.training.len(),
        test = partition.test.len(),
        "dataset partitioned"
    );
    Ok(partition)
}

/// 1-based line number of the record in the source, falling back to its index.
fn row_number(record: &StringRecord, idx: usize) -> usize {
    record
        .position()
        .map(|pos| pos.line() as usize)
        .unwrap_or(idx + 1)
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(str::is_empty)
}

fn parse_record(record: &StringRecord, row: usize, feature_count: usize) -> Result<FeatureVector<f64, String>> {
    if record.len() < feature_count + 1 {
        return Err(KnnError::MalformedRow {
            row,
            reason: format!("expected at least {} fields, found {}", feature_count + 1, record.len()),
        });
    }

    let features = record
        .iter()
        .take(feature_count)
        .enumerate()
        .map(|(col, field)| {
            // NaN and infinities parse but have no place on a distance scale.
            match field.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(value),
                _ => Err(KnnError::Parse { row, column: col + 1, value: field.to_string() }),
            }
        })
        .collect::<Result<Vec<_>>>()?;

    let label = &record[record.len() - 1];
    if label.is_empty() {
        return Err(KnnError::MalformedRow { row, reason: "empty label".into() });
    }
    Ok(FeatureVector::new(features, label.to_string()))
}
