//! Python bindings, built with `--features python` (e.g. through maturin).

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::common_types::{Dataset, FeatureVector};
use crate::error::KnnError;
use crate::knn::{KnnClassifier, Metric, Voting};

impl From<KnnError> for PyErr {
    fn from(err: KnnError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Euclidean distance between two vectors of equal length.
#[pyfunction]
fn euclidean_distance(a: Vec<f64>, b: Vec<f64>) -> PyResult<f64> {
    if a.len() != b.len() {
        return Err(PyValueError::new_err("Input vectors must have the same length."));
    }
    Ok(Metric::Euclidean.distance(&a, &b, a.len())?)
}

#[pyclass(name = "KnnClassifier")]
struct PyKnnClassifier {
    k: usize,
    voting: Voting,
    training: Dataset<f64, String>,
}

impl PyKnnClassifier {
    fn classifier(&self) -> PyResult<KnnClassifier<'_, f64, String>> {
        Ok(KnnClassifier::new(&self.training, self.k, Metric::Euclidean)?.with_voting(self.voting))
    }
}

#[pymethods]
impl PyKnnClassifier {
    /// `weighted=True` weighs each neighbor's vote by its inverse distance.
    #[new]
    #[pyo3(signature = (k, weighted = false))]
    fn new(k: usize, weighted: bool) -> PyResult<Self> {
        if k == 0 {
            return Err(PyValueError::new_err("k must be at least 1"));
        }
        let voting = if weighted { Voting::Distance } else { Voting::Majority };
        Ok(PyKnnClassifier { k, voting, training: Vec::new() })
    }

    /// Replaces the training set with `(features, label)` pairs.
    fn fit(&mut self, training: Vec<(Vec<f64>, String)>) -> PyResult<()> {
        let training: Dataset<f64, String> = training
            .into_iter()
            .map(|(features, label)| FeatureVector::new(features, label))
            .collect();
        KnnClassifier::new(&training, self.k, Metric::Euclidean)?;
        self.training = training;
        Ok(())
    }

    fn predict_single(&self, features: Vec<f64>) -> PyResult<String> {
        Ok(self.classifier()?.predict(&features)?.label)
    }

    fn predict(&self, rows: Vec<Vec<f64>>) -> PyResult<Vec<String>> {
        let classifier = self.classifier()?;
        rows.iter()
            .map(|features| -> PyResult<String> { Ok(classifier.predict(features)?.label) })
            .collect()
    }

    #[getter]
    fn k(&self) -> usize {
        self.k
    }

    #[getter]
    fn weighted(&self) -> bool {
        self.voting == Voting::Distance
    }
}

#[pymodule]
#[pyo3(name = "iris_knn")]
fn iris_knn_py(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(euclidean_distance, m)?)?;
    m.add_class::<PyKnnClassifier>()?;
    Ok(())
}
