//! JSON and CSV result writer for evaluation, sweep, and learning-curve outputs.

use std::fs;
use std::path::{Path, PathBuf};

use polarity_tree::{MetricsReport, RankedAttribute, SweepPoint, SweepResult};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::ExperimentName;

/// Train and test metrics for one trained model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelReport<'a> {
    /// Model label, e.g. `id3` or `random_forest`.
    pub model: &'a str,
    /// Metrics on the training corpus.
    pub train: MetricsReport,
    /// Metrics on the test corpus.
    pub test: MetricsReport,
}

/// One row of a learning-curve CSV.
#[derive(Debug, Clone, Serialize)]
pub struct CurveRow {
    /// Documents loaded per corpus for this row.
    pub example_count: usize,
    /// Model label.
    pub model: String,
    /// `train` or `test`.
    pub split: String,
    /// Accuracy.
    pub accuracy: f64,
    /// Positive-class precision.
    pub precision: f64,
    /// Positive-class recall.
    pub recall: f64,
    /// Positive-class F1.
    pub f1: f64,
}

impl CurveRow {
    /// Build a row from a metrics report.
    pub fn new(example_count: usize, model: &str, split: &str, metrics: &MetricsReport) -> Self {
        Self {
            example_count,
            model: model.to_string(),
            split: split.to_string(),
            accuracy: metrics.accuracy,
            precision: metrics.precision,
            recall: metrics.recall,
            f1: metrics.f1,
        }
    }
}

/// Writes experiment results to the output directory.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_evaluate.json`,
/// `{experiment}_{kind}_sweep.json`, and `{experiment}_curve.csv`.
pub struct ResultWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Write model metrics and the top-ranked attributes to `{experiment}_evaluate.json`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Serialize`] or [`IoError::WriteFile`] on failure.
    #[instrument(skip_all)]
    pub fn write_evaluation(
        &self,
        n_attributes: usize,
        models: &[ModelReport<'_>],
        top_attributes: &[RankedAttribute],
    ) -> Result<PathBuf, IoError> {
        let artifact = EvaluateArtifact {
            experiment: self.experiment.as_str(),
            n_attributes,
            models,
            top_attributes,
        };
        let path = self.write_json(&self.experiment.file_name("evaluate.json"), &artifact)?;
        info!(path = %path.display(), "evaluation result written");
        Ok(path)
    }

    /// Write a parameter sweep to `{experiment}_{kind}_sweep.json`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Serialize`] or [`IoError::WriteFile`] on failure.
    #[instrument(skip_all, fields(kind = kind))]
    pub fn write_sweep<T: Serialize + Copy>(
        &self,
        kind: &str,
        result: &SweepResult<T>,
    ) -> Result<PathBuf, IoError> {
        let artifact = SweepArtifact {
            experiment: self.experiment.as_str(),
            kind,
            best_value: result.best_value(),
            best_accuracy: result.best().metrics.accuracy,
            points: result.points(),
        };
        let file_name = self.experiment.file_name(&format!("{kind}_sweep.json"));
        let path = self.write_json(&file_name, &artifact)?;
        info!(path = %path.display(), "sweep result written");
        Ok(path)
    }

    /// Write learning-curve rows to `{experiment}_curve.csv`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Csv`] if the file cannot be written.
    #[instrument(skip_all, fields(n_rows = rows.len()))]
    pub fn write_curve(&self, rows: &[CurveRow]) -> Result<PathBuf, IoError> {
        let path = self.output_dir.join(self.experiment.file_name("curve.csv"));
        let csv_error = |e: csv::Error| IoError::Csv {
            path: path.clone(),
            source: e,
        };

        let mut writer = csv::Writer::from_path(&path).map_err(csv_error)?;
        for row in rows {
            writer.serialize(row).map_err(csv_error)?;
        }
        writer.flush().map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "learning curve written");
        Ok(path)
    }

    fn write_json<S: Serialize>(&self, file_name: &str, artifact: &S) -> Result<PathBuf, IoError> {
        let path = self.output_dir.join(file_name);
        let json = serde_json::to_string_pretty(artifact).map_err(|e| IoError::Serialize {
            path: path.clone(),
            source: e,
        })?;
        fs::write(&path, json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }
}

// ---------------------------------------------------------------------------
// Serialization-only shadow structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct EvaluateArtifact<'a> {
    experiment: &'a str,
    n_attributes: usize,
    models: &'a [ModelReport<'a>],
    top_attributes: &'a [RankedAttribute],
}

#[derive(Serialize)]
struct SweepArtifact<'a, T> {
    experiment: &'a str,
    kind: &'a str,
    best_value: T,
    best_accuracy: f64,
    points: &'a [SweepPoint<T>],
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn metrics(accuracy: f64) -> MetricsReport {
        MetricsReport {
            example_count: 10,
            accuracy,
            precision: 0.5,
            recall: 0.8,
            f1: 0.6,
            macro_precision: 0.6,
            macro_recall: 0.6,
            micro_precision: accuracy,
            micro_recall: accuracy,
        }
    }

    fn writer(dir: &TempDir, name: &str) -> ResultWriter {
        ResultWriter::new(dir.path(), ExperimentName::new(name.into()).unwrap()).unwrap()
    }

    #[test]
    fn creates_nested_output_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        ResultWriter::new(&nested, ExperimentName::new("x".into()).unwrap()).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn write_evaluation_json_structure() {
        let dir = TempDir::new().unwrap();
        let models = [
            ModelReport {
                model: "id3",
                train: metrics(0.9),
                test: metrics(0.7),
            },
            ModelReport {
                model: "random_forest",
                train: metrics(0.95),
                test: metrics(0.8),
            },
        ];
        let top = [RankedAttribute {
            name: "great".to_string(),
            importance: 1.0,
            rank: 1,
        }];
        let path = writer(&dir, "eval_run")
            .write_evaluation(150, &models, &top)
            .unwrap();
        assert_eq!(path, dir.path().join("eval_run_evaluate.json"));

        let content: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(content["experiment"], "eval_run");
        assert_eq!(content["n_attributes"], 150);
        assert_eq!(content["models"].as_array().unwrap().len(), 2);
        assert_eq!(content["models"][1]["model"], "random_forest");
        assert_eq!(content["models"][1]["test"]["accuracy"], 0.8);
        assert_eq!(content["top_attributes"][0]["name"], "great");
    }

    #[test]
    fn write_curve_csv_rows() {
        let dir = TempDir::new().unwrap();
        let rows = vec![
            CurveRow::new(250, "id3", "train", &metrics(0.9)),
            CurveRow::new(250, "id3", "test", &metrics(0.7)),
        ];
        let path = writer(&dir, "curve_run").write_curve(&rows).unwrap();
        let content = fs::read_to_string(path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("example_count,model,split,accuracy,precision,recall,f1")
        );
        assert_eq!(lines.next(), Some("250,id3,train,0.9,0.5,0.8,0.6"));
        assert_eq!(lines.count(), 1);
    }
}
