//! I/O error types for polarity-io.

use std::path::PathBuf;

use polarity_tree::TreeError;

/// Errors from corpus loading, run configuration, and result writing.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a corpus category directory does not exist.
    #[error("directory not found: {path}")]
    DirectoryNotFound {
        /// Path that was attempted.
        path: PathBuf,
    },

    /// Returned when a file or directory listing cannot be read.
    #[error("cannot read {path}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a corpus directory yields zero documents.
    #[error("no documents found under {path}")]
    EmptyCorpus {
        /// The corpus root.
        path: PathBuf,
    },

    /// Returned when the run configuration file cannot be read.
    #[error("cannot read config file {path}")]
    ConfigRead {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the run configuration is not valid JSON for the expected shape.
    #[error("cannot parse config file {path}")]
    ConfigParse {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Returned when a run configuration value falls outside its accepted range.
    #[error("config value {field} = {value} is outside [{min}, {max}]")]
    ConfigOutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: usize,
        /// Smallest accepted value.
        min: usize,
        /// Largest accepted value.
        max: usize,
    },

    /// Returned when the experiment name contains characters outside `[a-zA-Z0-9_-]`.
    #[error("invalid experiment name \"{name}\": must match [a-zA-Z0-9_-]+")]
    InvalidExperimentName {
        /// The invalid name.
        name: String,
    },

    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a result file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a result artifact cannot be serialized to JSON.
    #[error("cannot serialize {path}")]
    Serialize {
        /// Destination of the artifact.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Returned when a CSV result file cannot be written.
    #[error("CSV error writing {path}")]
    Csv {
        /// Path to the CSV file.
        path: PathBuf,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when a loaded document cannot become an example.
    #[error(transparent)]
    Example(#[from] TreeError),
}
