//! Domain types for polarity-io.

use std::path::{Path, PathBuf};

use crate::IoError;

/// A validated experiment name for output file naming.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentName(String);

impl ExperimentName {
    /// Parse and validate an experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidExperimentName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(IoError::InvalidExperimentName { name });
        }
        Ok(Self(name))
    }

    /// Return the experiment name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name for an artifact of this experiment: `{name}_{suffix}`.
    pub(crate) fn file_name(&self, suffix: &str) -> String {
        format!("{}_{suffix}", self.0)
    }
}

impl std::fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Standard layout of a review dataset directory.
///
/// ```text
/// root/
///   train/pos/*  train/neg/*
///   test/pos/*   test/neg/*
///   imdb.vocab
/// ```
#[derive(Debug, Clone)]
pub struct DatasetLayout {
    root: PathBuf,
}

impl DatasetLayout {
    /// Describe the dataset rooted at `root`.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Return the dataset root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return the training corpus directory.
    #[must_use]
    pub fn train_dir(&self) -> PathBuf {
        self.root.join("train")
    }

    /// Return the test corpus directory.
    #[must_use]
    pub fn test_dir(&self) -> PathBuf {
        self.root.join("test")
    }

    /// Return the vocabulary file path.
    #[must_use]
    pub fn vocabulary_path(&self) -> PathBuf {
        self.root.join("imdb.vocab")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn experiment_name_valid() {
        let name = ExperimentName::new("imdb-run_01".to_string());
        assert!(name.is_ok());
        let name = name.unwrap();
        assert_eq!(name.as_str(), "imdb-run_01");
        assert_eq!(name.file_name("curve.csv"), "imdb-run_01_curve.csv");
    }

    #[test]
    fn experiment_name_rejects_empty() {
        let name = ExperimentName::new(String::new());
        assert!(matches!(name, Err(IoError::InvalidExperimentName { .. })));
    }

    #[test]
    fn experiment_name_rejects_special_chars() {
        let name = ExperimentName::new("../escape".to_string());
        assert!(matches!(name, Err(IoError::InvalidExperimentName { .. })));
    }

    #[test]
    fn dataset_layout_paths() {
        let layout = DatasetLayout::new(Path::new("/data/aclImdb"));
        assert_eq!(layout.train_dir(), Path::new("/data/aclImdb/train"));
        assert_eq!(layout.test_dir(), Path::new("/data/aclImdb/test"));
        assert_eq!(layout.vocabulary_path(), Path::new("/data/aclImdb/imdb.vocab"));
    }
}
