//! Directory-based review corpus reader.

use std::fs;
use std::path::{Path, PathBuf};

use polarity_tree::{Category, Example};
use tracing::{debug, info, instrument};

use crate::IoError;

/// Reads a labelled corpus laid out as one file per document.
///
/// Expected layout:
/// - `dir/pos/*` documents are [`Category::Positive`]
/// - `dir/neg/*` documents are [`Category::Negative`]
///
/// Files are read in sorted file-name order. A limit of `n` reads at most
/// `n / 2` documents from each category.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::DirectoryNotFound`] | `pos` or `neg` is missing |
/// | [`IoError::ReadFile`] | A directory listing or document cannot be read |
/// | [`IoError::EmptyCorpus`] | Zero documents were read |
pub struct CorpusReader {
    dir: PathBuf,
    limit: Option<usize>,
}

impl CorpusReader {
    /// Create a new reader for the corpus rooted at `dir`.
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            limit: None,
        }
    }

    /// Read at most `limit` documents in total, split evenly between categories.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Read every selected document.
    ///
    /// Categories are interleaved (positive, negative, positive, ...) so that
    /// any prefix of the result is close to balanced; the surplus of the
    /// larger category comes last.
    #[instrument(skip(self), fields(dir = %self.dir.display(), limit = ?self.limit))]
    pub fn read(&self) -> Result<Vec<Example>, IoError> {
        let per_category = self.limit.map(|n| n / 2);

        let positives = self.read_category("pos", Category::Positive, per_category)?;
        let negatives = self.read_category("neg", Category::Negative, per_category)?;
        let n_positive = positives.len();
        let examples = interleave(positives, negatives);

        if examples.is_empty() {
            return Err(IoError::EmptyCorpus {
                path: self.dir.clone(),
            });
        }

        info!(
            n_examples = examples.len(),
            n_positive,
            n_negative = examples.len() - n_positive,
            "corpus loaded"
        );
        Ok(examples)
    }

    fn read_category(
        &self,
        subdir: &str,
        category: Category,
        limit: Option<usize>,
    ) -> Result<Vec<Example>, IoError> {
        let dir = self.dir.join(subdir);
        if !dir.is_dir() {
            return Err(IoError::DirectoryNotFound { path: dir });
        }

        let mut files = Vec::new();
        let entries = fs::read_dir(&dir).map_err(|e| IoError::ReadFile {
            path: dir.clone(),
            source: e,
        })?;
        for entry in entries {
            let entry = entry.map_err(|e| IoError::ReadFile {
                path: dir.clone(),
                source: e,
            })?;
            let path = entry.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        files.truncate(limit.unwrap_or(usize::MAX));

        let examples = files
            .iter()
            .map(|path| -> Result<Example, IoError> {
                let bytes = fs::read(path).map_err(|e| IoError::ReadFile {
                    path: path.clone(),
                    source: e,
                })?;
                Ok(Example::from_text(category, &String::from_utf8_lossy(&bytes))?)
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(%category, n_documents = examples.len(), "category read");
        Ok(examples)
    }
}

fn interleave(first: Vec<Example>, second: Vec<Example>) -> Vec<Example> {
    let mut merged = Vec::with_capacity(first.len() + second.len());
    let mut first = first.into_iter();
    let mut second = second.into_iter();
    loop {
        match (first.next(), second.next()) {
            (None, None) => break,
            (a, b) => merged.extend(a.into_iter().chain(b)),
        }
    }
    merged
}
