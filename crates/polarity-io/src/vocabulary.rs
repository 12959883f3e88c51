//! Vocabulary file reader: one candidate attribute per line.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use polarity_tree::{Example, sanitize_token};
use tracing::{debug, info, instrument};

use crate::IoError;

/// Reads candidate attributes from a vocabulary file.
///
/// Lines are expected in descending frequency order. The first `ignored`
/// lines (typically stop words) are skipped and the next `count` lines are
/// kept. Each kept line is sanitized like a document token; lines that
/// sanitize to nothing, or to a token already kept, are dropped.
pub struct VocabularyReader {
    path: PathBuf,
    ignored: usize,
    count: Option<usize>,
}

impl VocabularyReader {
    /// Create a new reader for the given vocabulary file.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            ignored: 0,
            count: None,
        }
    }

    /// Skip the first `ignored` lines.
    #[must_use]
    pub fn with_ignored(mut self, ignored: usize) -> Self {
        self.ignored = ignored;
        self
    }

    /// Keep at most `count` lines after the skipped ones.
    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Read the vocabulary. A file shorter than the skip yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::ReadFile`] if the file cannot be read.
    #[instrument(skip(self), fields(path = %self.path.display(), ignored = self.ignored))]
    pub fn read(&self) -> Result<Vec<String>, IoError> {
        let bytes = fs::read(&self.path).map_err(|e| IoError::ReadFile {
            path: self.path.clone(),
            source: e,
        })?;
        let text = String::from_utf8_lossy(&bytes);

        let mut seen = HashSet::new();
        let attributes: Vec<String> = text
            .lines()
            .skip(self.ignored)
            .take(self.count.unwrap_or(usize::MAX))
            .map(sanitize_token)
            .filter(|token| !token.is_empty() && seen.insert(token.clone()))
            .collect();

        info!(n_attributes = attributes.len(), "vocabulary loaded");
        Ok(attributes)
    }
}

/// Keep only the attributes that occur in at least one example.
pub fn retain_present(attributes: Vec<String>, examples: &[Example]) -> Vec<String> {
    let before = attributes.len();
    let kept: Vec<String> = attributes
        .into_iter()
        .filter(|attribute| examples.iter().any(|e| e.contains(attribute)))
        .collect();
    debug!(before, after = kept.len(), "absent attributes dropped");
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use polarity_tree::Category;

    fn vocab_file(lines: &[&str]) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), lines.join("\n")).unwrap();
        file
    }

    #[test]
    fn skips_then_takes() {
        let file = vocab_file(&["the", "a", "and", "great", "awful", "plot"]);
        let vocab = VocabularyReader::new(file.path())
            .with_ignored(3)
            .with_count(2)
            .read()
            .unwrap();
        assert_eq!(vocab, vec!["great", "awful"]);
    }

    #[test]
    fn sanitizes_and_dedupes() {
        let file = vocab_file(&["Don't", "dont", "10", "(Wow)"]);
        let vocab = VocabularyReader::new(file.path()).read().unwrap();
        assert_eq!(vocab, vec!["dont", "wow"]);
    }

    #[test]
    fn short_file_yields_empty_vocabulary() {
        let file = vocab_file(&["the", "a"]);
        let vocab = VocabularyReader::new(file.path())
            .with_ignored(5)
            .read()
            .unwrap();
        assert!(vocab.is_empty());
    }

    #[test]
    fn missing_file() {
        let err = VocabularyReader::new(Path::new("/nonexistent/imdb.vocab"))
            .read()
            .unwrap_err();
        assert!(matches!(err, IoError::ReadFile { .. }));
    }

    #[test]
    fn retain_present_drops_unseen_attributes() {
        let examples = vec![
            Example::from_text(Category::Positive, "great fun").unwrap(),
            Example::from_text(Category::Negative, "awful plot").unwrap(),
        ];
        let attributes = vec!["great".to_string(), "boring".to_string(), "plot".to_string()];
        assert_eq!(retain_present(attributes, &examples), vec!["great", "plot"]);
    }
}
