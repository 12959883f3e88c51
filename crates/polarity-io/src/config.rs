//! JSON run configuration with range validation.

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::IoError;

const EXAMPLE_COUNT: RangeInclusive<usize> = 100..=250_000;
const IGNORED_ATTRIBUTES: RangeInclusive<usize> = 0..=90_000;
const ATTRIBUTE_COUNT: RangeInclusive<usize> = 5..=90_000;

/// Settings for one experiment run.
///
/// Loaded from JSON, e.g.
///
/// ```json
/// { "example_count": 2000, "ignored_attributes": 50, "attribute_count": 150, "tree_count": 150 }
/// ```
///
/// | Field                | Accepted range   |
/// |----------------------|------------------|
/// | `example_count`      | [100, 250000]    |
/// | `ignored_attributes` | [0, 90000]       |
/// | `attribute_count`    | [5, 90000]       |
///
/// `cutoff`, `tree_count`, and `seed` are optional and checked by the
/// training configs that consume them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Documents to load per corpus (split evenly between categories).
    pub example_count: usize,
    /// Leading vocabulary lines to skip.
    pub ignored_attributes: usize,
    /// Vocabulary lines to keep after the skipped ones.
    pub attribute_count: usize,
    /// ID3 early-stop cutoff.
    #[serde(default)]
    pub cutoff: Option<f64>,
    /// Random Forest size.
    #[serde(default)]
    pub tree_count: Option<usize>,
    /// Random seed.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl RunConfig {
    /// Read, parse, and validate a run configuration file.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::ConfigRead`] | File cannot be read |
    /// | [`IoError::ConfigParse`] | Not valid JSON, missing or unknown fields |
    /// | [`IoError::ConfigOutOfRange`] | A count is outside its accepted range |
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, IoError> {
        let text = fs::read_to_string(path).map_err(|e| IoError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|e| IoError::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        debug!(?config, "run config loaded");
        Ok(config)
    }

    /// Check every count against its accepted range.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::ConfigOutOfRange`] for the first offending field.
    pub fn validate(&self) -> Result<(), IoError> {
        check_range("example_count", self.example_count, EXAMPLE_COUNT)?;
        check_range("ignored_attributes", self.ignored_attributes, IGNORED_ATTRIBUTES)?;
        check_range("attribute_count", self.attribute_count, ATTRIBUTE_COUNT)?;
        Ok(())
    }
}

fn check_range(
    field: &'static str,
    value: usize,
    range: RangeInclusive<usize>,
) -> Result<(), IoError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(IoError::ConfigOutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_file(json: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), json).unwrap();
        file
    }

    #[test]
    fn loads_minimal_config() {
        let file = config_file(
            r#"{ "example_count": 1000, "ignored_attributes": 50, "attribute_count": 200 }"#,
        );
        let config = RunConfig::load(file.path()).unwrap();
        assert_eq!(config.example_count, 1000);
        assert_eq!(config.ignored_attributes, 50);
        assert_eq!(config.attribute_count, 200);
        assert_eq!(config.cutoff, None);
        assert_eq!(config.tree_count, None);
    }

    #[test]
    fn loads_optional_fields() {
        let file = config_file(
            r#"{ "example_count": 100, "ignored_attributes": 0, "attribute_count": 5,
                 "cutoff": 0.9, "tree_count": 120, "seed": 7 }"#,
        );
        let config = RunConfig::load(file.path()).unwrap();
        assert_eq!(config.cutoff, Some(0.9));
        assert_eq!(config.tree_count, Some(120));
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn example_count_below_range() {
        let file = config_file(
            r#"{ "example_count": 99, "ignored_attributes": 0, "attribute_count": 10 }"#,
        );
        let err = RunConfig::load(file.path()).unwrap_err();
        assert!(matches!(
            err,
            IoError::ConfigOutOfRange { field: "example_count", value: 99, min: 100, max: 250_000 }
        ));
    }

    #[test]
    fn attribute_count_above_range() {
        let config = RunConfig {
            example_count: 1000,
            ignored_attributes: 0,
            attribute_count: 90_001,
            cutoff: None,
            tree_count: None,
            seed: None,
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, IoError::ConfigOutOfRange { field: "attribute_count", .. }));
    }

    #[test]
    fn unknown_field_rejected() {
        let file = config_file(
            r#"{ "example_count": 1000, "ignored_attributes": 0, "attribute_count": 10,
                 "trees": 3 }"#,
        );
        let err = RunConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, IoError::ConfigParse { .. }));
    }

    #[test]
    fn missing_file() {
        let err = RunConfig::load(Path::new("/nonexistent/run.json")).unwrap_err();
        assert!(matches!(err, IoError::ConfigRead { .. }));
    }
}
