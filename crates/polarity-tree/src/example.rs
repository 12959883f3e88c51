//! Labeled documents as bags of sanitized tokens.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::category::Category;
use crate::error::TreeError;

/// Lower-case `token` and strip ASCII punctuation and digits.
#[must_use]
pub fn sanitize_token(token: &str) -> String {
    token
        .chars()
        .filter(|c| !c.is_ascii_digit() && !c.is_ascii_punctuation())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Token storage shared by an example and all of its copies.
#[derive(Debug)]
struct Tokens {
    sequence: Vec<String>,
    lookup: HashSet<String>,
}

/// One labeled document.
///
/// `actual` is fixed at construction. `predicted` starts as
/// [`Category::None`] and is overwritten each time a classifier sees the
/// example. Token order is kept but only presence is ever tested.
#[derive(Debug, Clone)]
pub struct Example {
    actual: Category,
    predicted: Category,
    tokens: Arc<Tokens>,
}

impl Example {
    /// Create an example from pre-split tokens.
    ///
    /// Each token is sanitized; tokens that become empty are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnlabeledExample`] when `actual` is [`Category::None`].
    pub fn new<I, S>(actual: Category, tokens: I) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !actual.is_known() {
            return Err(TreeError::UnlabeledExample { category: actual });
        }
        let sequence: Vec<String> = tokens
            .into_iter()
            .map(|t| sanitize_token(t.as_ref()))
            .filter(|t| !t.is_empty())
            .collect();
        let lookup = sequence.iter().cloned().collect();
        Ok(Self {
            actual,
            predicted: Category::None,
            tokens: Arc::new(Tokens { sequence, lookup }),
        })
    }

    /// Create an example from raw document text, split on whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnlabeledExample`] when `actual` is [`Category::None`].
    pub fn from_text(actual: Category, raw_text: &str) -> Result<Self, TreeError> {
        Self::new(actual, raw_text.split_whitespace())
    }

    /// Return an independent copy with a fresh, unclassified prediction.
    #[must_use]
    pub fn copy_of(&self) -> Self {
        Self {
            actual: self.actual,
            predicted: Category::None,
            tokens: Arc::clone(&self.tokens),
        }
    }

    /// Return the ground-truth category.
    #[must_use]
    pub fn actual(&self) -> Category {
        self.actual
    }

    /// Return the most recent prediction, or `None` if never classified.
    #[must_use]
    pub fn predicted(&self) -> Category {
        self.predicted
    }

    pub(crate) fn set_predicted(&mut self, category: Category) {
        self.predicted = category;
    }

    /// Return the sanitized tokens in document order.
    #[must_use]
    pub fn attributes(&self) -> &[String] {
        &self.tokens.sequence
    }

    /// Return `true` if `attribute` occurs anywhere in the document.
    #[must_use]
    pub fn contains(&self, attribute: &str) -> bool {
        self.tokens.lookup.contains(attribute)
    }
}

impl fmt::Display for Example {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}: {} tokens",
            self.actual,
            self.predicted,
            self.tokens.sequence.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_punctuation_and_digits() {
        assert_eq!(sanitize_token("Hello,"), "hello");
        assert_eq!(sanitize_token("(10/10)"), "");
        assert_eq!(sanitize_token("<br"), "br");
        assert_eq!(sanitize_token("don't"), "dont");
        assert_eq!(sanitize_token("R2D2"), "rd");
    }

    #[test]
    fn from_text_tokenizes_and_drops_empty() {
        let ex = Example::from_text(Category::Positive, "A great  movie! 10/10").unwrap();
        assert_eq!(ex.attributes(), &["a", "great", "movie"]);
        assert!(ex.contains("great"));
        assert!(!ex.contains("10/10"));
    }

    #[test]
    fn new_example_is_unclassified() {
        let ex = Example::new(Category::Negative, ["bad"]).unwrap();
        assert_eq!(ex.actual(), Category::Negative);
        assert_eq!(ex.predicted(), Category::None);
    }

    #[test]
    fn none_label_rejected() {
        let err = Example::new(Category::None, ["x"]).unwrap_err();
        assert!(matches!(err, TreeError::UnlabeledExample { category: Category::None }));
    }

    #[test]
    fn copy_resets_prediction_and_keeps_tokens() {
        let mut ex = Example::new(Category::Positive, ["good", "fun"]).unwrap();
        ex.set_predicted(Category::Negative);

        let copy = ex.copy_of();
        assert_eq!(copy.predicted(), Category::None);
        assert_eq!(copy.actual(), Category::Positive);
        assert_eq!(copy.attributes(), ex.attributes());
        assert_eq!(ex.predicted(), Category::Negative);
    }
}
