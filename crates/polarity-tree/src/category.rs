//! Class labels and per-class tallies.

use std::fmt;

/// The class of a document.
///
/// `None` marks an example that has not been classified yet. It is never a
/// valid ground-truth label and never the final output of a classifier.
///
/// The declaration order of `Positive` and `Negative` is the tie-break
/// preference used everywhere a plurality is taken: when two categories have
/// equal counts, `Positive` wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Not classified.
    #[default]
    None,
    /// Positive sentiment.
    Positive,
    /// Negative sentiment.
    Negative,
}

impl Category {
    /// Every real category, in tie-break preference order.
    pub const VALUES: [Category; 2] = [Category::Positive, Category::Negative];

    /// Return the real categories (everything except `None`).
    #[must_use]
    pub fn values() -> &'static [Category] {
        &Self::VALUES
    }

    /// Return `true` for `Positive` and `Negative`.
    #[must_use]
    pub fn is_known(self) -> bool {
        self != Category::None
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::None => "none",
            Category::Positive => "positive",
            Category::Negative => "negative",
        };
        f.pad(name)
    }
}

/// Number of examples (or votes) per real category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct CategoryCounts {
    positive: usize,
    negative: usize,
}

impl CategoryCounts {
    /// Create an empty tally.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `category`. `None` is not counted.
    pub fn add(&mut self, category: Category) {
        match category {
            Category::Positive => self.positive += 1,
            Category::Negative => self.negative += 1,
            Category::None => {}
        }
    }

    /// Return the count for `category` (always 0 for `None`).
    #[must_use]
    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Positive => self.positive,
            Category::Negative => self.negative,
            Category::None => 0,
        }
    }

    /// Return the sum over all categories.
    #[must_use]
    pub fn total(&self) -> usize {
        self.positive + self.negative
    }

    /// Combine two tallies.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            positive: self.positive + other.positive,
            negative: self.negative + other.negative,
        }
    }

    /// Return the category with the highest count.
    ///
    /// Ties go to the earlier category in [`Category::VALUES`], so an empty
    /// tally yields `Positive`.
    #[must_use]
    pub fn most_common(&self) -> Category {
        let mut best = Category::VALUES[0];
        for &category in &Category::VALUES[1..] {
            if self.get(category) > self.get(best) {
                best = category;
            }
        }
        best
    }

    /// Return the single category present, if every count falls in one category.
    ///
    /// An empty tally has no single category.
    #[must_use]
    pub fn unanimous(&self) -> Option<Category> {
        Category::values()
            .iter()
            .copied()
            .find(|&c| self.get(c) > 0 && self.get(c) == self.total())
    }
}

impl FromIterator<Category> for CategoryCounts {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        let mut counts = Self::new();
        for category in iter {
            counts.add(category);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_excludes_none() {
        assert_eq!(Category::values(), &[Category::Positive, Category::Negative]);
        assert!(!Category::values().contains(&Category::None));
    }

    #[test]
    fn display_names() {
        assert_eq!(Category::Positive.to_string(), "positive");
        assert_eq!(Category::None.to_string(), "none");
    }

    #[test]
    fn most_common_prefers_majority() {
        let counts: CategoryCounts =
            [Category::Negative, Category::Negative, Category::Positive].into_iter().collect();
        assert_eq!(counts.most_common(), Category::Negative);
    }

    #[test]
    fn most_common_tie_goes_to_positive() {
        let counts: CategoryCounts = [Category::Negative, Category::Positive].into_iter().collect();
        assert_eq!(counts.most_common(), Category::Positive);
        assert_eq!(CategoryCounts::new().most_common(), Category::Positive);
    }

    #[test]
    fn merge_adds_counts() {
        let a: CategoryCounts = [Category::Positive].into_iter().collect();
        let b: CategoryCounts = [Category::Positive, Category::Negative].into_iter().collect();
        let merged = a.merge(b);
        assert_eq!(merged.get(Category::Positive), 2);
        assert_eq!(merged.get(Category::Negative), 1);
        assert_eq!(merged.total(), 3);
    }

    #[test]
    fn unanimous_detection() {
        let pure: CategoryCounts = [Category::Negative; 4].into_iter().collect();
        assert_eq!(pure.unanimous(), Some(Category::Negative));

        let mixed: CategoryCounts = [Category::Negative, Category::Positive].into_iter().collect();
        assert_eq!(mixed.unanimous(), None);
        assert_eq!(CategoryCounts::new().unanimous(), None);
    }
}
