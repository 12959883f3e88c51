//! Configuration builder for Random Forest training.

use crate::error::TreeError;
use crate::example::Example;
use crate::result::RandomForestResult;
use crate::tree::DEFAULT_CUTOFF;

/// Default number of trees in a forest.
pub const DEFAULT_TREE_COUNT: usize = 150;

/// Expected fraction of distinct examples in a same-size bootstrap sample, `1 - 1/e`.
pub const BOOTSTRAP_FRACTION: f64 = 1.0 - 1.0 / std::f64::consts::E;

/// Strategy for determining how many attributes each tree may split on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeSampling {
    /// `min(n_attributes, floor(sqrt(n_examples)))`.
    SqrtExamples,
    /// A fixed count (must not exceed the number of attributes).
    Fixed(usize),
    /// Every attribute (no subsampling).
    All,
}

impl AttributeSampling {
    /// Resolve the strategy to a concrete per-tree attribute count.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidAttributeCount`] when a fixed count exceeds
    /// `n_attributes`.
    pub fn resolve(self, n_examples: usize, n_attributes: usize) -> Result<usize, TreeError> {
        match self {
            AttributeSampling::SqrtExamples => {
                Ok(n_attributes.min((n_examples as f64).sqrt().floor() as usize))
            }
            AttributeSampling::Fixed(requested) if requested > n_attributes => {
                Err(TreeError::InvalidAttributeCount {
                    requested,
                    available: n_attributes,
                })
            }
            AttributeSampling::Fixed(requested) => Ok(requested),
            AttributeSampling::All => Ok(n_attributes),
        }
    }
}

/// Configuration for Random Forest training.
///
/// Construct via [`RandomForestConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter            | Default         |
/// |----------------------|-----------------|
/// | `example_fraction`   | `1 - 1/e`       |
/// | `attribute_sampling` | `SqrtExamples`  |
/// | `cutoff`             | 0.95            |
/// | `seed`               | 42              |
#[derive(Debug, Clone)]
pub struct RandomForestConfig {
    pub(crate) n_trees: usize,
    pub(crate) example_fraction: f64,
    pub(crate) attribute_sampling: AttributeSampling,
    pub(crate) cutoff: f64,
    pub(crate) seed: u64,
}

impl RandomForestConfig {
    /// Create a new config with the given number of trees.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidTreeCount`] if `n_trees` is zero.
    pub fn new(n_trees: usize) -> Result<Self, TreeError> {
        if n_trees == 0 {
            return Err(TreeError::InvalidTreeCount { n_trees });
        }
        Ok(Self {
            n_trees,
            example_fraction: BOOTSTRAP_FRACTION,
            attribute_sampling: AttributeSampling::SqrtExamples,
            cutoff: DEFAULT_CUTOFF,
            seed: 42,
        })
    }

    // --- Setters ---

    /// Set the number of trees.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidTreeCount`] if `n_trees` is zero.
    pub fn with_n_trees(mut self, n_trees: usize) -> Result<Self, TreeError> {
        if n_trees == 0 {
            return Err(TreeError::InvalidTreeCount { n_trees });
        }
        self.n_trees = n_trees;
        Ok(self)
    }

    /// Set the fraction of the training set drawn (with replacement) per tree.
    #[must_use]
    pub fn with_example_fraction(mut self, example_fraction: f64) -> Self {
        self.example_fraction = example_fraction;
        self
    }

    /// Set the per-tree attribute sampling strategy.
    #[must_use]
    pub fn with_attribute_sampling(mut self, attribute_sampling: AttributeSampling) -> Self {
        self.attribute_sampling = attribute_sampling;
        self
    }

    /// Set the early-stop cutoff used by every tree.
    #[must_use]
    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Set the random seed for reproducibility.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    // --- Getters ---

    /// Return the number of trees.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    /// Return the per-tree example fraction.
    #[must_use]
    pub fn example_fraction(&self) -> f64 {
        self.example_fraction
    }

    /// Return the attribute sampling strategy.
    #[must_use]
    pub fn attribute_sampling(&self) -> AttributeSampling {
        self.attribute_sampling
    }

    /// Return the early-stop cutoff.
    #[must_use]
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Return the random seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Train a Random Forest on the provided examples.
    ///
    /// # Errors
    ///
    /// | Variant                                | When                                          |
    /// |----------------------------------------|-----------------------------------------------|
    /// | [`TreeError::InvalidExampleFraction`]  | `example_fraction` is not in (0.0, 1.0]       |
    /// | [`TreeError::InvalidAttributeCount`]   | a fixed attribute count exceeds `attributes`  |
    /// | [`TreeError::InvalidCutoff`]           | `cutoff` is not in (0.0, 1.0]                 |
    pub fn fit<A: AsRef<str>>(
        &self,
        examples: &[Example],
        attributes: &[A],
    ) -> Result<RandomForestResult, TreeError> {
        crate::forest::train(self, examples, attributes)
    }
}

impl Default for RandomForestConfig {
    fn default() -> Self {
        Self {
            n_trees: DEFAULT_TREE_COUNT,
            example_fraction: BOOTSTRAP_FRACTION,
            attribute_sampling: AttributeSampling::SqrtExamples,
            cutoff: DEFAULT_CUTOFF,
            seed: 42,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RandomForestConfig::default();
        assert_eq!(config.n_trees(), 150);
        assert!((config.example_fraction() - 0.632_120_558_828_557_7).abs() < 1e-12);
        assert_eq!(config.attribute_sampling(), AttributeSampling::SqrtExamples);
        assert!((config.cutoff() - 0.95).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_trees_rejected() {
        assert!(matches!(
            RandomForestConfig::new(0),
            Err(TreeError::InvalidTreeCount { n_trees: 0 })
        ));
        assert!(RandomForestConfig::default().with_n_trees(0).is_err());
    }

    #[test]
    fn sqrt_sampling_is_capped_by_vocabulary() {
        assert_eq!(AttributeSampling::SqrtExamples.resolve(100, 50).unwrap(), 10);
        assert_eq!(AttributeSampling::SqrtExamples.resolve(99, 50).unwrap(), 9);
        assert_eq!(AttributeSampling::SqrtExamples.resolve(10_000, 50).unwrap(), 50);
        assert_eq!(AttributeSampling::SqrtExamples.resolve(0, 50).unwrap(), 0);
    }

    #[test]
    fn fixed_sampling_bounds() {
        assert_eq!(AttributeSampling::Fixed(3).resolve(100, 5).unwrap(), 3);
        assert!(matches!(
            AttributeSampling::Fixed(6).resolve(100, 5),
            Err(TreeError::InvalidAttributeCount { requested: 6, available: 5 })
        ));
        assert_eq!(AttributeSampling::All.resolve(4, 7).unwrap(), 7);
    }
}
