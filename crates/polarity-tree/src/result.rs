//! What `RandomForestConfig::fit` hands back: the forest plus what was learned about the run.

use serde::Serialize;

use crate::forest::RandomForest;
use crate::importance::RankedAttribute;

/// Sizes used when the forest was grown.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingMetadata {
    /// Trees in the forest.
    pub n_trees: usize,
    /// Number of training examples supplied.
    pub n_examples: usize,
    /// Number of candidate attributes supplied.
    pub n_attributes: usize,
    /// Examples drawn (with replacement) for each tree.
    pub examples_per_tree: usize,
    /// Attributes drawn (without replacement) for each tree.
    pub attributes_per_tree: usize,
}

/// A trained forest with its attribute ranking and run sizes.
#[derive(Debug)]
pub struct RandomForestResult {
    forest: RandomForest,
    importances: Vec<RankedAttribute>,
    metadata: TrainingMetadata,
}

impl RandomForestResult {
    pub(crate) fn new(
        forest: RandomForest,
        importances: Vec<RankedAttribute>,
        metadata: TrainingMetadata,
    ) -> Self {
        Self {
            forest,
            importances,
            metadata,
        }
    }

    /// The trained forest, ready for voting.
    #[must_use]
    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }

    /// Drop the ranking and metadata, keeping only the forest.
    #[must_use]
    pub fn into_forest(self) -> RandomForest {
        self.forest
    }

    /// Attributes ordered by normalized weighted gain, most useful first.
    #[must_use]
    pub fn importances(&self) -> &[RankedAttribute] {
        &self.importances
    }

    /// Tree count, input sizes, and per-tree sample sizes of the run.
    #[must_use]
    pub fn metadata(&self) -> &TrainingMetadata {
        &self.metadata
    }
}
