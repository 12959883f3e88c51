use crate::category::Category;

/// Errors from tree induction, forest voting, and evaluation.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// Returned when n_trees is zero.
    #[error("n_trees must be at least 1, got {n_trees}")]
    InvalidTreeCount {
        /// The invalid n_trees value provided.
        n_trees: usize,
    },

    /// Returned when the early-stop cutoff is not in (0.0, 1.0].
    #[error("cutoff must be in (0.0, 1.0], got {cutoff}")]
    InvalidCutoff {
        /// The invalid cutoff value provided.
        cutoff: f64,
    },

    /// Returned when the per-tree example fraction is not in (0.0, 1.0].
    #[error("example fraction must be in (0.0, 1.0], got {fraction}")]
    InvalidExampleFraction {
        /// The invalid fraction provided.
        fraction: f64,
    },

    /// Returned when a fixed per-tree attribute count exceeds the vocabulary.
    #[error("requested {requested} attributes per tree, but only {available} are available")]
    InvalidAttributeCount {
        /// The requested attribute count.
        requested: usize,
        /// The number of candidate attributes supplied.
        available: usize,
    },

    /// Returned when an example is constructed with the `None` category as its label.
    #[error("an example's actual category must be Positive or Negative, got {category}")]
    UnlabeledExample {
        /// The rejected category.
        category: Category,
    },

    /// Returned when the tree fallback category is `None`.
    #[error("fallback category must be Positive or Negative")]
    InvalidFallback,

    /// Returned when an evaluation input has never been classified.
    #[error("example {index} has not been classified")]
    UnclassifiedExample {
        /// Zero-based position of the offending example.
        index: usize,
    },

    /// Returned when classifying with a tree that has no nodes.
    #[error("decision tree has no nodes")]
    EmptyTree,

    /// Returned when a forest is assembled from zero trees.
    #[error("random forest has no trees")]
    EmptyForest,

    /// Returned when traversal reaches a node index outside the tree.
    #[error("node index {index} is out of bounds for a tree with {n_nodes} nodes")]
    DanglingNode {
        /// The dangling node index.
        index: usize,
        /// Number of nodes in the tree.
        n_nodes: usize,
    },

    /// Returned when a parameter sweep is given no values to try.
    #[error("parameter sweep has no values to evaluate")]
    EmptySweep,
}
