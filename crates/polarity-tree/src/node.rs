use std::fmt;

use crate::category::Category;

/// Index into a `Vec<Node>` arena, identifying a specific node in a decision tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node in an ID3 decision tree arena.
///
/// Children are referenced by [`NodeIndex`] into the owning tree's node
/// vector. A `Split` always has exactly two children; a `Leaf` always holds
/// a real category.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An internal node testing whether a token is present.
    Split {
        /// The token tested at this node.
        attribute: String,
        /// Child followed when the token is present.
        present: NodeIndex,
        /// Child followed when the token is absent.
        absent: NodeIndex,
        /// Information gain of the test over the examples that reached this node.
        gain: f64,
        /// Number of training examples that reached this node.
        n_examples: usize,
    },
    /// A terminal node.
    Leaf {
        /// The category assigned to examples reaching this leaf.
        category: Category,
        /// Number of training examples that reached this leaf.
        n_examples: usize,
    },
}

impl Node {
    /// Return the number of training examples that reached this node.
    #[must_use]
    pub fn n_examples(&self) -> usize {
        match self {
            Node::Split { n_examples, .. } | Node::Leaf { n_examples, .. } => *n_examples,
        }
    }

    /// Return `true` if this node is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Return the leaf category, or `None` for a split.
    #[must_use]
    pub fn category(&self) -> Option<Category> {
        match self {
            Node::Leaf { category, .. } => Some(*category),
            Node::Split { .. } => None,
        }
    }
}
