use std::borrow::Borrow;
use std::collections::{BTreeMap, VecDeque};

use tracing::{debug, instrument};

use crate::{
    Category, CategoryCounts, Classifier, Example, TreeError,
    gain::best_attribute,
    node::{Node, NodeIndex},
};

/// Default subset ratio above which tree growth stops early.
pub const DEFAULT_CUTOFF: f64 = 0.95;

/// Configuration for a single ID3 decision tree.
///
/// Construct via [`Id3Config::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter  | Default    |
/// |------------|------------|
/// | `cutoff`   | 0.95       |
/// | `fallback` | `Positive` |
#[derive(Debug, Clone)]
pub struct Id3Config {
    pub(crate) cutoff: f64,
    pub(crate) fallback: Category,
}

impl Id3Config {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
            fallback: Category::Positive,
        }
    }

    /// Set the early-stop cutoff.
    ///
    /// When either side of a split would receive more than `cutoff` of the
    /// examples at a node, the whole node becomes a majority leaf instead.
    #[must_use]
    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Set the category used for the root when there are no training examples.
    #[must_use]
    pub fn with_fallback(mut self, fallback: Category) -> Self {
        self.fallback = fallback;
        self
    }

    /// Return the early-stop cutoff.
    #[must_use]
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Return the empty-training-set fallback category.
    #[must_use]
    pub fn fallback(&self) -> Category {
        self.fallback
    }

    /// Train an ID3 tree on `examples`, splitting on the candidate `attributes`.
    ///
    /// An empty example set yields a single leaf holding the fallback
    /// category; an empty attribute set yields a single majority leaf.
    ///
    /// # Errors
    ///
    /// | Variant                          | When                               |
    /// |----------------------------------|------------------------------------|
    /// | [`TreeError::InvalidCutoff`]     | `cutoff` is not in (0.0, 1.0]      |
    /// | [`TreeError::InvalidFallback`]   | `fallback` is [`Category::None`]   |
    #[instrument(skip_all, fields(n_examples = examples.len(), n_attributes = attributes.len()))]
    pub fn fit<E, A>(&self, examples: &[E], attributes: &[A]) -> Result<Id3Tree, TreeError>
    where
        E: Borrow<Example>,
        A: AsRef<str>,
    {
        self.validate()?;

        let examples: Vec<&Example> = examples.iter().map(<E as Borrow<Example>>::borrow).collect();
        let attributes: Vec<&str> = attributes.iter().map(AsRef::as_ref).collect();

        let mut arena: Vec<Node> = Vec::new();
        let root = build_tree(&examples, &attributes, self.fallback, self.cutoff, &mut arena);
        debug_assert_eq!(root.index(), 0);

        let tree = Id3Tree { nodes: arena };
        debug!(n_nodes = tree.n_nodes(), depth = tree.depth(), "id3 tree built");
        Ok(tree)
    }
}

impl Id3Config {
    pub(crate) fn validate(&self) -> Result<(), TreeError> {
        if !(self.cutoff > 0.0 && self.cutoff <= 1.0) {
            return Err(TreeError::InvalidCutoff { cutoff: self.cutoff });
        }
        if !self.fallback.is_known() {
            return Err(TreeError::InvalidFallback);
        }
        Ok(())
    }
}

impl Default for Id3Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Recursively grow the tree for one partition of the examples.
///
/// Returns the [`NodeIndex`] of the node just created in `arena`. The
/// checks run in a fixed order: empty partition, pure partition, no
/// attributes left, then split. During the split, if either side holds
/// more than `cutoff` of the examples, everything grown for this node is
/// discarded and the node becomes a majority leaf, even when the other
/// side has not been examined yet.
fn build_tree(
    examples: &[&Example],
    attributes: &[&str],
    fallback: Category,
    cutoff: f64,
    arena: &mut Vec<Node>,
) -> NodeIndex {
    let n_examples = examples.len();
    let push_leaf = |arena: &mut Vec<Node>, category: Category| -> NodeIndex {
        let idx = arena.len();
        arena.push(Node::Leaf { category, n_examples });
        NodeIndex::new(idx)
    };

    if examples.is_empty() {
        return push_leaf(arena, fallback);
    }

    let counts: CategoryCounts = examples.iter().map(|e| e.actual()).collect();
    if let Some(category) = counts.unanimous() {
        return push_leaf(arena, category);
    }
    let most_common = counts.most_common();

    let Some((best, gain)) = best_attribute(attributes, examples) else {
        return push_leaf(arena, most_common);
    };

    // Reserve the index, recurse, then overwrite the placeholder with the split.
    let node_idx = arena.len();
    arena.push(Node::Leaf {
        category: most_common,
        n_examples,
    });

    let remaining: Vec<&str> = attributes.iter().copied().filter(|&a| a != best).collect();
    let mut children = [NodeIndex::new(node_idx); 2];

    for (slot, present) in [true, false].into_iter().enumerate() {
        let subset: Vec<&Example> = examples
            .iter()
            .copied()
            .filter(|e| e.contains(best) == present)
            .collect();

        if subset.len() as f64 / n_examples as f64 > cutoff {
            arena.truncate(node_idx);
            return push_leaf(arena, most_common);
        }

        children[slot] = build_tree(&subset, &remaining, most_common, cutoff, arena);
    }

    arena[node_idx] = Node::Split {
        attribute: best.to_string(),
        present: children[0],
        absent: children[1],
        gain,
        n_examples,
    };

    NodeIndex::new(node_idx)
}

/// A fitted ID3 decision tree.
///
/// Stored as an arena-based `Vec<Node>` with the root at index 0. Immutable
/// once built.
#[derive(Debug, Clone)]
pub struct Id3Tree {
    pub(crate) nodes: Vec<Node>,
}

impl Id3Tree {
    /// Return the root node, if the tree has any nodes.
    #[must_use]
    pub fn root(&self) -> Option<&Node> {
        self.nodes.first()
    }

    /// Return every node in arena order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return the total number of nodes in the tree (both splits and leaves).
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of leaf nodes.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Return the maximum depth of the tree.
    ///
    /// A single-node tree (just a root leaf) has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }

        let mut max_depth = 0usize;
        let mut queue = VecDeque::new();
        queue.push_back((0usize, 0usize));

        while let Some((node_idx, d)) = queue.pop_front() {
            match self.nodes.get(node_idx) {
                Some(Node::Split { present, absent, .. }) => {
                    queue.push_back((present.index(), d + 1));
                    queue.push_back((absent.index(), d + 1));
                }
                Some(Node::Leaf { .. }) | None => max_depth = max_depth.max(d),
            }
        }

        max_depth
    }

    /// Sum `gain * examples reaching the split` for every attribute the tree tests.
    #[must_use]
    pub fn attribute_gains(&self) -> BTreeMap<&str, f64> {
        let mut totals = BTreeMap::new();
        for node in &self.nodes {
            if let Node::Split {
                attribute,
                gain,
                n_examples,
                ..
            } = node
            {
                *totals.entry(attribute.as_str()).or_insert(0.0) += gain * *n_examples as f64;
            }
        }
        totals
    }
}

impl Classifier for Id3Tree {
    /// Walk from the root, following the `present` child when the example
    /// contains the tested token and the `absent` child otherwise.
    fn predict(&self, example: &Example) -> Result<Category, TreeError> {
        if self.nodes.is_empty() {
            return Err(TreeError::EmptyTree);
        }
        let mut idx = 0usize;
        loop {
            match self.nodes.get(idx) {
                Some(Node::Leaf { category, .. }) => return Ok(*category),
                Some(Node::Split {
                    attribute,
                    present,
                    absent,
                    ..
                }) => {
                    idx = if example.contains(attribute) {
                        present.index()
                    } else {
                        absent.index()
                    };
                }
                None => {
                    return Err(TreeError::DanglingNode {
                        index: idx,
                        n_nodes: self.nodes.len(),
                    });
                }
            }
        }
    }
}
