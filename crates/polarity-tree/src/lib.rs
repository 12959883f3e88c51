//! Binary text classification with ID3 decision trees and Random Forests.
//!
//! Documents are bags of sanitized tokens labelled `Positive` or `Negative`.
//! Trees split on token presence by information gain, forests vote over
//! bootstrap-sampled trees trained in parallel via rayon, and
//! [`ClassifierEvaluation`] turns classified examples into accuracy,
//! precision, recall, and F-measure.

mod category;
mod classifier;
mod config;
mod error;
mod evaluation;
mod example;
mod forest;
mod gain;
mod importance;
mod node;
mod predict;
mod result;
mod tree;
mod tuning;

pub use category::{Category, CategoryCounts};
pub use classifier::Classifier;
pub use config::{AttributeSampling, BOOTSTRAP_FRACTION, DEFAULT_TREE_COUNT, RandomForestConfig};
pub use error::TreeError;
pub use evaluation::{ClassifierEvaluation, MetricsReport};
pub use example::{Example, sanitize_token};
pub use forest::RandomForest;
pub use gain::{best_attribute, entropy, information_gain};
pub use importance::RankedAttribute;
pub use node::{Node, NodeIndex};
pub use result::{RandomForestResult, TrainingMetadata};
pub use tree::{DEFAULT_CUTOFF, Id3Config, Id3Tree};
pub use tuning::{CutoffSweep, SweepPoint, SweepResult, TreeCountSweep};
