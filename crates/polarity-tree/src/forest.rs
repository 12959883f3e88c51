//! Random Forest training with parallel tree construction.

use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, info, instrument};

use crate::config::RandomForestConfig;
use crate::error::TreeError;
use crate::example::Example;
use crate::importance::aggregate_importances;
use crate::result::{RandomForestResult, TrainingMetadata};
use crate::tree::{Id3Config, Id3Tree};

/// A fitted Random Forest: an ensemble of ID3 trees that classifies by majority vote.
#[derive(Debug, Clone)]
pub struct RandomForest {
    pub(crate) trees: Vec<Id3Tree>,
}

impl RandomForest {
    /// Assemble a forest from already-trained trees.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyForest`] if `trees` is empty.
    pub fn from_trees(trees: Vec<Id3Tree>) -> Result<Self, TreeError> {
        if trees.is_empty() {
            return Err(TreeError::EmptyForest);
        }
        Ok(Self { trees })
    }

    /// Return the number of trees in the ensemble.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Borrow the member trees.
    #[must_use]
    pub fn trees(&self) -> &[Id3Tree] {
        &self.trees
    }
}

/// Draw `draw_count` example indices uniformly with replacement.
fn bootstrap_indices(n_examples: usize, draw_count: usize, rng: &mut impl Rng) -> Vec<usize> {
    (0..draw_count).map(|_| rng.gen_range(0..n_examples)).collect()
}

/// Train the Random Forest ensemble.
#[instrument(skip_all, fields(n_trees = config.n_trees, n_examples = examples.len()))]
pub(crate) fn train<A: AsRef<str>>(
    config: &RandomForestConfig,
    examples: &[Example],
    attributes: &[A],
) -> Result<RandomForestResult, TreeError> {
    if !(config.example_fraction > 0.0 && config.example_fraction <= 1.0) {
        return Err(TreeError::InvalidExampleFraction {
            fraction: config.example_fraction,
        });
    }
    let tree_config = Id3Config::new().with_cutoff(config.cutoff);
    tree_config.validate()?;

    let attributes: Vec<&str> = attributes.iter().map(AsRef::as_ref).collect();
    let n_examples = examples.len();
    let n_attributes = attributes.len();
    let examples_per_tree = (n_examples as f64 * config.example_fraction).floor() as usize;
    let attributes_per_tree = config
        .attribute_sampling
        .resolve(n_examples, n_attributes)?;

    info!(
        n_trees = config.n_trees,
        n_examples,
        n_attributes,
        examples_per_tree,
        attributes_per_tree,
        "training random forest"
    );

    // Per-tree seeds come from the master RNG so results do not depend on thread scheduling.
    let mut master_rng = ChaCha8Rng::seed_from_u64(config.seed);
    let tree_seeds: Vec<u64> = (0..config.n_trees).map(|_| master_rng.r#gen()).collect();

    let trees: Vec<Id3Tree> = tree_seeds
        .into_par_iter()
        .map(|seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);

            let sample: Vec<Example> = bootstrap_indices(n_examples, examples_per_tree, &mut rng)
                .into_iter()
                .map(|i| examples[i].copy_of())
                .collect();

            let chosen: Vec<&str> = index::sample(&mut rng, n_attributes, attributes_per_tree)
                .into_iter()
                .map(|i| attributes[i])
                .collect();

            tree_config.fit(&sample, &chosen)
        })
        .collect::<Result<_, _>>()?;

    let per_tree_gains: Vec<_> = trees.iter().map(Id3Tree::attribute_gains).collect();
    let importances = aggregate_importances(&per_tree_gains, &attributes);

    debug!(
        n_trees_trained = trees.len(),
        mean_nodes = trees.iter().map(Id3Tree::n_nodes).sum::<usize>() as f64 / trees.len() as f64,
        "tree training complete"
    );

    let metadata = TrainingMetadata {
        n_trees: config.n_trees,
        n_examples,
        n_attributes,
        examples_per_tree,
        attributes_per_tree,
    };

    info!(
        top_attribute = importances.first().map(|r| r.name.as_str()),
        "random forest training complete"
    );

    Ok(RandomForestResult::new(
        RandomForest { trees },
        importances,
        metadata,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::classifier::Classifier;
    use crate::config::AttributeSampling;

    /// Reviews whose polarity is carried by a handful of sentiment words.
    fn make_reviews() -> (Vec<Example>, Vec<&'static str>) {
        let positive = ["great", "superb", "loved", "fun"];
        let negative = ["awful", "boring", "hated", "dull"];
        let filler = ["movie", "plot", "acting", "the", "film"];

        let mut examples = Vec::new();
        for i in 0..40 {
            let good = positive[i % positive.len()];
            let bad = negative[i % negative.len()];
            let pad = filler[i % filler.len()];
            examples.push(Example::new(Category::Positive, [good, pad, "the"]).unwrap());
            examples.push(Example::new(Category::Negative, [bad, pad, "the"]).unwrap());
        }

        let mut attributes: Vec<&str> = Vec::new();
        attributes.extend(positive);
        attributes.extend(negative);
        attributes.extend(filler);
        (examples, attributes)
    }

    fn training_accuracy(forest: &RandomForest, examples: &[Example]) -> f64 {
        let correct = examples
            .iter()
            .filter(|e| forest.predict(e).unwrap() == e.actual())
            .count();
        correct as f64 / examples.len() as f64
    }

    #[test]
    fn learns_sentiment_words() {
        let (examples, attributes) = make_reviews();
        let result = RandomForestConfig::new(40)
            .unwrap()
            .with_attribute_sampling(AttributeSampling::All)
            .with_seed(42)
            .fit(&examples, &attributes)
            .unwrap();

        assert_eq!(result.forest().n_trees(), 40);
        let accuracy = training_accuracy(result.forest(), &examples);
        assert!(accuracy > 0.9, "accuracy = {accuracy}");
    }

    #[test]
    fn metadata_reflects_sampling() {
        let (examples, attributes) = make_reviews();
        let result = RandomForestConfig::new(5)
            .unwrap()
            .fit(&examples, &attributes)
            .unwrap();
        let meta = result.metadata();
        assert_eq!(meta.n_examples, 80);
        assert_eq!(meta.n_attributes, 13);
        assert_eq!(meta.examples_per_tree, 50);
        // floor(sqrt(80)) = 8
        assert_eq!(meta.attributes_per_tree, 8);
    }

    #[test]
    fn importances_sum_to_one() {
        let (examples, attributes) = make_reviews();
        let result = RandomForestConfig::new(20)
            .unwrap()
            .with_seed(7)
            .fit(&examples, &attributes)
            .unwrap();
        let total: f64 = result.importances().iter().map(|r| r.importance).sum();
        assert!((total - 1.0).abs() < 1e-10, "total = {total}");
        assert_eq!(result.importances().len(), attributes.len());
    }

    #[test]
    fn deterministic_with_same_seed() {
        let (examples, attributes) = make_reviews();
        let fit = || {
            RandomForestConfig::new(15)
                .unwrap()
                .with_seed(99)
                .fit(&examples, &attributes)
                .unwrap()
        };
        let first = fit();
        let second = fit();
        for (a, b) in first.forest().trees().iter().zip(second.forest().trees()) {
            assert_eq!(a.nodes(), b.nodes());
        }
    }

    #[test]
    fn training_leaves_examples_unclassified() {
        let (examples, attributes) = make_reviews();
        RandomForestConfig::new(3)
            .unwrap()
            .fit(&examples, &attributes)
            .unwrap();
        assert!(examples.iter().all(|e| e.predicted() == Category::None));
    }

    #[test]
    fn empty_training_set_yields_fallback_trees() {
        let examples: Vec<Example> = Vec::new();
        let result = RandomForestConfig::new(3)
            .unwrap()
            .fit(&examples, &["good"])
            .unwrap();
        assert_eq!(result.metadata().examples_per_tree, 0);
        let probe = Example::from_text(Category::Negative, "good film").unwrap();
        assert_eq!(result.forest().predict(&probe).unwrap(), Category::Positive);
    }

    #[test]
    fn invalid_example_fraction_error() {
        let (examples, attributes) = make_reviews();
        for fraction in [0.0, 1.5, f64::NAN] {
            let err = RandomForestConfig::new(3)
                .unwrap()
                .with_example_fraction(fraction)
                .fit(&examples, &attributes)
                .unwrap_err();
            assert!(matches!(err, TreeError::InvalidExampleFraction { .. }));
        }
    }

    #[test]
    fn oversized_fixed_attribute_count_error() {
        let (examples, attributes) = make_reviews();
        let err = RandomForestConfig::new(3)
            .unwrap()
            .with_attribute_sampling(AttributeSampling::Fixed(100))
            .fit(&examples, &attributes)
            .unwrap_err();
        assert!(matches!(
            err,
            TreeError::InvalidAttributeCount { requested: 100, available: 13 }
        ));
    }

    #[test]
    fn from_trees_rejects_empty() {
        assert!(matches!(
            RandomForest::from_trees(Vec::new()),
            Err(TreeError::EmptyForest)
        ));
    }
}
