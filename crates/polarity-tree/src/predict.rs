//! Majority-vote classification for the Random Forest ensemble.

use rayon::iter::{
    IndexedParallelIterator, IntoParallelRefIterator, IntoParallelRefMutIterator, ParallelIterator,
};

use crate::category::{Category, CategoryCounts};
use crate::classifier::Classifier;
use crate::error::TreeError;
use crate::example::Example;
use crate::forest::RandomForest;

impl RandomForest {
    /// Tally each member tree's verdict for `example`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyForest`] when the forest has no trees, or the
    /// first error raised by a member tree.
    pub fn votes(&self, example: &Example) -> Result<CategoryCounts, TreeError> {
        if self.trees.is_empty() {
            return Err(TreeError::EmptyForest);
        }
        self.trees
            .par_iter()
            .try_fold(CategoryCounts::new, |mut counts, tree| {
                counts.add(tree.predict(example)?);
                Ok::<_, TreeError>(counts)
            })
            .try_reduce(CategoryCounts::new, |a, b| Ok(a.merge(b)))
    }
}

impl Classifier for RandomForest {
    /// Majority vote over the member trees; a tied vote goes to `Positive`.
    fn predict(&self, example: &Example) -> Result<Category, TreeError> {
        Ok(self.votes(example)?.most_common())
    }

    /// Classify a batch of examples in parallel.
    fn classify_bulk(&self, examples: &mut [Example]) -> Result<CategoryCounts, TreeError> {
        let verdicts: Vec<Category> = examples
            .par_iter()
            .map(|example| self.predict(example))
            .collect::<Result<_, _>>()?;

        let mut counts = CategoryCounts::new();
        examples
            .par_iter_mut()
            .zip(verdicts.par_iter())
            .for_each(|(example, &category)| example.set_predicted(category));
        for category in verdicts {
            counts.add(category);
        }
        Ok(counts)
    }
}
