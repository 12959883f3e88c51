use crate::category::{Category, CategoryCounts};
use crate::error::TreeError;
use crate::example::Example;

/// A trained model that assigns a [`Category`] to an [`Example`].
pub trait Classifier {
    /// Return the category this model assigns to `example`, without recording it.
    ///
    /// # Errors
    ///
    /// Returns an error when the model is structurally invalid (no trees,
    /// no nodes, or a dangling child reference).
    fn predict(&self, example: &Example) -> Result<Category, TreeError>;

    /// Classify `example` and record the verdict in its `predicted` field.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Classifier::predict`]; the example is left
    /// untouched in that case.
    fn classify(&self, example: &mut Example) -> Result<Category, TreeError> {
        let category = self.predict(example)?;
        example.set_predicted(category);
        Ok(category)
    }

    /// Classify every example and count the verdicts per category.
    ///
    /// # Errors
    ///
    /// Stops at the first example that fails to classify.
    fn classify_bulk(&self, examples: &mut [Example]) -> Result<CategoryCounts, TreeError> {
        let mut counts = CategoryCounts::new();
        for example in examples {
            counts.add(self.classify(example)?);
        }
        Ok(counts)
    }
}
