//! Outcome counts and classification metrics over a finished classification run.

use std::fmt;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::category::{Category, CategoryCounts};
use crate::error::TreeError;
use crate::example::Example;

/// An immutable snapshot of classification outcomes.
///
/// For each category `c`, `true_positive(c)` counts examples predicted `c`
/// whose actual category is `c`, and `false_positive(c)` counts examples
/// predicted `c` whose actual category differs. Every metric is derived from
/// these counts.
#[derive(Debug, Clone)]
pub struct ClassifierEvaluation {
    example_count: usize,
    true_positive: CategoryCounts,
    false_positive: CategoryCounts,
}

/// Metrics for the `Positive` class plus averaged scores, ready for serialization.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// Number of evaluated examples.
    pub example_count: usize,
    /// Fraction of examples classified correctly.
    pub accuracy: f64,
    /// Precision of the positive class.
    pub precision: f64,
    /// Recall of the positive class.
    pub recall: f64,
    /// F1 score of the positive class.
    pub f1: f64,
    /// Unweighted mean precision over both categories.
    pub macro_precision: f64,
    /// Unweighted mean recall over both categories.
    pub macro_recall: f64,
    /// Pooled precision over both categories.
    pub micro_precision: f64,
    /// Pooled recall over both categories.
    pub micro_recall: f64,
}

impl ClassifierEvaluation {
    /// Snapshot the outcomes of already-classified examples.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnclassifiedExample`] for the first example whose
    /// `predicted` category is still `None`.
    #[instrument(skip_all, fields(n_examples = examples.len()))]
    pub fn from_examples(examples: &[Example]) -> Result<Self, TreeError> {
        let mut true_positive = CategoryCounts::new();
        let mut false_positive = CategoryCounts::new();

        for (index, example) in examples.iter().enumerate() {
            let predicted = example.predicted();
            if !predicted.is_known() {
                return Err(TreeError::UnclassifiedExample { index });
            }
            if predicted == example.actual() {
                true_positive.add(predicted);
            } else {
                false_positive.add(predicted);
            }
        }

        let evaluation = Self {
            example_count: examples.len(),
            true_positive,
            false_positive,
        };
        debug!(accuracy = evaluation.accuracy(), "evaluation snapshot taken");
        Ok(evaluation)
    }

    /// Return the number of evaluated examples.
    #[must_use]
    pub fn example_count(&self) -> usize {
        self.example_count
    }

    /// Return how many examples were correctly predicted as `category`.
    #[must_use]
    pub fn true_positives(&self, category: Category) -> usize {
        self.true_positive.get(category)
    }

    /// Return how many examples were wrongly predicted as `category`.
    #[must_use]
    pub fn false_positives(&self, category: Category) -> usize {
        self.false_positive.get(category)
    }

    /// Examples of `category` that were predicted as some other category.
    fn false_negatives(&self, category: Category) -> usize {
        Category::values()
            .iter()
            .filter(|&&other| other != category)
            .map(|&other| self.false_positive.get(other))
            .sum()
    }

    /// Fraction of examples classified correctly, 0 when nothing was evaluated.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.example_count == 0 {
            return 0.0;
        }
        self.true_positive.total() as f64 / self.example_count as f64
    }

    /// `tp / (tp + fp)` for `category`.
    ///
    /// A category that was never predicted made no wrong predictions, so its
    /// precision is 1.
    #[must_use]
    pub fn precision(&self, category: Category) -> f64 {
        let tp = self.true_positives(category);
        let denominator = tp + self.false_positives(category);
        if denominator == 0 {
            1.0
        } else {
            tp as f64 / denominator as f64
        }
    }

    /// `tp / (tp + fn)` for `category`, 0 when the category has no actual members.
    #[must_use]
    pub fn recall(&self, category: Category) -> f64 {
        let tp = self.true_positives(category);
        let denominator = tp + self.false_negatives(category);
        if denominator == 0 {
            0.0
        } else {
            tp as f64 / denominator as f64
        }
    }

    /// Weighted harmonic mean of precision and recall for `category`.
    ///
    /// `beta > 1` favours recall, `beta < 1` favours precision. Returns 0
    /// whenever the denominator would be 0.
    #[must_use]
    pub fn f_measure(&self, category: Category, beta: f64) -> f64 {
        let precision = self.precision(category);
        let recall = self.recall(category);
        let beta2 = beta * beta;
        let denominator = beta2 * precision + recall;
        if denominator == 0.0 {
            return 0.0;
        }
        (beta2 + 1.0) * precision * recall / denominator
    }

    /// Unweighted mean of per-category precision.
    #[must_use]
    pub fn macro_precision(&self) -> f64 {
        let values = Category::values();
        values.iter().map(|&c| self.precision(c)).sum::<f64>() / values.len() as f64
    }

    /// Unweighted mean of per-category recall.
    #[must_use]
    pub fn macro_recall(&self) -> f64 {
        let values = Category::values();
        values.iter().map(|&c| self.recall(c)).sum::<f64>() / values.len() as f64
    }

    /// Precision pooled over all categories; 1 when no predictions were counted.
    #[must_use]
    pub fn micro_precision(&self) -> f64 {
        let tp = self.true_positive.total();
        let denominator = tp + self.false_positive.total();
        if denominator == 0 {
            1.0
        } else {
            tp as f64 / denominator as f64
        }
    }

    /// Recall pooled over all categories; 0 when no examples were counted.
    #[must_use]
    pub fn micro_recall(&self) -> f64 {
        let tp = self.true_positive.total();
        let denominator: usize = Category::values()
            .iter()
            .map(|&c| self.true_positives(c) + self.false_negatives(c))
            .sum();
        if denominator == 0 {
            0.0
        } else {
            tp as f64 / denominator as f64
        }
    }

    /// Collect the headline metrics (positive class, F1) into a serializable report.
    #[must_use]
    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            example_count: self.example_count,
            accuracy: self.accuracy(),
            precision: self.precision(Category::Positive),
            recall: self.recall(Category::Positive),
            f1: self.f_measure(Category::Positive, 1.0),
            macro_precision: self.macro_precision(),
            macro_recall: self.macro_recall(),
            micro_precision: self.micro_precision(),
            micro_recall: self.micro_recall(),
        }
    }
}

impl fmt::Display for ClassifierEvaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<10} {:>8} {:>8}", "", "tp", "fp")?;
        for &category in Category::values() {
            writeln!(
                f,
                "{:<10} {:>8} {:>8}",
                category,
                self.true_positives(category),
                self.false_positives(category)
            )?;
        }
        write!(
            f,
            "examples={} accuracy={:.4}",
            self.example_count,
            self.accuracy()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build examples with the given actual/predicted label pairs.
    fn classified(actual: &[Category], predicted: &[Category]) -> Vec<Example> {
        actual
            .iter()
            .zip(predicted)
            .map(|(&a, &p)| {
                let mut example = Example::from_text(a, "token").unwrap();
                example.set_predicted(p);
                example
            })
            .collect()
    }

    fn fixture() -> ClassifierEvaluation {
        use Category::{Negative as N, Positive as P};
        let examples = classified(
            &[P, P, P, P, P, N, N, N, N, N],
            &[P, P, P, P, N, P, P, P, N, N],
        );
        ClassifierEvaluation::from_examples(&examples).unwrap()
    }

    #[test]
    fn confusion_fixture_metrics() {
        let eval = fixture();
        assert_eq!(eval.example_count(), 10);
        assert_eq!(eval.true_positives(Category::Positive), 4);
        assert_eq!(eval.false_positives(Category::Positive), 3);
        assert_eq!(eval.true_positives(Category::Negative), 2);
        assert_eq!(eval.false_positives(Category::Negative), 1);

        assert!((eval.accuracy() - 0.6).abs() < 1e-12);
        assert!((eval.precision(Category::Positive) - 0.571_428_571_428_571_4).abs() < 1e-12);
        assert!((eval.recall(Category::Positive) - 0.8).abs() < 1e-12);
        assert!((eval.f_measure(Category::Positive, 1.0) - 0.666_666_666_666_666_6).abs() < 1e-12);
    }

    #[test]
    fn negative_class_and_averages() {
        let eval = fixture();
        // Negative: tp=2, fp=1, fn=3
        assert!((eval.precision(Category::Negative) - 2.0 / 3.0).abs() < 1e-12);
        assert!((eval.recall(Category::Negative) - 0.4).abs() < 1e-12);
        assert!((eval.macro_precision() - (4.0 / 7.0 + 2.0 / 3.0) / 2.0).abs() < 1e-12);
        assert!((eval.macro_recall() - 0.6).abs() < 1e-12);
        assert!((eval.micro_precision() - 0.6).abs() < 1e-12);
        assert!((eval.micro_recall() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn never_predicted_category_has_full_precision() {
        use Category::{Negative as N, Positive as P};
        let eval = ClassifierEvaluation::from_examples(&classified(&[P, N], &[P, P])).unwrap();
        assert_eq!(eval.precision(Category::Negative), 1.0);
        assert_eq!(eval.recall(Category::Negative), 0.0);
    }

    #[test]
    fn category_without_members_has_zero_recall() {
        use Category::Positive as P;
        let eval = ClassifierEvaluation::from_examples(&classified(&[P, P], &[P, P])).unwrap();
        assert_eq!(eval.recall(Category::Negative), 0.0);
        assert_eq!(eval.precision(Category::Negative), 1.0);
        assert_eq!(eval.recall(Category::Positive), 1.0);
    }

    #[test]
    fn f_measure_degenerate_cases() {
        use Category::{Negative as N, Positive as P};
        // Positive never predicted correctly: precision 0, recall 0.
        let eval = ClassifierEvaluation::from_examples(&classified(&[P, N], &[N, P])).unwrap();
        assert_eq!(eval.f_measure(Category::Positive, 1.0), 0.0);

        // beta = 0 with zero recall (no negatives present).
        let eval = ClassifierEvaluation::from_examples(&classified(&[P], &[P])).unwrap();
        assert_eq!(eval.f_measure(Category::Negative, 0.0), 0.0);
    }

    #[test]
    fn f_measure_beta_shifts_weight() {
        let eval = fixture();
        let precision_heavy = eval.f_measure(Category::Positive, 0.5);
        let recall_heavy = eval.f_measure(Category::Positive, 2.0);
        // Recall (0.8) exceeds precision (0.571), so favouring recall scores higher.
        assert!(recall_heavy > precision_heavy);
    }

    #[test]
    fn empty_evaluation() {
        let eval = ClassifierEvaluation::from_examples(&[]).unwrap();
        assert_eq!(eval.accuracy(), 0.0);
        assert_eq!(eval.micro_precision(), 1.0);
        assert_eq!(eval.micro_recall(), 0.0);
    }

    #[test]
    fn unclassified_example_rejected() {
        let mut examples = classified(&[Category::Positive], &[Category::Positive]);
        examples.push(Example::from_text(Category::Negative, "late").unwrap());
        let err = ClassifierEvaluation::from_examples(&examples).unwrap_err();
        assert!(matches!(err, TreeError::UnclassifiedExample { index: 1 }));
    }

    #[test]
    fn report_uses_positive_class() {
        let report = fixture().report();
        assert_eq!(report.example_count, 10);
        assert!((report.recall - 0.8).abs() < 1e-12);
        assert!((report.f1 - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn display_lists_categories() {
        let output = format!("{}", fixture());
        assert!(output.contains("positive"));
        assert!(output.contains("negative"));
        assert!(output.contains("accuracy=0.6000"));
    }
}
