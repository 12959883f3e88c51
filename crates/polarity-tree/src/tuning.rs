//! Hyperparameter sweeps scored on a held-out example set.

use serde::Serialize;
use tracing::{info, instrument};

use crate::classifier::Classifier;
use crate::config::RandomForestConfig;
use crate::error::TreeError;
use crate::evaluation::{ClassifierEvaluation, MetricsReport};
use crate::example::Example;
use crate::tree::Id3Config;

/// One evaluated point of a sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepPoint<T> {
    /// The parameter value that was tried.
    pub value: T,
    /// Held-out metrics for the model trained with `value`.
    pub metrics: MetricsReport,
}

/// Every point of a sweep plus the best one by held-out accuracy.
#[derive(Debug, Clone, Serialize)]
pub struct SweepResult<T> {
    points: Vec<SweepPoint<T>>,
    best: usize,
}

impl<T: Copy> SweepResult<T> {
    /// Pick the earliest point with the highest accuracy.
    fn from_points(points: Vec<SweepPoint<T>>) -> Result<Self, TreeError> {
        let mut best: Option<usize> = None;
        for (i, point) in points.iter().enumerate() {
            if best.is_none_or(|b| point.metrics.accuracy > points[b].metrics.accuracy) {
                best = Some(i);
            }
        }
        let best = best.ok_or(TreeError::EmptySweep)?;
        Ok(Self { points, best })
    }

    /// Return every evaluated point in grid order.
    #[must_use]
    pub fn points(&self) -> &[SweepPoint<T>] {
        &self.points
    }

    /// Return the best point.
    #[must_use]
    pub fn best(&self) -> &SweepPoint<T> {
        &self.points[self.best]
    }

    /// Return the best parameter value.
    #[must_use]
    pub fn best_value(&self) -> T {
        self.best().value
    }
}

/// Classify copies of `held_out` and snapshot the outcome.
fn score<C: Classifier>(
    model: &C,
    held_out: &[Example],
) -> Result<ClassifierEvaluation, TreeError> {
    let mut scored: Vec<Example> = held_out.iter().map(Example::copy_of).collect();
    model.classify_bulk(&mut scored)?;
    ClassifierEvaluation::from_examples(&scored)
}

/// Sweep over ID3 early-stop cutoffs.
///
/// The default grid is 0.70, 0.71, ..., 0.99.
#[derive(Debug, Clone)]
pub struct CutoffSweep {
    cutoffs: Vec<f64>,
}

impl CutoffSweep {
    /// Create a sweep over the default cutoff grid.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cutoffs: (70..=99u32).map(|i| f64::from(i) / 100.0).collect(),
        }
    }

    /// Replace the cutoff grid.
    #[must_use]
    pub fn with_cutoffs(mut self, cutoffs: Vec<f64>) -> Self {
        self.cutoffs = cutoffs;
        self
    }

    /// Return the cutoff grid.
    #[must_use]
    pub fn cutoffs(&self) -> &[f64] {
        &self.cutoffs
    }

    /// Train one tree per cutoff on `train` and score it on `held_out`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptySweep`] for an empty grid,
    /// [`TreeError::InvalidCutoff`] for an out-of-range grid value.
    #[instrument(skip_all, fields(n_values = self.cutoffs.len(), n_train = train.len()))]
    pub fn run<A: AsRef<str>>(
        &self,
        train: &[Example],
        held_out: &[Example],
        attributes: &[A],
    ) -> Result<SweepResult<f64>, TreeError> {
        let mut points = Vec::with_capacity(self.cutoffs.len());
        for &cutoff in &self.cutoffs {
            let tree = Id3Config::new().with_cutoff(cutoff).fit(train, attributes)?;
            let metrics = score(&tree, held_out)?.report();
            info!(
                cutoff,
                accuracy = metrics.accuracy,
                n_nodes = tree.n_nodes(),
                "cutoff evaluated"
            );
            points.push(SweepPoint { value: cutoff, metrics });
        }
        SweepResult::from_points(points)
    }
}

impl Default for CutoffSweep {
    fn default() -> Self {
        Self::new()
    }
}

/// Sweep over Random Forest sizes.
///
/// The default grid is 70, 75, ..., 200; every other setting comes from the
/// base configuration.
#[derive(Debug, Clone)]
pub struct TreeCountSweep {
    base: RandomForestConfig,
    counts: Vec<usize>,
}

impl TreeCountSweep {
    /// Create a sweep over the default tree-count grid.
    #[must_use]
    pub fn new(base: RandomForestConfig) -> Self {
        Self {
            base,
            counts: (70..=200).step_by(5).collect(),
        }
    }

    /// Replace the tree-count grid.
    #[must_use]
    pub fn with_counts(mut self, counts: Vec<usize>) -> Self {
        self.counts = counts;
        self
    }

    /// Return the tree-count grid.
    #[must_use]
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Train one forest per tree count on `train` and score it on `held_out`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptySweep`] for an empty grid, or any error
    /// from forest training.
    #[instrument(skip_all, fields(n_values = self.counts.len(), n_train = train.len()))]
    pub fn run<A: AsRef<str>>(
        &self,
        train: &[Example],
        held_out: &[Example],
        attributes: &[A],
    ) -> Result<SweepResult<usize>, TreeError> {
        let mut points = Vec::with_capacity(self.counts.len());
        for &n_trees in &self.counts {
            let result = self.base.clone().with_n_trees(n_trees)?.fit(train, attributes)?;
            let metrics = score(result.forest(), held_out)?.report();
            info!(n_trees, accuracy = metrics.accuracy, "tree count evaluated");
            points.push(SweepPoint { value: n_trees, metrics });
        }
        SweepResult::from_points(points)
    }
}
