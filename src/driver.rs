//! Evaluation driver
//!
//! Runs a fixed number of independent trials of one (problem type, method)
//! combination over a prepared dataset and aggregates their accuracies.
//!
//! ```text
//! for trial in 0..iterations:
//!     dataset ──select──> sample ──build──> test data ──predict──> selections
//!                                                  └──────score──────┘ -> accuracy
//! accuracies ──summarize──> RunStatistics
//! ```
//!
//! The random generator is owned by the run: it is seeded once before the
//! first trial and threaded by reference through sampling and any stochastic
//! predictor, so equal seeds give equal trials.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::baseline::{grouped, ofm, GroupedStrategy, OfmStrategy, GROUP_SIZE};
use crate::config::{AccuracyMeasure, EvalConfig, SampleShape, Task};
use crate::dataset::LexicalDataset;
use crate::embedding::EmbeddingModel;
use crate::sample::{create_grouped_test_data, create_ofm_data, select_examples_and_senses};
use crate::stats::{summarize, RunStatistics};
use crate::{Error, Result};

/// A task bound to its executable predictor.
#[derive(Debug, Clone, Copy)]
pub enum Strategy<'m> {
    /// Grouped evaluation
    Grouped {
        /// Predictor
        predictor: GroupedStrategy<'m>,
        /// Scoring function
        measure: AccuracyMeasure,
    },
    /// One-from-many evaluation
    OneFromMany(OfmStrategy<'m>),
}

impl<'m> Strategy<'m> {
    /// Resolve `task` against the optional model.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingModel`] if the method needs a model and none
    /// was supplied.
    pub fn resolve(task: Task, model: Option<&'m EmbeddingModel>) -> Result<Self> {
        match task {
            Task::Grouped { method, measure } => Ok(Self::Grouped {
                predictor: GroupedStrategy::resolve(method, model)?,
                measure,
            }),
            Task::OneFromMany { method } => {
                Ok(Self::OneFromMany(OfmStrategy::resolve(method, model)?))
            }
        }
    }
}

/// Per-trial accuracies and their summary.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// Accuracy of every trial, in run order
    pub trials: Vec<f64>,
    /// Summary over `trials`
    pub statistics: RunStatistics,
}

/// Runs the configured trials.
#[derive(Debug, Clone)]
pub struct EvaluationDriver<'a> {
    dataset: &'a LexicalDataset,
    shape: SampleShape,
    iterations: usize,
    seed: u64,
    task: Task,
    strategy: Strategy<'a>,
    group_size: usize,
}

impl<'a> EvaluationDriver<'a> {
    /// Build a driver for `config` over a prepared dataset.
    ///
    /// All configuration problems surface here, before any trial runs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for zero iterations and
    /// [`Error::MissingModel`] if the method needs a model that was not given.
    pub fn new(
        config: &EvalConfig,
        dataset: &'a LexicalDataset,
        model: Option<&'a EmbeddingModel>,
    ) -> Result<Self> {
        if config.iterations == 0 {
            return Err(Error::Config("testIterations must be at least 1".to_string()));
        }
        Ok(Self {
            dataset,
            shape: config.shape,
            iterations: config.iterations,
            seed: config.seed,
            task: config.task,
            strategy: Strategy::resolve(config.task, model)?,
            group_size: GROUP_SIZE,
        })
    }

    /// Override the grouped capacity per sense.
    #[must_use]
    pub const fn with_group_size(mut self, group_size: usize) -> Self {
        self.group_size = group_size;
        self
    }

    /// Run all trials with a generator seeded from the config.
    ///
    /// # Errors
    ///
    /// See [`EvaluationDriver::run_with_rng`].
    pub fn run(&self) -> Result<RunOutcome> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        self.run_with_rng(&mut rng)
    }

    /// Run all trials drawing from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientData`] if the dataset cannot supply a
    /// sample, and [`Error::Trial`] if a trial yields no instances, fails to
    /// predict or score, or produces an accuracy outside `[0, 1]`.
    pub fn run_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<RunOutcome> {
        if self.dataset.is_empty() {
            return Err(Error::InsufficientData(
                "the prepared dataset has no entries".to_string(),
            ));
        }

        info!(
            task = %self.task,
            iterations = self.iterations,
            entries = self.dataset.len(),
            seed = self.seed,
            "starting evaluation run"
        );
        let started = Instant::now();

        let mut trials = Vec::with_capacity(self.iterations);
        for trial in 0..self.iterations {
            let accuracy = self.run_trial(trial, rng)?;
            debug!(trial, accuracy, "trial complete");
            trials.push(accuracy);
        }

        let statistics = summarize(&trials, started.elapsed())?;
        info!(
            mean = statistics.mean,
            stddev = statistics.stddev,
            seconds = statistics.elapsed_seconds,
            "evaluation run finished"
        );
        Ok(RunOutcome { trials, statistics })
    }

    fn run_trial<R: Rng + ?Sized>(&self, trial: usize, rng: &mut R) -> Result<f64> {
        let selected = select_examples_and_senses(self.dataset, self.shape, rng)?;
        let trial_error = |reason: String| Error::Trial { trial, reason };

        let accuracy = match self.strategy {
            Strategy::Grouped { predictor, measure } => {
                let data = create_grouped_test_data(&selected, rng);
                if data.is_empty() {
                    return Err(trial_error("sample produced no grouped instances".to_string()));
                }
                let selections = predictor
                    .select(&data, self.group_size, rng)
                    .map_err(|e| trial_error(e.to_string()))?;
                match measure {
                    AccuracyMeasure::Total => grouped::calculate_accuracy(&selections, &data),
                    AccuracyMeasure::Pairs => grouped::calculate_accuracy_pairs(&selections, &data),
                }
            }
            Strategy::OneFromMany(predictor) => {
                let data = create_ofm_data(&selected, rng)?;
                if data.is_empty() {
                    return Err(trial_error(
                        "sample produced no one-from-many instances".to_string(),
                    ));
                }
                let selections = predictor
                    .select(&data, rng)
                    .map_err(|e| trial_error(e.to_string()))?;
                ofm::calculate_accuracy(&selections, &data)
            }
        }
        .map_err(|e| trial_error(e.to_string()))?;

        if !(0.0..=1.0).contains(&accuracy) {
            return Err(trial_error(format!("accuracy {accuracy} outside [0, 1]")));
        }
        Ok(accuracy)
    }
}
