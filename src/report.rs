//! Run report - one evaluation run with its per-trial accuracies
//!
//! ```text
//! RunReport (1) ──< TrialRecord (iterations)
//!      └── RunStatistics
//! ```
//!
//! The text rendering is the tool's stdout contract: four statistics lines
//! followed by the elapsed time.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EvalConfig;
use crate::driver::RunOutcome;
use crate::stats::RunStatistics;
use crate::Result;

/// Accuracy of a single trial.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TrialRecord {
    /// Zero-based trial index
    pub trial: usize,
    /// Trial accuracy in `[0, 1]`
    pub accuracy: f64,
}

/// A finished evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    run_id: String,
    task: String,
    dictionary: String,
    seed: u64,
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
    trials: Vec<TrialRecord>,
    statistics: RunStatistics,
}

impl RunReport {
    /// Assemble a report from a driver outcome.
    ///
    /// The run id is derived from the start time.
    #[must_use]
    pub fn new(
        config: &EvalConfig,
        outcome: &RunOutcome,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
    ) -> Self {
        Self {
            run_id: format!("run-{}", started_at.format("%Y%m%dT%H%M%S%.3fZ")),
            task: config.task.to_string(),
            dictionary: config.dictionary.display().to_string(),
            seed: config.seed,
            started_at,
            ended_at,
            trials: outcome
                .trials
                .iter()
                .enumerate()
                .map(|(trial, &accuracy)| TrialRecord { trial, accuracy })
                .collect(),
            statistics: outcome.statistics,
        }
    }

    /// Get the run ID.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Problem type and method, e.g. `grouped/wordCrossover/Total`.
    #[must_use]
    pub fn task(&self) -> &str {
        &self.task
    }

    /// Dictionary the run evaluated.
    #[must_use]
    pub fn dictionary(&self) -> &str {
        &self.dictionary
    }

    /// Seed of the run's random generator.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// When the run started.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// When the run ended.
    #[must_use]
    pub const fn ended_at(&self) -> DateTime<Utc> {
        self.ended_at
    }

    /// Per-trial records, in run order.
    #[must_use]
    pub fn trials(&self) -> &[TrialRecord] {
        &self.trials
    }

    /// Summary statistics.
    #[must_use]
    pub const fn statistics(&self) -> &RunStatistics {
        &self.statistics
    }

    /// Serialize as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a report previously written by [`RunReport::to_json`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] if `json` is not a valid report.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.statistics;
        writeln!(f, "Average: {}", s.mean)?;
        writeln!(f, "Maximum: {}", s.max)?;
        writeln!(f, "Minimum: {}", s.min)?;
        writeln!(f, "Standard deviation: {}", s.stddev)?;
        write!(f, "{} seconds", s.elapsed_seconds)
    }
}
