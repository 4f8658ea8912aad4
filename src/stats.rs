//! Aggregate statistics over trial accuracies

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Summary of one run. Computed once, after the last trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Mean trial accuracy
    pub mean: f64,
    /// Best trial accuracy
    pub max: f64,
    /// Worst trial accuracy
    pub min: f64,
    /// Population standard deviation
    pub stddev: f64,
    /// Wall-clock time of the whole run
    pub elapsed_seconds: f64,
}

/// Summarize a non-empty sequence of trial accuracies.
///
/// # Errors
///
/// Returns [`Error::EmptyTrials`] if `trials` is empty.
pub fn summarize(trials: &[f64], elapsed: Duration) -> Result<RunStatistics> {
    if trials.is_empty() {
        return Err(Error::EmptyTrials);
    }

    #[allow(clippy::cast_precision_loss)]
    let n = trials.len() as f64;
    let mean = trials.iter().sum::<f64>() / n;
    let variance = trials.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    let max = trials.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = trials.iter().copied().fold(f64::INFINITY, f64::min);

    Ok(RunStatistics {
        // summation error can push the mean a hair outside [min, max]
        mean: mean.clamp(min, max),
        max,
        min,
        stddev: variance.sqrt(),
        elapsed_seconds: elapsed.as_secs_f64(),
    })
}
