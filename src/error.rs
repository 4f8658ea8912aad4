//! Error types for sense-eval
//!
//! Every failure surfaces to the entry point; nothing below the driver
//! recovers or skips work.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// sense-eval error types
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or missing configuration parameter
    #[error("Config not valid: {0}")]
    Config(String),

    /// Method name not recognised for the selected problem type
    #[error("Unknown baseline method '{method}' for {problem} evaluation")]
    UnknownMethod {
        /// Problem type the method was requested for
        problem: &'static str,
        /// The rejected method name
        method: String,
    },

    /// Embedding-based method selected without a model
    #[error("Method '{0}' requires a word2vec model but none was supplied")]
    MissingModel(String),

    /// Dictionary file could not be located
    #[error("{} can not be found in the dictionary data directory", path.display())]
    DatasetNotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// Dataset too small after filtering
    #[error("Insufficient data to run evaluation: {0}")]
    InsufficientData(String),

    /// A single trial failed; the whole run is aborted
    #[error("Trial {trial} failed: {reason}")]
    Trial {
        /// Zero-based trial index
        trial: usize,
        /// What went wrong
        reason: String,
    },

    /// Statistics requested over zero trials
    #[error("No trial results to summarise (zero trials were run)")]
    EmptyTrials,

    /// Embedding model loading or arithmetic failure
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML config parse error, reduced to one line with its position
    #[error("Config parse error: {0}")]
    Toml(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error was raised before any trial could run.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::UnknownMethod { .. } | Self::MissingModel(_) | Self::Toml(_)
        )
    }
}
