//! # sense-eval: Word-Sense Baseline Evaluation
//!
//! Evaluates baseline strategies for word-sense tasks against a dictionary
//! dataset, repeating each experiment over many randomized sub-samples and
//! reporting aggregate accuracy.
//!
//! Two problem types are supported:
//!
//! - **Grouped**: sort a headword's pooled example sentences back into its
//!   candidate senses.
//! - **One-from-many**: given a sense definition, pick its own example among
//!   examples of the headword's other senses.
//!
//! ## Pipeline
//!
//! ```text
//! EvalConfig ──> LexicalDataset::prepare ──> EvaluationDriver::run
//!                                              │ per trial: select -> test data
//!                                              │            -> predict -> score
//!                                              └──> RunStatistics -> RunReport
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use sense_eval::config::EvalConfig;
//! use sense_eval::dataset::LexicalDataset;
//! use sense_eval::driver::EvaluationDriver;
//!
//! let config = EvalConfig::load_from_file("eval.toml")?;
//! let dataset = LexicalDataset::load("dictionaryData/oxford.json")?.prepare(&config)?;
//! let outcome = EvaluationDriver::new(&config, &dataset, None)?.run()?;
//! println!("Average: {}", outcome.statistics.mean);
//! # Ok::<(), sense_eval::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod baseline;
pub mod config;
pub mod dataset;
pub mod driver;
pub mod embedding;
pub mod error;
pub mod export;
pub mod report;
pub mod sample;
pub mod stats;

pub use error::{Error, Result};
