//! sense-eval CLI - run a baseline evaluation described by a config file.
//!
//! # Usage
//!
//! ```bash
//! sense-eval eval.toml
//! sense-eval eval.toml --data-dir ./dictionaryData --json
//! sense-eval eval.toml --export-lengths ./lengths -v
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sense_eval::config::EvalConfig;
use sense_eval::dataset::LexicalDataset;
use sense_eval::driver::EvaluationDriver;
use sense_eval::embedding::EmbeddingModel;
use sense_eval::export::export_sentence_lengths;
use sense_eval::report::RunReport;

/// Evaluate word-sense baselines over repeated random trials.
#[derive(Parser)]
#[command(name = "sense-eval", version, about)]
struct Cli {
    /// TOML config with an [evaluation_params] table
    config: PathBuf,

    /// Directory holding the dictionary files
    #[arg(long, default_value = "dictionaryData")]
    data_dir: PathBuf,

    /// Print the full run report as JSON instead of the summary lines
    #[arg(long)]
    json: bool,

    /// Write sentence-length bucket files for the prepared dataset into DIR
    #[arg(long, value_name = "DIR")]
    export_lengths: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default = if cli.verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("[ERROR] - {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = EvalConfig::load_from_file(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    let dataset = LexicalDataset::load(cli.data_dir.join(&config.dictionary))?.prepare(&config)?;

    if let Some(dir) = &cli.export_lengths {
        let counts = export_sentence_lengths(&dataset, config.pos, dir)
            .with_context(|| format!("failed to export sentence lengths to {}", dir.display()))?;
        println!("{counts}");
    }

    let model = match &config.word2vec_bin {
        Some(path) if config.task.requires_embeddings() => Some(
            EmbeddingModel::load(path)
                .with_context(|| format!("failed to load word2vec model {}", path.display()))?,
        ),
        _ => None,
    };

    let driver = EvaluationDriver::new(&config, &dataset, model.as_ref())?;
    let started_at = Utc::now();
    let outcome = driver.run()?;
    let report = RunReport::new(&config, &outcome, started_at, Utc::now());

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        println!("{report}");
    }
    Ok(())
}
