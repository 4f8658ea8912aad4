//! Sentence-length export of a prepared dataset
//!
//! Writes every example into length buckets (by the number of spaces in
//! the sentence) as `headword\tsentence\tdefinition` lines. A sense
//! contributes to a bucket file only when more than two of its examples
//! fall into that bucket.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::config::PartOfSpeech;
use crate::dataset::LexicalDataset;
use crate::Result;

/// Bucket limits: sentences with fewer spaces than the limit belong to it.
const LIMITS: [usize; 3] = [5, 10, 20];

/// Minimum examples a sense needs in a bucket to be written, exclusive.
const MIN_EXAMPLES: usize = 2;

/// Example counts per bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LengthCounts {
    /// Sentences with fewer than 5 spaces
    pub lt_5: usize,
    /// Sentences with fewer than 10 spaces
    pub lt_10: usize,
    /// Sentences with fewer than 20 spaces
    pub lt_20: usize,
    /// All sentences
    pub all: usize,
}

impl std::fmt::Display for LengthCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<=5: {}; <=10: {}; <=20: {}", self.lt_5, self.lt_10, self.lt_20)
    }
}

/// Paths of the four bucket files for `pos` under `dir`.
#[must_use]
pub fn bucket_paths(dir: &Path, pos: PartOfSpeech) -> [PathBuf; 4] {
    [
        dir.join(format!("{pos}_lt_5.txt")),
        dir.join(format!("{pos}_lt_10.txt")),
        dir.join(format!("{pos}_lt_20.txt")),
        dir.join(format!("{pos}_all.txt")),
    ]
}

/// Write the bucket files into `dir`, creating it if needed.
///
/// # Errors
///
/// Returns [`crate::Error::Io`] if the directory or a file cannot be written.
pub fn export_sentence_lengths(
    dataset: &LexicalDataset,
    pos: PartOfSpeech,
    dir: &Path,
) -> Result<LengthCounts> {
    fs::create_dir_all(dir)?;
    let mut writers = Vec::with_capacity(4);
    for path in bucket_paths(dir, pos) {
        writers.push(BufWriter::new(File::create(path)?));
    }

    let mut counts = LengthCounts::default();
    for (headword, senses) in dataset.iter() {
        for sense in senses {
            // 0..3 are the limited buckets, 3 is "all"
            let mut buckets: [Vec<&str>; 4] = Default::default();
            for example in &sense.examples {
                let spaces = example.sentence.matches(' ').count();
                for (bucket, limit) in LIMITS.iter().enumerate() {
                    if spaces < *limit {
                        buckets[bucket].push(&example.sentence);
                    }
                }
                buckets[3].push(&example.sentence);
            }

            counts.lt_5 += buckets[0].len();
            counts.lt_10 += buckets[1].len();
            counts.lt_20 += buckets[2].len();
            counts.all += buckets[3].len();

            for (sentences, writer) in buckets.iter().zip(writers.iter_mut()) {
                if sentences.len() > MIN_EXAMPLES {
                    for sentence in sentences {
                        writeln!(writer, "{headword}\t{sentence}\t{}", sense.definition)?;
                    }
                }
            }
        }
    }

    for writer in &mut writers {
        writer.flush()?;
    }
    info!(dir = %dir.display(), total = counts.all, "exported sentence-length buckets");
    Ok(counts)
}
