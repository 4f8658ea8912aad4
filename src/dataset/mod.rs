//! Lexical dataset loading and preparation
//!
//! Dictionary files are JSON objects mapping a headword to its senses:
//!
//! ```json
//! {
//!   "bank": [
//!     { "def": "land alongside a river", "pos": "noun",
//!       "examples": [ { "sent": "We sat on the bank of the river." } ] }
//!   ]
//! }
//! ```
//!
//! Preparation is a fixed pipeline; each stage consumes the dataset and
//! returns the filtered/normalized result:
//!
//! ```text
//! select_pos -> remove_words_with_too_few_senses -> examples_to_lower_case
//!            -> tokenize_and_lemmatize -> remove_stopwords_and_punct
//! ```
//!
//! After preparation the dataset is never mutated again; trials borrow it.

pub mod preprocess;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{EvalConfig, PartOfSpeech, PreprocessOptions, SampleShape};
use crate::{Error, Result};

/// One usage example of a sense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleUsage {
    /// Example sentence
    #[serde(rename = "sent")]
    pub sentence: String,
    /// Normalized tokens, filled in by preparation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tokens: Vec<String>,
}

impl ExampleUsage {
    /// Create an example from its sentence.
    #[must_use]
    pub fn new(sentence: impl Into<String>) -> Self {
        Self {
            sentence: sentence.into(),
            tokens: Vec::new(),
        }
    }
}

/// One sense of a headword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenseRecord {
    /// Dictionary definition
    #[serde(rename = "def")]
    pub definition: String,
    /// Part-of-speech tag, if the dictionary provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<String>,
    /// Usage examples
    #[serde(default)]
    pub examples: Vec<ExampleUsage>,
    /// Normalized definition tokens, filled in by preparation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub definition_tokens: Vec<String>,
}

impl SenseRecord {
    /// Create a sense from a definition and example sentences.
    #[must_use]
    pub fn new<I, S>(definition: impl Into<String>, examples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            definition: definition.into(),
            pos: None,
            examples: examples.into_iter().map(ExampleUsage::new).collect(),
            definition_tokens: Vec::new(),
        }
    }

    /// Set the part-of-speech tag.
    #[must_use]
    pub fn with_pos(mut self, pos: impl Into<String>) -> Self {
        self.pos = Some(pos.into());
        self
    }
}

/// Headword -> senses, in deterministic (sorted) order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LexicalDataset {
    entries: BTreeMap<String, Vec<SenseRecord>>,
}

impl LexicalDataset {
    /// Create an empty dataset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, headword: impl Into<String>, senses: Vec<SenseRecord>) {
        self.entries.insert(headword.into(), senses);
    }

    /// Load a dictionary JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatasetNotFound`] if the file does not exist and
    /// [`Error::Json`] if it is not a valid dictionary.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::DatasetNotFound {
                path: path.to_path_buf(),
            },
            _ => Error::Io(e),
        })?;
        let dataset: Self = serde_json::from_reader(BufReader::new(file))?;
        info!(
            path = %path.display(),
            entries = dataset.len(),
            senses = dataset.sense_count(),
            "loaded dictionary"
        );
        Ok(dataset)
    }

    /// Run the full preparation pipeline for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientData`] if no entry survives filtering.
    pub fn prepare(self, config: &EvalConfig) -> Result<Self> {
        self.prepare_with(config.pos, config.shape, config.preprocess)
    }

    /// Run the full preparation pipeline with explicit parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientData`] if no entry survives filtering.
    pub fn prepare_with(
        self,
        pos: PartOfSpeech,
        shape: SampleShape,
        options: PreprocessOptions,
    ) -> Result<Self> {
        let prepared = self
            .select_pos(pos)
            .remove_words_with_too_few_senses(shape.senses_per_entry, shape.examples_per_sense)
            .examples_to_lower_case()
            .tokenize_and_lemmatize(options.lemmatize)
            .remove_stopwords_and_punct(options.remove_stopwords, options.remove_punctuation);

        if prepared.is_empty() {
            return Err(Error::InsufficientData(format!(
                "no {pos} entries with at least {} senses of {} examples; \
                 try lowering numOfSenses or numOfExamp",
                shape.senses_per_entry, shape.examples_per_sense
            )));
        }
        info!(
            entries = prepared.len(),
            senses = prepared.sense_count(),
            "prepared dataset"
        );
        Ok(prepared)
    }

    /// Keep only senses tagged with `pos`; drop entries left empty.
    #[must_use]
    pub fn select_pos(mut self, pos: PartOfSpeech) -> Self {
        for senses in self.entries.values_mut() {
            senses.retain(|s| pos.matches(s.pos.as_deref()));
        }
        self.entries.retain(|_, senses| !senses.is_empty());
        if self.is_empty() {
            warn!(%pos, "no senses left after part-of-speech filter");
        }
        self
    }

    /// Drop senses with fewer than `min_examples` examples, then entries with
    /// fewer than `min_senses` remaining senses.
    #[must_use]
    pub fn remove_words_with_too_few_senses(mut self, min_senses: usize, min_examples: usize) -> Self {
        for senses in self.entries.values_mut() {
            senses.retain(|s| s.examples.len() >= min_examples);
        }
        self.entries.retain(|_, senses| senses.len() >= min_senses);
        self
    }

    /// Lower-case every example sentence.
    #[must_use]
    pub fn examples_to_lower_case(mut self) -> Self {
        for example in self.examples_mut() {
            example.sentence = example.sentence.to_lowercase();
        }
        self
    }

    /// Tokenize examples and definitions, optionally lemmatizing.
    ///
    /// Definitions are lower-cased here as well so they compare with
    /// lower-cased example tokens.
    #[must_use]
    pub fn tokenize_and_lemmatize(mut self, lemmatize: bool) -> Self {
        let normalize = |text: &str| -> Vec<String> {
            preprocess::tokenize(text)
                .into_iter()
                .map(|t| {
                    let t = t.to_lowercase();
                    if lemmatize {
                        preprocess::lemmatize(&t)
                    } else {
                        t
                    }
                })
                .collect()
        };
        for senses in self.entries.values_mut() {
            for sense in senses.iter_mut() {
                sense.definition_tokens = normalize(&sense.definition);
                for example in &mut sense.examples {
                    example.tokens = normalize(&example.sentence);
                }
            }
        }
        self
    }

    /// Remove stop-word and/or punctuation tokens.
    #[must_use]
    pub fn remove_stopwords_and_punct(mut self, stopwords: bool, punctuation: bool) -> Self {
        if !stopwords && !punctuation {
            return self;
        }
        let keep = |t: &String| {
            !((stopwords && preprocess::is_stopword(t))
                || (punctuation && preprocess::is_punctuation(t)))
        };
        for senses in self.entries.values_mut() {
            for sense in senses.iter_mut() {
                sense.definition_tokens.retain(keep);
                for example in &mut sense.examples {
                    example.tokens.retain(keep);
                }
            }
        }
        self
    }

    fn examples_mut(&mut self) -> impl Iterator<Item = &mut ExampleUsage> {
        self.entries
            .values_mut()
            .flat_map(|senses| senses.iter_mut())
            .flat_map(|sense| sense.examples.iter_mut())
    }

    /// Number of headwords.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no headwords.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of senses across headwords.
    #[must_use]
    pub fn sense_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Senses of one headword.
    #[must_use]
    pub fn get(&self, headword: &str) -> Option<&[SenseRecord]> {
        self.entries.get(headword).map(Vec::as_slice)
    }

    /// Iterate headwords and their senses in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SenseRecord])> {
        self.entries
            .iter()
            .map(|(word, senses)| (word.as_str(), senses.as_slice()))
    }
}
