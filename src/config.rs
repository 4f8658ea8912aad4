//! Evaluation configuration
//!
//! A run is described by a TOML file with a single `[evaluation_params]`
//! table. The raw table is deserialized with unknown keys rejected, then
//! validated into an immutable [`EvalConfig`] before any data is touched.
//!
//! ```toml
//! [evaluation_params]
//! seedNo = 42
//! dictionary = "oxford.json"
//! pos = "noun"
//! numOfSenses = 3
//! numOfExamp = 3
//! lemmatize = true
//! rmStopwords = true
//! rmPunct = true
//! testIterations = 100
//! grouped = false
//! baseLineMethod = "wordCrossover"
//! groupedAccuracyMeasure = "total"
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Part-of-speech filter applied to dictionary senses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    /// Nouns only
    Noun,
    /// Verbs only
    Verb,
    /// Adjectives only
    Adjective,
    /// Adverbs only
    Adverb,
    /// No filtering
    All,
}

impl PartOfSpeech {
    /// Tag as it appears in dictionary files and export file names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Noun => "noun",
            Self::Verb => "verb",
            Self::Adjective => "adjective",
            Self::Adverb => "adverb",
            Self::All => "all",
        }
    }

    /// Whether a sense tagged `tag` passes this filter.
    #[must_use]
    pub fn matches(self, tag: Option<&str>) -> bool {
        match self {
            Self::All => true,
            _ => tag.is_some_and(|t| t.trim().eq_ignore_ascii_case(self.as_str())),
        }
    }
}

impl FromStr for PartOfSpeech {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "noun" => Ok(Self::Noun),
            "verb" => Ok(Self::Verb),
            "adjective" => Ok(Self::Adjective),
            "adverb" => Ok(Self::Adverb),
            "all" => Ok(Self::All),
            other => Err(Error::Config(format!(
                "pos must be one of noun, verb, adjective, adverb, all (got '{other}')"
            ))),
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prediction strategies for the grouped problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupedMethod {
    /// Random assignment
    Random,
    /// Lexical overlap with the definition
    WordCrossover,
    /// Embedding cosine similarity
    Word2Vec,
}

impl GroupedMethod {
    /// Config spelling of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::WordCrossover => "wordCrossover",
            Self::Word2Vec => "word2vec",
        }
    }

    /// Whether the method needs an embedding model.
    #[must_use]
    pub const fn requires_embeddings(self) -> bool {
        matches!(self, Self::Word2Vec)
    }
}

impl FromStr for GroupedMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "random" => Ok(Self::Random),
            "wordCrossover" => Ok(Self::WordCrossover),
            "word2vec" => Ok(Self::Word2Vec),
            other => Err(Error::UnknownMethod {
                problem: "grouped",
                method: other.to_string(),
            }),
        }
    }
}

/// Prediction strategies for the one-from-many problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfmMethod {
    /// Uniform random choice
    Random,
    /// Lexical overlap with the definition
    WordCrossover,
    /// Cosine of mean embedding vectors
    Word2VecCosine,
    /// Mean best word-to-word similarity
    Word2VecWordSim,
}

impl OfmMethod {
    /// Config spelling of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::WordCrossover => "wordCrossover",
            Self::Word2VecCosine => "word2vecCosine",
            Self::Word2VecWordSim => "word2vecWordSim",
        }
    }

    /// Whether the method needs an embedding model.
    #[must_use]
    pub const fn requires_embeddings(self) -> bool {
        matches!(self, Self::Word2VecCosine | Self::Word2VecWordSim)
    }
}

impl FromStr for OfmMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "random" => Ok(Self::Random),
            "wordCrossover" => Ok(Self::WordCrossover),
            "word2vecCosine" => Ok(Self::Word2VecCosine),
            "word2vecWordSim" => Ok(Self::Word2VecWordSim),
            other => Err(Error::UnknownMethod {
                problem: "one-from-many",
                method: other.to_string(),
            }),
        }
    }
}

/// Scoring function for grouped selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccuracyMeasure {
    /// Whole groups must match
    Total,
    /// Per example-pair precision
    Pairs,
}

impl FromStr for AccuracyMeasure {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "total" => Ok(Self::Total),
            "pairs" => Ok(Self::Pairs),
            other => Err(Error::Config(format!(
                "groupedAccuracyMeasure must be 'total' or 'pairs' (got '{other}')"
            ))),
        }
    }
}

/// The evaluation problem together with its strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Task {
    /// Assign examples to candidate senses of one headword.
    Grouped {
        /// Prediction strategy
        method: GroupedMethod,
        /// Scoring function
        measure: AccuracyMeasure,
    },
    /// Pick the correct example for a sense among distractors.
    OneFromMany {
        /// Prediction strategy
        method: OfmMethod,
    },
}

impl Task {
    /// Config spelling of the selected method.
    #[must_use]
    pub const fn method_name(&self) -> &'static str {
        match self {
            Self::Grouped { method, .. } => method.as_str(),
            Self::OneFromMany { method } => method.as_str(),
        }
    }

    /// Whether the selected method needs an embedding model.
    #[must_use]
    pub const fn requires_embeddings(&self) -> bool {
        match self {
            Self::Grouped { method, .. } => method.requires_embeddings(),
            Self::OneFromMany { method } => method.requires_embeddings(),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grouped { method, measure } => {
                write!(f, "grouped/{}/{measure:?}", method.as_str())
            }
            Self::OneFromMany { method } => write!(f, "one-from-many/{}", method.as_str()),
        }
    }
}

/// Linguistic preprocessing switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreprocessOptions {
    /// Reduce tokens to their lemma
    pub lemmatize: bool,
    /// Drop stop words
    pub remove_stopwords: bool,
    /// Drop punctuation tokens
    pub remove_punctuation: bool,
}

/// Shape of one trial's sub-sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleShape {
    /// Senses drawn per headword
    pub senses_per_entry: usize,
    /// Examples drawn per sense
    pub examples_per_sense: usize,
}

/// Validated evaluation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvalConfig {
    /// Seed for the run's random generator
    pub seed: u64,
    /// Dictionary file name, relative to the data directory
    pub dictionary: PathBuf,
    /// Part-of-speech filter
    pub pos: PartOfSpeech,
    /// Preprocessing switches
    pub preprocess: PreprocessOptions,
    /// Sample shape, also the minimum sense/example counts
    pub shape: SampleShape,
    /// Number of trials
    pub iterations: usize,
    /// Problem type and method
    pub task: Task,
    /// Embedding model path, present iff the method needs it
    pub word2vec_bin: Option<PathBuf>,
}

/// `[evaluation_params]` exactly as written in the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawParams {
    /// `seedNo`
    pub seed_no: i64,
    /// `dictionary`
    pub dictionary: String,
    /// `pos`
    pub pos: String,
    /// `numOfSenses`
    pub num_of_senses: i64,
    /// `numOfExamp`
    pub num_of_examp: i64,
    /// `lemmatize`
    pub lemmatize: bool,
    /// `rmStopwords`
    pub rm_stopwords: bool,
    /// `rmPunct`
    pub rm_punct: bool,
    /// `testIterations`
    #[serde(alias = "testItterations")]
    pub test_iterations: i64,
    /// `grouped`
    pub grouped: bool,
    /// `baseLineMethod`
    pub base_line_method: String,
    /// `groupedAccuracyMeasure`
    #[serde(default)]
    pub grouped_accuracy_measure: Option<String>,
    /// `word2vecBin`
    #[serde(default)]
    pub word2vec_bin: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    evaluation_params: RawParams,
}

impl EvalConfig {
    /// Load and validate a config file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, is not valid TOML, or any
    /// parameter fails validation.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate config text.
    ///
    /// # Errors
    ///
    /// Returns error if the text is not valid TOML or fails validation.
    pub fn parse(toml_str: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(toml_str).map_err(|e| Error::Toml(describe_toml_error(&e, toml_str)))?;
        Self::from_raw(file.evaluation_params)
    }

    /// Validate raw parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for out-of-range or empty values,
    /// [`Error::UnknownMethod`] for unrecognised method names and
    /// [`Error::MissingModel`] when an embedding method has no `word2vecBin`.
    pub fn from_raw(raw: RawParams) -> Result<Self> {
        let seed = u64::try_from(raw.seed_no)
            .map_err(|_| Error::Config(format!("seedNo must be >= 0 (got {})", raw.seed_no)))?;

        let dictionary = raw.dictionary.trim();
        if dictionary.is_empty() {
            return Err(Error::Config("dictionary must not be empty".to_string()));
        }

        let shape = SampleShape {
            senses_per_entry: positive("numOfSenses", raw.num_of_senses)?,
            examples_per_sense: positive("numOfExamp", raw.num_of_examp)?,
        };
        let iterations = positive("testIterations", raw.test_iterations)?;

        let task = if raw.grouped {
            let measure = raw
                .grouped_accuracy_measure
                .as_deref()
                .ok_or_else(|| {
                    Error::Config(
                        "groupedAccuracyMeasure is required when grouped = true".to_string(),
                    )
                })?
                .parse()?;
            Task::Grouped {
                method: raw.base_line_method.parse()?,
                measure,
            }
        } else {
            // groupedAccuracyMeasure has no meaning here and is not inspected
            Task::OneFromMany {
                method: raw.base_line_method.parse()?,
            }
        };

        let word2vec_bin = raw
            .word2vec_bin
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        if task.requires_embeddings() && word2vec_bin.is_none() {
            return Err(Error::MissingModel(task.method_name().to_string()));
        }

        Ok(Self {
            seed,
            dictionary: PathBuf::from(dictionary),
            pos: raw.pos.parse()?,
            preprocess: PreprocessOptions {
                lemmatize: raw.lemmatize,
                remove_stopwords: raw.rm_stopwords,
                remove_punctuation: raw.rm_punct,
            },
            shape,
            iterations,
            task,
            word2vec_bin,
        })
    }
}

fn positive(key: &str, value: i64) -> Result<usize> {
    usize::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| Error::Config(format!("{key} must be a positive integer (got {value})")))
}

/// One-line form of a TOML error: the message and where it points.
fn describe_toml_error(err: &toml::de::Error, source: &str) -> String {
    let message = err.message().split_whitespace().collect::<Vec<_>>().join(" ");
    let Some(before) = err.span().and_then(|span| source.get(..span.start)) else {
        return message;
    };
    let line = before.matches('\n').count() + 1;
    let column = before.rfind('\n').map_or(before.len(), |nl| before.len() - nl - 1) + 1;
    format!("{message} (line {line}, column {column})")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_text(extra: &str) -> String {
        format!(
            r#"
[evaluation_params]
seedNo = 7
dictionary = "oxford.json"
pos = "noun"
numOfSenses = 3
numOfExamp = 2
lemmatize = true
rmStopwords = true
rmPunct = false
testIterations = 10
{extra}
"#
        )
    }

    #[test]
    fn test_parse_ofm_config() {
        let config =
            EvalConfig::parse(&config_text("grouped = false\nbaseLineMethod = \"random\"")).unwrap();

        assert_eq!(config.seed, 7);
        assert_eq!(config.dictionary, PathBuf::from("oxford.json"));
        assert_eq!(config.pos, PartOfSpeech::Noun);
        assert_eq!(config.shape.senses_per_entry, 3);
        assert_eq!(config.shape.examples_per_sense, 2);
        assert_eq!(config.iterations, 10);
        assert!(config.preprocess.lemmatize);
        assert!(!config.preprocess.remove_punctuation);
        assert_eq!(
            config.task,
            Task::OneFromMany {
                method: OfmMethod::Random
            }
        );
        assert!(config.word2vec_bin.is_none());
    }

    #[test]
    fn test_parse_grouped_config() {
        let config = EvalConfig::parse(&config_text(
            "grouped = true\nbaseLineMethod = \"wordCrossover\"\ngroupedAccuracyMeasure = \"pairs\"",
        ))
        .unwrap();

        assert_eq!(
            config.task,
            Task::Grouped {
                method: GroupedMethod::WordCrossover,
                measure: AccuracyMeasure::Pairs
            }
        );
    }

    #[test]
    fn test_legacy_iterations_key() {
        let text = config_text("grouped = false\nbaseLineMethod = \"random\"")
            .replace("testIterations", "testItterations");
        let config = EvalConfig::parse(&text).unwrap();
        assert_eq!(config.iterations, 10);
    }

    #[test]
    fn test_measure_ignored_for_ofm() {
        let config = EvalConfig::parse(&config_text(
            "grouped = false\nbaseLineMethod = \"wordCrossover\"\ngroupedAccuracyMeasure = \"bogus\"",
        ))
        .unwrap();
        assert!(matches!(config.task, Task::OneFromMany { .. }));
    }

    #[test]
    fn test_measure_required_for_grouped() {
        let err = EvalConfig::parse(&config_text("grouped = true\nbaseLineMethod = \"random\""))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_method_set_depends_on_problem() {
        // word2vecCosine only exists for one-from-many
        let err = EvalConfig::parse(&config_text(
            "grouped = true\nbaseLineMethod = \"word2vecCosine\"\ngroupedAccuracyMeasure = \"total\"\nword2vecBin = \"m.bin\"",
        ))
        .unwrap_err();
        assert!(matches!(err, Error::UnknownMethod { problem: "grouped", .. }));

        let err = EvalConfig::parse(&config_text(
            "grouped = false\nbaseLineMethod = \"word2vec\"\nword2vecBin = \"m.bin\"",
        ))
        .unwrap_err();
        assert!(matches!(err, Error::UnknownMethod { .. }));
    }

    #[test]
    fn test_embedding_method_requires_model_path() {
        let err = EvalConfig::parse(&config_text(
            "grouped = false\nbaseLineMethod = \"word2vecWordSim\"",
        ))
        .unwrap_err();
        assert!(matches!(err, Error::MissingModel(ref m) if m == "word2vecWordSim"));
    }

    #[test]
    fn test_non_positive_counts_rejected() {
        let text = config_text("grouped = false\nbaseLineMethod = \"random\"")
            .replace("testIterations = 10", "testIterations = 0");
        assert!(matches!(EvalConfig::parse(&text), Err(Error::Config(_))));

        let text = config_text("grouped = false\nbaseLineMethod = \"random\"")
            .replace("numOfSenses = 3", "numOfSenses = -1");
        assert!(matches!(EvalConfig::parse(&text), Err(Error::Config(_))));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = EvalConfig::parse(&config_text(
            "grouped = false\nbaseLineMethod = \"random\"\nturbo = true",
        ))
        .unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
        let shown = format!("{err:#}");
        assert_eq!(shown.lines().count(), 1, "{shown}");
        assert!(shown.contains("turbo"));
        assert!(shown.contains("(line 14, column 1)"));
    }

    #[test]
    fn test_type_mismatch_is_one_line() {
        let text = config_text("grouped = false\nbaseLineMethod = \"random\"")
            .replace("seedNo = 7", "seedNo = \"seven\"");
        let err = EvalConfig::parse(&text).unwrap_err();
        assert!(err.is_config_error());
        let shown = format!("[ERROR] - {err:#}");
        assert_eq!(shown.lines().count(), 1, "{shown}");
        assert!(shown.contains("line 3"));
    }

    #[test]
    fn test_pos_matching() {
        assert!(PartOfSpeech::Noun.matches(Some("Noun")));
        assert!(!PartOfSpeech::Noun.matches(Some("verb")));
        assert!(!PartOfSpeech::Noun.matches(None));
        assert!(PartOfSpeech::All.matches(None));
        assert!("Adverb".parse::<PartOfSpeech>().is_ok());
        assert!("pronoun".parse::<PartOfSpeech>().is_err());
    }
}
