//! Per-trial sample selection
//!
//! Every trial draws a fresh sub-sample from the prepared dataset and
//! reshapes it into the test data of one problem type:
//!
//! ```text
//! LexicalDataset ──select──> SelectedData ──┬─> GroupedTestData
//!                                           └─> OfmTestData
//! ```
//!
//! The dataset is only borrowed; samples own clones of what they use, so a
//! trial can never disturb another trial or the source data.

mod grouped;
mod ofm;

pub use grouped::{
    create_grouped_test_data, GroupedExample, GroupedInstance, GroupedTestData, SenseCandidate,
};
pub use ofm::{create_ofm_data, OfmInstance, OfmOption, OfmTestData};

use rand::seq::index;
use rand::Rng;

use crate::config::SampleShape;
use crate::dataset::{ExampleUsage, LexicalDataset};
use crate::{Error, Result};

/// A sense drawn for one trial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedSense {
    /// Dictionary definition
    pub definition: String,
    /// Normalized definition tokens
    pub definition_tokens: Vec<String>,
    /// The drawn examples
    pub examples: Vec<ExampleUsage>,
}

/// A headword with its drawn senses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedEntry {
    /// The headword
    pub headword: String,
    /// Drawn senses, in draw order
    pub senses: Vec<SelectedSense>,
}

/// One trial's random sub-sample.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedData {
    /// Drawn entries, in dataset order
    pub entries: Vec<SelectedEntry>,
}

impl SelectedData {
    /// Number of drawn headwords.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Draw `senses_per_entry` senses per headword and `examples_per_sense`
/// examples per drawn sense, uniformly without replacement.
///
/// # Errors
///
/// Returns [`Error::InsufficientData`] if an entry has fewer senses or
/// examples than requested (the dataset was not prepared for `shape`).
pub fn select_examples_and_senses<R: Rng + ?Sized>(
    dataset: &LexicalDataset,
    shape: SampleShape,
    rng: &mut R,
) -> Result<SelectedData> {
    let mut entries = Vec::with_capacity(dataset.len());

    for (headword, senses) in dataset.iter() {
        if senses.len() < shape.senses_per_entry {
            return Err(Error::InsufficientData(format!(
                "'{headword}' has {} senses, {} required",
                senses.len(),
                shape.senses_per_entry
            )));
        }

        let mut selected = Vec::with_capacity(shape.senses_per_entry);
        for sense_idx in index::sample(rng, senses.len(), shape.senses_per_entry) {
            let sense = &senses[sense_idx];
            if sense.examples.len() < shape.examples_per_sense {
                return Err(Error::InsufficientData(format!(
                    "a sense of '{headword}' has {} examples, {} required",
                    sense.examples.len(),
                    shape.examples_per_sense
                )));
            }
            let examples = index::sample(rng, sense.examples.len(), shape.examples_per_sense)
                .into_iter()
                .map(|i| sense.examples[i].clone())
                .collect();
            selected.push(SelectedSense {
                definition: sense.definition.clone(),
                definition_tokens: sense.definition_tokens.clone(),
                examples,
            });
        }

        entries.push(SelectedEntry {
            headword: headword.to_string(),
            senses: selected,
        });
    }

    Ok(SelectedData { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::SenseRecord;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn dataset() -> LexicalDataset {
        let mut data = LexicalDataset::new();
        for word in ["alpha", "beta"] {
            let senses = (0..4)
                .map(|s| {
                    SenseRecord::new(
                        format!("{word} sense {s}"),
                        (0..5).map(|e| format!("{word} {s} example {e}")),
                    )
                })
                .collect();
            data.insert(word, senses);
        }
        data
    }

    const SHAPE: SampleShape = SampleShape {
        senses_per_entry: 3,
        examples_per_sense: 2,
    };

    #[test]
    fn test_selection_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        let selected = select_examples_and_senses(&dataset(), SHAPE, &mut rng).unwrap();

        assert_eq!(selected.len(), 2);
        for entry in &selected.entries {
            assert_eq!(entry.senses.len(), 3);
            for sense in &entry.senses {
                assert_eq!(sense.examples.len(), 2);
                assert_ne!(sense.examples[0], sense.examples[1]);
                // examples belong to the drawn sense
                let prefix = sense.definition.replace(" sense", "");
                assert!(sense.examples.iter().all(|e| e.sentence.starts_with(&prefix)));
            }
        }
    }

    #[test]
    fn test_selection_is_seed_deterministic() {
        let data = dataset();
        let a = select_examples_and_senses(&data, SHAPE, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = select_examples_and_senses(&data, SHAPE, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_selection_leaves_dataset_untouched() {
        let data = dataset();
        let before = data.clone();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..5 {
            select_examples_and_senses(&data, SHAPE, &mut rng).unwrap();
        }
        assert_eq!(data, before);
    }

    #[test]
    fn test_selection_rejects_unprepared_dataset() {
        let shape = SampleShape {
            senses_per_entry: 5,
            examples_per_sense: 1,
        };
        let err = select_examples_and_senses(&dataset(), shape, &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientData(_)));
    }
}
