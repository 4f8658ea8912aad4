//! Grouped test data: sort a headword's pooled examples back into its senses

use rand::seq::SliceRandom;
use rand::Rng;

use super::SelectedData;

/// An example awaiting assignment, with its gold sense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedExample {
    /// Example sentence
    pub sentence: String,
    /// Normalized tokens
    pub tokens: Vec<String>,
    /// Index into [`GroupedInstance::senses`] of the true sense
    pub gold_sense: usize,
}

/// A candidate sense of a grouped instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenseCandidate {
    /// Dictionary definition
    pub definition: String,
    /// Normalized definition tokens
    pub definition_tokens: Vec<String>,
}

/// One headword's grouping problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedInstance {
    /// The headword
    pub headword: String,
    /// Candidate senses
    pub senses: Vec<SenseCandidate>,
    /// Pooled examples, shuffled
    pub examples: Vec<GroupedExample>,
}

impl GroupedInstance {
    /// Gold example indices of sense `sense`, ascending.
    #[must_use]
    pub fn gold_group(&self, sense: usize) -> Vec<usize> {
        self.examples
            .iter()
            .enumerate()
            .filter(|(_, e)| e.gold_sense == sense)
            .map(|(i, _)| i)
            .collect()
    }
}

/// All grouped instances of one trial.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedTestData {
    /// One instance per drawn headword
    pub instances: Vec<GroupedInstance>,
}

impl GroupedTestData {
    /// Number of instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether there are no instances.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// Build grouped test data from a trial sample.
///
/// Each headword's examples are pooled and shuffled so that position carries
/// no information about the gold sense.
pub fn create_grouped_test_data<R: Rng + ?Sized>(
    selected: &SelectedData,
    rng: &mut R,
) -> GroupedTestData {
    let instances = selected
        .entries
        .iter()
        .map(|entry| {
            let senses = entry
                .senses
                .iter()
                .map(|s| SenseCandidate {
                    definition: s.definition.clone(),
                    definition_tokens: s.definition_tokens.clone(),
                })
                .collect();
            let mut examples: Vec<GroupedExample> = entry
                .senses
                .iter()
                .enumerate()
                .flat_map(|(gold_sense, s)| {
                    s.examples.iter().map(move |e| GroupedExample {
                        sentence: e.sentence.clone(),
                        tokens: e.tokens.clone(),
                        gold_sense,
                    })
                })
                .collect();
            examples.shuffle(rng);
            GroupedInstance {
                headword: entry.headword.clone(),
                senses,
                examples,
            }
        })
        .collect();

    GroupedTestData { instances }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ExampleUsage;
    use crate::sample::{SelectedEntry, SelectedSense};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn selected() -> SelectedData {
        let senses = (0..3)
            .map(|s| SelectedSense {
                definition: format!("def {s}"),
                definition_tokens: vec![format!("d{s}")],
                examples: (0..2).map(|e| ExampleUsage::new(format!("{s}-{e}"))).collect(),
            })
            .collect();
        SelectedData {
            entries: vec![SelectedEntry {
                headword: "word".to_string(),
                senses,
            }],
        }
    }

    #[test]
    fn test_grouped_data_pools_examples() {
        let data = create_grouped_test_data(&selected(), &mut StdRng::seed_from_u64(5));
        assert_eq!(data.len(), 1);

        let instance = &data.instances[0];
        assert_eq!(instance.senses.len(), 3);
        assert_eq!(instance.examples.len(), 6);
        for sense in 0..3 {
            let group = instance.gold_group(sense);
            assert_eq!(group.len(), 2);
            for idx in group {
                assert!(instance.examples[idx]
                    .sentence
                    .starts_with(&format!("{sense}-")));
            }
        }
    }
}
