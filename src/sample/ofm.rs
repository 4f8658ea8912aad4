//! One-from-many test data: pick a sense's own example among distractors

use rand::seq::SliceRandom;
use rand::Rng;

use super::{SelectedData, SelectedSense};
use crate::{Error, Result};

/// A candidate example sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfmOption {
    /// Example sentence
    pub sentence: String,
    /// Normalized tokens
    pub tokens: Vec<String>,
}

/// One sense with its shuffled options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfmInstance {
    /// The headword
    pub headword: String,
    /// Dictionary definition of the target sense
    pub definition: String,
    /// Normalized definition tokens
    pub definition_tokens: Vec<String>,
    /// One correct example plus one distractor per other drawn sense
    pub options: Vec<OfmOption>,
    /// Index into `options` of the correct example
    pub correct: usize,
}

/// All one-from-many instances of one trial.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfmTestData {
    /// One instance per drawn sense
    pub instances: Vec<OfmInstance>,
}

impl OfmTestData {
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

/// Build one-from-many test data from a trial sample.
///
/// For every drawn sense the correct option is one of its own examples and
/// each other drawn sense of the same headword contributes one distractor,
/// so there are as many options as drawn senses.
///
/// # Errors
///
/// Returns [`Error::InsufficientData`] if a drawn sense has no examples.
pub fn create_ofm_data<R: Rng + ?Sized>(
    selected: &SelectedData,
    rng: &mut R,
) -> Result<OfmTestData> {
    let mut instances = Vec::new();

    for entry in &selected.entries {
        for (target, sense) in entry.senses.iter().enumerate() {
            let mut order: Vec<usize> = (0..entry.senses.len()).filter(|&i| i != target).collect();
            order.shuffle(rng);
            let correct = rng.gen_range(0..=order.len());
            order.insert(correct, target);

            let options = order
                .into_iter()
                .map(|idx| draw_option(&entry.headword, &entry.senses[idx], rng))
                .collect::<Result<Vec<_>>>()?;
            instances.push(OfmInstance {
                headword: entry.headword.clone(),
                definition: sense.definition.clone(),
                definition_tokens: sense.definition_tokens.clone(),
                options,
                correct,
            });
        }
    }

    Ok(OfmTestData { instances })
}

fn draw_option<R: Rng + ?Sized>(
    headword: &str,
    sense: &SelectedSense,
    rng: &mut R,
) -> Result<OfmOption> {
    let example = sense.examples.choose(rng).ok_or_else(|| {
        Error::InsufficientData(format!(
            "sense '{}' of '{headword}' has no examples to offer",
            sense.definition
        ))
    })?;
    Ok(OfmOption {
        sentence: example.sentence.clone(),
        tokens: example.tokens.clone(),
    })
}
