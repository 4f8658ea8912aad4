//! One-from-many baselines and scoring

use rand::Rng;

use super::overlap::{first_argmax, token_set, word_crossover};
use crate::embedding::{cosine, EmbeddingModel};
use crate::sample::{OfmInstance, OfmTestData};
use crate::{Error, Result};

/// Score of an option without any embedding evidence.
const NO_EVIDENCE: f32 = f32::MIN;

/// Chosen option index per instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfmSelections {
    /// `choices[i]` indexes `instances[i].options`
    pub choices: Vec<usize>,
}

/// Pick an option uniformly at random.
pub fn random_selection<R: Rng + ?Sized>(data: &OfmTestData, rng: &mut R) -> OfmSelections {
    let choices = data
        .instances
        .iter()
        .map(|i| {
            if i.options.is_empty() {
                0
            } else {
                rng.gen_range(0..i.options.len())
            }
        })
        .collect();
    OfmSelections { choices }
}

/// Pick the option sharing the most distinct tokens with the definition.
#[must_use]
pub fn word_crossover_selection(data: &OfmTestData) -> OfmSelections {
    let choices = data
        .instances
        .iter()
        .map(|instance| {
            let definition = token_set(&instance.definition_tokens);
            let scores: Vec<usize> = instance
                .options
                .iter()
                .map(|o| word_crossover(&definition, &o.tokens))
                .collect();
            first_argmax(&scores)
        })
        .collect();
    OfmSelections { choices }
}

/// Pick the option whose mean vector is closest to the definition's.
///
/// # Errors
///
/// Returns [`Error::Embedding`] if a similarity computation fails.
pub fn word2vec_similarity_selection_cosine(
    data: &OfmTestData,
    model: &EmbeddingModel,
) -> Result<OfmSelections> {
    let choices = data
        .instances
        .iter()
        .map(|instance| {
            let definition = model.mean_vector(&instance.definition_tokens);
            let scores = instance
                .options
                .iter()
                .map(|o| match (&definition, model.mean_vector(&o.tokens)) {
                    (Some(d), Some(v)) => cosine(d, &v),
                    _ => Ok(NO_EVIDENCE),
                })
                .collect::<Result<Vec<f32>>>()?;
            Ok::<_, Error>(first_argmax(&scores))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(OfmSelections { choices })
}

/// Pick the option with the best word-level alignment to the definition.
///
/// Each in-vocabulary definition word is matched with its most similar
/// option word; an option scores the mean of those best matches.
///
/// # Errors
///
/// Returns [`Error::Embedding`] if a similarity computation fails.
pub fn word2vec_similarity_selection_word_sim(
    data: &OfmTestData,
    model: &EmbeddingModel,
) -> Result<OfmSelections> {
    let choices = data
        .instances
        .iter()
        .map(|instance| {
            let scores = instance
                .options
                .iter()
                .map(|o| word_alignment(model, instance, &o.tokens))
                .collect::<Result<Vec<f32>>>()?;
            Ok::<_, Error>(first_argmax(&scores))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(OfmSelections { choices })
}

fn word_alignment(model: &EmbeddingModel, instance: &OfmInstance, option: &[String]) -> Result<f32> {
    let mut total = 0.0f32;
    let mut matched = 0usize;
    for def_word in &instance.definition_tokens {
        let mut best: Option<f32> = None;
        for word in option {
            if let Some(sim) = model.similarity(def_word, word)? {
                best = Some(best.map_or(sim, |b| b.max(sim)));
            }
        }
        if let Some(b) = best {
            total += b;
            matched += 1;
        }
    }
    if matched == 0 {
        return Ok(NO_EVIDENCE);
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = total / matched as f32;
    Ok(mean)
}

/// Fraction of instances whose chosen option is the correct one.
///
/// # Errors
///
/// Returns [`Error::Other`] if the selections do not match the data or the
/// data is empty.
pub fn calculate_accuracy(selections: &OfmSelections, data: &OfmTestData) -> Result<f64> {
    if selections.choices.len() != data.instances.len() {
        return Err(Error::Other(format!(
            "{} one-from-many choices for {} instances",
            selections.choices.len(),
            data.instances.len()
        )));
    }
    if data.is_empty() {
        return Err(Error::Other("no instances to score".to_string()));
    }
    let correct = selections
        .choices
        .iter()
        .zip(&data.instances)
        .filter(|(choice, instance)| **choice == instance.correct)
        .count();
    #[allow(clippy::cast_precision_loss)]
    let accuracy = correct as f64 / data.len() as f64;
    Ok(accuracy)
}
