//! Grouped baselines and scoring
//!
//! A selection assigns every example of an instance to one sense index, or
//! to none once all senses are full. No sense receives more than
//! `group_size` examples.

use rand::seq::SliceRandom;
use rand::Rng;

use super::overlap::{token_set, word_crossover};
use crate::embedding::{cosine, EmbeddingModel};
use crate::sample::{GroupedInstance, GroupedTestData};
use crate::{Error, Result};

/// Score given to pairs without any embedding evidence; ranks below every cosine.
const NO_EVIDENCE: f32 = f32::MIN;

/// Per-instance example -> sense assignments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedSelections {
    /// `assignments[i][e]` is the sense chosen for example `e` of instance `i`
    pub assignments: Vec<Vec<Option<usize>>>,
}

/// Deal shuffled examples round-robin into senses.
pub fn random_selection<R: Rng + ?Sized>(
    data: &GroupedTestData,
    group_size: usize,
    rng: &mut R,
) -> GroupedSelections {
    let assignments = data
        .instances
        .iter()
        .map(|instance| {
            let n_senses = instance.senses.len();
            let mut order: Vec<usize> = (0..instance.examples.len()).collect();
            order.shuffle(rng);

            let mut assignment = vec![None; instance.examples.len()];
            for (slot, example) in order.into_iter().enumerate() {
                if n_senses > 0 && slot / n_senses < group_size {
                    assignment[example] = Some(slot % n_senses);
                }
            }
            assignment
        })
        .collect();
    GroupedSelections { assignments }
}

/// Assign by token overlap between example and definition.
#[must_use]
pub fn word_crossover_selection(data: &GroupedTestData, group_size: usize) -> GroupedSelections {
    let assignments = data
        .instances
        .iter()
        .map(|instance| {
            let definitions: Vec<_> = instance
                .senses
                .iter()
                .map(|s| token_set(&s.definition_tokens))
                .collect();
            #[allow(clippy::cast_precision_loss)]
            let scores: Vec<Vec<f32>> = instance
                .examples
                .iter()
                .map(|e| {
                    definitions
                        .iter()
                        .map(|d| word_crossover(d, &e.tokens) as f32)
                        .collect()
                })
                .collect();
            assign_by_score(&scores, instance.senses.len(), group_size)
        })
        .collect();
    GroupedSelections { assignments }
}

/// Assign by cosine between mean example and mean definition vectors.
///
/// # Errors
///
/// Returns [`Error::Embedding`] if a similarity computation fails.
pub fn word2vec_similarity_selection(
    data: &GroupedTestData,
    group_size: usize,
    model: &EmbeddingModel,
) -> Result<GroupedSelections> {
    let assignments = data
        .instances
        .iter()
        .map(|instance| {
            let definitions: Vec<Option<Vec<f32>>> = instance
                .senses
                .iter()
                .map(|s| model.mean_vector(&s.definition_tokens))
                .collect();
            let scores = instance
                .examples
                .iter()
                .map(|e| {
                    let example = model.mean_vector(&e.tokens);
                    definitions
                        .iter()
                        .map(|d| match (&example, d) {
                            (Some(ev), Some(dv)) => cosine(ev, dv),
                            _ => Ok(NO_EVIDENCE),
                        })
                        .collect::<Result<Vec<f32>>>()
                })
                .collect::<Result<Vec<_>>>()?;
            Ok::<_, Error>(assign_by_score(&scores, instance.senses.len(), group_size))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(GroupedSelections { assignments })
}

/// Greedy highest-score-first assignment under a per-sense capacity.
///
/// `scores[e][s]` scores example `e` against sense `s`. Ties are broken by
/// example index, then sense index.
fn assign_by_score(scores: &[Vec<f32>], n_senses: usize, group_size: usize) -> Vec<Option<usize>> {
    let mut candidates: Vec<(f32, usize, usize)> = scores
        .iter()
        .enumerate()
        .flat_map(|(e, row)| row.iter().take(n_senses).enumerate().map(move |(s, &v)| (v, e, s)))
        .collect();
    candidates.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));

    let mut assignment = vec![None; scores.len()];
    let mut filled = vec![0usize; n_senses];
    for (_, e, s) in candidates {
        if assignment[e].is_none() && filled[s] < group_size {
            assignment[e] = Some(s);
            filled[s] += 1;
        }
    }
    assignment
}

/// Fraction of (instance, sense) groups predicted exactly.
///
/// # Errors
///
/// Returns [`Error::Other`] if the selections do not match the data shape or
/// there are no groups to score.
pub fn calculate_accuracy(selections: &GroupedSelections, data: &GroupedTestData) -> Result<f64> {
    check_shape(selections, data)?;
    let mut groups = 0usize;
    let mut correct = 0usize;
    for (instance, assignment) in data.instances.iter().zip(&selections.assignments) {
        for sense in 0..instance.senses.len() {
            groups += 1;
            if predicted_group(assignment, sense) == instance.gold_group(sense) {
                correct += 1;
            }
        }
    }
    ratio(correct, groups)
}

/// Of all example pairs placed in the same predicted group, the fraction
/// that truly share a sense; 0 when no pair was formed.
///
/// # Errors
///
/// Returns [`Error::Other`] if the selections do not match the data shape or
/// there are no groups to score.
pub fn calculate_accuracy_pairs(
    selections: &GroupedSelections,
    data: &GroupedTestData,
) -> Result<f64> {
    check_shape(selections, data)?;
    if data.instances.iter().all(|i| i.senses.is_empty()) {
        return Err(Error::Other("no groups to score".to_string()));
    }
    let mut pairs = 0usize;
    let mut correct = 0usize;
    for (instance, assignment) in data.instances.iter().zip(&selections.assignments) {
        for sense in 0..instance.senses.len() {
            let group = predicted_group(assignment, sense);
            for (i, &a) in group.iter().enumerate() {
                for &b in &group[i + 1..] {
                    pairs += 1;
                    if same_gold(instance, a, b) {
                        correct += 1;
                    }
                }
            }
        }
    }
    if pairs == 0 {
        return Ok(0.0);
    }
    ratio(correct, pairs)
}

fn same_gold(instance: &GroupedInstance, a: usize, b: usize) -> bool {
    instance.examples[a].gold_sense == instance.examples[b].gold_sense
}

fn predicted_group(assignment: &[Option<usize>], sense: usize) -> Vec<usize> {
    assignment
        .iter()
        .enumerate()
        .filter(|(_, s)| **s == Some(sense))
        .map(|(i, _)| i)
        .collect()
}

fn check_shape(selections: &GroupedSelections, data: &GroupedTestData) -> Result<()> {
    let matches = selections.assignments.len() == data.instances.len()
        && selections
            .assignments
            .iter()
            .zip(&data.instances)
            .all(|(a, i)| a.len() == i.examples.len());
    if matches {
        Ok(())
    } else {
        Err(Error::Other(
            "grouped selections do not match the test data".to_string(),
        ))
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(correct: usize, total: usize) -> Result<f64> {
    if total == 0 {
        return Err(Error::Other("no groups to score".to_string()));
    }
    Ok(correct as f64 / total as f64)
}
