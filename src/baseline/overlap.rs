//! Lexical overlap ("word crossover") scoring

use rustc_hash::FxHashSet;

/// Distinct tokens of a bag of words.
#[must_use]
pub fn token_set(tokens: &[String]) -> FxHashSet<&str> {
    tokens.iter().map(String::as_str).collect()
}

/// Number of distinct tokens shared by `a` and `b`.
#[must_use]
pub fn word_crossover(a: &FxHashSet<&str>, b: &[String]) -> usize {
    token_set(b).iter().filter(|t| a.contains(*t)).count()
}

/// Index of the first maximum; 0 for an empty slice.
#[must_use]
pub fn first_argmax<T: PartialOrd + Copy>(scores: &[T]) -> usize {
    let mut best = 0;
    for (i, s) in scores.iter().enumerate().skip(1) {
        if *s > scores[best] {
            best = i;
        }
    }
    best
}
