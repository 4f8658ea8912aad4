//! Baseline predictors and accuracy measures
//!
//! Predictors produce a selection for a trial's test data; the accuracy
//! functions score a selection against the gold labels carried by that same
//! test data. Randomized predictors draw from the caller's RNG so a seeded
//! run is reproducible end to end.

pub mod grouped;
pub mod ofm;
mod overlap;

use rand::Rng;

use crate::config::{GroupedMethod, OfmMethod};
use crate::embedding::EmbeddingModel;
use crate::sample::{GroupedTestData, OfmTestData};
use crate::{Error, Result};

pub use grouped::GroupedSelections;
pub use ofm::OfmSelections;

/// Maximum number of examples a grouped predictor may place in one sense.
pub const GROUP_SIZE: usize = 3;

/// A resolved grouped predictor.
#[derive(Debug, Clone, Copy)]
pub enum GroupedStrategy<'m> {
    /// Random round-robin assignment
    Random,
    /// Token overlap with the definition
    WordCrossover,
    /// Embedding cosine with the definition
    Word2Vec(&'m EmbeddingModel),
}

impl<'m> GroupedStrategy<'m> {
    /// Bind `method` to the model it needs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingModel`] if `method` needs embeddings and no
    /// model was given.
    pub fn resolve(method: GroupedMethod, model: Option<&'m EmbeddingModel>) -> Result<Self> {
        match method {
            GroupedMethod::Random => Ok(Self::Random),
            GroupedMethod::WordCrossover => Ok(Self::WordCrossover),
            GroupedMethod::Word2Vec => model
                .map(Self::Word2Vec)
                .ok_or_else(|| Error::MissingModel(method.as_str().to_string())),
        }
    }

    /// Assign the examples of every instance to senses.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Embedding`] if an embedding computation fails.
    pub fn select<R: Rng + ?Sized>(
        &self,
        data: &GroupedTestData,
        group_size: usize,
        rng: &mut R,
    ) -> Result<GroupedSelections> {
        match self {
            Self::Random => Ok(grouped::random_selection(data, group_size, rng)),
            Self::WordCrossover => Ok(grouped::word_crossover_selection(data, group_size)),
            Self::Word2Vec(model) => {
                grouped::word2vec_similarity_selection(data, group_size, model)
            }
        }
    }
}

/// A resolved one-from-many predictor.
#[derive(Debug, Clone, Copy)]
pub enum OfmStrategy<'m> {
    /// Uniform random choice
    Random,
    /// Token overlap with the definition
    WordCrossover,
    /// Mean-vector cosine with the definition
    Word2VecCosine(&'m EmbeddingModel),
    /// Best word-to-word alignment with the definition
    Word2VecWordSim(&'m EmbeddingModel),
}

impl<'m> OfmStrategy<'m> {
    /// Bind `method` to the model it needs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingModel`] if `method` needs embeddings and no
    /// model was given.
    pub fn resolve(method: OfmMethod, model: Option<&'m EmbeddingModel>) -> Result<Self> {
        let need = || Error::MissingModel(method.as_str().to_string());
        match method {
            OfmMethod::Random => Ok(Self::Random),
            OfmMethod::WordCrossover => Ok(Self::WordCrossover),
            OfmMethod::Word2VecCosine => model.map(Self::Word2VecCosine).ok_or_else(need),
            OfmMethod::Word2VecWordSim => model.map(Self::Word2VecWordSim).ok_or_else(need),
        }
    }

    /// Choose one option per instance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Embedding`] if an embedding computation fails.
    pub fn select<R: Rng + ?Sized>(&self, data: &OfmTestData, rng: &mut R) -> Result<OfmSelections> {
        match self {
            Self::Random => Ok(ofm::random_selection(data, rng)),
            Self::WordCrossover => Ok(ofm::word_crossover_selection(data)),
            Self::Word2VecCosine(model) => ofm::word2vec_similarity_selection_cosine(data, model),
            Self::Word2VecWordSim(model) => ofm::word2vec_similarity_selection_word_sim(data, model),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_requires_model_for_embeddings() {
        let err = GroupedStrategy::resolve(GroupedMethod::Word2Vec, None).unwrap_err();
        assert!(matches!(err, Error::MissingModel(ref m) if m == "word2vec"));

        let err = OfmStrategy::resolve(OfmMethod::Word2VecWordSim, None).unwrap_err();
        assert!(matches!(err, Error::MissingModel(ref m) if m == "word2vecWordSim"));

        assert!(GroupedStrategy::resolve(GroupedMethod::Random, None).is_ok());
        assert!(OfmStrategy::resolve(OfmMethod::WordCrossover, None).is_ok());
    }

    #[test]
    fn test_resolve_binds_model() {
        let model = EmbeddingModel::from_vectors([("a", vec![1.0])]).unwrap();
        assert!(matches!(
            OfmStrategy::resolve(OfmMethod::Word2VecCosine, Some(&model)),
            Ok(OfmStrategy::Word2VecCosine(_))
        ));
        assert!(matches!(
            GroupedStrategy::resolve(GroupedMethod::Word2Vec, Some(&model)),
            Ok(GroupedStrategy::Word2Vec(_))
        ));
    }
}
