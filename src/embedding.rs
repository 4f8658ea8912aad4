//! Word embedding model in word2vec format
//!
//! Both word2vec layouts are supported:
//!
//! - binary (`.bin`): `"<vocab> <dim>\n"` header, then per word the UTF-8
//!   word, a space, and `dim` little-endian `f32` values (an optional `\n`
//!   may follow each record)
//! - text (anything else): the same header, then one `word v1 v2 ...` line
//!   per word
//!
//! Vectors are stored in one flat buffer; dot products go through `trueno`
//! SIMD vectors.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rustc_hash::FxHashMap;
use tracing::info;
use trueno::Vector;

use crate::{Error, Result};

/// Largest vector dimension accepted from a model header.
pub const MAX_DIM: usize = 1 << 16;

/// Upper bound on up-front allocation, in words and in `f32`s; the header
/// count is untrusted and storage grows past this as records arrive.
const MAX_PREALLOC: usize = 1 << 20;

/// Word -> dense vector lookup table.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingModel {
    dim: usize,
    vocab: FxHashMap<String, usize>,
    vectors: Vec<f32>,
}

impl EmbeddingModel {
    /// Build a model from `(word, vector)` pairs.
    ///
    /// Later duplicates of a word are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Embedding`] if vectors differ in dimension or are empty.
    pub fn from_vectors<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        let mut model = Self::default();
        for (word, vector) in pairs {
            if model.dim == 0 {
                if vector.is_empty() {
                    return Err(Error::Embedding("zero-dimensional vector".to_string()));
                }
                model.dim = vector.len();
            }
            model.push(word.into(), &vector)?;
        }
        Ok(model)
    }

    /// Load a model, choosing the binary layout for `.bin` files.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be opened and
    /// [`Error::Embedding`] if its contents are malformed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let binary = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("bin"));
        let model = if binary {
            Self::read_binary(reader)?
        } else {
            Self::read_text(reader)?
        };
        info!(
            path = %path.display(),
            words = model.len(),
            dim = model.dim(),
            "loaded embedding model"
        );
        Ok(model)
    }

    /// Parse the word2vec binary layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Embedding`] on a malformed header or truncated record.
    pub fn read_binary<R: BufRead>(mut reader: R) -> Result<Self> {
        let (count, dim) = read_header(&mut reader)?;
        let mut model = Self::with_dim(dim, count);

        let mut word_buf = Vec::new();
        let record_bytes = dim
            .checked_mul(4)
            .ok_or_else(|| Error::Embedding(format!("dimension {dim} too large")))?;
        let mut vec_buf = vec![0u8; record_bytes];
        for i in 0..count {
            word_buf.clear();
            reader.read_until(b' ', &mut word_buf)?;
            if word_buf.last() != Some(&b' ') {
                return Err(Error::Embedding(format!(
                    "truncated binary model: expected {count} words, found {i}"
                )));
            }
            word_buf.pop();
            let word = String::from_utf8_lossy(&word_buf)
                .trim_start_matches('\n')
                .to_string();

            reader.read_exact(&mut vec_buf).map_err(|e| {
                Error::Embedding(format!("truncated vector for '{word}': {e}"))
            })?;
            let vector: Vec<f32> = vec_buf
                .chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect();
            model.push(word, &vector)?;
        }
        Ok(model)
    }

    /// Parse the word2vec text layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Embedding`] on a malformed header or line.
    pub fn read_text<R: BufRead>(mut reader: R) -> Result<Self> {
        let (count, dim) = read_header(&mut reader)?;
        let mut model = Self::with_dim(dim, count);

        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else {
                continue;
            };
            let vector = parts
                .map(str::parse::<f32>)
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| Error::Embedding(format!("line {}: {e}", lineno + 2)))?;
            model.push(word.to_string(), &vector)?;
        }
        Ok(model)
    }

    fn with_dim(dim: usize, capacity: usize) -> Self {
        let mut vocab = FxHashMap::default();
        vocab.reserve(capacity.min(MAX_PREALLOC));
        Self {
            dim,
            vocab,
            vectors: Vec::with_capacity(capacity.saturating_mul(dim).min(MAX_PREALLOC)),
        }
    }

    fn push(&mut self, word: String, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dim {
            return Err(Error::Embedding(format!(
                "'{word}' has {} dimensions, expected {}",
                vector.len(),
                self.dim
            )));
        }
        if self.vocab.contains_key(&word) {
            return Ok(());
        }
        self.vocab.insert(word, self.vocab.len());
        self.vectors.extend_from_slice(vector);
        Ok(())
    }

    /// Vector dimension.
    #[must_use]
    pub const fn dim(&self) -> usize {
        self.dim
    }

    /// Vocabulary size.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vocab.len()
    }

    /// Whether the vocabulary is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vocab.is_empty()
    }

    /// Vector of `word`, if in vocabulary.
    #[must_use]
    pub fn vector(&self, word: &str) -> Option<&[f32]> {
        self.vocab
            .get(word)
            .map(|&row| &self.vectors[row * self.dim..(row + 1) * self.dim])
    }

    /// Mean vector of the in-vocabulary tokens, `None` if there are none.
    #[must_use]
    pub fn mean_vector(&self, tokens: &[String]) -> Option<Vec<f32>> {
        let mut sum = vec![0.0f32; self.dim];
        let mut found = 0usize;
        for v in tokens.iter().filter_map(|t| self.vector(t)) {
            for (acc, x) in sum.iter_mut().zip(v) {
                *acc += x;
            }
            found += 1;
        }
        if found == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = found as f32;
        for x in &mut sum {
            *x /= n;
        }
        Some(sum)
    }

    /// Cosine similarity of two words, `None` if either is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Embedding`] if the SIMD dot product fails.
    pub fn similarity(&self, a: &str, b: &str) -> Result<Option<f32>> {
        match (self.vector(a), self.vector(b)) {
            (Some(va), Some(vb)) => cosine(va, vb).map(Some),
            _ => Ok(None),
        }
    }
}

/// Cosine similarity; 0 when either vector has zero norm.
///
/// # Errors
///
/// Returns [`Error::Embedding`] if the vectors differ in length.
pub fn cosine(a: &[f32], b: &[f32]) -> Result<f32> {
    let va = Vector::from_slice(a);
    let vb = Vector::from_slice(b);
    let dot = va.dot(&vb).map_err(simd_error)?;
    let norm = va.dot(&va).map_err(simd_error)?.sqrt() * vb.dot(&vb).map_err(simd_error)?.sqrt();
    if norm == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot / norm)
    }
}

fn simd_error<E: std::fmt::Debug>(e: E) -> Error {
    Error::Embedding(format!("SIMD dot product failed: {e:?}"))
}

fn read_header<R: BufRead>(reader: &mut R) -> Result<(usize, usize)> {
    let mut header = String::new();
    reader.read_line(&mut header)?;
    let mut fields = header.split_whitespace().map(str::parse::<usize>);
    match (fields.next(), fields.next()) {
        (Some(Ok(count)), Some(Ok(dim))) if (1..=MAX_DIM).contains(&dim) => Ok((count, dim)),
        _ => Err(Error::Embedding(format!(
            "invalid word2vec header: '{}'",
            header.trim_end()
        ))),
    }
}
