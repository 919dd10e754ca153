pub mod corpus;
pub mod stop_words;
pub mod tfidf;
pub mod token;

use std::marker::PhantomData;

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::info;

use crate::utils::math::vector::SpVec;
use crate::vectorizer::{
    corpus::Corpus,
    tfidf::{DefaultTfIdfEngine, TfIdfEngine},
    token::{TermFrequency, Tokenizer},
};

/// One sparse TF-IDF row per document, L2-normalized.
/// Columns follow the fitted vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorMatrix {
    n_cols: usize,
    rows: Vec<SpVec<f32>>,
}

impl VectorMatrix {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn row(&self, index: usize) -> Option<&SpVec<f32>> {
        self.rows.get(index)
    }

    pub fn rows(&self) -> &[SpVec<f32>] {
        &self.rows
    }
}

/// TF-IDF Vectorizer
///
/// Fits a vocabulary and IDF weights over a whole corpus of tag strings in one
/// pass and produces the corresponding `VectorMatrix`. There is no incremental
/// update; fitting again replaces the previous state.
///
/// `E` selects the term-frequency / IDF formula.
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer<E = DefaultTfIdfEngine>
where
    E: TfIdfEngine,
{
    tokenizer: Tokenizer,
    /// term -> column
    vocabulary: IndexMap<Box<str>, usize>,
    /// column -> idf
    idf: Vec<f64>,
    _marker: PhantomData<fn() -> E>,
}

impl<E> TfIdfVectorizer<E>
where
    E: TfIdfEngine,
{
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self {
            tokenizer,
            vocabulary: IndexMap::new(),
            idf: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Fit the vocabulary on `docs` and return their TF-IDF matrix.
    ///
    /// Row `i` of the result corresponds to `docs[i]`. A document with no
    /// vocabulary term gets an all-zero row.
    pub fn fit_transform<T>(&mut self, docs: &[T]) -> VectorMatrix
    where
        T: AsRef<str> + Sync,
    {
        let tokenizer = self.tokenizer;
        // 各ドキュメントは独立なので並列に数える
        let freqs: Vec<TermFrequency> = docs
            .par_iter()
            .map(|doc| tokenizer.term_frequency(doc.as_ref()))
            .collect();

        let mut corpus = Corpus::new();
        for freq in &freqs {
            corpus.add_set(&freq.term_set_ref_str());
        }

        let terms = corpus.sorted_terms();
        self.idf = E::idf_vec(&corpus, terms.iter().copied());
        self.vocabulary = terms
            .iter()
            .enumerate()
            .map(|(col, term)| (Box::<str>::from(*term), col))
            .collect();
        info!(
            docs = docs.len(),
            vocabulary = self.vocabulary.len(),
            "fitted tf-idf vocabulary"
        );

        let vocabulary = &self.vocabulary;
        let idf = &self.idf;
        let n_cols = vocabulary.len();
        let rows = freqs
            .par_iter()
            .map(|freq| Self::weigh(freq, vocabulary, idf, n_cols))
            .collect();
        VectorMatrix { n_cols, rows }
    }

    fn weigh(
        freq: &TermFrequency,
        vocabulary: &IndexMap<Box<str>, usize>,
        idf: &[f64],
        n_cols: usize,
    ) -> SpVec<f32> {
        let pairs: Vec<(u32, f64)> = freq
            .iter()
            .filter_map(|(term, count)| {
                let col = *vocabulary.get(term)?;
                Some((col as u32, E::tf(count) * idf[col]))
            })
            .collect();
        let weights = SpVec::from_pairs(n_cols, pairs);
        let norm = weights.norm();
        if norm == 0.0 {
            return SpVec::new(n_cols);
        }
        weights.map_values(|w| (w / norm) as f32)
    }

    /// term -> column of the fitted vocabulary, lexicographic order
    pub fn vocabulary(&self) -> &IndexMap<Box<str>, usize> {
        &self.vocabulary
    }

    /// IDF weight of `term`, None if it is not in the vocabulary
    pub fn idf_of(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|col| self.idf[*col])
    }
}
