use crate::vectorizer::corpus::Corpus;

/// TF-IDF calculation strategy
///
/// The vectorizer multiplies `tf` by `idf` for every term of a document and
/// L2-normalizes the resulting row.
pub trait TfIdfEngine {
    /// term frequency weight of a term seen `count` times (count > 0)
    fn tf(count: u32) -> f64;

    /// inverse document frequency of a term found in `doc_freq` of `doc_num` documents
    ///
    /// smoothed: ln((1 + n) / (1 + df)) + 1
    /// terms in every document still get weight 1, rarer terms more
    #[inline]
    fn idf(doc_num: u64, doc_freq: u64) -> f64 {
        ((1.0 + doc_num as f64) / (1.0 + doc_freq as f64)).ln() + 1.0
    }

    /// IDFベクトルを生成する
    /// # Arguments
    /// * `corpus` - コーパス
    /// * `vocabulary` - 列順に並んだ term
    fn idf_vec<'a, I>(corpus: &Corpus, vocabulary: I) -> Vec<f64>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let doc_num = corpus.get_doc_num();
        vocabulary
            .into_iter()
            .map(|term| Self::idf(doc_num, corpus.get_term_count(term)))
            .collect()
    }
}

/// raw count × smoothed idf
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTfIdfEngine;

impl TfIdfEngine for DefaultTfIdfEngine {
    #[inline]
    fn tf(count: u32) -> f64 {
        count as f64
    }
}

/// (1 + ln count) × smoothed idf, dampens terms repeated inside one tag
#[derive(Debug, Clone, Copy, Default)]
pub struct SublinearTfIdfEngine;

impl TfIdfEngine for SublinearTfIdfEngine {
    #[inline]
    fn tf(count: u32) -> f64 {
        if count == 0 {
            return 0.0;
        }
        1.0 + (count as f64).ln()
    }
}
