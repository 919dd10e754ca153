use indexmap::IndexMap;

/// keep document count and per-term document frequency
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    doc_num: u64,
    /// number of documents containing each term
    term_counts: IndexMap<Box<str>, u64>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one document given its distinct terms
    pub fn add_set<T>(&mut self, terms: &[T])
    where
        T: AsRef<str>,
    {
        self.doc_num += 1;
        for term in terms {
            *self.term_counts.entry(term.as_ref().into()).or_insert(0) += 1;
        }
    }

    /// Get the number of documents in the corpus
    #[inline]
    pub fn get_doc_num(&self) -> u64 {
        self.doc_num
    }

    /// Get the document frequency of `term`
    #[inline]
    pub fn get_term_count(&self, term: &str) -> u64 {
        self.term_counts.get(term).copied().unwrap_or(0)
    }

    /// number of unique terms
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.term_counts.len()
    }

    /// All terms in lexicographic order
    pub fn sorted_terms(&self) -> Vec<&str> {
        let mut terms: Vec<&str> = self.term_counts.keys().map(|t| t.as_ref()).collect();
        terms.sort_unstable();
        terms
    }
}
