use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

use crate::vectorizer::stop_words::is_english_stop_word;

lazy_static! {
    /// two or more word characters
    static ref WORD: Regex = Regex::new(r"(?u)\b\w\w+\b").expect("word pattern is valid");
}

/// Splits a tag string into lowercase terms
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer {
    stop_words: bool,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::english()
    }
}

impl Tokenizer {
    /// Tokenizer dropping English stop words
    pub fn english() -> Self {
        Self { stop_words: true }
    }

    /// Tokenizer keeping every term
    pub fn keep_all() -> Self {
        Self { stop_words: false }
    }

    /// Lowercase `text` and return its terms in order of appearance
    ///
    /// # Arguments
    /// * `text` - tag string
    ///
    /// # Returns
    /// * `Vec<String>` - terms, stop words removed if enabled
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        WORD.find_iter(&lower)
            .map(|m| m.as_str())
            .filter(|term| !(self.stop_words && is_english_stop_word(term)))
            .map(str::to_string)
            .collect()
    }

    /// Tokenize and count in one step
    pub fn term_frequency(&self, text: &str) -> TermFrequency {
        let mut freq = TermFrequency::new();
        freq.add_terms(&self.tokenize(text));
        freq
    }
}

///  TermFrequency 構造体
/// 1ドキュメント内の term の出現回数を管理します
///
/// # Examples
/// ```
/// use movie_recommender::vectorizer::token::TermFrequency;
/// let mut freq = TermFrequency::new();
/// freq.add_terms(&["pandora", "marine", "pandora"]);
/// assert_eq!(freq.term_count("pandora"), 2);
/// assert_eq!(freq.term_sum(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermFrequency {
    term_count: IndexMap<Box<str>, u32>,
    total_term_count: u64,
}

impl TermFrequency {
    pub fn new() -> Self {
        TermFrequency {
            term_count: IndexMap::new(),
            total_term_count: 0,
        }
    }

    /// termを追加する
    #[inline]
    pub fn add_term(&mut self, term: &str) -> &mut Self {
        let count = self.term_count.entry(term.into()).or_insert(0);
        *count += 1;
        self.total_term_count += 1;
        self
    }

    /// 複数のtermを追加する
    #[inline]
    pub fn add_terms<T>(&mut self, terms: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for term in terms {
            self.add_term(term.as_ref());
        }
        self
    }

    /// count of `term`, 0 if absent
    #[inline]
    pub fn term_count(&self, term: &str) -> u32 {
        self.term_count.get(term).copied().unwrap_or(0)
    }

    /// total number of terms added, duplicates included
    #[inline]
    pub fn term_sum(&self) -> u64 {
        self.total_term_count
    }

    /// distinct terms, first-seen order
    #[inline]
    pub fn term_set_ref_str(&self) -> Vec<&str> {
        self.term_count.keys().map(|s| s.as_ref()).collect()
    }

    /// `(term, count)` pairs, first-seen order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.term_count.iter().map(|(t, c)| (t.as_ref(), *c))
    }

    /// number of distinct terms
    #[inline]
    pub fn term_num(&self) -> usize {
        self.term_count.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.term_count.is_empty()
    }
}
