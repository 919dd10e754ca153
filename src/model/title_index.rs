use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Normalize a title for lookup: lowercase, drop every space and hyphen.
///
/// Other punctuation and accents are kept as-is. Idempotent.
pub fn normalize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Two titles that normalize to the same key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleCollision {
    pub key: String,
    /// row that lost its index entry
    pub replaced: usize,
    /// row the key now points to
    pub winner: usize,
}

/// Normalized title -> matrix row
///
/// Built with last-write-wins: when several movies share a normalized title
/// only the last one stays reachable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TitleIndex {
    map: IndexMap<String, usize>,
}

impl TitleIndex {
    /// Index `titles` by position, reporting every overwritten key
    pub fn build<'a, I>(titles: I) -> (Self, Vec<TitleCollision>)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut map = IndexMap::new();
        let mut collisions = Vec::new();
        for (row, title) in titles.into_iter().enumerate() {
            let key = normalize_title(title);
            if let Some(replaced) = map.insert(key.clone(), row) {
                collisions.push(TitleCollision {
                    key,
                    replaced,
                    winner: row,
                });
            }
        }
        (Self { map }, collisions)
    }

    /// Row of a free-form title
    #[inline]
    pub fn lookup(&self, title: &str) -> Option<usize> {
        self.get_normalized(&normalize_title(title))
    }

    /// Row of an already normalized key
    #[inline]
    pub fn get_normalized(&self, key: &str) -> Option<usize> {
        self.map.get(key).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.map.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
