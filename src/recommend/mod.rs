pub mod service;

use std::cmp::Ordering;
use std::fmt::{self, Debug, Display};
use std::sync::Arc;

use crate::error::QueryError;
use crate::model::{title_index::normalize_title, ModelArtifact, MovieEntry};

/// One recommended movie
#[derive(Debug, Clone, PartialEq)]
pub struct HitEntry {
    /// row in the model
    pub row: usize,
    pub movie_id: i64,
    pub title: String,
    /// cosine similarity to the query movie
    pub score: f32,
}

/// Ranked recommendations, best first
#[derive(Clone, PartialEq, Default)]
pub struct Hits {
    pub list: Vec<HitEntry>,
}

impl Hits {
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.list.iter().map(|hit| hit.title.as_str()).collect()
    }

    pub fn into_titles(self) -> Vec<String> {
        self.list.into_iter().map(|hit| hit.title).collect()
    }
}

impl Debug for Hits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Hits [")?;
            for hit in &self.list {
                writeln!(f, "    {:?}: {:.6} (row: {})", hit.title, hit.score, hit.row)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

impl Display for Hits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, hit) in self.list.iter().enumerate() {
            writeln!(f, "{:>3}. {} ({:.4})", rank + 1, hit.title, hit.score)?;
        }
        Ok(())
    }
}

/// Result of resolving a query title
#[derive(Debug, Clone, PartialEq)]
pub enum Recommendation {
    Found { query: MovieEntry, hits: Hits },
    /// the normalized title matches no indexed movie
    NotFound { normalized: String },
}

impl Recommendation {
    /// Titles in rank order, empty when not found
    pub fn into_titles(self) -> Vec<String> {
        match self {
            Recommendation::Found { hits, .. } => hits.into_titles(),
            Recommendation::NotFound { .. } => Vec::new(),
        }
    }
}

/// Answers recommendation queries from a shared, immutable model
#[derive(Debug, Clone)]
pub struct Recommender {
    artifact: Arc<ModelArtifact>,
}

/// score descending, then row ascending
#[inline]
fn rank_order(a: &(usize, f32), b: &(usize, f32)) -> Ordering {
    b.1.total_cmp(&a.1).then(a.0.cmp(&b.0))
}

impl Recommender {
    pub fn new(artifact: Arc<ModelArtifact>) -> Self {
        Self { artifact }
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Top `top_n` movies most similar to `title`.
    ///
    /// The title is normalized the same way as the index keys. Neither the
    /// query movie nor any movie sharing its normalized title is part of the
    /// result; ties keep corpus order.
    pub fn recommend(&self, title: &str, top_n: usize) -> Result<Recommendation, QueryError> {
        let normalized = normalize_title(title);
        let Some(row) = self.artifact.title_index().get_normalized(&normalized) else {
            return Ok(Recommendation::NotFound { normalized });
        };
        let query = self
            .artifact
            .movie(row)
            .cloned()
            .ok_or(QueryError::RowOutOfRange { index: row, len: self.artifact.len() })?;
        let hits = self.recommend_row(row, top_n)?;
        Ok(Recommendation::Found { query, hits })
    }

    /// Rank every row with a different normalized title against `row`
    pub fn recommend_row(&self, row: usize, top_n: usize) -> Result<Hits, QueryError> {
        let len = self.artifact.len();
        let scores = self
            .artifact
            .similarity()
            .row(row)
            .ok_or(QueryError::RowOutOfRange { index: row, len })?;
        let key = self
            .artifact
            .movie(row)
            .map(|movie| normalize_title(&movie.title))
            .ok_or(QueryError::RowOutOfRange { index: row, len })?;
        let movies = self.artifact.movies();

        let mut ranked: Vec<(usize, f32)> = scores
            .iter()
            .copied()
            .enumerate()
            .filter(|(j, _)| *j != row && normalize_title(&movies[*j].title) != key)
            .collect();
        // 全体ソートは不要、上位 top_n だけ取り出してから並べる
        if top_n < ranked.len() {
            ranked.select_nth_unstable_by(top_n, rank_order);
            ranked.truncate(top_n);
        }
        ranked.sort_unstable_by(rank_order);

        let list = ranked
            .into_iter()
            .map(|(j, score)| {
                let movie = self
                    .artifact
                    .movie(j)
                    .ok_or(QueryError::RowOutOfRange { index: j, len })?;
                Ok(HitEntry {
                    row: j,
                    movie_id: movie.movie_id,
                    title: movie.title.clone(),
                    score,
                })
            })
            .collect::<Result<Vec<_>, QueryError>>()?;
        Ok(Hits { list })
    }
}
