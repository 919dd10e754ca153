pub mod dataset;
pub mod field;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RecommenderConfig;
use crate::features::field::{parse_crew_by_job, parse_names, FieldParse};

/// Raw joined movie + credits row.
/// Structured columns are still JSON text at this point.
#[derive(Debug, Clone, Default)]
pub struct RawMovie {
    pub movie_id: i64,
    pub title: String,
    pub overview: Option<String>,
    pub genres: String,
    pub keywords: String,
    pub cast: String,
    pub crew: String,
}

/// Validated per-movie input record
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovieRecord {
    pub movie_id: i64,
    pub title: String,
    pub overview: String,
    pub genres: Vec<String>,
    pub keywords: Vec<String>,
    /// lead billing, at most `cast_limit` names
    pub cast: Vec<String>,
    pub crew_directors: Vec<String>,
}

impl MovieRecord {
    /// Concatenate overview, genres, keywords, cast and directors
    /// into one space separated tag string.
    ///
    /// The order is fixed so that tags are reproducible.
    pub fn tag(&self) -> String {
        [
            self.overview.clone(),
            self.genres.join(" "),
            self.keywords.join(" "),
            self.cast.join(" "),
            self.crew_directors.join(" "),
        ]
        .join(" ")
    }
}

/// A movie reduced to the text used for vectorization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedMovie {
    pub movie_id: i64,
    pub title: String,
    pub tag: String,
}

impl From<&MovieRecord> for TaggedMovie {
    fn from(record: &MovieRecord) -> Self {
        TaggedMovie {
            movie_id: record.movie_id,
            title: record.title.clone(),
            tag: record.tag(),
        }
    }
}

/// Structured columns of a raw row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Genres,
    Keywords,
    Cast,
    Crew,
}

/// Turns raw rows into validated `MovieRecord`s
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    cast_limit: usize,
    director_job: String,
}

impl FeatureExtractor {
    pub fn new(config: &RecommenderConfig) -> Self {
        Self {
            cast_limit: config.cast_limit,
            director_job: config.director_job.clone(),
        }
    }

    /// Parse every structured field of `raw`.
    ///
    /// Never fails: a field that cannot be parsed becomes an empty list and
    /// its kind is returned in the second element so the caller can count it.
    pub fn extract(&self, raw: &RawMovie) -> (MovieRecord, Vec<FieldKind>) {
        let mut malformed = Vec::new();
        let mut take = |kind: FieldKind, parsed: FieldParse<Vec<String>>| -> Vec<String> {
            if let FieldParse::Malformed(e) = &parsed {
                debug!(movie_id = raw.movie_id, field = ?kind, error = %e, "malformed field, using empty list");
                malformed.push(kind);
            }
            parsed.unwrap_or_empty()
        };

        let genres = take(FieldKind::Genres, parse_names(&raw.genres, None));
        let keywords = take(FieldKind::Keywords, parse_names(&raw.keywords, None));
        let cast = take(FieldKind::Cast, parse_names(&raw.cast, Some(self.cast_limit)));
        let crew_directors = take(FieldKind::Crew, parse_crew_by_job(&raw.crew, &self.director_job));

        let record = MovieRecord {
            movie_id: raw.movie_id,
            title: raw.title.clone(),
            overview: raw.overview.clone().unwrap_or_default(),
            genres,
            keywords,
            cast,
            crew_directors,
        };
        (record, malformed)
    }
}
