use std::collections::HashSet;

use tracing::{info, warn};

use crate::config::RecommenderConfig;
use crate::error::BuildError;
use crate::features::{FeatureExtractor, MovieRecord, RawMovie, TaggedMovie};
use crate::model::{
    similarity::SimilarityMatrix,
    title_index::{TitleCollision, TitleIndex},
    ModelArtifact, MovieEntry,
};
use crate::vectorizer::{
    tfidf::{DefaultTfIdfEngine, SublinearTfIdfEngine},
    token::Tokenizer,
    TfIdfVectorizer, VectorMatrix,
};

/// What happened during a build, for logging and inspection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    /// movies in the final model
    pub movies: usize,
    /// ids dropped because an earlier record already used them
    pub duplicate_ids: Vec<i64>,
    /// structured fields replaced by an empty list
    pub malformed_fields: usize,
    /// movies whose tag has no vocabulary term
    pub zero_vectors: usize,
    pub vocabulary: usize,
    pub title_collisions: Vec<TitleCollision>,
}

/// Offline pipeline: records -> tags -> TF-IDF -> similarity + title index
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    config: RecommenderConfig,
}

impl ModelBuilder {
    pub fn new(config: RecommenderConfig) -> Self {
        Self { config }
    }

    /// Parse raw joined rows then build.
    /// Malformed structured fields are counted, never fatal.
    pub fn build_from_raw(&self, raws: &[RawMovie]) -> Result<(ModelArtifact, BuildReport), BuildError> {
        let extractor = FeatureExtractor::new(&self.config);
        let mut malformed = 0;
        let records: Vec<MovieRecord> = raws
            .iter()
            .map(|raw| {
                let (record, bad_fields) = extractor.extract(raw);
                malformed += bad_fields.len();
                record
            })
            .collect();
        if malformed > 0 {
            warn!(fields = malformed, "some structured fields could not be parsed and were left empty");
        }
        let (artifact, mut report) = self.build(&records)?;
        report.malformed_fields = malformed;
        Ok((artifact, report))
    }

    /// Build a model from validated records.
    ///
    /// Records are kept in input order; a record reusing an earlier
    /// `movie_id` is dropped.
    pub fn build(&self, records: &[MovieRecord]) -> Result<(ModelArtifact, BuildReport), BuildError> {
        let mut report = BuildReport::default();

        let mut seen = HashSet::with_capacity(records.len());
        let tagged: Vec<TaggedMovie> = records
            .iter()
            .filter(|record| {
                if seen.insert(record.movie_id) {
                    true
                } else {
                    report.duplicate_ids.push(record.movie_id);
                    false
                }
            })
            .map(TaggedMovie::from)
            .collect();
        if !report.duplicate_ids.is_empty() {
            warn!(ids = ?report.duplicate_ids, "dropped records with duplicate movie_id");
        }
        if tagged.is_empty() {
            return Err(BuildError::EmptyCorpus);
        }
        info!(movies = tagged.len(), "building model");

        let tags: Vec<&str> = tagged.iter().map(|movie| movie.tag.as_str()).collect();
        let (matrix, vocabulary) = self.vectorize(&tags);
        report.vocabulary = vocabulary;
        report.zero_vectors = matrix.rows().iter().filter(|row| row.is_zero()).count();
        if report.zero_vectors > 0 {
            warn!(movies = report.zero_vectors, "movies without any usable term score 0 against everything");
        }

        let similarity = SimilarityMatrix::build(&matrix);
        // タグはここで捨てる
        drop(matrix);

        let (title_index, collisions) = TitleIndex::build(tagged.iter().map(|movie| movie.title.as_str()));
        for collision in &collisions {
            warn!(
                key = %collision.key,
                replaced = %tagged[collision.replaced].title,
                winner = %tagged[collision.winner].title,
                "title collision, earlier movie is no longer reachable by title"
            );
        }
        report.title_collisions = collisions;

        let movies: Vec<MovieEntry> = tagged
            .into_iter()
            .map(|movie| MovieEntry {
                movie_id: movie.movie_id,
                title: movie.title,
            })
            .collect();
        report.movies = movies.len();

        let artifact = ModelArtifact::new(similarity, movies, title_index)?;
        info!(
            movies = report.movies,
            vocabulary = report.vocabulary,
            collisions = report.title_collisions.len(),
            "model built"
        );
        Ok((artifact, report))
    }

    fn vectorize(&self, tags: &[&str]) -> (VectorMatrix, usize) {
        let tokenizer = if self.config.stop_words {
            Tokenizer::english()
        } else {
            Tokenizer::keep_all()
        };
        if self.config.sublinear_tf {
            let mut vectorizer = TfIdfVectorizer::<SublinearTfIdfEngine>::new(tokenizer);
            let matrix = vectorizer.fit_transform(tags);
            (matrix, vectorizer.vocabulary().len())
        } else {
            let mut vectorizer = TfIdfVectorizer::<DefaultTfIdfEngine>::new(tokenizer);
            let matrix = vectorizer.fit_transform(tags);
            (matrix, vectorizer.vocabulary().len())
        }
    }
}
