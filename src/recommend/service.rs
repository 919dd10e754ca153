use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{error, info, warn};

use crate::error::{ArtifactError, QueryError};
use crate::model::ModelArtifact;
use crate::recommend::{Recommendation, Recommender};

#[derive(Debug)]
enum ModelState {
    Ready(Arc<ModelArtifact>),
    /// load failed, keeps the cause for every later query
    Unavailable(String),
}

/// Process-wide holder of the loaded model.
///
/// Queries clone the current `Arc` under a short read lock and run without
/// holding it; a reload builds the new artifact first and then swaps the
/// reference, so readers see either the old model or the new one.
#[derive(Debug)]
pub struct RecommendationService {
    state: RwLock<ModelState>,
    top_n: usize,
}

impl RecommendationService {
    pub fn new(artifact: ModelArtifact, top_n: usize) -> Self {
        Self {
            state: RwLock::new(ModelState::Ready(Arc::new(artifact))),
            top_n,
        }
    }

    /// Service whose model could not be obtained
    pub fn unavailable<S: Into<String>>(cause: S, top_n: usize) -> Self {
        Self {
            state: RwLock::new(ModelState::Unavailable(cause.into())),
            top_n,
        }
    }

    /// Load the artifact at `path`.
    ///
    /// Never fails: a missing or corrupt file is logged and recorded, and
    /// every query then answers with an empty result.
    pub fn load<P: AsRef<Path>>(path: P, top_n: usize) -> Self {
        match ModelArtifact::load(path.as_ref()) {
            Ok(artifact) => Self::new(artifact, top_n),
            Err(e) => {
                error!(path = ?path.as_ref(), error = %e, "model artifact could not be loaded");
                Self::unavailable(e.to_string(), top_n)
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.state.read(), ModelState::Ready(_))
    }

    /// Why the model is unavailable, None when it is loaded
    pub fn unavailable_cause(&self) -> Option<String> {
        match &*self.state.read() {
            ModelState::Ready(_) => None,
            ModelState::Unavailable(cause) => Some(cause.clone()),
        }
    }

    /// Replace the current model
    pub fn swap(&self, artifact: ModelArtifact) {
        let movies = artifact.len();
        *self.state.write() = ModelState::Ready(Arc::new(artifact));
        info!(movies, "model swapped");
    }

    /// Load a new artifact and swap it in.
    /// On failure the current model stays in place.
    pub fn reload<P: AsRef<Path>>(&self, path: P) -> Result<(), ArtifactError> {
        match ModelArtifact::load(path.as_ref()) {
            Ok(artifact) => {
                self.swap(artifact);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "reload failed, keeping the current model");
                Err(e)
            }
        }
    }

    /// Query engine bound to the current model
    pub fn recommender(&self) -> Result<Recommender, QueryError> {
        match &*self.state.read() {
            ModelState::Ready(artifact) => Ok(Recommender::new(Arc::clone(artifact))),
            ModelState::Unavailable(cause) => Err(QueryError::ModelUnavailable(cause.clone())),
        }
    }

    pub fn recommend(&self, title: &str, top_n: usize) -> Result<Recommendation, QueryError> {
        self.recommender()?.recommend(title, top_n)
    }

    /// Titles of the movies most similar to `title`.
    ///
    /// Empty when the title is unknown or anything goes wrong; the reason is
    /// logged, never returned.
    pub fn get_movie_recommendations(&self, title: &str) -> Vec<String> {
        match self.recommend(title, self.top_n) {
            Ok(Recommendation::Found { hits, .. }) => hits.into_titles(),
            Ok(Recommendation::NotFound { normalized }) => {
                info!(title, normalized = %normalized, "movie not found");
                Vec::new()
            }
            Err(e) => {
                error!(title, error = %e, "failed to generate recommendations");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecommenderConfig;
    use crate::features::MovieRecord;
    use crate::model::builder::ModelBuilder;

    fn artifact(titles: &[&str]) -> ModelArtifact {
        let records: Vec<MovieRecord> = titles
            .iter()
            .enumerate()
            .map(|(i, t)| MovieRecord {
                movie_id: i as i64,
                title: t.to_string(),
                genres: vec!["Drama".to_string()],
                ..MovieRecord::default()
            })
            .collect();
        ModelBuilder::new(RecommenderConfig::default()).build(&records).unwrap().0
    }

    #[test]
    fn unavailable_model_answers_empty() {
        let service = RecommendationService::load("/no/such/model.cbor", 10);
        assert!(!service.is_ready());
        assert!(service.unavailable_cause().is_some());
        assert!(service.get_movie_recommendations("Avatar").is_empty());
        assert!(matches!(
            service.recommend("Avatar", 10),
            Err(QueryError::ModelUnavailable(_))
        ));
    }

    #[test]
    fn top_n_caps_results() {
        let titles: Vec<String> = (0..15).map(|i| format!("Film {i}")).collect();
        let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
        let service = RecommendationService::new(artifact(&refs), 10);
        let recs = service.get_movie_recommendations("film 0");
        assert_eq!(recs.len(), 10);
        assert!(!recs.contains(&"Film 0".to_string()));
        assert!(service.get_movie_recommendations("Nonexistent Movie Title 9999").is_empty());
    }

    #[test]
    fn swap_replaces_model_for_new_queries() {
        let service = RecommendationService::unavailable("not built yet", 10);
        let held = service.recommender();
        assert!(held.is_err());

        service.swap(artifact(&["One", "Two"]));
        let before = service.recommender().unwrap();
        service.swap(artifact(&["Three", "Four"]));

        // 取得済みの Recommender は古いモデルを見続ける
        assert_eq!(before.recommend("one", 10).unwrap().into_titles(), vec!["Two"]);
        assert_eq!(service.get_movie_recommendations("three"), vec!["Four"]);
        assert!(service.get_movie_recommendations("one").is_empty());
    }

    #[test]
    fn failed_reload_keeps_current_model() {
        let service = RecommendationService::new(artifact(&["One", "Two"]), 10);
        assert!(service.reload("/no/such/model.cbor").is_err());
        assert_eq!(service.get_movie_recommendations("two"), vec!["One"]);
    }
}
