/// This crate is a content-based movie recommender using a TF-IDF Vectorizer.
pub mod config;
pub mod error;
pub mod features;
pub mod model;
pub mod recommend;
pub mod utils;
pub mod vectorizer;

/// Recommender configuration
/// Build and query settings (result count, cast limit, director role,
/// stop words, tf formula). Loadable from a TOML file; every field defaults.
pub use config::RecommenderConfig;

/// Raw and validated movie records
/// - `RawMovie`: one joined movie + credits row with structured fields still as text
/// - `MovieRecord`: validated record, structured fields parsed into name lists
/// - `TaggedMovie`: a movie reduced to its tag string
/// - `FeatureExtractor`: turns `RawMovie` into `MovieRecord`; a field that
///   cannot be parsed becomes an empty list instead of an error
pub use features::{FeatureExtractor, MovieRecord, RawMovie, TaggedMovie};

/// Dataset loading
/// Reads the movie metadata and credits CSV files and joins them on title.
pub use features::dataset::load_raw_movies;

/// TF-IDF Vectorizer
/// Fits a vocabulary over all tag strings at once and produces one
/// L2-normalized sparse TF-IDF row per movie.
///
/// `TfIdfVectorizer<E>` takes the calculation engine as a generic parameter:
/// - `DefaultTfIdfEngine`: raw count × smoothed idf
/// - `SublinearTfIdfEngine`: (1 + ln count) × smoothed idf
pub use vectorizer::{
    tfidf::{DefaultTfIdfEngine, SublinearTfIdfEngine, TfIdfEngine},
    TfIdfVectorizer, VectorMatrix,
};

/// Model artifact
/// The bundle produced by the offline build and consumed by queries:
/// - `SimilarityMatrix`: N×N cosine similarity, symmetric, diagonal 1.0
///   (0.0 for movies without any usable term)
/// - `TitleIndex`: normalized title → row, last write wins on collision
/// - `ModelArtifact`: both of the above plus `(movie_id, title)` per row
///
/// # Serialization
/// CBOR via `ModelArtifact::save` / `ModelArtifact::load`, lossless.
pub use model::{
    builder::{BuildReport, ModelBuilder},
    similarity::SimilarityMatrix,
    title_index::{normalize_title, TitleIndex},
    ArtifactSummary, ModelArtifact, MovieEntry,
};

/// Recommendation queries
/// - `Recommender`: ranks every other movie against the query movie
/// - `RecommendationService`: owns the loaded model for the whole process,
///   swaps it atomically on reload and turns every failure into an empty
///   result at `get_movie_recommendations`
pub use recommend::{service::RecommendationService, HitEntry, Hits, Recommendation, Recommender};
