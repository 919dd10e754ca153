use std::path::PathBuf;

use thiserror::Error;

/// Failure while reading the raw movie / credits record sets
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("bad record in {path:?}: {source}")]
    Record {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Failure of the offline model build
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("cannot build a model from an empty corpus")]
    EmptyCorpus,

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

/// ArtifactLoadFailure and friends
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact io error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode artifact: {0}")]
    Decode(#[source] serde_cbor::Error),

    #[error("failed to encode artifact: {0}")]
    Encode(#[source] serde_cbor::Error),

    #[error("unsupported artifact format version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },

    #[error("inconsistent artifact: {0}")]
    Inconsistent(String),
}

/// Internal failure while answering a recommendation query.
/// "not found" is not an error, see `Recommendation::NotFound`.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("model is not loaded: {0}")]
    ModelUnavailable(String),

    #[error("row {index} out of range for {len} movies")]
    RowOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}
