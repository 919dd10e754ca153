use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Build and query settings
///
/// Every field has a default, so an empty TOML file (or none at all) is valid.
///
/// ```toml
/// top_n = 10
/// cast_limit = 3
/// director_job = "Director"
/// stop_words = true
/// sublinear_tf = false
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecommenderConfig {
    /// Number of recommendations returned per query
    pub top_n: usize,
    /// How many leading cast members go into the tag
    pub cast_limit: usize,
    /// Crew `job` value that marks a director
    pub director_job: String,
    /// Drop English stop words from the vocabulary
    pub stop_words: bool,
    /// Use `1 + ln(count)` instead of the raw count as term frequency
    pub sublinear_tf: bool,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            cast_limit: 3,
            director_job: "Director".to_string(),
            stop_words: true,
            sublinear_tf: false,
        }
    }
}

impl RecommenderConfig {
    /// Parse a config from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.director_job.trim().is_empty() {
            return Err(ConfigError::Invalid("director_job must not be empty".to_string()));
        }
        Ok(())
    }
}
