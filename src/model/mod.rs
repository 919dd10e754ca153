pub mod builder;
pub mod similarity;
pub mod title_index;

use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ArtifactError;
use crate::model::{similarity::SimilarityMatrix, title_index::TitleIndex};

/// Bumped whenever the serialized layout changes
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Row metadata kept after the build; tags are discarded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieEntry {
    pub movie_id: i64,
    pub title: String,
}

/// Everything the query side needs, built offline and loaded read-only.
///
/// Never mutated after construction; a new model replaces the whole value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    version: u32,
    similarity: SimilarityMatrix,
    movies: Vec<MovieEntry>,
    title_index: TitleIndex,
}

impl ModelArtifact {
    /// Bundle the parts, checking they describe the same corpus
    pub fn new(
        similarity: SimilarityMatrix,
        movies: Vec<MovieEntry>,
        title_index: TitleIndex,
    ) -> Result<Self, ArtifactError> {
        let artifact = Self {
            version: ARTIFACT_FORMAT_VERSION,
            similarity,
            movies,
            title_index,
        };
        artifact.validate()?;
        Ok(artifact)
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        if self.version != ARTIFACT_FORMAT_VERSION {
            return Err(ArtifactError::Version {
                found: self.version,
                expected: ARTIFACT_FORMAT_VERSION,
            });
        }
        if !self.similarity.is_well_formed() {
            return Err(ArtifactError::Inconsistent(
                "similarity buffer is not square".to_string(),
            ));
        }
        if self.similarity.len() != self.movies.len() {
            return Err(ArtifactError::Inconsistent(format!(
                "{} similarity rows for {} movies",
                self.similarity.len(),
                self.movies.len()
            )));
        }
        if let Some((key, row)) = self.title_index.iter().find(|(_, row)| *row >= self.movies.len()) {
            return Err(ArtifactError::Inconsistent(format!(
                "title {key:?} points at row {row} of {}",
                self.movies.len()
            )));
        }
        Ok(())
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    pub fn movies(&self) -> &[MovieEntry] {
        &self.movies
    }

    pub fn movie(&self, row: usize) -> Option<&MovieEntry> {
        self.movies.get(row)
    }

    pub fn title_index(&self) -> &TitleIndex {
        &self.title_index
    }

    /// number of movies
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Rows no title lookup can reach, lost to a title collision
    pub fn unreachable_rows(&self) -> Vec<usize> {
        let indexed: HashSet<usize> = self.title_index.iter().map(|(_, row)| row).collect();
        (0..self.movies.len()).filter(|row| !indexed.contains(row)).collect()
    }

    /// Rows whose tag had no vocabulary term (zero self-similarity)
    pub fn empty_profiles(&self) -> usize {
        (0..self.movies.len())
            .filter(|i| self.similarity.get(*i, *i) == Some(0.0))
            .count()
    }

    pub fn summary(&self) -> ArtifactSummary {
        ArtifactSummary {
            movies: self.len(),
            indexed_titles: self.title_index.len(),
            unreachable_rows: self.unreachable_rows(),
            empty_profiles: self.empty_profiles(),
        }
    }
}

/// Counts printed by `inspect`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSummary {
    pub movies: usize,
    pub indexed_titles: usize,
    pub unreachable_rows: Vec<usize>,
    pub empty_profiles: usize,
}

impl fmt::Display for ArtifactSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "movies:          {}", self.movies)?;
        writeln!(f, "indexed titles:  {}", self.indexed_titles)?;
        writeln!(f, "unreachable:     {}", self.unreachable_rows.len())?;
        writeln!(f, "empty profiles:  {}", self.empty_profiles)
    }
}

/// CBOR persistence
impl ModelArtifact {
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), ArtifactError> {
        serde_cbor::to_writer(writer, self).map_err(ArtifactError::Encode)
    }

    /// Decode and validate an artifact
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ArtifactError> {
        let artifact: Self = serde_cbor::from_reader(reader).map_err(ArtifactError::Decode)?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ArtifactError> {
        let path = path.as_ref();
        let io_err = |source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
        self.to_writer(&mut writer)?;
        writer.flush().map_err(io_err)?;
        info!(path = ?path, movies = self.len(), "saved model artifact");
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact = Self::from_reader(BufReader::new(file))?;
        info!(path = ?path, movies = artifact.len(), "loaded model artifact");
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::{token::Tokenizer, TfIdfVectorizer};

    fn sample() -> ModelArtifact {
        let docs = ["alien planet war", "alien planet", "wedding comedy"];
        let titles = ["Alien War", "Planet", "Wedding"];
        let mut vectorizer: TfIdfVectorizer = TfIdfVectorizer::new(Tokenizer::english());
        let similarity = SimilarityMatrix::build(&vectorizer.fit_transform(&docs));
        let movies = titles
            .iter()
            .enumerate()
            .map(|(i, t)| MovieEntry { movie_id: i as i64 + 100, title: t.to_string() })
            .collect();
        let (index, _) = TitleIndex::build(titles);
        ModelArtifact::new(similarity, movies, index).unwrap()
    }

    #[test]
    fn cbor_round_trip_is_lossless() {
        let artifact = sample();
        let mut buf = Vec::new();
        artifact.to_writer(&mut buf).unwrap();
        let back = ModelArtifact::from_reader(buf.as_slice()).unwrap();
        assert_eq!(back, artifact);
        for i in 0..3 {
            let a = artifact.similarity().row(i).unwrap();
            let b = back.similarity().row(i).unwrap();
            assert!(a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits()));
        }
    }

    #[test]
    fn mismatched_parts_are_rejected() {
        let artifact = sample();
        let res = ModelArtifact::new(
            artifact.similarity().clone(),
            artifact.movies()[..2].to_vec(),
            artifact.title_index().clone(),
        );
        assert!(matches!(res, Err(ArtifactError::Inconsistent(_))));

        let (bad_index, _) = TitleIndex::build(["a", "b", "c", "d"]);
        let res = ModelArtifact::new(
            artifact.similarity().clone(),
            artifact.movies().to_vec(),
            bad_index,
        );
        assert!(matches!(res, Err(ArtifactError::Inconsistent(_))));
    }

    #[test]
    fn summary_counts_shadowed_and_empty_rows() {
        let docs = ["alien planet", "the of and", "alien planet war"];
        let titles = ["Alien", "Silence", "ALIEN"];
        let mut vectorizer: TfIdfVectorizer = TfIdfVectorizer::new(Tokenizer::english());
        let similarity = SimilarityMatrix::build(&vectorizer.fit_transform(&docs));
        let movies = titles
            .iter()
            .enumerate()
            .map(|(i, t)| MovieEntry { movie_id: i as i64, title: t.to_string() })
            .collect();
        let (index, _) = TitleIndex::build(titles);
        let artifact = ModelArtifact::new(similarity, movies, index).unwrap();

        let summary = artifact.summary();
        assert_eq!(
            summary,
            ArtifactSummary {
                movies: 3,
                indexed_titles: 2,
                unreachable_rows: vec![0],
                empty_profiles: 1,
            }
        );
        assert_eq!(
            summary.to_string(),
            "movies:          3\nindexed titles:  2\nunreachable:     1\nempty profiles:  1\n"
        );

        let clean = sample().summary();
        assert!(clean.unreachable_rows.is_empty());
        assert_eq!(clean.empty_profiles, 0);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let res = ModelArtifact::from_reader(&b"definitely not cbor"[..]);
        assert!(matches!(res, Err(ArtifactError::Decode(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let res = ModelArtifact::load("/no/such/model.cbor");
        assert!(matches!(res, Err(ArtifactError::Io { .. })));
    }
}
