use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use movie_recommender::{
    load_raw_movies, ModelArtifact, ModelBuilder, Recommendation, RecommendationService,
    RecommenderConfig,
};

#[derive(Parser, Debug)]
#[command(version, about = "Content-based movie recommendations from TF-IDF tags")]
struct CliArgs {
    /// Optional TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a model artifact from the movie and credits CSV files.
    Build {
        /// Movie metadata CSV (title, overview, genres, keywords).
        #[arg(long)]
        movies: PathBuf,
        /// Credits CSV (movie_id, title, cast, crew).
        #[arg(long)]
        credits: PathBuf,
        /// Where to write the artifact.
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Recommend movies similar to a title.
    Recommend {
        /// Model artifact written by `build`.
        #[arg(long, short)]
        model: PathBuf,
        /// Number of recommendations, overrides the config.
        #[arg(long, short = 'n')]
        top_n: Option<usize>,
        title: String,
    },
    /// Print a summary of a model artifact.
    Inspect {
        #[arg(long, short)]
        model: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("failed to install log subscriber")?;

    let config = match &cli_args.config {
        Some(path) => RecommenderConfig::from_toml_file(path)
            .with_context(|| format!("Error loading config {:?}", path))?,
        None => RecommenderConfig::default(),
    };

    match cli_args.command {
        Command::Build { movies, credits, output } => build(config, &movies, &credits, &output),
        Command::Recommend { model, top_n, title } => {
            let top_n = top_n.unwrap_or(config.top_n);
            recommend(&model, top_n, &title, &mut io::stdout().lock())
        }
        Command::Inspect { model } => inspect(&model, &mut io::stdout().lock()),
    }
}

fn build(config: RecommenderConfig, movies: &Path, credits: &Path, output: &Path) -> Result<()> {
    let raws = load_raw_movies(movies, credits).context("Error reading dataset")?;
    let (artifact, report) = ModelBuilder::new(config)
        .build_from_raw(&raws)
        .context("Error building model")?;
    artifact
        .save(output)
        .with_context(|| format!("Error writing artifact {:?}", output))?;
    info!(
        movies = report.movies,
        vocabulary = report.vocabulary,
        duplicate_ids = report.duplicate_ids.len(),
        malformed_fields = report.malformed_fields,
        zero_vectors = report.zero_vectors,
        title_collisions = report.title_collisions.len(),
        "build finished"
    );
    Ok(())
}

fn recommend<W: Write>(model: &Path, top_n: usize, title: &str, out: &mut W) -> Result<()> {
    let service = RecommendationService::load(model, top_n);
    if let Some(cause) = service.unavailable_cause() {
        anyhow::bail!("model unavailable: {}", cause);
    }
    match service.recommend(title, top_n)? {
        Recommendation::Found { query, hits } => {
            debug!("{:#?}", hits);
            writeln!(out, "Recommendations based on {}:", query.title)?;
            if hits.is_empty() {
                writeln!(out, "No recommendations found for this movie.")?;
            } else {
                write!(out, "{}", hits)?;
            }
        }
        Recommendation::NotFound { .. } => writeln!(out, "Movie '{}' not found in database.", title)?,
    }
    Ok(())
}

fn inspect<W: Write>(model: &Path, out: &mut W) -> Result<()> {
    let artifact =
        ModelArtifact::load(model).with_context(|| format!("Error loading artifact {:?}", model))?;
    write!(out, "{}", artifact.summary())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use movie_recommender::MovieRecord;
    use tempfile::TempDir;

    fn movie(id: i64, title: &str, keywords: &[&str]) -> MovieRecord {
        MovieRecord {
            movie_id: id,
            title: title.to_string(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            ..MovieRecord::default()
        }
    }

    fn saved_model(dir: &TempDir) -> PathBuf {
        let records = [
            movie(1, "The Host", &["monster", "river"]),
            movie(2, "The Host", &["alien", "parasite"]),
            movie(3, "Monster", &["monster", "river"]),
            movie(4, "Quiet", &[]),
        ];
        let (artifact, _) = ModelBuilder::new(RecommenderConfig::default())
            .build(&records)
            .unwrap();
        let path = dir.path().join("model.cbor");
        artifact.save(&path).unwrap();
        path
    }

    fn run_recommend(model: &Path, top_n: usize, title: &str) -> String {
        let mut out = Vec::new();
        recommend(model, top_n, title, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn inspect_prints_artifact_summary() {
        let dir = TempDir::new().unwrap();
        let model = saved_model(&dir);
        let mut out = Vec::new();
        inspect(&model, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "movies:          4\nindexed titles:  3\nunreachable:     1\nempty profiles:  1\n"
        );
    }

    #[test]
    fn recommend_prints_ranked_titles() {
        let dir = TempDir::new().unwrap();
        let model = saved_model(&dir);
        let text = run_recommend(&model, 1, "monster");
        assert_eq!(text, "Recommendations based on Monster:\n  1. The Host (1.0000)\n");

        // 同名の行は自分の推薦に出ない
        let text = run_recommend(&model, 5, "the host");
        assert_eq!(
            text,
            "Recommendations based on The Host:\n  1. Monster (0.0000)\n  2. Quiet (0.0000)\n"
        );
    }

    #[test]
    fn recommend_reports_unknown_title() {
        let dir = TempDir::new().unwrap();
        let model = saved_model(&dir);
        let text = run_recommend(&model, 5, "Nope");
        assert_eq!(text, "Movie 'Nope' not found in database.\n");
    }

    #[test]
    fn missing_model_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.cbor");
        assert!(recommend(&missing, 5, "The Host", &mut Vec::new()).is_err());
        assert!(inspect(&missing, &mut Vec::new()).is_err());
    }
}
