use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use movie_recommender::{
    DefaultTfIdfEngine, ModelBuilder, MovieRecord, Recommender, RecommenderConfig,
    SimilarityMatrix, TfIdfVectorizer,
};
use movie_recommender::vectorizer::token::Tokenizer;

const WORDS: &[&str] = &[
    "pirate", "treasure", "ocean", "space", "alien", "robot", "wedding", "comedy", "heist",
    "bank", "detective", "murder", "haunted", "house", "dragon", "kingdom", "war", "soldier",
    "romance", "paris", "zombie", "virus", "family", "dog", "school", "music", "band", "car",
    "race", "desert", "island", "storm", "spy", "agent", "vampire", "castle", "ghost", "train",
];

/// Deterministic synthetic corpus, words picked by a small LCG
fn synthetic_records(n: usize) -> Vec<MovieRecord> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 33) as usize
    };
    (0..n)
        .map(|i| {
            let overview: Vec<&str> = (0..20).map(|_| WORDS[next() % WORDS.len()]).collect();
            let keywords: Vec<String> = (0..5).map(|_| WORDS[next() % WORDS.len()].to_string()).collect();
            MovieRecord {
                movie_id: i as i64,
                title: format!("Movie {i}"),
                overview: overview.join(" "),
                keywords,
                ..MovieRecord::default()
            }
        })
        .collect()
}

fn build_and_query_benchmark(c: &mut Criterion) {
    let records = synthetic_records(1000);
    let tags: Vec<String> = records.iter().map(MovieRecord::tag).collect();

    c.bench_function("fit_transform", |b| {
        b.iter(|| {
            let mut vectorizer = TfIdfVectorizer::<DefaultTfIdfEngine>::new(Tokenizer::english());
            vectorizer.fit_transform(&tags)
        });
    });

    let mut vectorizer = TfIdfVectorizer::<DefaultTfIdfEngine>::new(Tokenizer::english());
    let matrix = vectorizer.fit_transform(&tags);
    c.bench_function("similarity_matrix", |b| {
        b.iter(|| SimilarityMatrix::build(&matrix));
    });

    let (artifact, _) = ModelBuilder::new(RecommenderConfig::default())
        .build(&records)
        .expect("synthetic corpus is not empty");
    let recommender = Recommender::new(Arc::new(artifact));
    c.bench_function("recommend", |b| {
        b.iter(|| recommender.recommend("Movie 500", 10));
    });
}

criterion_group!(benches, build_and_query_benchmark);
criterion_main!(benches);
