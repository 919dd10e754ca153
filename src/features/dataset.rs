use std::collections::HashMap;
use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::info;

use crate::error::DatasetError;
use crate::features::RawMovie;

/// Columns of the movie metadata file that feed the tag.
/// Remaining columns (budget, popularity, ...) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieRow {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: String,
    #[serde(default)]
    pub keywords: String,
}

/// Columns of the credits file
#[derive(Debug, Clone, Deserialize)]
pub struct CreditRow {
    pub movie_id: i64,
    pub title: String,
    #[serde(default)]
    pub cast: String,
    #[serde(default)]
    pub crew: String,
}

/// Read both CSV files and join them on `title`.
pub fn load_raw_movies<P, Q>(movies_path: P, credits_path: Q) -> Result<Vec<RawMovie>, DatasetError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let movies: Vec<MovieRow> = read_csv_file(movies_path.as_ref())?;
    let credits: Vec<CreditRow> = read_csv_file(credits_path.as_ref())?;
    info!(movies = movies.len(), credits = credits.len(), "loaded record sets");
    let merged = merge_on_title(movies, credits);
    info!(rows = merged.len(), "joined movies with credits on title");
    Ok(merged)
}

fn read_csv_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DatasetError> {
    let reader = csv::Reader::from_path(path).map_err(|source| DatasetError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_rows(reader, path)
}

/// Deserialize every row, failing on the first bad one
pub fn read_rows<T, R>(mut reader: csv::Reader<R>, path: &Path) -> Result<Vec<T>, DatasetError>
where
    T: DeserializeOwned,
    R: io::Read,
{
    reader
        .deserialize()
        .map(|row| {
            row.map_err(|source| DatasetError::Record {
                path: path.to_path_buf(),
                source,
            })
        })
        .collect()
}

/// Inner join on `title`.
///
/// Output follows the movie file order. When a movie carries an `id` and some
/// credits row with the same title has that `movie_id`, only those rows are
/// paired with it. Otherwise every credits row with the title matches, in
/// credits order. Movies without credits are dropped.
pub fn merge_on_title(movies: Vec<MovieRow>, credits: Vec<CreditRow>) -> Vec<RawMovie> {
    let mut by_title: HashMap<&str, Vec<&CreditRow>> = HashMap::with_capacity(credits.len());
    for credit in &credits {
        by_title.entry(credit.title.as_str()).or_default().push(credit);
    }

    let mut merged = Vec::with_capacity(movies.len());
    for movie in movies {
        let Some(matches) = by_title.get(movie.title.as_str()) else {
            continue;
        };
        let own = movie.id.is_some_and(|id| matches.iter().any(|c| c.movie_id == id));
        let paired = matches
            .iter()
            .filter(|credit| !own || Some(credit.movie_id) == movie.id);
        for credit in paired {
            merged.push(RawMovie {
                movie_id: credit.movie_id,
                title: movie.title.clone(),
                overview: movie.overview.clone(),
                genres: movie.genres.clone(),
                keywords: movie.keywords.clone(),
                cast: credit.cast.clone(),
                crew: credit.crew.clone(),
            });
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOVIES: &str = "\
budget,genres,id,keywords,overview,title
237000000,\"[{\"\"id\"\": 28, \"\"name\"\": \"\"Action\"\"}]\",19995,[],A marine on Pandora.,Avatar
0,[],1,[],,No Credits
300000000,[],285,[],Pirates again.,Pirates
";

    const CREDITS: &str = "\
movie_id,title,cast,crew
285,Pirates,[],[]
19995,Avatar,\"[{\"\"name\"\": \"\"Sam Worthington\"\"}]\",[]
";

    fn parse<T: DeserializeOwned>(text: &str) -> Vec<T> {
        read_rows(csv::Reader::from_reader(text.as_bytes()), Path::new("inline.csv")).unwrap()
    }

    #[test]
    fn rows_deserialize_with_extra_columns_ignored() {
        let movies: Vec<MovieRow> = parse(MOVIES);
        assert_eq!(movies.len(), 3);
        assert_eq!(movies[0].genres, r#"[{"id": 28, "name": "Action"}]"#);
        assert_eq!(movies[1].overview, None);
    }

    #[test]
    fn join_keeps_movie_order_and_takes_id_from_credits() {
        let merged = merge_on_title(parse(MOVIES), parse(CREDITS));
        let titles: Vec<&str> = merged.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Avatar", "Pirates"]);
        assert_eq!(merged[0].movie_id, 19995);
        assert_eq!(merged[0].cast, r#"[{"name": "Sam Worthington"}]"#);
    }

    #[test]
    fn duplicate_titles_fan_out() {
        let credits = "movie_id,title,cast,crew\n7,Twin,[],[]\n8,Twin,[],[]\n";
        let movies = "title,overview,genres,keywords\nTwin,x,[],[]\n";
        let merged = merge_on_title(parse(movies), parse(credits));
        let ids: Vec<i64> = merged.iter().map(|m| m.movie_id).collect();
        assert_eq!(ids, vec![7, 8]);
    }

    #[test]
    fn same_title_movies_pair_with_their_own_credits() {
        let movies = "id,title,overview,genres,keywords\n\
                      1,The Host,korean monster river,[],[]\n\
                      2,The Host,alien parasite invasion,[],[]\n";
        let credits = "movie_id,title,cast,crew\n1,The Host,[],[]\n2,The Host,[],[]\n";
        let merged = merge_on_title(parse(movies), parse(credits));
        let pairs: Vec<(i64, Option<&str>)> = merged
            .iter()
            .map(|m| (m.movie_id, m.overview.as_deref()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (1, Some("korean monster river")),
                (2, Some("alien parasite invasion")),
            ]
        );
    }

    #[test]
    fn movie_id_without_credit_match_falls_back_to_title() {
        let movies = "id,title,overview,genres,keywords\n3,Twin,x,[],[]\n";
        let credits = "movie_id,title,cast,crew\n7,Twin,[],[]\n8,Twin,[],[]\n";
        let merged = merge_on_title(parse(movies), parse(credits));
        let ids: Vec<i64> = merged.iter().map(|m| m.movie_id).collect();
        assert_eq!(ids, vec![7, 8]);
    }

    #[test]
    fn bad_row_is_reported_with_path() {
        let credits = "movie_id,title,cast,crew\nnot-a-number,Twin,[],[]\n";
        let res: Result<Vec<CreditRow>, _> =
            read_rows(csv::Reader::from_reader(credits.as_bytes()), Path::new("credits.csv"));
        assert!(matches!(res, Err(DatasetError::Record { .. })));
    }
}
