use serde::Deserialize;
use thiserror::Error;

/// Reason a structured field could not be read
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("not a list of objects: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("element {position} has no name")]
    MissingName { position: usize },
}

/// Outcome of parsing one structured field of a raw record.
///
/// `Missing` and `Malformed` both degrade to an empty list for the tag,
/// but the caller can still tell them apart for reporting.
#[derive(Debug)]
pub enum FieldParse<T> {
    Parsed(T),
    /// field was empty in the source record
    Missing,
    Malformed(FieldError),
}

impl<T: Default> FieldParse<T> {
    /// Parsed value, or the empty fallback
    pub fn unwrap_or_empty(self) -> T {
        match self {
            FieldParse::Parsed(value) => value,
            FieldParse::Missing | FieldParse::Malformed(_) => T::default(),
        }
    }
}

/// `{"id": 28, "name": "Action"}`, other keys ignored
#[derive(Debug, Deserialize)]
struct NamedEntry {
    name: String,
}

/// crew element, only `name` and `job` matter
#[derive(Debug, Deserialize)]
struct CrewEntry {
    name: Option<String>,
    job: Option<String>,
}

/// Collect the `name` of every element, keeping at most `limit` of them.
///
/// Every element must carry a name, otherwise the whole field is malformed.
///
/// # Arguments
/// * `raw` - JSON text such as `[{"id": 28, "name": "Action"}]`
/// * `limit` - keep only the first `limit` names (source order)
pub fn parse_names(raw: &str, limit: Option<usize>) -> FieldParse<Vec<String>> {
    if raw.trim().is_empty() {
        return FieldParse::Missing;
    }
    let entries: Vec<NamedEntry> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => return FieldParse::Malformed(e.into()),
    };
    let mut names: Vec<String> = entries.into_iter().map(|entry| entry.name).collect();
    if let Some(limit) = limit {
        names.truncate(limit);
    }
    FieldParse::Parsed(names)
}

/// Collect the `name` of crew elements whose `job` equals `job`.
/// Other roles are discarded and need not carry a name.
pub fn parse_crew_by_job(raw: &str, job: &str) -> FieldParse<Vec<String>> {
    if raw.trim().is_empty() {
        return FieldParse::Missing;
    }
    let entries: Vec<CrewEntry> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => return FieldParse::Malformed(e.into()),
    };
    let mut names = Vec::new();
    for (position, entry) in entries.into_iter().enumerate() {
        if entry.job.as_deref() != Some(job) {
            continue;
        }
        match entry.name {
            Some(name) => names.push(name),
            None => return FieldParse::Malformed(FieldError::MissingName { position }),
        }
    }
    FieldParse::Parsed(names)
}
