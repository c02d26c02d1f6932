use std::fmt;
use thiserror::Error;

/// The two datasets loaded at startup, each one fails independently of the other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    Stations,
    Trips,
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dataset::Stations => "stations",
            Dataset::Trips => "trips",
        })
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
#[error("failed to load {dataset}: {source}")]
pub struct DatasetError {
    pub dataset: Dataset,
    #[source]
    pub source: LoadError,
}

impl DatasetError {
    pub fn new(dataset: Dataset, source: impl Into<LoadError>) -> DatasetError {
        DatasetError {
            dataset,
            source: source.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} should be a number, got {value:?}")]
    NotANumber { name: &'static str, value: String },
    #[error("{name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}
