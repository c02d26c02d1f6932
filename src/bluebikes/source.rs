use std::convert::Infallible;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use station_traffic::traffic_data::{Station, Trip};

use super::{parse_stations, parse_trips};
use crate::error::{Dataset, DatasetError, LoadError};

/// Where a dataset is read from, a local file or fetched once over HTTP
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Http(String),
}

impl DataSource {
    pub async fn fetch(&self, client: &reqwest::Client) -> Result<Vec<u8>, LoadError> {
        match self {
            DataSource::File(path) => Ok(tokio::fs::read(path).await?),
            DataSource::Http(url) => {
                let response = client.get(url).send().await?.error_for_status()?;
                Ok(response.bytes().await?.to_vec())
            }
        }
    }
}

impl FromStr for DataSource {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(DataSource::Http(s.to_owned()))
        } else {
            Ok(DataSource::File(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Http(url) => f.write_str(url),
        }
    }
}

pub async fn load_stations(
    source: &DataSource,
    client: &reqwest::Client,
) -> Result<Vec<Station>, DatasetError> {
    tracing::debug!("Loading stations from {}", source);
    let loaded = source
        .fetch(client)
        .await
        .and_then(|bytes| parse_stations(&bytes));
    log_outcome(Dataset::Stations, source, loaded)
}

pub async fn load_trips(
    source: &DataSource,
    client: &reqwest::Client,
) -> Result<Vec<Trip>, DatasetError> {
    tracing::debug!("Loading trips from {}", source);
    let loaded = source
        .fetch(client)
        .await
        .and_then(|bytes| parse_trips(bytes.as_slice()));
    log_outcome(Dataset::Trips, source, loaded)
}

fn log_outcome<T>(
    dataset: Dataset,
    source: &DataSource,
    loaded: Result<Vec<T>, LoadError>,
) -> Result<Vec<T>, DatasetError> {
    match loaded {
        Ok(records) => {
            tracing::info!("Loaded {} {} from {}", records.len(), dataset, source);
            Ok(records)
        }
        Err(err) => {
            let err = DatasetError::new(dataset, err);
            tracing::error!(%source, "{}", err);
            Err(err)
        }
    }
}
