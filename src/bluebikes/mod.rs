//! Loading the station and trip datasets of the bike share system

use station_traffic::traffic_data::{Station, Trip};

use crate::error::LoadError;

pub mod model;
pub mod source;
mod time;

use model::{StationFeed, TripRecord};

/// Parses the station feed, stations keep the order of the feed
pub fn parse_stations(bytes: &[u8]) -> Result<Vec<Station>, LoadError> {
    let feed: StationFeed = serde_json::from_slice(bytes)?;
    Ok(feed.into_records().into_iter().map(Station::from).collect())
}

/// Parses a trip export, timestamps are parsed here once rather than on each filter
pub fn parse_trips<R: std::io::Read>(reader: R) -> Result<Vec<Trip>, LoadError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut trips = Vec::new();
    for result in rdr.deserialize() {
        let record: TripRecord = result?;
        trips.push(record.into());
    }
    Ok(trips)
}
