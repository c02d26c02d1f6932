//! Records of the bike share station feed (JSON) and monthly trip export (CSV).
//! Only the fields needed for traffic counts are read, others are ignored.

use chrono::NaiveDateTime;
use serde::Deserialize;
use station_traffic::traffic_data::{Station, StationId, Trip};

pub use super::time::{station_id_format, timestamp_format};

/// The station feed is either wrapped like the operator publishes it
/// `{"data": {"stations": [...]}}` or just the array of stations
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StationFeed {
    Wrapped { data: StationFeedData },
    Bare(Vec<StationRecord>),
}

#[derive(Debug, Deserialize)]
pub struct StationFeedData {
    pub stations: Vec<StationRecord>,
}

impl StationFeed {
    pub fn into_records(self) -> Vec<StationRecord> {
        match self {
            StationFeed::Wrapped { data } => data.stations,
            StationFeed::Bare(stations) => stations,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StationRecord {
    /// Short code printed on the dock, trips refer to stations by this
    #[serde(with = "station_id_format")]
    pub short_name: StationId,
    #[serde(default)]
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl From<StationRecord> for Station {
    fn from(record: StationRecord) -> Station {
        Station::new(
            record.short_name,
            record.name,
            geo::Point::new(record.lon, record.lat),
        )
    }
}

/// "ride_id","rideable_type","started_at","ended_at","start_station_name","start_station_id","end_station_name","end_station_id","start_lat","start_lng","end_lat","end_lng","member_casual"
#[derive(Debug, Deserialize)]
pub struct TripRecord {
    #[serde(with = "station_id_format")]
    pub start_station_id: StationId,
    #[serde(with = "station_id_format")]
    pub end_station_id: StationId,
    #[serde(with = "timestamp_format")]
    pub started_at: NaiveDateTime,
    #[serde(with = "timestamp_format")]
    pub ended_at: NaiveDateTime,
}

impl From<TripRecord> for Trip {
    fn from(record: TripRecord) -> Trip {
        Trip {
            start_station: record.start_station_id,
            end_station: record.end_station_id,
            started_at: record.started_at,
            ended_at: record.ended_at,
        }
    }
}
