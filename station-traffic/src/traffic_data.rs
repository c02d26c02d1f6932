use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::time::{minutes_since_midnight, MinuteOfDay, TimeFilter};

/// Half width of the time filter window, inclusive, in minutes
pub const WINDOW_MINUTES: u16 = 60;

/// Short code of a dock, the key used to join trips to stations eg. `A32000`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize)]
pub struct StationId(String);

impl StationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StationId {
    fn from(id: &str) -> StationId {
        StationId(id.to_owned())
    }
}

impl From<String> for StationId {
    fn from(id: String) -> StationId {
        StationId(id)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Counts of trips touching a station
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Traffic {
    pub arrivals: u32,
    pub departures: u32,
}

impl Traffic {
    pub fn total(&self) -> u32 {
        self.arrivals + self.departures
    }
}

impl fmt::Display for Traffic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} trips ({} departures, {} arrivals)",
            self.total(),
            self.departures,
            self.arrivals
        )
    }
}

/// A bike share dock. `traffic` is derived and gets overwritten by each call to [compute_station_traffic]
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub id: StationId,
    pub name: Option<String>,
    pub location: geo::Point<f64>,
    pub traffic: Traffic,
}

impl Station {
    /// Station with no traffic counted yet
    pub fn new(id: StationId, name: Option<String>, location: geo::Point<f64>) -> Station {
        Station {
            id,
            name,
            location,
            traffic: Traffic::default(),
        }
    }

    pub fn arrivals(&self) -> u32 {
        self.traffic.arrivals
    }

    pub fn departures(&self) -> u32 {
        self.traffic.departures
    }

    pub fn total_traffic(&self) -> u32 {
        self.traffic.total()
    }
}

/// One rental, from undocking at one station to docking at another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    pub start_station: StationId,
    pub end_station: StationId,
    pub started_at: NaiveDateTime,
    pub ended_at: NaiveDateTime,
}

impl Trip {
    pub fn start_minute(&self) -> MinuteOfDay {
        minutes_since_midnight(&self.started_at)
    }

    pub fn end_minute(&self) -> MinuteOfDay {
        minutes_since_midnight(&self.ended_at)
    }

    /// Whether the trip starts or ends within [WINDOW_MINUTES] of `minute`.
    /// Doesn't wrap around midnight, a trip ending at 23:50 is not near 00:00.
    pub fn is_near(&self, minute: MinuteOfDay) -> bool {
        self.start_minute().distance(minute) <= WINDOW_MINUTES
            || self.end_minute().distance(minute) <= WINDOW_MINUTES
    }
}

/// Trips counted under a time filter, all of them if it is [TimeFilter::Any]
pub fn filter_trips_by_time(trips: &[Trip], filter: TimeFilter) -> Vec<&Trip> {
    match filter {
        TimeFilter::Any => trips.iter().collect(),
        TimeFilter::Around(minute) => trips.iter().filter(|trip| trip.is_near(minute)).collect(),
    }
}

/// Counts arrivals and departures of each station from scratch over `trips`.
/// Stations without trips get zero, trips whose station ids match no station are not counted.
pub fn compute_station_traffic<'t, I>(stations: &[Station], trips: I) -> Vec<Station>
where
    I: IntoIterator<Item = &'t Trip>,
{
    let mut departures: HashMap<&StationId, u32> = HashMap::new();
    let mut arrivals: HashMap<&StationId, u32> = HashMap::new();
    for trip in trips {
        *departures.entry(&trip.start_station).or_default() += 1;
        *arrivals.entry(&trip.end_station).or_default() += 1;
    }

    stations
        .iter()
        .map(|station| Station {
            traffic: Traffic {
                arrivals: arrivals.get(&station.id).copied().unwrap_or(0),
                departures: departures.get(&station.id).copied().unwrap_or(0),
            },
            ..station.clone()
        })
        .collect()
}

/// Largest total traffic of any station, 0 if there are none
pub fn max_traffic(stations: &[Station]) -> u32 {
    stations
        .iter()
        .map(Station::total_traffic)
        .max()
        .unwrap_or(0)
}
