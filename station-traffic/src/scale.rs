//! Square root scale from station traffic to marker radius, so that a marker's
//! area rather than its radius grows with the number of trips.

use crate::time::TimeFilter;
use crate::traffic_data::{max_traffic, Station};

/// Output range of a [RadiusScale] in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusRange {
    pub low: f64,
    pub high: f64,
}

impl RadiusRange {
    /// Used when every trip is counted
    pub const UNFILTERED: RadiusRange = RadiusRange {
        low: 0.,
        high: 25.,
    };
    /// Used while a time filter is active, fewer trips are counted so small
    /// stations get a floor and differences get more room
    pub const FILTERED: RadiusRange = RadiusRange {
        low: 3.,
        high: 50.,
    };

    pub const fn new(low: f64, high: f64) -> RadiusRange {
        RadiusRange { low, high }
    }

    pub fn for_filter(filter: TimeFilter) -> RadiusRange {
        if filter.is_active() {
            Self::FILTERED
        } else {
            Self::UNFILTERED
        }
    }
}

/// Maps traffic in `0..=max_traffic` to a radius in `range`, 0 to `range.low`
/// and `max_traffic` to `range.high`.
/// # Examples
/// ```rust
/// use station_traffic::scale::{RadiusRange, RadiusScale};
/// let scale = RadiusScale::new(100, RadiusRange::new(0., 20.));
/// assert_eq!(scale.radius(25), 10.);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusScale {
    max_traffic: u32,
    range: RadiusRange,
}

impl RadiusScale {
    pub fn new(max_traffic: u32, range: RadiusRange) -> RadiusScale {
        RadiusScale { max_traffic, range }
    }

    /// Scale for stations from one aggregation pass, the range picked by the filter that was used
    pub fn for_stations(stations: &[Station], filter: TimeFilter) -> RadiusScale {
        Self::new(max_traffic(stations), RadiusRange::for_filter(filter))
    }

    /// With no traffic at all every station is drawn at `range.low`.
    /// Values above `max_traffic` are extrapolated rather than clamped.
    pub fn radius(&self, traffic: u32) -> f64 {
        if self.max_traffic == 0 {
            return self.range.low;
        }
        let fraction = (f64::from(traffic) / f64::from(self.max_traffic)).sqrt();
        self.range.low + fraction * (self.range.high - self.range.low)
    }

    pub fn max_traffic(&self) -> u32 {
        self.max_traffic
    }

    pub fn range(&self) -> RadiusRange {
        self.range
    }
}
