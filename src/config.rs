use station_traffic::time::TimeFilter;

use crate::bluebikes::source::DataSource;
use crate::draw::geometry::Pixels;
use crate::error::ConfigError;

pub const DEFAULT_STATIONS: &str = "data/bluebikes-stations.json";
pub const DEFAULT_TRIPS: &str = "data/bluebikes-traffic-2024-03.csv";

/// Settings read from the environment, each falls back to a default when unset
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// `STATIONS_SOURCE`, a file path or http(s) url of the station feed
    pub stations: DataSource,
    /// `TRIPS_SOURCE`, a file path or http(s) url of the trip export
    pub trips: DataSource,
    /// `VIEWPORT_WIDTH`
    pub width: Pixels,
    /// `VIEWPORT_HEIGHT`
    pub height: Pixels,
    /// `TIME_FILTER`, a slider value: minute of the day or -1 for any time
    pub filter: TimeFilter,
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
        let source = |name: &str, default: &str| {
            var(name)
                .unwrap_or_else(|| default.to_owned())
                .parse::<DataSource>()
        };
        // DataSource parsing can't fail
        let stations = source("STATIONS_SOURCE", DEFAULT_STATIONS).unwrap_or_else(|never| match never {});
        let trips = source("TRIPS_SOURCE", DEFAULT_TRIPS).unwrap_or_else(|never| match never {});

        let width = viewport_size(&var, "VIEWPORT_WIDTH", 1024.)?;
        let height = viewport_size(&var, "VIEWPORT_HEIGHT", 768.)?;

        let filter = match var("TIME_FILTER") {
            None => TimeFilter::Any,
            Some(value) => {
                let slider = value.trim().parse::<i32>().map_err(|_| ConfigError::NotANumber {
                    name: "TIME_FILTER",
                    value: value.clone(),
                })?;
                TimeFilter::try_from(slider).map_err(|err| ConfigError::Invalid {
                    name: "TIME_FILTER",
                    reason: err.to_string(),
                })?
            }
        };

        Ok(Config {
            stations,
            trips,
            width,
            height,
            filter,
        })
    }
}

fn viewport_size(
    var: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: f64,
) -> Result<Pixels, ConfigError> {
    let value = match var(name) {
        Some(value) => value,
        None => return Ok(Pixels::new(default)),
    };
    let size: f64 = value.trim().parse().map_err(|_| ConfigError::NotANumber {
        name,
        value: value.clone(),
    })?;
    if !(size.is_finite() && size > 0.) {
        return Err(ConfigError::Invalid {
            name,
            reason: format!("viewport size must be positive, got {}", size),
        });
    }
    Ok(Pixels::new(size))
}
