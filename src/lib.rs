//! Station traffic overlay for a bike share map: loads the station feed and
//! trip export, keeps one marker per station sized by the trips around the
//! chosen time of day and positioned under the current map camera.

pub mod bluebikes;
pub mod config;
pub mod controller;
pub mod draw;
pub mod error;

pub use station_traffic::{scale, time, traffic_data};
