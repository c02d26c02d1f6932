//! Station traffic aggregation shared by the loaders and the map controller.
//! Nothing in here does I/O so it can be compiled for the browser as well.

pub mod scale;
pub mod time;
pub mod traffic_data;
