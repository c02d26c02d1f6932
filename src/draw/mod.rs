pub mod geometry;
pub mod layers;
pub mod markers;
