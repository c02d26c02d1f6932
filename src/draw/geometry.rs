use std::{fmt, ops};

use serde::Serialize;

/// Size of a map tile at zoom 0, following the mapbox convention
pub const TILE_SIZE: f64 = 512.;

/// Web mercator is undefined at the poles, latitudes are clamped to the square world
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_6;

/// A distance on the screen
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize)]
pub struct Pixels(f64);

impl ops::Mul<Pixels> for f64 {
    type Output = Pixels;

    fn mul(self, rhs: Pixels) -> Self::Output {
        Pixels(self * rhs.0)
    }
}

impl ops::Add for Pixels {
    type Output = Pixels;

    fn add(self, rhs: Self) -> Self::Output {
        Pixels(self.0 + rhs.0)
    }
}

impl ops::Sub for Pixels {
    type Output = Pixels;

    fn sub(self, rhs: Self) -> Self::Output {
        Pixels(self.0 - rhs.0)
    }
}

impl Pixels {
    pub const fn new(val: f64) -> Self {
        Self(val)
    }
}

impl ops::Deref for Pixels {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Pixels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// A position in the viewport, from the top left corner
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ScreenPoint {
    pub x: Pixels,
    pub y: Pixels,
}

/// What the map engine reported when the camera changed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraEvent {
    Move,
    Zoom,
    Resize,
    MoveEnd,
}

/// Pan and zoom of the map and the size of the viewport it is drawn in
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// longitude, latitude
    pub center: geo::Point<f64>,
    pub zoom: f64,
    pub width: Pixels,
    pub height: Pixels,
}

impl Camera {
    pub fn new(center: geo::Point<f64>, zoom: f64, width: Pixels, height: Pixels) -> Self {
        Self {
            center,
            zoom,
            width,
            height,
        }
    }

    /// Width in pixels of the whole world at this zoom
    pub fn world_size(&self) -> f64 {
        TILE_SIZE * 2f64.powf(self.zoom)
    }

    pub fn panned_to(self, center: geo::Point<f64>) -> Self {
        Self { center, ..self }
    }

    pub fn zoomed_to(self, zoom: f64) -> Self {
        Self { zoom, ..self }
    }

    pub fn resized(self, width: Pixels, height: Pixels) -> Self {
        Self {
            width,
            height,
            ..self
        }
    }

    pub fn project(&self, coord: geo::Point<f64>) -> ScreenPoint {
        project(coord, self)
    }
}

/// Position in the world square, 0 to 1 from the top left at (-180, 85.05)
fn mercator(coord: geo::Point<f64>) -> (f64, f64) {
    use std::f64::consts::PI;
    let latitude = coord.y().max(-MAX_LATITUDE).min(MAX_LATITUDE).to_radians();
    let x = (coord.x() + 180.) / 360.;
    let y = (PI - (PI / 4. + latitude / 2.).tan().ln()) / (2. * PI);
    (x, y)
}

/// Screen position of a coordinate under the camera, the camera center is the
/// middle of the viewport. Needs redoing whenever the camera changes.
pub fn project(coord: geo::Point<f64>, camera: &Camera) -> ScreenPoint {
    let world = camera.world_size();
    let (x, y) = mercator(coord);
    let (center_x, center_y) = mercator(camera.center);
    ScreenPoint {
        x: Pixels((x - center_x) * world) + 0.5 * camera.width,
        y: Pixels((y - center_y) * world) + 0.5 * camera.height,
    }
}
