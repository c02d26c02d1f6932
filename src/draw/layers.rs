//! Static map setup handed to the map engine: where the camera starts and the
//! bike lane line layers drawn under the station markers.

use serde::Serialize;

use super::geometry::{Camera, Pixels};

/// Initial camera and zoom limits
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapView {
    /// longitude, latitude
    pub center: geo::Point<f64>,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl MapView {
    /// Boston and Cambridge
    pub fn boston() -> Self {
        Self {
            center: geo::Point::new(-71.09415, 42.36027),
            zoom: 12.,
            min_zoom: 5.,
            max_zoom: 18.,
        }
    }

    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.max(self.min_zoom).min(self.max_zoom)
    }

    pub fn initial_camera(&self, width: Pixels, height: Pixels) -> Camera {
        Camera::new(self.center, self.clamp_zoom(self.zoom), width, height)
    }

    /// The camera with its zoom held within limits
    pub fn constrain(&self, camera: Camera) -> Camera {
        camera.zoomed_to(self.clamp_zoom(camera.zoom))
    }
}

impl Default for MapView {
    fn default() -> Self {
        Self::boston()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LinePaint {
    pub line_color: &'static str,
    pub line_width: f64,
    pub line_opacity: f64,
}

impl Default for LinePaint {
    fn default() -> Self {
        Self {
            line_color: "green",
            line_width: 3.,
            line_opacity: 0.4,
        }
    }
}

/// A line layer drawn from a GeoJSON source
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LaneLayer {
    pub id: &'static str,
    pub source: &'static str,
    pub data: &'static str,
    pub paint: LinePaint,
}

pub fn bike_lane_layers() -> [LaneLayer; 2] {
    [
        LaneLayer {
            id: "bike-lanes",
            source: "boston_route",
            data: "https://bostonopendata-boston.opendata.arcgis.com/datasets/boston::existing-bike-network-2022.geojson",
            paint: LinePaint::default(),
        },
        LaneLayer {
            id: "cambridge-bike-lanes",
            source: "cambridge_route",
            data: "https://raw.githubusercontent.com/cambridgegis/cambridgegis_data/main/Recreation/Bike_Facilities/RECREATION_BikeFacilities.geojson",
            paint: LinePaint::default(),
        },
    ]
}
