use std::collections::HashMap;

use serde::Serialize;
use station_traffic::scale::RadiusScale;
use station_traffic::traffic_data::{Station, StationId, Traffic};

use super::geometry::{Camera, ScreenPoint};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub fill: &'static str,
    pub fill_opacity: f64,
    pub stroke: &'static str,
    pub stroke_width: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            fill: "steelblue",
            fill_opacity: 0.6,
            stroke: "white",
            stroke_width: 1.,
        }
    }
}

/// Circle drawn over a station
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Marker {
    pub station_id: StationId,
    #[serde(skip)]
    pub location: geo::Point<f64>,
    pub position: ScreenPoint,
    pub radius: f64,
    pub traffic: Traffic,
    pub style: MarkerStyle,
    pub tooltip: String,
}

impl Marker {
    fn set_traffic(&mut self, traffic: Traffic, scale: &RadiusScale) {
        self.traffic = traffic;
        self.radius = scale.radius(traffic.total());
        self.tooltip = traffic.to_string();
    }
}

/// Markers keyed by station, kept across updates so that the rendering surface
/// can move and resize them rather than recreating them
#[derive(Debug, Default)]
pub struct MarkerLayer {
    order: Vec<StationId>,
    markers: HashMap<StationId, Marker>,
}

impl MarkerLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets radius and tooltip of each station's marker from its traffic.
    /// Existing markers keep their position, markers for new stations are
    /// placed with `camera` and markers of stations no longer present are dropped.
    /// Returns the number of markers created.
    pub fn upsert(&mut self, stations: &[Station], scale: &RadiusScale, camera: &Camera) -> usize {
        let mut created = 0;
        let mut markers = HashMap::with_capacity(stations.len());
        self.order.clear();
        for station in stations {
            let mut marker = match self.markers.remove(&station.id) {
                Some(marker) => marker,
                None => {
                    created += 1;
                    Marker {
                        station_id: station.id.clone(),
                        location: station.location,
                        position: camera.project(station.location),
                        radius: 0.,
                        traffic: Traffic::default(),
                        style: MarkerStyle::default(),
                        tooltip: String::new(),
                    }
                }
            };
            marker.set_traffic(station.traffic, scale);
            if markers.insert(station.id.clone(), marker).is_none() {
                self.order.push(station.id.clone());
            }
        }
        if !self.markers.is_empty() {
            tracing::debug!("Dropping {} markers of missing stations", self.markers.len());
        }
        self.markers = markers;
        created
    }

    /// Moves every marker to where its station is under `camera`, radii are left alone
    pub fn reposition(&mut self, camera: &Camera) {
        for marker in self.markers.values_mut() {
            marker.position = camera.project(marker.location);
        }
    }

    pub fn get(&self, station_id: &StationId) -> Option<&Marker> {
        self.markers.get(station_id)
    }

    /// Markers in the order of the station dataset
    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.order.iter().filter_map(move |id| self.markers.get(id))
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::draw::geometry::Pixels;
    use station_traffic::scale::RadiusRange;

    fn camera() -> Camera {
        Camera::new(
            geo::Point::new(-71.09, 42.36),
            12.,
            Pixels::new(800.),
            Pixels::new(600.),
        )
    }

    fn station(id: &str, lon: f64, arrivals: u32, departures: u32) -> Station {
        let mut station = Station::new(id.into(), None, geo::Point::new(lon, 42.36));
        station.traffic = Traffic {
            arrivals,
            departures,
        };
        station
    }

    #[test]
    fn creates_markers_in_station_order() {
        let stations = vec![station("B", -71.08, 1, 2), station("A", -71.1, 0, 0)];
        let scale = RadiusScale::new(3, RadiusRange::UNFILTERED);
        let mut layer = MarkerLayer::new();

        assert_eq!(layer.upsert(&stations, &scale, &camera()), 2);

        let ids: Vec<&str> = layer.iter().map(|m| m.station_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
        let b = layer.get(&"B".into()).unwrap();
        assert_eq!(b.radius, 25.);
        assert_eq!(b.tooltip, "3 trips (2 departures, 1 arrivals)");
        assert_eq!(b.position, camera().project(stations[0].location));
        assert_eq!(layer.get(&"A".into()).unwrap().radius, 0.);
    }

    #[test]
    fn upsert_keeps_positions() {
        let mut layer = MarkerLayer::new();
        let scale = RadiusScale::new(4, RadiusRange::UNFILTERED);
        layer.upsert(&[station("A", -71.08, 2, 2)], &scale, &camera());
        let before = layer.get(&"A".into()).unwrap().position;

        let moved = camera().panned_to(geo::Point::new(-71.0, 42.3));
        let filtered = RadiusScale::new(1, RadiusRange::FILTERED);
        assert_eq!(layer.upsert(&[station("A", -71.08, 1, 0)], &filtered, &moved), 0);

        let marker = layer.get(&"A".into()).unwrap();
        assert_eq!(marker.position, before);
        assert_eq!(marker.radius, 50.);
        assert_eq!(marker.tooltip, "1 trips (0 departures, 1 arrivals)");
    }

    #[test]
    fn reposition_keeps_radii() {
        let mut layer = MarkerLayer::new();
        let scale = RadiusScale::new(4, RadiusRange::UNFILTERED);
        layer.upsert(&[station("A", -71.08, 0, 1)], &scale, &camera());

        let zoomed = camera().zoomed_to(15.);
        layer.reposition(&zoomed);

        let marker = layer.get(&"A".into()).unwrap();
        assert_eq!(marker.radius, 12.5);
        assert_eq!(marker.position, zoomed.project(marker.location));
    }

    #[test]
    fn drops_missing_stations() {
        let mut layer = MarkerLayer::new();
        let scale = RadiusScale::new(0, RadiusRange::UNFILTERED);
        layer.upsert(&[station("A", -71.08, 0, 0), station("B", -71.07, 0, 0)], &scale, &camera());
        layer.upsert(&[station("B", -71.07, 0, 0)], &scale, &camera());
        assert_eq!(layer.len(), 1);
        assert!(layer.get(&"A".into()).is_none());

        layer.upsert(&[], &scale, &camera());
        assert!(layer.is_empty());
        assert_eq!(layer.iter().count(), 0);
    }

    #[test]
    fn serializes_for_the_renderer() {
        let mut layer = MarkerLayer::new();
        let scale = RadiusScale::new(0, RadiusRange::FILTERED);
        layer.upsert(&[station("A", -71.09, 0, 0)], &scale, &camera());

        let json = serde_json::to_value(layer.iter().collect::<Vec<_>>()).unwrap();

        assert_eq!(json[0]["station_id"], "A");
        assert_eq!(json[0]["radius"], 3.);
        assert_eq!(json[0]["style"]["fill"], "steelblue");
        assert_eq!(json[0]["tooltip"], "0 trips (0 departures, 0 arrivals)");
        assert!(json[0].get("location").is_none());
    }
}
