//! Keeps the station markers in step with the loaded data, the time slider and the map camera.
//!
//! The map engine and UI feed [Msg]s to [update] which re-derives what changed
//! from the model's authoritative state: trips, stations, filter and camera.
//! Radii change only on data or filter changes, positions only on camera changes.

use station_traffic::scale::RadiusScale;
use station_traffic::time::TimeFilter;
use station_traffic::traffic_data::{compute_station_traffic, filter_trips_by_time, Station, Trip};

use crate::draw::geometry::{Camera, CameraEvent};
use crate::draw::layers::MapView;
use crate::draw::markers::{Marker, MarkerLayer};
use crate::error::{Dataset, DatasetError};

pub enum Msg {
    StationsLoaded(Result<Vec<Station>, DatasetError>),
    TripsLoaded(Result<Vec<Trip>, DatasetError>),
    /// Raw value of the time slider, -1 for any time
    SliderInput(i32),
    CameraMoved(CameraEvent, Camera),
}

/// What the rendering surface needs to redraw after an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Nothing,
    /// marker positions moved
    Positions,
    /// marker radii and tooltips changed
    Radii,
    /// markers were created
    Scene,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Loading,
    Ready(TimeFilter),
    /// Loading one or both datasets failed, nothing will be drawn
    Failed(Vec<Dataset>),
}

enum Slot<T> {
    Pending,
    Loaded(T),
    Failed,
}

impl<T> Slot<T> {
    fn receive(&mut self, result: Result<T, DatasetError>) {
        *self = match result {
            Ok(data) => Slot::Loaded(data),
            Err(err) => {
                tracing::warn!("{}", err);
                Slot::Failed
            }
        };
    }
}

/// Data read only once both datasets are in
struct TrafficData {
    stations: Vec<Station>,
    trips: Vec<Trip>,
    /// `stations` with traffic counted under the current filter
    counted: Vec<Station>,
}

enum State {
    Loading {
        stations: Slot<Vec<Station>>,
        trips: Slot<Vec<Trip>>,
    },
    Ready(TrafficData),
}

pub struct Model {
    state: State,
    filter: TimeFilter,
    camera: Camera,
    view: MapView,
    markers: MarkerLayer,
}

impl Model {
    pub fn new(view: MapView, camera: Camera) -> Self {
        Self {
            state: State::Loading {
                stations: Slot::Pending,
                trips: Slot::Pending,
            },
            filter: TimeFilter::Any,
            camera: view.constrain(camera),
            view,
            markers: MarkerLayer::new(),
        }
    }

    pub fn status(&self) -> Status {
        match &self.state {
            State::Ready(_) => Status::Ready(self.filter),
            State::Loading { stations, trips } => {
                let mut failed = vec![];
                if let Slot::Failed = stations {
                    failed.push(Dataset::Stations);
                }
                if let Slot::Failed = trips {
                    failed.push(Dataset::Trips);
                }
                if failed.is_empty() {
                    Status::Loading
                } else {
                    Status::Failed(failed)
                }
            }
        }
    }

    pub fn filter(&self) -> TimeFilter {
        self.filter
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Text for the selected time next to the slider
    pub fn time_label(&self) -> String {
        self.filter.label()
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    pub fn marker_layer(&self) -> &MarkerLayer {
        &self.markers
    }

    /// Stations with traffic counted under the current filter, empty until loaded
    pub fn stations(&self) -> &[Station] {
        match &self.state {
            State::Ready(data) => &data.counted,
            State::Loading { .. } => &[],
        }
    }

    /// Number of trips counted under the current filter
    pub fn counted_trips(&self) -> usize {
        match &self.state {
            State::Ready(data) => filter_trips_by_time(&data.trips, self.filter).len(),
            State::Loading { .. } => 0,
        }
    }

    /// Moves to ready once both datasets are in
    fn try_ready(&mut self) -> Change {
        let ready = matches!(
            &self.state,
            State::Loading {
                stations: Slot::Loaded(_),
                trips: Slot::Loaded(_),
            }
        );
        if !ready {
            return Change::Nothing;
        }
        let loading = std::mem::replace(
            &mut self.state,
            State::Ready(TrafficData {
                stations: vec![],
                trips: vec![],
                counted: vec![],
            }),
        );
        if let State::Loading {
            stations: Slot::Loaded(stations),
            trips: Slot::Loaded(trips),
        } = loading
        {
            tracing::info!("Ready with {} stations and {} trips", stations.len(), trips.len());
            self.state = State::Ready(TrafficData {
                stations,
                trips,
                counted: vec![],
            });
        }
        self.recount()
    }

    /// Counts traffic from scratch under the current filter and resizes markers to match
    fn recount(&mut self) -> Change {
        let data = match &mut self.state {
            State::Ready(data) => data,
            State::Loading { .. } => return Change::Nothing,
        };
        let trips = filter_trips_by_time(&data.trips, self.filter);
        data.counted = compute_station_traffic(&data.stations, trips.iter().copied());
        let scale = RadiusScale::for_stations(&data.counted, self.filter);
        tracing::debug!(
            "Counted {} trips for {} with max traffic {}",
            trips.len(),
            self.filter.label(),
            scale.max_traffic()
        );
        if self.markers.upsert(&data.counted, &scale, &self.camera) > 0 {
            Change::Scene
        } else {
            Change::Radii
        }
    }
}

pub fn update(msg: Msg, model: &mut Model) -> Change {
    match msg {
        Msg::StationsLoaded(result) => {
            if let State::Loading { stations, .. } = &mut model.state {
                stations.receive(result);
                model.try_ready()
            } else {
                tracing::warn!("Ignoring stations received after loading");
                Change::Nothing
            }
        }

        Msg::TripsLoaded(result) => {
            if let State::Loading { trips, .. } = &mut model.state {
                trips.receive(result);
                model.try_ready()
            } else {
                tracing::warn!("Ignoring trips received after loading");
                Change::Nothing
            }
        }

        Msg::SliderInput(value) => match TimeFilter::try_from(value) {
            Ok(filter) => {
                model.filter = filter;
                model.recount()
            }
            Err(err) => {
                tracing::warn!("{}", err);
                Change::Nothing
            }
        },

        Msg::CameraMoved(event, camera) => {
            model.camera = model.view.constrain(camera);
            tracing::trace!(?event, zoom = model.camera.zoom, "camera moved");
            if model.markers.is_empty() {
                Change::Nothing
            } else {
                model.markers.reposition(&model.camera);
                Change::Positions
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::draw::geometry::Pixels;
    use crate::error::LoadError;
    use chrono::NaiveDate;
    use station_traffic::time::MinuteOfDay;

    fn model() -> Model {
        let view = MapView::boston();
        Model::new(view, view.initial_camera(Pixels::new(800.), Pixels::new(600.)))
    }

    fn stations() -> Vec<Station> {
        vec![
            Station::new("A".into(), None, geo::Point::new(-71.09, 42.36)),
            Station::new("B".into(), Some("Kendall".to_owned()), geo::Point::new(-71.08, 42.362)),
        ]
    }

    fn trip(from: &str, to: &str, start: (u32, u32), end: (u32, u32)) -> Trip {
        let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        Trip {
            start_station: from.into(),
            end_station: to.into(),
            started_at: day.and_hms_opt(start.0, start.1, 0).unwrap(),
            ended_at: day.and_hms_opt(end.0, end.1, 0).unwrap(),
        }
    }

    fn trips() -> Vec<Trip> {
        vec![
            trip("A", "B", (8, 0), (8, 20)),
            trip("A", "A", (8, 30), (9, 0)),
            trip("B", "A", (17, 0), (17, 15)),
            trip("B", "B", (17, 30), (17, 50)),
            trip("B", "A", (18, 0), (18, 10)),
        ]
    }

    fn failed(dataset: Dataset) -> DatasetError {
        DatasetError::new(
            dataset,
            LoadError::Io(std::io::Error::new(std::io::ErrorKind::Other, "offline")),
        )
    }

    fn ready_model() -> Model {
        let mut model = model();
        update(Msg::StationsLoaded(Ok(stations())), &mut model);
        update(Msg::TripsLoaded(Ok(trips())), &mut model);
        model
    }

    #[test]
    fn ready_after_both_loads_in_any_order() {
        let mut stations_first = model();
        assert_eq!(update(Msg::StationsLoaded(Ok(stations())), &mut stations_first), Change::Nothing);
        assert_eq!(stations_first.status(), Status::Loading);
        assert_eq!(update(Msg::TripsLoaded(Ok(trips())), &mut stations_first), Change::Scene);

        let mut trips_first = model();
        assert_eq!(update(Msg::TripsLoaded(Ok(trips())), &mut trips_first), Change::Nothing);
        assert_eq!(update(Msg::StationsLoaded(Ok(stations())), &mut trips_first), Change::Scene);

        for model in &[stations_first, trips_first] {
            assert_eq!(model.status(), Status::Ready(TimeFilter::Any));
            assert_eq!(model.marker_layer().len(), 2);
            let a = model.marker_layer().get(&"A".into()).unwrap();
            assert_eq!(a.traffic.departures, 2);
            assert_eq!(a.traffic.arrivals, 3);
            // A has the most traffic so gets the top of the unfiltered range
            assert_eq!(a.radius, 25.);
            assert_eq!(a.tooltip, "5 trips (2 departures, 3 arrivals)");
        }
    }

    #[test]
    fn slider_resizes_without_moving() {
        let mut model = ready_model();
        let before: Vec<_> = model.markers().map(|m| m.position).collect();

        assert_eq!(update(Msg::SliderInput(17 * 60), &mut model), Change::Radii);

        assert_eq!(
            model.status(),
            Status::Ready(TimeFilter::Around(MinuteOfDay::from_hm(17, 0)))
        );
        assert_eq!(model.time_label(), "5:00 PM");
        assert_eq!(model.counted_trips(), 3);
        let after: Vec<_> = model.markers().map(|m| m.position).collect();
        assert_eq!(before, after);
        let b = model.marker_layer().get(&"B".into()).unwrap();
        assert_eq!(b.traffic.total(), 4);
        assert_eq!(b.radius, 50.);
        let a = model.marker_layer().get(&"A".into()).unwrap();
        assert_eq!(a.traffic.total(), 2);
        assert!(a.radius > 3. && a.radius < 50.);
    }

    #[test]
    fn slider_back_to_any_time() {
        let mut model = ready_model();
        update(Msg::SliderInput(8 * 60), &mut model);
        update(Msg::SliderInput(-1), &mut model);
        assert_eq!(model.status(), Status::Ready(TimeFilter::Any));
        assert_eq!(model.time_label(), "(any time)");
        assert_eq!(model.counted_trips(), 5);
        assert_eq!(model.marker_layer().get(&"A".into()).unwrap().radius, 25.);
    }

    #[test]
    fn filter_with_no_trips_draws_the_floor() {
        let mut model = ready_model();
        update(Msg::SliderInput(3 * 60), &mut model);
        assert_eq!(model.counted_trips(), 0);
        for marker in model.markers() {
            assert_eq!(marker.radius, 3.);
        }
    }

    #[test]
    fn invalid_slider_value_is_ignored() {
        let mut model = ready_model();
        assert_eq!(update(Msg::SliderInput(5000), &mut model), Change::Nothing);
        assert_eq!(model.filter(), TimeFilter::Any);
    }

    #[test]
    fn camera_moves_without_resizing() {
        let mut model = ready_model();
        let radii: Vec<f64> = model.markers().map(|m| m.radius).collect();
        let camera = model.camera().zoomed_to(14.);

        assert_eq!(update(Msg::CameraMoved(CameraEvent::Zoom, camera), &mut model), Change::Positions);

        assert_eq!(model.markers().map(|m| m.radius).collect::<Vec<_>>(), radii);
        for marker in model.markers() {
            assert_eq!(marker.position, camera.project(marker.location));
        }
    }

    #[test]
    fn camera_zoom_is_clamped() {
        let mut model = ready_model();
        let camera = model.camera().zoomed_to(25.);
        update(Msg::CameraMoved(CameraEvent::MoveEnd, camera), &mut model);
        assert_eq!(model.camera().zoom, 18.);
    }

    #[test]
    fn input_while_loading_is_kept() {
        let mut model = model();
        let camera = model
            .camera()
            .resized(Pixels::new(1000.), Pixels::new(1000.));
        assert_eq!(update(Msg::CameraMoved(CameraEvent::Resize, camera), &mut model), Change::Nothing);
        assert_eq!(update(Msg::SliderInput(8 * 60), &mut model), Change::Nothing);
        assert_eq!(model.status(), Status::Loading);
        assert!(model.stations().is_empty());

        update(Msg::TripsLoaded(Ok(trips())), &mut model);
        update(Msg::StationsLoaded(Ok(stations())), &mut model);

        assert_eq!(
            model.status(),
            Status::Ready(TimeFilter::Around(MinuteOfDay::from_hm(8, 0)))
        );
        assert_eq!(model.counted_trips(), 2);
        for marker in model.markers() {
            assert_eq!(marker.position, camera.project(marker.location));
        }
    }

    #[test]
    fn failed_load_is_reported() {
        let mut model = model();
        update(Msg::StationsLoaded(Err(failed(Dataset::Stations))), &mut model);
        assert_eq!(model.status(), Status::Failed(vec![Dataset::Stations]));

        assert_eq!(update(Msg::TripsLoaded(Ok(trips())), &mut model), Change::Nothing);
        assert_eq!(model.status(), Status::Failed(vec![Dataset::Stations]));
        assert!(model.marker_layer().is_empty());

        update(Msg::TripsLoaded(Err(failed(Dataset::Trips))), &mut model);
        assert_eq!(
            model.status(),
            Status::Failed(vec![Dataset::Stations, Dataset::Trips])
        );
    }

    #[test]
    fn empty_datasets() {
        let mut model = model();
        update(Msg::StationsLoaded(Ok(vec![])), &mut model);
        assert_eq!(update(Msg::TripsLoaded(Ok(vec![])), &mut model), Change::Radii);
        assert_eq!(model.status(), Status::Ready(TimeFilter::Any));
        assert!(model.marker_layer().is_empty());

        let mut no_trips = self::model();
        update(Msg::StationsLoaded(Ok(stations())), &mut no_trips);
        update(Msg::TripsLoaded(Ok(vec![])), &mut no_trips);
        for marker in no_trips.markers() {
            assert_eq!(marker.radius, 0.);
        }
    }

    #[test]
    fn late_data_is_ignored() {
        let mut model = ready_model();
        assert_eq!(update(Msg::TripsLoaded(Ok(vec![])), &mut model), Change::Nothing);
        assert_eq!(model.counted_trips(), 5);
    }
}
