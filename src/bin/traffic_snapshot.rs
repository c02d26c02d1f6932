use std::process;

use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bike_traffic_map::bluebikes::source::{load_stations, load_trips};
use bike_traffic_map::config::Config;
use bike_traffic_map::controller::{update, Model, Msg, Status};
use bike_traffic_map::draw::layers::{bike_lane_layers, LaneLayer, MapView};
use bike_traffic_map::draw::markers::Marker;
use bike_traffic_map::error::Dataset;

/// What the map would draw, written to stdout as JSON
#[derive(Serialize)]
struct Snapshot<'m> {
    status: &'static str,
    failed: Vec<Dataset>,
    time_label: String,
    counted_trips: usize,
    layers: [LaneLayer; 2],
    markers: Vec<&'m Marker>,
}

impl<'m> Snapshot<'m> {
    fn of(model: &'m Model) -> Self {
        let (status, failed) = match model.status() {
            Status::Loading => ("loading", vec![]),
            Status::Ready(_) => ("ready", vec![]),
            Status::Failed(failed) => ("failed", failed),
        };
        Snapshot {
            status,
            failed,
            time_label: model.time_label(),
            counted_trips: model.counted_trips(),
            layers: bike_lane_layers(),
            markers: model.markers().collect(),
        }
    }
}

async fn run(config: Config) -> Result<Model, Box<dyn std::error::Error>> {
    let view = MapView::boston();
    let mut model = Model::new(view, view.initial_camera(config.width, config.height));
    update(Msg::SliderInput(config.filter.slider_value()), &mut model);

    let client = reqwest::Client::new();
    let mut loads = FuturesUnordered::new();
    loads.push(futures::future::Either::Left(async {
        Msg::StationsLoaded(load_stations(&config.stations, &client).await)
    }));
    loads.push(futures::future::Either::Right(async {
        Msg::TripsLoaded(load_trips(&config.trips, &client).await)
    }));
    while let Some(msg) = loads.next().await {
        let change = update(msg, &mut model);
        tracing::debug!(?change, "dataset received");
    }

    if let Status::Failed(failed) = model.status() {
        let failed: Vec<String> = failed.iter().map(Dataset::to_string).collect();
        return Err(format!("could not load {}", failed.join(" and ")).into());
    }
    Ok(model)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("bad configuration: {}", err);
            process::exit(1);
        }
    };
    tracing::info!(stations = %config.stations, trips = %config.trips, "Loading datasets");

    let model = match run(config).await {
        Ok(model) => model,
        Err(err) => {
            eprintln!("error building traffic snapshot: {}", err);
            process::exit(1);
        }
    };
    tracing::info!(
        "Drawing {} markers for {}",
        model.marker_layer().len(),
        model.time_label()
    );
    if let Err(err) = serde_json::to_writer_pretty(std::io::stdout(), &Snapshot::of(&model)) {
        eprintln!("error writing snapshot: {}", err);
        process::exit(1);
    }
    println!();
}
