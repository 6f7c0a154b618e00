use std::sync::Arc;

use aisstream::{AisStreamConfig, ShipFeed};
use celestrak::TleCatalog;
use opensky::{client::OpenSkyClient, collector::FlightCollector};
use tracing_subscriber::EnvFilter;
use tracking::{server::Server, store::Latest};
use volcano::collector::VolcanoReportCollector;
use web::{start_web_server, WebConfig, WebState};

#[tokio::main]
async fn main() {
    env_logger::init();

    // request spans of the http layer
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("could not install tracing subscriber.");

    // collectors
    let mut server = Server::new();

    let catalog = TleCatalog::from_env();
    catalog.spawn_collectors(&mut server);

    let flights = Latest::new();
    let opensky = Arc::new(OpenSkyClient::from_env());
    let flight_store = flights.clone();
    server.collector(move || FlightCollector::new(opensky.clone(), flight_store.clone()));

    let volcano_report = Latest::new();
    let report_store = volcano_report.clone();
    server.collector(move || VolcanoReportCollector::new(report_store.clone()));

    let ships = ShipFeed::start(AisStreamConfig::from_env(), &mut server);

    // web server
    let collectors = Arc::new(server);
    let state = WebState {
        catalog,
        flights,
        ships,
        volcano_report,
        collectors: collectors.clone(),
    };
    start_web_server(state, WebConfig::from_env())
        .await
        .expect("web server failed.");

    collectors.shutdown();
}
