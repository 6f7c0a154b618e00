use std::{convert::Infallible, time::Duration};

use aisstream::ShipFeed;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, on},
    Json, Router,
};
use axum_extra::TypedHeader;
use chrono::Utc;
use futures::stream::{self, Stream};
use model::{geojson::FeatureCollection, vessel::VesselProperties};
use tokio_stream::StreamExt as _;
use tracking::vessels::VesselCacheRef;

use crate::{
    common::{route_not_found, schema_no_example, METHOD_FILTER_ALL},
    WebState,
};

/// Interval between two snapshots pushed to a stream subscriber.
const STREAM_INTERVAL: Duration = Duration::from_secs(10);

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route(
            "/schema",
            get(schema_no_example::<FeatureCollection<VesselProperties>>),
        )
        .route("/stream", get(sse_handler))
        .route("/", get(get_ships))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

/// Fresh vessels that have reported a position.
async fn features(feed: &ShipFeed) -> FeatureCollection<VesselProperties> {
    feed.cache
        .snapshot(Utc::now())
        .await
        .iter()
        .filter_map(|vessel| vessel.to_feature())
        .collect()
}

async fn get_ships(State(feed): State<ShipFeed>) -> Json<FeatureCollection<VesselProperties>> {
    Json(features(&feed).await)
}

async fn sse_handler(
    user_agent: Option<TypedHeader<headers::UserAgent>>,
    State(feed): State<ShipFeed>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    match user_agent {
        Some(TypedHeader(user_agent)) => {
            log::info!("`{}` subscribed to ships", user_agent.as_str())
        }
        None => log::info!("anonymous client subscribed to ships"),
    }

    let stream = stream::unfold((), move |()| {
        let feed = feed.clone();
        async move {
            let collection = features(&feed).await;
            let event = Event::default()
                .event("ships")
                .json_data(&collection)
                .unwrap_or_else(|why| {
                    log::warn!("could not serialize ship snapshot: {}", why);
                    Event::default().comment("snapshot unavailable")
                });
            Some((event, ()))
        }
    })
    .map(Ok)
    .throttle(STREAM_INTERVAL);

    Sse::new(stream).keep_alive(KeepAlive::default())
}
