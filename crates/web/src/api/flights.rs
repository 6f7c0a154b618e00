use axum::{
    extract::State,
    routing::{get, on},
    Json, Router,
};
use model::{flight::Aircraft, geojson::FeatureCollection};
use tracking::store::Latest;

use crate::{
    common::{route_not_found, schema, METHOD_FILTER_ALL},
    WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<Aircraft>))
        .route("/", get(get_flights))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

/// Aircraft of the last successful poll, empty before the first one.
async fn get_flights(
    State(flights): State<Latest<Vec<Aircraft>>>,
) -> Json<FeatureCollection<Aircraft>> {
    let features = match flights.value().await {
        Some(aircraft) => aircraft.iter().map(Aircraft::to_feature).collect(),
        None => FeatureCollection::empty(),
    };
    Json(features)
}
