use axum::{
    extract::{rejection::QueryRejection, OriginalUri, Query, State},
    http::{Method, StatusCode, Uri},
    routing::get,
    Json, Router,
};
use celestrak::TleCatalog;
use chrono::Utc;
use ephemeris::DEFAULT_STEP;
use model::{
    celestial::{MoonInfo, NightProperties, Subpoints, Terminator},
    geojson::Feature,
    satellite::{IssPosition, SatelliteGroup},
};
use serde::Deserialize;

use crate::{
    common::{RouteErrorResponse, RouteResult},
    WebState,
};

const STARLINK: &str = "starlink";

/// Routes served both at the root and below `/api`. Without a fallback so
/// that they can be merged into either router.
pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/subpoints", get(get_subpoints))
        .route("/iss", get(get_iss))
        .route("/terminator", get(get_terminator))
        .route("/night", get(get_night))
        .route("/moon", get(get_moon))
        .route("/starlink", get(get_starlink))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub(crate) struct StepQuery {
    step: Option<f64>,
}

/// Longitude step of the sampled terminator, in degrees.
fn step(
    query: Result<Query<StepQuery>, QueryRejection>,
    uri: &Uri,
) -> RouteResult<f64> {
    match query {
        Ok(Query(params)) => Ok(params.step.unwrap_or(DEFAULT_STEP)),
        Err(why) => Err(RouteErrorResponse::bad_request(why.body_text())
            .with_method(&Method::GET)
            .with_uri(uri.path())),
    }
}

async fn get_subpoints() -> Json<Subpoints> {
    Json(ephemeris::subpoints(&Utc::now()))
}

async fn get_iss(
    OriginalUri(original_uri): OriginalUri,
    State(catalog): State<TleCatalog>,
) -> RouteResult<Json<IssPosition>> {
    catalog.iss(&Utc::now()).await.map(Json).map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    })
}

async fn get_terminator(
    OriginalUri(original_uri): OriginalUri,
    query: Result<Query<StepQuery>, QueryRejection>,
) -> RouteResult<Json<Terminator>> {
    let step = step(query, &original_uri)?;
    let now = Utc::now();
    let line = ephemeris::terminator(&now, step).map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    })?;
    Ok(Json(Terminator {
        terminator: line.collect(),
        timestamp: now,
    }))
}

async fn get_night(
    OriginalUri(original_uri): OriginalUri,
    query: Result<Query<StepQuery>, QueryRejection>,
) -> RouteResult<Json<Feature<NightProperties>>> {
    let step = step(query, &original_uri)?;
    ephemeris::night_polygon(&Utc::now(), step)
        .map(Json)
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

async fn get_moon() -> Json<MoonInfo> {
    Json(ephemeris::moon_info(&Utc::now()))
}

/// Unlike `/api/satellites/starlink`, a missing element set is an internal
/// error here.
async fn get_starlink(
    OriginalUri(original_uri): OriginalUri,
    State(catalog): State<TleCatalog>,
) -> RouteResult<Json<SatelliteGroup>> {
    catalog
        .positions(STARLINK, &Utc::now())
        .await
        .map(Json)
        .map_err(|why| {
            RouteErrorResponse::new(StatusCode::INTERNAL_SERVER_ERROR)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
                .with_message("Starlink positions are not available yet.")
                .with_detailed_information(why.to_string())
        })
}
