use axum::{
    response::IntoResponse,
    routing::{get, on},
    Json, Router,
};
use model::celestial::{MoonInfo, Subpoints};
use serde_json::json;

pub mod celestial;
pub mod flights;
pub mod satellites;
pub mod ships;
pub mod status;
pub mod volcanoes;

use crate::{
    common::{route_not_found, schema, METHOD_FILTER_ALL},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        format!("/api{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub fn routes(state: WebState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/subpoints/schema", get(schema::<Subpoints>))
        .route("/moon/schema", get(schema::<MoonInfo>))
        .merge(celestial::routes(state.clone()))
        .nest_service("/satellites", satellites::routes(state.clone()))
        .nest_service("/flights", flights::routes(state.clone()))
        .nest_service("/ships", ships::routes(state.clone()))
        .nest_service("/volcanoes", volcanoes::routes(state.clone()))
        .nest_service("/status", status::routes(state))
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn ping() -> impl IntoResponse {
    Json(json!({
        "message": "pong!"
    }))
}
