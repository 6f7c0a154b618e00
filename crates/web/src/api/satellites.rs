use axum::{
    extract::{OriginalUri, Path, State},
    http::Method,
    routing::{get, on},
    Json, Router,
};
use celestrak::TleCatalog;
use chrono::Utc;
use model::satellite::SatelliteGroup;
use schemars::JsonSchema;
use serde::Serialize;

use crate::{
    common::{route_not_found, schema, RouteErrorResponse, RouteResult, METHOD_FILTER_ALL},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::resource!("/satellites{}", format_args!($($arg)*))
    };
}

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<SatelliteGroup>))
        .route("/:group", get(get_group))
        .route("/", get(get_groups))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct GroupDto {
    pub name: String,
    pub href: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct GroupsDto {
    pub groups: Vec<GroupDto>,
}

async fn get_groups(State(catalog): State<TleCatalog>) -> Json<GroupsDto> {
    Json(GroupsDto {
        groups: catalog
            .groups()
            .map(|name| GroupDto {
                name: name.to_owned(),
                href: resource!("/{}", name),
            })
            .collect(),
    })
}

async fn get_group(
    OriginalUri(original_uri): OriginalUri,
    State(catalog): State<TleCatalog>,
    Path(group): Path<String>,
) -> RouteResult<Json<SatelliteGroup>> {
    catalog
        .positions(&group, &Utc::now())
        .await
        .map(Json)
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}
