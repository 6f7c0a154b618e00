use std::sync::Arc;

use aisstream::{ConnectionState, ShipFeed};
use axum::{
    extract::State,
    routing::{get, on},
    Json, Router,
};
use schemars::JsonSchema;
use serde::Serialize;
use tracking::{
    collector::CollectorStatus,
    server::Server,
    vessels::{CacheStats, VesselCacheRef},
};

use crate::{
    common::{route_not_found, schema_no_example, METHOD_FILTER_ALL},
    WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema_no_example::<StatusDto>))
        .route("/", get(get_status))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct StatusDto {
    pub status: String,
    pub version: String,
    pub feeds: FeedsDto,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct FeedsDto {
    pub collectors: Vec<CollectorStatus>,
    pub ships: ShipsDto,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize, JsonSchema)]
pub struct ShipsDto {
    pub state: ConnectionState,
    /// Missing if the vessel cache does not answer.
    pub cache: Option<CacheStats>,
}

async fn get_status(
    State(collectors): State<Arc<Server>>,
    State(ships): State<ShipFeed>,
) -> Json<StatusDto> {
    let cache = match ships.cache.stats().await {
        Ok(stats) => Some(stats),
        Err(why) => {
            log::warn!("vessel cache stats unavailable: {}", why);
            None
        }
    };

    Json(StatusDto {
        status: "ok".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        feeds: FeedsDto {
            collectors: collectors.statuses(),
            ships: ShipsDto {
                state: ships.state(),
                cache,
            },
        },
    })
}
