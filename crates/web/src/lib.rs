pub use crate::common::RouteResult;

use std::{env, path::PathBuf, sync::Arc};

use aisstream::ShipFeed;
use axum::{
    extract::FromRef,
    http::{HeaderValue, Method},
    response::IntoResponse,
    routing::{get, on},
    Json, Router,
};
use celestrak::TleCatalog;
use common::{route_not_found, METHOD_FILTER_ALL};
use model::flight::Aircraft;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracking::{server::Server, store::Latest};
use volcano::WeeklyReport;

pub mod api;
pub mod common;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:5000";

#[derive(Clone, FromRef)]
pub struct WebState {
    pub catalog: TleCatalog,
    pub flights: Latest<Vec<Aircraft>>,
    pub ships: ShipFeed,
    pub volcano_report: Latest<WeeklyReport>,
    pub collectors: Arc<Server>,
}

#[derive(Debug, Clone)]
pub struct WebConfig {
    pub bind_address: String,
    /// Directory of a prebuilt frontend, served for every path no api route
    /// matches.
    pub static_dir: Option<PathBuf>,
    pub cors_origin: Option<String>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_owned(),
            static_dir: None,
            cors_origin: None,
        }
    }
}

impl WebConfig {
    pub fn from_env() -> Self {
        Self {
            bind_address: env::var("AETHRA_BIND")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_owned()),
            static_dir: env::var("AETHRA_STATIC_DIR").ok().map(PathBuf::from),
            cors_origin: env::var("AETHRA_CORS_ORIGIN").ok(),
        }
    }

    fn cors_layer(&self) -> CorsLayer {
        let origin = match self.cors_origin.as_deref().map(HeaderValue::from_str) {
            Some(Ok(origin)) => AllowOrigin::exact(origin),
            Some(Err(why)) => {
                log::warn!("ignoring invalid AETHRA_CORS_ORIGIN: {}", why);
                AllowOrigin::from(Any)
            }
            None => AllowOrigin::from(Any),
        };
        CorsLayer::new()
            .allow_methods([Method::GET])
            .allow_origin(origin)
    }
}

pub fn router(state: WebState, config: &WebConfig) -> Router {
    let routes = Router::new()
        .merge(api::celestial::routes(state.clone()))
        .nest_service("/api", api::routes(state));

    let routes = match &config.static_dir {
        Some(dir) => routes.fallback_service(
            ServeDir::new(dir).not_found_service(ServeFile::new(dir.join("index.html"))),
        ),
        None => routes
            .route("/", get(online))
            .fallback_service(on(METHOD_FILTER_ALL, route_not_found)),
    };

    routes
        .layer(TraceLayer::new_for_http())
        .layer(config.cors_layer())
}

pub async fn start_web_server(state: WebState, config: WebConfig) -> std::io::Result<()> {
    let routes = router(state, &config);

    let listener = TcpListener::bind(&config.bind_address).await?;
    log::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, routes.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(why) = tokio::signal::ctrl_c().await {
                log::error!("could not listen for shutdown signal: {}", why);
                std::future::pending::<()>().await;
            }
        })
        .await?;

    Ok(())
}

async fn online() -> impl IntoResponse {
    Json(json!({
        "message": "Aethra Backend Online"
    }))
}
