use axum::{
    extract::State,
    routing::{get, on},
    Json, Router,
};
use model::{geojson::FeatureCollection, volcano::Volcano};
use tracking::store::Latest;
use volcano::WeeklyReport;

use crate::{
    common::{route_not_found, schema_no_example, METHOD_FILTER_ALL},
    WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema_no_example::<FeatureCollection<Volcano>>))
        .route("/", get(get_volcanoes))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn get_volcanoes(
    State(report): State<Latest<WeeklyReport>>,
) -> Json<FeatureCollection<Volcano>> {
    let report = report.value().await;
    Json(
        volcano::volcanoes(report.as_deref())
            .iter()
            .map(Volcano::to_feature)
            .collect(),
    )
}
