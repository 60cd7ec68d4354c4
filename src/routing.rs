//! Application router configuration.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;

use crate::{
    AppState, endpoints,
    import::init_records,
    record::get_records,
    stats::{get_bar_chart, get_combined_data, get_pie_chart, get_sale_statistics},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::RECORDS, get(get_records))
        .route(endpoints::INIT, get(init_records))
        .route(endpoints::STATISTICS, get(get_sale_statistics))
        .route(endpoints::BAR_CHART, get(get_bar_chart))
        .route(endpoints::PIE_CHART, get(get_pie_chart))
        .route(endpoints::COMBINED_DATA, get(get_combined_data))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The JSON 404 response served for unknown paths.
async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "the requested resource could not be found" })),
    )
        .into_response()
}
