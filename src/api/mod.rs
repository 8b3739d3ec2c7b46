//! API 模块
//!
//! 提供 REST API 支持。

#[cfg(test)]
mod api_tests;
pub mod app_state;
pub mod dto;
pub mod handlers;
pub mod routes;

use crate::api::app_state::AppState;
use crate::error::AppError;
use crate::observability::metrics_middleware;
use axum::Router;
use tower_http::trace::TraceLayer;

pub fn create_router(app_state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::letter_routes::create_letter_router())
        .merge(routes::analysis_routes::create_analysis_router())
        .merge(routes::session_routes::create_session_router())
        .merge(routes::chart_routes::create_chart_router());

    let metrics = app_state.metrics.clone();
    Router::new()
        .nest("/api/v1", api)
        .layer(axum::middleware::from_fn_with_state(metrics, metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

pub async fn initialize_api(app_state: AppState) -> Result<Router, AppError> {
    tracing::info!(?app_state, "Initializing API router...");
    Ok(create_router(app_state))
}
