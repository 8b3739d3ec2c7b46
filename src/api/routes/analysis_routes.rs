//! Analysis Routes
//!
//! Gematria、关键词诊断与塔罗牌阵。

use crate::api::handlers::analysis_handler::*;
use axum::{Router, routing::post};

use crate::api::app_state::AppState;

pub fn create_analysis_router() -> Router<AppState> {
    Router::new()
        .route("/gematria", post(gematria))
        .route("/diagnose", post(diagnose))
        .route("/diagnose/confirm", post(confirm_hit))
        .route("/tarot/spread", post(tarot_spread))
}
