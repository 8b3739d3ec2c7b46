//! Chart Routes
//!
//! 灵魂地图与神谕对话，都依赖外部协作服务。

use crate::api::handlers::{chart_handler::*, oracle_handler::*};
use axum::{Router, routing::post};

use crate::api::app_state::AppState;

pub fn create_chart_router() -> Router<AppState> {
    Router::new()
        .route("/chart", post(calculate_chart))
        .route("/oracle/chat", post(oracle_chat))
}
