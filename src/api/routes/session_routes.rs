//! Session Routes

use crate::api::handlers::session_handler::*;
use axum::{Router, routing::post};

use crate::api::app_state::AppState;

/// 创建会话路由器
pub fn create_session_router() -> Router<AppState> {
    Router::new().route("/session", post(session_message))
}
