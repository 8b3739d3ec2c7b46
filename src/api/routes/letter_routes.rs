//! Letter Routes
//!
//! 字母查询、文本分析与冥想。

use crate::api::handlers::letter_handler::*;
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::app_state::AppState;

/// 创建字母路由器
pub fn create_letter_router() -> Router<AppState> {
    Router::new()
        .route("/", get(welcome))
        .route("/letters/:name", get(get_letter))
        .route("/body/:zone", get(get_body_zone))
        .route("/analyze", post(analyze_text))
        .route("/meditation", post(meditation))
}
