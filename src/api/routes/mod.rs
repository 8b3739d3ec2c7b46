//! Routes 模块
//!
//! 定义 API 路由。

pub mod analysis_routes;
pub mod chart_routes;
pub mod letter_routes;
pub mod session_routes;
