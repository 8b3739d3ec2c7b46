//! Handlers 模块
//!
//! HTTP 请求处理程序。

pub mod analysis_handler;
pub mod chart_handler;
pub mod letter_handler;
pub mod oracle_handler;
pub mod session_handler;

pub use analysis_handler::*;
pub use chart_handler::*;
pub use letter_handler::*;
pub use oracle_handler::*;
pub use session_handler::*;
