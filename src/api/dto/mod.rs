//! DTO 模块
//!
//! 数据传输对象，用于 API 请求和响应的序列化。

pub mod analysis_dto;
pub mod chart_dto;
pub mod letter_dto;
pub mod oracle_dto;
pub mod session_dto;

pub use analysis_dto::*;
pub use chart_dto::*;
pub use letter_dto::*;
pub use oracle_dto::*;
pub use session_dto::*;
