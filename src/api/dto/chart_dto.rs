//! 星盘 DTO
//!
//! 请求体的多种写法由 `BirthRequest::normalize` 统一。

pub use crate::models::chart::SoulMap as ChartResponse;
pub use crate::services::gnosis::BirthRequest as ChartRequest;
