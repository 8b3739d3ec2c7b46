//! 会话 DTO
//!
//! 响应直接使用 `services::session::SessionReply`。

use serde::Deserialize;

/// 会话消息请求
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SessionMessageRequest {
    /// 用户 ID
    pub user_id: String,
    /// 会话 ID，缺失或未知时开启新会话
    pub session_id: Option<String>,
    /// 用户消息
    #[serde(alias = "mensagem")]
    pub message: String,
}
