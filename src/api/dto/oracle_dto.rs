//! 神谕 DTO

use serde::Deserialize;

use crate::external::generative::ChatMessage;

pub use crate::services::oracle::OracleReply as OracleChatResponse;

/// 神谕对话请求
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OracleChatRequest {
    #[serde(alias = "pergunta")]
    pub question: String,
    /// 之前的对话，原样由上一次响应返回
    pub history: Vec<ChatMessage>,
}
