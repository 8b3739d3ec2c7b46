//! 字母 DTO

use serde::{Deserialize, Serialize};

/// 欢迎信息
#[derive(Debug, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
    pub version: String,
    /// 已加载的字母数量
    pub letters: usize,
}

/// 字母查询参数
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LetterQuery {
    /// architect（默认）、master 或 poet
    pub persona: Option<String>,
}

/// 文本分析请求
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnalyzeRequest {
    #[serde(alias = "texto")]
    pub text: String,
}

/// 冥想请求
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MeditationRequest {
    #[serde(alias = "letra")]
    pub letter: String,
}
