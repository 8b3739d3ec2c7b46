//! Gematria、诊断与塔罗 DTO

use serde::{Deserialize, Serialize};

/// Gematria 请求
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GematriaRequest {
    #[serde(alias = "texto")]
    pub text: String,
}

/// 诊断请求
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DiagnoseRequest {
    #[serde(alias = "queixa")]
    pub complaint: String,
}

/// 诊断结果：按规则顺序去重的字母名
#[derive(Debug, Serialize, Deserialize)]
pub struct DiagnoseResponse {
    pub letters: Vec<String>,
}

/// 确认诊断请求
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfirmHitRequest {
    #[serde(alias = "queixa")]
    pub complaint: String,
    #[serde(alias = "letras")]
    pub letters: Vec<String>,
    #[serde(alias = "diagnostico")]
    pub diagnosis: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfirmHitResponse {
    pub status: String,
}

/// 塔罗牌阵请求
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TarotSpreadRequest {
    #[serde(alias = "cartas")]
    pub cards: Vec<String>,
}
