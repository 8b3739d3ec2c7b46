use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Active Memory 条目
///
/// 外部确认诊断正确时追加，之后不再修改或删除。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActiveMemoryEntry {
    /// 被分析的困扰文本
    #[serde(alias = "queixa_analisada")]
    pub complaint: String,

    /// 识别出的字母
    #[serde(alias = "letras_identificadas")]
    pub letters: Vec<String>,

    /// 综合诊断
    #[serde(alias = "diagnostico_sintetizado")]
    pub diagnosis: String,

    /// 记录时间
    #[serde(default = "Utc::now")]
    pub recorded_at: DateTime<Utc>,
}

impl ActiveMemoryEntry {
    pub fn new(complaint: &str, letters: Vec<String>, diagnosis: &str) -> Self {
        Self {
            complaint: complaint.to_string(),
            letters,
            diagnosis: diagnosis.to_string(),
            recorded_at: Utc::now(),
        }
    }
}
