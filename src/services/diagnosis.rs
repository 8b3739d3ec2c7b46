//! 诊断服务
//!
//! 关键词子串匹配，将自由文本困扰映射到字母；以及把外部确认的诊断
//! 追加到 Active Memory。

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::memory::ActiveMemoryEntry;
use crate::storage::memory_log::ActiveMemoryLog;
use crate::symbols::SymbolTable;

/// 确认成功时返回的状态文本
pub const HIT_RECORDED: &str = "Aprendizado registrado com sucesso.";

/// 对困扰文本运行所有诊断规则
///
/// 结果去重，按规则首次命中的顺序排列。没有命中时返回空列表。
pub fn diagnose(symbols: &SymbolTable, complaint: &str) -> Vec<String> {
    let lowered = complaint.to_lowercase();
    let mut letters: Vec<String> = Vec::new();

    for rule in symbols.rules() {
        if letters.iter().any(|l| l == &rule.letter) {
            continue;
        }
        if rule.keywords.iter().any(|k| lowered.contains(k.as_str())) {
            letters.push(rule.letter.clone());
        }
    }

    letters
}

/// 确认命中的请求内容
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmedHit {
    pub complaint: String,
    pub letters: Vec<String>,
    pub diagnosis: String,
}

pub struct DiagnosisService {
    symbols: Arc<SymbolTable>,
    memory_log: Arc<dyn ActiveMemoryLog>,
}

impl DiagnosisService {
    pub fn new(symbols: Arc<SymbolTable>, memory_log: Arc<dyn ActiveMemoryLog>) -> Self {
        Self {
            symbols,
            memory_log,
        }
    }

    pub fn diagnose(&self, complaint: &str) -> Vec<String> {
        let letters = diagnose(&self.symbols, complaint);
        tracing::debug!(matched = letters.len(), "complaint diagnosed");
        letters
    }

    /// 记录一次被确认正确的诊断
    pub async fn confirm_hit(&self, hit: ConfirmedHit) -> Result<&'static str> {
        if hit.complaint.trim().is_empty() {
            return Err(AppError::Validation("complaint must not be empty".into()));
        }
        if let Some(unknown) = hit
            .letters
            .iter()
            .find(|name| self.symbols.get_letter(name).is_none())
        {
            return Err(AppError::Validation(format!("unknown letter: {}", unknown)));
        }

        let entry = ActiveMemoryEntry::new(&hit.complaint, hit.letters, &hit.diagnosis);
        self.memory_log.append(&entry).await?;
        Ok(HIT_RECORDED)
    }
}
