//! Gematria 服务
//!
//! 将拉丁文本音译为字母序列并累加数值。没有映射的字符被跳过并计数，
//! 不视为错误。

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;
use crate::symbols::{DEFAULT_MAP, SymbolTable, TransliterationMap};

/// 单个音译单元的明细
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GematriaEntry {
    /// 原文字符
    pub original: String,
    /// 字母规范名称
    pub letter: String,
    /// 字母数值
    pub value: u32,
}

/// 计算结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GematriaResult {
    /// 小写化后的输入
    pub text: String,
    pub total_value: u64,
    pub breakdown: Vec<GematriaEntry>,
    /// 被跳过的字符数
    pub skipped: usize,
}

/// Gematria 计算服务
#[derive(Debug, Clone)]
pub struct GematriaService {
    symbols: Arc<SymbolTable>,
    map: &'static TransliterationMap,
    segment_digraphs: bool,
}

impl GematriaService {
    /// 使用默认音译表创建，并检查所有目标字母存在于符号表
    pub fn new(symbols: Arc<SymbolTable>, segment_digraphs: bool) -> Result<Self> {
        Self::with_map(symbols, &DEFAULT_MAP, segment_digraphs)
    }

    pub fn with_map(
        symbols: Arc<SymbolTable>,
        map: &'static TransliterationMap,
        segment_digraphs: bool,
    ) -> Result<Self> {
        map.check_against(&symbols)?;
        Ok(Self {
            symbols,
            map,
            segment_digraphs,
        })
    }

    pub fn compute(&self, text: &str) -> GematriaResult {
        let segmentation = self.map.segment(text, self.segment_digraphs);
        let mut skipped = segmentation.skipped;
        let mut breakdown = Vec::with_capacity(segmentation.segments.len());

        for segment in segmentation.segments {
            match self.symbols.get_letter(segment.letter) {
                Some(letter) => breakdown.push(GematriaEntry {
                    original: segment.original,
                    letter: letter.name.clone(),
                    value: letter.value,
                }),
                None => skipped += segment.original.chars().count(),
            }
        }

        let total_value: u64 = breakdown.iter().map(|e| u64::from(e.value)).sum();
        tracing::debug!(total_value, units = breakdown.len(), skipped, "gematria computed");

        GematriaResult {
            text: text.to_lowercase(),
            total_value,
            breakdown,
            skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn service(segment_digraphs: bool) -> GematriaService {
        GematriaService::new(Arc::new(SymbolTable::bundled().unwrap()), segment_digraphs).unwrap()
    }

    #[test]
    fn test_bat_sums_bet_aleph_tet() {
        let result = service(true).compute("bat");
        assert_eq!(result.total_value, 12);
        assert_eq!(result.breakdown.len(), 3);
        let letters: Vec<&str> = result.breakdown.iter().map(|e| e.letter.as_str()).collect();
        assert_eq!(letters, vec!["Bet", "Aleph", "Tet"]);
    }

    #[rstest]
    #[case("BAT", 12)]
    #[case("Amor", 1 + 40 + 70 + 200)]
    #[case("", 0)]
    #[case("123 !?", 0)]
    fn test_totals(#[case] text: &str, #[case] expected: u64) {
        assert_eq!(service(true).compute(text).total_value, expected);
    }

    #[rstest]
    #[case("Shalom")]
    #[case("Kabbalah das Águas Primordiais")]
    #[case("tsadik chesed")]
    fn test_total_is_sum_and_breakdown_bounded(#[case] text: &str) {
        for digraphs in [true, false] {
            let result = service(digraphs).compute(text);
            let sum: u64 = result.breakdown.iter().map(|e| u64::from(e.value)).sum();
            assert_eq!(result.total_value, sum);
            assert!(result.breakdown.len() <= text.chars().count());
        }
    }

    #[test]
    fn test_digraph_setting_changes_segmentation() {
        // sh → Shin (300)；逐字符时 s → Samekh (60)、h → He (5)
        assert_eq!(service(true).compute("sh").total_value, 300);
        assert_eq!(service(false).compute("sh").total_value, 65);
    }

    #[test]
    fn test_skipped_characters_are_reported() {
        let result = service(true).compute("a b");
        assert_eq!(result.breakdown.len(), 2);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.text, "a b");
    }

    #[test]
    fn test_deterministic() {
        let service = service(true);
        assert_eq!(service.compute("Verbo"), service.compute("Verbo"));
    }
}
