//! 拉丁字母到希伯来字母的音译表

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::error::{AppError, Result};
use crate::symbols::SymbolTable;

/// 固定音译表。多对一是有意的（v / u / w 都映射到 Vav）。
const LATIN_TO_LETTER: [(&str, &str); 29] = [
    ("a", "Aleph"),
    ("b", "Bet"),
    ("g", "Gimel"),
    ("d", "Dalet"),
    ("h", "He"),
    ("v", "Vav"),
    ("u", "Vav"),
    ("w", "Vav"),
    ("z", "Zayin"),
    ("ch", "Chet"),
    ("t", "Tet"),
    ("i", "Yod"),
    ("y", "Yod"),
    ("j", "Yod"),
    ("k", "Kaf"),
    ("q", "Qof"),
    ("c", "Samekh"),
    ("l", "Lamed"),
    ("m", "Mem"),
    ("n", "Nun"),
    ("s", "Samekh"),
    ("e", "Ayin"),
    ("o", "Ayin"),
    ("f", "Pe"),
    ("p", "Pe"),
    ("ts", "Tsade"),
    ("r", "Resh"),
    ("sh", "Shin"),
    ("x", "Shin"),
];

/// 默认音译表
pub static DEFAULT_MAP: Lazy<TransliterationMap> =
    Lazy::new(|| TransliterationMap::from_pairs(&LATIN_TO_LETTER));

/// 音译表：单字符和双字符组合分开索引
#[derive(Debug, Clone)]
pub struct TransliterationMap {
    singles: HashMap<char, &'static str>,
    digraphs: HashMap<(char, char), &'static str>,
}

/// 一个音译单元
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// 原文中的字符（双字母组合时为两个字符）
    pub original: String,
    /// 目标字母规范名称
    pub letter: &'static str,
}

/// 切分结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segmentation {
    pub segments: Vec<Segment>,
    /// 没有映射而被跳过的字符数
    pub skipped: usize,
}

impl TransliterationMap {
    pub fn from_pairs(pairs: &[(&'static str, &'static str)]) -> Self {
        let mut singles = HashMap::new();
        let mut digraphs = HashMap::new();

        for (latin, letter) in pairs {
            let chars: Vec<char> = latin.chars().collect();
            match chars.as_slice() {
                [c] => {
                    singles.insert(*c, *letter);
                }
                [a, b] => {
                    digraphs.insert((*a, *b), *letter);
                }
                _ => tracing::warn!(latin = %latin, "ignoring transliteration unit longer than two characters"),
            }
        }

        Self { singles, digraphs }
    }

    /// 所有映射目标
    pub fn targets(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.singles
            .values()
            .chain(self.digraphs.values())
            .copied()
    }

    /// 检查所有目标字母都存在于符号表中
    pub fn check_against(&self, table: &SymbolTable) -> Result<()> {
        let mut missing: Vec<&str> = self
            .targets()
            .filter(|target| table.get_letter(target).is_none())
            .collect();

        if missing.is_empty() {
            return Ok(());
        }

        missing.sort_unstable();
        missing.dedup();
        Err(AppError::Config(format!(
            "transliteration targets missing from symbol table: {}",
            missing.join(", ")
        )))
    }

    /// 将文本切分为音译单元
    ///
    /// 输入先转为小写。`segment_digraphs` 为真时优先匹配双字母组合，
    /// 否则逐字符映射。没有映射的字符被静默跳过并计数。
    pub fn segment(&self, text: &str, segment_digraphs: bool) -> Segmentation {
        let chars: Vec<char> = text.to_lowercase().chars().collect();
        let mut result = Segmentation::default();
        let mut i = 0;

        while i < chars.len() {
            if segment_digraphs && i + 1 < chars.len() {
                if let Some(letter) = self.digraphs.get(&(chars[i], chars[i + 1])) {
                    result.segments.push(Segment {
                        original: chars[i..i + 2].iter().collect(),
                        letter: *letter,
                    });
                    i += 2;
                    continue;
                }
            }

            match self.singles.get(&chars[i]) {
                Some(letter) => result.segments.push(Segment {
                    original: chars[i].to_string(),
                    letter: *letter,
                }),
                None => result.skipped += 1,
            }
            i += 1;
        }

        result
    }
}
