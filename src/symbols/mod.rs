//! 符号表模块
//!
//! 22 个字母的只读参考数据集，进程启动时加载一次，之后可无锁并发读取。
//! 提供按名称、塔罗牌的 O(1) 查询，以及按身体区域的线性扫描。

pub mod transliteration;

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::letter::{DiagnosticRule, Letter, normalize_letter_name};

pub use transliteration::{DEFAULT_MAP, Segment, Segmentation, TransliterationMap};

/// 内置数据集
const BUNDLED_DATABASE: &str = include_str!("../../data/scii_database.json");

/// 数据库文件格式
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SymbolDatabase {
    #[serde(alias = "letras")]
    pub letters: Vec<Letter>,
    #[serde(default, alias = "regras_diagnostico")]
    pub diagnostic_rules: Vec<DiagnosticRule>,
}

/// 英文星座名到葡萄牙语名
const ZODIAC_ALIASES: [(&str, &str); 12] = [
    ("aries", "áries"),
    ("taurus", "touro"),
    ("gemini", "gêmeos"),
    ("cancer", "câncer"),
    ("leo", "leão"),
    ("virgo", "virgem"),
    ("libra", "libra"),
    ("scorpio", "escorpião"),
    ("sagittarius", "sagitário"),
    ("capricorn", "capricórnio"),
    ("aquarius", "aquário"),
    ("pisces", "peixes"),
];

fn canonical_sign(sign: &str) -> String {
    let lowered = sign.trim().to_lowercase();
    ZODIAC_ALIASES
        .iter()
        .find(|(english, _)| *english == lowered)
        .map(|(_, portuguese)| portuguese.to_string())
        .unwrap_or(lowered)
}

/// 符号表
#[derive(Debug, Clone)]
pub struct SymbolTable {
    letters: Vec<Letter>,
    by_name: HashMap<String, usize>,
    by_tarot: HashMap<String, usize>,
    rules: Vec<DiagnosticRule>,
}

impl SymbolTable {
    /// 从数据库结构构建符号表
    ///
    /// 字母名称必须唯一。塔罗牌名称重复时记录警告，后写入者生效。
    pub fn from_database(database: SymbolDatabase) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(database.letters.len());
        let mut by_tarot = HashMap::new();

        for (idx, letter) in database.letters.iter().enumerate() {
            if by_name.insert(letter.name.clone(), idx).is_some() {
                return Err(AppError::Config(format!(
                    "duplicate letter name in symbol table: {}",
                    letter.name
                )));
            }

            if let Some(card) = letter.tarot.as_deref().filter(|c| !c.is_empty()) {
                if let Some(previous) = by_tarot.insert(card.to_string(), idx) {
                    tracing::warn!(
                        card = %card,
                        shadowed = %database.letters[previous].name,
                        letter = %letter.name,
                        "duplicate tarot card, last letter wins"
                    );
                }
            }
        }

        let mut rules = Vec::with_capacity(database.diagnostic_rules.len());
        for rule in database.diagnostic_rules {
            if !by_name.contains_key(&rule.letter) {
                return Err(AppError::Config(format!(
                    "diagnostic rule references unknown letter: {}",
                    rule.letter
                )));
            }
            rules.push(DiagnosticRule {
                letter: rule.letter,
                keywords: rule
                    .keywords
                    .into_iter()
                    .map(|k| k.to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect(),
            });
        }

        Ok(Self {
            letters: database.letters,
            by_name,
            by_tarot,
            rules,
        })
    }

    /// 从 JSON 字符串加载
    pub fn from_json(raw: &str) -> Result<Self> {
        let database: SymbolDatabase = serde_json::from_str(raw)?;
        Self::from_database(database)
    }

    /// 内置数据集
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_DATABASE)
    }

    /// 从文件加载，未指定路径时使用内置数据集
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let table = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                Self::from_json(&raw)?
            }
            None => Self::bundled()?,
        };

        tracing::info!(
            letters = table.letters.len(),
            rules = table.rules.len(),
            tarot = table.by_tarot.len(),
            source = %path.map(|p| p.display().to_string()).unwrap_or_else(|| "bundled".into()),
            "symbol table loaded"
        );
        Ok(table)
    }

    /// 按规范名称查询（输入先规范化为首字母大写）
    pub fn get_letter(&self, name: &str) -> Option<&Letter> {
        self.by_name
            .get(&normalize_letter_name(name))
            .map(|&idx| &self.letters[idx])
    }

    /// 按身体区域子串查询，返回表顺序中的第一个匹配
    pub fn find_by_body_zone(&self, query: &str) -> Option<&Letter> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.letters
            .iter()
            .find(|letter| letter.body_zone.to_lowercase().contains(&needle))
    }

    /// 按塔罗牌名称精确查询
    pub fn find_by_tarot(&self, card: &str) -> Option<&Letter> {
        self.by_tarot.get(card).map(|&idx| &self.letters[idx])
    }

    /// 按星座（原型）查询，接受葡萄牙语或英语名称
    pub fn find_by_zodiac(&self, sign: &str) -> Option<&Letter> {
        let wanted = canonical_sign(sign);
        self.letters.iter().find(|letter| {
            letter
                .zodiac_sign
                .as_deref()
                .is_some_and(|s| canonical_sign(s) == wanted)
        })
    }

    /// 文本中出现字形的字母，按表顺序
    pub fn letters_in_text(&self, text: &str) -> Vec<&Letter> {
        self.letters
            .iter()
            .filter(|letter| text.contains(letter.glyph))
            .collect()
    }

    pub fn letters(&self) -> &[Letter] {
        &self.letters
    }

    pub fn rules(&self) -> &[DiagnosticRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }
}
