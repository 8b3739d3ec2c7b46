//! 塔罗牌阵解读

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::symbols::SymbolTable;

/// 单张牌的解读
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardInsight {
    pub card: String,
    pub letter: String,
    pub insight: String,
}

/// 牌阵解读结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpreadReading {
    pub cards: Vec<String>,
    pub interpretation: String,
    pub details: Vec<CardInsight>,
}

pub struct TarotService {
    symbols: Arc<SymbolTable>,
}

impl TarotService {
    pub fn new(symbols: Arc<SymbolTable>) -> Self {
        Self { symbols }
    }

    /// 按牌名反查字母，无法识别的牌被忽略
    pub fn interpret_spread(&self, cards: &[String]) -> Result<SpreadReading> {
        let mut details = Vec::new();
        let mut forces = Vec::new();

        for card in cards {
            let Some(letter) = self.symbols.find_by_tarot(card) else {
                tracing::debug!(card = %card, "card has no letter correspondence");
                continue;
            };
            details.push(CardInsight {
                card: card.clone(),
                letter: letter.name.clone(),
                insight: format!(
                    "Representa {}. Associado ao {}.",
                    letter.key_concept, letter.body_zone
                ),
            });
            forces.push(letter.short_concept());
        }

        if forces.is_empty() {
            return Err(AppError::NotFound(
                "Nenhuma carta pôde ser interpretada.".into(),
            ));
        }

        Ok(SpreadReading {
            cards: cards.to_vec(),
            interpretation: format!(
                "A sua jornada se desdobra através das seguintes forças: {}.",
                forces.join(" -> ")
            ),
            details,
        })
    }
}
