//! 字母查询服务
//!
//! 三种人格的字母描述、身体区域查询、字形出现分析和引导冥想文本。

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::letter::Letter;
use crate::symbols::SymbolTable;

/// 描述字母时使用的人格
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    /// 原始记录
    #[default]
    Architect,
    /// 正式陈述
    Master,
    /// 抒情陈述
    Poet,
}

impl FromStr for Persona {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "architect" | "arquiteto" => Ok(Persona::Architect),
            "master" | "mestre" => Ok(Persona::Master),
            "poet" | "poeta" => Ok(Persona::Poet),
            other => Err(AppError::Validation(format!("unknown persona: {}", other))),
        }
    }
}

/// 字母描述结果
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum LetterView {
    Record(Letter),
    Voice { persona: Persona, reply: String },
}

/// 文本中出现的字母
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TextAnalysis {
    pub text: String,
    pub letters: Vec<Letter>,
    pub message: String,
}

/// 引导冥想
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Meditation {
    pub letter: String,
    pub text: String,
}

/// 生成字母的引导冥想文本
pub fn guided_meditation(letter: &Letter) -> String {
    format!(
        "**Meditação Guiada da Letra {name} ({glyph}) - {concept}**\n\n\
         *(Introdução)*\n\
         Encontre uma posição confortável... Hoje, vamos comungar com a letra {name}.\n\n\
         *(Visualização e Conexão Corporal)*\n\
         Visualize a forma da letra {name}. Leve essa consciência para {zone}. \
         Com cada inspiração, sinta {function}...\n\n\
         *(Encerramento)*\n\
         Quando estiver pronto, abra os olhos, trazendo a essência de {name} com você.",
        name = letter.name,
        glyph = letter.glyph,
        concept = letter.short_concept(),
        zone = letter.body_zone,
        function = letter.body_function.as_deref().unwrap_or("sua energia"),
    )
}

fn master_voice(letter: &Letter) -> String {
    format!(
        "A letra {} ({}), de valor gemátrico {}, é um pilar do sistema SCII. \
         Seu pictograma original, '{}', ancora seu significado. Associada ao arcano '{}', \
         ela governa o '{}' no Corpo do Verbo, e seu conceito chave é: {}",
        letter.name,
        letter.glyph,
        letter.value,
        letter.pictogram,
        letter.tarot.as_deref().unwrap_or("-"),
        letter.body_zone,
        letter.key_concept,
    )
}

fn poet_voice(letter: &Letter) -> String {
    format!(
        "Contemple {} ({}), a face do indizível. Nascida como um(a) '{}', ela dança no corpo \
         como os(as) '{}'. No grande Oráculo, ela é a voz de '{}'. \
         Silencie-se e escute seu segredo: '{}'.",
        letter.name,
        letter.glyph,
        letter.pictogram,
        letter.body_zone,
        letter.tarot.as_deref().unwrap_or("-"),
        letter.short_concept(),
    )
}

pub struct LetterService {
    symbols: Arc<SymbolTable>,
}

impl LetterService {
    pub fn new(symbols: Arc<SymbolTable>) -> Self {
        Self { symbols }
    }

    fn letter(&self, name: &str) -> Result<&Letter> {
        self.symbols
            .get_letter(name)
            .ok_or_else(|| AppError::NotFound(format!("Letra '{}' não encontrada.", name)))
    }

    pub fn describe(&self, name: &str, persona: Persona) -> Result<LetterView> {
        let letter = self.letter(name)?;
        Ok(match persona {
            Persona::Architect => LetterView::Record(letter.clone()),
            Persona::Master => LetterView::Voice {
                persona,
                reply: master_voice(letter),
            },
            Persona::Poet => LetterView::Voice {
                persona,
                reply: poet_voice(letter),
            },
        })
    }

    pub fn by_body_zone(&self, zone: &str) -> Result<Letter> {
        self.symbols.find_by_body_zone(zone).cloned().ok_or_else(|| {
            AppError::NotFound(format!(
                "Nenhuma letra encontrada para a parte do corpo '{}'.",
                zone
            ))
        })
    }

    pub fn analyze(&self, text: &str) -> TextAnalysis {
        let letters: Vec<Letter> = self
            .symbols
            .letters_in_text(text)
            .into_iter()
            .cloned()
            .collect();

        let message = if letters.is_empty() {
            "Análise concluída. Nenhuma das energias primordiais foi detectada.".to_string()
        } else {
            let names: Vec<&str> = letters.iter().map(|l| l.name.as_str()).collect();
            format!("Análise concluída. Energias encontradas: {}.", names.join(", "))
        };

        TextAnalysis {
            text: text.to_string(),
            letters,
            message,
        }
    }

    pub fn meditation(&self, name: &str) -> Result<Meditation> {
        let letter = self.letter(name)?;
        Ok(Meditation {
            letter: letter.name.clone(),
            text: guided_meditation(letter),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn service() -> LetterService {
        LetterService::new(Arc::new(SymbolTable::bundled().unwrap()))
    }

    #[rstest]
    #[case("", Persona::Architect)]
    #[case("arquiteto", Persona::Architect)]
    #[case("Mestre", Persona::Master)]
    #[case("poet", Persona::Poet)]
    fn test_parse_persona(#[case] raw: &str, #[case] expected: Persona) {
        assert_eq!(raw.parse::<Persona>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_persona_is_rejected() {
        assert!("bardo".parse::<Persona>().is_err());
    }

    #[test]
    fn test_describe_personas() {
        let service = service();

        match service.describe("mem", Persona::Architect).unwrap() {
            LetterView::Record(letter) => assert_eq!(letter.value, 40),
            other => panic!("unexpected view: {:?}", other),
        }

        match service.describe("Mem", Persona::Master).unwrap() {
            LetterView::Voice { reply, .. } => {
                assert!(reply.contains("valor gemátrico 40"));
                assert!(reply.contains("O Enforcado"));
            }
            other => panic!("unexpected view: {:?}", other),
        }

        match service.describe("Mem", Persona::Poet).unwrap() {
            LetterView::Voice { reply, .. } => assert!(reply.ends_with("'Intuição'.")),
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_describe_unknown_letter_is_not_found() {
        assert!(matches!(
            service().describe("Omega", Persona::Architect),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_body_zone_lookup() {
        let service = service();
        assert_eq!(service.by_body_zone("ventre").unwrap().name, "Mem");
        assert!(matches!(
            service.by_body_zone("joelho"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_analyze_glyphs() {
        let analysis = service().analyze("אמש");
        let names: Vec<&str> = analysis.letters.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Aleph", "Mem", "Shin"]);
        assert_eq!(analysis.message, "Análise concluída. Energias encontradas: Aleph, Mem, Shin.");

        assert!(service().analyze("abc").letters.is_empty());
    }

    #[test]
    fn test_meditation_uses_body_function() {
        let meditation = service().meditation("aleph").unwrap();
        assert_eq!(meditation.letter, "Aleph");
        assert!(meditation.text.contains("Peito / Pulmões"));
        assert!(meditation.text.contains("a respiração que sustenta a vida"));

        let gimel = service().meditation("Gimel").unwrap();
        assert!(gimel.text.contains("sinta sua energia"));
    }
}
