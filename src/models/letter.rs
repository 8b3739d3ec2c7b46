use serde::{Deserialize, Serialize};

/// 字母（符号表条目）
///
/// 22 个字母之一，承载数值、身体区域与原型对应关系。字段名同时接受
/// 原始数据库中的葡萄牙语键名。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Letter {
    /// 规范名称（唯一键），例如 "Aleph"
    #[serde(alias = "nome_hebraico")]
    pub name: String,

    /// 希伯来字形
    #[serde(alias = "caractere")]
    pub glyph: char,

    /// Gematria 数值
    #[serde(alias = "valor_gematrico")]
    pub value: u32,

    /// 象形描述
    #[serde(alias = "pictograma")]
    pub pictogram: String,

    /// 身体区域（Corpo do Verbo）
    #[serde(alias = "corpo_do_verbo")]
    pub body_zone: String,

    /// 核心概念，逗号分隔的子句
    #[serde(alias = "conceito_chave")]
    pub key_concept: String,

    /// 对应的塔罗牌
    #[serde(default)]
    pub tarot: Option<String>,

    /// 身体功能描述
    #[serde(default, alias = "funcao_corporal")]
    pub body_function: Option<String>,

    /// 对应星座（原型），用于本地原型查询
    #[serde(default, alias = "signo")]
    pub zodiac_sign: Option<String>,

    /// 对应行星
    #[serde(default, alias = "planeta")]
    pub planet: Option<String>,

    /// 对应元素
    #[serde(default, alias = "elemento")]
    pub element: Option<String>,
}

impl Letter {
    /// 核心概念的第一个子句
    pub fn short_concept(&self) -> &str {
        self.key_concept
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
    }
}

/// 诊断规则：关键词集合指向一个字母
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticRule {
    /// 字母规范名称
    #[serde(alias = "letra")]
    pub letter: String,

    /// 关键词（小写子串匹配）
    #[serde(alias = "palavras_chave")]
    pub keywords: Vec<String>,
}

/// 将名称规范化为首字母大写、其余小写
pub fn normalize_letter_name(name: &str) -> String {
    let mut chars = name.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_letter_name() {
        assert_eq!(normalize_letter_name("aleph"), "Aleph");
        assert_eq!(normalize_letter_name("MEM"), "Mem");
        assert_eq!(normalize_letter_name("  sHiN "), "Shin");
        assert_eq!(normalize_letter_name(""), "");
    }

    #[test]
    fn test_short_concept_takes_first_clause() {
        let letter = Letter {
            name: "Mem".into(),
            glyph: 'מ',
            value: 40,
            pictogram: "Água".into(),
            body_zone: "Ventre / Abdômen".into(),
            key_concept: "Intuição, Inconsciente, Oculto".into(),
            tarot: None,
            body_function: None,
            zodiac_sign: None,
            planet: None,
            element: Some("Água".into()),
        };
        assert_eq!(letter.short_concept(), "Intuição");
    }

    #[test]
    fn test_deserialize_portuguese_keys() {
        let raw = r#"{
            "nome_hebraico": "Bet",
            "caractere": "ב",
            "valor_gematrico": 2,
            "pictograma": "Casa",
            "corpo_do_verbo": "Boca",
            "conceito_chave": "Casa, Interioridade",
            "tarot": "O Mago"
        }"#;
        let letter: Letter = serde_json::from_str(raw).unwrap();
        assert_eq!(letter.name, "Bet");
        assert_eq!(letter.value, 2);
        assert_eq!(letter.tarot.as_deref(), Some("O Mago"));
        assert!(letter.body_function.is_none());
    }
}
