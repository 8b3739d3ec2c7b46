use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{AppError, Result};

/// 星盘中需要计算的天体，按输出顺序排列
pub const CHART_BODIES: [&str; 11] = [
    "sun",
    "moon",
    "ascendant",
    "mercury",
    "venus",
    "mars",
    "jupiter",
    "saturn",
    "uranus",
    "neptune",
    "pluto",
];

/// 出生数据
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BirthData {
    pub name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub place: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl BirthData {
    /// 解析 `YYYY-MM-DD` 和 `HH:MM`
    pub fn parse(
        name: &str,
        date: &str,
        time: &str,
        place: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self> {
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|e| {
            AppError::Validation(format!("birth date '{}' must be YYYY-MM-DD: {}", date, e))
        })?;
        let time = NaiveTime::parse_from_str(time.trim(), "%H:%M").map_err(|e| {
            AppError::Validation(format!("birth time '{}' must be HH:MM: {}", time, e))
        })?;

        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(AppError::Validation(format!(
                "coordinates out of range: {}, {}",
                latitude, longitude
            )));
        }

        Ok(Self {
            name: name.to_string(),
            date,
            time,
            place: place.to_string(),
            latitude,
            longitude,
        })
    }

    pub fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn time_string(&self) -> String {
        self.time.format("%H:%M").to_string()
    }
}

/// 宫位：星盘引擎可能返回数字或字符串
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum HousePosition {
    Number(u8),
    Label(String),
}

/// 单个天体的落点
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Placement {
    #[serde(alias = "signo")]
    pub sign: String,
    #[serde(alias = "casa")]
    pub house: HousePosition,
}

/// 星盘：天体名称 → 落点
pub type NatalChart = BTreeMap<String, Placement>;

/// 原型表存储返回的字母记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArchetypeLetter {
    #[serde(alias = "nome_letra")]
    pub letter_name: String,
    #[serde(alias = "pictografia")]
    pub pictogram: String,
    #[serde(alias = "acao_espiritual")]
    pub spiritual_action: String,
}

/// 查询失败时的结构化错误，以 `{ "error": reason }` 形式出现在响应中
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LookupFailure {
    pub error: String,
}

impl LookupFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            error: reason.into(),
        }
    }
}

/// 原型查询结果：成功时为字母记录，否则为结构化错误
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ArchetypeLookup {
    Found(ArchetypeLetter),
    Failed(LookupFailure),
}

impl ArchetypeLookup {
    pub fn failed(reason: impl Into<String>) -> Self {
        ArchetypeLookup::Failed(LookupFailure::new(reason))
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ArchetypeLookup::Found(_))
    }
}

/// 出生信息回显
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BirthEcho {
    pub date: String,
    pub time: String,
    pub place: String,
}

/// 灵魂地图：星盘 + 每个天体对应的字母
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SoulMap {
    pub name: String,
    pub birth: BirthEcho,
    pub chart: NatalChart,
    pub letters: BTreeMap<String, ArchetypeLookup>,
}
