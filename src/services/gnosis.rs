//! 灵魂地图服务
//!
//! 计算星盘，再为每个天体的星座查询对应字母。单个天体查询失败只影响
//! 该条目；星盘计算失败则整个请求失败。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::config::ChartEngineConfig;
use crate::error::{AppError, Result};
use crate::external::chart::ChartEngine;
use crate::models::chart::{BirthData, BirthEcho, SoulMap};
use crate::storage::archetype::ArchetypeStore;

/// 未提供出生地时的占位值
pub const UNKNOWN_PLACE: &str = "Não informado";

/// 出生数据请求
///
/// 日期可为 `date` 字符串或 `year`/`month`/`day`，时间可为 `time` 字符串或
/// `hour`/`minute`，地点可为 `place` 或 `city`。字段同时接受葡萄牙语键名。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BirthRequest {
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(alias = "data")]
    pub date: Option<String>,
    #[serde(alias = "ano")]
    pub year: Option<i32>,
    #[serde(alias = "mes")]
    pub month: Option<u32>,
    #[serde(alias = "dia")]
    pub day: Option<u32>,
    #[serde(alias = "hora")]
    pub time: Option<BirthTime>,
    pub hour: Option<u32>,
    #[serde(alias = "minuto")]
    pub minute: Option<u32>,
    #[serde(alias = "local")]
    pub place: Option<String>,
    #[serde(alias = "cidade")]
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// 出生时间：`"HH:MM"` 字符串，或只有小时（数字或字符串）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum BirthTime {
    Hour(u32),
    Text(String),
}

impl From<&str> for BirthTime {
    fn from(value: &str) -> Self {
        BirthTime::Text(value.to_string())
    }
}

/// 规范化后的出生数据字段
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBirth {
    pub name: String,
    pub date: String,
    pub time: String,
    pub place: String,
    pub coordinates: Option<(f64, f64)>,
}

impl BirthRequest {
    pub fn normalize(&self) -> Result<NormalizedBirth> {
        let date = match (&self.date, self.year, self.month, self.day) {
            (Some(date), _, _, _) => date.trim().to_string(),
            (None, Some(year), Some(month), Some(day)) => {
                format!("{}-{:02}-{:02}", year, month, day)
            }
            _ => {
                return Err(AppError::Validation(
                    "birth date requires 'date' or 'year'/'month'/'day'".into(),
                ));
            }
        };

        let time = match &self.time {
            Some(BirthTime::Text(text)) if text.contains(':') => text.trim().to_string(),
            other => {
                let hour = match other {
                    Some(BirthTime::Hour(hour)) => Some(*hour),
                    Some(BirthTime::Text(text)) => Some(text.trim().parse::<u32>().map_err(|_| {
                        AppError::Validation(format!("invalid birth hour: {}", text))
                    })?),
                    None => self.hour,
                };
                let hour = hour.ok_or_else(|| {
                    AppError::Validation(
                        "birth time requires 'time' (HH:MM) or 'hour'/'minute'".into(),
                    )
                })?;
                format!("{:02}:{:02}", hour, self.minute.unwrap_or(0))
            }
        };

        let place = self
            .place
            .as_deref()
            .or(self.city.as_deref())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(UNKNOWN_PLACE)
            .to_string();

        let coordinates = match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            (None, None) => None,
            _ => {
                return Err(AppError::Validation(
                    "latitude and longitude must be given together".into(),
                ));
            }
        };

        Ok(NormalizedBirth {
            name: self.name.trim().to_string(),
            date,
            time,
            place,
            coordinates,
        })
    }
}

pub struct GnosisService {
    chart_engine: Arc<dyn ChartEngine>,
    archetypes: Arc<dyn ArchetypeStore>,
    default_latitude: f64,
    default_longitude: f64,
}

impl GnosisService {
    pub fn new(
        chart_engine: Arc<dyn ChartEngine>,
        archetypes: Arc<dyn ArchetypeStore>,
        config: &ChartEngineConfig,
    ) -> Self {
        Self {
            chart_engine,
            archetypes,
            default_latitude: config.default_latitude,
            default_longitude: config.default_longitude,
        }
    }

    /// 计算星盘并查询每个天体的字母
    ///
    /// 坐标未提供时使用配置的默认值（地名不做地理编码）。
    pub async fn calculate_chart_and_fetch_data(
        &self,
        name: &str,
        birth_date: &str,
        birth_time: &str,
        birth_place: &str,
        coordinates: Option<(f64, f64)>,
    ) -> Result<SoulMap> {
        let (latitude, longitude) =
            coordinates.unwrap_or((self.default_latitude, self.default_longitude));
        let birth = BirthData::parse(name, birth_date, birth_time, birth_place, latitude, longitude)?;

        tracing::info!(name = %birth.name, date = %birth.date_string(), "computing soul map");
        let chart = self.chart_engine.compute(&birth).await?;

        let mut letters = BTreeMap::new();
        for (body, placement) in &chart {
            let lookup = self.archetypes.letter_for_archetype(&placement.sign).await;
            if !lookup.is_found() {
                tracing::debug!(body = %body, sign = %placement.sign, "no letter for archetype");
            }
            letters.insert(format!("{}_letter", body), lookup);
        }

        Ok(SoulMap {
            name: birth.name.clone(),
            birth: BirthEcho {
                date: birth.date_string(),
                time: birth.time_string(),
                place: birth.place.clone(),
            },
            chart,
            letters,
        })
    }

    pub async fn soul_map(&self, request: &BirthRequest) -> Result<SoulMap> {
        let birth = request.normalize()?;
        self.calculate_chart_and_fetch_data(
            &birth.name,
            &birth.date,
            &birth.time,
            &birth.place,
            birth.coordinates,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::chart::MockChartEngine;
    use crate::models::chart::{
        ArchetypeLetter, ArchetypeLookup, HousePosition, NatalChart, Placement,
    };
    use crate::storage::archetype::MockArchetypeStore;

    fn placement(sign: &str, house: u8) -> Placement {
        Placement {
            sign: sign.into(),
            house: HousePosition::Number(house),
        }
    }

    fn config() -> ChartEngineConfig {
        ChartEngineConfig {
            default_latitude: -28.51,
            default_longitude: -50.93,
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_split_fields() {
        let request: BirthRequest = serde_json::from_value(serde_json::json!({
            "nome": "Ana", "ano": 1990, "mes": 3, "dia": 1, "hora": 5, "minuto": 7, "cidade": "Vacaria"
        }))
        .unwrap();
        let birth = request.normalize().unwrap();
        assert_eq!(birth.date, "1990-03-01");
        assert_eq!(birth.time, "05:07");
        assert_eq!(birth.place, "Vacaria");
        assert_eq!(birth.coordinates, None);
    }

    #[test]
    fn test_normalize_defaults_and_errors() {
        let request = BirthRequest {
            name: "Ana".into(),
            date: Some("1990-03-21".into()),
            time: Some("05:30".into()),
            ..Default::default()
        };
        assert_eq!(request.normalize().unwrap().place, UNKNOWN_PLACE);

        let missing_date = BirthRequest {
            time: Some("05:30".into()),
            ..Default::default()
        };
        assert!(matches!(missing_date.normalize(), Err(AppError::Validation(_))));

        let half_coordinates = BirthRequest {
            latitude: Some(1.0),
            ..request
        };
        assert!(half_coordinates.normalize().is_err());
    }

    #[tokio::test]
    async fn test_soul_map_combines_chart_and_lookups() {
        let mut engine = MockChartEngine::new();
        engine
            .expect_compute()
            .withf(|birth| birth.latitude == -28.51 && birth.time_string() == "05:30")
            .times(1)
            .returning(|_| {
                let mut chart = NatalChart::new();
                chart.insert("sun".into(), placement("Aries", 1));
                chart.insert("moon".into(), placement("Leo", 5));
                Ok(chart)
            });

        let mut store = MockArchetypeStore::new();
        store.expect_letter_for_archetype().returning(|sign| {
            if sign == "Aries" {
                ArchetypeLookup::Found(ArchetypeLetter {
                    letter_name: "He".into(),
                    pictogram: "Janela".into(),
                    spiritual_action: "Revelar".into(),
                })
            } else {
                ArchetypeLookup::failed(format!("Arquétipo '{}' não encontrado.", sign))
            }
        });

        let service = GnosisService::new(Arc::new(engine), Arc::new(store), &config());
        let map = service
            .calculate_chart_and_fetch_data("Ana", "1990-03-21", "05:30", "Vacaria, RS", None)
            .await
            .unwrap();

        assert_eq!(map.birth.place, "Vacaria, RS");
        assert_eq!(map.chart.len(), 2);
        assert!(map.letters["sun_letter"].is_found());
        assert!(!map.letters["moon_letter"].is_found());

        let value = serde_json::to_value(&map).unwrap();
        assert_eq!(value["letters"]["sun_letter"]["letter_name"], "He");
        assert_eq!(value["letters"]["moon_letter"]["error"], "Arquétipo 'Leo' não encontrado.");
    }

    #[tokio::test]
    async fn test_chart_failure_is_upstream_error() {
        let mut engine = MockChartEngine::new();
        engine
            .expect_compute()
            .returning(|_| Err(AppError::Upstream("ephemeris offline".into())));
        let store = MockArchetypeStore::new();

        let service = GnosisService::new(Arc::new(engine), Arc::new(store), &config());
        let result = service
            .calculate_chart_and_fetch_data("Ana", "1990-03-21", "05:30", "X", Some((10.0, 20.0)))
            .await;
        assert!(matches!(result, Err(AppError::Upstream(_))));
    }

    #[tokio::test]
    async fn test_invalid_birth_date_never_reaches_engine() {
        let engine = MockChartEngine::new();
        let store = MockArchetypeStore::new();
        let service = GnosisService::new(Arc::new(engine), Arc::new(store), &config());

        let result = service
            .calculate_chart_and_fetch_data("Ana", "21/03/1990", "05:30", "X", None)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
