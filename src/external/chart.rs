//! 星盘引擎客户端

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::config::ChartEngineConfig;
use crate::error::{AppError, Result};
use crate::models::chart::{BirthData, CHART_BODIES, NatalChart};

/// 星盘引擎
///
/// 给定出生日期、时间和坐标，返回每个天体的星座与宫位。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChartEngine: Send + Sync {
    async fn compute(&self, birth: &BirthData) -> Result<NatalChart>;
}

/// 星盘计算请求
#[derive(Debug, Serialize)]
struct ChartRequest<'a> {
    /// `YYYY/MM/DD`
    date: String,
    /// `HH:MM`
    time: String,
    utc_offset: &'a str,
    latitude: f64,
    longitude: f64,
    bodies: &'a [&'a str],
}

/// 服务可能直接返回映射，或包在 `bodies` 字段中
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChartResponse {
    Wrapped { bodies: NatalChart },
    Flat(NatalChart),
}

/// 调用外部星历服务的 HTTP 实现
pub struct HttpChartEngine {
    client: reqwest::Client,
    url: String,
    utc_offset: String,
}

impl HttpChartEngine {
    pub fn new(url: &str, utc_offset: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_string(),
            utc_offset: utc_offset.to_string(),
        })
    }

    pub fn from_config(config: &ChartEngineConfig) -> Result<Self> {
        Self::new(
            &config.url,
            &config.utc_offset,
            Duration::from_secs(config.timeout.max(1)),
        )
    }
}

#[async_trait]
impl ChartEngine for HttpChartEngine {
    async fn compute(&self, birth: &BirthData) -> Result<NatalChart> {
        let request = ChartRequest {
            date: birth.date.format("%Y/%m/%d").to_string(),
            time: birth.time_string(),
            utc_offset: &self.utc_offset,
            latitude: birth.latitude,
            longitude: birth.longitude,
            bodies: &CHART_BODIES,
        };

        let response = self
            .client
            .post(format!("{}/chart", self.url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "chart engine failed ({}): {}",
                status, error_text
            )));
        }

        let chart = match response.json::<ChartResponse>().await? {
            ChartResponse::Wrapped { bodies } => bodies,
            ChartResponse::Flat(bodies) => bodies,
        };

        for required in ["sun", "moon", "ascendant"] {
            if !chart.contains_key(required) {
                return Err(AppError::Upstream(format!(
                    "chart engine response is missing '{}'",
                    required
                )));
            }
        }

        tracing::debug!(bodies = chart.len(), name = %birth.name, "chart computed");
        Ok(chart)
    }
}
