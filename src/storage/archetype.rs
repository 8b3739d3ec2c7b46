//! 原型表存储
//!
//! 给定原型（星座名称），返回至多一个字母记录。失败以结构化
//! `{ "error": reason }` 返回，不向上抛出。

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::config::config::{ArchetypeBackend, ArchetypeStoreConfig};
use crate::error::{AppError, Result};
use crate::models::chart::{ArchetypeLetter, ArchetypeLookup};
use crate::symbols::SymbolTable;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArchetypeStore: Send + Sync {
    /// 查询原型对应的字母
    async fn letter_for_archetype(&self, archetype: &str) -> ArchetypeLookup;
}

/// 基于符号表星座对应关系的本地实现
pub struct LocalArchetypeStore {
    symbols: Arc<SymbolTable>,
}

impl LocalArchetypeStore {
    pub fn new(symbols: Arc<SymbolTable>) -> Self {
        Self { symbols }
    }
}

#[async_trait]
impl ArchetypeStore for LocalArchetypeStore {
    async fn letter_for_archetype(&self, archetype: &str) -> ArchetypeLookup {
        match self.symbols.find_by_zodiac(archetype) {
            Some(letter) => ArchetypeLookup::Found(ArchetypeLetter {
                letter_name: letter.name.clone(),
                pictogram: letter.pictogram.clone(),
                spiritual_action: letter.key_concept.clone(),
            }),
            None => ArchetypeLookup::failed(format!("Arquétipo '{}' não encontrado.", archetype)),
        }
    }
}

/// PostgREST 数据服务实现
///
/// 三跳连接：`arquetipos` → `scii_correspondencias` → `letras`。
pub struct PostgrestArchetypeStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PostgrestArchetypeStore {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// 查询表的第一行
    async fn first_row(&self, table: &str, query: &[(&str, String)]) -> Result<Option<Value>> {
        let response = self
            .client
            .get(format!("{}/rest/v1/{}", self.base_url, table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "table store query on '{}' failed ({}): {}",
                table, status, error_text
            )));
        }

        let rows: Vec<Value> = response.json().await?;
        Ok(rows.into_iter().next())
    }

    async fn lookup(&self, archetype: &str) -> Result<ArchetypeLookup> {
        let Some(row) = self
            .first_row(
                "arquetipos",
                &[
                    ("nome_arquetipo", format!("eq.{}", archetype)),
                    ("select", "id".into()),
                ],
            )
            .await?
        else {
            return Ok(ArchetypeLookup::failed(format!(
                "Arquétipo '{}' não encontrado.",
                archetype
            )));
        };
        let archetype_id = id_param(&row["id"]);

        let Some(row) = self
            .first_row(
                "scii_correspondencias",
                &[
                    ("arquetipo_id", format!("eq.{}", archetype_id)),
                    ("select", "letra_id".into()),
                ],
            )
            .await?
        else {
            return Ok(ArchetypeLookup::failed(format!(
                "Correspondência para '{}' não encontrada.",
                archetype
            )));
        };
        let letter_id = id_param(&row["letra_id"]);

        let Some(row) = self
            .first_row(
                "letras",
                &[
                    ("id", format!("eq.{}", letter_id)),
                    ("select", "nome_letra,pictografia,acao_espiritual".into()),
                ],
            )
            .await?
        else {
            return Ok(ArchetypeLookup::failed(format!(
                "Letra com ID '{}' não encontrada.",
                letter_id
            )));
        };

        let letter: ArchetypeLetter = serde_json::from_value(row)?;
        Ok(ArchetypeLookup::Found(letter))
    }
}

/// 数字或字符串 ID 转为查询参数
fn id_param(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl ArchetypeStore for PostgrestArchetypeStore {
    async fn letter_for_archetype(&self, archetype: &str) -> ArchetypeLookup {
        match self.lookup(archetype).await {
            Ok(lookup) => lookup,
            Err(e) => {
                tracing::warn!(archetype = %archetype, error = %e, "archetype lookup failed");
                ArchetypeLookup::failed(e.to_string())
            }
        }
    }
}

/// 根据配置创建原型表存储
pub fn create_archetype_store(
    config: &ArchetypeStoreConfig,
    symbols: Arc<SymbolTable>,
) -> Result<Arc<dyn ArchetypeStore>> {
    match config.backend {
        ArchetypeBackend::Postgrest => {
            let store = PostgrestArchetypeStore::new(
                &config.url,
                &config.api_key,
                Duration::from_secs(config.timeout.max(1)),
            )?;
            Ok(Arc::new(store))
        }
        ArchetypeBackend::Local => Ok(Arc::new(LocalArchetypeStore::new(symbols))),
    }
}
