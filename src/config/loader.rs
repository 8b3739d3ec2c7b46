use crate::config::config::{AppConfig, ArchetypeBackend};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// 环境变量前缀，嵌套字段使用 `__` 分隔，例如 `SCII_SERVER__PORT`
const ENV_PREFIX: &str = "SCII_";

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从默认路径加载配置
    ///
    /// 合并顺序：
    /// 1. 开发环境默认值
    /// 2. `SCII_CONFIG` 指定的文件，或 ./config.toml
    /// 3. 环境变量
    pub fn load() -> Result<AppConfig, figment::Error> {
        let path = std::env::var("SCII_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_config_path());
        Self::load_from(path)
    }

    /// 从指定路径加载配置
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig, figment::Error> {
        Self::figment(path.as_ref()).extract()
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::development()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// 验证配置
    pub fn validate(config: &AppConfig) -> Result<(), ConfigValidationError> {
        if config.server.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }

        if config.archetype_store.backend == ArchetypeBackend::Postgrest
            && config.archetype_store.url.is_empty()
        {
            return Err(ConfigValidationError::MissingArchetypeStoreUrl);
        }

        if config.oracle.enabled && config.oracle.api_key.is_empty() {
            return Err(ConfigValidationError::MissingOracleKey);
        }

        if config.oracle.max_tool_rounds == 0 {
            return Err(ConfigValidationError::InvalidToolRounds);
        }

        if let Some(path) = &config.symbols.database_path {
            if !path.exists() {
                return Err(ConfigValidationError::InvalidPath(
                    path.display().to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// 配置验证错误
#[derive(thiserror::Error, Debug)]
pub enum ConfigValidationError {
    #[error("服务端口无效，必须大于 0")]
    InvalidPort,

    #[error("原型表存储使用 postgrest 后端但未配置 URL")]
    MissingArchetypeStoreUrl,

    #[error("已启用神谕但未配置 API 密钥")]
    MissingOracleKey,

    #[error("函数调用轮数上限必须大于 0")]
    InvalidToolRounds,

    #[error("配置路径无效: {0}")]
    InvalidPath(String),
}

/// 获取默认配置文件路径
pub fn default_config_path() -> PathBuf {
    PathBuf::from("config.toml")
}
