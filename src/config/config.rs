use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务地址
    pub host: String,
    /// 服务端口
    pub port: u16,
    /// 请求超时（秒）
    pub request_timeout: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别（RUST_LOG 优先）
    pub level: String,
    /// 结构化 JSON 日志格式
    pub structured: bool,
    /// 日志文件目录，为空时只输出到 stdout
    pub log_dir: Option<PathBuf>,
    /// 日志文件名前缀
    pub file_prefix: String,
}

/// 符号表配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SymbolsConfig {
    /// 字母数据库 JSON 路径，为空时使用内置数据集
    pub database_path: Option<PathBuf>,
    /// Active Memory 追加日志路径（JSON Lines）
    pub memory_log_path: PathBuf,
}

/// Gematria 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GematriaConfig {
    /// 是否优先切分双字母组合（ch / ts / sh）
    pub segment_digraphs: bool,
}

impl Default for GematriaConfig {
    fn default() -> Self {
        Self {
            segment_digraphs: true,
        }
    }
}

/// 会话终止时执行的动作
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClosingAction {
    /// 仅结束会话
    #[default]
    None,
    /// 将假设写入 Active Memory
    RecordMemory,
    /// 在结束语后附加引导冥想
    Meditation,
}

/// 会话配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SessionConfig {
    /// 终止状态触发的动作
    pub on_close: ClosingAction,
}

/// 星盘引擎配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ChartEngineConfig {
    /// 星盘计算服务地址
    pub url: String,
    /// 请求超时（秒）
    pub timeout: u64,
    /// 未提供坐标时使用的默认纬度
    pub default_latitude: f64,
    /// 未提供坐标时使用的默认经度
    pub default_longitude: f64,
    /// 出生时间的 UTC 偏移，例如 "-03:00"
    pub utc_offset: String,
}

/// 原型表存储后端
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ArchetypeBackend {
    /// 使用符号表中的星座对应关系
    #[default]
    Local,
    /// 使用 PostgREST 数据服务
    Postgrest,
}

/// 原型表存储配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ArchetypeStoreConfig {
    /// 后端类型
    pub backend: ArchetypeBackend,
    /// PostgREST 服务地址
    pub url: String,
    /// 服务密钥
    pub api_key: String,
    /// 请求超时（秒）
    pub timeout: u64,
}

/// 生成式神谕配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OracleConfig {
    /// 是否启用 /oracle/chat
    pub enabled: bool,
    /// Gemini API 地址
    pub base_url: String,
    /// API 密钥
    pub api_key: String,
    /// 模型名称
    pub model: String,
    /// 采样温度
    pub temperature: f32,
    /// 单次对话中允许的函数调用轮数上限
    pub max_tool_rounds: usize,
    /// 请求超时（秒）
    pub timeout: u64,
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// 服务器配置
    pub server: ServerConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 符号表配置
    pub symbols: SymbolsConfig,
    /// Gematria 配置
    pub gematria: GematriaConfig,
    /// 会话配置
    pub session: SessionConfig,
    /// 星盘引擎配置
    pub chart_engine: ChartEngineConfig,
    /// 原型表存储配置
    pub archetype_store: ArchetypeStoreConfig,
    /// 生成式神谕配置
    pub oracle: OracleConfig,
    /// 应用名称
    pub app_name: String,
    /// 环境
    pub environment: String,
}

impl AppConfig {
    /// 创建开发环境配置
    pub fn development() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".into(),
                port: 8000,
                request_timeout: 90,
            },
            logging: LoggingConfig {
                level: "debug".into(),
                structured: false,
                log_dir: None,
                file_prefix: "scii-oracle.log".into(),
            },
            symbols: SymbolsConfig {
                database_path: None,
                memory_log_path: PathBuf::from("./data/memoria_ativa.jsonl"),
            },
            gematria: GematriaConfig::default(),
            session: SessionConfig::default(),
            chart_engine: ChartEngineConfig {
                url: "http://localhost:8090".into(),
                timeout: 20,
                // Vacaria, RS
                default_latitude: -28.51,
                default_longitude: -50.93,
                utc_offset: "-03:00".into(),
            },
            archetype_store: ArchetypeStoreConfig {
                backend: ArchetypeBackend::Local,
                url: String::new(),
                api_key: String::new(),
                timeout: 10,
            },
            oracle: OracleConfig {
                enabled: false,
                base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
                api_key: String::new(),
                model: "gemini-1.5-pro".into(),
                temperature: 0.05,
                max_tool_rounds: 4,
                timeout: 60,
            },
            app_name: "scii-oracle".into(),
            environment: "development".into(),
        }
    }

    /// 创建生产环境配置
    pub fn production() -> Self {
        let mut config = Self::development();
        config.environment = "production".into();
        config.logging.level = "info".into();
        config.logging.structured = true;
        config.oracle.enabled = true;
        config
    }
}
