//! SCII Oracle - 字母对应体系服务
//!
//! 22 个字母的符号表、Gematria 计算、关键词诊断、治疗会话状态机，
//! 以及星盘引擎、原型表存储与生成式模型等外部协作服务的 HTTP 接口。

pub mod api;
pub mod config;
pub mod error;
pub mod external;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;
pub mod symbols;
