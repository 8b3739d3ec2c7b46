//! 核心数据模型模块
//!
//! 定义字母、诊断规则、治疗会话、Active Memory 条目和星盘相关结构。

pub mod chart;
pub mod letter;
pub mod memory;
pub mod session;

pub use chart::*;
pub use letter::*;
pub use memory::*;
pub use session::*;
