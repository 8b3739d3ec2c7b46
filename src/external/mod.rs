//! 外部协作服务客户端
//!
//! 星盘引擎与生成式模型。

pub mod chart;
pub mod generative;

pub use chart::{ChartEngine, HttpChartEngine};
pub use generative::{
    ChatMessage, ChatPart, ChatRole, FunctionCall, FunctionResponse, GeminiModel,
    GenerativeModel, ToolDeclaration,
};
