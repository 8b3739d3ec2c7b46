//! 存储层模块
//!
//! 会话存储、Active Memory 日志和原型表存储。

pub mod archetype;
pub mod memory_log;
pub mod repository;

pub use archetype::{
    ArchetypeStore, LocalArchetypeStore, PostgrestArchetypeStore, create_archetype_store,
};
pub use memory_log::{ActiveMemoryLog, InMemoryMemoryLog, JsonlMemoryLog};
pub use repository::{InMemorySessionStore, SessionStore};
