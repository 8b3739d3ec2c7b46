//! 会话终止钩子
//!
//! 会话进入终止状态、从存储删除之前调用，可以把假设写入 Active Memory
//! 或在结束语后附加引导冥想。

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::config::ClosingAction;
use crate::error::Result;
use crate::models::memory::ActiveMemoryEntry;
use crate::models::session::TherapySession;
use crate::services::letters::guided_meditation;
use crate::storage::memory_log::ActiveMemoryLog;
use crate::symbols::SymbolTable;

#[async_trait]
pub trait ClosingHook: Send + Sync {
    /// 返回需要追加到结束语后的文本
    async fn on_close(&self, session: &TherapySession) -> Result<Option<String>>;
}

/// 不执行任何动作
pub struct NoClosingHook;

#[async_trait]
impl ClosingHook for NoClosingHook {
    async fn on_close(&self, _session: &TherapySession) -> Result<Option<String>> {
        Ok(None)
    }
}

/// 将会话的假设和用户回答写入 Active Memory
pub struct MemoryRecordingHook {
    memory_log: Arc<dyn ActiveMemoryLog>,
}

impl MemoryRecordingHook {
    pub fn new(memory_log: Arc<dyn ActiveMemoryLog>) -> Self {
        Self { memory_log }
    }
}

#[async_trait]
impl ClosingHook for MemoryRecordingHook {
    async fn on_close(&self, session: &TherapySession) -> Result<Option<String>> {
        let mut answers = session.user_messages();
        let complaint = answers.next().unwrap_or_default();
        let location = answers.next().unwrap_or_default();
        let sensation = answers.next().unwrap_or_default();

        let entry = ActiveMemoryEntry::new(
            complaint,
            session.hypothesis.clone(),
            &format!("Local: {}; Sensação: {}", location, sensation),
        );
        self.memory_log.append(&entry).await?;
        Ok(None)
    }
}

/// 为第一个假设字母生成引导冥想
pub struct MeditationHook {
    symbols: Arc<SymbolTable>,
}

impl MeditationHook {
    pub fn new(symbols: Arc<SymbolTable>) -> Self {
        Self { symbols }
    }
}

#[async_trait]
impl ClosingHook for MeditationHook {
    async fn on_close(&self, session: &TherapySession) -> Result<Option<String>> {
        Ok(session
            .hypothesis
            .first()
            .and_then(|name| self.symbols.get_letter(name))
            .map(guided_meditation))
    }
}

/// 根据配置创建终止钩子
pub fn create_closing_hook(
    action: ClosingAction,
    symbols: Arc<SymbolTable>,
    memory_log: Arc<dyn ActiveMemoryLog>,
) -> Arc<dyn ClosingHook> {
    match action {
        ClosingAction::None => Arc::new(NoClosingHook),
        ClosingAction::RecordMemory => Arc::new(MemoryRecordingHook::new(memory_log)),
        ClosingAction::Meditation => Arc::new(MeditationHook::new(symbols)),
    }
}
