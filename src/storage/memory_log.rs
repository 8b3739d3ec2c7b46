//! Active Memory 追加日志
//!
//! 只写审计记录：确认的诊断被追加，核心逻辑从不读取。

use async_trait::async_trait;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::models::memory::ActiveMemoryEntry;

#[async_trait]
pub trait ActiveMemoryLog: Send + Sync {
    /// 追加一条记录
    async fn append(&self, entry: &ActiveMemoryEntry) -> Result<()>;
}

/// JSON Lines 文件实现，每条记录一行
pub struct JsonlMemoryLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlMemoryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ActiveMemoryLog for JsonlMemoryLog {
    async fn append(&self, entry: &ActiveMemoryEntry) -> Result<()> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;

        tracing::info!(
            letters = ?entry.letters,
            path = %self.path.display(),
            "active memory entry recorded"
        );
        Ok(())
    }
}

/// 进程内实现
#[derive(Default)]
pub struct InMemoryMemoryLog {
    entries: RwLock<Vec<ActiveMemoryEntry>>,
}

impl InMemoryMemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<ActiveMemoryEntry> {
        self.entries.read().clone()
    }
}

#[async_trait]
impl ActiveMemoryLog for InMemoryMemoryLog {
    async fn append(&self, entry: &ActiveMemoryEntry) -> Result<()> {
        self.entries.write().push(entry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_jsonl_log_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = JsonlMemoryLog::new(dir.path().join("nested").join("memoria.jsonl"));

        log.append(&ActiveMemoryEntry::new(
            "sinto um bloqueio",
            vec!["Mem".into()],
            "bloqueio nas águas",
        ))
        .await
        .unwrap();
        log.append(&ActiveMemoryEntry::new("raiva", vec!["Shin".into()], "fogo"))
            .await
            .unwrap();

        let raw = std::fs::read_to_string(log.path()).unwrap();
        let entries: Vec<ActiveMemoryEntry> = raw
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].letters, vec!["Mem"]);
        assert_eq!(entries[1].complaint, "raiva");
    }

    #[tokio::test]
    async fn test_in_memory_log() {
        let log = InMemoryMemoryLog::new();
        log.append(&ActiveMemoryEntry::new("q", vec![], "d"))
            .await
            .unwrap();
        assert_eq!(log.entries().len(), 1);
    }
}
