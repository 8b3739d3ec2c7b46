use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::Result;
use crate::models::session::TherapySession;

/// 会话存储 trait
///
/// 状态机只通过该接口读写会话，可替换为持久化或分布式实现。
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// 根据 ID 获取会话
    async fn get(&self, id: &str) -> Result<Option<TherapySession>>;

    /// 写入（创建或覆盖）会话
    async fn put(&self, session: &TherapySession) -> Result<()>;

    /// 删除会话
    async fn delete(&self, id: &str) -> Result<bool>;

    /// 当前会话数量
    async fn count(&self) -> Result<u64>;
}

/// 进程内会话存储，进程重启后不保留
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, TherapySession>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: &str) -> Result<Option<TherapySession>> {
        Ok(self.sessions.get(id).map(|entry| entry.value().clone()))
    }

    async fn put(&self, session: &TherapySession) -> Result<()> {
        self.sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.sessions.remove(id).is_some())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.sessions.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::SessionState;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = InMemorySessionStore::new();
        let mut session = TherapySession::new("user_1");

        store.put(&session).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);

        session.state = SessionState::Opened;
        store.put(&session).await.unwrap();
        let loaded = store.get(&session.id).await.unwrap().unwrap();
        assert_eq!(loaded.state, SessionState::Opened);
        assert_eq!(store.count().await.unwrap(), 1);

        assert!(store.delete(&session.id).await.unwrap());
        assert!(!store.delete(&session.id).await.unwrap());
        assert!(store.get(&session.id).await.unwrap().is_none());
    }
}
