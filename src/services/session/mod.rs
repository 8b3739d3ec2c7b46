//! 治疗会话服务
//!
//! 每条消息推进一次状态：`OPENED → EXPLORATION_1 → EXPLORATION_2 → 终止`。
//! 缺失或未知的会话 ID 开启新会话；终止后会话从存储中删除。

pub mod hooks;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::session::{SessionState, TherapySession, TurnRole};
use crate::services::diagnosis::diagnose;
use crate::storage::repository::SessionStore;
use crate::symbols::SymbolTable;

pub use hooks::{ClosingHook, MeditationHook, MemoryRecordingHook, NoClosingHook, create_closing_hook};

/// 新会话的问候语
pub const GREETING: &str =
    "Bem-vindo. Sou o Terapeuta Arquetípico... Para começar, por favor, me diga o que o traz aqui hoje.";

/// 会话终止时的状态文本
pub const SESSION_CLOSED: &str = "Sessão encerrada.";

/// 一轮对话的结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionReply {
    pub session_id: String,
    pub reply: String,
    /// 推进后的状态，终止时为空
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<SessionState>,
    pub closed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// 会话服务 trait
#[async_trait]
pub trait SessionService: Send + Sync {
    /// 处理一条用户消息
    async fn handle_message(
        &self,
        user_id: &str,
        session_id: Option<&str>,
        message: &str,
    ) -> Result<SessionReply>;

    /// 当前活跃会话数量
    async fn active_sessions(&self) -> Result<u64>;
}

/// 会话服务实现
pub struct SessionServiceImpl {
    store: Arc<dyn SessionStore>,
    symbols: Arc<SymbolTable>,
    closing_hook: Arc<dyn ClosingHook>,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SessionServiceImpl {
    pub fn new(
        store: Arc<dyn SessionStore>,
        symbols: Arc<SymbolTable>,
        closing_hook: Arc<dyn ClosingHook>,
    ) -> Self {
        Self {
            store,
            symbols,
            closing_hook,
            locks: DashMap::new(),
        }
    }

    fn lock_for(&self, session_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn open(&self, user_id: &str) -> Result<SessionReply> {
        let mut session = TherapySession::new(user_id);
        session.record(TurnRole::Therapist, GREETING);
        session.state = SessionState::Opened;
        self.store.put(&session).await?;

        tracing::info!(session_id = %session.id, user_id = %user_id, "therapy session opened");
        Ok(SessionReply {
            session_id: session.id,
            reply: GREETING.to_string(),
            state: Some(SessionState::Opened),
            closed: false,
            status: None,
        })
    }

    async fn advance(&self, mut session: TherapySession, message: &str) -> Result<SessionReply> {
        let reply = match session.state {
            SessionState::Opened => {
                session.hypothesis = diagnose(&self.symbols, message);
                session.state = SessionState::Exploration1;
                match session.hypothesis.first() {
                    Some(letter) => format!(
                        "Entendo... A forma como você descreve sua questão me faz pensar sobre a energia de '{}'. \
                         Onde em seu corpo físico você sente o eco dessa sensação?",
                        letter
                    ),
                    None => "Entendo. Pode me falar um pouco mais sobre essa sensação?".to_string(),
                }
            }
            SessionState::Exploration1 => {
                session.state = SessionState::Exploration2;
                format!(
                    "Interessante você localizar a sensação em '{}'. E como é essa sensação? \
                     Se pudesse descrevê-la... é um peso, um vazio, um calor?",
                    message
                )
            }
            SessionState::Exploration2 => return self.close(session, message).await,
            state @ (SessionState::Acknowledgment | SessionState::Unknown) => {
                tracing::warn!(session_id = %session.id, state = %state, "message in invalid session state");
                return Err(AppError::InvalidState(format!(
                    "Estado de sessão inválido: {}",
                    state
                )));
            }
        };

        session.record(TurnRole::User, message);
        session.record(TurnRole::Therapist, &reply);
        self.store.put(&session).await?;

        tracing::debug!(session_id = %session.id, state = %session.state, "session advanced");
        Ok(SessionReply {
            session_id: session.id,
            reply,
            state: Some(session.state),
            closed: false,
            status: None,
        })
    }

    async fn close(&self, mut session: TherapySession, message: &str) -> Result<SessionReply> {
        session.record(TurnRole::User, message);
        let mut reply = format!(
            "A textura de '{}'... compreendo. Nossa sessão se encerra por hoje.",
            message
        );

        match self.closing_hook.on_close(&session).await {
            Ok(Some(extra)) => {
                reply.push_str("\n\n");
                reply.push_str(&extra);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(session_id = %session.id, error = %e, "closing hook failed");
            }
        }

        self.store.delete(&session.id).await?;
        tracing::info!(
            session_id = %session.id,
            hypothesis = ?session.hypothesis,
            turns = session.history.len(),
            "therapy session closed"
        );

        Ok(SessionReply {
            session_id: session.id,
            reply,
            state: None,
            closed: true,
            status: Some(SESSION_CLOSED.to_string()),
        })
    }
}

#[async_trait]
impl SessionService for SessionServiceImpl {
    async fn handle_message(
        &self,
        user_id: &str,
        session_id: Option<&str>,
        message: &str,
    ) -> Result<SessionReply> {
        let Some(id) = session_id.map(str::trim).filter(|id| !id.is_empty()) else {
            return self.open(user_id).await;
        };

        let lock = self.lock_for(id);
        let guard = lock.lock().await;

        let result = match self.store.get(id).await? {
            Some(session) => self.advance(session, message).await,
            None => {
                tracing::debug!(session_id = %id, "unknown session id, starting a new session");
                self.open(user_id).await
            }
        };

        // 会话已不存在（终止或未知）时释放锁条目
        let finished = match &result {
            Ok(reply) => reply.closed || reply.session_id != id,
            Err(_) => false,
        };
        drop(guard);
        if finished {
            self.locks.remove(id);
        }

        result
    }

    async fn active_sessions(&self) -> Result<u64> {
        self.store.count().await
    }
}

/// 创建会话服务
pub fn create_session_service(
    store: Arc<dyn SessionStore>,
    symbols: Arc<SymbolTable>,
    closing_hook: Arc<dyn ClosingHook>,
) -> Box<dyn SessionService> {
    Box::new(SessionServiceImpl::new(store, symbols, closing_hook))
}
