use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 治疗会话状态
///
/// 严格向前推进：`Acknowledgment → Opened → Exploration1 → Exploration2`，
/// 之后会话从存储中删除。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    /// 初始状态，创建时进入
    Acknowledgment,
    /// 等待用户描述困扰
    Opened,
    /// 等待身体位置
    #[serde(rename = "EXPLORATION_1")]
    Exploration1,
    /// 等待感受描述
    #[serde(rename = "EXPLORATION_2")]
    Exploration2,
    /// 无法识别的状态值（来自损坏或外部存储）
    #[serde(other)]
    Unknown,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Acknowledgment => "ACKNOWLEDGMENT",
            SessionState::Opened => "OPENED",
            SessionState::Exploration1 => "EXPLORATION_1",
            SessionState::Exploration2 => "EXPLORATION_2",
            SessionState::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 对话角色
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Therapist,
}

/// 会话中的一轮发言
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTurn {
    pub role: TurnRole,
    pub content: String,
    pub at: DateTime<Utc>,
}

/// 治疗会话
///
/// 仅存在于进程内，通过不透明 ID 访问。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TherapySession {
    /// 会话唯一标识
    pub id: String,

    /// 会话所有者
    pub user_id: String,

    /// 当前状态
    pub state: SessionState,

    /// 有序对话历史
    pub history: Vec<SessionTurn>,

    /// 从用户困扰推断出的字母假设
    pub hypothesis: Vec<String>,

    /// 创建时间
    pub created_at: DateTime<Utc>,

    /// 最后活跃时间
    pub last_active_at: DateTime<Utc>,
}

impl TherapySession {
    /// 创建新会话
    pub fn new(user_id: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            state: SessionState::Acknowledgment,
            history: Vec::new(),
            hypothesis: Vec::new(),
            created_at: now,
            last_active_at: now,
        }
    }

    /// 记录一轮发言并更新活跃时间
    pub fn record(&mut self, role: TurnRole, content: &str) {
        let now = Utc::now();
        self.history.push(SessionTurn {
            role,
            content: content.to_string(),
            at: now,
        });
        self.last_active_at = now;
    }

    /// 按顺序返回用户的所有发言
    pub fn user_messages(&self) -> impl Iterator<Item = &str> {
        self.history
            .iter()
            .filter(|turn| turn.role == TurnRole::User)
            .map(|turn| turn.content.as_str())
    }
}
