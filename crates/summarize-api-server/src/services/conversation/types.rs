use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::config::SessionConfig;
use crate::models::chat::{ChatMessage, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One message of a stored conversation. Never edited after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: TurnRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: TurnRole::Assistant, content: content.into() }
    }
}

impl From<&Turn> for ChatMessage {
    fn from(turn: &Turn) -> Self {
        let role = match turn.role {
            TurnRole::User => Role::User,
            TurnRole::Assistant => Role::Assistant,
        };
        ChatMessage { role, content: turn.content.clone() }
    }
}

/// Conversation state stored in session memory
#[derive(Debug, Clone)]
pub struct ConversationState {
    /// Turns in append order (user, assistant, user, assistant, ...)
    pub turns: Vec<Turn>,

    pub created_at: Instant,

    /// Drives idle expiry and least-recently-active eviction
    pub last_activity: Instant,
}

impl ConversationState {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            turns: Vec::new(),
            created_at: now,
            last_activity: now,
        }
    }

    pub fn is_expired(&self, idle_ttl: Duration) -> bool {
        self.last_activity.elapsed() > idle_ttl
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Append one turn, then drop the oldest pairs until at most `max_turns` remain.
    pub fn push(&mut self, turn: Turn, max_turns: usize) {
        self.turns.push(turn);
        self.enforce_sliding_window(max_turns);
        self.touch();
    }

    fn enforce_sliding_window(&mut self, max_turns: usize) {
        while self.turns.len() > max_turns && self.turns.len() >= 2 {
            self.turns.drain(0..2);
        }
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounds on session memory growth.
#[derive(Debug, Clone, Copy)]
pub struct EvictionPolicy {
    pub idle_ttl: Duration,
    /// Always even and at least 2, so windows drop whole exchanges.
    pub max_turns: usize,
    pub max_sessions: usize,
}

impl EvictionPolicy {
    pub fn new(idle_ttl: Duration, max_turns: usize, max_sessions: usize) -> Self {
        let max_turns = (max_turns.max(2) + 1) / 2 * 2;
        Self {
            idle_ttl,
            max_turns,
            max_sessions: max_sessions.max(1),
        }
    }
}

impl Default for EvictionPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(6 * 60 * 60), 40, 10_000)
    }
}

impl From<&SessionConfig> for EvictionPolicy {
    fn from(config: &SessionConfig) -> Self {
        Self::new(
            Duration::from_secs(config.idle_ttl_seconds),
            config.max_turns,
            config.max_sessions,
        )
    }
}
