use dashmap::mapref::one::RefMut;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use super::types::{ConversationState, EvictionPolicy, Turn, TurnRole};
use crate::models::chat::SessionId;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionMemoryError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),
}

/// Thread-safe in-memory conversation store.
///
/// Every mutation of one session runs under that entry's exclusive DashMap
/// lock, so concurrent appends never lose a turn and an exchange is never split.
/// Growth is bounded by [`EvictionPolicy`]; expiry is lazy (no background task).
#[derive(Clone)]
pub struct SessionMemory {
    storage: Arc<DashMap<SessionId, ConversationState>>,
    /// Serializes session creation so the cap check and the insert are one step.
    admission: Arc<Mutex<()>>,
    policy: EvictionPolicy,
}

impl SessionMemory {
    pub fn new(policy: EvictionPolicy) -> Self {
        info!(
            "Initializing session memory (idle_ttl={:?}, max_turns={}, max_sessions={})",
            policy.idle_ttl, policy.max_turns, policy.max_sessions
        );
        Self {
            storage: Arc::new(DashMap::new()),
            admission: Arc::new(Mutex::new(())),
            policy,
        }
    }

    pub fn generate_id() -> SessionId {
        uuid::Uuid::new_v4().to_string()
    }

    /// Resolve a session and snapshot its history.
    ///
    /// A missing or empty id gets a fresh UUID. An id the store does not hold
    /// (never seen, or evicted) is adopted with an empty history.
    pub fn get_or_create(&self, session_id: Option<&str>) -> (SessionId, Vec<Turn>) {
        let session_id = match session_id.filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => Self::generate_id(),
        };

        if let Some(mut entry) = self.storage.get_mut(&session_id) {
            if !entry.is_expired(self.policy.idle_ttl) {
                entry.touch();
                debug!(
                    "Resumed session {} ({} turns, age {:?})",
                    session_id,
                    entry.turns.len(),
                    entry.created_at.elapsed()
                );
                return (session_id, entry.turns.clone());
            }
            drop(entry); // release shard lock before removing
            let ttl = self.policy.idle_ttl;
            self.storage.remove_if(&session_id, |_, state| state.is_expired(ttl));
            debug!("Session {} expired, starting over", session_id);
        }

        let mut entry = self.admit(&session_id);
        entry.touch();
        let history = entry.turns.clone();
        drop(entry);

        (session_id, history)
    }

    /// Append a single turn to the end of a session's history.
    pub fn append(
        &self,
        session_id: &str,
        role: TurnRole,
        content: impl Into<String>,
    ) -> Result<(), SessionMemoryError> {
        let mut entry = self
            .storage
            .get_mut(session_id)
            .ok_or_else(|| SessionMemoryError::SessionNotFound(session_id.to_string()))?;

        let turn = Turn { role, content: content.into() };
        entry.push(turn, self.policy.max_turns);
        Ok(())
    }

    /// Append the user question and then the assistant answer as one atomic step.
    ///
    /// A session evicted while its answer was being generated is adopted again,
    /// so a completed exchange is never dropped.
    pub fn append_exchange(&self, session_id: &str, question: impl Into<String>, answer: impl Into<String>) {
        let mut entry = match self.storage.get_mut(session_id) {
            Some(entry) => entry,
            None => {
                debug!("Session {} vanished mid-call, adopting it again", session_id);
                self.admit(session_id)
            }
        };

        entry.push(Turn::user(question), self.policy.max_turns);
        entry.push(Turn::assistant(answer), self.policy.max_turns);
        debug!("Session {} now holds {} turns", session_id, entry.turns.len());
    }

    /// Current history of a session, if it is held.
    pub fn history(&self, session_id: &str) -> Option<Vec<Turn>> {
        self.storage.get(session_id).map(|entry| entry.turns.clone())
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Drop every idle-expired session. Returns how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        let start_len = self.storage.len();
        let ttl = self.policy.idle_ttl;
        self.storage.retain(|_, state| !state.is_expired(ttl));
        let count = start_len.saturating_sub(self.storage.len());

        if count > 0 {
            info!("Cleaned up {} expired sessions", count);
        }

        count
    }

    /// Return the entry for `session_id`, inserting it if absent.
    ///
    /// Must not be called while holding a reference into `storage`.
    fn admit(&self, session_id: &str) -> RefMut<'_, SessionId, ConversationState> {
        let _admission = self.admission.lock();

        if !self.storage.contains_key(session_id) {
            self.make_room();
            debug!("Created session {}", session_id);
        }

        self.storage
            .entry(session_id.to_string())
            .or_insert_with(ConversationState::new)
    }

    /// Called with the admission lock held, before inserting a new session.
    fn make_room(&self) {
        self.cleanup_expired();

        while self.storage.len() >= self.policy.max_sessions {
            let oldest = self
                .storage
                .iter()
                .min_by_key(|entry| entry.last_activity)
                .map(|entry| entry.key().clone());

            match oldest {
                Some(session_id) => {
                    self.storage.remove(&session_id);
                    info!("Session limit reached, evicted least recently active session {}", session_id);
                }
                None => break,
            }
        }
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            active_sessions: self.storage.len(),
            total_turns: self.storage.iter().map(|entry| entry.turns.len()).sum(),
        }
    }
}

impl Default for SessionMemory {
    fn default() -> Self {
        Self::new(EvictionPolicy::default())
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SessionStats {
    pub active_sessions: usize,
    pub total_turns: usize,
}
