//! Conversation memory management module
//!
//! Provides in-memory conversation state management with:
//! - Thread-safe session storage (DashMap)
//! - Bounded growth (idle TTL, per-session turn window, session cap)
//! - System context building from the summarized text

mod context_builder;
pub mod manager;
pub mod memory;
pub mod types;

pub use context_builder::ContextBuilder;
pub use manager::ConversationManager;
pub use memory::{SessionMemory, SessionMemoryError, SessionStats};
pub use types::{ConversationState, EvictionPolicy, Turn, TurnRole};
