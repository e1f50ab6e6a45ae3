pub mod conversation;
pub mod language;
pub mod llm_service;
pub mod response_normalizer;
pub mod summary_service;

pub use conversation::ConversationManager;
pub use llm_service::{LlmProvider, LlmService};
pub use summary_service::SummaryService;
