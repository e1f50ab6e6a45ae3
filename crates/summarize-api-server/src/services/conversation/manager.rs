use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::models::chat::{ChatReply, ChatRequest};
use crate::services::llm_service::LlmProvider;
use crate::utils::error::ApiError;

use super::context_builder::ContextBuilder;
use super::memory::{SessionMemory, SessionStats};

/// Follow-up chat over a summarized text, remembering each session's exchanges.
pub struct ConversationManager {
    memory: SessionMemory,
    context_builder: ContextBuilder,
    llm_provider: Arc<dyn LlmProvider>,
}

impl ConversationManager {
    pub fn new(memory: SessionMemory, llm_provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            memory,
            context_builder: ContextBuilder::default(),
            llm_provider,
        }
    }

    pub async fn handle_question(&self, request: ChatRequest) -> Result<ChatReply, ApiError> {
        let start_time = Instant::now();

        let question = request
            .question
            .filter(|q| !q.trim().is_empty())
            .ok_or(ApiError::MissingChatInput)?;
        let context = request
            .context
            .filter(|c| !c.is_empty())
            .ok_or(ApiError::MissingChatInput)?;

        let (session_id, history) = self.memory.get_or_create(request.session_id.as_deref());

        info!(
            "Chat request: session={}, question_len={}, history_turns={}",
            session_id,
            question.len(),
            history.len()
        );

        let messages = self.context_builder.build_messages(&context, &history, &question);

        let raw = self
            .llm_provider
            .complete(&messages, false)
            .await
            .map_err(|e| ApiError::LlmError(format!("{:#}", e)))?;
        let answer = raw.trim().to_string();

        self.memory.append_exchange(&session_id, question, answer.clone());

        debug!(
            "Chat completed for session {} in {}ms",
            session_id,
            start_time.elapsed().as_millis()
        );

        Ok(ChatReply { answer, session_id })
    }

    pub fn memory(&self) -> &SessionMemory {
        &self.memory
    }

    pub fn session_stats(&self) -> SessionStats {
        self.memory.stats()
    }
}
