use axum::extract::FromRef;
use std::sync::Arc;

use crate::database::PersistenceStore;
use crate::services::{ConversationManager, SummaryService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub conversation_manager: Arc<ConversationManager>,
    pub summary_service: Arc<SummaryService>,
    pub store: Arc<dyn PersistenceStore>,
}

impl AppState {
    pub fn new(
        conversation_manager: Arc<ConversationManager>,
        summary_service: Arc<SummaryService>,
        store: Arc<dyn PersistenceStore>,
    ) -> Self {
        Self {
            conversation_manager,
            summary_service,
            store,
        }
    }
}

impl FromRef<AppState> for Arc<ConversationManager> {
    fn from_ref(state: &AppState) -> Self {
        state.conversation_manager.clone()
    }
}

impl FromRef<AppState> for Arc<SummaryService> {
    fn from_ref(state: &AppState) -> Self {
        state.summary_service.clone()
    }
}

impl FromRef<AppState> for Arc<dyn PersistenceStore> {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}
