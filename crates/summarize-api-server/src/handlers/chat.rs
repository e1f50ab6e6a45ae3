use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;

use crate::models::chat::{ChatReply, ChatRequest};
use crate::services::ConversationManager;
use crate::utils::error::ApiError;

pub async fn chat_handler(
    State(manager): State<Arc<ConversationManager>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let Json(request) = payload?;
    let reply = manager.handle_question(request).await?;
    Ok(Json(reply))
}
