use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Query, State},
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::database::{NewSummary, PersistenceStore, SummaryRecord};
use crate::models::summary::{ListSummariesQuery, SaveSummaryRequest, StatusResponse};
use crate::utils::error::ApiError;

pub async fn save_summary_handler(
    State(store): State<Arc<dyn PersistenceStore>>,
    payload: Result<Json<SaveSummaryRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Json(request) = payload?;

    let (text, summary) = match (request.text, request.summary) {
        (Some(text), Some(summary)) if !text.is_empty() && !summary.is_empty() => (text, summary),
        _ => return Err(ApiError::BadRequest("Missing text or summary".to_string())),
    };

    let record = store
        .save_summary(NewSummary {
            user_id: request.user_id,
            text,
            summary,
            key_points: request.key_points,
            url: request.url.unwrap_or_default(),
        })
        .await
        .map_err(|e| ApiError::DatabaseError(format!("{:#}", e)))?;

    info!("Saved summary {} for user {}", record.id, record.user_id);
    Ok(Json(StatusResponse::success()))
}

pub async fn list_summaries_handler(
    State(store): State<Arc<dyn PersistenceStore>>,
    query: Result<Query<ListSummariesQuery>, QueryRejection>,
) -> Result<Json<Vec<SummaryRecord>>, ApiError> {
    let Query(query) = query?;

    let records = store
        .list_summaries(query.user_id)
        .await
        .map_err(|e| ApiError::DatabaseError(format!("{:#}", e)))?;

    Ok(Json(records))
}
