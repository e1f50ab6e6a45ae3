use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;

use crate::models::summary::{SummarizeRequest, SummaryResult};
use crate::services::SummaryService;
use crate::utils::error::ApiError;

pub async fn summarize_handler(
    State(summary_service): State<Arc<SummaryService>>,
    payload: Result<Json<SummarizeRequest>, JsonRejection>,
) -> Result<Json<SummaryResult>, ApiError> {
    let Json(request) = payload?;
    let normalized = summary_service.summarize(request).await?;
    Ok(Json(normalized.into_result()))
}
