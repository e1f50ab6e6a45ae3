use axum::{
    extract::rejection::JsonRejection,
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::database::{PersistenceStore, PreferencesUpdate, UserPreferences};
use crate::utils::error::ApiError;

pub async fn get_preferences_handler(
    State(store): State<Arc<dyn PersistenceStore>>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserPreferences>, ApiError> {
    let prefs = store
        .get_preferences(user_id)
        .await
        .map_err(|e| ApiError::DatabaseError(format!("{:#}", e)))?;

    let prefs = prefs.unwrap_or_else(|| {
        debug!("No preferences stored for user {}, returning defaults", user_id);
        UserPreferences::default_for(user_id)
    });

    Ok(Json(prefs))
}

pub async fn update_preferences_handler(
    State(store): State<Arc<dyn PersistenceStore>>,
    Path(user_id): Path<i64>,
    payload: Result<Json<PreferencesUpdate>, JsonRejection>,
) -> Result<Json<UserPreferences>, ApiError> {
    let Json(update) = payload?;

    let prefs = store
        .upsert_preferences(user_id, update)
        .await
        .map_err(|e| ApiError::DatabaseError(format!("{:#}", e)))?;

    Ok(Json(prefs))
}
