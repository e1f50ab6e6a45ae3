use anyhow::Result;

use super::models::{NewSummary, PreferencesUpdate, SummaryRecord, UserPreferences};

/// Durable storage for saved summaries and per-user preferences.
#[async_trait::async_trait]
pub trait PersistenceStore: Send + Sync {
    async fn save_summary(&self, summary: NewSummary) -> Result<SummaryRecord>;

    /// Newest first.
    async fn list_summaries(&self, user_id: i64) -> Result<Vec<SummaryRecord>>;

    async fn get_preferences(&self, user_id: i64) -> Result<Option<UserPreferences>>;

    /// Insert when missing, otherwise update only the fields present in `update`.
    async fn upsert_preferences(
        &self,
        user_id: i64,
        update: PreferencesUpdate,
    ) -> Result<UserPreferences>;
}
