use anyhow::Result;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;

use super::models::{NewSummary, PreferencesUpdate, SummaryRecord, UserPreferences};
use super::store::PersistenceStore;

/// Process-local store. Used when no database URL is configured, and in tests.
#[derive(Default)]
pub struct InMemoryStore {
    summaries: RwLock<Vec<SummaryRecord>>,
    preferences: RwLock<HashMap<i64, UserPreferences>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PersistenceStore for InMemoryStore {
    async fn save_summary(&self, summary: NewSummary) -> Result<SummaryRecord> {
        let mut summaries = self.summaries.write();
        let record = SummaryRecord {
            id: summaries.len() as i64 + 1,
            user_id: summary.user_id,
            text: summary.text,
            summary: summary.summary,
            key_points: summary.key_points,
            url: summary.url,
            created_at: Utc::now(),
        };
        summaries.push(record.clone());
        Ok(record)
    }

    async fn list_summaries(&self, user_id: i64) -> Result<Vec<SummaryRecord>> {
        let mut records: Vec<SummaryRecord> = self
            .summaries
            .read()
            .iter()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect();

        // Same ordering as the SQL store: created_at DESC, then id DESC.
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    async fn get_preferences(&self, user_id: i64) -> Result<Option<UserPreferences>> {
        Ok(self.preferences.read().get(&user_id).cloned())
    }

    async fn upsert_preferences(
        &self,
        user_id: i64,
        update: PreferencesUpdate,
    ) -> Result<UserPreferences> {
        let mut preferences = self.preferences.write();
        let updated = match preferences.remove(&user_id) {
            Some(existing) => UserPreferences {
                updated_at: Some(Utc::now()),
                ..update.apply_to(existing)
            },
            None => update.apply_to(UserPreferences::default_for(user_id)),
        };
        preferences.insert(user_id, updated.clone());
        Ok(updated)
    }
}
