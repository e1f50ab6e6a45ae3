use anyhow::Result;
use tracing::debug;

use super::models::{
    NewSummary, PreferencesUpdate, SummaryRecord, UserPreferences, DEFAULT_LANGUAGE,
    DEFAULT_THEME,
};
use super::store::PersistenceStore;
use super::DbPool;

/// PostgreSQL-backed store.
///
/// Statements are not prepared server-side (`persistent(false)`) so the store
/// also works behind transaction-mode poolers such as PgBouncer.
pub struct Repository {
    pub pool: DbPool,
}

impl Repository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PersistenceStore for Repository {
    async fn save_summary(&self, summary: NewSummary) -> Result<SummaryRecord> {
        let record = sqlx::query_as::<_, SummaryRecord>(
            r#"INSERT INTO summaries (user_id, text, summary, key_points, url)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, user_id, text, summary, key_points, url, created_at"#
        )
        .bind(summary.user_id)
        .bind(&summary.text)
        .bind(&summary.summary)
        .bind(&summary.key_points)
        .bind(&summary.url)
        .persistent(false)
        .fetch_one(self.pool.get_pool())
        .await?;

        debug!("Saved summary {} for user {}", record.id, record.user_id);
        Ok(record)
    }

    async fn list_summaries(&self, user_id: i64) -> Result<Vec<SummaryRecord>> {
        let records = sqlx::query_as::<_, SummaryRecord>(
            r#"SELECT id, user_id, text, summary, key_points, url, created_at
               FROM summaries
               WHERE user_id = $1
               ORDER BY created_at DESC, id DESC"#
        )
        .bind(user_id)
        .persistent(false)
        .fetch_all(self.pool.get_pool())
        .await?;

        debug!("Found {} summaries for user {}", records.len(), user_id);
        Ok(records)
    }

    async fn get_preferences(&self, user_id: i64) -> Result<Option<UserPreferences>> {
        let prefs = sqlx::query_as::<_, UserPreferences>(
            r#"SELECT user_id, language, theme, preferences, updated_at
               FROM user_preferences
               WHERE user_id = $1"#
        )
        .bind(user_id)
        .persistent(false)
        .fetch_optional(self.pool.get_pool())
        .await?;

        Ok(prefs)
    }

    async fn upsert_preferences(
        &self,
        user_id: i64,
        update: PreferencesUpdate,
    ) -> Result<UserPreferences> {
        let prefs = sqlx::query_as::<_, UserPreferences>(
            r#"INSERT INTO user_preferences (user_id, preferences, language, theme)
               VALUES ($1, COALESCE($2, ''), COALESCE($3, $5), COALESCE($4, $6))
               ON CONFLICT (user_id) DO UPDATE SET
                   preferences = COALESCE($2, user_preferences.preferences),
                   language    = COALESCE($3, user_preferences.language),
                   theme       = COALESCE($4, user_preferences.theme),
                   updated_at  = now()
               RETURNING user_id, language, theme, preferences, updated_at"#
        )
        .bind(user_id)
        .bind(update.preferences)
        .bind(update.language)
        .bind(update.theme)
        .bind(DEFAULT_LANGUAGE)
        .bind(DEFAULT_THEME)
        .persistent(false)
        .fetch_one(self.pool.get_pool())
        .await?;

        debug!("Upserted preferences for user {}", user_id);
        Ok(prefs)
    }
}

/// These run against a real PostgreSQL when `TEST_DATABASE_URL` is set and
/// are skipped otherwise.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;

    async fn test_repository() -> Option<Repository> {
        let url = match std::env::var("TEST_DATABASE_URL") {
            Ok(url) if !url.is_empty() => url,
            _ => {
                eprintln!("TEST_DATABASE_URL not set, skipping PostgreSQL test");
                return None;
            }
        };

        let pool = DbPool::new(&DatabaseConfig {
            url,
            pool_max_size: 2,
            pool_timeout_seconds: 5,
            run_migrations: true,
        })
        .await
        .unwrap();
        pool.run_migrations().await.unwrap();
        Some(Repository::new(pool))
    }

    /// A user id no other run is likely to share.
    fn scratch_user() -> i64 {
        (uuid::Uuid::new_v4().as_u128() as i64) & 0x0fff_ffff_ffff_ffff
    }

    async fn remove_user(repo: &Repository, user_id: i64) {
        for table in ["summaries", "user_preferences"] {
            sqlx::query(&format!("DELETE FROM {} WHERE user_id = $1", table))
                .bind(user_id)
                .persistent(false)
                .execute(repo.pool.get_pool())
                .await
                .unwrap();
        }
    }

    fn new_summary(user_id: i64, summary: &str) -> NewSummary {
        NewSummary {
            user_id,
            text: format!("text for {}", summary),
            summary: summary.to_string(),
            key_points: vec![format!("{} point", summary)],
            url: String::new(),
        }
    }

    #[tokio::test]
    async fn test_summaries_listed_newest_first() {
        let Some(repo) = test_repository().await else { return };
        let user_id = scratch_user();

        for summary in ["first", "second", "third"] {
            repo.save_summary(new_summary(user_id, summary)).await.unwrap();
        }
        repo.save_summary(new_summary(user_id + 1, "other user")).await.unwrap();

        let records = repo.list_summaries(user_id).await.unwrap();
        let summaries: Vec<&str> = records.iter().map(|r| r.summary.as_str()).collect();
        assert_eq!(summaries, vec!["third", "second", "first"]);
        assert_eq!(records[0].key_points, vec!["third point".to_string()]);

        remove_user(&repo, user_id).await;
        remove_user(&repo, user_id + 1).await;
    }

    #[tokio::test]
    async fn test_upsert_preferences_keeps_absent_fields() {
        let Some(repo) = test_repository().await else { return };
        let user_id = scratch_user();

        assert!(repo.get_preferences(user_id).await.unwrap().is_none());

        let inserted = repo
            .upsert_preferences(
                user_id,
                PreferencesUpdate { theme: Some("dark".to_string()), ..Default::default() },
            )
            .await
            .unwrap();
        assert_eq!(inserted.language, DEFAULT_LANGUAGE);
        assert_eq!(inserted.theme, "dark");
        assert_eq!(inserted.preferences, "");

        let updated = repo
            .upsert_preferences(
                user_id,
                PreferencesUpdate {
                    preferences: Some("bullet points".to_string()),
                    language: Some("fr".to_string()),
                    theme: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.theme, "dark");
        assert_eq!(updated.language, "fr");
        assert_eq!(updated.preferences, "bullet points");

        let stored = repo.get_preferences(user_id).await.unwrap().unwrap();
        assert_eq!(stored, updated);

        remove_user(&repo, user_id).await;
    }
}
