use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_THEME: &str = "light";

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub id: i64,
    pub user_id: i64,
    pub text: String,
    pub summary: String,
    pub key_points: Vec<String>,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// A summary about to be stored.
#[derive(Debug, Clone)]
pub struct NewSummary {
    pub user_id: i64,
    pub text: String,
    pub summary: String,
    pub key_points: Vec<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct UserPreferences {
    pub user_id: i64,
    pub language: String,
    pub theme: String,
    pub preferences: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserPreferences {
    /// What a user gets before they ever saved anything.
    pub fn default_for(user_id: i64) -> Self {
        Self {
            user_id,
            language: DEFAULT_LANGUAGE.to_string(),
            theme: DEFAULT_THEME.to_string(),
            preferences: String::new(),
            updated_at: None,
        }
    }
}

/// Partial update; `None` keeps the stored value (or the default on first insert).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferencesUpdate {
    #[serde(default)]
    pub preferences: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
}

impl PreferencesUpdate {
    pub fn apply_to(self, mut current: UserPreferences) -> UserPreferences {
        if let Some(preferences) = self.preferences {
            current.preferences = preferences;
        }
        if let Some(language) = self.language {
            current.language = language;
        }
        if let Some(theme) = self.theme {
            current.theme = theme;
        }
        current
    }
}
