use serde::{Deserialize, Serialize};

/// Default owner for summaries when the client does not say who it is.
pub const DEFAULT_USER_ID: i64 = 1;

fn default_user_id() -> i64 {
    DEFAULT_USER_ID
}

// ===== REQUEST MODELS =====

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub preferences: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaveSummaryRequest {
    #[serde(default = "default_user_id")]
    pub user_id: i64,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "super::deserialize_null_default")]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListSummariesQuery {
    #[serde(default = "default_user_id")]
    pub user_id: i64,
}

// ===== RESPONSE MODELS =====

/// Structured summary the model is asked to produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self { status: "success".to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_request_defaults() {
        let request: SaveSummaryRequest =
            serde_json::from_str(r#"{"text": "t", "summary": "s", "key_points": null}"#).unwrap();
        assert_eq!(request.user_id, DEFAULT_USER_ID);
        assert!(request.key_points.is_empty());
        assert!(request.url.is_none());
    }
}
