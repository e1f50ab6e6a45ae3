use std::sync::Arc;
use tracing::{info, warn};

use crate::models::chat::ChatMessage;
use crate::models::summary::SummarizeRequest;
use crate::services::language::language_name;
use crate::services::llm_service::LlmProvider;
use crate::services::response_normalizer::{normalize, NormalizedSummary};
use crate::utils::error::ApiError;

pub const DEFAULT_LANGUAGE_CODE: &str = "en";

pub struct SummaryService {
    llm_provider: Arc<dyn LlmProvider>,
}

impl SummaryService {
    pub fn new(llm_provider: Arc<dyn LlmProvider>) -> Self {
        Self { llm_provider }
    }

    pub fn build_system_prompt(language_name: &str, preferences: &str) -> String {
        format!(
            r#"ROLE:
You are a text analysis assistant that writes clear, concise summaries.

TASK:
For the passage the user sends:
1. Write a summary of 2-3 sentences.
2. Extract 3-5 key points.

USER CONTEXT:
- Output Language: {language_name}
- User Preferences: {preferences}

OUTPUT FORMAT:
Respond with a single JSON object and nothing else:
{{
    "summary": "string",
    "key_points": ["string", "string", "string"]
}}
Write every value in {language_name}. No commentary, no markdown, no code fences."#
        )
    }

    pub async fn summarize(&self, request: SummarizeRequest) -> Result<NormalizedSummary, ApiError> {
        let text = request
            .text
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ApiError::BadRequest("No text provided".to_string()))?;

        let code = request.language.as_deref().unwrap_or(DEFAULT_LANGUAGE_CODE);
        let language = language_name(code);
        let preferences = request.preferences.unwrap_or_default();

        info!(
            "Summarize request: text_len={}, language={} ({}), has_preferences={}",
            text.len(),
            code,
            language,
            !preferences.is_empty()
        );

        let messages = vec![
            ChatMessage::system(Self::build_system_prompt(language, &preferences)),
            ChatMessage::user(text),
        ];

        let raw = self
            .llm_provider
            .complete(&messages, true)
            .await
            .map_err(|e| ApiError::LlmError(format!("{:#}", e)))?;

        let normalized = normalize(&raw);
        if normalized.is_degraded() {
            warn!("Returning degraded summary ({} chars of raw text)", raw.len());
        }

        Ok(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::Role;
    use crate::services::llm_service::MockLlmProvider;

    fn request(text: Option<&str>, language: Option<&str>) -> SummarizeRequest {
        SummarizeRequest {
            text: text.map(str::to_string),
            language: language.map(str::to_string),
            preferences: None,
        }
    }

    #[tokio::test]
    async fn test_empty_text_never_calls_model() {
        let mut provider = MockLlmProvider::new();
        provider.expect_complete().times(0);
        let service = SummaryService::new(Arc::new(provider));

        for bad in [request(None, None), request(Some(""), None), request(Some("  \n"), None)] {
            match service.summarize(bad).await {
                Err(ApiError::BadRequest(msg)) => assert_eq!(msg, "No text provided"),
                other => panic!("expected validation error, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_requests_json_mode_with_system_and_user_messages() {
        let mut provider = MockLlmProvider::new();
        provider
            .expect_complete()
            .withf(|messages, json_mode| {
                *json_mode
                    && messages.len() == 2
                    && messages[0].role == Role::System
                    && messages[0].content.contains("Output Language: Spanish")
                    && messages[1].role == Role::User
                    && messages[1].content == "Hola mundo"
            })
            .times(1)
            .returning(|_, _| Ok(r#"{"summary": "Un saludo.", "key_points": ["hola"]}"#.to_string()));
        let service = SummaryService::new(Arc::new(provider));

        let normalized = service
            .summarize(request(Some("Hola mundo"), Some("es")))
            .await
            .unwrap();
        let result = normalized.into_result();
        assert_eq!(result.summary, "Un saludo.");
        assert_eq!(result.key_points, vec!["hola".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_language_falls_back_to_english() {
        let mut provider = MockLlmProvider::new();
        provider
            .expect_complete()
            .withf(|messages, _| messages[0].content.contains("Output Language: English"))
            .times(1)
            .returning(|_, _| Ok(r#"{"summary": "s", "key_points": []}"#.to_string()));
        let service = SummaryService::new(Arc::new(provider));

        service.summarize(request(Some("text"), Some("xx"))).await.unwrap();
    }

    #[tokio::test]
    async fn test_preferences_reach_the_prompt() {
        let mut provider = MockLlmProvider::new();
        provider
            .expect_complete()
            .withf(|messages, _| messages[0].content.contains("User Preferences: bullet points for a 10 year old"))
            .times(1)
            .returning(|_, _| Ok(r#"{"summary": "s", "key_points": []}"#.to_string()));
        let service = SummaryService::new(Arc::new(provider));

        let request = SummarizeRequest {
            text: Some("text".to_string()),
            language: None,
            preferences: Some("bullet points for a 10 year old".to_string()),
        };
        service.summarize(request).await.unwrap();
    }

    #[tokio::test]
    async fn test_non_json_output_degrades_gracefully() {
        let mut provider = MockLlmProvider::new();
        provider
            .expect_complete()
            .returning(|_, _| Ok("I cannot produce JSON, but the text is about cats.".to_string()));
        let service = SummaryService::new(Arc::new(provider));

        let normalized = service.summarize(request(Some("cats"), None)).await.unwrap();
        assert!(normalized.is_degraded());
        let result = normalized.into_result();
        assert_eq!(result.summary, "I cannot produce JSON, but the text is about cats.");
        assert!(result.key_points.is_empty());
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let mut provider = MockLlmProvider::new();
        provider
            .expect_complete()
            .returning(|_, _| Err(anyhow::anyhow!("LLM API error: 500")));
        let service = SummaryService::new(Arc::new(provider));

        assert!(matches!(
            service.summarize(request(Some("text"), None)).await,
            Err(ApiError::LlmError(_))
        ));
    }
}
