use crate::models::chat::{ChatContext, ChatMessage};

use super::types::Turn;

/// Builds the system message for follow-up chat about a summarized text.
pub struct ContextBuilder {
    base_instruction: String,
}

impl ContextBuilder {
    pub fn new(base_instruction: String) -> Self {
        Self { base_instruction }
    }

    pub fn default_base_instruction() -> String {
        r#"ROLE: You are a helpful assistant.

TASK: Answer the user's questions using the context below. Prefer the original text when it and the summary disagree."#
            .to_string()
    }

    /// Context fields are embedded as given; key points are rendered as a JSON list.
    pub fn build_system_context(&self, context: &ChatContext) -> String {
        let key_points =
            serde_json::to_string(&context.key_points).unwrap_or_else(|_| "[]".to_string());

        format!(
            "{}\n\nCONTEXT:\n- Original Text: {}\n- Summary: {}\n- Key Points: {}",
            self.base_instruction,
            context.text.as_deref().unwrap_or_default(),
            context.summary.as_deref().unwrap_or_default(),
            key_points,
        )
    }

    /// [system] + history in original order + [question]
    pub fn build_messages(&self, context: &ChatContext, history: &[Turn], question: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(self.build_system_context(context)));
        messages.extend(history.iter().map(ChatMessage::from));
        messages.push(ChatMessage::user(question));
        messages
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new(Self::default_base_instruction())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::Role;

    fn context() -> ChatContext {
        ChatContext {
            text: Some("Rust 1.0 shipped in May 2015.".to_string()),
            summary: Some("Rust went stable in 2015.".to_string()),
            key_points: vec!["stable".to_string(), "2015".to_string()],
        }
    }

    #[test]
    fn test_system_context_embeds_fields_verbatim() {
        let system = ContextBuilder::default().build_system_context(&context());
        assert!(system.contains("- Original Text: Rust 1.0 shipped in May 2015."));
        assert!(system.contains("- Summary: Rust went stable in 2015."));
        assert!(system.contains(r#"- Key Points: ["stable","2015"]"#));
    }

    #[test]
    fn test_messages_are_system_history_question() {
        let history = vec![Turn::user("q1"), Turn::assistant("a1")];
        let messages = ContextBuilder::default().build_messages(&context(), &history, "q2");

        let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant, Role::User]);
        assert_eq!(messages[1].content, "q1");
        assert_eq!(messages[2].content, "a1");
        assert_eq!(messages[3].content, "q2");
    }
}
