//! Chat-completion wire types (OpenAI-compatible)
//!
//! Only the fields the advisory client sends or reads are modeled. Unknown
//! response fields are ignored.

use serde::{Deserialize, Serialize};

/// Message role in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A single message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    role: MessageRole,
    content: String,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Non-streaming chat completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// Assistant message in a response
///
/// `content` may be `null` on the wire (e.g. refusals); it decodes as `None`.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// A single candidate completion
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    pub message: AssistantMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Chat completion response
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl ChatCompletion {
    /// Text of the first candidate, trimmed
    pub fn first_content(&self) -> Option<String> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(|content| content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serializes_in_message_order() {
        let request = ChatCompletionRequest {
            model: "gpt-4o".to_string(),
            messages: vec![ChatMessage::system("be helpful"), ChatMessage::user("hi")],
        };
        let value = serde_json::to_value(&request).expect("serializes");
        assert_eq!(
            value,
            json!({
                "model": "gpt-4o",
                "messages": [
                    { "role": "system", "content": "be helpful" },
                    { "role": "user", "content": "hi" }
                ]
            })
        );
    }

    #[test]
    fn test_first_content_is_trimmed() {
        let completion: ChatCompletion = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "  L2 should own it.\n" }, "finish_reason": "stop" },
                { "index": 1, "message": { "role": "assistant", "content": "ignored" }, "finish_reason": "stop" }
            ],
            "usage": { "prompt_tokens": 1, "completion_tokens": 1, "total_tokens": 2 }
        }))
        .expect("decodes");
        assert_eq!(completion.first_content().as_deref(), Some("L2 should own it."));
    }

    #[test]
    fn test_missing_choices_has_no_content() {
        let completion: ChatCompletion =
            serde_json::from_value(json!({ "id": "x" })).expect("decodes");
        assert!(completion.first_content().is_none());
    }

    #[test]
    fn test_null_content_has_no_content() {
        let completion: ChatCompletion = serde_json::from_value(json!({
            "choices": [{ "message": { "role": "assistant", "content": null } }]
        }))
        .expect("decodes");
        assert!(completion.first_content().is_none());
    }
}
