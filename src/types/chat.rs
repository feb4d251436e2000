use serde::{Deserialize, Serialize};

/// Inbound chat completion request.
///
/// `language` and `structured_prompt` are top-level extensions to the OpenAI
/// schema that are forwarded to the captioning service. Fields other than
/// `messages` are kept as raw JSON so loosely typed clients are not rejected.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionRequest {
    #[serde(default)]
    #[allow(dead_code)]
    pub model: serde_json::Value,
    #[serde(default)]
    pub messages: Option<Vec<ChatMessage>>,
    #[serde(default)]
    pub language: serde_json::Value,
    #[serde(default)]
    pub structured_prompt: serde_json::Value,
    #[serde(default)]
    pub stream: serde_json::Value,
}

impl ChatCompletionRequest {
    pub fn language(&self) -> String {
        string_or(&self.language, default_language)
    }

    pub fn structured_prompt(&self) -> String {
        string_or(&self.structured_prompt, default_structured_prompt)
    }

    pub fn is_stream(&self) -> bool {
        self.stream.as_bool().unwrap_or(false)
    }
}

/// Strings pass through, `null`/absent takes the default, anything else is
/// forwarded in its JSON text form.
fn string_or(value: &serde_json::Value, default: fn() -> String) -> String {
    match value {
        serde_json::Value::Null => default(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A chat message as sent by clients. `role` and `content` are kept as raw
/// JSON: messages without a string `user` role or without plain-string
/// content are skipped during image lookup rather than rejected.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub role: serde_json::Value,
    #[serde(default)]
    pub content: serde_json::Value,
}

impl ChatMessage {
    pub fn is_user(&self) -> bool {
        self.role.as_str() == Some("user")
    }

    pub fn text(&self) -> Option<&str> {
        self.content.as_str()
    }
}

pub fn default_language() -> String {
    "en".to_string()
}

pub fn default_structured_prompt() -> String {
    "yes".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatChoice>,
    pub usage: ChatUsage,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: usize,
    pub message: AssistantMessage,
    pub finish_reason: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssistantMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ChatUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}
