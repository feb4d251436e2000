//! Builds the reply envelopes returned to API callers.

use crate::types::{
    AssistantMessage, ChatChoice, ChatCompletionResponse, ChatUsage, ModelList, ModelObject,
    UploadCaptionResponse,
};

/// Wrap a caption as an OpenAI chat completion. The upstream reports no
/// token usage, so all counters are zero.
pub fn chat_completion(model: &str, caption: String) -> ChatCompletionResponse {
    ChatCompletionResponse {
        id: format!("chatcmpl-{}", uuid::Uuid::new_v4()),
        object: "chat.completion".to_string(),
        created: chrono::Utc::now().timestamp(),
        model: model.to_string(),
        choices: vec![ChatChoice {
            index: 0,
            message: AssistantMessage {
                role: "assistant".to_string(),
                content: caption,
            },
            finish_reason: "stop".to_string(),
        }],
        usage: ChatUsage::default(),
    }
}

pub fn upload_caption(caption: String) -> UploadCaptionResponse {
    UploadCaptionResponse { prompt: caption }
}

pub fn model_list(models: &[String], owner: &str) -> ModelList {
    let now = chrono::Utc::now().timestamp();
    ModelList {
        object: "list".to_string(),
        data: models
            .iter()
            .map(|id| ModelObject {
                id: id.clone(),
                object: "model".to_string(),
                created: now,
                owned_by: owner.to_string(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_completion_wraps_caption() {
        let response = chat_completion("image-to-prompt-v1", "a cat".to_string());

        assert!(response.id.starts_with("chatcmpl-"));
        assert_eq!(response.object, "chat.completion");
        assert_eq!(response.model, "image-to-prompt-v1");
        assert_eq!(response.choices.len(), 1);
        assert_eq!(response.choices[0].message.role, "assistant");
        assert_eq!(response.choices[0].message.content, "a cat");
        assert_eq!(response.choices[0].finish_reason, "stop");
        assert_eq!(response.usage.prompt_tokens, 0);
        assert_eq!(response.usage.completion_tokens, 0);
        assert_eq!(response.usage.total_tokens, 0);
    }

    #[test]
    fn ids_are_unique_per_response() {
        let a = chat_completion("m", String::new());
        let b = chat_completion("m", String::new());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn model_list_has_one_entry_per_model() {
        let list = model_list(&["image-to-prompt-v1".to_string()], "lzA6");
        assert_eq!(list.object, "list");
        assert_eq!(list.data.len(), 1);
        assert_eq!(list.data[0].id, "image-to-prompt-v1");
        assert_eq!(list.data[0].object, "model");
        assert_eq!(list.data[0].owned_by, "lzA6");
    }
}
