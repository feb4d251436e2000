//! The captioning pipeline: image resolution, upstream call, reply envelope.

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::image::{ImageResolver, InlineImage};
use crate::response;
use crate::types::{
    CaptionRequest, ChatCompletionRequest, ChatCompletionResponse, LanguageOption, ModelList,
    UploadCaptionResponse,
};
use crate::upstream::UpstreamClient;

/// Created once at startup and shared by every request handler.
#[derive(Debug)]
pub struct CaptionService {
    resolver: ImageResolver,
    upstream: UpstreamClient,
    default_model: String,
    known_models: Vec<String>,
    model_owner: String,
    languages: Vec<(String, String)>,
}

impl CaptionService {
    pub fn new(config: &Config) -> eyre::Result<Self> {
        Ok(Self {
            resolver: ImageResolver::new()?,
            upstream: UpstreamClient::new(config)?,
            default_model: config.default_model.clone(),
            known_models: config.known_models.clone(),
            model_owner: config.model_owner.clone(),
            languages: config.supported_languages.clone(),
        })
    }

    /// Caption the newest image in a chat conversation.
    pub async fn chat(&self, request: ChatCompletionRequest) -> AppResult<ChatCompletionResponse> {
        let messages = request
            .messages
            .as_deref()
            .filter(|m| !m.is_empty())
            .ok_or_else(|| {
                AppError::InvalidRequest("Request body is missing the 'messages' field".to_string())
            })?;

        if request.is_stream() {
            tracing::warn!("Streaming is not supported, returning a single completion");
        }

        let image = self.resolver.resolve(messages).await?;
        let caption = self
            .upstream
            .caption(&CaptionRequest {
                image,
                language: request.language(),
                structured_prompt: request.structured_prompt(),
            })
            .await?;

        Ok(response::chat_completion(&self.default_model, caption))
    }

    /// Caption an image the caller uploaded directly.
    pub async fn upload(
        &self,
        image: InlineImage,
        language: String,
        structured_prompt: String,
    ) -> AppResult<UploadCaptionResponse> {
        let caption = self
            .upstream
            .caption(&CaptionRequest {
                image,
                language,
                structured_prompt,
            })
            .await?;
        Ok(response::upload_caption(caption))
    }

    pub fn models(&self) -> ModelList {
        response::model_list(&self.known_models, &self.model_owner)
    }

    pub fn languages(&self) -> Vec<LanguageOption> {
        self.languages
            .iter()
            .map(|(name, code)| LanguageOption {
                name: name.clone(),
                code: code.clone(),
            })
            .collect()
    }
}
