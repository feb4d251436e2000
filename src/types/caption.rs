use serde::{Deserialize, Serialize};

use crate::image::InlineImage;

/// One captioning job for the upstream service.
#[derive(Debug, Clone)]
pub struct CaptionRequest {
    pub image: InlineImage,
    pub language: String,
    /// `"yes"` for a structured prompt, `"no"` for plain prose
    pub structured_prompt: String,
}

/// JSON body sent to the upstream API
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamPayload<'a> {
    pub image_base64: String,
    pub language: &'a str,
    pub structured_prompt: &'a str,
}

impl<'a> From<&'a CaptionRequest> for UpstreamPayload<'a> {
    fn from(request: &'a CaptionRequest) -> Self {
        Self {
            image_base64: request.image.to_data_uri(),
            language: &request.language,
            structured_prompt: &request.structured_prompt,
        }
    }
}

/// Upstream reply. Every field is optional because failures come back with
/// whatever subset the upstream chose to send.
#[derive(Debug, Default, Deserialize)]
pub struct UpstreamResponse {
    #[serde(default)]
    pub success: serde_json::Value,
    #[serde(default)]
    pub prompt: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<serde_json::Value>,
}

/// Response body of the upload endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadCaptionResponse {
    pub prompt: String,
}
