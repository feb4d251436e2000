use salvo::prelude::*;

use crate::error::{AppError, AppResult};
use crate::image::InlineImage;
use crate::types::{default_language, default_structured_prompt, UploadCaptionResponse};

use super::helpers::{get_state, respond};

/// POST /api/generate-from-upload - Caption an uploaded image
///
/// Multipart fields:
/// - image: image file (required)
/// - language: language code (default "en")
/// - structured_prompt: "yes" or "no" (default "yes")
#[handler]
pub async fn generate_from_upload(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result = caption_upload(req, depot).await;
    respond(res, result);
}

async fn caption_upload(req: &mut Request, depot: &Depot) -> AppResult<UploadCaptionResponse> {
    let state = get_state(depot)?;

    let language = req
        .form::<String>("language")
        .await
        .unwrap_or_else(default_language);
    let structured_prompt = req
        .form::<String>("structured_prompt")
        .await
        .unwrap_or_else(default_structured_prompt);

    let file = req
        .file("image")
        .await
        .ok_or_else(|| AppError::InvalidRequest("Missing 'image' file in form data".to_string()))?;
    let content_type = file.content_type().map(|m| m.to_string()).unwrap_or_default();
    let bytes = tokio::fs::read(file.path())
        .await
        .map_err(|e| AppError::Internal(format!("Failed to read uploaded file: {}", e)))?;

    if bytes.is_empty() {
        return Err(AppError::InvalidRequest("Uploaded image is empty".to_string()));
    }
    tracing::info!("Received upload of {} bytes ({})", bytes.len(), content_type);

    let image = InlineImage::from_bytes(content_type, &bytes);
    state
        .service
        .upload(image, language, structured_prompt)
        .await
}
