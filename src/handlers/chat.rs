use salvo::prelude::*;

use crate::error::{AppError, AppResult};
use crate::types::{ChatCompletionRequest, ChatCompletionResponse};

use super::helpers::{get_state, respond};

/// Body limit for chat requests; inline base64 images make these large
const CHAT_BODY_LIMIT: usize = 20 * 1024 * 1024;

/// POST /v1/chat/completions - Caption the newest image in the conversation
///
/// Besides `messages`, the body may carry top-level `language` (default
/// `en`) and `structured_prompt` (`yes`/`no`, default `yes`).
#[handler]
pub async fn chat_completions(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result = complete(req, depot).await;
    respond(res, result);
}

async fn complete(req: &mut Request, depot: &Depot) -> AppResult<ChatCompletionResponse> {
    let state = get_state(depot)?;

    let request: ChatCompletionRequest = req
        .parse_json_with_max_size(CHAT_BODY_LIMIT)
        .await
        .map_err(|e| {
            tracing::error!("Failed to parse chat request: {}", e);
            AppError::Internal(format!("Failed to parse request body: {}", e))
        })?;

    state.service.chat(request).await
}
