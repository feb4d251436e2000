//! Client for the imagetoprompt.app captioning API
//!
//! One POST per caption, no retries. The request mimics the browser client
//! the upstream was built for.

use eyre::WrapErr;
use reqwest::header::{self, HeaderMap, HeaderValue};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::types::{CaptionRequest, UpstreamPayload, UpstreamResponse};

const ORIGIN: &str = "https://www.imagetoprompt.app";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/141.0.0.0 Safari/537.36";

/// Longest caption prefix written to the log
const LOG_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    url: String,
}

impl UpstreamClient {
    pub fn new(config: &Config) -> eyre::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .default_headers(browser_headers())
            .build()
            .wrap_err("Failed to build upstream client")?;

        Ok(Self {
            http,
            url: config.upstream_url.clone(),
        })
    }

    /// Ask the upstream for a caption of `request.image`.
    pub async fn caption(&self, request: &CaptionRequest) -> AppResult<String> {
        tracing::info!(
            "Sending caption request upstream (language: {}, structured: {})",
            request.language,
            request.structured_prompt
        );

        let response = self
            .http
            .post(&self.url)
            .json(&UpstreamPayload::from(request))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Upstream request failed: {}", e);
                AppError::Upstream(format!("Upstream service unreachable: {}", e))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!("Failed to read upstream response: {}", e);
            AppError::Upstream(format!("Failed to read upstream response: {}", e))
        })?;

        if !status.is_success() {
            tracing::error!("Upstream returned status {}: {}", status, body);
            return Err(AppError::Upstream(format!(
                "Upstream service error ({}): {}",
                status.as_u16(),
                body
            )));
        }

        let data: UpstreamResponse = serde_json::from_str(&body)?;
        extract_prompt(data)
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"),
    );
    headers.insert(header::ORIGIN, HeaderValue::from_static(ORIGIN));
    headers.insert(header::REFERER, HeaderValue::from_static("https://www.imagetoprompt.app/"));
    headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
    headers
}

/// `success` must be truthy and `prompt` present.
fn extract_prompt(data: UpstreamResponse) -> AppResult<String> {
    let prompt = match (is_truthy(&data.success), data.prompt) {
        (true, Some(serde_json::Value::String(prompt))) => prompt,
        (true, Some(other)) if !other.is_null() => other.to_string(),
        (_, prompt) => {
            let detail = [data.error, data.message, prompt]
                .into_iter()
                .flatten()
                .find_map(|v| match v {
                    serde_json::Value::String(s) if !s.is_empty() => Some(s),
                    serde_json::Value::Null => None,
                    other => Some(other.to_string()),
                })
                .unwrap_or_else(|| "unknown error".to_string());
            tracing::error!("Upstream reported failure: {}", detail);
            return Err(AppError::Upstream(format!("Upstream API returned failure: {}", detail)));
        }
    };

    tracing::info!("Received caption: {}...", preview(&prompt));
    Ok(prompt)
}

fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(a) => !a.is_empty(),
        serde_json::Value::Object(o) => !o.is_empty(),
    }
}

fn preview(text: &str) -> &str {
    match text.char_indices().nth(LOG_PREVIEW_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::image::InlineImage;

    fn client_for(server: &MockServer) -> UpstreamClient {
        let config = Config {
            upstream_url: format!("{}/api/generate-prompt", server.uri()),
            ..Config::default()
        };
        UpstreamClient::new(&config).unwrap()
    }

    fn request() -> CaptionRequest {
        CaptionRequest {
            image: InlineImage::from_bytes("image/png", b"png"),
            language: "de".to_string(),
            structured_prompt: "no".to_string(),
        }
    }

    #[tokio::test]
    async fn sends_payload_and_browser_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate-prompt"))
            .and(header("origin", ORIGIN))
            .and(header("referer", "https://www.imagetoprompt.app/"))
            .and(body_json(json!({
                "imageBase64": "data:image/png;base64,cG5n",
                "language": "de",
                "structuredPrompt": "no"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "success": true, "prompt": "a cat" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let caption = client_for(&server).caption(&request()).await.unwrap();
        assert_eq!(caption, "a cat");
    }

    #[tokio::test]
    async fn non_success_status_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).caption(&request()).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("maintenance"));
    }

    #[tokio::test]
    async fn unsuccessful_payload_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
            .mount(&server)
            .await;

        let err = client_for(&server).caption(&request()).await.unwrap_err();
        assert_eq!(err.status_code().as_u16(), 502);
        assert!(err.to_string().contains("unknown error"));
    }

    #[tokio::test]
    async fn invalid_json_is_internal_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).caption(&request()).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn missing_prompt_reports_upstream_detail() {
        let data: UpstreamResponse =
            serde_json::from_value(json!({ "success": true, "error": "quota exceeded" })).unwrap();
        let err = extract_prompt(data).unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
        assert!(err.to_string().contains("quota exceeded"));

        let data: UpstreamResponse =
            serde_json::from_value(json!({ "success": false, "prompt": "Image too large" })).unwrap();
        assert!(extract_prompt(data).unwrap_err().to_string().contains("Image too large"));
    }

    #[test]
    fn truthy_success_values_are_accepted() {
        let data: UpstreamResponse =
            serde_json::from_value(json!({ "success": 1, "prompt": "ok" })).unwrap();
        assert_eq!(extract_prompt(data).unwrap(), "ok");
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let text = "猫".repeat(150);
        assert_eq!(preview(&text).chars().count(), LOG_PREVIEW_CHARS);
        assert_eq!(preview("short"), "short");
    }
}
