//! Image resolution for chat requests
//!
//! Finds the image a conversation refers to and turns it into an inline
//! `data:<mime>;base64,<payload>` image. Inline payloads found in a message
//! are passed through untouched; plain URLs are downloaded and encoded.

use std::sync::LazyLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use eyre::WrapErr;
use regex::Regex;
use reqwest::header::CONTENT_TYPE;

use crate::error::{AppError, AppResult};
use crate::types::ChatMessage;

const FALLBACK_MIME: &str = "image/png";

static DATA_URI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"data:image/[a-zA-Z]+;base64,[a-zA-Z0-9+/=]+").expect("data URI regex")
});

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://[^\s)]+").expect("URL regex"));

/// An image carried inline as base64 text plus its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    /// Base64 (standard alphabet) encoded image bytes
    pub data: String,
}

impl InlineImage {
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        let mime_type = mime_type.into();
        Self {
            mime_type: if mime_type.is_empty() {
                FALLBACK_MIME.to_string()
            } else {
                mime_type
            },
            data: STANDARD.encode(bytes),
        }
    }

    /// Parse `data:<mime>;base64,<payload>`.
    pub fn parse(data_uri: &str) -> Option<Self> {
        let rest = data_uri.strip_prefix("data:")?;
        let (meta, data) = rest.split_once(',')?;
        let mime_type = meta.strip_suffix(";base64")?;
        if mime_type.is_empty() {
            return None;
        }
        Some(Self {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// What a user message points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageReference {
    Inline(InlineImage),
    Url(String),
}

/// Scan `user` messages newest to oldest and return the first image reference.
///
/// Within one message an inline payload beats a URL. Messages whose content
/// is not a plain string (multi-part arrays and the like) are skipped.
pub fn find_image_reference(messages: &[ChatMessage]) -> Option<ImageReference> {
    for message in messages.iter().rev().filter(|m| m.is_user()) {
        let Some(text) = message.text() else {
            continue;
        };

        if let Some(image) = DATA_URI_RE
            .find(text)
            .and_then(|m| InlineImage::parse(m.as_str()))
        {
            return Some(ImageReference::Inline(image));
        }

        if let Some(url) = URL_RE.find(text) {
            return Some(ImageReference::Url(url.as_str().to_string()));
        }
    }
    None
}

/// Pick a MIME type for a downloaded image: declared content type first,
/// then the URL's file extension, then PNG.
pub fn detect_mime(content_type: Option<&str>, url: &str) -> String {
    let declared = content_type
        .and_then(|ct| ct.split(';').next())
        .map(str::trim)
        .filter(|ct| !ct.is_empty() && !ct.eq_ignore_ascii_case("application/octet-stream"));

    if let Some(mime) = declared {
        return mime.to_ascii_lowercase();
    }
    guess_mime_from_url(url)
        .unwrap_or(FALLBACK_MIME)
        .to_string()
}

fn guess_mime_from_url(url: &str) -> Option<&'static str> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let file_name = parsed.path_segments()?.last()?;
    let (_, ext) = file_name.rsplit_once('.')?;
    let mime = match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" | "jpe" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "tif" | "tiff" => "image/tiff",
        "ico" => "image/vnd.microsoft.icon",
        "avif" => "image/avif",
        "heic" => "image/heic",
        _ => return None,
    };
    Some(mime)
}

/// Resolves chat messages to inline images, downloading URLs when needed.
///
/// Holds one long-lived HTTP client so downloads share a connection pool.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    http: reqwest::Client,
}

impl ImageResolver {
    pub fn new() -> eyre::Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .wrap_err("Failed to build image download client")?;
        Ok(Self { http })
    }

    pub async fn resolve(&self, messages: &[ChatMessage]) -> AppResult<InlineImage> {
        match find_image_reference(messages) {
            Some(ImageReference::Inline(image)) => {
                tracing::info!("Found inline base64 image ({}) in user message", image.mime_type);
                Ok(image)
            }
            Some(ImageReference::Url(url)) => {
                tracing::info!("Found image URL in user message: {}", url);
                self.fetch(&url).await
            }
            None => Err(AppError::InvalidRequest(
                "No valid image URL or base64 data URI found in user messages".to_string(),
            )),
        }
    }

    /// Download `url` and encode it inline. A single attempt; any failure is
    /// reported as a client error.
    pub async fn fetch(&self, url: &str) -> AppResult<InlineImage> {
        let fetch_error = |detail: String| {
            tracing::error!("Failed to download image {}: {}", url, detail);
            AppError::InvalidRequest(format!("Unable to download or process image from URL: {}", detail))
        };

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?
            .error_for_status()
            .map_err(|e| fetch_error(e.to_string()))?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;
        if bytes.is_empty() {
            return Err(fetch_error("response body is empty".to_string()));
        }

        let mime_type = detect_mime(content_type.as_deref(), url);
        tracing::debug!("Downloaded {} bytes of {} from {}", bytes.len(), mime_type, url);
        Ok(InlineImage::from_bytes(mime_type, &bytes))
    }
}
