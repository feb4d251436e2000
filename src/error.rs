use salvo::http::StatusCode;
use salvo::prelude::*;

use crate::types::{ApiError, ApiErrorDetail};

pub type AppResult<T> = Result<T, AppError>;

/// Failure kinds surfaced to API callers. Each kind maps to one HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed input, no image in the conversation, or the image URL could not be fetched
    #[error("{0}")]
    InvalidRequest(String),
    /// The captioning service failed or answered without a caption
    #[error("{0}")]
    Upstream(String),
    #[error("{0}")]
    MissingCredentials(String),
    #[error("{0}")]
    InvalidCredentials(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::MissingCredentials(_) => StatusCode::UNAUTHORIZED,
            Self::InvalidCredentials(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// OpenAI-style `error.type` value
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request_error",
            Self::Upstream(_) => "upstream_error",
            Self::MissingCredentials(_) | Self::InvalidCredentials(_) => "authentication_error",
            Self::NotFound(_) => "not_found_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Write this error to the response as an OpenAI-compatible error body.
    pub fn render(&self, res: &mut Response) {
        if let Self::Internal(message) = self {
            tracing::error!("Internal error while handling request: {}", message);
        }
        render_error(res, self.status_code(), &self.to_string(), self.error_type());
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Render a standardized error response with proper HTTP status code
pub fn render_error(res: &mut Response, status: StatusCode, message: &str, error_type: &str) {
    res.status_code(status);
    res.render(Json(ApiError {
        error: ApiErrorDetail {
            message: message.to_string(),
            r#type: error_type.to_string(),
            code: Some(status.as_u16().to_string()),
        },
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_kind_maps_to_its_status() {
        let cases = [
            (AppError::InvalidRequest("x".into()), 400),
            (AppError::Upstream("x".into()), 502),
            (AppError::MissingCredentials("x".into()), 401),
            (AppError::InvalidCredentials("x".into()), 403),
            (AppError::NotFound("x".into()), 404),
            (AppError::Internal("x".into()), 500),
        ];
        for (err, status) in cases {
            assert_eq!(err.status_code().as_u16(), status, "{:?}", err);
        }
    }

    #[test]
    fn internal_errors_keep_the_cause() {
        let err: AppError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(err.to_string().starts_with("Internal server error: EOF"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
