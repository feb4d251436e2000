use salvo::http::header::AUTHORIZATION;
use salvo::prelude::*;

use crate::error::{AppError, AppResult};

use super::helpers::get_state;

/// Bearer-token gate for the API routes. A no-op when no master key is set.
#[handler]
pub async fn require_api_key(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let result = get_state(depot).and_then(|state| match state.config.auth_key() {
        Some(expected) => {
            let header = req.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok());
            check_bearer(header, expected)
        }
        None => Ok(()),
    });

    if let Err(e) = result {
        tracing::warn!("Rejected request to {}: {}", req.uri().path(), e);
        e.render(res);
        ctrl.skip_rest();
    }
}

/// Validate an `Authorization` header value against the master key.
///
/// The token is the last space separated part of the header.
pub fn check_bearer(header: Option<&str>, expected: &str) -> AppResult<()> {
    let header = header
        .filter(|h| h.to_ascii_lowercase().contains("bearer"))
        .ok_or_else(|| {
            AppError::MissingCredentials("Bearer token authentication required".to_string())
        })?;

    let token = header.split(' ').next_back().unwrap_or_default();
    if token != expected {
        return Err(AppError::InvalidCredentials("Invalid API key".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_matching_token() {
        assert!(check_bearer(Some("Bearer secret"), "secret").is_ok());
        assert!(check_bearer(Some("bearer secret"), "secret").is_ok());
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let err = check_bearer(None, "secret").unwrap_err();
        assert_eq!(err.status_code().as_u16(), 401);

        let err = check_bearer(Some("Basic c2VjcmV0"), "secret").unwrap_err();
        assert_eq!(err.status_code().as_u16(), 401);
    }

    #[test]
    fn wrong_token_is_forbidden() {
        let err = check_bearer(Some("Bearer wrong"), "secret").unwrap_err();
        assert_eq!(err.status_code().as_u16(), 403);
    }
}
