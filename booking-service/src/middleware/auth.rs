use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use service_core::error::{AppError, ErrorCode};
use thiserror::Error;

use crate::{services::TokenCodec, AppState};

/// Identity of the caller, attached to the request by [`auth_middleware`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub subject_id: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing Authorization header")]
    MissingCredential,
    #[error("Authorization header is not `Bearer <token>`")]
    MalformedCredential,
    #[error("token rejected")]
    Unauthorized,
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredential => {
                AppError::unauthorized(ErrorCode::MissingAuthHeaderErr, "Missing Authorization header")
            }
            AuthError::MalformedCredential => AppError::unauthorized(
                ErrorCode::InvalidHeaderFormatErr,
                "Invalid Authorization header format",
            ),
            AuthError::Unauthorized => {
                AppError::unauthorized(ErrorCode::InvalidTokenErr, "Invalid or expired token")
            }
        }
    }
}

/// Extracts and verifies the bearer token. Every verification failure
/// collapses into `Unauthorized`.
pub fn authenticate(tokens: &TokenCodec, headers: &HeaderMap) -> Result<AuthUser, AuthError> {
    let value = match headers.get(header::AUTHORIZATION) {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AuthError::MissingCredential),
    };

    let value = value.to_str().map_err(|_| AuthError::MalformedCredential)?;

    let parts: Vec<&str> = value.split(' ').collect();
    let token = match parts.as_slice() {
        ["Bearer", token] => *token,
        _ => return Err(AuthError::MalformedCredential),
    };

    let subject_id = tokens.verify(token).map_err(|e| {
        tracing::debug!(error = %e, "Bearer token rejected");
        AuthError::Unauthorized
    })?;

    Ok(AuthUser { subject_id })
}

/// Middleware to require authentication
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(&state.tokens, req.headers())?;
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthUser>().cloned().ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!(
                "Auth user missing from request extensions"
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::Duration;

    fn codec() -> TokenCodec {
        TokenCodec::new(b"middleware-test-secret-0123456789", Duration::hours(1))
    }

    fn headers(value: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(value) = value {
            headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        }
        headers
    }

    #[test]
    fn missing_header() {
        assert_eq!(
            authenticate(&codec(), &headers(None)),
            Err(AuthError::MissingCredential)
        );
        assert_eq!(
            authenticate(&codec(), &headers(Some(""))),
            Err(AuthError::MissingCredential)
        );
    }

    #[test]
    fn wrong_shape_is_malformed_not_unauthorized() {
        for value in ["Token abc", "Bearer", "bearer abc", "Bearer a b", "Bearer  abc"] {
            assert_eq!(
                authenticate(&codec(), &headers(Some(value))),
                Err(AuthError::MalformedCredential),
                "{value:?}"
            );
        }
    }

    #[test]
    fn bad_tokens_are_unauthorized() {
        let other = TokenCodec::new(b"another-secret-entirely-0123456789", Duration::hours(1));
        let foreign = other.issue("u-1", Duration::hours(1)).unwrap();
        let expired = codec().issue("u-1", Duration::seconds(-5)).unwrap();

        for token in ["garbage", foreign.as_str(), expired.as_str(), ""] {
            assert_eq!(
                authenticate(&codec(), &headers(Some(&format!("Bearer {token}")))),
                Err(AuthError::Unauthorized)
            );
        }
    }

    #[test]
    fn valid_token_yields_subject() {
        let token = codec().issue("u-42", Duration::hours(1)).unwrap();
        let user = authenticate(&codec(), &headers(Some(&format!("Bearer {token}")))).unwrap();
        assert_eq!(user.subject_id, "u-42");
    }
}
