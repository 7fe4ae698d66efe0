use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable failure class carried in the `Code` field of error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidQueries,
    InvalidStateParameter,
    ExchangeTokenErr,
    AuthUserInfoErr,
    MissingAuthHeaderErr,
    InvalidHeaderFormatErr,
    InvalidTokenErr,
    GenerateTokenErr,
    GetUserIdErr,
    InvalidEmailErr,
    UsersStoreErr,
    Forbidden,
    NotFound,
    InvalidRequest,
    ValidationError,
    Conflict,
    RateLimited,
    ConfigError,
    InternalError,
}

/// JSON error body: `{"Message": ..., "Type": "ERROR", "Code": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Code")]
    pub code: ErrorCode,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            kind: "ERROR".to_string(),
            code,
        }
    }
}

/// HTTP-facing error. Client messages for 5xx variants are limited to the
/// outermost `anyhow` context; the full chain only reaches the logs.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Bad request: {1}")]
    BadRequest(ErrorCode, anyhow::Error),

    #[error("Unauthorized: {1}")]
    Unauthorized(ErrorCode, anyhow::Error),

    #[error("Forbidden: {0}")]
    Forbidden(anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Conflict: {0}")]
    Conflict(anyhow::Error),

    #[error("Too many requests: {0}")]
    TooManyRequests(String, Option<u64>),

    #[error("Internal error: {1:#}")]
    Internal(ErrorCode, anyhow::Error),

    #[error("Internal server error: {0:#}")]
    InternalError(#[from] anyhow::Error),

    #[error("Database error: {0:#}")]
    DatabaseError(anyhow::Error),

    #[error("Configuration error: {0:#}")]
    ConfigError(anyhow::Error),
}

impl AppError {
    pub fn bad_request(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError::BadRequest(code, anyhow::anyhow!(message.into()))
    }

    pub fn unauthorized(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError::Unauthorized(code, anyhow::anyhow!(message.into()))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::Forbidden(anyhow::anyhow!(message.into()))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(anyhow::anyhow!(message.into()))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(..) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(..) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::TooManyRequests(..) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(..)
            | AppError::InternalError(_)
            | AppError::DatabaseError(_)
            | AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::ValidationError(_) => ErrorCode::ValidationError,
            AppError::BadRequest(code, _)
            | AppError::Unauthorized(code, _)
            | AppError::Internal(code, _) => *code,
            AppError::Forbidden(_) => ErrorCode::Forbidden,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::Conflict(_) => ErrorCode::Conflict,
            AppError::TooManyRequests(..) => ErrorCode::RateLimited,
            AppError::InternalError(_) | AppError::DatabaseError(_) => ErrorCode::InternalError,
            AppError::ConfigError(_) => ErrorCode::ConfigError,
        }
    }

    fn client_message(&self) -> String {
        match self {
            AppError::ValidationError(err) => format!("Validation error: {}", err),
            AppError::BadRequest(_, err)
            | AppError::Unauthorized(_, err)
            | AppError::Forbidden(err)
            | AppError::NotFound(err)
            | AppError::Conflict(err)
            | AppError::Internal(_, err) => err.to_string(),
            AppError::TooManyRequests(msg, _) => msg.clone(),
            AppError::InternalError(_) => "Internal server error".to_string(),
            AppError::DatabaseError(_) => "Database error".to_string(),
            AppError::ConfigError(_) => "Configuration error".to_string(),
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let retry_after = match &self {
            AppError::TooManyRequests(_, retry) => *retry,
            _ => None,
        };

        let mut res = (
            status,
            Json(ErrorResponse::new(self.client_message(), self.code())),
        )
            .into_response();

        if let Some(retry) = retry_after {
            res.headers_mut()
                .insert(axum::http::header::RETRY_AFTER, retry.into());
        }

        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn renders_message_type_code_body() {
        let (status, body) = body_of(AppError::bad_request(
            ErrorCode::InvalidStateParameter,
            "Invalid state parameter",
        ))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["Message"], "Invalid state parameter");
        assert_eq!(body["Type"], "ERROR");
        assert_eq!(body["Code"], "INVALID_STATE_PARAMETER");
    }

    #[tokio::test]
    async fn internal_errors_hide_the_cause_chain() {
        let cause: Result<(), std::io::Error> = Err(std::io::Error::other("connection reset by peer"));
        let err = cause.context("Failed to exchange token").unwrap_err();

        let (status, body) = body_of(AppError::Internal(ErrorCode::ExchangeTokenErr, err)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["Message"], "Failed to exchange token");
        assert_eq!(body["Code"], "EXCHANGE_TOKEN_ERR");
        assert!(!body.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn too_many_requests_sets_retry_after() {
        let res = AppError::TooManyRequests("slow down".to_string(), Some(12)).into_response();
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(res.headers()[axum::http::header::RETRY_AFTER], "12");
    }
}
