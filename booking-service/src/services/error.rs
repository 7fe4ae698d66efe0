//! Conversions from component errors into the HTTP-facing `AppError`.
//! Client messages stay generic; detail is logged where the error arises.

use service_core::error::{AppError, ErrorCode};

use crate::services::authz::AuthzError;
use crate::services::login::LoginError;
use crate::store::StoreError;

impl From<LoginError> for AppError {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::InvalidState => {
                AppError::bad_request(ErrorCode::InvalidStateParameter, "Invalid state parameter")
            }
            LoginError::ExchangeFailed(e) => AppError::Internal(
                ErrorCode::ExchangeTokenErr,
                anyhow::Error::new(e).context("Failed to exchange token"),
            ),
            LoginError::ProfileFetchFailed(e) => AppError::Internal(
                ErrorCode::AuthUserInfoErr,
                anyhow::Error::new(e).context("Failed to get user info"),
            ),
            LoginError::InvalidEmail => {
                AppError::bad_request(ErrorCode::InvalidEmailErr, "Invalid email")
            }
            LoginError::UnknownUser(_) => AppError::Internal(
                ErrorCode::GetUserIdErr,
                anyhow::anyhow!("Failed to get user id"),
            ),
            LoginError::StoreError(e) => AppError::Internal(
                ErrorCode::UsersStoreErr,
                anyhow::Error::new(e).context("Failed to get user id"),
            ),
            LoginError::TokenIssuanceError(e) => AppError::Internal(
                ErrorCode::GenerateTokenErr,
                anyhow::Error::new(e).context("Failed to generate token"),
            ),
        }
    }
}

impl From<AuthzError> for AppError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::Forbidden { .. } => {
                AppError::forbidden("You are not allowed to act on this resource")
            }
            AuthzError::StoreError(e) => AppError::Internal(
                ErrorCode::InternalError,
                anyhow::Error::new(e).context("Failed to verify ownership"),
            ),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(entity) => AppError::not_found(format!("{} not found", entity)),
            StoreError::Conflict(entity) => {
                AppError::Conflict(anyhow::anyhow!("{} already exists", entity))
            }
            StoreError::Database(e) => AppError::DatabaseError(anyhow::Error::new(e)),
        }
    }
}
