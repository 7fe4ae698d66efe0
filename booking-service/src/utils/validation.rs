use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use service_core::error::{AppError, ErrorCode};
use validator::Validate;

/// JSON body extractor that also runs `validator` rules. Parse failures are
/// 400 `INVALID_REQUEST`, rule violations 422 `VALIDATION_ERROR`.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            AppError::bad_request(
                ErrorCode::InvalidRequest,
                format!("Invalid request body: {}", e.body_text()),
            )
        })?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}
