use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body as rendered by `AppError`; documented here for the OpenAPI schema.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[serde(rename = "Message")]
    #[schema(example = "Invalid or expired token")]
    pub message: String,
    #[serde(rename = "Type")]
    #[schema(example = "ERROR")]
    pub kind: String,
    #[serde(rename = "Code")]
    #[schema(example = "INVALID_TOKEN_ERR")]
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccessTokenResponse {
    pub access_token: String,
}
