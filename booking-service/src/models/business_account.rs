use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A business listed on the platform. Ownership lives in a separate relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusinessAccount {
    pub id: String,
    pub name: String,
    pub business_type: String,
    pub location: String,
    #[schema(value_type = Object)]
    pub links: Option<serde_json::Value>,
    pub created_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBusinessAccountRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub business_type: String,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    #[schema(value_type = Object)]
    pub links: Option<serde_json::Value>,
}

impl CreateBusinessAccountRequest {
    pub fn into_account(self) -> BusinessAccount {
        BusinessAccount {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            business_type: self.business_type,
            location: self.location,
            links: self.links,
            created_utc: Utc::now(),
        }
    }
}

/// Full replacement of a business account; `id` must match the path.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBusinessAccountRequest {
    pub id: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub business_type: String,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    #[schema(value_type = Object)]
    pub links: Option<serde_json::Value>,
}
