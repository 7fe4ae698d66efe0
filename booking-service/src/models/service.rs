//! Services offered by a business account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Service {
    pub id: String,
    pub business_account_id: String,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub price: f64,
    pub currency: String,
    pub category: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateServiceRequest {
    #[validate(length(min = 1, message = "business_account_id is required"))]
    pub business_account_id: String,
    #[validate(length(min = 1, max = 200, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "duration_minutes must be positive"))]
    pub duration_minutes: i32,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
    #[validate(length(equal = 3, message = "currency must be a 3-letter code"))]
    pub currency: Option<String>,
    pub category: Option<String>,
}

impl CreateServiceRequest {
    pub fn into_service(self) -> Service {
        let now = Utc::now();
        Service {
            id: Uuid::new_v4().to_string(),
            business_account_id: self.business_account_id,
            name: self.name,
            description: self.description,
            duration_minutes: self.duration_minutes,
            price: self.price,
            currency: self
                .currency
                .map(|c| c.to_uppercase())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            category: self.category,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateServiceRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub duration_minutes: Option<i32>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(length(equal = 3))]
    pub currency: Option<String>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateServiceRequest {
    pub fn apply_to(&self, service: &mut Service, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            service.name = name.clone();
        }
        if let Some(description) = &self.description {
            service.description = Some(description.clone());
        }
        if let Some(duration) = self.duration_minutes {
            service.duration_minutes = duration;
        }
        if let Some(price) = self.price {
            service.price = price;
        }
        if let Some(currency) = &self.currency {
            service.currency = currency.to_uppercase();
        }
        if let Some(category) = &self.category {
            service.category = Some(category.clone());
        }
        if let Some(is_active) = self.is_active {
            service.is_active = is_active;
        }
        service.updated_at = now;
    }
}

/// Raw query string of `GET /api/services`. Unparseable values are ignored.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListServicesQuery {
    pub business_account_id: Option<String>,
    pub category: Option<String>,
    pub is_active: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceFilter {
    pub business_account_id: Option<String>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
    pub limit: i64,
    pub offset: i64,
}

impl Default for ServiceFilter {
    fn default() -> Self {
        Self {
            business_account_id: None,
            category: None,
            is_active: None,
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl ServiceFilter {
    pub fn from_query(query: ListServicesQuery) -> Result<Self, String> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let limit = match non_empty(query.limit).map(|v| v.parse::<i64>()) {
            Some(Ok(limit)) => limit,
            _ => DEFAULT_PAGE_SIZE,
        };
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(format!("limit must be between 1 and {}", MAX_PAGE_SIZE));
        }

        let offset = match non_empty(query.offset).map(|v| v.parse::<i64>()) {
            Some(Ok(offset)) => offset,
            _ => 0,
        };
        if offset < 0 {
            return Err("offset must not be negative".to_string());
        }

        Ok(Self {
            business_account_id: non_empty(query.business_account_id),
            category: non_empty(query.category),
            is_active: non_empty(query.is_active).and_then(|v| v.parse().ok()),
            limit,
            offset,
        })
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ServicePage {
    pub services: Vec<Service>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}
