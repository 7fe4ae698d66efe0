//! Storage collaborators. Each trait has a Postgres implementation on
//! [`Database`](crate::db::Database) and one on [`InMemoryStore`].

mod bookings;
mod business_accounts;
pub mod memory;
mod services;
mod users;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Booking, BusinessAccount, Service, ServiceFilter, ServicePage, UpdateServiceRequest, User};

pub use memory::InMemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0} already exists")]
    Conflict(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Maps unique violations to `Conflict`, everything else passes through.
    pub(crate) fn from_write(entity: &'static str, err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict(entity),
            _ => StoreError::Database(err),
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, user: &User) -> Result<(), StoreError>;
    async fn get_user(&self, user_id: &str) -> Result<User, StoreError>;
    async fn get_user_id_by_email(&self, email: &str) -> Result<String, StoreError>;
    async fn update_user(&self, user: &User) -> Result<(), StoreError>;
    async fn delete_user(&self, user_id: &str) -> Result<(), StoreError>;
    async fn health_check(&self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait BusinessAccountStore: Send + Sync {
    /// Inserts the account and its ownership row atomically.
    async fn create_business_account(
        &self,
        account: &BusinessAccount,
        owner_id: &str,
    ) -> Result<(), StoreError>;
    async fn get_business_account(&self, id: &str) -> Result<BusinessAccount, StoreError>;
    async fn update_business_account(&self, account: &BusinessAccount) -> Result<(), StoreError>;
    async fn delete_business_account(&self, id: &str) -> Result<(), StoreError>;
    /// True iff an ownership row links `subject_id` to `resource_id`.
    async fn is_owner(&self, resource_id: &str, subject_id: &str) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait ServiceStore: Send + Sync {
    async fn create_service(&self, service: &Service) -> Result<(), StoreError>;
    async fn get_service(&self, id: &str) -> Result<Service, StoreError>;
    async fn update_service(
        &self,
        id: &str,
        update: &UpdateServiceRequest,
    ) -> Result<Service, StoreError>;
    async fn delete_service(&self, id: &str) -> Result<(), StoreError>;
    async fn list_services(&self, filter: &ServiceFilter) -> Result<ServicePage, StoreError>;
    /// Active services of one business account, ordered by name.
    async fn get_services_by_business_account(
        &self,
        business_account_id: &str,
    ) -> Result<Vec<Service>, StoreError>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn create_booking(&self, booking: &Booking) -> Result<(), StoreError>;
    async fn get_booking(&self, id: &str) -> Result<Booking, StoreError>;
}
