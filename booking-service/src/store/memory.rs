//! Process-local store used by tests and database-less local runs.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::{BookingStore, BusinessAccountStore, ServiceStore, StoreError, UserStore};
use crate::models::{
    Booking, BusinessAccount, Service, ServiceFilter, ServicePage, UpdateServiceRequest, User,
};

#[derive(Default)]
struct Tables {
    users: HashMap<String, User>,
    business_accounts: HashMap<String, BusinessAccount>,
    /// (business_account_id, user_id)
    owners: HashSet<(String, String)>,
    services: HashMap<String, Service>,
    bookings: HashMap<String, Booking>,
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every operation fails as if the database were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner()))
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create_user(&self, user: &User) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("user"));
        }
        tables.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<User, StoreError> {
        self.tables()?
            .users
            .get(user_id)
            .cloned()
            .ok_or(StoreError::NotFound("user"))
    }

    async fn get_user_id_by_email(&self, email: &str) -> Result<String, StoreError> {
        self.tables()?
            .users
            .values()
            .find(|u| u.email == email)
            .map(|u| u.id.clone())
            .ok_or(StoreError::NotFound("user"))
    }

    async fn update_user(&self, user: &User) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        let stored = tables
            .users
            .get_mut(&user.id)
            .ok_or(StoreError::NotFound("user"))?;
        let email = stored.email.clone();
        *stored = User {
            email,
            ..user.clone()
        };
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        tables
            .users
            .remove(user_id)
            .ok_or(StoreError::NotFound("user"))?;
        tables.owners.retain(|(_, owner)| owner != user_id);
        tables.bookings.retain(|_, b| b.user_id != user_id);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.tables().map(|_| ())
    }
}

#[async_trait]
impl BusinessAccountStore for InMemoryStore {
    async fn create_business_account(
        &self,
        account: &BusinessAccount,
        owner_id: &str,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        if tables.business_accounts.contains_key(&account.id) {
            return Err(StoreError::Conflict("business account"));
        }
        tables
            .business_accounts
            .insert(account.id.clone(), account.clone());
        tables
            .owners
            .insert((account.id.clone(), owner_id.to_string()));
        Ok(())
    }

    async fn get_business_account(&self, id: &str) -> Result<BusinessAccount, StoreError> {
        self.tables()?
            .business_accounts
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound("business account"))
    }

    async fn update_business_account(&self, account: &BusinessAccount) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        let stored = tables
            .business_accounts
            .get_mut(&account.id)
            .ok_or(StoreError::NotFound("business account"))?;
        let created_utc = stored.created_utc;
        *stored = BusinessAccount {
            created_utc,
            ..account.clone()
        };
        Ok(())
    }

    async fn delete_business_account(&self, id: &str) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        tables
            .business_accounts
            .remove(id)
            .ok_or(StoreError::NotFound("business account"))?;
        tables.owners.retain(|(account, _)| account != id);
        tables.services.retain(|_, s| s.business_account_id != id);
        tables.bookings.retain(|_, b| b.business_id != id);
        Ok(())
    }

    async fn is_owner(&self, resource_id: &str, subject_id: &str) -> Result<bool, StoreError> {
        Ok(self
            .tables()?
            .owners
            .contains(&(resource_id.to_string(), subject_id.to_string())))
    }
}

#[async_trait]
impl ServiceStore for InMemoryStore {
    async fn create_service(&self, service: &Service) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        if tables.services.contains_key(&service.id) {
            return Err(StoreError::Conflict("service"));
        }
        tables.services.insert(service.id.clone(), service.clone());
        Ok(())
    }

    async fn get_service(&self, id: &str) -> Result<Service, StoreError> {
        self.tables()?
            .services
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound("service"))
    }

    async fn update_service(
        &self,
        id: &str,
        update: &UpdateServiceRequest,
    ) -> Result<Service, StoreError> {
        let mut tables = self.tables()?;
        let service = tables
            .services
            .get_mut(id)
            .ok_or(StoreError::NotFound("service"))?;
        update.apply_to(service, Utc::now());
        Ok(service.clone())
    }

    async fn delete_service(&self, id: &str) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        tables
            .services
            .remove(id)
            .ok_or(StoreError::NotFound("service"))?;
        tables.bookings.retain(|_, b| b.service_id != id);
        Ok(())
    }

    async fn list_services(&self, filter: &ServiceFilter) -> Result<ServicePage, StoreError> {
        let tables = self.tables()?;
        let mut matching: Vec<Service> = tables
            .services
            .values()
            .filter(|s| {
                filter
                    .business_account_id
                    .as_ref()
                    .map_or(true, |id| &s.business_account_id == id)
                    && filter
                        .category
                        .as_ref()
                        .map_or(true, |c| s.category.as_ref() == Some(c))
                    && filter.is_active.map_or(true, |active| s.is_active == active)
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as i64;
        let services = matching
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .collect();

        Ok(ServicePage {
            services,
            total,
            limit: filter.limit,
            offset: filter.offset,
        })
    }

    async fn get_services_by_business_account(
        &self,
        business_account_id: &str,
    ) -> Result<Vec<Service>, StoreError> {
        let tables = self.tables()?;
        let mut services: Vec<Service> = tables
            .services
            .values()
            .filter(|s| s.business_account_id == business_account_id && s.is_active)
            .cloned()
            .collect();
        services.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(services)
    }
}

#[async_trait]
impl BookingStore for InMemoryStore {
    async fn create_booking(&self, booking: &Booking) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        if tables.bookings.contains_key(&booking.id) {
            return Err(StoreError::Conflict("booking"));
        }
        tables.bookings.insert(booking.id.clone(), booking.clone());
        Ok(())
    }

    async fn get_booking(&self, id: &str) -> Result<Booking, StoreError> {
        self.tables()?
            .bookings
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound("booking"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: &str) -> BusinessAccount {
        BusinessAccount {
            id: id.to_string(),
            name: "Studio".to_string(),
            business_type: "makeup".to_string(),
            location: "Lisbon".to_string(),
            links: None,
            created_utc: Utc::now(),
        }
    }

    #[tokio::test]
    async fn ownership_follows_creation_and_deletion() {
        let store = InMemoryStore::new();
        store
            .create_business_account(&account("ba-1"), "u-1")
            .await
            .unwrap();

        assert!(store.is_owner("ba-1", "u-1").await.unwrap());
        assert!(!store.is_owner("ba-1", "u-2").await.unwrap());

        store.delete_business_account("ba-1").await.unwrap();
        assert!(!store.is_owner("ba-1", "u-1").await.unwrap());
        assert!(matches!(
            store.delete_business_account("ba-1").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn email_lookup_and_uniqueness() {
        let store = InMemoryStore::new();
        let user = User::new(
            "jane".to_string(),
            "Jane".to_string(),
            "Doe".to_string(),
            "jane@example.com".to_string(),
        );
        store.create_user(&user).await.unwrap();

        assert_eq!(
            store.get_user_id_by_email("jane@example.com").await.unwrap(),
            user.id
        );
        assert!(matches!(
            store.get_user_id_by_email("nobody@example.com").await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.create_user(&user).await,
            Err(StoreError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let store = InMemoryStore::new();
        store.set_unavailable(true);
        assert!(matches!(
            store.is_owner("ba-1", "u-1").await,
            Err(StoreError::Database(_))
        ));
        assert!(store.health_check().await.is_err());
    }
}
