use async_trait::async_trait;

use super::{BusinessAccountStore, StoreError};
use crate::db::Database;
use crate::models::BusinessAccount;

#[async_trait]
impl BusinessAccountStore for Database {
    async fn create_business_account(
        &self,
        account: &BusinessAccount,
        owner_id: &str,
    ) -> Result<(), StoreError> {
        let mut tx = self.write.begin().await?;

        sqlx::query(
            "INSERT INTO business_accounts (id, name, business_type, location, links, created_utc)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&account.id)
        .bind(&account.name)
        .bind(&account.business_type)
        .bind(&account.location)
        .bind(&account.links)
        .bind(account.created_utc)
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::from_write("business account", e))?;

        sqlx::query(
            "INSERT INTO user_business_accounts (business_account_id, user_id) VALUES ($1, $2)",
        )
        .bind(&account.id)
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn get_business_account(&self, id: &str) -> Result<BusinessAccount, StoreError> {
        sqlx::query_as::<_, BusinessAccount>(
            "SELECT id, name, business_type, location, links, created_utc
             FROM business_accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.read)
        .await?
        .ok_or(StoreError::NotFound("business account"))
    }

    async fn update_business_account(&self, account: &BusinessAccount) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE business_accounts SET name = $1, business_type = $2, location = $3, links = $4
             WHERE id = $5",
        )
        .bind(&account.name)
        .bind(&account.business_type)
        .bind(&account.location)
        .bind(&account.links)
        .bind(&account.id)
        .execute(&self.write)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("business account"));
        }
        Ok(())
    }

    async fn delete_business_account(&self, id: &str) -> Result<(), StoreError> {
        let mut tx = self.write.begin().await?;

        sqlx::query("DELETE FROM user_business_accounts WHERE business_account_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM business_accounts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::NotFound("business account"));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn is_owner(&self, resource_id: &str, subject_id: &str) -> Result<bool, StoreError> {
        let owned = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM user_business_accounts
                WHERE business_account_id = $1 AND user_id = $2
             )",
        )
        .bind(resource_id)
        .bind(subject_id)
        .fetch_one(&self.read)
        .await?;

        Ok(owned)
    }
}
