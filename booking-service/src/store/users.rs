use async_trait::async_trait;

use super::{StoreError, UserStore};
use crate::db::Database;
use crate::models::User;

const USER_COLUMNS: &str = "id, username, first_name, last_name, email, phone, created_utc";

#[async_trait]
impl UserStore for Database {
    async fn create_user(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO users (id, username, first_name, last_name, email, phone, created_utc)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(user.created_utc)
        .execute(&self.write)
        .await
        .map_err(|e| StoreError::from_write("user", e))?;
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(&self.read)
            .await?
            .ok_or(StoreError::NotFound("user"))
    }

    async fn get_user_id_by_email(&self, email: &str) -> Result<String, StoreError> {
        sqlx::query_scalar::<_, String>("SELECT id FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.read)
            .await?
            .ok_or(StoreError::NotFound("user"))
    }

    async fn update_user(&self, user: &User) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE users SET username = $1, first_name = $2, last_name = $3, phone = $4
             WHERE id = $5",
        )
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .bind(&user.id)
        .execute(&self.write)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("user"));
        }
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.write)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("user"));
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.read).await?;
        Ok(())
    }
}
