use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Postgres, QueryBuilder};

use super::{ServiceStore, StoreError};
use crate::db::Database;
use crate::models::{Service, ServiceFilter, ServicePage, UpdateServiceRequest};

const SERVICE_COLUMNS: &str = "id, business_account_id, name, description, duration_minutes, \
     price, currency, category, is_active, created_at, updated_at";

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &ServiceFilter) {
    if let Some(id) = &filter.business_account_id {
        qb.push(" AND business_account_id = ").push_bind(id.clone());
    }
    if let Some(category) = &filter.category {
        qb.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(is_active) = filter.is_active {
        qb.push(" AND is_active = ").push_bind(is_active);
    }
}

#[async_trait]
impl ServiceStore for Database {
    async fn create_service(&self, service: &Service) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO services (id, business_account_id, name, description, duration_minutes,
                                   price, currency, category, is_active, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(&service.id)
        .bind(&service.business_account_id)
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.duration_minutes)
        .bind(service.price)
        .bind(&service.currency)
        .bind(&service.category)
        .bind(service.is_active)
        .bind(service.created_at)
        .bind(service.updated_at)
        .execute(&self.write)
        .await
        .map_err(|e| StoreError::from_write("service", e))?;
        Ok(())
    }

    async fn get_service(&self, id: &str) -> Result<Service, StoreError> {
        sqlx::query_as::<_, Service>(&format!("SELECT {SERVICE_COLUMNS} FROM services WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.read)
            .await?
            .ok_or(StoreError::NotFound("service"))
    }

    async fn update_service(
        &self,
        id: &str,
        update: &UpdateServiceRequest,
    ) -> Result<Service, StoreError> {
        sqlx::query_as::<_, Service>(&format!(
            "UPDATE services SET
                name = COALESCE($1, name),
                description = COALESCE($2, description),
                duration_minutes = COALESCE($3, duration_minutes),
                price = COALESCE($4, price),
                currency = COALESCE(UPPER($5), currency),
                category = COALESCE($6, category),
                is_active = COALESCE($7, is_active),
                updated_at = $8
             WHERE id = $9
             RETURNING {SERVICE_COLUMNS}"
        ))
        .bind(&update.name)
        .bind(&update.description)
        .bind(update.duration_minutes)
        .bind(update.price)
        .bind(&update.currency)
        .bind(&update.category)
        .bind(update.is_active)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.write)
        .await?
        .ok_or(StoreError::NotFound("service"))
    }

    async fn delete_service(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(&self.write)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("service"));
        }
        Ok(())
    }

    async fn list_services(&self, filter: &ServiceFilter) -> Result<ServicePage, StoreError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM services WHERE 1 = 1");
        push_filters(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.read).await?;

        let mut page = QueryBuilder::<Postgres>::new(format!(
            "SELECT {SERVICE_COLUMNS} FROM services WHERE 1 = 1"
        ));
        push_filters(&mut page, filter);
        page.push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);

        let services = page
            .build_query_as::<Service>()
            .fetch_all(&self.read)
            .await?;

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
        let services = sqlx::query_as::<_, Service>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM services
             WHERE business_account_id = $1 AND is_active = TRUE
             ORDER BY name"
        ))
        .bind(business_account_id)
        .fetch_all(&self.read)
        .await?;

        Ok(services)
    }
}
