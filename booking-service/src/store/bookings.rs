use async_trait::async_trait;

use super::{BookingStore, StoreError};
use crate::db::Database;
use crate::models::Booking;

#[async_trait]
impl BookingStore for Database {
    async fn create_booking(&self, booking: &Booking) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO bookings (id, user_id, business_id, service_id, start_time, end_time,
                                   status, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(&booking.id)
        .bind(&booking.user_id)
        .bind(&booking.business_id)
        .bind(&booking.service_id)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(&booking.status)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.write)
        .await
        .map_err(|e| StoreError::from_write("booking", e))?;
        Ok(())
    }

    async fn get_booking(&self, id: &str) -> Result<Booking, StoreError> {
        sqlx::query_as::<_, Booking>(
            "SELECT id, user_id, business_id, service_id, start_time, end_time, status,
                    created_at, updated_at
             FROM bookings WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.read)
        .await?
        .ok_or(StoreError::NotFound("booking"))
    }
}
