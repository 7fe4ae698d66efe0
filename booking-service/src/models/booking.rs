use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub business_id: String,
    pub service_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    #[validate(length(min = 1, message = "business_id is required"))]
    pub business_id: String,
    #[validate(length(min = 1, message = "service_id is required"))]
    pub service_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl CreateBookingRequest {
    /// Checks the time window against `now`.
    pub fn check_window(&self, now: DateTime<Utc>) -> Result<(), &'static str> {
        if self.end_time <= self.start_time {
            return Err("end_time must be after start_time");
        }
        if self.start_time < now {
            return Err("cannot create a booking in the past");
        }
        Ok(())
    }

    pub fn into_booking(self, user_id: String) -> Booking {
        let now = Utc::now();
        Booking {
            id: Uuid::new_v4().to_string(),
            user_id,
            business_id: self.business_id,
            service_id: self.service_id,
            start_time: self.start_time,
            end_time: self.end_time,
            status: BookingStatus::Pending.as_str().to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn request(start: DateTime<Utc>, end: DateTime<Utc>) -> CreateBookingRequest {
        CreateBookingRequest {
            business_id: "ba-1".to_string(),
            service_id: "svc-1".to_string(),
            start_time: start,
            end_time: end,
        }
    }

    #[test]
    fn window_checks() {
        let now = Utc::now();
        let later = now + Duration::hours(2);

        assert!(request(later, later + Duration::hours(1)).check_window(now).is_ok());
        assert!(request(later, later).check_window(now).is_err());
        assert!(request(later, now + Duration::hours(1)).check_window(now).is_err());
        assert!(request(now - Duration::hours(1), later).check_window(now).is_err());
    }

    #[test]
    fn new_bookings_are_pending() {
        let now = Utc::now() + Duration::hours(1);
        let booking = request(now, now + Duration::hours(1)).into_booking("u-1".to_string());
        assert_eq!(booking.status, "pending");
        assert_eq!(booking.user_id, "u-1");
    }
}
