use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use service_core::error::{AppError, ErrorCode};

use crate::{
    dtos::ErrorResponse,
    middleware::AuthUser,
    models::{Booking, CreateBookingRequest},
    services::{ensure_business_owner, AuthzError},
    utils::ValidatedJson,
    AppState,
};

/// Book a service for the authenticated user
#[utoipa::path(
    post,
    path = "/api/booking",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created with status pending", body = Booking),
        (status = 400, description = "Invalid time window or service", body = ErrorResponse),
        (status = 404, description = "Service not found", body = ErrorResponse)
    ),
    tag = "Bookings",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %user.subject_id))]
pub async fn create_booking(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    req.check_window(Utc::now())
        .map_err(|msg| AppError::bad_request(ErrorCode::InvalidRequest, msg))?;

    let service = state.services.get_service(&req.service_id).await?;
    if service.business_account_id != req.business_id || !service.is_active {
        return Err(AppError::bad_request(
            ErrorCode::InvalidRequest,
            "Service is not offered by this business",
        ));
    }

    let booking = req.into_booking(user.subject_id);
    state.bookings.create_booking(&booking).await?;

    tracing::info!(booking_id = %booking.id, "Booking created");
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Get a booking. Visible to the booking user and the business owner.
#[utoipa::path(
    get,
    path = "/api/booking/{id}",
    params(("id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking", body = Booking),
        (status = 403, description = "Not your booking", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Bookings",
    security(("bearer_auth" = []))
)]
pub async fn get_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let booking = state.bookings.get_booking(&id).await?;

    if booking.user_id != user.subject_id {
        ensure_business_owner(
            state.business_accounts.as_ref(),
            &user.subject_id,
            &booking.business_id,
        )
        .await
        .map_err(|e| match e {
            AuthzError::Forbidden { .. } => {
                AppError::forbidden("You are not allowed to view this booking")
            }
            other => other.into(),
        })?;
    }

    Ok(Json(booking))
}
