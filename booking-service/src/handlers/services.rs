//! Services offered by business accounts. Mutations require ownership of the
//! parent business account.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use service_core::error::{AppError, ErrorCode};

use crate::{
    dtos::ErrorResponse,
    middleware::AuthUser,
    models::{
        CreateServiceRequest, ListServicesQuery, Service, ServiceFilter, ServicePage,
        UpdateServiceRequest,
    },
    services::ensure_business_owner,
    utils::ValidatedJson,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/services",
    request_body = CreateServiceRequest,
    responses(
        (status = 201, description = "Service created", body = Service),
        (status = 403, description = "Caller does not own the business account", body = ErrorResponse),
        (status = 404, description = "Business account not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Services",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %user.subject_id))]
pub async fn create_service(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateServiceRequest>,
) -> Result<(StatusCode, Json<Service>), AppError> {
    state
        .business_accounts
        .get_business_account(&req.business_account_id)
        .await?;
    ensure_business_owner(
        state.business_accounts.as_ref(),
        &user.subject_id,
        &req.business_account_id,
    )
    .await?;

    let service = req.into_service();
    state.services.create_service(&service).await?;

    tracing::info!(service_id = %service.id, "Service created");
    Ok((StatusCode::CREATED, Json(service)))
}

#[utoipa::path(
    get,
    path = "/api/services",
    params(ListServicesQuery),
    responses(
        (status = 200, description = "Page of services", body = ServicePage),
        (status = 400, description = "Invalid pagination", body = ErrorResponse)
    ),
    tag = "Services",
    security(("bearer_auth" = []))
)]
pub async fn list_services(
    State(state): State<AppState>,
    Query(query): Query<ListServicesQuery>,
) -> Result<Json<ServicePage>, AppError> {
    let filter = ServiceFilter::from_query(query)
        .map_err(|msg| AppError::bad_request(ErrorCode::InvalidQueries, msg))?;

    let page = state.services.list_services(&filter).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/services/{id}",
    params(("id" = String, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service", body = Service),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Services",
    security(("bearer_auth" = []))
)]
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Service>, AppError> {
    Ok(Json(state.services.get_service(&id).await?))
}

#[utoipa::path(
    put,
    path = "/api/services/{id}",
    params(("id" = String, Path, description = "Service ID")),
    request_body = UpdateServiceRequest,
    responses(
        (status = 200, description = "Updated service", body = Service),
        (status = 403, description = "Caller does not own the business account", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Services",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %user.subject_id, service_id = %id))]
pub async fn update_service(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    body: Result<ValidatedJson<UpdateServiceRequest>, AppError>,
) -> Result<Json<Service>, AppError> {
    let existing = state.services.get_service(&id).await?;
    ensure_business_owner(
        state.business_accounts.as_ref(),
        &user.subject_id,
        &existing.business_account_id,
    )
    .await?;
    let ValidatedJson(req) = body?;

    let service = state.services.update_service(&id, &req).await?;

    tracing::info!("Service updated");
    Ok(Json(service))
}

#[utoipa::path(
    delete,
    path = "/api/services/{id}",
    params(("id" = String, Path, description = "Service ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Caller does not own the business account", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Services",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %user.subject_id, service_id = %id))]
pub async fn delete_service(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let existing = state.services.get_service(&id).await?;
    ensure_business_owner(
        state.business_accounts.as_ref(),
        &user.subject_id,
        &existing.business_account_id,
    )
    .await?;

    state.services.delete_service(&id).await?;

    tracing::info!("Service deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Active services of a business account
#[utoipa::path(
    get,
    path = "/api/services/business-account/{business_account_id}",
    params(("business_account_id" = String, Path, description = "Business account ID")),
    responses(
        (status = 200, description = "Services ordered by name", body = [Service])
    ),
    tag = "Services",
    security(("bearer_auth" = []))
)]
pub async fn get_services_by_business_account(
    State(state): State<AppState>,
    Path(business_account_id): Path<String>,
) -> Result<Json<Vec<Service>>, AppError> {
    let services = state
        .services
        .get_services_by_business_account(&business_account_id)
        .await?;
    Ok(Json(services))
}
