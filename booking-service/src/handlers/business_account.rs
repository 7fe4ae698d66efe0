use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::{AppError, ErrorCode};

use crate::{
    dtos::ErrorResponse,
    middleware::AuthUser,
    models::{BusinessAccount, CreateBusinessAccountRequest, UpdateBusinessAccountRequest},
    services::ensure_business_owner,
    utils::ValidatedJson,
    AppState,
};

/// Create a business account owned by the caller
#[utoipa::path(
    post,
    path = "/api/business-account",
    request_body = CreateBusinessAccountRequest,
    responses(
        (status = 201, description = "Business account created", body = BusinessAccount),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Business Account",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %user.subject_id))]
pub async fn create_business_account(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateBusinessAccountRequest>,
) -> Result<(StatusCode, Json<BusinessAccount>), AppError> {
    let account = req.into_account();

    state
        .business_accounts
        .create_business_account(&account, &user.subject_id)
        .await?;

    tracing::info!(business_account_id = %account.id, "Business account created");
    Ok((StatusCode::CREATED, Json(account)))
}

#[utoipa::path(
    get,
    path = "/api/business-account/{id}",
    params(("id" = String, Path, description = "Business account ID")),
    responses(
        (status = 200, description = "Business account", body = BusinessAccount),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Business Account",
    security(("bearer_auth" = []))
)]
pub async fn get_business_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BusinessAccount>, AppError> {
    let account = state.business_accounts.get_business_account(&id).await?;
    Ok(Json(account))
}

/// Replace a business account. Owner only.
#[utoipa::path(
    put,
    path = "/api/business-account/{id}",
    params(("id" = String, Path, description = "Business account ID")),
    request_body = UpdateBusinessAccountRequest,
    responses(
        (status = 200, description = "Updated", body = BusinessAccount),
        (status = 400, description = "Body id does not match path", body = ErrorResponse),
        (status = 403, description = "Caller does not own the account", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Business Account",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %user.subject_id))]
pub async fn update_business_account(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    body: Result<ValidatedJson<UpdateBusinessAccountRequest>, AppError>,
) -> Result<Json<BusinessAccount>, AppError> {
    ensure_business_owner(state.business_accounts.as_ref(), &user.subject_id, &id).await?;
    let ValidatedJson(req) = body?;

    if req.id != id {
        return Err(AppError::bad_request(
            ErrorCode::InvalidRequest,
            "ID does not match business account ID",
        ));
    }

    let existing = state.business_accounts.get_business_account(&id).await?;
    let account = BusinessAccount {
        id: existing.id,
        name: req.name,
        business_type: req.business_type,
        location: req.location,
        links: req.links,
        created_utc: existing.created_utc,
    };

    state
        .business_accounts
        .update_business_account(&account)
        .await?;

    tracing::info!("Business account updated");
    Ok(Json(account))
}

/// Delete a business account. Owner only.
#[utoipa::path(
    delete,
    path = "/api/business-account/{id}",
    params(("id" = String, Path, description = "Business account ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Caller does not own the account", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Business Account",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %user.subject_id))]
pub async fn delete_business_account(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    ensure_business_owner(state.business_accounts.as_ref(), &user.subject_id, &id).await?;

    state.business_accounts.delete_business_account(&id).await?;

    tracing::info!("Business account deleted");
    Ok(StatusCode::NO_CONTENT)
}
