use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::{AppError, ErrorCode};

use crate::{
    dtos::ErrorResponse,
    middleware::AuthUser,
    models::{UpdateUserRequest, User},
    services::ensure_self,
    utils::ValidatedJson,
    AppState,
};

/// Get the authenticated user's account
#[utoipa::path(
    get,
    path = "/api/user-account",
    responses(
        (status = 200, description = "Own account", body = User),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "User Account",
    security(("bearer_auth" = []))
)]
pub async fn get_user_account(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<User>, AppError> {
    let account = state.users.get_user(&user.subject_id).await?;
    Ok(Json(account))
}

/// Update own account. The email address cannot be changed.
#[utoipa::path(
    put,
    path = "/api/user-account/{id}",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated account", body = User),
        (status = 400, description = "Email change attempted", body = ErrorResponse),
        (status = 403, description = "Not your account", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "User Account",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %user.subject_id))]
pub async fn update_user_account(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    body: Result<ValidatedJson<UpdateUserRequest>, AppError>,
) -> Result<Json<User>, AppError> {
    // Identity is checked before the body is looked at.
    ensure_self(&user.subject_id, &id)?;
    let ValidatedJson(req) = body?;

    let mut account = state.users.get_user(&id).await?;

    if let Some(email) = &req.email {
        if email != &account.email {
            return Err(AppError::bad_request(
                ErrorCode::InvalidEmailErr,
                "Email is not allowed to be changed",
            ));
        }
    }

    account.apply(req);
    state.users.update_user(&account).await?;

    tracing::info!("User account updated");
    Ok(Json(account))
}

/// Delete own account
#[utoipa::path(
    delete,
    path = "/api/user-account/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 403, description = "Not your account", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "User Account",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %user.subject_id))]
pub async fn delete_user_account(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    ensure_self(&user.subject_id, &id)?;

    state.users.delete_user(&id).await?;

    tracing::info!("User account deleted");
    Ok(StatusCode::NO_CONTENT)
}
