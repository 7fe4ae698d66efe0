//! Google login endpoints.

use axum::{
    extract::{Query, State},
    response::Redirect,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use service_core::error::AppError;
use utoipa::IntoParams;

use crate::{
    dtos::{AccessTokenResponse, ErrorResponse},
    AppState,
};

pub const OAUTH_STATE_COOKIE: &str = "oauth_state";
const OAUTH_COOKIE_PATH: &str = "/api";

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GoogleCallbackQuery {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub code: String,
}

/// Redirect to Google's consent screen
#[utoipa::path(
    post,
    path = "/api/google-login",
    responses(
        (status = 307, description = "Redirect to Google with a fresh state nonce"),
        (status = 429, description = "Too many login attempts", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn google_login(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let redirect = state.login.begin_login();

    let cookie = Cookie::build((OAUTH_STATE_COOKIE, redirect.nonce))
        .path(OAUTH_COOKIE_PATH)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(5))
        .build();

    (jar.add(cookie), Redirect::temporary(&redirect.url))
}

/// Complete the Google login and issue a session token
#[utoipa::path(
    post,
    path = "/api/google-callback",
    params(GoogleCallbackQuery),
    responses(
        (status = 200, description = "Login successful", body = AccessTokenResponse),
        (status = 400, description = "Invalid state or email", body = ErrorResponse),
        (status = 500, description = "Provider exchange, user lookup or token issuance failed", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn google_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<GoogleCallbackQuery>,
) -> Result<(CookieJar, Json<AccessTokenResponse>), AppError> {
    let issued_nonce = jar.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_string());

    let access_token = state
        .login
        .complete_login(issued_nonce.as_deref(), &query.state, &query.code)
        .await?;

    let mut removal = Cookie::from(OAUTH_STATE_COOKIE);
    removal.set_path(OAUTH_COOKIE_PATH);

    Ok((jar.remove(removal), Json(AccessTokenResponse { access_token })))
}
