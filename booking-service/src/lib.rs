pub mod config;
pub mod db;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use service_core::middleware::{
    metrics::metrics_middleware,
    rate_limit::{create_ip_rate_limiter, ip_rate_limit_middleware, IpRateLimiter},
    security_headers::security_headers_middleware,
    tracing::{request_id_middleware, REQUEST_ID_HEADER},
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{openapi::security::SecurityScheme, Modify, OpenApi};

use crate::config::BookingConfig;
use crate::services::{IdentityProvider, LoginFlow, StateNonce, TokenCodec};
use crate::store::{BookingStore, BusinessAccountStore, ServiceStore, UserStore};

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        handlers::auth::google_login,
        handlers::auth::google_callback,
        handlers::user_account::get_user_account,
        handlers::user_account::update_user_account,
        handlers::user_account::delete_user_account,
        handlers::business_account::create_business_account,
        handlers::business_account::get_business_account,
        handlers::business_account::update_business_account,
        handlers::business_account::delete_business_account,
        handlers::services::create_service,
        handlers::services::list_services,
        handlers::services::get_service,
        handlers::services::update_service,
        handlers::services::delete_service,
        handlers::services::get_services_by_business_account,
        handlers::bookings::create_booking,
        handlers::bookings::get_booking,
        handlers::specialists::search_specialists,
    ),
    components(
        schemas(
            dtos::ErrorResponse,
            dtos::AccessTokenResponse,
            models::User,
            models::UpdateUserRequest,
            models::BusinessAccount,
            models::CreateBusinessAccountRequest,
            models::UpdateBusinessAccountRequest,
            models::Service,
            models::CreateServiceRequest,
            models::UpdateServiceRequest,
            models::ServicePage,
            models::Booking,
            models::BookingStatus,
            models::CreateBookingRequest,
            models::AreaType,
            models::SpecialistSearchResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Google login and session tokens"),
        (name = "User Account", description = "Self-service account management"),
        (name = "Business Account", description = "Business accounts and ownership"),
        (name = "Services", description = "Services offered by business accounts"),
        (name = "Bookings", description = "Bookings of services"),
        (name = "Specialists", description = "Specialist search"),
        (name = "Observability", description = "Service health and monitoring"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<BookingConfig>,
    pub tokens: TokenCodec,
    pub login: LoginFlow,
    pub users: Arc<dyn UserStore>,
    pub business_accounts: Arc<dyn BusinessAccountStore>,
    pub services: Arc<dyn ServiceStore>,
    pub bookings: Arc<dyn BookingStore>,
    pub login_rate_limiter: IpRateLimiter,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Wires every component from one configuration and one store backing
    /// all storage traits.
    pub fn new<S>(config: BookingConfig, provider: Arc<dyn IdentityProvider>, store: Arc<S>) -> Self
    where
        S: UserStore + BusinessAccountStore + ServiceStore + BookingStore + 'static,
    {
        let tokens = TokenCodec::from_config(&config.jwt);
        let users: Arc<dyn UserStore> = store.clone();

        let login = LoginFlow::new(
            provider,
            users.clone(),
            tokens.clone(),
            StateNonce::from_config(config.google.static_state.clone()),
            config.login.first_login_policy,
        );

        let login_rate_limiter = create_ip_rate_limiter(
            config.rate_limit.login_attempts,
            config.rate_limit.login_window_seconds,
        );

        Self {
            config: Arc::new(config),
            tokens,
            login,
            users,
            business_accounts: store.clone(),
            services: store.clone(),
            bookings: store,
            login_rate_limiter,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

pub fn build_router(state: AppState) -> Router {
    let login_routes = Router::new()
        .route("/api/google-login", post(handlers::auth::google_login))
        .route(
            "/api/google-callback",
            get(handlers::auth::google_callback).post(handlers::auth::google_callback),
        )
        .layer(from_fn_with_state(
            state.login_rate_limiter.clone(),
            ip_rate_limit_middleware,
        ));

    let protected_routes = Router::new()
        .route(
            "/api/user-account",
            get(handlers::user_account::get_user_account),
        )
        .route(
            "/api/user-account/:id",
            put(handlers::user_account::update_user_account)
                .delete(handlers::user_account::delete_user_account),
        )
        .route(
            "/api/business-account",
            post(handlers::business_account::create_business_account),
        )
        .route(
            "/api/business-account/:id",
            get(handlers::business_account::get_business_account)
                .put(handlers::business_account::update_business_account)
                .delete(handlers::business_account::delete_business_account),
        )
        .route(
            "/api/services",
            get(handlers::services::list_services).post(handlers::services::create_service),
        )
        .route(
            "/api/services/:id",
            get(handlers::services::get_service)
                .put(handlers::services::update_service)
                .delete(handlers::services::delete_service),
        )
        .route(
            "/api/services/business-account/:business_account_id",
            get(handlers::services::get_services_by_business_account),
        )
        .route("/api/booking", post(handlers::bookings::create_booking))
        .route("/api/booking/:id", get(handlers::bookings::get_booking))
        .route(
            "/api/specialists",
            get(handlers::specialists::search_specialists),
        )
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    let cors = cors_layer(&state.config.security.allowed_origins);

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(handlers::metrics::metrics))
        .route("/api/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(login_routes)
        .merge(protected_routes)
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            },
        ))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if allowed_origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Invalid CORS origin '{}': {}. Skipping.", o, e);
                None
            }
        })
        .collect();

    cors.allow_origin(origins)
}

/// Service health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
        (status = 503, description = "Service is unhealthy")
    ),
    tag = "Observability"
)]
pub async fn health_check(State(state): State<AppState>) -> Response {
    let database = match state.users.health_check().await {
        Ok(()) => "up",
        Err(e) => {
            tracing::error!(error = %e, "Database health check failed");
            "down"
        }
    };

    let status = if database == "up" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = Json(serde_json::json!({
        "status": if status == StatusCode::OK { "healthy" } else { "unhealthy" },
        "service": state.config.service_name,
        "version": state.config.service_version,
        "environment": format!("{:?}", state.config.environment),
        "checks": {
            "database": database,
        }
    }));

    (status, body).into_response()
}
