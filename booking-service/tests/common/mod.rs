//! Shared setup for booking-service integration tests: the real router over
//! an in-memory store and a scripted identity provider.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use booking_service::{
    build_router,
    config::{
        BookingConfig, DatabaseConfig, Environment, GoogleOAuthConfig, JwtConfig, LoginConfig,
        ProvisioningPolicy, RateLimitConfig, SecurityConfig,
    },
    models::{BusinessAccount, Service, User},
    services::{MockIdentityProvider, TokenCodec},
    store::{BusinessAccountStore, InMemoryStore, ServiceStore, UserStore},
    AppState,
};
use chrono::{Duration, Utc};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

pub fn test_config() -> BookingConfig {
    BookingConfig {
        common: service_core::config::Config::default(),
        environment: Environment::Dev,
        service_name: "booking-service".to_string(),
        service_version: "test".to_string(),
        log_level: "error".to_string(),
        otlp_endpoint: None,
        database: DatabaseConfig {
            write_url: "postgres://unused".to_string(),
            read_url: "postgres://unused".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            expiry_minutes: 60,
        },
        google: GoogleOAuthConfig {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            redirect_uri: "http://localhost:8080/api/google-callback".to_string(),
            auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            userinfo_url: "https://www.googleapis.com/oauth2/v2/userinfo".to_string(),
            static_state: None,
        },
        login: LoginConfig {
            first_login_policy: ProvisioningPolicy::Reject,
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        rate_limit: RateLimitConfig {
            login_attempts: 100,
            login_window_seconds: 60,
        },
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub provider: Arc<MockIdentityProvider>,
    pub tokens: TokenCodec,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with(test_config(), MockIdentityProvider::with_email("jane@example.com"))
    }

    pub fn with(config: BookingConfig, provider: MockIdentityProvider) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let provider = Arc::new(provider);
        let state = AppState::new(config, provider.clone(), store.clone());
        let tokens = state.tokens.clone();

        Self {
            router: build_router(state),
            store,
            provider,
            tokens,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Sends the request and decodes the JSON body (Null when empty).
    pub async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.send(request).await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub fn token_for(&self, user_id: &str) -> String {
        self.tokens.issue(user_id, Duration::hours(1)).unwrap()
    }

    pub async fn seed_user(&self, email: &str) -> User {
        let user = User::new(
            email.split('@').next().unwrap().to_string(),
            "Test".to_string(),
            "User".to_string(),
            email.to_string(),
        );
        self.store.create_user(&user).await.unwrap();
        user
    }

    pub async fn seed_business_account(&self, owner_id: &str) -> BusinessAccount {
        let account = BusinessAccount {
            id: Uuid::new_v4().to_string(),
            name: "Glow Studio".to_string(),
            business_type: "makeup".to_string(),
            location: "Lisbon".to_string(),
            links: None,
            created_utc: Utc::now(),
        };
        self.store
            .create_business_account(&account, owner_id)
            .await
            .unwrap();
        account
    }

    pub async fn seed_service(&self, business_account_id: &str, name: &str) -> Service {
        let now = Utc::now();
        let service = Service {
            id: Uuid::new_v4().to_string(),
            business_account_id: business_account_id.to_string(),
            name: name.to_string(),
            description: None,
            duration_minutes: 45,
            price: 30.0,
            currency: "EUR".to_string(),
            category: Some("makeup".to_string()),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.store.create_service(&service).await.unwrap();
        service
    }
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    request("GET", uri, token, None)
}

pub fn delete(uri: &str, token: Option<&str>) -> Request<Body> {
    request("DELETE", uri, token, None)
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    request(method, uri, token, Some(body))
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
