//! Identity provider adapter: authorization URL and code exchange.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

use crate::config::GoogleOAuthConfig;

/// Scopes requested at login; fixed to profile and email.
pub const GOOGLE_SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/userinfo.email",
    "https://www.googleapis.com/auth/userinfo.profile",
];

/// Profile returned by the provider. Only `email` is required downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderProfile {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub verified_email: bool,
    pub name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OAuthError {
    #[error("authorization code exchange failed: {0}")]
    ExchangeFailed(String),
    #[error("profile fetch failed: {0}")]
    ProfileFetchFailed(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn authorization_url(&self, state_nonce: &str) -> String;

    /// Exchanges the code for an access credential and fetches the profile
    /// with it. Not retried.
    async fn exchange_and_fetch_profile(
        &self,
        authorization_code: &str,
    ) -> Result<ProviderProfile, OAuthError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub struct GoogleProvider {
    client: reqwest::Client,
    config: GoogleOAuthConfig,
}

impl GoogleProvider {
    pub fn new(config: GoogleOAuthConfig) -> Result<Self, anyhow::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn authorization_url(&self, state_nonce: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}&access_type=online",
            self.config.auth_url,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode(&GOOGLE_SCOPES.join(" ")),
            urlencoding::encode(state_nonce),
        )
    }

    async fn exchange_and_fetch_profile(
        &self,
        authorization_code: &str,
    ) -> Result<ProviderProfile, OAuthError> {
        let token_res = self
            .client
            .post(&self.config.token_url)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", authorization_code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(|e| OAuthError::ExchangeFailed(e.to_string()))?;

        if !token_res.status().is_success() {
            return Err(OAuthError::ExchangeFailed(format!(
                "token endpoint returned {}",
                token_res.status()
            )));
        }

        let token: TokenResponse = token_res
            .json()
            .await
            .map_err(|e| OAuthError::ExchangeFailed(e.to_string()))?;

        let profile_res = self
            .client
            .get(&self.config.userinfo_url)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| OAuthError::ProfileFetchFailed(e.to_string()))?;

        if !profile_res.status().is_success() {
            return Err(OAuthError::ProfileFetchFailed(format!(
                "userinfo endpoint returned {}",
                profile_res.status()
            )));
        }

        profile_res
            .json::<ProviderProfile>()
            .await
            .map_err(|e| OAuthError::ProfileFetchFailed(e.to_string()))
    }
}

/// Scripted provider for tests: returns a fixed outcome and counts calls.
pub struct MockIdentityProvider {
    outcome: Mutex<Result<ProviderProfile, OAuthError>>,
    calls: AtomicUsize,
}

impl MockIdentityProvider {
    pub fn returning(profile: ProviderProfile) -> Self {
        Self {
            outcome: Mutex::new(Ok(profile)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(err: OAuthError) -> Self {
        Self {
            outcome: Mutex::new(Err(err)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_email(email: &str) -> Self {
        Self::returning(ProviderProfile {
            email: email.to_string(),
            verified_email: true,
            ..Default::default()
        })
    }

    /// Number of exchange calls observed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    fn authorization_url(&self, state_nonce: &str) -> String {
        format!("https://provider.test/auth?state={}", urlencoding::encode(state_nonce))
    }

    async fn exchange_and_fetch_profile(
        &self,
        _authorization_code: &str,
    ) -> Result<ProviderProfile, OAuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
