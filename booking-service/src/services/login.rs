//! Google login: redirect, callback validation, identity resolution and
//! session token issuance.

use std::sync::Arc;
use subtle::ConstantTimeEq;
use thiserror::Error;
use uuid::Uuid;

use crate::config::ProvisioningPolicy;
use crate::models::User;
use crate::services::oauth::{IdentityProvider, OAuthError, ProviderProfile};
use crate::services::token::{TokenCodec, TokenError};
use crate::store::{StoreError, UserStore};

/// Where the expected `state` value of a callback comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateNonce {
    /// Fresh random value per login, echoed back through a cookie.
    PerLogin,
    /// One configured value shared by every login.
    Static(String),
}

impl StateNonce {
    pub fn from_config(static_state: Option<String>) -> Self {
        match static_state {
            Some(value) => StateNonce::Static(value),
            None => StateNonce::PerLogin,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoginRedirect {
    pub url: String,
    pub nonce: String,
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("invalid state parameter")]
    InvalidState,

    #[error("failed to exchange authorization code")]
    ExchangeFailed(#[source] OAuthError),

    #[error("failed to fetch user info")]
    ProfileFetchFailed(#[source] OAuthError),

    #[error("provider profile has no email")]
    InvalidEmail,

    #[error("no user registered for {0}")]
    UnknownUser(String),

    #[error("user store failed")]
    StoreError(#[source] StoreError),

    #[error("failed to issue session token")]
    TokenIssuanceError(#[source] TokenError),
}

impl From<OAuthError> for LoginError {
    fn from(err: OAuthError) -> Self {
        match err {
            OAuthError::ExchangeFailed(_) => LoginError::ExchangeFailed(err),
            OAuthError::ProfileFetchFailed(_) => LoginError::ProfileFetchFailed(err),
        }
    }
}

#[derive(Clone)]
pub struct LoginFlow {
    provider: Arc<dyn IdentityProvider>,
    users: Arc<dyn UserStore>,
    tokens: TokenCodec,
    nonce: StateNonce,
    policy: ProvisioningPolicy,
}

impl LoginFlow {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        users: Arc<dyn UserStore>,
        tokens: TokenCodec,
        nonce: StateNonce,
        policy: ProvisioningPolicy,
    ) -> Self {
        Self {
            provider,
            users,
            tokens,
            nonce,
            policy,
        }
    }

    pub fn begin_login(&self) -> LoginRedirect {
        let nonce = match &self.nonce {
            StateNonce::PerLogin => Uuid::new_v4().to_string(),
            StateNonce::Static(value) => value.clone(),
        };

        LoginRedirect {
            url: self.provider.authorization_url(&nonce),
            nonce,
        }
    }

    /// Runs the callback steps in order and returns the session token.
    /// `issued_nonce` is the value handed out by [`begin_login`](Self::begin_login)
    /// for this browser, if any. Each failure is terminal.
    #[tracing::instrument(skip_all)]
    pub async fn complete_login(
        &self,
        issued_nonce: Option<&str>,
        state: &str,
        code: &str,
    ) -> Result<String, LoginError> {
        let expected = match &self.nonce {
            StateNonce::PerLogin => issued_nonce,
            StateNonce::Static(value) => Some(value.as_str()),
        };

        let state_matches = expected.is_some_and(|expected| {
            !expected.is_empty() && bool::from(expected.as_bytes().ct_eq(state.as_bytes()))
        });
        if !state_matches {
            tracing::warn!("OAuth callback state did not match the issued nonce");
            return Err(LoginError::InvalidState);
        }

        let profile = self
            .provider
            .exchange_and_fetch_profile(code)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Google token exchange failed");
                LoginError::from(e)
            })?;

        if profile.email.trim().is_empty() {
            tracing::warn!("Google profile carried no email");
            return Err(LoginError::InvalidEmail);
        }

        let subject_id = self.resolve_subject(&profile).await?;

        let token = self
            .tokens
            .issue(&subject_id, self.tokens.session_ttl())
            .map_err(|e| {
                tracing::error!(user_id = %subject_id, error = %e, "Failed to issue session token");
                LoginError::TokenIssuanceError(e)
            })?;

        tracing::info!(user_id = %subject_id, "User logged in with Google");
        Ok(token)
    }

    async fn resolve_subject(&self, profile: &ProviderProfile) -> Result<String, LoginError> {
        let email = profile.email.as_str();

        match self.users.get_user_id_by_email(email).await {
            Ok(id) => Ok(id),
            Err(StoreError::NotFound(_)) => match self.policy {
                ProvisioningPolicy::Reject => {
                    tracing::warn!(email = %email, "Login for unregistered email rejected");
                    Err(LoginError::UnknownUser(email.to_string()))
                }
                ProvisioningPolicy::AutoCreate => {
                    let user = user_from_profile(profile);
                    self.users.create_user(&user).await.map_err(|e| {
                        tracing::error!(email = %email, error = %e, "Failed to provision user");
                        LoginError::StoreError(e)
                    })?;
                    tracing::info!(user_id = %user.id, email = %email, "Provisioned user on first login");
                    Ok(user.id)
                }
            },
            Err(e) => {
                tracing::error!(email = %email, error = %e, "Failed to look up user by email");
                Err(LoginError::StoreError(e))
            }
        }
    }
}

fn user_from_profile(profile: &ProviderProfile) -> User {
    let username = profile
        .email
        .split('@')
        .next()
        .unwrap_or_default()
        .to_string();

    User::new(
        username,
        profile.given_name.clone().unwrap_or_default(),
        profile.family_name.clone().unwrap_or_default(),
        profile.email.clone(),
    )
}
