pub mod authz;
pub mod error;
pub mod login;
pub mod oauth;
pub mod token;

pub use authz::{ensure_business_owner, ensure_self, AuthzError};
pub use login::{LoginError, LoginFlow, LoginRedirect, StateNonce};
pub use oauth::{GoogleProvider, IdentityProvider, MockIdentityProvider, OAuthError, ProviderProfile};
pub use token::{SessionClaims, TokenCodec, TokenError};
