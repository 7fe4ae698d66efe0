use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone)]
pub struct BookingConfig {
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub google: GoogleOAuthConfig,
    pub login: LoginConfig,
    pub security: SecurityConfig,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub write_url: String,
    pub read_url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry_minutes: i64,
}

/// Upper bound for `JWT_EXPIRY_MINUTES` (one year).
pub const MAX_TOKEN_EXPIRY_MINUTES: i64 = 60 * 24 * 365;

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    /// Legacy process-wide state nonce. When unset every login gets its own.
    pub static_state: Option<String>,
}

/// What the callback does when the provider email has no internal user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningPolicy {
    Reject,
    AutoCreate,
}

#[derive(Debug, Clone)]
pub struct LoginConfig {
    pub first_login_policy: ProvisioningPolicy,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub login_attempts: u32,
    pub login_window_seconds: u64,
}

impl BookingConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Self::from_source(common, |key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup so it can be
    /// exercised without touching the process environment.
    pub fn from_source<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment: Environment = lookup("ENVIRONMENT")
            .unwrap_or_else(|| "dev".to_string())
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let is_prod = environment == Environment::Prod;
        let get_env = |key: &str, default: Option<&str>| get_env(&lookup, key, default, is_prod);

        let app_url = get_env("APP_URL", Some(format!("http://localhost:{}", common.port).as_str()))?;

        let config = BookingConfig {
            environment,
            service_name: get_env("SERVICE_NAME", Some("booking-service"))?,
            service_version: get_env("SERVICE_VERSION", Some(env!("CARGO_PKG_VERSION")))?,
            log_level: get_env("LOG_LEVEL", Some("info"))?,
            otlp_endpoint: lookup("OTLP_ENDPOINT").filter(|v| !v.trim().is_empty()),
            database: {
                let write_url = get_env("DATABASE_WRITE_URL", None)?;
                DatabaseConfig {
                    read_url: get_env("DATABASE_READ_URL", Some(write_url.as_str()))?,
                    write_url,
                    max_connections: parse_number(
                        "DATABASE_MAX_CONNECTIONS",
                        get_env("DATABASE_MAX_CONNECTIONS", Some("10"))?,
                    )?,
                }
            },
            jwt: JwtConfig {
                secret: get_env("JWT_SECRET", None)?,
                expiry_minutes: parse_number(
                    "JWT_EXPIRY_MINUTES",
                    get_env("JWT_EXPIRY_MINUTES", Some("60"))?,
                )?,
            },
            google: GoogleOAuthConfig {
                client_id: get_env("GOOGLE_CLIENT_ID", None)?,
                client_secret: get_env("GOOGLE_CLIENT_SECRET", None)?,
                redirect_uri: format!("{}/api/google-callback", app_url.trim_end_matches('/')),
                auth_url: get_env("GOOGLE_AUTH_URL", Some(GOOGLE_AUTH_URL))?,
                token_url: get_env("GOOGLE_TOKEN_URL", Some(GOOGLE_TOKEN_URL))?,
                userinfo_url: get_env("GOOGLE_USERINFO_URL", Some(GOOGLE_USERINFO_URL))?,
                static_state: lookup("GOOGLE_RANDOM_STATE").filter(|v| !v.is_empty()),
            },
            login: LoginConfig {
                first_login_policy: get_env("FIRST_LOGIN_POLICY", Some("reject"))?
                    .parse()
                    .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
            },
            security: SecurityConfig {
                allowed_origins: get_env("ALLOWED_ORIGINS", Some("http://localhost:3000"))?
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            rate_limit: RateLimitConfig {
                login_attempts: get_env("RATE_LIMIT_LOGIN_ATTEMPTS", Some("10"))?
                    .parse()
                    .unwrap_or(10),
                login_window_seconds: get_env("RATE_LIMIT_LOGIN_WINDOW_SECONDS", Some("60"))?
                    .parse()
                    .unwrap_or(60),
            },
            common,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.common.port == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "PORT must be greater than 0"
            )));
        }

        if self.jwt.expiry_minutes <= 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT_EXPIRY_MINUTES must be positive"
            )));
        }

        if self.jwt.expiry_minutes > MAX_TOKEN_EXPIRY_MINUTES {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT_EXPIRY_MINUTES must not exceed {}",
                MAX_TOKEN_EXPIRY_MINUTES
            )));
        }

        if self.jwt.secret.is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT_SECRET must not be empty"
            )));
        }

        if self.environment == Environment::Prod {
            if self.jwt.secret.len() < 32 {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "JWT_SECRET must be at least 32 bytes in production"
                )));
            }

            if self.security.allowed_origins.iter().any(|o| o == "*") {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "Wildcard CORS origin not allowed in production"
                )));
            }
        }

        if self.google.static_state.is_some() {
            tracing::warn!("GOOGLE_RANDOM_STATE is set; all logins share one OAuth state value");
        }

        Ok(())
    }
}

fn get_env<F>(lookup: &F, key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => Ok(val),
        None => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}

fn parse_number<T>(key: &str, raw: String) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| {
        AppError::ConfigError(anyhow::anyhow!("{} is not a valid number: {}", key, e))
    })
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

impl std::str::FromStr for ProvisioningPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(ProvisioningPolicy::Reject),
            "create" | "auto_create" => Ok(ProvisioningPolicy::AutoCreate),
            _ => Err(format!("Invalid first login policy: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn source(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("DATABASE_WRITE_URL", "postgres://localhost/booking"),
        ("GOOGLE_CLIENT_ID", "client-id"),
        ("GOOGLE_CLIENT_SECRET", "client-secret"),
        ("JWT_SECRET", "dev-secret"),
    ];

    #[test]
    fn dev_defaults_apply() {
        let config = BookingConfig::from_source(core_config::Config::default(), source(REQUIRED))
            .unwrap();

        assert_eq!(config.environment, Environment::Dev);
        assert_eq!(config.jwt.expiry_minutes, 60);
        assert_eq!(config.database.read_url, config.database.write_url);
        assert_eq!(
            config.google.redirect_uri,
            "http://localhost:8080/api/google-callback"
        );
        assert_eq!(config.login.first_login_policy, ProvisioningPolicy::Reject);
        assert!(config.google.static_state.is_none());
    }

    #[test]
    fn redirect_uri_is_built_from_app_url() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("APP_URL", "https://book.example.com/"));
        pairs.push(("FIRST_LOGIN_POLICY", "create"));

        let config =
            BookingConfig::from_source(core_config::Config::default(), source(&pairs)).unwrap();

        assert_eq!(
            config.google.redirect_uri,
            "https://book.example.com/api/google-callback"
        );
        assert_eq!(config.login.first_login_policy, ProvisioningPolicy::AutoCreate);
    }

    #[test]
    fn missing_secret_is_rejected() {
        let pairs: Vec<_> = REQUIRED
            .iter()
            .copied()
            .filter(|(k, _)| *k != "JWT_SECRET")
            .collect();

        let err = BookingConfig::from_source(core_config::Config::default(), source(&pairs))
            .unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn non_positive_ttl_is_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("JWT_EXPIRY_MINUTES", "0"));

        assert!(BookingConfig::from_source(core_config::Config::default(), source(&pairs)).is_err());
    }

    #[test]
    fn oversized_ttl_is_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("JWT_EXPIRY_MINUTES", "1000000000000"));

        let err = BookingConfig::from_source(core_config::Config::default(), source(&pairs))
            .unwrap_err();
        assert!(err.to_string().contains("JWT_EXPIRY_MINUTES"));

        let mut pairs = REQUIRED.to_vec();
        let one_year = MAX_TOKEN_EXPIRY_MINUTES.to_string();
        pairs.push(("JWT_EXPIRY_MINUTES", one_year.as_str()));
        assert!(BookingConfig::from_source(core_config::Config::default(), source(&pairs)).is_ok());
    }

    #[test]
    fn prod_requires_long_secret() {
        let pairs = [
            ("ENVIRONMENT", "prod"),
            ("SERVICE_NAME", "booking-service"),
            ("SERVICE_VERSION", "1.0.0"),
            ("LOG_LEVEL", "info"),
            ("APP_URL", "https://book.example.com"),
            ("DATABASE_WRITE_URL", "postgres://db/booking"),
            ("DATABASE_READ_URL", "postgres://replica/booking"),
            ("DATABASE_MAX_CONNECTIONS", "20"),
            ("GOOGLE_CLIENT_ID", "id"),
            ("GOOGLE_CLIENT_SECRET", "secret"),
            ("GOOGLE_AUTH_URL", GOOGLE_AUTH_URL),
            ("GOOGLE_TOKEN_URL", GOOGLE_TOKEN_URL),
            ("GOOGLE_USERINFO_URL", GOOGLE_USERINFO_URL),
            ("JWT_SECRET", "short"),
            ("JWT_EXPIRY_MINUTES", "60"),
            ("FIRST_LOGIN_POLICY", "reject"),
            ("ALLOWED_ORIGINS", "https://book.example.com"),
            ("RATE_LIMIT_LOGIN_ATTEMPTS", "10"),
            ("RATE_LIMIT_LOGIN_WINDOW_SECONDS", "60"),
        ];

        let err = BookingConfig::from_source(core_config::Config::default(), source(&pairs))
            .unwrap_err();
        assert!(err.to_string().contains("32 bytes"));
    }

    #[test]
    fn parses_policies() {
        assert_eq!("Reject".parse::<ProvisioningPolicy>(), Ok(ProvisioningPolicy::Reject));
        assert!("maybe".parse::<ProvisioningPolicy>().is_err());
    }
}
