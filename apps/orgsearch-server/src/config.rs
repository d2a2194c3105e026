//! Server configuration.
//!
//! Supports configuration via environment variables:
//!
//! ```bash
//! # Database pool
//! ORGSEARCH_DB_MIN_CONNECTIONS=5
//! ORGSEARCH_DB_MAX_CONNECTIONS=20
//! ORGSEARCH_DB_ACQUIRE_TIMEOUT_SECS=30
//!
//! # Tokens and access codes
//! ORGSEARCH_JWT_SECRET=...                # required, at least 32 bytes
//! ORGSEARCH_TOKEN_LIFETIME_SECS=86400
//! ORGSEARCH_ACCESS_CODE_TTL_SECS=3600
//!
//! # Provider: Resend
//! ORGSEARCH_EMAIL_PROVIDER=resend
//! RESEND_API_KEY=re_...
//!
//! # Provider: SMTP
//! ORGSEARCH_EMAIL_PROVIDER=smtp
//! SMTP_HOST=smtp.gmail.com
//! SMTP_PORT=587
//! SMTP_USERNAME=user@example.com
//! SMTP_PASSWORD=app_password
//! SMTP_USE_TLS=true
//!
//! # Sender config
//! ORGSEARCH_EMAIL_FROM=noreply@example.com
//! ORGSEARCH_EMAIL_FROM_NAME="Organization Search"
//! ```

use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub email: Option<EmailConfig>,
}

/// Connection pool bounds
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            min_connections: 5,
            max_connections: 20,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// Bearer token and access code settings
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_lifetime: Duration,
    pub access_code_ttl: Duration,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_lifetime", &self.token_lifetime)
            .field("access_code_ttl", &self.access_code_ttl)
            .finish()
    }
}

/// Email delivery configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Email provider configuration
    pub provider: EmailProviderConfig,
    /// From email address
    pub from_address: String,
    /// Optional from name
    pub from_name: Option<String>,
}

/// Email provider configuration
#[derive(Debug, Clone)]
pub enum EmailProviderConfig {
    /// Resend email provider
    Resend {
        /// Resend API key
        #[allow(dead_code)] // Used when email-resend feature is enabled
        api_key: String,
    },
    /// SMTP email provider
    #[allow(dead_code)] // Fields used when email-smtp feature is enabled
    Smtp {
        host: String,
        port: u16,
        username: Option<String>,
        password: Option<String>,
        use_tls: bool,
    },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid email provider: {0}. Expected 'resend' or 'smtp'")]
    InvalidProvider(String),

    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },

    #[error("ORGSEARCH_JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} bytes")]
    WeakJwtSecret,

    #[error("ORGSEARCH_DB_MIN_CONNECTIONS ({min}) exceeds ORGSEARCH_DB_MAX_CONNECTIONS ({max})")]
    PoolBounds { min: u32, max: u32 },

    #[error("Missing from address: ORGSEARCH_EMAIL_FROM is required when email is configured")]
    MissingFromAddress,

    #[error("SMTP provider requires SMTP_HOST")]
    SmtpMissingHost,
}

/// Parse `var` if set, otherwise use `default`.
fn parse_env<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value: raw }),
        Err(_) => Ok(default),
    }
}

fn parse_flag(var: &str, default: bool) -> bool {
    env::var(var)
        .map(|v| v.to_lowercase() == "true" || v == "1")
        .unwrap_or(default)
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            email: EmailConfig::from_env()?,
        })
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let min_connections = parse_env("ORGSEARCH_DB_MIN_CONNECTIONS", defaults.min_connections)?;
        let max_connections = parse_env("ORGSEARCH_DB_MAX_CONNECTIONS", defaults.max_connections)?;
        if max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                var: "ORGSEARCH_DB_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }
        if min_connections > max_connections {
            return Err(ConfigError::PoolBounds {
                min: min_connections,
                max: max_connections,
            });
        }
        let acquire_timeout_secs: u64 = parse_env(
            "ORGSEARCH_DB_ACQUIRE_TIMEOUT_SECS",
            defaults.acquire_timeout.as_secs(),
        )?;

        Ok(Self {
            min_connections,
            max_connections,
            acquire_timeout: Duration::from_secs(acquire_timeout_secs),
        })
    }
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("ORGSEARCH_JWT_SECRET")
            .map_err(|_| ConfigError::MissingEnvVar("ORGSEARCH_JWT_SECRET".to_string()))?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::WeakJwtSecret);
        }

        let token_lifetime_secs: u32 = parse_env("ORGSEARCH_TOKEN_LIFETIME_SECS", 86_400)?;
        let access_code_ttl_secs: u32 = parse_env("ORGSEARCH_ACCESS_CODE_TTL_SECS", 3_600)?;
        if token_lifetime_secs == 0 {
            return Err(ConfigError::InvalidValue {
                var: "ORGSEARCH_TOKEN_LIFETIME_SECS",
                value: "0".to_string(),
            });
        }
        if access_code_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue {
                var: "ORGSEARCH_ACCESS_CODE_TTL_SECS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            jwt_secret,
            token_lifetime: Duration::from_secs(token_lifetime_secs.into()),
            access_code_ttl: Duration::from_secs(access_code_ttl_secs.into()),
        })
    }
}

impl EmailConfig {
    /// `None` when `ORGSEARCH_EMAIL_PROVIDER` is unset.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let Ok(provider_type) = env::var("ORGSEARCH_EMAIL_PROVIDER") else {
            return Ok(None);
        };

        let provider = match provider_type.to_lowercase().as_str() {
            "resend" => {
                let api_key = env::var("RESEND_API_KEY")
                    .map_err(|_| ConfigError::MissingEnvVar("RESEND_API_KEY".to_string()))?;
                EmailProviderConfig::Resend { api_key }
            }
            "smtp" => {
                let host = env::var("SMTP_HOST").map_err(|_| ConfigError::SmtpMissingHost)?;
                let port = parse_env::<u16>("SMTP_PORT", 587)?;
                let username = env::var("SMTP_USERNAME").ok();
                let password = env::var("SMTP_PASSWORD").ok();
                let use_tls = parse_flag("SMTP_USE_TLS", true);

                EmailProviderConfig::Smtp {
                    host,
                    port,
                    username,
                    password,
                    use_tls,
                }
            }
            other => return Err(ConfigError::InvalidProvider(other.to_string())),
        };

        let from_address =
            env::var("ORGSEARCH_EMAIL_FROM").map_err(|_| ConfigError::MissingFromAddress)?;
        let from_name = env::var("ORGSEARCH_EMAIL_FROM_NAME").ok();

        Ok(Some(Self {
            provider,
            from_address,
            from_name,
        }))
    }
}
