use std::env;
use std::net::SocketAddr;

use chrono::{Duration, Utc};
use thiserror::Error;

use crate::auth::TokenSigner;
use crate::managers::PasswordEnhancers;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::apply_security_headers;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";
const DEFAULT_TOKEN_TTL_DAYS: i64 = 100;
const MIN_JWT_SECRET_LEN: usize = 32;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub cors_allowed_origins: Vec<String>,
    /// Production deployments sit behind TLS and get HSTS.
    pub production: bool,
    pub admin: Option<AdminAccount>,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub pass_before: String,
    pub pass_after: String,
    pub jwt_secret: String,
    pub token_ttl: Duration,
}

impl AuthConfig {
    pub fn enhancers(&self) -> PasswordEnhancers {
        PasswordEnhancers::new(&self.pass_before, &self.pass_after)
    }

    pub fn token_signer(&self) -> TokenSigner {
        TokenSigner::new(self.jwt_secret.as_bytes(), self.token_ttl)
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_ttl", &self.token_ttl)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// The connection string carries the database password.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("max_connections", &self.max_connections)
            .finish_non_exhaustive()
    }
}

/// Admin account created at start-up. Admin is never available through
/// sign-up.
#[derive(Clone)]
pub struct AdminAccount {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAccount")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let jwt_secret = require("JWT_SECRET_KEY")?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::Invalid {
                key: "JWT_SECRET_KEY",
                reason: format!("must be at least {MIN_JWT_SECRET_LEN} bytes"),
            });
        }

        let token_ttl = match lookup("TOKEN_TTL_DAYS") {
            Some(raw) => parse_token_ttl(&raw)?,
            None => Duration::days(DEFAULT_TOKEN_TTL_DAYS),
        };

        let auth = AuthConfig {
            pass_before: require("PASS_BEFORE")?,
            pass_after: require("PASS_AFTER")?,
            jwt_secret,
            token_ttl,
        };

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    key: "DATABASE_MAX_CONNECTIONS",
                    reason: format!("'{raw}' is not a positive number"),
                })?,
            None => DEFAULT_DB_MAX_CONNECTIONS,
        };
        let database = DatabaseConfig {
            url: require("DATABASE_URL")?,
            max_connections,
        };

        let raw_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr.parse().map_err(|e| ConfigError::Invalid {
            key: "BIND_ADDR",
            reason: format!("{e}"),
        })?;

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| cors::DEFAULT_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let production = lookup("RUST_ENV")
            .map(|v| v.to_lowercase() == "production")
            .unwrap_or(false);

        let admin = match (lookup("ADMIN_EMAIL"), lookup("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Some(AdminAccount { email, password })
            }
            _ => None,
        };

        Ok(Self {
            bind_addr,
            database,
            auth,
            cors_allowed_origins,
            production,
            admin,
        })
    }
}

/// Tokens must expire on a date chrono can represent, counting from now.
fn parse_token_ttl(raw: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        key: "TOKEN_TTL_DAYS",
        reason,
    };
    let days = raw
        .parse::<i64>()
        .ok()
        .filter(|days| *days > 0)
        .ok_or_else(|| invalid(format!("'{raw}' is not a positive number of days")))?;
    let ttl = Duration::try_days(days)
        .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
        .ok_or_else(|| invalid(format!("{days} days puts token expiry out of range")))?;
    Ok(ttl)
}
