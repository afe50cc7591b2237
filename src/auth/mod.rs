//! Account storage, credentials and bearer tokens.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Role, User};

mod memory;
pub mod password;
mod postgres;
pub mod token;

pub use memory::MemoryAuthenticator;
pub use postgres::PgAuthenticator;
pub use token::{Claims, TokenSigner};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("email already in use")]
    DuplicateEmail,

    #[error("no account for user {0}")]
    UnknownUser(String),

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    TokenExpired,

    #[error("authentication backend failure: {0}")]
    Backend(String),
}

/// Identity provider used by sign-up, login and the bearer-token gate.
///
/// Passwords handed to it are already composed with the configured
/// enhancers.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn create_account(&self, user: &User, password: &str) -> Result<(), AuthError>;

    async fn assign_role(&self, user: &User, role: Role) -> Result<(), AuthError>;

    async fn delete_account(&self, user: &User) -> Result<(), AuthError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;

    async fn check_password(&self, user: &User, password: &str) -> Result<bool, AuthError>;

    async fn roles(&self, user: &User) -> Result<Vec<Role>, AuthError>;

    async fn issue_token(&self, user: &User) -> Result<String, AuthError>;
}
