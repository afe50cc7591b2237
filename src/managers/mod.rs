//! Business operations per aggregate.
//!
//! A manager runs validation, the store call and the view conversion, and
//! reports every expected failure as a [`ManagerError`]. Nothing here
//! panics on bad input.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::auth::AuthError;
use crate::conversion::ConversionError;
use crate::store::StoreError;
use crate::validation::ValidationError;

pub mod auth;
pub mod event;
pub mod review;
pub mod ticket;

pub use auth::{AuthManager, PasswordEnhancers};
pub use event::EventManager;
pub use review::ReviewManager;
pub use ticket::TicketManager;

/// Why an operation failed.
///
/// A write that names a missing record is a `UserFault`. `NotFound` is
/// only used by reads that matched nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManagerError {
    #[error("{0}")]
    UserFault(String),

    #[error("{0}")]
    ServerFault(String),

    #[error("{0}")]
    NotFound(String),
}

pub type ManagerResult<T> = Result<T, ManagerError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorType {
    UserFault,
    ServerFault,
    NotFound,
}

impl ManagerError {
    pub fn user(message: impl Into<String>) -> Self {
        ManagerError::UserFault(message.into())
    }

    pub fn server(message: impl Into<String>) -> Self {
        ManagerError::ServerFault(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ManagerError::NotFound(message.into())
    }

    pub fn error_type(&self) -> ErrorType {
        match self {
            ManagerError::UserFault(_) => ErrorType::UserFault,
            ManagerError::ServerFault(_) => ErrorType::ServerFault,
            ManagerError::NotFound(_) => ErrorType::NotFound,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ManagerError::UserFault(msg)
            | ManagerError::ServerFault(msg)
            | ManagerError::NotFound(msg) => msg,
        }
    }

    pub(crate) fn log(&self, operation: &'static str) {
        match self {
            ManagerError::UserFault(msg) | ManagerError::NotFound(msg) => {
                debug!(operation, error_type = ?self.error_type(), message = %msg, "Operation rejected");
            }
            ManagerError::ServerFault(msg) => {
                error!(operation, message = %msg, "Operation failed");
            }
        }
    }
}

impl From<ValidationError> for ManagerError {
    fn from(err: ValidationError) -> Self {
        ManagerError::UserFault(err.into_message())
    }
}

impl From<StoreError> for ManagerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) | StoreError::MissingReference(msg) => {
                ManagerError::UserFault(msg)
            }
            StoreError::Unavailable(_) => ManagerError::ServerFault(err.to_string()),
        }
    }
}

impl From<ConversionError> for ManagerError {
    fn from(err: ConversionError) -> Self {
        ManagerError::ServerFault(err.to_string())
    }
}

impl From<AuthError> for ManagerError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DuplicateEmail => {
                ManagerError::UserFault("Error: The Email is already in use.".to_string())
            }
            other => ManagerError::ServerFault(other.to_string()),
        }
    }
}

/// The result of an operation in the `{value, errorMessage, errorType}`
/// shape. Exactly one of `value` and `error_type` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome<T> {
    pub value: Option<T>,
    pub error_message: Option<String>,
    pub error_type: Option<ErrorType>,
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        self.error_type.is_none()
    }
}

impl<T> From<ManagerResult<T>> for Outcome<T> {
    fn from(result: ManagerResult<T>) -> Self {
        match result {
            Ok(value) => Outcome {
                value: Some(value),
                error_message: None,
                error_type: None,
            },
            Err(err) => Outcome {
                value: None,
                error_type: Some(err.error_type()),
                error_message: Some(err.message().to_string()),
            },
        }
    }
}

/// An empty listing is a miss.
pub(crate) fn non_empty<T>(rows: Vec<T>, message: &str) -> ManagerResult<Vec<T>> {
    if rows.is_empty() {
        Err(ManagerError::not_found(message))
    } else {
        Ok(rows)
    }
}

pub(crate) fn required(value: &str, message: &str) -> ManagerResult<()> {
    if value.is_empty() {
        Err(ManagerError::user(message))
    } else {
        Ok(())
    }
}
