use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{debug, error};

use crate::managers::ManagerError;
use crate::utils::response::error as error_response;

const SERVER_FAULT_MESSAGE: &str = "An internal error occurred";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    UserFault(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Server fault: {0}")]
    ServerFault(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::UserFault(_) => StatusCode::BAD_REQUEST,
            AppError::AuthError(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ServerFault(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::UserFault(_) => "USER_FAULT",
            AppError::AuthError(_) => "AUTH_ERROR",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::ServerFault(_) => "SERVER_FAULT",
        }
    }

    fn log(&self) {
        match self {
            AppError::ServerFault(msg) => {
                error!(code = self.code(), message = %msg, "Request failed");
            }
            AppError::UserFault(msg)
            | AppError::AuthError(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg) => {
                debug!(code = self.code(), message = %msg, "Request rejected");
            }
        }
    }
}

impl From<ManagerError> for AppError {
    fn from(err: ManagerError) -> Self {
        match err {
            ManagerError::UserFault(msg) => AppError::UserFault(msg),
            ManagerError::NotFound(msg) => AppError::NotFound(msg),
            ManagerError::ServerFault(msg) => AppError::ServerFault(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        self.log();

        // Server faults keep their detail in the log only.
        let public_message = match self {
            AppError::UserFault(msg)
            | AppError::AuthError(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg) => msg,
            AppError::ServerFault(_) => SERVER_FAULT_MESSAGE.to_string(),
        };

        error_response(code, public_message, None, status)
    }
}

/// Turns a handler panic into the generic server-fault envelope.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = %detail, "Handler panicked");

    error_response(
        "SERVER_FAULT",
        SERVER_FAULT_MESSAGE,
        None,
        StatusCode::INTERNAL_SERVER_ERROR,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_errors_map_to_statuses() {
        let cases = [
            (ManagerError::user("bad"), StatusCode::BAD_REQUEST),
            (ManagerError::not_found("none"), StatusCode::NOT_FOUND),
            (
                ManagerError::server("boom"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }
    }

    #[test]
    fn test_access_errors() {
        assert_eq!(
            AppError::AuthError("missing".to_string()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("role".to_string()).status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_panic_becomes_server_fault() {
        let response = panic_response(Box::new("kaboom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
