use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRef, FromRequestParts, Query};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum::{async_trait, Json};
use serde::Serialize;

use crate::auth::{AuthError, Claims, TokenSigner};
use crate::models::Role;
use crate::utils::error::AppError;
use crate::utils::response::success;

pub mod auth;
pub mod events;
pub mod reviews;
pub mod tickets;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "ticketstore-api",
    };

    success(payload, "Health check successful").into_response()
}

/// Which roles may call an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Anyone,
    Admin,
    OrganizerOrAdmin,
    BuyerOrAdmin,
}

impl Policy {
    pub fn allows(self, roles: &[Role]) -> bool {
        let has = |role| roles.contains(&role);
        match self {
            Policy::Anyone => true,
            Policy::Admin => has(Role::Admin),
            Policy::OrganizerOrAdmin => has(Role::Organizer) || has(Role::Admin),
            Policy::BuyerOrAdmin => has(Role::Buyer) || has(Role::Admin),
        }
    }
}

/// The caller behind a valid bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub claims: Claims,
}

impl AuthUser {
    pub fn require(&self, policy: Policy) -> Result<(), AppError> {
        if policy.allows(&self.claims.roles) {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Your role does not allow this operation".to_string(),
            ))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    TokenSigner: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::AuthError("Missing bearer token".to_string()))?;

        let claims = TokenSigner::from_ref(state)
            .verify(token.trim())
            .map_err(|e| match e {
                AuthError::TokenExpired => AppError::AuthError("Token expired".to_string()),
                _ => AppError::AuthError("Invalid token".to_string()),
            })?;

        Ok(AuthUser { claims })
    }
}

/// Unwraps a JSON body, reporting a malformed one in the error envelope.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::UserFault(rejection.body_text()))
}

pub(crate) fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    params
        .map(|Query(value)| value)
        .map_err(|rejection| AppError::UserFault(rejection.body_text()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policies() {
        let buyer = [Role::Buyer];
        let organizer = [Role::Organizer];
        let admin = [Role::Admin];

        assert!(Policy::Anyone.allows(&[]));
        assert!(Policy::Admin.allows(&admin));
        assert!(!Policy::Admin.allows(&organizer));
        assert!(Policy::OrganizerOrAdmin.allows(&organizer));
        assert!(!Policy::OrganizerOrAdmin.allows(&buyer));
        assert!(Policy::BuyerOrAdmin.allows(&admin));
        assert!(!Policy::BuyerOrAdmin.allows(&organizer));
        assert!(!Policy::Admin.allows(&[Role::Buyer, Role::Organizer]));
    }

    #[test]
    fn test_require_maps_to_forbidden() {
        let user = AuthUser {
            claims: Claims {
                email: "b@example.com".to_string(),
                roles: vec![Role::Buyer],
                exp: i64::MAX,
            },
        };
        assert!(user.require(Policy::BuyerOrAdmin).is_ok());
        assert!(matches!(
            user.require(Policy::Admin),
            Err(AppError::Forbidden(_))
        ));
    }
}
