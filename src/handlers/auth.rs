use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::{json_body, AuthUser, Policy};
use crate::inputs::{LoginInput, SignUpInput};
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{empty_created, success};

pub async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<SignUpInput>, JsonRejection>,
) -> Result<Response, AppError> {
    let input = json_body(payload)?;
    state.auth.sign_up(&input).await?;
    Ok(empty_created("User created successfully").into_response())
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> Result<Response, AppError> {
    let input = json_body(payload)?;
    let token = state.auth.login(&input).await?;
    Ok(success(token, "Login successful").into_response())
}

pub async fn current_user(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Response, AppError> {
    user.require(Policy::Anyone)?;
    let view = state.auth.get_user(&user.claims.email).await?;
    Ok(success(view, "User retrieved successfully").into_response())
}
