use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::{json_body, AuthUser, Policy};
use crate::inputs::ReviewInput;
use crate::models::ReviewKey;
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{empty_created, empty_success, success};

const RETRIEVED: &str = "Reviews retrieved successfully";

pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path((user_id, event_id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    user.require(Policy::Anyone)?;
    let review = state
        .reviews
        .get_by_id(&ReviewKey::new(user_id, event_id))
        .await?;
    Ok(success(review, "Review retrieved successfully").into_response())
}

pub async fn list(State(state): State<AppState>, user: AuthUser) -> Result<Response, AppError> {
    user.require(Policy::Admin)?;
    let reviews = state.reviews.get_all().await?;
    Ok(success(reviews, RETRIEVED).into_response())
}

pub async fn by_author(
    State(state): State<AppState>,
    user: AuthUser,
    Path(user_id): Path<String>,
) -> Result<Response, AppError> {
    user.require(Policy::BuyerOrAdmin)?;
    let reviews = state.reviews.get_by_author(&user_id).await?;
    Ok(success(reviews, RETRIEVED).into_response())
}

pub async fn by_organizer(
    State(state): State<AppState>,
    user: AuthUser,
    Path(organizer_id): Path<String>,
) -> Result<Response, AppError> {
    user.require(Policy::OrganizerOrAdmin)?;
    let reviews = state.reviews.get_by_organizer(&organizer_id).await?;
    Ok(success(reviews, RETRIEVED).into_response())
}

pub async fn by_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(event_id): Path<String>,
) -> Result<Response, AppError> {
    user.require(Policy::OrganizerOrAdmin)?;
    let reviews = state.reviews.get_by_event(&event_id).await?;
    Ok(success(reviews, RETRIEVED).into_response())
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<ReviewInput>, JsonRejection>,
) -> Result<Response, AppError> {
    user.require(Policy::BuyerOrAdmin)?;
    let input = json_body(payload)?;
    state.reviews.create(&input).await?;
    Ok(empty_created("Review created successfully").into_response())
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<ReviewInput>, JsonRejection>,
) -> Result<Response, AppError> {
    user.require(Policy::BuyerOrAdmin)?;
    let input = json_body(payload)?;
    state.reviews.update(&input).await?;
    Ok(empty_success("Review updated successfully").into_response())
}

pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((user_id, event_id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    user.require(Policy::BuyerOrAdmin)?;
    state
        .reviews
        .delete(&ReviewKey::new(user_id, event_id))
        .await?;
    Ok(empty_success("Review deleted successfully").into_response())
}
