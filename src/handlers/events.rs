use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::{json_body, query_params, AuthUser, Policy};
use crate::inputs::{EventInput, PageInput};
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{empty_created, empty_success, success};

pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    user.require(Policy::Anyone)?;
    let event = state.events.get_by_id(&id).await?;
    Ok(success(event, "Event retrieved successfully").into_response())
}

pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    params: Result<Query<PageInput>, QueryRejection>,
) -> Result<Response, AppError> {
    user.require(Policy::BuyerOrAdmin)?;
    let page = query_params(params)?;
    let events = state.events.get_page(page).await?;
    Ok(success(events, "Events retrieved successfully").into_response())
}

pub async fn by_organizer(
    State(state): State<AppState>,
    user: AuthUser,
    Path(organizer_id): Path<String>,
) -> Result<Response, AppError> {
    user.require(Policy::OrganizerOrAdmin)?;
    let events = state.events.get_by_organizer(&organizer_id).await?;
    Ok(success(events, "Events retrieved successfully").into_response())
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<EventInput>, JsonRejection>,
) -> Result<Response, AppError> {
    user.require(Policy::OrganizerOrAdmin)?;
    let input = json_body(payload)?;
    state.events.create(&input).await?;
    Ok(empty_created("Event created successfully").into_response())
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<EventInput>, JsonRejection>,
) -> Result<Response, AppError> {
    user.require(Policy::OrganizerOrAdmin)?;
    let input = json_body(payload)?;
    state.events.update(&input).await?;
    Ok(empty_success("Event updated successfully").into_response())
}

pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    user.require(Policy::OrganizerOrAdmin)?;
    state.events.delete(&id).await?;
    Ok(empty_success("Event deleted successfully").into_response())
}
