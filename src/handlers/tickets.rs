use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::{json_body, AuthUser, Policy};
use crate::inputs::TicketInput;
use crate::models::TicketKey;
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{empty_created, empty_success, success};

const RETRIEVED: &str = "Tickets retrieved successfully";

pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path((user_id, event_id, auxiliary_id)): Path<(String, String, String)>,
) -> Result<Response, AppError> {
    user.require(Policy::Anyone)?;
    let key = TicketKey::new(user_id, event_id, auxiliary_id);
    let ticket = state.tickets.get_by_id(&key).await?;
    Ok(success(ticket, "Ticket retrieved successfully").into_response())
}

pub async fn list(State(state): State<AppState>, user: AuthUser) -> Result<Response, AppError> {
    user.require(Policy::Admin)?;
    let tickets = state.tickets.get_all().await?;
    Ok(success(tickets, RETRIEVED).into_response())
}

pub async fn by_buyer(
    State(state): State<AppState>,
    user: AuthUser,
    Path(user_id): Path<String>,
) -> Result<Response, AppError> {
    user.require(Policy::BuyerOrAdmin)?;
    let tickets = state.tickets.get_by_buyer(&user_id).await?;
    Ok(success(tickets, RETRIEVED).into_response())
}

pub async fn by_buyer_and_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path((user_id, event_id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    user.require(Policy::BuyerOrAdmin)?;
    let tickets = state
        .tickets
        .get_by_buyer_and_event(&user_id, &event_id)
        .await?;
    Ok(success(tickets, RETRIEVED).into_response())
}

pub async fn sold_by_organizer(
    State(state): State<AppState>,
    user: AuthUser,
    Path(organizer_id): Path<String>,
) -> Result<Response, AppError> {
    user.require(Policy::OrganizerOrAdmin)?;
    let tickets = state.tickets.get_sold_by_organizer(&organizer_id).await?;
    Ok(success(tickets, RETRIEVED).into_response())
}

pub async fn by_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(event_id): Path<String>,
) -> Result<Response, AppError> {
    user.require(Policy::OrganizerOrAdmin)?;
    let tickets = state.tickets.get_by_event(&event_id).await?;
    Ok(success(tickets, RETRIEVED).into_response())
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<TicketInput>, JsonRejection>,
) -> Result<Response, AppError> {
    user.require(Policy::BuyerOrAdmin)?;
    let input = json_body(payload)?;
    state.tickets.create(&input).await?;
    Ok(empty_created("Ticket created successfully").into_response())
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<TicketInput>, JsonRejection>,
) -> Result<Response, AppError> {
    user.require(Policy::BuyerOrAdmin)?;
    let input = json_body(payload)?;
    state.tickets.update(&input).await?;
    Ok(empty_success("Ticket updated successfully").into_response())
}

pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((user_id, event_id, auxiliary_id)): Path<(String, String, String)>,
) -> Result<Response, AppError> {
    user.require(Policy::BuyerOrAdmin)?;
    let key = TicketKey::new(user_id, event_id, auxiliary_id);
    state.tickets.delete(&key).await?;
    Ok(empty_success("Ticket deleted successfully").into_response())
}
