//! Outward-facing response bodies.
//!
//! Views only ever point "down" from the record a query is about. A user
//! embedded anywhere carries empty `events_created`, `tickets_bought` and
//! `reviews` collections so the cyclic entity graph is never walked.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub phone_prefix: String,
    pub age: i32,
    pub is_student: bool,
    pub join_date: DateTime<Utc>,
    pub events_created: Vec<EventView>,
    pub tickets_bought: Vec<TicketView>,
    pub reviews: Vec<ReviewView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub category: String,
    pub genre: String,
    pub organizer_id: String,
    pub location: Option<LocationView>,
    pub ticket_types: Option<TicketTypesView>,
    pub organizer: Option<UserView>,
    pub guests: Vec<GuestView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationView {
    pub id: String,
    pub building_name: String,
    pub address_full_name: String,
    pub locality: String,
    pub state: String,
    pub state_code: String,
    pub country: String,
    pub country_code: String,
    pub postal_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub geocode_accuracy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketTypesView {
    pub id: String,
    pub number_standard_tickets: i32,
    pub price_standard_ticket: String,
    pub number_vip_tickets: i32,
    pub price_vip_ticket: Option<String>,
    pub price_child_ticket: Option<String>,
    pub price_student_ticket: Option<String>,
    pub price_currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestView {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub scene_name: String,
    pub description: String,
    pub category: String,
    pub genre: String,
    pub age: i32,
    pub event_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketView {
    pub user_id: String,
    pub event_id: String,
    pub auxiliary_id: String,
    pub ticket_type: String,
    pub price: String,
    pub price_currency: String,
    pub bought_time: DateTime<Utc>,
    pub buyer: Option<UserView>,
    pub event: Option<EventView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    pub user_id: String,
    pub event_id: String,
    pub title: String,
    pub message: String,
    pub rating: String,
    pub date: DateTime<Utc>,
    pub user: Option<UserView>,
    pub event: Option<EventView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenView {
    pub token: String,
}
