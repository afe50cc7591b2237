use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::user::User;

/// An event together with the sub-entities it owns.
///
/// `location`, `ticket_types` and `guests` belong to the event and are
/// always loaded with it. `organizer` is a reference to another aggregate
/// and is only populated when the query asked for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub category: String,
    pub genre: String,
    pub organizer_id: String,
    pub location: Location,
    pub ticket_types: TicketTypes,
    pub guests: Vec<Guest>,
    pub organizer: Option<User>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Ticket categories offered by an event. Child and student tickets take a
/// standard seat at a lower price, so they carry no count of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketTypes {
    pub id: String,
    pub number_standard_tickets: i32,
    pub price_standard_ticket: String,
    pub number_vip_tickets: i32,
    pub price_vip_ticket: Option<String>,
    pub price_child_ticket: Option<String>,
    pub price_student_ticket: Option<String>,
    pub price_currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Guest {
    pub id: String,
    pub event_id: String,
    pub first_name: String,
    pub last_name: String,
    pub scene_name: String,
    pub description: String,
    pub category: String,
    pub genre: String,
    pub age: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
