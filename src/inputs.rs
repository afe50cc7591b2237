//! Request bodies accepted by the managers.
//!
//! Every field defaults when absent from the JSON body so that a missing
//! value reaches the validator as empty and is reported with its own
//! message instead of a generic deserialisation failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignUpInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub phone_prefix: String,
    pub age: i32,
    pub is_student: bool,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Create and edit share this shape; `id` is only read when editing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventInput {
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub category: String,
    pub genre: String,
    pub organizer_id: String,
    pub location: LocationInput,
    pub ticket_types: TicketTypesInput,
    pub guests: Vec<GuestInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationInput {
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

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TicketTypesInput {
    pub number_standard_tickets: i32,
    pub price_standard_ticket: String,
    pub number_vip_tickets: i32,
    pub price_vip_ticket: Option<String>,
    pub price_child_ticket: Option<String>,
    pub price_student_ticket: Option<String>,
    pub price_currency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuestInput {
    pub first_name: String,
    pub last_name: String,
    pub scene_name: String,
    pub description: String,
    pub category: String,
    pub genre: String,
    pub age: i32,
    pub event_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TicketInput {
    pub user_id: String,
    pub event_id: String,
    pub auxiliary_id: String,
    pub ticket_type: String,
    pub price: String,
    pub price_currency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewInput {
    pub user_id: String,
    pub event_id: String,
    pub title: String,
    pub message: String,
    pub rating: String,
}

pub const DEFAULT_PAGE_LIMIT: u32 = 20;
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Pagination of the general events listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageInput {
    pub limit: u32,
    pub offset: u32,
}

impl Default for PageInput {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_deserialize_as_empty() {
        let input: EventInput = serde_json::from_str(r#"{"name":"Rock Night"}"#).unwrap();
        assert_eq!(input.name, "Rock Night");
        assert!(input.id.is_empty());
        assert!(input.location.building_name.is_empty());
        assert!(input.guests.is_empty());
        assert_eq!(input.ticket_types.price_vip_ticket, None);
    }

    #[test]
    fn test_camel_case_field_names() {
        let input: TicketInput = serde_json::from_str(
            r#"{"userId":"u1","eventId":"e1","ticketType":"VIP","price":"10","priceCurrency":"EUR"}"#,
        )
        .unwrap();
        assert_eq!(input.user_id, "u1");
        assert_eq!(input.ticket_type, "VIP");
        assert_eq!(input.price_currency, "EUR");
    }

    #[test]
    fn test_page_defaults() {
        let page: PageInput = serde_json::from_str("{}").unwrap();
        assert_eq!(page, PageInput { limit: 20, offset: 0 });
    }
}
