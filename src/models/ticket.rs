use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::event::Event;
use super::user::User;

/// A sold ticket. A buyer may hold several tickets for the same event; the
/// server-generated `auxiliary_id` tells them apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub user_id: String,
    pub event_id: String,
    pub auxiliary_id: String,
    pub ticket_type: String,
    pub price: String,
    pub price_currency: String,
    #[sqlx(skip)]
    pub buyer: Option<User>,
    #[sqlx(skip)]
    pub event: Option<Event>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    pub fn key(&self) -> TicketKey {
        TicketKey {
            user_id: self.user_id.clone(),
            event_id: self.event_id.clone(),
            auxiliary_id: self.auxiliary_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TicketKey {
    pub user_id: String,
    pub event_id: String,
    pub auxiliary_id: String,
}

impl TicketKey {
    pub fn new(
        user_id: impl Into<String>,
        event_id: impl Into<String>,
        auxiliary_id: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            event_id: event_id.into(),
            auxiliary_id: auxiliary_id.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.user_id.is_empty() && !self.event_id.is_empty() && !self.auxiliary_id.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TicketType {
    Standard,
    Vip,
    Child,
    Student,
}

impl FromStr for TicketType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STANDARD" => Ok(TicketType::Standard),
            "VIP" => Ok(TicketType::Vip),
            "CHILD" => Ok(TicketType::Child),
            "STUDENT" => Ok(TicketType::Student),
            _ => Err(()),
        }
    }
}

/// Currencies prices may be quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Gbt,
    Ron,
}

impl FromStr for Currency {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "GBT" => Ok(Currency::Gbt),
            "RON" => Ok(Currency::Ron),
            _ => Err(()),
        }
    }
}
