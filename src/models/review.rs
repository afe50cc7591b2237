use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::event::Event;
use super::user::User;

/// A user's review of an event. At most one review exists per
/// `(user_id, event_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub user_id: String,
    pub event_id: String,
    pub title: String,
    pub message: String,
    pub rating: String,
    #[sqlx(skip)]
    pub user: Option<User>,
    #[sqlx(skip)]
    pub event: Option<Event>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    pub fn key(&self) -> ReviewKey {
        ReviewKey {
            user_id: self.user_id.clone(),
            event_id: self.event_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReviewKey {
    pub user_id: String,
    pub event_id: String,
}

impl ReviewKey {
    pub fn new(user_id: impl Into<String>, event_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            event_id: event_id.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.user_id.is_empty() && !self.event_id.is_empty()
    }
}
