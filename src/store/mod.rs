//! Persistence contract used by the managers.
//!
//! Each aggregate has its own store trait. Reads take an include set that
//! says which associations to attach to the returned records; everything
//! else is left `None`. Every listing is ordered by `updated_at`
//! descending.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Event, Guest, Review, ReviewKey, Ticket, TicketKey};

mod memory;
mod postgres;

pub use memory::{MemoryStore, UserTable};
pub use postgres::PgStore;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The write collides with a record that already exists.
    #[error("{0}")]
    Conflict(String),

    /// The write points at a record that does not exist.
    #[error("{0}")]
    MissingReference(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventIncludes {
    pub organizer: bool,
}

impl EventIncludes {
    pub fn organizer() -> Self {
        Self { organizer: true }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TicketIncludes {
    pub buyer: bool,
    pub event: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewIncludes {
    pub user: bool,
    pub event: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventFilter {
    All,
    Organizer(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketFilter {
    All,
    Buyer(String),
    BuyerAndEvent { user_id: String, event_id: String },
    /// Tickets for any event organised by the given user.
    SoldByOrganizer(String),
    Event(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewFilter {
    All,
    Author(String),
    /// Reviews of any event organised by the given user.
    Organizer(String),
    Event(String),
}

/// A window over an ordered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
}

impl Page {
    pub fn apply<T>(&self, rows: Vec<T>) -> Vec<T> {
        rows.into_iter().skip(self.offset).take(self.limit).collect()
    }
}

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Loads the event with its location, ticket types and guests.
    async fn find(&self, id: &str, includes: EventIncludes) -> StoreResult<Option<Event>>;

    async fn list(
        &self,
        filter: EventFilter,
        page: Option<Page>,
        includes: EventIncludes,
    ) -> StoreResult<Vec<Event>>;

    async fn create(&self, event: &Event) -> StoreResult<()>;

    /// Writes `event` together with its current guests and drops
    /// `removed_guests`.
    async fn update(&self, event: &Event, removed_guests: &[Guest]) -> StoreResult<()>;

    /// Removes the event and every record that depends on it.
    async fn delete(&self, event: &Event) -> StoreResult<()>;
}

#[async_trait]
pub trait TicketStore: Send + Sync {
    async fn find(&self, key: &TicketKey, includes: TicketIncludes) -> StoreResult<Option<Ticket>>;

    async fn list(&self, filter: TicketFilter, includes: TicketIncludes)
        -> StoreResult<Vec<Ticket>>;

    async fn create(&self, ticket: &Ticket) -> StoreResult<()>;

    async fn update(&self, ticket: &Ticket) -> StoreResult<()>;

    async fn delete(&self, ticket: &Ticket) -> StoreResult<()>;
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn find(&self, key: &ReviewKey, includes: ReviewIncludes) -> StoreResult<Option<Review>>;

    async fn list(&self, filter: ReviewFilter, includes: ReviewIncludes)
        -> StoreResult<Vec<Review>>;

    /// Fails with [`StoreError::Conflict`] when the user already reviewed
    /// the event.
    async fn create(&self, review: &Review) -> StoreResult<()>;

    async fn update(&self, review: &Review) -> StoreResult<()>;

    async fn delete(&self, review: &Review) -> StoreResult<()>;
}
