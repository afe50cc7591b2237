use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    EventFilter, EventIncludes, EventStore, Page, ReviewFilter, ReviewIncludes, ReviewStore,
    StoreError, StoreResult, TicketFilter, TicketIncludes, TicketStore,
};
use crate::models::{Event, Guest, Review, ReviewKey, Ticket, TicketKey, User};

/// Users by id. Shared with the in-memory authenticator, which owns the
/// writes.
pub type UserTable = Arc<RwLock<HashMap<String, User>>>;

#[derive(Default)]
struct Tables {
    // Stored without guests or organizer; both are attached on read.
    events: HashMap<String, Event>,
    guests: HashMap<String, Vec<Guest>>,
    tickets: BTreeMap<TicketKey, Ticket>,
    reviews: BTreeMap<ReviewKey, Review>,
}

impl Tables {
    fn load_event(
        &self,
        stored: &Event,
        users: &HashMap<String, User>,
        includes: EventIncludes,
    ) -> Event {
        let mut event = stored.clone();
        event.guests = self.guests.get(&event.id).cloned().unwrap_or_default();
        if includes.organizer {
            event.organizer = users.get(&event.organizer_id).cloned();
        }
        event
    }

    fn organized_by(&self, event_id: &str, organizer_id: &str) -> bool {
        self.events
            .get(event_id)
            .is_some_and(|event| event.organizer_id == organizer_id)
    }

    fn load_ticket(
        &self,
        stored: &Ticket,
        users: &HashMap<String, User>,
        includes: TicketIncludes,
    ) -> Ticket {
        let mut ticket = stored.clone();
        if includes.buyer {
            ticket.buyer = users.get(&ticket.user_id).cloned();
        }
        if includes.event {
            ticket.event = self
                .events
                .get(&ticket.event_id)
                .map(|event| self.load_event(event, users, EventIncludes::default()));
        }
        ticket
    }

    fn load_review(
        &self,
        stored: &Review,
        users: &HashMap<String, User>,
        includes: ReviewIncludes,
    ) -> Review {
        let mut review = stored.clone();
        if includes.user {
            review.user = users.get(&review.user_id).cloned();
        }
        if includes.event {
            review.event = self
                .events
                .get(&review.event_id)
                .map(|event| self.load_event(event, users, EventIncludes::default()));
        }
        review
    }

    fn require_event(&self, event_id: &str) -> StoreResult<()> {
        if self.events.contains_key(event_id) {
            Ok(())
        } else {
            Err(StoreError::MissingReference(
                "Error: The Event doesn't exist.".to_string(),
            ))
        }
    }
}

fn require_user(users: &HashMap<String, User>, user_id: &str, role: &str) -> StoreResult<()> {
    if users.contains_key(user_id) {
        Ok(())
    } else {
        Err(StoreError::MissingReference(format!(
            "Error: The {role} doesn't exist."
        )))
    }
}

fn strip_event(event: &Event) -> Event {
    Event {
        guests: Vec::new(),
        organizer: None,
        ..event.clone()
    }
}

fn strip_ticket(ticket: &Ticket) -> Ticket {
    Ticket {
        buyer: None,
        event: None,
        ..ticket.clone()
    }
}

fn strip_review(review: &Review) -> Review {
    Review {
        user: None,
        event: None,
        ..review.clone()
    }
}

/// Process-local store backing every aggregate. Cloning shares the data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    users: UserTable,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> UserTable {
        Arc::clone(&self.users)
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn find(&self, id: &str, includes: EventIncludes) -> StoreResult<Option<Event>> {
        let tables = self.tables.read().await;
        let users = self.users.read().await;
        Ok(tables
            .events
            .get(id)
            .map(|event| tables.load_event(event, &users, includes)))
    }

    async fn list(
        &self,
        filter: EventFilter,
        page: Option<Page>,
        includes: EventIncludes,
    ) -> StoreResult<Vec<Event>> {
        let tables = self.tables.read().await;
        let users = self.users.read().await;

        let mut events: Vec<&Event> = tables
            .events
            .values()
            .filter(|event| match &filter {
                EventFilter::All => true,
                EventFilter::Organizer(organizer_id) => &event.organizer_id == organizer_id,
            })
            .collect();
        events.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        let events = events
            .into_iter()
            .map(|event| tables.load_event(event, &users, includes))
            .collect();
        Ok(match page {
            Some(page) => page.apply(events),
            None => events,
        })
    }

    async fn create(&self, event: &Event) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let users = self.users.read().await;

        require_user(&users, &event.organizer_id, "Organizer")?;
        if tables.events.contains_key(&event.id) {
            return Err(StoreError::Conflict(format!(
                "Error: The Event {} already exists.",
                event.id
            )));
        }

        tables.guests.insert(event.id.clone(), event.guests.clone());
        tables.events.insert(event.id.clone(), strip_event(event));
        Ok(())
    }

    async fn update(&self, event: &Event, removed_guests: &[Guest]) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let users = self.users.read().await;

        if !tables.events.contains_key(&event.id) {
            return Err(StoreError::MissingReference(
                "Error: The Event doesn't exist.".to_string(),
            ));
        }
        require_user(&users, &event.organizer_id, "Organizer")?;

        let guests = tables.guests.entry(event.id.clone()).or_default();
        guests.retain(|guest| !removed_guests.iter().any(|removed| removed.id == guest.id));
        for guest in &event.guests {
            match guests.iter_mut().find(|existing| existing.id == guest.id) {
                Some(existing) => *existing = guest.clone(),
                None => guests.push(guest.clone()),
            }
        }

        tables.events.insert(event.id.clone(), strip_event(event));
        Ok(())
    }

    async fn delete(&self, event: &Event) -> StoreResult<()> {
        let mut tables = self.tables.write().await;

        tables.events.remove(&event.id);
        tables.guests.remove(&event.id);
        tables.tickets.retain(|key, _| key.event_id != event.id);
        tables.reviews.retain(|key, _| key.event_id != event.id);
        Ok(())
    }
}

#[async_trait]
impl TicketStore for MemoryStore {
    async fn find(&self, key: &TicketKey, includes: TicketIncludes) -> StoreResult<Option<Ticket>> {
        let tables = self.tables.read().await;
        let users = self.users.read().await;
        Ok(tables
            .tickets
            .get(key)
            .map(|ticket| tables.load_ticket(ticket, &users, includes)))
    }

    async fn list(
        &self,
        filter: TicketFilter,
        includes: TicketIncludes,
    ) -> StoreResult<Vec<Ticket>> {
        let tables = self.tables.read().await;
        let users = self.users.read().await;

        let mut tickets: Vec<Ticket> = tables
            .tickets
            .values()
            .filter(|ticket| match &filter {
                TicketFilter::All => true,
                TicketFilter::Buyer(user_id) => &ticket.user_id == user_id,
                TicketFilter::BuyerAndEvent { user_id, event_id } => {
                    &ticket.user_id == user_id && &ticket.event_id == event_id
                }
                TicketFilter::SoldByOrganizer(organizer_id) => {
                    tables.organized_by(&ticket.event_id, organizer_id)
                }
                TicketFilter::Event(event_id) => &ticket.event_id == event_id,
            })
            .map(|ticket| tables.load_ticket(ticket, &users, includes))
            .collect();
        // Ties keep key order.
        tickets.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(tickets)
    }

    async fn create(&self, ticket: &Ticket) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let users = self.users.read().await;

        require_user(&users, &ticket.user_id, "User")?;
        tables.require_event(&ticket.event_id)?;

        let key = ticket.key();
        if tables.tickets.contains_key(&key) {
            return Err(StoreError::Conflict(
                "Error: The Ticket already exists.".to_string(),
            ));
        }
        tables.tickets.insert(key, strip_ticket(ticket));
        Ok(())
    }

    async fn update(&self, ticket: &Ticket) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        match tables.tickets.get_mut(&ticket.key()) {
            Some(stored) => {
                *stored = strip_ticket(ticket);
                Ok(())
            }
            None => Err(StoreError::MissingReference(
                "Error: The Ticket doesn't exist.".to_string(),
            )),
        }
    }

    async fn delete(&self, ticket: &Ticket) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.tickets.remove(&ticket.key());
        Ok(())
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn find(&self, key: &ReviewKey, includes: ReviewIncludes) -> StoreResult<Option<Review>> {
        let tables = self.tables.read().await;
        let users = self.users.read().await;
        Ok(tables
            .reviews
            .get(key)
            .map(|review| tables.load_review(review, &users, includes)))
    }

    async fn list(
        &self,
        filter: ReviewFilter,
        includes: ReviewIncludes,
    ) -> StoreResult<Vec<Review>> {
        let tables = self.tables.read().await;
        let users = self.users.read().await;

        let mut reviews: Vec<Review> = tables
            .reviews
            .values()
            .filter(|review| match &filter {
                ReviewFilter::All => true,
                ReviewFilter::Author(user_id) => &review.user_id == user_id,
                ReviewFilter::Organizer(organizer_id) => {
                    tables.organized_by(&review.event_id, organizer_id)
                }
                ReviewFilter::Event(event_id) => &review.event_id == event_id,
            })
            .map(|review| tables.load_review(review, &users, includes))
            .collect();
        reviews.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(reviews)
    }

    async fn create(&self, review: &Review) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let users = self.users.read().await;

        require_user(&users, &review.user_id, "User")?;
        tables.require_event(&review.event_id)?;

        let key = review.key();
        if tables.reviews.contains_key(&key) {
            return Err(StoreError::Conflict(
                "Error: The User already reviewed this Event.".to_string(),
            ));
        }
        tables.reviews.insert(key, strip_review(review));
        Ok(())
    }

    async fn update(&self, review: &Review) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        match tables.reviews.get_mut(&review.key()) {
            Some(stored) => {
                *stored = strip_review(review);
                Ok(())
            }
            None => Err(StoreError::MissingReference(
                "Error: The Review doesn't exist.".to_string(),
            )),
        }
    }

    async fn delete(&self, review: &Review) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.reviews.remove(&review.key());
        Ok(())
    }
}
