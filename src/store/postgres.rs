use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool, Postgres, QueryBuilder};

use super::{
    EventFilter, EventIncludes, EventStore, Page, ReviewFilter, ReviewIncludes, ReviewStore,
    StoreError, StoreResult, TicketFilter, TicketIncludes, TicketStore,
};
use crate::models::{
    Event, Guest, Location, Review, ReviewKey, Ticket, TicketKey, TicketTypes, User,
};

const EVENT_SELECT: &str = r#"
    SELECT e.id, e.name, e.short_name, e.description, e.start_date, e.end_date,
           e.category, e.genre, e.organizer_id, e.created_at, e.updated_at,
           l.id AS location_id, l.building_name, l.address_full_name, l.locality,
           l.state, l.state_code, l.country, l.country_code, l.postal_code,
           l.latitude, l.longitude, l.geocode_accuracy,
           l.created_at AS location_created_at, l.updated_at AS location_updated_at,
           tt.id AS ticket_types_id, tt.number_standard_tickets, tt.price_standard_ticket,
           tt.number_vip_tickets, tt.price_vip_ticket, tt.price_child_ticket,
           tt.price_student_ticket, tt.price_currency,
           tt.created_at AS ticket_types_created_at, tt.updated_at AS ticket_types_updated_at
    FROM events e
    JOIN locations l ON l.event_id = e.id
    JOIN ticket_types tt ON tt.event_id = e.id
"#;

// Ties on updated_at fall back to byte order of the keys.
const EVENT_ORDER: &str = r#" ORDER BY e.updated_at DESC, e.id COLLATE "C""#;

const GUEST_SELECT: &str = r#"
    SELECT id, event_id, first_name, last_name, scene_name, description,
           category, genre, age, created_at, updated_at
    FROM guests
    WHERE event_id = ANY($1)
    ORDER BY seq
"#;

const USER_SELECT: &str = r#"
    SELECT id, email, user_name, first_name, last_name, phone_number, phone_prefix,
           age, is_student, created_at, updated_at
    FROM users
    WHERE id = ANY($1)
"#;

const TICKET_SELECT: &str = r#"
    SELECT user_id, event_id, auxiliary_id, ticket_type, price, price_currency,
           created_at, updated_at
    FROM tickets
"#;

const TICKET_ORDER: &str = r#"
    ORDER BY updated_at DESC, user_id COLLATE "C", event_id COLLATE "C", auxiliary_id COLLATE "C"
"#;

const REVIEW_SELECT: &str = r#"
    SELECT user_id, event_id, title, message, rating, created_at, updated_at
    FROM reviews
"#;

const REVIEW_ORDER: &str = r#"
    ORDER BY updated_at DESC, user_id COLLATE "C", event_id COLLATE "C"
"#;

#[derive(FromRow)]
struct EventRow {
    id: String,
    name: String,
    short_name: String,
    description: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    category: String,
    genre: String,
    organizer_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    location_id: String,
    building_name: String,
    address_full_name: String,
    locality: String,
    state: String,
    state_code: String,
    country: String,
    country_code: String,
    postal_code: String,
    latitude: f64,
    longitude: f64,
    geocode_accuracy: String,
    location_created_at: DateTime<Utc>,
    location_updated_at: DateTime<Utc>,
    ticket_types_id: String,
    number_standard_tickets: i32,
    price_standard_ticket: String,
    number_vip_tickets: i32,
    price_vip_ticket: Option<String>,
    price_child_ticket: Option<String>,
    price_student_ticket: Option<String>,
    price_currency: String,
    ticket_types_created_at: DateTime<Utc>,
    ticket_types_updated_at: DateTime<Utc>,
}

impl EventRow {
    fn into_event(self, guests: Vec<Guest>) -> Event {
        Event {
            location: Location {
                id: self.location_id,
                building_name: self.building_name,
                address_full_name: self.address_full_name,
                locality: self.locality,
                state: self.state,
                state_code: self.state_code,
                country: self.country,
                country_code: self.country_code,
                postal_code: self.postal_code,
                latitude: self.latitude,
                longitude: self.longitude,
                geocode_accuracy: self.geocode_accuracy,
                created_at: self.location_created_at,
                updated_at: self.location_updated_at,
            },
            ticket_types: TicketTypes {
                id: self.ticket_types_id,
                number_standard_tickets: self.number_standard_tickets,
                price_standard_ticket: self.price_standard_ticket,
                number_vip_tickets: self.number_vip_tickets,
                price_vip_ticket: self.price_vip_ticket,
                price_child_ticket: self.price_child_ticket,
                price_student_ticket: self.price_student_ticket,
                price_currency: self.price_currency,
                created_at: self.ticket_types_created_at,
                updated_at: self.ticket_types_updated_at,
            },
            id: self.id,
            name: self.name,
            short_name: self.short_name,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            category: self.category,
            genre: self.genre,
            organizer_id: self.organizer_id,
            guests,
            organizer: None,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

fn unavailable(e: sqlx::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

/// Maps constraint violations on a write to the same errors the in-memory
/// store raises.
fn write_error(e: sqlx::Error, conflict: &str) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return StoreError::Conflict(conflict.to_string());
        }
        if db.is_foreign_key_violation() {
            let subject = match db.constraint() {
                Some("events_organizer_fk") => "Organizer",
                Some("tickets_user_fk" | "reviews_user_fk") => "User",
                _ => "Event",
            };
            return StoreError::MissingReference(format!("Error: The {subject} doesn't exist."));
        }
    }
    unavailable(e)
}

fn missing(subject: &str) -> StoreError {
    StoreError::MissingReference(format!("Error: The {subject} doesn't exist."))
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Postgres-backed store for every aggregate. Users are written by
/// [`crate::auth::PgAuthenticator`] into the same database.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn users_by_id(&self, ids: Vec<String>) -> StoreResult<HashMap<String, User>> {
        let users = sqlx::query_as::<_, User>(USER_SELECT)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(users.into_iter().map(|user| (user.id.clone(), user)).collect())
    }

    /// Attaches guests, and the organizer when asked, to the fetched rows.
    async fn load_events(
        &self,
        rows: Vec<EventRow>,
        includes: EventIncludes,
    ) -> StoreResult<Vec<Event>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = rows.iter().map(|row| row.id.clone()).collect();
        let mut guests: HashMap<String, Vec<Guest>> = HashMap::new();
        for guest in sqlx::query_as::<_, Guest>(GUEST_SELECT)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?
        {
            guests.entry(guest.event_id.clone()).or_default().push(guest);
        }

        let mut events: Vec<Event> = rows
            .into_iter()
            .map(|row| {
                let event_guests = guests.remove(&row.id).unwrap_or_default();
                row.into_event(event_guests)
            })
            .collect();

        if includes.organizer {
            let organizers = self
                .users_by_id(events.iter().map(|e| e.organizer_id.clone()).collect())
                .await?;
            for event in &mut events {
                event.organizer = organizers.get(&event.organizer_id).cloned();
            }
        }
        Ok(events)
    }

    /// Events referenced by tickets or reviews, loaded without organizer.
    async fn events_by_id(&self, ids: Vec<String>) -> StoreResult<HashMap<String, Event>> {
        let mut query = QueryBuilder::<Postgres>::new(EVENT_SELECT);
        query.push(" WHERE e.id = ANY(").push_bind(ids).push(")");
        let rows = query
            .build_query_as::<EventRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?;
        let events = self.load_events(rows, EventIncludes::default()).await?;
        Ok(events.into_iter().map(|event| (event.id.clone(), event)).collect())
    }

    async fn attach_ticket_includes(
        &self,
        tickets: &mut [Ticket],
        includes: TicketIncludes,
    ) -> StoreResult<()> {
        if includes.buyer {
            let buyers = self
                .users_by_id(tickets.iter().map(|t| t.user_id.clone()).collect())
                .await?;
            for ticket in tickets.iter_mut() {
                ticket.buyer = buyers.get(&ticket.user_id).cloned();
            }
        }
        if includes.event {
            let events = self
                .events_by_id(tickets.iter().map(|t| t.event_id.clone()).collect())
                .await?;
            for ticket in tickets.iter_mut() {
                ticket.event = events.get(&ticket.event_id).cloned();
            }
        }
        Ok(())
    }

    async fn attach_review_includes(
        &self,
        reviews: &mut [Review],
        includes: ReviewIncludes,
    ) -> StoreResult<()> {
        if includes.user {
            let authors = self
                .users_by_id(reviews.iter().map(|r| r.user_id.clone()).collect())
                .await?;
            for review in reviews.iter_mut() {
                review.user = authors.get(&review.user_id).cloned();
            }
        }
        if includes.event {
            let events = self
                .events_by_id(reviews.iter().map(|r| r.event_id.clone()).collect())
                .await?;
            for review in reviews.iter_mut() {
                review.event = events.get(&review.event_id).cloned();
            }
        }
        Ok(())
    }
}

async fn upsert_location(conn: &mut PgConnection, event: &Event) -> Result<(), sqlx::Error> {
    let location = &event.location;
    sqlx::query(
        r#"
        INSERT INTO locations
            (id, event_id, building_name, address_full_name, locality, state, state_code,
             country, country_code, postal_code, latitude, longitude, geocode_accuracy,
             created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        ON CONFLICT (event_id) DO UPDATE SET
            id = EXCLUDED.id,
            building_name = EXCLUDED.building_name,
            address_full_name = EXCLUDED.address_full_name,
            locality = EXCLUDED.locality,
            state = EXCLUDED.state,
            state_code = EXCLUDED.state_code,
            country = EXCLUDED.country,
            country_code = EXCLUDED.country_code,
            postal_code = EXCLUDED.postal_code,
            latitude = EXCLUDED.latitude,
            longitude = EXCLUDED.longitude,
            geocode_accuracy = EXCLUDED.geocode_accuracy,
            created_at = EXCLUDED.created_at,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(&location.id)
    .bind(&event.id)
    .bind(&location.building_name)
    .bind(&location.address_full_name)
    .bind(&location.locality)
    .bind(&location.state)
    .bind(&location.state_code)
    .bind(&location.country)
    .bind(&location.country_code)
    .bind(&location.postal_code)
    .bind(location.latitude)
    .bind(location.longitude)
    .bind(&location.geocode_accuracy)
    .bind(location.created_at)
    .bind(location.updated_at)
    .execute(conn)
    .await?;
    Ok(())
}

async fn upsert_ticket_types(conn: &mut PgConnection, event: &Event) -> Result<(), sqlx::Error> {
    let types = &event.ticket_types;
    sqlx::query(
        r#"
        INSERT INTO ticket_types
            (id, event_id, number_standard_tickets, price_standard_ticket, number_vip_tickets,
             price_vip_ticket, price_child_ticket, price_student_ticket, price_currency,
             created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        ON CONFLICT (event_id) DO UPDATE SET
            id = EXCLUDED.id,
            number_standard_tickets = EXCLUDED.number_standard_tickets,
            price_standard_ticket = EXCLUDED.price_standard_ticket,
            number_vip_tickets = EXCLUDED.number_vip_tickets,
            price_vip_ticket = EXCLUDED.price_vip_ticket,
            price_child_ticket = EXCLUDED.price_child_ticket,
            price_student_ticket = EXCLUDED.price_student_ticket,
            price_currency = EXCLUDED.price_currency,
            created_at = EXCLUDED.created_at,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(&types.id)
    .bind(&event.id)
    .bind(types.number_standard_tickets)
    .bind(&types.price_standard_ticket)
    .bind(types.number_vip_tickets)
    .bind(&types.price_vip_ticket)
    .bind(&types.price_child_ticket)
    .bind(&types.price_student_ticket)
    .bind(&types.price_currency)
    .bind(types.created_at)
    .bind(types.updated_at)
    .execute(conn)
    .await?;
    Ok(())
}

/// New guests get the next `seq`, existing ones keep their position.
async fn upsert_guests(conn: &mut PgConnection, event: &Event) -> Result<(), sqlx::Error> {
    for guest in &event.guests {
        sqlx::query(
            r#"
            INSERT INTO guests
                (id, event_id, first_name, last_name, scene_name, description, category,
                 genre, age, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (id) DO UPDATE SET
                event_id = EXCLUDED.event_id,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                scene_name = EXCLUDED.scene_name,
                description = EXCLUDED.description,
                category = EXCLUDED.category,
                genre = EXCLUDED.genre,
                age = EXCLUDED.age,
                created_at = EXCLUDED.created_at,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&guest.id)
        .bind(&event.id)
        .bind(&guest.first_name)
        .bind(&guest.last_name)
        .bind(&guest.scene_name)
        .bind(&guest.description)
        .bind(&guest.category)
        .bind(&guest.genre)
        .bind(guest.age)
        .bind(guest.created_at)
        .bind(guest.updated_at)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

#[async_trait]
impl EventStore for PgStore {
    async fn find(&self, id: &str, includes: EventIncludes) -> StoreResult<Option<Event>> {
        let mut query = QueryBuilder::<Postgres>::new(EVENT_SELECT);
        query.push(" WHERE e.id = ").push_bind(id.to_string());
        let row = query
            .build_query_as::<EventRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(self.load_events(vec![row], includes).await?.pop())
    }

    async fn list(
        &self,
        filter: EventFilter,
        page: Option<Page>,
        includes: EventIncludes,
    ) -> StoreResult<Vec<Event>> {
        let mut query = QueryBuilder::<Postgres>::new(EVENT_SELECT);
        if let EventFilter::Organizer(organizer_id) = filter {
            query.push(" WHERE e.organizer_id = ").push_bind(organizer_id);
        }
        query.push(EVENT_ORDER);
        if let Some(page) = page {
            query
                .push(" LIMIT ")
                .push_bind(to_i64(page.limit))
                .push(" OFFSET ")
                .push_bind(to_i64(page.offset));
        }

        let rows = query
            .build_query_as::<EventRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?;
        self.load_events(rows, includes).await
    }

    async fn create(&self, event: &Event) -> StoreResult<()> {
        let conflict = format!("Error: The Event {} already exists.", event.id);
        let mut tx = self.pool.begin().await.map_err(unavailable)?;

        sqlx::query(
            r#"
            INSERT INTO events
                (id, name, short_name, description, start_date, end_date, category, genre,
                 organizer_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(&event.id)
        .bind(&event.name)
        .bind(&event.short_name)
        .bind(&event.description)
        .bind(event.start_date)
        .bind(event.end_date)
        .bind(&event.category)
        .bind(&event.genre)
        .bind(&event.organizer_id)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error(e, &conflict))?;

        upsert_location(&mut *tx, event)
            .await
            .map_err(|e| write_error(e, &conflict))?;
        upsert_ticket_types(&mut *tx, event)
            .await
            .map_err(|e| write_error(e, &conflict))?;
        upsert_guests(&mut *tx, event)
            .await
            .map_err(|e| write_error(e, &conflict))?;

        tx.commit().await.map_err(unavailable)
    }

    async fn update(&self, event: &Event, removed_guests: &[Guest]) -> StoreResult<()> {
        let conflict = format!("Error: The Event {} already exists.", event.id);
        let mut tx = self.pool.begin().await.map_err(unavailable)?;

        let updated = sqlx::query(
            r#"
            UPDATE events
            SET name = $2,
                short_name = $3,
                description = $4,
                start_date = $5,
                end_date = $6,
                category = $7,
                genre = $8,
                organizer_id = $9,
                created_at = $10,
                updated_at = $11
            WHERE id = $1
            "#,
        )
        .bind(&event.id)
        .bind(&event.name)
        .bind(&event.short_name)
        .bind(&event.description)
        .bind(event.start_date)
        .bind(event.end_date)
        .bind(&event.category)
        .bind(&event.genre)
        .bind(&event.organizer_id)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error(e, &conflict))?;
        if updated.rows_affected() == 0 {
            return Err(missing("Event"));
        }

        upsert_location(&mut *tx, event)
            .await
            .map_err(|e| write_error(e, &conflict))?;
        upsert_ticket_types(&mut *tx, event)
            .await
            .map_err(|e| write_error(e, &conflict))?;

        let removed: Vec<String> = removed_guests.iter().map(|g| g.id.clone()).collect();
        sqlx::query("DELETE FROM guests WHERE event_id = $1 AND id = ANY($2)")
            .bind(&event.id)
            .bind(removed)
            .execute(&mut *tx)
            .await
            .map_err(unavailable)?;
        upsert_guests(&mut *tx, event)
            .await
            .map_err(|e| write_error(e, &conflict))?;

        tx.commit().await.map_err(unavailable)
    }

    async fn delete(&self, event: &Event) -> StoreResult<()> {
        // Location, ticket types, guests, tickets and reviews cascade.
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(&event.id)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(())
    }
}

#[async_trait]
impl TicketStore for PgStore {
    async fn find(&self, key: &TicketKey, includes: TicketIncludes) -> StoreResult<Option<Ticket>> {
        let mut query = QueryBuilder::<Postgres>::new(TICKET_SELECT);
        query
            .push(" WHERE user_id = ")
            .push_bind(key.user_id.clone())
            .push(" AND event_id = ")
            .push_bind(key.event_id.clone())
            .push(" AND auxiliary_id = ")
            .push_bind(key.auxiliary_id.clone());
        let ticket = query
            .build_query_as::<Ticket>()
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?;
        let Some(ticket) = ticket else {
            return Ok(None);
        };

        let mut tickets = [ticket];
        self.attach_ticket_includes(&mut tickets, includes).await?;
        let [ticket] = tickets;
        Ok(Some(ticket))
    }

    async fn list(
        &self,
        filter: TicketFilter,
        includes: TicketIncludes,
    ) -> StoreResult<Vec<Ticket>> {
        let mut query = QueryBuilder::<Postgres>::new(TICKET_SELECT);
        match filter {
            TicketFilter::All => {}
            TicketFilter::Buyer(user_id) => {
                query.push(" WHERE user_id = ").push_bind(user_id);
            }
            TicketFilter::BuyerAndEvent { user_id, event_id } => {
                query
                    .push(" WHERE user_id = ")
                    .push_bind(user_id)
                    .push(" AND event_id = ")
                    .push_bind(event_id);
            }
            TicketFilter::SoldByOrganizer(organizer_id) => {
                query
                    .push(" WHERE event_id IN (SELECT id FROM events WHERE organizer_id = ")
                    .push_bind(organizer_id)
                    .push(")");
            }
            TicketFilter::Event(event_id) => {
                query.push(" WHERE event_id = ").push_bind(event_id);
            }
        }
        query.push(TICKET_ORDER);

        let mut tickets = query
            .build_query_as::<Ticket>()
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?;
        self.attach_ticket_includes(&mut tickets, includes).await?;
        Ok(tickets)
    }

    async fn create(&self, ticket: &Ticket) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tickets
                (user_id, event_id, auxiliary_id, ticket_type, price, price_currency,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&ticket.user_id)
        .bind(&ticket.event_id)
        .bind(&ticket.auxiliary_id)
        .bind(&ticket.ticket_type)
        .bind(&ticket.price)
        .bind(&ticket.price_currency)
        .bind(ticket.created_at)
        .bind(ticket.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, "Error: The Ticket already exists."))?;
        Ok(())
    }

    async fn update(&self, ticket: &Ticket) -> StoreResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE tickets
            SET ticket_type = $4,
                price = $5,
                price_currency = $6,
                created_at = $7,
                updated_at = $8
            WHERE user_id = $1 AND event_id = $2 AND auxiliary_id = $3
            "#,
        )
        .bind(&ticket.user_id)
        .bind(&ticket.event_id)
        .bind(&ticket.auxiliary_id)
        .bind(&ticket.ticket_type)
        .bind(&ticket.price)
        .bind(&ticket.price_currency)
        .bind(ticket.created_at)
        .bind(ticket.updated_at)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        if updated.rows_affected() == 0 {
            return Err(missing("Ticket"));
        }
        Ok(())
    }

    async fn delete(&self, ticket: &Ticket) -> StoreResult<()> {
        sqlx::query(
            "DELETE FROM tickets WHERE user_id = $1 AND event_id = $2 AND auxiliary_id = $3",
        )
        .bind(&ticket.user_id)
        .bind(&ticket.event_id)
        .bind(&ticket.auxiliary_id)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;
        Ok(())
    }
}

#[async_trait]
impl ReviewStore for PgStore {
    async fn find(&self, key: &ReviewKey, includes: ReviewIncludes) -> StoreResult<Option<Review>> {
        let mut query = QueryBuilder::<Postgres>::new(REVIEW_SELECT);
        query
            .push(" WHERE user_id = ")
            .push_bind(key.user_id.clone())
            .push(" AND event_id = ")
            .push_bind(key.event_id.clone());
        let review = query
            .build_query_as::<Review>()
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?;
        let Some(review) = review else {
            return Ok(None);
        };

        let mut reviews = [review];
        self.attach_review_includes(&mut reviews, includes).await?;
        let [review] = reviews;
        Ok(Some(review))
    }

    async fn list(
        &self,
        filter: ReviewFilter,
        includes: ReviewIncludes,
    ) -> StoreResult<Vec<Review>> {
        let mut query = QueryBuilder::<Postgres>::new(REVIEW_SELECT);
        match filter {
            ReviewFilter::All => {}
            ReviewFilter::Author(user_id) => {
                query.push(" WHERE user_id = ").push_bind(user_id);
            }
            ReviewFilter::Organizer(organizer_id) => {
                query
                    .push(" WHERE event_id IN (SELECT id FROM events WHERE organizer_id = ")
                    .push_bind(organizer_id)
                    .push(")");
            }
            ReviewFilter::Event(event_id) => {
                query.push(" WHERE event_id = ").push_bind(event_id);
            }
        }
        query.push(REVIEW_ORDER);

        let mut reviews = query
            .build_query_as::<Review>()
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?;
        self.attach_review_includes(&mut reviews, includes).await?;
        Ok(reviews)
    }

    async fn create(&self, review: &Review) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reviews
                (user_id, event_id, title, message, rating, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&review.user_id)
        .bind(&review.event_id)
        .bind(&review.title)
        .bind(&review.message)
        .bind(&review.rating)
        .bind(review.created_at)
        .bind(review.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, "Error: The User already reviewed this Event."))?;
        Ok(())
    }

    async fn update(&self, review: &Review) -> StoreResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE reviews
            SET title = $3,
                message = $4,
                rating = $5,
                created_at = $6,
                updated_at = $7
            WHERE user_id = $1 AND event_id = $2
            "#,
        )
        .bind(&review.user_id)
        .bind(&review.event_id)
        .bind(&review.title)
        .bind(&review.message)
        .bind(&review.rating)
        .bind(review.created_at)
        .bind(review.updated_at)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        if updated.rows_affected() == 0 {
            return Err(missing("Review"));
        }
        Ok(())
    }

    async fn delete(&self, review: &Review) -> StoreResult<()> {
        sqlx::query("DELETE FROM reviews WHERE user_id = $1 AND event_id = $2")
            .bind(&review.user_id)
            .bind(&review.event_id)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(())
    }
}
