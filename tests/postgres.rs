//! Runs the Postgres-backed authenticator and stores against a live
//! database. Set `TEST_DATABASE_URL` to enable; without it every test
//! returns early.

mod common;

use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use common::{event_input, review_input, sign_up_input, ticket_input, SECRET};
use ticketstore_server::auth::{AuthError, Authenticator, PgAuthenticator, TokenSigner};
use ticketstore_server::conversion::{
    apply_event_update, event_from_input, review_from_input, ticket_from_input, user_from_sign_up,
};
use ticketstore_server::inputs::GuestInput;
use ticketstore_server::models::{Role, User};
use ticketstore_server::store::{
    EventFilter, EventIncludes, EventStore, PgStore, ReviewFilter, ReviewIncludes, ReviewStore,
    StoreError, TicketFilter, TicketIncludes, TicketStore,
};

async fn pool() -> Option<PgPool> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return None;
    };
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("connect to test database");
    sqlx::migrate!().run(&pool).await.expect("migrations");
    Some(pool)
}

fn authenticator(pool: &PgPool) -> PgAuthenticator {
    PgAuthenticator::new(pool.clone(), TokenSigner::new(SECRET, Duration::days(1)))
}

fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", Uuid::new_v4())
}

async fn account(auth: &PgAuthenticator, prefix: &str) -> User {
    let user = user_from_sign_up(&sign_up_input(&unique_email(prefix), "Buyer"));
    auth.create_account(&user, "before-secret1-after")
        .await
        .expect("create account");
    user
}

#[tokio::test]
async fn test_account_lifecycle() {
    let Some(pool) = pool().await else { return };
    let auth = authenticator(&pool);
    let jane = account(&auth, "jane").await;

    auth.assign_role(&jane, Role::Organizer).await.unwrap();
    auth.assign_role(&jane, Role::Organizer).await.unwrap();
    assert_eq!(auth.roles(&jane).await.unwrap(), vec![Role::Organizer]);

    assert!(auth.check_password(&jane, "before-secret1-after").await.unwrap());
    assert!(!auth.check_password(&jane, "secret1").await.unwrap());

    let found = auth
        .find_by_email(&jane.email.to_uppercase())
        .await
        .unwrap()
        .expect("lookup ignores case");
    assert_eq!(found.id, jane.id);

    let token = auth.issue_token(&jane).await.unwrap();
    let claims = TokenSigner::new(SECRET, Duration::days(1))
        .verify(&token)
        .unwrap();
    assert!(claims.has_role(Role::Organizer));

    auth.delete_account(&jane).await.unwrap();
    assert_eq!(auth.find_by_email(&jane.email).await.unwrap(), None);
    assert!(matches!(
        auth.roles(&jane).await,
        Err(AuthError::UnknownUser(_))
    ));
    assert!(matches!(
        auth.assign_role(&jane, Role::Buyer).await,
        Err(AuthError::UnknownUser(_))
    ));
}

#[tokio::test]
async fn test_duplicate_email_differs_only_in_case() {
    let Some(pool) = pool().await else { return };
    let auth = authenticator(&pool);
    let jane = account(&auth, "dup").await;

    let twin = user_from_sign_up(&sign_up_input(&jane.email.to_uppercase(), "Buyer"));
    assert_eq!(
        auth.create_account(&twin, "pw").await,
        Err(AuthError::DuplicateEmail)
    );
}

#[tokio::test]
async fn test_event_round_trip_keeps_guest_order() {
    let Some(pool) = pool().await else { return };
    let auth = authenticator(&pool);
    let store = PgStore::new(pool);
    let organizer = account(&auth, "org").await;

    let mut input = event_input(&organizer.id);
    input.guests.push(GuestInput {
        first_name: "Dan".to_string(),
        ..input.guests[0].clone()
    });
    let event = event_from_input(&input);
    EventStore::create(&store, &event).await.unwrap();

    let bare = EventStore::find(&store, &event.id, EventIncludes::default())
        .await
        .unwrap()
        .expect("event stored");
    assert!(bare.organizer.is_none());
    assert_eq!(bare.location.id, event.location.id);
    assert_eq!(bare.ticket_types.price_vip_ticket.as_deref(), Some("150"));
    assert_eq!(bare.ticket_types.price_child_ticket, None);
    let names: Vec<_> = bare.guests.iter().map(|g| g.first_name.as_str()).collect();
    assert_eq!(names, ["Ana", "Dan"]);

    let full = EventStore::find(&store, &event.id, EventIncludes::organizer())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(full.organizer.map(|o| o.id), Some(organizer.id.clone()));

    let listed = EventStore::list(
        &store,
        EventFilter::Organizer(organizer.id.clone()),
        None,
        EventIncludes::default(),
    )
    .await
    .unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_event_update_replaces_guests() {
    let Some(pool) = pool().await else { return };
    let auth = authenticator(&pool);
    let store = PgStore::new(pool);
    let organizer = account(&auth, "org").await;

    let mut input = event_input(&organizer.id);
    let mut event = event_from_input(&input);
    EventStore::create(&store, &event).await.unwrap();

    input.id = event.id.clone();
    input.name = "Winter Fest".to_string();
    input.guests[0].first_name = "Ioana".to_string();
    input.guests[0].event_id = event.id.clone();
    let removed = apply_event_update(&mut event, &input);
    EventStore::update(&store, &event, &removed).await.unwrap();

    let stored = EventStore::find(&store, &event.id, EventIncludes::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.name, "Winter Fest");
    let names: Vec<_> = stored.guests.iter().map(|g| g.first_name.as_str()).collect();
    assert_eq!(names, ["Ioana"]);
}

#[tokio::test]
async fn test_missing_references_and_conflicts() {
    let Some(pool) = pool().await else { return };
    let auth = authenticator(&pool);
    let store = PgStore::new(pool);

    let orphan = event_from_input(&event_input("no-such-organizer"));
    assert_eq!(
        EventStore::create(&store, &orphan).await,
        Err(StoreError::MissingReference(
            "Error: The Organizer doesn't exist.".to_string()
        ))
    );

    let organizer = account(&auth, "org").await;
    let buyer = account(&auth, "buyer").await;
    let event = event_from_input(&event_input(&organizer.id));
    EventStore::create(&store, &event).await.unwrap();

    let ghost_buyer = ticket_from_input(&ticket_input("no-such-user", &event.id));
    assert_eq!(
        TicketStore::create(&store, &ghost_buyer).await,
        Err(StoreError::MissingReference(
            "Error: The User doesn't exist.".to_string()
        ))
    );
    let ghost_event = ticket_from_input(&ticket_input(&buyer.id, "no-such-event"));
    assert_eq!(
        TicketStore::create(&store, &ghost_event).await,
        Err(StoreError::MissingReference(
            "Error: The Event doesn't exist.".to_string()
        ))
    );

    let ticket = ticket_from_input(&ticket_input(&buyer.id, &event.id));
    TicketStore::create(&store, &ticket).await.unwrap();
    assert_eq!(
        TicketStore::create(&store, &ticket).await,
        Err(StoreError::Conflict(
            "Error: The Ticket already exists.".to_string()
        ))
    );

    let review = review_from_input(&review_input(&buyer.id, &event.id));
    ReviewStore::create(&store, &review).await.unwrap();
    assert_eq!(
        ReviewStore::create(&store, &review).await,
        Err(StoreError::Conflict(
            "Error: The User already reviewed this Event.".to_string()
        ))
    );
}

#[tokio::test]
async fn test_listings_and_cascading_delete() {
    let Some(pool) = pool().await else { return };
    let auth = authenticator(&pool);
    let store = PgStore::new(pool);
    let organizer = account(&auth, "org").await;
    let buyer = account(&auth, "buyer").await;

    let event = event_from_input(&event_input(&organizer.id));
    EventStore::create(&store, &event).await.unwrap();
    let ticket = ticket_from_input(&ticket_input(&buyer.id, &event.id));
    TicketStore::create(&store, &ticket).await.unwrap();
    let review = review_from_input(&review_input(&buyer.id, &event.id));
    ReviewStore::create(&store, &review).await.unwrap();

    let sold = TicketStore::list(
        &store,
        TicketFilter::SoldByOrganizer(organizer.id.clone()),
        TicketIncludes {
            buyer: true,
            event: true,
        },
    )
    .await
    .unwrap();
    assert_eq!(sold.len(), 1);
    assert_eq!(sold[0].buyer.as_ref().map(|b| &b.id), Some(&buyer.id));
    let sold_event = sold[0].event.as_ref().expect("event loaded");
    assert_eq!(sold_event.guests.len(), 1);
    assert!(sold_event.organizer.is_none());

    let reviews = ReviewStore::list(
        &store,
        ReviewFilter::Organizer(organizer.id.clone()),
        ReviewIncludes {
            user: true,
            event: false,
        },
    )
    .await
    .unwrap();
    assert_eq!(reviews.len(), 1);
    assert!(reviews[0].event.is_none());

    EventStore::delete(&store, &event).await.unwrap();
    assert!(TicketStore::find(&store, &ticket.key(), TicketIncludes::default())
        .await
        .unwrap()
        .is_none());
    assert!(ReviewStore::find(&store, &review.key(), ReviewIncludes::default())
        .await
        .unwrap()
        .is_none());

    assert!(matches!(
        EventStore::update(&store, &event, &[]).await,
        Err(StoreError::MissingReference(_))
    ));
    assert!(matches!(
        TicketStore::update(&store, &ticket).await,
        Err(StoreError::MissingReference(_))
    ));
    assert!(matches!(
        ReviewStore::update(&store, &review).await,
        Err(StoreError::MissingReference(_))
    ));
}
