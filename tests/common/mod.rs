#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, Utc};

use ticketstore_server::auth::{Authenticator, MemoryAuthenticator, TokenSigner};
use ticketstore_server::inputs::{
    EventInput, GuestInput, LocationInput, ReviewInput, SignUpInput, TicketInput,
    TicketTypesInput,
};
use ticketstore_server::managers::{
    AuthManager, EventManager, PasswordEnhancers, ReviewManager, TicketManager,
};
use ticketstore_server::store::MemoryStore;

pub const SECRET: &str = "0123456789abcdef0123456789abcdef";

pub struct Harness {
    pub store: MemoryStore,
    pub authenticator: MemoryAuthenticator,
    pub auth: AuthManager,
    pub events: EventManager,
    pub tickets: TicketManager,
    pub reviews: ReviewManager,
}

pub fn enhancers() -> PasswordEnhancers {
    PasswordEnhancers::new("before-", "-after")
}

pub fn signer() -> TokenSigner {
    TokenSigner::new(SECRET, Duration::days(1))
}

pub fn harness() -> Harness {
    let store = MemoryStore::new();
    let authenticator = MemoryAuthenticator::new(store.users(), signer());
    harness_with(store, authenticator.clone(), Arc::new(authenticator))
}

/// Like [`harness`], but sign-up goes through `auth`.
pub fn harness_with(
    store: MemoryStore,
    authenticator: MemoryAuthenticator,
    auth: Arc<dyn Authenticator>,
) -> Harness {
    let shared = Arc::new(store.clone());
    Harness {
        auth: AuthManager::new(auth, enhancers()),
        events: EventManager::new(shared.clone()),
        tickets: TicketManager::new(shared.clone()),
        reviews: ReviewManager::new(shared),
        store,
        authenticator,
    }
}

pub fn sign_up_input(email: &str, role: &str) -> SignUpInput {
    SignUpInput {
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        email: email.to_string(),
        phone_number: "723-456-7890".to_string(),
        phone_prefix: "+40".to_string(),
        age: 28,
        is_student: false,
        password: "secret1".to_string(),
        role: role.to_string(),
    }
}

impl Harness {
    /// Signs a user up and returns their id.
    pub async fn user(&self, email: &str, role: &str) -> String {
        self.auth
            .sign_up(&sign_up_input(email, role))
            .await
            .expect("sign up");
        self.auth.get_user(email).await.expect("user exists").id
    }
}

pub fn event_input(organizer_id: &str) -> EventInput {
    EventInput {
        id: String::new(),
        name: "Summer Fest".to_string(),
        short_name: "SF".to_string(),
        description: "Open air festival".to_string(),
        start_date: Utc::now() + Duration::days(30),
        end_date: Utc::now() + Duration::days(32),
        category: "Concert".to_string(),
        genre: "Pop".to_string(),
        organizer_id: organizer_id.to_string(),
        location: LocationInput {
            building_name: "Arena".to_string(),
            address_full_name: "1 Main St".to_string(),
            locality: "Cluj-Napoca".to_string(),
            state: "Cluj".to_string(),
            state_code: "CJ".to_string(),
            country: "Romania".to_string(),
            country_code: "RO".to_string(),
            postal_code: "400000".to_string(),
            latitude: 46.77,
            longitude: 23.59,
            geocode_accuracy: "ROOFTOP".to_string(),
        },
        ticket_types: TicketTypesInput {
            number_standard_tickets: 500,
            price_standard_ticket: "49.99".to_string(),
            number_vip_tickets: 50,
            price_vip_ticket: Some("150".to_string()),
            price_child_ticket: None,
            price_student_ticket: Some("25".to_string()),
            price_currency: "RON".to_string(),
        },
        guests: vec![GuestInput {
            first_name: "Ana".to_string(),
            last_name: "Pop".to_string(),
            scene_name: "AP".to_string(),
            description: "Singer".to_string(),
            category: "Music".to_string(),
            genre: "Pop".to_string(),
            age: 30,
            event_id: String::new(),
        }],
    }
}

pub fn ticket_input(user_id: &str, event_id: &str) -> TicketInput {
    TicketInput {
        user_id: user_id.to_string(),
        event_id: event_id.to_string(),
        auxiliary_id: String::new(),
        ticket_type: "STANDARD".to_string(),
        price: "49.99".to_string(),
        price_currency: "RON".to_string(),
    }
}

pub fn review_input(user_id: &str, event_id: &str) -> ReviewInput {
    ReviewInput {
        user_id: user_id.to_string(),
        event_id: event_id.to_string(),
        title: "Great night".to_string(),
        message: "Loved every minute".to_string(),
        rating: "4.5".to_string(),
    }
}
