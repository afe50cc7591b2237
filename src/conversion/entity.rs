use std::mem;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::inputs::{
    EventInput, GuestInput, LocationInput, ReviewInput, SignUpInput, TicketInput,
    TicketTypesInput,
};
use crate::models::{Event, Guest, Location, Review, Ticket, TicketTypes, User};

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn user_from_sign_up(input: &SignUpInput) -> User {
    let now = Utc::now();
    User {
        id: new_id(),
        email: input.email.clone(),
        user_name: input.email.clone(),
        first_name: input.first_name.clone(),
        last_name: input.last_name.clone(),
        phone_number: input.phone_number.clone(),
        phone_prefix: input.phone_prefix.clone(),
        age: input.age,
        is_student: input.is_student,
        created_at: now,
        updated_at: now,
    }
}

/// Builds a new event and the records it owns. Every record gets a fresh
/// id and shares one creation timestamp.
pub fn event_from_input(input: &EventInput) -> Event {
    let now = Utc::now();
    let id = new_id();

    Event {
        name: input.name.clone(),
        short_name: input.short_name.clone(),
        description: input.description.clone(),
        start_date: input.start_date,
        end_date: input.end_date,
        category: input.category.clone(),
        genre: input.genre.clone(),
        organizer_id: input.organizer_id.clone(),
        location: location_from_input(&input.location, now),
        ticket_types: ticket_types_from_input(&input.ticket_types, now),
        guests: guests_from_input(&input.guests, &id, now),
        organizer: None,
        created_at: now,
        updated_at: now,
        id,
    }
}

/// Overwrites the mutable fields of `event` in place.
///
/// Location and ticket types keep their ids and creation time. Guests are
/// replaced wholesale; the displaced list is returned so the caller can
/// remove it from the store.
pub fn apply_event_update(event: &mut Event, input: &EventInput) -> Vec<Guest> {
    let now = Utc::now();

    event.name = input.name.clone();
    event.short_name = input.short_name.clone();
    event.description = input.description.clone();
    event.start_date = input.start_date;
    event.end_date = input.end_date;
    event.category = input.category.clone();
    event.genre = input.genre.clone();
    event.organizer_id = input.organizer_id.clone();
    apply_location_update(&mut event.location, &input.location, now);
    apply_ticket_types_update(&mut event.ticket_types, &input.ticket_types, now);
    event.updated_at = now;

    let guests = guests_from_input(&input.guests, &event.id, now);
    mem::replace(&mut event.guests, guests)
}

fn location_from_input(input: &LocationInput, now: DateTime<Utc>) -> Location {
    let mut location = Location {
        id: new_id(),
        building_name: String::new(),
        address_full_name: String::new(),
        locality: String::new(),
        state: String::new(),
        state_code: String::new(),
        country: String::new(),
        country_code: String::new(),
        postal_code: String::new(),
        latitude: 0.0,
        longitude: 0.0,
        geocode_accuracy: String::new(),
        created_at: now,
        updated_at: now,
    };
    apply_location_update(&mut location, input, now);
    location
}

fn apply_location_update(location: &mut Location, input: &LocationInput, now: DateTime<Utc>) {
    location.building_name = input.building_name.clone();
    location.address_full_name = input.address_full_name.clone();
    location.locality = input.locality.clone();
    location.state = input.state.clone();
    location.state_code = input.state_code.clone();
    location.country = input.country.clone();
    location.country_code = input.country_code.clone();
    location.postal_code = input.postal_code.clone();
    location.latitude = input.latitude;
    location.longitude = input.longitude;
    location.geocode_accuracy = input.geocode_accuracy.clone();
    location.updated_at = now;
}

fn ticket_types_from_input(input: &TicketTypesInput, now: DateTime<Utc>) -> TicketTypes {
    let mut ticket_types = TicketTypes {
        id: new_id(),
        number_standard_tickets: 0,
        price_standard_ticket: String::new(),
        number_vip_tickets: 0,
        price_vip_ticket: None,
        price_child_ticket: None,
        price_student_ticket: None,
        price_currency: String::new(),
        created_at: now,
        updated_at: now,
    };
    apply_ticket_types_update(&mut ticket_types, input, now);
    ticket_types
}

fn apply_ticket_types_update(
    ticket_types: &mut TicketTypes,
    input: &TicketTypesInput,
    now: DateTime<Utc>,
) {
    ticket_types.number_standard_tickets = input.number_standard_tickets;
    ticket_types.price_standard_ticket = input.price_standard_ticket.clone();
    ticket_types.number_vip_tickets = input.number_vip_tickets;
    ticket_types.price_vip_ticket = input.price_vip_ticket.clone();
    ticket_types.price_child_ticket = input.price_child_ticket.clone();
    ticket_types.price_student_ticket = input.price_student_ticket.clone();
    ticket_types.price_currency = input.price_currency.clone();
    ticket_types.updated_at = now;
}

// Guests always belong to the event they are written with, whatever event
// id the body carried.
fn guests_from_input(inputs: &[GuestInput], event_id: &str, now: DateTime<Utc>) -> Vec<Guest> {
    inputs
        .iter()
        .map(|guest| Guest {
            id: new_id(),
            event_id: event_id.to_string(),
            first_name: guest.first_name.clone(),
            last_name: guest.last_name.clone(),
            scene_name: guest.scene_name.clone(),
            description: guest.description.clone(),
            category: guest.category.clone(),
            genre: guest.genre.clone(),
            age: guest.age,
            created_at: now,
            updated_at: now,
        })
        .collect()
}

/// Builds a new ticket. The auxiliary id is allocated here so that a buyer
/// can hold several tickets for one event.
pub fn ticket_from_input(input: &TicketInput) -> Ticket {
    let now = Utc::now();
    Ticket {
        user_id: input.user_id.clone(),
        event_id: input.event_id.clone(),
        auxiliary_id: new_id(),
        ticket_type: input.ticket_type.clone(),
        price: input.price.clone(),
        price_currency: input.price_currency.clone(),
        buyer: None,
        event: None,
        created_at: now,
        updated_at: now,
    }
}

/// The key fields identify the ticket and are left untouched.
pub fn apply_ticket_update(ticket: &mut Ticket, input: &TicketInput) {
    ticket.ticket_type = input.ticket_type.clone();
    ticket.price = input.price.clone();
    ticket.price_currency = input.price_currency.clone();
    ticket.updated_at = Utc::now();
}

pub fn review_from_input(input: &ReviewInput) -> Review {
    let now = Utc::now();
    Review {
        user_id: input.user_id.clone(),
        event_id: input.event_id.clone(),
        title: input.title.clone(),
        message: input.message.clone(),
        rating: input.rating.clone(),
        user: None,
        event: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn apply_review_update(review: &mut Review, input: &ReviewInput) {
    review.title = input.title.clone();
    review.message = input.message.clone();
    review.rating = input.rating.clone();
    review.updated_at = Utc::now();
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn event_input() -> EventInput {
        EventInput {
            name: "Jazz Evening".to_string(),
            short_name: "JE".to_string(),
            description: "Quartet".to_string(),
            start_date: Utc::now() + Duration::days(3),
            end_date: Utc::now() + Duration::days(4),
            category: "Concert".to_string(),
            genre: "Jazz".to_string(),
            organizer_id: "org-1".to_string(),
            location: LocationInput {
                building_name: "Hall".to_string(),
                locality: "Iasi".to_string(),
                latitude: 47.1,
                longitude: 27.6,
                ..LocationInput::default()
            },
            ticket_types: TicketTypesInput {
                number_standard_tickets: 100,
                price_standard_ticket: "30".to_string(),
                price_currency: "EUR".to_string(),
                ..TicketTypesInput::default()
            },
            guests: vec![GuestInput {
                first_name: "Miles".to_string(),
                event_id: "someone-else".to_string(),
                ..GuestInput::default()
            }],
            ..EventInput::default()
        }
    }

    #[test]
    fn test_event_from_input_stamps_and_links() {
        let event = event_from_input(&event_input());

        assert!(!event.id.is_empty());
        assert_eq!(event.created_at, event.updated_at);
        assert_eq!(event.location.created_at, event.created_at);
        assert_eq!(event.location.locality, "Iasi");
        assert_eq!(event.ticket_types.price_currency, "EUR");
        assert_eq!(event.guests.len(), 1);
        assert_eq!(event.guests[0].event_id, event.id);
        assert!(event.organizer.is_none());
    }

    #[test]
    fn test_ids_are_unique_per_record() {
        let first = event_from_input(&event_input());
        let second = event_from_input(&event_input());
        assert_ne!(first.id, second.id);
        assert_ne!(first.location.id, first.ticket_types.id);
    }

    #[test]
    fn test_apply_event_update_keeps_identity() {
        let mut event = event_from_input(&event_input());
        let original = event.clone();

        let mut input = event_input();
        input.id = event.id.clone();
        input.name = "Jazz Night".to_string();
        input.location.locality = "Brasov".to_string();
        input.ticket_types.number_vip_tickets = 10;
        input.ticket_types.price_vip_ticket = Some("90".to_string());
        input.guests = vec![
            GuestInput {
                first_name: "Nina".to_string(),
                ..GuestInput::default()
            },
            GuestInput {
                first_name: "Ella".to_string(),
                ..GuestInput::default()
            },
        ];

        let removed = apply_event_update(&mut event, &input);

        assert_eq!(removed, original.guests);
        assert_eq!(event.id, original.id);
        assert_eq!(event.created_at, original.created_at);
        assert!(event.updated_at >= original.updated_at);
        assert_eq!(event.name, "Jazz Night");

        assert_eq!(event.location.id, original.location.id);
        assert_eq!(event.location.created_at, original.location.created_at);
        assert_eq!(event.location.locality, "Brasov");

        assert_eq!(event.ticket_types.id, original.ticket_types.id);
        assert_eq!(event.ticket_types.price_vip_ticket.as_deref(), Some("90"));

        assert_eq!(event.guests.len(), 2);
        assert!(event.guests.iter().all(|g| g.event_id == event.id));
        assert!(event
            .guests
            .iter()
            .all(|g| original.guests.iter().all(|old| old.id != g.id)));
    }

    #[test]
    fn test_ticket_conversion() {
        let input = TicketInput {
            user_id: "u1".to_string(),
            event_id: "e1".to_string(),
            auxiliary_id: "ignored".to_string(),
            ticket_type: "VIP".to_string(),
            price: "99.50".to_string(),
            price_currency: "USD".to_string(),
        };
        let mut ticket = ticket_from_input(&input);
        assert_ne!(ticket.auxiliary_id, "ignored");
        assert!(!ticket.auxiliary_id.is_empty());

        let key = ticket.key();
        let created_at = ticket.created_at;
        let edit = TicketInput {
            user_id: "other".to_string(),
            ticket_type: "STUDENT".to_string(),
            price: "10".to_string(),
            ..input
        };
        apply_ticket_update(&mut ticket, &edit);

        assert_eq!(ticket.key(), key);
        assert_eq!(ticket.created_at, created_at);
        assert_eq!(ticket.ticket_type, "STUDENT");
        assert_eq!(ticket.price, "10");
    }

    #[test]
    fn test_review_conversion() {
        let input = ReviewInput {
            user_id: "u1".to_string(),
            event_id: "e1".to_string(),
            title: "Nice".to_string(),
            message: "Good sound".to_string(),
            rating: "4".to_string(),
        };
        let mut review = review_from_input(&input);
        let created_at = review.created_at;

        apply_review_update(
            &mut review,
            &ReviewInput {
                rating: "2.5".to_string(),
                ..input
            },
        );
        assert_eq!(review.rating, "2.5");
        assert_eq!(review.title, "Nice");
        assert_eq!(review.created_at, created_at);
    }

    #[test]
    fn test_user_name_is_the_email() {
        let user = user_from_sign_up(&SignUpInput {
            email: "jane@example.com".to_string(),
            first_name: "Jane".to_string(),
            ..SignUpInput::default()
        });
        assert_eq!(user.user_name, "jane@example.com");
        assert_eq!(user.created_at, user.updated_at);
    }
}
