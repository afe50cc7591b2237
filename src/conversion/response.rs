use thiserror::Error;

use crate::models::{Event, Guest, Location, Review, Ticket, TicketTypes, User};
use crate::views::{
    EventView, GuestView, LocationView, ReviewView, TicketTypesView, TicketView, UserView,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("{entity}.{association} was not loaded")]
    AssociationNotLoaded {
        entity: &'static str,
        association: &'static str,
    },
}

fn loaded<'a, T>(
    value: &'a Option<T>,
    entity: &'static str,
    association: &'static str,
) -> Result<&'a T, ConversionError> {
    value
        .as_ref()
        .ok_or(ConversionError::AssociationNotLoaded {
            entity,
            association,
        })
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone_number: user.phone_number.clone(),
            phone_prefix: user.phone_prefix.clone(),
            age: user.age,
            is_student: user.is_student,
            join_date: user.created_at,
            events_created: Vec::new(),
            tickets_bought: Vec::new(),
            reviews: Vec::new(),
        }
    }
}

impl From<&Location> for LocationView {
    fn from(location: &Location) -> Self {
        Self {
            id: location.id.clone(),
            building_name: location.building_name.clone(),
            address_full_name: location.address_full_name.clone(),
            locality: location.locality.clone(),
            state: location.state.clone(),
            state_code: location.state_code.clone(),
            country: location.country.clone(),
            country_code: location.country_code.clone(),
            postal_code: location.postal_code.clone(),
            latitude: location.latitude,
            longitude: location.longitude,
            geocode_accuracy: location.geocode_accuracy.clone(),
        }
    }
}

impl From<&TicketTypes> for TicketTypesView {
    fn from(ticket_types: &TicketTypes) -> Self {
        Self {
            id: ticket_types.id.clone(),
            number_standard_tickets: ticket_types.number_standard_tickets,
            price_standard_ticket: ticket_types.price_standard_ticket.clone(),
            number_vip_tickets: ticket_types.number_vip_tickets,
            price_vip_ticket: ticket_types.price_vip_ticket.clone(),
            price_child_ticket: ticket_types.price_child_ticket.clone(),
            price_student_ticket: ticket_types.price_student_ticket.clone(),
            price_currency: ticket_types.price_currency.clone(),
        }
    }
}

impl From<&Guest> for GuestView {
    fn from(guest: &Guest) -> Self {
        Self {
            id: guest.id.clone(),
            first_name: guest.first_name.clone(),
            last_name: guest.last_name.clone(),
            scene_name: guest.scene_name.clone(),
            description: guest.description.clone(),
            category: guest.category.clone(),
            genre: guest.genre.clone(),
            age: guest.age,
            event_id: guest.event_id.clone(),
        }
    }
}

/// Scalar fields only. Used when an event is embedded in a ticket or review.
impl From<&Event> for EventView {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            name: event.name.clone(),
            short_name: event.short_name.clone(),
            description: event.description.clone(),
            start_date: event.start_date,
            end_date: event.end_date,
            category: event.category.clone(),
            genre: event.genre.clone(),
            organizer_id: event.organizer_id.clone(),
            location: None,
            ticket_types: None,
            organizer: None,
            guests: Vec::new(),
        }
    }
}

/// The full event: owned records plus the organizer.
pub fn event_view_detailed(event: &Event) -> Result<EventView, ConversionError> {
    let organizer = loaded(&event.organizer, "Event", "organizer")?;
    Ok(EventView {
        location: Some(LocationView::from(&event.location)),
        ticket_types: Some(TicketTypesView::from(&event.ticket_types)),
        organizer: Some(UserView::from(organizer)),
        guests: event.guests.iter().map(GuestView::from).collect(),
        ..EventView::from(event)
    })
}

impl From<&Ticket> for TicketView {
    fn from(ticket: &Ticket) -> Self {
        Self {
            user_id: ticket.user_id.clone(),
            event_id: ticket.event_id.clone(),
            auxiliary_id: ticket.auxiliary_id.clone(),
            ticket_type: ticket.ticket_type.clone(),
            price: ticket.price.clone(),
            price_currency: ticket.price_currency.clone(),
            bought_time: ticket.updated_at,
            buyer: None,
            event: None,
        }
    }
}

pub fn ticket_view_with_buyer(ticket: &Ticket) -> Result<TicketView, ConversionError> {
    let buyer = loaded(&ticket.buyer, "Ticket", "buyer")?;
    Ok(TicketView {
        buyer: Some(UserView::from(buyer)),
        ..TicketView::from(ticket)
    })
}

pub fn ticket_view_with_event(ticket: &Ticket) -> Result<TicketView, ConversionError> {
    let event = loaded(&ticket.event, "Ticket", "event")?;
    Ok(TicketView {
        event: Some(EventView::from(event)),
        ..TicketView::from(ticket)
    })
}

pub fn ticket_view_with_buyer_and_event(ticket: &Ticket) -> Result<TicketView, ConversionError> {
    let event = loaded(&ticket.event, "Ticket", "event")?;
    Ok(TicketView {
        event: Some(EventView::from(event)),
        ..ticket_view_with_buyer(ticket)?
    })
}

impl From<&Review> for ReviewView {
    fn from(review: &Review) -> Self {
        Self {
            user_id: review.user_id.clone(),
            event_id: review.event_id.clone(),
            title: review.title.clone(),
            message: review.message.clone(),
            rating: review.rating.clone(),
            date: review.updated_at,
            user: None,
            event: None,
        }
    }
}

pub fn review_view_with_user(review: &Review) -> Result<ReviewView, ConversionError> {
    let user = loaded(&review.user, "Review", "user")?;
    Ok(ReviewView {
        user: Some(UserView::from(user)),
        ..ReviewView::from(review)
    })
}

pub fn review_view_with_event(review: &Review) -> Result<ReviewView, ConversionError> {
    let event = loaded(&review.event, "Review", "event")?;
    Ok(ReviewView {
        event: Some(EventView::from(event)),
        ..ReviewView::from(review)
    })
}

pub fn review_view_with_user_and_event(review: &Review) -> Result<ReviewView, ConversionError> {
    let event = loaded(&review.event, "Review", "event")?;
    Ok(ReviewView {
        event: Some(EventView::from(event)),
        ..review_view_with_user(review)?
    })
}
