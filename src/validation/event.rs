use chrono::{DateTime, Utc};

use super::{ensure, require, ValidationResult, WriteMode, NAME_REGEX, PRICE_REGEX};
use crate::inputs::{EventInput, GuestInput, LocationInput, TicketTypesInput};
use crate::models::Currency;

/// Validates an event against the current time.
pub fn validate_event(input: &EventInput, mode: WriteMode) -> ValidationResult {
    validate_event_at(input, mode, Utc::now())
}

/// Validates an event as if the current time were `now`.
pub fn validate_event_at(
    input: &EventInput,
    mode: WriteMode,
    now: DateTime<Utc>,
) -> ValidationResult {
    if mode.is_edit() {
        require(&input.id, "Error: The Id is required.")?;
    }

    require(&input.name, "Error: The Name is required.")?;
    require(&input.short_name, "Error: The ShortName is required")?;
    require(&input.description, "Error: The Description is required")?;

    ensure(
        input.start_date >= now,
        "Error: The StartDate cannot be in the past",
    )?;
    ensure(
        input.start_date <= input.end_date,
        "Error: The StartDate cannot be after the EndDate",
    )?;

    require(&input.category, "Error: The Category is required")?;
    require(&input.genre, "Error: The Genre is required")?;
    require(&input.organizer_id, "Error: The OrganizerId is required")?;

    validate_location(&input.location)?;
    validate_ticket_types(&input.ticket_types)?;

    input
        .guests
        .iter()
        .try_for_each(|guest| validate_guest(guest, mode))
}

fn validate_location(location: &LocationInput) -> ValidationResult {
    require(
        &location.building_name,
        "Location Error: The BuildingName is required.",
    )?;
    require(
        &location.address_full_name,
        "Location Error: The AddressFullName is required.",
    )?;
    require(&location.locality, "Location Error: The Locality is required.")?;
    require(&location.state, "Location Error: The State is required.")?;
    require(&location.state_code, "Location Error: The StateCode is required.")?;
    require(&location.country, "Location Error: The Country is required.")?;
    require(
        &location.country_code,
        "Location Error: The CountryCode is required.",
    )?;
    require(
        &location.postal_code,
        "Location Error: The PostalCode is required.",
    )?;
    ensure(
        location.latitude != 0.0,
        "Location Error: The Latitude is required.",
    )?;
    ensure(
        location.longitude != 0.0,
        "Location Error: The Longitude is required.",
    )?;
    require(
        &location.geocode_accuracy,
        "Location Error: The GeocodeAccuracy is required.",
    )
}

fn validate_ticket_types(ticket_types: &TicketTypesInput) -> ValidationResult {
    ensure(
        ticket_types.number_standard_tickets > 0,
        "TicketTypes Error: The Number of Standard Tickets must be a positive integer.",
    )?;
    require(
        &ticket_types.price_standard_ticket,
        "TicketTypes Error: The PriceStandardTicket is required.",
    )?;
    ensure(
        PRICE_REGEX.is_match(&ticket_types.price_standard_ticket),
        "TicketTypes Error: The PriceStandardTicket is invalid.",
    )?;

    // An event does not have to sell VIP tickets at all.
    ensure(
        ticket_types.number_vip_tickets >= 0,
        "TicketTypes Error: The Number of Vip Tickets cannot be negative.",
    )?;
    let vip_price = non_empty(&ticket_types.price_vip_ticket);
    ensure(
        ticket_types.number_vip_tickets == 0 || vip_price.is_some(),
        "TicketTypes Error: The PriceVipTicket is required.",
    )?;

    // A missing price means the category is not on sale.
    let optional_prices = [
        (vip_price, "TicketTypes Error: The PriceVipTicket is invalid."),
        (
            non_empty(&ticket_types.price_child_ticket),
            "TicketTypes Error: The PriceChildTicket is invalid.",
        ),
        (
            non_empty(&ticket_types.price_student_ticket),
            "TicketTypes Error: The PriceStudentTicket is invalid.",
        ),
    ];
    for (price, message) in optional_prices {
        if let Some(price) = price {
            ensure(PRICE_REGEX.is_match(price), message)?;
        }
    }

    require(
        &ticket_types.price_currency,
        "TicketTypes Error: The PriceCurrency is required.",
    )?;
    ensure(
        ticket_types.price_currency.parse::<Currency>().is_ok(),
        "TicketTypes Error: The PriceCurrency is invalid. Valid types are: USD, EUR, GBT and RON",
    )
}

fn validate_guest(guest: &GuestInput, mode: WriteMode) -> ValidationResult {
    require(&guest.first_name, "The FirstName is required.")?;
    ensure(
        NAME_REGEX.is_match(&guest.first_name),
        "Error: The FirstName must contain only letters.",
    )?;
    require(&guest.last_name, "The LastName is required.")?;
    ensure(
        NAME_REGEX.is_match(&guest.last_name),
        "Error: The LastName must contain only letters.",
    )?;
    require(&guest.scene_name, "Error: The SceneName is required.")?;
    require(&guest.description, "Error: The Description is required.")?;
    require(&guest.category, "Error: The Category is required.")?;
    require(&guest.genre, "Error: The Genre is required")?;
    ensure(guest.age > 0, "Error: The Age must be a positive integer.")?;
    if mode.is_edit() {
        require(&guest.event_id, "Error: The EventId is required.")?;
    }
    Ok(())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
