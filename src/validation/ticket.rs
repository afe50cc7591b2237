use super::{ensure, require, ValidationResult, WriteMode, PRICE_REGEX};
use crate::inputs::TicketInput;
use crate::models::{Currency, TicketType};

pub fn validate_ticket(input: &TicketInput, mode: WriteMode) -> ValidationResult {
    require(&input.user_id, "Error: The UserId is required.")?;
    require(&input.event_id, "Error: The EventId is required.")?;
    // The auxiliary id is allocated on create, so only an edit names one.
    if mode.is_edit() {
        require(&input.auxiliary_id, "Error: The AuxiliaryId is required.")?;
    }

    require(&input.ticket_type, "Error: The TicketType is required.")?;
    ensure(
        input.ticket_type.parse::<TicketType>().is_ok(),
        "Error: The TicketType is invalid. Valid types are: STANDARD, VIP, CHILD and STUDENT",
    )?;

    require(&input.price, "Error: The Price is required.")?;
    ensure(
        PRICE_REGEX.is_match(&input.price),
        "Error: The Price must be a positive number with at most 2 decimals.",
    )?;

    require(&input.price_currency, "Error: The PriceCurrency is required.")?;
    ensure(
        input.price_currency.parse::<Currency>().is_ok(),
        "Error: The PriceCurrency is invalid. Valid types are: USD, EUR, GBT and RON",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_ticket() -> TicketInput {
        TicketInput {
            user_id: "user-1".to_string(),
            event_id: "evt-1".to_string(),
            auxiliary_id: String::new(),
            ticket_type: "STANDARD".to_string(),
            price: "49.99".to_string(),
            price_currency: "EUR".to_string(),
        }
    }

    fn message(input: &TicketInput, mode: WriteMode) -> String {
        validate_ticket(input, mode).unwrap_err().into_message()
    }

    #[test]
    fn test_valid_ticket_passes_on_create() {
        assert!(validate_ticket(&valid_ticket(), WriteMode::Create).is_ok());
    }

    #[test]
    fn test_auxiliary_id_only_required_when_editing() {
        assert_eq!(
            message(&valid_ticket(), WriteMode::Edit),
            "Error: The AuxiliaryId is required."
        );
        let input = TicketInput {
            auxiliary_id: "aux-1".to_string(),
            ..valid_ticket()
        };
        assert!(validate_ticket(&input, WriteMode::Edit).is_ok());
    }

    #[test]
    fn test_unknown_ticket_type_is_rejected() {
        let input = TicketInput {
            ticket_type: "PREMIUM".to_string(),
            ..valid_ticket()
        };
        assert_eq!(
            message(&input, WriteMode::Create),
            "Error: The TicketType is invalid. Valid types are: STANDARD, VIP, CHILD and STUDENT"
        );
    }

    #[test]
    fn test_price_rules() {
        for price in ["-1", "12.345", "abc", "1e3"] {
            let input = TicketInput {
                price: price.to_string(),
                ..valid_ticket()
            };
            assert_eq!(
                message(&input, WriteMode::Create),
                "Error: The Price must be a positive number with at most 2 decimals.",
                "price {price}"
            );
        }
    }

    #[test]
    fn test_currency_rules() {
        let input = TicketInput {
            price_currency: String::new(),
            ..valid_ticket()
        };
        assert_eq!(
            message(&input, WriteMode::Create),
            "Error: The PriceCurrency is required."
        );
    }

    #[test]
    fn test_ids_checked_first() {
        let input = TicketInput {
            event_id: String::new(),
            ticket_type: String::new(),
            ..valid_ticket()
        };
        assert_eq!(
            message(&input, WriteMode::Create),
            "Error: The EventId is required."
        );
    }
}
