use super::{ensure, require, ValidationError, ValidationResult, RATING_REGEX};
use crate::inputs::ReviewInput;

const MIN_RATING: f64 = 0.0;
const MAX_RATING: f64 = 5.0;

/// Reviews are keyed by `(user_id, event_id)`, so create and edit check the
/// same fields.
pub fn validate_review(input: &ReviewInput) -> ValidationResult {
    require(&input.user_id, "Error: The UserId is required.")?;
    require(&input.event_id, "Error: The EventId is required.")?;
    require(&input.title, "Error: The Title is required.")?;
    require(&input.message, "Error: The Message is required.")?;
    require(&input.rating, "Error: The Rating is required.")?;

    let rating: f64 = input.rating.parse().map_err(|_| {
        ValidationError::new("Error: The Rating is invalid. Valid types: 1, 6.9, 4.20")
    })?;
    ensure(
        (MIN_RATING..=MAX_RATING).contains(&rating),
        "Error: The Rating must be a number between 0 and 5.",
    )?;
    ensure(
        RATING_REGEX.is_match(&input.rating),
        "Error: The Rating must have at most 2 decimals.",
    )
}
