//! Mapping between request bodies, stored records and response bodies.
//!
//! [`entity`] builds or edits stored records from validated input.
//! [`response`] projects stored records into views. Variants that embed an
//! association refuse to run when the store did not load it.

pub mod entity;
pub mod response;

pub use entity::{
    apply_event_update, apply_review_update, apply_ticket_update, event_from_input,
    review_from_input, ticket_from_input, user_from_sign_up,
};
pub use response::{
    event_view_detailed, review_view_with_event, review_view_with_user,
    review_view_with_user_and_event, ticket_view_with_buyer, ticket_view_with_buyer_and_event,
    ticket_view_with_event, ConversionError,
};
