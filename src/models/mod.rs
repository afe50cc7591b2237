pub mod event;
pub mod review;
pub mod ticket;
pub mod user;

pub use event::{Event, Guest, Location, TicketTypes};
pub use review::{Review, ReviewKey};
pub use ticket::{Currency, Ticket, TicketKey, TicketType};
pub use user::{Role, User};
