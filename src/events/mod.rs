//! Runtime events: the [`Event`] type, [`EventKind`] classification, and the
//! broadcast [`Bus`] they travel on.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
