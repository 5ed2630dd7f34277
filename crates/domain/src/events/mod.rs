//! Domain Events
//!
//! Return types from session record mutations, communicating what happened
//! when state was modified so callers can log and report without diffing.

pub mod activity_events;
pub mod position_events;
pub mod turn_events;

pub use activity_events::*;
pub use position_events::*;
pub use turn_events::*;
