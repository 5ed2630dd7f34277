//! Port traits for infrastructure boundaries.
//!
//! Ports exist for:
//! - Session record storage (JSON file today, anything atomic tomorrow)
//! - Clock (for testing the turn timer without waiting)

mod error;
mod repos;
mod testing;

pub use error::StorageError;
pub use repos::SessionPersistence;
pub use testing::ClockPort;

#[cfg(test)]
pub use repos::MockSessionPersistence;

#[cfg(test)]
pub use testing::MockClockPort;
