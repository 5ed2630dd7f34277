//! Use cases - one struct per command.
//!
//! Each module groups the use cases for one area of the session. Writes go
//! through the [`StateStore`](crate::infrastructure::StateStore); reads take
//! a snapshot and never wait on a writer.

pub mod activity;
pub mod movement;
pub mod narrative;
pub mod session;
pub mod status;
pub mod turn;

#[cfg(test)]
pub(crate) mod test_support;

pub use activity::ActivityUseCases;
pub use movement::MovementUseCases;
pub use narrative::NarrativeUseCases;
pub use session::SessionUseCases;
pub use status::StatusUseCases;
pub use turn::TurnUseCases;
