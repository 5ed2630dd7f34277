//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies and the
//! state store that serialises every write to the session record.

pub mod clock;
pub mod persistence;
pub mod ports;
pub mod state_store;
pub mod terrain;

pub use state_store::StateStore;
pub use terrain::FsTerrainCatalog;
