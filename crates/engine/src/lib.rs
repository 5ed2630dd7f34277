//! Gamenight Engine library.
//!
//! Owns the live session record for a chat-run tabletop game and exposes
//! every change to it as a command.
//!
//! ## Structure
//!
//! - `use_cases/` - One struct per command, grouped by area
//! - `infrastructure/` - State store, JSON persistence, terrain files, clock
//! - `api/` - Command dispatcher and HTTP routes
//! - `app` - Application composition
//! - `config` - Environment configuration

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
pub use config::EngineConfig;
pub use error::EngineError;
