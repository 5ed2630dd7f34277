//! API layer - the command dispatcher and its HTTP entry points.

pub mod commands;
pub mod http;

pub use commands::dispatch;
