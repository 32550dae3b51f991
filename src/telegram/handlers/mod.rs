//! Dispatcher schema and event handlers

pub mod commands;
pub mod registration;
pub mod schema;
pub mod types;

// Re-exports for convenience
pub use schema::schema;
pub use types::{HandlerDeps, HandlerError};
