//! Miacbot - Telegram registration bot for the municipal medical
//! appointment service (MIAC Sevastopol)
//!
//! The bot greets users, collects personal-identification data (full name,
//! phone, birth date) in a short multi-step conversation and persists
//! registrations to a local SQLite store.
//!
//! # Module Structure
//!
//! - `core`: configuration, logging, and input validation
//! - `storage`: SQLite-backed registration store and migrations
//! - `telegram`: bot integration, conversation state, and handlers

pub mod cli;
pub mod core;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use crate::core::config;
pub use storage::{create_pool, get_connection, DbConnection, DbPool};
pub use telegram::{schema, HandlerDeps, RegistrationState, RegistrationTracker};
