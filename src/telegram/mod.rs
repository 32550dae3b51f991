//! Telegram bot integration: commands, state machine, dispatcher schema

pub mod bot;
pub mod handlers;
pub mod state;
pub mod texts;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, Command};
pub use handlers::{schema, HandlerDeps, HandlerError};
pub use state::{RegistrationState, RegistrationTracker};
