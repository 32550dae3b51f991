//! Core utilities: configuration, logging, and input validation

pub mod config;
pub mod logging;
pub mod validation;

// Re-exports for convenience
pub use logging::{init_logger, log_startup_configuration};
