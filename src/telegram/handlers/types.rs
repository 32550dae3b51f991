//! Handler types and dependencies

use std::sync::Arc;

use crate::storage::db::DbPool;
use crate::telegram::state::RegistrationTracker;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub db_pool: Arc<DbPool>,
    pub tracker: Arc<RegistrationTracker>,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(db_pool: Arc<DbPool>, tracker: Arc<RegistrationTracker>) -> Self {
        Self { db_pool, tracker }
    }
}
