//! Application state management.

use mongodb::{Client, Database};

/// Shared application state.
///
/// The store handles are `None` when the startup connection failed; the
/// server still runs and the data routes report the outage per request.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// MongoDB client (cloneable, shares underlying connection pool)
    pub mongo_client: Option<Client>,
    /// MongoDB database instance
    pub db: Option<Database>,
}
