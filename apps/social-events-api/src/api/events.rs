//! Events API routes
//!
//! Wires the events domain to the shared MongoDB database, or to a
//! placeholder repository when the startup connection failed.

use axum::Router;
use domain_events::{
    EventResult, EventService, MongoEventRepository, UnavailableEventRepository, handlers,
};
use mongodb::Database;
use tracing::warn;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    match &state.db {
        Some(db) => handlers::router(EventService::new(MongoEventRepository::new(db))),
        None => {
            warn!("MongoDB unavailable; event routes will report errors");
            handlers::router(EventService::new(UnavailableEventRepository))
        }
    }
}

/// Ensure event indexes. The service logs failures.
pub async fn init_indexes(db: &Database) -> EventResult<()> {
    EventService::new(MongoEventRepository::new(db))
        .init_indexes()
        .await
}
