//! API routes module

pub mod events;
pub mod health;
pub mod root;

use axum::Router;

use crate::state::AppState;

/// All application routes, merged at the root.
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .merge(root::router())
        .merge(events::router(state))
        .merge(health::router(state.clone()))
}
