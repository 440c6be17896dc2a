//! Readiness and metrics endpoints

use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use database::mongodb::check_health_detailed;
use domain_events::NOT_CONNECTED;
use observability::metrics_handler;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Readiness check - pings MongoDB
async fn readiness_check(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "mongodb",
        Box::pin(async {
            let Some(client) = &state.mongo_client else {
                return Err(NOT_CONNECTED.to_string());
            };
            let status = check_health_detailed(client).await;
            if status.healthy {
                Ok(())
            } else {
                Err(status.message.unwrap_or_else(|| "ping failed".to_string()))
            }
        }),
    )];

    match run_health_checks(checks).await {
        Ok(ready) => ready.into_response(),
        Err(not_ready) => not_ready.into_response(),
    }
}
