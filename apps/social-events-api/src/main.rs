use axum::middleware;
use axum_helpers::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::{error, info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    if let Err(e) = observability::init_metrics() {
        warn!(error = %e, "Metrics recorder unavailable");
    }

    info!("Connecting to MongoDB at {}", config.mongodb.redacted_url());

    // Without a verified connection, fall back to a lazy client that recovers
    // once the store is reachable. `None` only when the options are unusable.
    let (mongo_client, verified) =
        match database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await {
            Ok(client) => (Some(client), true),
            Err(e) => {
                error!(error = %e, "MongoDB connection failed");
                match database::mongodb::connect_lazy(&config.mongodb).await {
                    Ok(client) => {
                        warn!("Serving with an unverified MongoDB client");
                        (Some(client), false)
                    }
                    Err(e) => {
                        error!(error = %e, "MongoDB client could not be created");
                        (None, false)
                    }
                }
            }
        };

    let db = mongo_client
        .as_ref()
        .map(|client| client.database(config.mongodb.database()));

    if let (Some(db), true) = (&db, verified) {
        info!(
            "Successfully connected to MongoDB database: {}",
            config.mongodb.database()
        );
        if api::events::init_indexes(db).await.is_err() {
            warn!("Continuing without event indexes");
        }
    }

    let state = AppState {
        config,
        mongo_client,
        db,
    };

    let api_routes = api::routes(&state);

    let router = create_router::<openapi::ApiDoc>(api_routes).await?;

    let app = router
        .merge(health_router(state.config.app))
        .layer(middleware::from_fn(observability::metrics_middleware));

    info!("Starting Social Events API (30s shutdown timeout)");

    let client = state.mongo_client.clone();
    create_production_app(app, &state.config.server, Duration::from_secs(30), async move {
        if let Some(client) = client {
            info!("Shutting down: closing MongoDB connections");
            client.shutdown().await;
            info!("MongoDB connection closed");
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Social Events API shutdown complete");
    Ok(())
}
