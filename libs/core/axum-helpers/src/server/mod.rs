//! Server infrastructure module.
//!
//! - Application setup with OpenAPI documentation
//! - Health and readiness helpers
//! - Graceful shutdown coordination
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use core_config::app_info;
//!
//! let router = create_router::<ApiDoc>(api_routes).await?;
//! let app = router.merge(health_router(app_info!()));
//! create_production_app(app, &config.server, Duration::from_secs(30), async {}).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{OPENAPI_JSON_PATH, create_production_app, create_router};
pub use health::{HealthCheckFuture, HealthResponse, health_handler, health_router, run_health_checks};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
