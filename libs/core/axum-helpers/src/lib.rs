//! # Axum Helpers
//!
//! Shared building blocks for the Axum services in this workspace.
//!
//! ## Modules
//!
//! - **[`server`]**: Router assembly, health checks, graceful shutdown
//! - **[`http`]**: HTTP middleware (CORS, security headers)
//! - **[`errors`]**: Structured error responses with error codes
//! - **[`extractors`]**: Custom extractors (validated JSON)
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_production_app, create_router};
//! use core_config::server::ServerConfig;
//!
//! let router = create_router::<ApiDoc>(Router::new()).await?;
//! create_production_app(router, &ServerConfig::default(), Duration::from_secs(30), async {}).await?;
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

pub use http::{cors_layer_from_env, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::ValidatedJson;
