use super::shutdown::{ShutdownCoordinator, coordinated_shutdown};
use crate::errors::handlers::not_found;
use crate::http::{cors_layer_from_env, security_headers};
use axum::{Json, Router, middleware, routing::get};
use core_config::server::ServerConfig;
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;

/// Path the raw OpenAPI document is served from.
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Creates a configured Axum router with common middleware and documentation.
///
/// Sets up:
/// - OpenAPI documentation (`/api-docs/openapi.json`, ReDoc, RapiDoc, Scalar)
/// - API routes merged at the root
/// - Tracing, security header, CORS and compression layers
/// - 404 fallback handler
///
/// Health endpoints are added by the app with `health_router()` and its
/// own ready handler.
///
/// CORS follows `CORS_ALLOWED_ORIGIN`; see [`cors_layer_from_env`].
///
/// # Errors
/// Returns an error if `CORS_ALLOWED_ORIGIN` is set but invalid.
///
/// # Example
/// ```ignore
/// let api_routes = Router::new()
///     .route("/events", get(handler))
///     .with_state(state);
///
/// let router = create_router::<ApiDoc>(api_routes).await?;
/// ```
pub async fn create_router<T>(apis: Router) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};

    let cors_layer = cors_layer_from_env()?;
    let openapi = T::openapi();

    let router = Router::new()
        .route(OPENAPI_JSON_PATH, get(move || async move { Json(openapi) }))
        .merge(Redoc::with_url("/redoc", T::openapi()))
        .merge(RapiDoc::new(OPENAPI_JSON_PATH).path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .merge(apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer)
        .layer(CompressionLayer::new());

    Ok(router)
}

/// Serves `router` until Ctrl+C or SIGTERM, then runs `cleanup` with a
/// bounded timeout.
///
/// # Example
/// ```ignore
/// let cleanup = async move {
///     if let Some(client) = mongo_client {
///         client.shutdown().await;
///     }
/// };
///
/// create_production_app(router, &config, Duration::from_secs(30), cleanup).await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let (coordinator, _rx) = ShutdownCoordinator::new();
    let shutdown_handle = coordinator.clone();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let cleanup_handle = tokio::spawn(async move {
        shutdown_handle.wait_for_signal().await;

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(_) => info!("Cleanup completed successfully"),
            Err(_) => {
                tracing::warn!(
                    "Cleanup exceeded timeout of {:?}, forcing shutdown",
                    shutdown_timeout
                );
            }
        }
    });

    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(coordinated_shutdown(coordinator))
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        });

    cleanup_handle.await.ok();

    serve_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[derive(OpenApi)]
    #[openapi(info(title = "test"))]
    struct TestDoc;

    async fn router() -> Router {
        let apis = Router::new().route("/ping", get(|| async { "pong" }));
        temp_env::async_with_vars([("CORS_ALLOWED_ORIGIN", None::<&str>)], async {
            create_router::<TestDoc>(apis).await.unwrap()
        })
        .await
    }

    #[tokio::test]
    async fn test_routes_are_merged_at_root() {
        let response = router()
            .await
            .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("x-content-type-options").unwrap(),
            "nosniff"
        );
    }

    #[tokio::test]
    async fn test_unknown_route_returns_json_404() {
        let response = router()
            .await
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let response = router()
            .await
            .oneshot(
                Request::builder()
                    .uri(OPENAPI_JSON_PATH)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["info"]["title"], "test");
    }
}
