use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use core_config::AppInfo;
use futures::future::join_all;
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::future::Future;
use std::pin::Pin;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub name: &'static str,
    pub version: &'static str,
}

/// A boxed future for health checks with a string error
pub type HealthCheckFuture<'a> = Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'a>>;

/// Runs multiple health checks concurrently and returns aggregated results.
///
/// The body lists each check as `"connected"` or `"disconnected"` next to an
/// overall `"status"`. Any failing check turns the response into a 503.
///
/// # Example
/// ```ignore
/// let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
///     "mongodb",
///     Box::pin(async { ping(&client).await.map_err(|e| e.to_string()) }),
/// )];
/// run_health_checks(checks).await
/// ```
pub async fn run_health_checks(
    checks: Vec<(&str, HealthCheckFuture<'_>)>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let names: Vec<_> = checks.iter().map(|(name, _)| *name).collect();
    let futures: Vec<_> = checks.into_iter().map(|(_, check)| check).collect();
    let results = join_all(futures).await;

    let mut body = Map::new();
    let mut all_healthy = true;

    for (name, result) in names.into_iter().zip(results) {
        match result {
            Ok(_) => {
                body.insert(name.to_string(), json!("connected"));
            }
            Err(e) => {
                tracing::error!("Readiness check failed: {} error: {:?}", name, e);
                body.insert(name.to_string(), json!("disconnected"));
                all_healthy = false;
            }
        }
    }

    body.insert(
        "status".to_string(),
        json!(if all_healthy { "ready" } else { "not ready" }),
    );

    if all_healthy {
        Ok((StatusCode::OK, Json(Value::Object(body))))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(Value::Object(body))))
    }
}

/// Liveness handler. Always 200 while the process is serving.
pub async fn health_handler(State(app): State<AppInfo>) -> Response {
    let response = HealthResponse {
        status: "healthy",
        name: app.name,
        version: app.version,
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// Creates a router with the /health endpoint.
///
/// # Example
/// ```ignore
/// use axum_helpers::health_router;
/// use core_config::app_info;
///
/// let app = Router::new().merge(health_router(app_info!()));
/// ```
pub fn health_router(app_info: AppInfo) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(app_info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_reports_name_and_version() {
        let app = health_router(AppInfo {
            name: "svc",
            version: "1.2.3",
        });
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["name"], "svc");
        assert_eq!(body["version"], "1.2.3");
    }

    #[tokio::test]
    async fn test_run_health_checks_all_ok() {
        let checks: Vec<(&str, HealthCheckFuture<'_>)> =
            vec![("mongodb", Box::pin(async { Ok(()) }))];
        let (status, Json(body)) = run_health_checks(checks).await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
        assert_eq!(body["mongodb"], "connected");
    }

    #[tokio::test]
    async fn test_run_health_checks_reports_failure() {
        let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![
            ("cache", Box::pin(async { Ok(()) })),
            ("mongodb", Box::pin(async { Err("down".to_string()) })),
        ];
        let (status, Json(body)) = run_health_checks(checks).await.unwrap_err();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "not ready");
        assert_eq!(body["mongodb"], "disconnected");
        assert_eq!(body["cache"], "connected");
    }
}
