use mongodb::{Client, bson::doc};
use std::time::Instant;

/// Health check status for MongoDB
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub healthy: bool,
    /// Error details when unhealthy
    pub message: Option<String>,
    pub response_time_ms: u64,
}

/// Ping the deployment and report latency plus any error message.
///
/// ```ignore
/// let status = check_health_detailed(&client).await;
/// if !status.healthy {
///     warn!(error = ?status.message, "MongoDB unhealthy");
/// }
/// ```
pub async fn check_health_detailed(client: &Client) -> HealthStatus {
    let start = Instant::now();
    let result = ping(client).await;
    let response_time_ms = start.elapsed().as_millis() as u64;

    HealthStatus {
        healthy: result.is_ok(),
        message: result.err().map(|e| e.to_string()),
        response_time_ms,
    }
}

async fn ping(client: &Client) -> mongodb::error::Result<()> {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map(|_| ())
}
