use mongodb::{
    Client,
    bson::doc,
    options::{ClientOptions, Credential},
};
use std::time::Duration;
use tracing::info;

use super::MongoConfig;
use crate::common::{RetryConfig, retry, retry_with_backoff};

/// Error type for MongoDB operations
#[derive(Debug, thiserror::Error)]
pub enum MongoError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

/// Translate a [`MongoConfig`] into driver options.
pub async fn client_options(config: &MongoConfig) -> Result<ClientOptions, MongoError> {
    let mut options = ClientOptions::parse(&config.url).await?;

    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));

    if let Some(ref app_name) = config.app_name {
        options.app_name = Some(app_name.clone());
    }

    if let (Some(username), Some(password)) = (&config.username, &config.password) {
        options.credential = Some(
            Credential::builder()
                .username(username.clone())
                .password(password.clone())
                .build(),
        );
    }

    Ok(options)
}

/// Connect using a MongoConfig and verify the deployment answers a ping.
///
/// ```ignore
/// use database::mongodb::{MongoConfig, connect_from_config};
///
/// let config = MongoConfig::with_database("mongodb://localhost:27017", "Social-events");
/// let client = connect_from_config(&config).await?;
/// ```
pub async fn connect_from_config(config: &MongoConfig) -> Result<Client, MongoError> {
    info!(url = %config.redacted_url(), "Attempting to connect to MongoDB");

    let options = client_options(config).await?;
    let client = Client::with_options(options)?;

    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| MongoError::ConnectionFailed(e.to_string()))?;

    info!("Successfully connected to MongoDB");
    Ok(client)
}

/// Build a client without contacting the deployment.
///
/// The driver connects on first use, so the client starts working once the
/// server becomes reachable. Only a malformed URL or option fails here.
pub async fn connect_lazy(config: &MongoConfig) -> Result<Client, MongoError> {
    let options = client_options(config).await?;
    Ok(Client::with_options(options)?)
}

/// [`connect_from_config`] with exponential backoff between attempts.
///
/// `None` uses [`RetryConfig::default`].
pub async fn connect_from_config_with_retry(
    config: &MongoConfig,
    retry_config: Option<RetryConfig>,
) -> Result<Client, MongoError> {
    match retry_config {
        Some(policy) => retry_with_backoff(|| connect_from_config(config), policy).await,
        None => retry(|| connect_from_config(config)).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_options_apply_config() {
        let config = MongoConfig::with_database("mongodb://localhost:27017", "events_test")
            .with_credentials("events", "secret")
            .with_app_name("social-events-api");

        let options = client_options(&config).await.unwrap();

        assert_eq!(options.max_pool_size, Some(100));
        assert_eq!(options.min_pool_size, Some(5));
        assert_eq!(options.connect_timeout, Some(Duration::from_secs(10)));
        assert_eq!(options.app_name.as_deref(), Some("social-events-api"));
        let credential = options.credential.expect("credential applied");
        assert_eq!(credential.username.as_deref(), Some("events"));
        assert_eq!(credential.password.as_deref(), Some("secret"));
    }

    #[tokio::test]
    async fn test_client_options_reject_malformed_url() {
        let config = MongoConfig::new("postgres://localhost:5432");
        assert!(matches!(
            client_options(&config).await,
            Err(MongoError::Mongo(_))
        ));
    }

    #[tokio::test]
    async fn test_connect_lazy_needs_no_server() {
        let config = MongoConfig::with_database("mongodb://127.0.0.1:1", "events_test");
        let client = connect_lazy(&config).await.unwrap();
        assert_eq!(client.database(config.database()).name(), "events_test");
    }

    #[tokio::test]
    async fn test_connect_lazy_rejects_malformed_url() {
        let config = MongoConfig::new("not-a-url");
        assert!(connect_lazy(&config).await.is_err());
    }

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_connect_from_config() {
        let url = std::env::var("MONGODB_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let config = MongoConfig::with_database(url, "test");
        assert!(connect_from_config(&config).await.is_ok());
    }
}
