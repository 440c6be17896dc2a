//! MongoDB test infrastructure
//!
//! Provides a `TestMongo` helper that runs a MongoDB container for the
//! duration of a test.

use mongodb::{Client, Database};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::mongo::Mongo;

/// Test MongoDB wrapper that ensures proper cleanup
///
/// The container is stopped and removed when this struct is dropped.
///
/// # Example
///
/// ```no_run
/// use test_utils::TestMongo;
///
/// # async fn example() {
/// let mongo = TestMongo::new().await;
/// let db = mongo.database("events_test");
/// # }
/// ```
pub struct TestMongo {
    #[allow(dead_code)]
    container: ContainerAsync<Mongo>,
    client: Client,
}

impl TestMongo {
    /// Start a MongoDB 8 container and connect to it.
    pub async fn new() -> Self {
        let container = Mongo::default()
            .with_tag("8")
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let host_port = container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");

        let connection_string = format!("mongodb://127.0.0.1:{}", host_port);

        let client = Client::with_uri_str(&connection_string)
            .await
            .expect("Failed to create MongoDB client");

        tracing::info!(port = host_port, "Test MongoDB ready (mongo:8)");

        Self { container, client }
    }

    /// A database handle; each test should use its own name.
    pub fn database(&self, name: &str) -> Database {
        self.client.database(name)
    }
}

impl Drop for TestMongo {
    fn drop(&mut self) {
        tracing::debug!("Cleaning up test MongoDB container");
    }
}
