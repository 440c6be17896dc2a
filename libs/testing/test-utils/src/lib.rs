//! Shared test utilities for domain testing
//!
//! - `TestMongo`: MongoDB container with automatic cleanup (feature: "mongo")
//! - `TestDataBuilder`: Deterministic test data generation (always available)
//! - `assertions`: Custom assertion helpers (always available)
//!
//! # Usage
//!
//! Add `features = ["mongo"]` to your dev-dependencies:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { workspace = true, features = ["mongo"] }
//! ```
//!
//! ```rust,ignore
//! use test_utils::{TestMongo, TestDataBuilder};
//!
//! #[tokio::test]
//! #[ignore] // Requires Docker
//! async fn my_mongo_test() {
//!     let mongo = TestMongo::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let db = mongo.database(&builder.database_name());
//!     let email = builder.email("guest");
//! }
//! ```

#[cfg(feature = "mongo")]
mod mongo;

#[cfg(feature = "mongo")]
pub use mongo::TestMongo;

/// Builder for test data with deterministic randomization
///
/// Values derive from a seed, so the same test name always produces the
/// same data while different tests do not collide.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_join_event");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// A unique email address for a role such as "creator" or "guest".
    pub fn email(&self, role: &str) -> String {
        format!("{}-{}@test.local", role, self.seed)
    }

    /// A unique name, e.g. `test-event-12345-main`.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.name("event", "main"), "test-event-7-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// A database name unique to this builder's seed.
    pub fn database_name(&self) -> String {
        format!("test_{}", self.seed)
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that `id` looks like a hex-encoded ObjectId
    pub fn assert_object_id(id: &str, context: &str) {
        assert!(
            id.len() == 24 && id.chars().all(|c| c.is_ascii_hexdigit()),
            "{}: expected 24-character hex ObjectId, got {:?}",
            context,
            id
        );
    }

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.email("guest"), builder2.email("guest"));
        assert_eq!(builder1.name("event", "test"), builder2.name("event", "test"));
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.email("guest"), builder2.email("guest"));
        assert_ne!(builder1.database_name(), builder2.database_name());
    }

    #[test]
    fn test_assert_object_id_accepts_hex() {
        assertions::assert_object_id("6650f0c2a1b2c3d4e5f60718", "id");
    }

    #[test]
    #[should_panic(expected = "expected 24-character hex ObjectId")]
    fn test_assert_object_id_rejects_other_strings() {
        assertions::assert_object_id("not-an-id", "id");
    }
}
