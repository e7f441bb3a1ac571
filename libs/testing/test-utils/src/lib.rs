//! Shared test utilities for the domain crates
//!
//! - `TestScylla`: ScyllaDB container with a ready keyspace (always available)
//! - `TestDataBuilder`: Deterministic test data generation
//! - `assertions`: Custom assertion helpers
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDataBuilder, TestScylla};
//!
//! #[tokio::test]
//! #[ignore] // Requires Docker
//! async fn my_repository_test() {
//!     let builder = TestDataBuilder::from_test_name("my_repository_test");
//!     let scylla = TestScylla::new(&builder.keyspace()).await;
//!
//!     let conversation_id = builder.uuid("conversation");
//!     let sensor = builder.name("sensor", "kitchen");
//! }
//! ```

use uuid::Uuid;

mod scylla;

pub use scylla::TestScylla;

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by using seeded data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
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
    /// let builder = TestDataBuilder::from_test_name("test_insert_batch");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        Self::new(hash_str(name))
    }

    /// Deterministic UUID for a role in the test ("sender", "conversation", ...)
    ///
    /// Same seed and label always give the same id; different labels differ.
    pub fn uuid(&self, label: &str) -> Uuid {
        let high = self.seed.to_le_bytes();
        let low = hash_str(label).to_le_bytes();
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes[..8].copy_from_slice(&high);
        uuid_bytes[8..16].copy_from_slice(&low);
        Uuid::from_bytes(uuid_bytes)
    }

    /// Generate a unique name for testing
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("my_test");
    /// let name = builder.name("sensor", "kitchen");
    /// // Returns: "test-sensor-12345-kitchen"
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Keyspace name unique to this test (valid CQL identifier)
    pub fn keyspace(&self) -> String {
        format!("test_{:016x}", self.seed)
    }
}

fn hash_str(value: &str) -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Test assertion helpers
pub mod assertions {
    use uuid::Uuid;

    /// Assert that two UUIDs are equal with a nice error message
    pub fn assert_uuid_eq(actual: Uuid, expected: Uuid, context: &str) {
        assert_eq!(
            actual, expected,
            "{}: expected UUID {}, got {}",
            context, expected, actual
        );
    }

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that rows come back newest first (clustering order DESC)
    pub fn assert_descending_by<T, K: PartialOrd + std::fmt::Debug>(
        items: &[T],
        key: impl Fn(&T) -> K,
        context: &str,
    ) {
        for pair in items.windows(2) {
            let (first, second) = (key(&pair[0]), key(&pair[1]));
            assert!(
                first >= second,
                "{}: expected descending order, got {:?} before {:?}",
                context,
                first,
                second
            );
        }
    }
}
