//! ScyllaDB test infrastructure
//!
//! Provides a `TestScylla` helper that starts a ScyllaDB container and opens a
//! `CassandraContext` on a fresh keyspace.

use database::RetryConfig;
use database::cassandra::{CassandraConfig, CassandraContext, CassandraSession};
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::scylladb::ScyllaDB;

/// Test ScyllaDB wrapper that ensures proper cleanup
///
/// The container is stopped and removed when this struct is dropped.
///
/// # Example
///
/// ```no_run
/// use test_utils::TestScylla;
///
/// # async fn example() {
/// let scylla = TestScylla::new("sensor_tests").await;
/// let session = scylla.session();
/// // Build a repository on top of the session
/// # }
/// ```
pub struct TestScylla {
    #[allow(dead_code)]
    container: ContainerAsync<ScyllaDB>,
    context: CassandraContext,
    pub contact_point: String,
}

impl TestScylla {
    /// Start a container and create `keyspace` in it
    pub async fn new(keyspace: &str) -> Self {
        let container = ScyllaDB::default()
            .start()
            .await
            .expect("Failed to start ScyllaDB container");

        let host_port = container
            .get_host_port_ipv4(9042)
            .await
            .expect("Failed to get ScyllaDB port");

        let contact_point = format!("127.0.0.1:{}", host_port);
        let config = CassandraConfig::with_keyspace(vec![contact_point.clone()], keyspace)
            .with_request_timeout(60);

        // CQL port opens a little after the container reports ready
        let retry = RetryConfig::new()
            .with_max_retries(10)
            .with_initial_delay(500)
            .with_max_delay(5000);

        let context = CassandraContext::connect(&config, Some(retry))
            .await
            .expect("Failed to connect to ScyllaDB");

        tracing::info!(port = host_port, keyspace, "Test ScyllaDB ready");

        Self {
            container,
            context,
            contact_point,
        }
    }

    /// Shared session bound to the test keyspace
    pub fn session(&self) -> CassandraSession {
        self.context.session()
    }

    pub fn context(&self) -> &CassandraContext {
        &self.context
    }
}

impl Drop for TestScylla {
    fn drop(&mut self) {
        tracing::debug!("Cleaning up test ScyllaDB container");
    }
}
