use scylla::client::PoolSize;
use scylla::client::execution_profile::ExecutionProfile;
use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use scylla::errors::{
    DeserializationError, ExecutionError, IntoRowsResultError, MaybeFirstRowError, NewSessionError,
    NextRowError, PagerExecutionError, PrepareError, RowsError, TypeCheckError,
};
use scylla::policies::load_balancing::DefaultPolicy;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

use super::CassandraConfig;
use crate::common::{RetryConfig, retry, retry_with_backoff};

/// Error type for Cassandra operations
#[derive(Debug, thiserror::Error)]
pub enum CassandraError {
    #[error("Cassandra error: {0}")]
    Scylla(#[from] NewSessionError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Prepare error: {0}")]
    Prepare(#[from] PrepareError),

    #[error("Paged query error: {0}")]
    Pager(#[from] PagerExecutionError),

    #[error("Result is not a row set: {0}")]
    NotRows(#[from] IntoRowsResultError),

    #[error("Row type mismatch: {0}")]
    Rows(#[from] RowsError),

    #[error("Row type mismatch: {0}")]
    TypeCheck(#[from] TypeCheckError),

    #[error("Row deserialization failed: {0}")]
    Deserialization(#[from] DeserializationError),

    #[error("First row error: {0}")]
    FirstRow(#[from] MaybeFirstRowError),

    #[error("Fetching next page failed: {0}")]
    NextRow(#[from] NextRowError),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Keyspace error: {0}")]
    KeyspaceError(String),
}

pub type CassandraResult<T> = Result<T, CassandraError>;

/// Cassandra session shared by every repository
pub type CassandraSession = Arc<Session>;

const VERIFY_QUERY: &str = "SELECT release_version FROM system.local";

/// Connect to Cassandra/ScyllaDB and return a Session
///
/// # Example
/// ```ignore
/// use database::cassandra::connect;
///
/// let session = connect(&["127.0.0.1:9042"]).await?;
/// ```
pub async fn connect(contact_points: &[impl AsRef<str>]) -> CassandraResult<CassandraSession> {
    connect_from_config(&CassandraConfig::new(
        contact_points.iter().map(|s| s.as_ref()).collect(),
    ))
    .await
}

/// Connect using a CassandraConfig
///
/// Applies credentials, timeouts, pool size and DC-aware load balancing.
/// The keyspace is *not* selected here because it may not exist yet;
/// `CassandraContext::connect` creates it and switches to it.
#[instrument(skip(config), fields(contact_points = ?config.contact_points))]
pub async fn connect_from_config(config: &CassandraConfig) -> CassandraResult<CassandraSession> {
    info!("Attempting to connect to Cassandra");

    let points: Vec<&str> = config.contact_points.iter().map(|s| s.as_str()).collect();

    let mut builder = SessionBuilder::new()
        .known_nodes(&points)
        .connection_timeout(Duration::from_secs(config.connect_timeout_secs))
        .default_execution_profile_handle(execution_profile(config).into_handle());

    if let Some(per_host) = NonZeroUsize::new(config.connections_per_host) {
        builder = builder.pool_size(PoolSize::PerHost(per_host));
    }

    if let (Some(username), Some(password)) = (&config.username, &config.password) {
        builder = builder.user(username, password);
    }

    let session: Session = builder.build().await?;

    session
        .query_unpaged(VERIFY_QUERY, &[])
        .await
        .map_err(|e| CassandraError::ConnectionFailed(e.to_string()))?;

    info!("Successfully connected to Cassandra");
    Ok(Arc::new(session))
}

fn execution_profile(config: &CassandraConfig) -> ExecutionProfile {
    let mut profile = ExecutionProfile::builder()
        .request_timeout(Some(Duration::from_secs(config.request_timeout_secs)));

    if let Some(ref datacenter) = config.local_datacenter {
        let policy = DefaultPolicy::builder()
            .prefer_datacenter(datacenter.clone())
            .token_aware(true)
            .build();
        profile = profile.load_balancing_policy(policy);
    }

    profile.build()
}

/// Connect to Cassandra with automatic retry on failure
pub async fn connect_with_retry(
    contact_points: &[impl AsRef<str>],
    retry_config: Option<RetryConfig>,
) -> CassandraResult<CassandraSession> {
    let config = CassandraConfig::new(contact_points.iter().map(|s| s.as_ref()).collect());
    connect_from_config_with_retry(&config, retry_config).await
}

/// Connect from config with automatic retry on failure
///
/// Useful at startup when the database container is still booting.
pub async fn connect_from_config_with_retry(
    config: &CassandraConfig,
    retry_config: Option<RetryConfig>,
) -> CassandraResult<CassandraSession> {
    match retry_config {
        Some(retry_config) => retry_with_backoff(|| connect_from_config(config), retry_config).await,
        None => retry(|| connect_from_config(config)).await,
    }
}

/// Check that a keyspace name is a plain CQL identifier.
///
/// Keyspace names are spliced into DDL, so only `[A-Za-z][A-Za-z0-9_]*` up to
/// 48 characters is accepted.
pub fn validate_keyspace_name(keyspace: &str) -> CassandraResult<()> {
    let mut chars = keyspace.chars();
    let valid = match chars.next() {
        Some(first) => {
            first.is_ascii_alphabetic()
                && keyspace.len() <= 48
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(CassandraError::KeyspaceError(format!(
            "invalid keyspace name '{}'",
            keyspace
        )))
    }
}

/// DDL used by `create_keyspace_if_not_exists`
pub fn create_keyspace_cql(keyspace: &str, replication_factor: u32) -> String {
    format!(
        "CREATE KEYSPACE IF NOT EXISTS {} WITH replication = {{'class': 'SimpleStrategy', 'replication_factor': {}}}",
        keyspace, replication_factor
    )
}

/// Create a keyspace if it doesn't exist
///
/// # Example
/// ```ignore
/// use database::cassandra::{connect, create_keyspace_if_not_exists};
///
/// let session = connect(&["127.0.0.1:9042"]).await?;
/// create_keyspace_if_not_exists(&session, "cassandra_demo", 1).await?;
/// ```
pub async fn create_keyspace_if_not_exists(
    session: &Session,
    keyspace: &str,
    replication_factor: u32,
) -> CassandraResult<()> {
    validate_keyspace_name(keyspace)?;

    session
        .query_unpaged(create_keyspace_cql(keyspace, replication_factor), &[])
        .await
        .map_err(|e| CassandraError::KeyspaceError(e.to_string()))?;

    info!("Keyspace '{}' ready", keyspace);
    Ok(())
}

/// Use a specific keyspace
pub async fn use_keyspace(session: &Session, keyspace: &str) -> CassandraResult<()> {
    session
        .use_keyspace(keyspace, true)
        .await
        .map_err(|e| CassandraError::KeyspaceError(e.to_string()))?;

    info!("Using keyspace '{}'", keyspace);
    Ok(())
}
