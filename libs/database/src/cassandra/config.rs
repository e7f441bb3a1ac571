#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_list, env_parse};

/// Cassandra/ScyllaDB connection configuration
///
/// Can be constructed manually or loaded from environment variables (with `config` feature).
///
/// # Example
///
/// ```ignore
/// use database::cassandra::CassandraConfig;
///
/// let config = CassandraConfig::with_keyspace(vec!["127.0.0.1:9042"], "cassandra_demo")
///     .with_datacenter("datacenter1");
///
/// // From environment variables (requires `config` feature)
/// let config = CassandraConfig::from_env()?;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CassandraConfig {
    /// Contact points (host:port pairs)
    /// Example: ["127.0.0.1:9042", "127.0.0.2:9042"]
    pub contact_points: Vec<String>,

    /// Keyspace to create (if missing) and use
    pub keyspace: Option<String>,

    /// Local datacenter for DC-aware load balancing
    pub local_datacenter: Option<String>,

    pub username: Option<String>,
    pub password: Option<String>,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Number of connections per host
    pub connections_per_host: usize,

    /// Replication factor used when the keyspace has to be created
    pub replication_factor: u32,
}

impl CassandraConfig {
    /// Create a new CassandraConfig with contact points
    pub fn new<S: Into<String>>(contact_points: Vec<S>) -> Self {
        Self {
            contact_points: contact_points.into_iter().map(|s| s.into()).collect(),
            ..Self::default()
        }
    }

    /// Create a CassandraConfig with a specific keyspace
    pub fn with_keyspace<S: Into<String>>(
        contact_points: Vec<S>,
        keyspace: impl Into<String>,
    ) -> Self {
        Self {
            keyspace: Some(keyspace.into()),
            ..Self::new(contact_points)
        }
    }

    /// Set the local datacenter for DC-aware load balancing
    pub fn with_datacenter(mut self, datacenter: impl Into<String>) -> Self {
        self.local_datacenter = Some(datacenter.into());
        self
    }

    /// Set authentication credentials
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn with_connections_per_host(mut self, count: usize) -> Self {
        self.connections_per_host = count;
        self
    }

    pub fn with_replication_factor(mut self, factor: u32) -> Self {
        self.replication_factor = factor;
        self
    }

    pub fn contact_points(&self) -> &[String] {
        &self.contact_points
    }

    pub fn keyspace(&self) -> Option<&str> {
        self.keyspace.as_deref()
    }
}

impl Default for CassandraConfig {
    fn default() -> Self {
        Self {
            contact_points: vec!["127.0.0.1:9042".to_string()],
            keyspace: None,
            local_datacenter: None,
            username: None,
            password: None,
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            connections_per_host: 1,
            replication_factor: 1,
        }
    }
}

/// Load CassandraConfig from environment variables
///
/// Environment variables:
/// - `CASSANDRA_CONTACT_POINTS` (required) - Comma-separated list of contact points
///   Example: "127.0.0.1:9042,127.0.0.2:9042"
/// - `CASSANDRA_KEYSPACE` (optional) - Keyspace name
/// - `CASSANDRA_DATACENTER` (optional) - Local datacenter for load balancing
/// - `CASSANDRA_USERNAME` / `CASSANDRA_PASSWORD` (optional) - Authentication
/// - `CASSANDRA_CONNECT_TIMEOUT_SECS` (optional, default: 10)
/// - `CASSANDRA_REQUEST_TIMEOUT_SECS` (optional, default: 30)
/// - `CASSANDRA_CONNECTIONS_PER_HOST` (optional, default: 1)
/// - `CASSANDRA_REPLICATION_FACTOR` (optional, default: 1)
#[cfg(feature = "config")]
impl FromEnv for CassandraConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let contact_points = env_list("CASSANDRA_CONTACT_POINTS")
            .ok_or_else(|| ConfigError::MissingEnvVar("CASSANDRA_CONTACT_POINTS".to_string()))?;
        Self::from_env_with_contact_points(contact_points)
    }
}

#[cfg(feature = "config")]
impl CassandraConfig {
    /// Everything but the contact points from the environment
    ///
    /// For callers that supply their own fallback when
    /// `CASSANDRA_CONTACT_POINTS` is unset.
    pub fn from_env_with_contact_points(
        contact_points: Vec<String>,
    ) -> Result<Self, ConfigError> {
        if contact_points.is_empty() {
            return Err(ConfigError::ParseError {
                key: "CASSANDRA_CONTACT_POINTS".to_string(),
                details: "No valid contact points provided".to_string(),
            });
        }

        let defaults = Self::default();

        let connections_per_host =
            env_parse("CASSANDRA_CONNECTIONS_PER_HOST", defaults.connections_per_host)?;
        if connections_per_host == 0 {
            return Err(ConfigError::ParseError {
                key: "CASSANDRA_CONNECTIONS_PER_HOST".to_string(),
                details: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            contact_points,
            keyspace: std::env::var("CASSANDRA_KEYSPACE").ok(),
            local_datacenter: std::env::var("CASSANDRA_DATACENTER").ok(),
            username: std::env::var("CASSANDRA_USERNAME").ok(),
            password: std::env::var("CASSANDRA_PASSWORD").ok(),
            connect_timeout_secs: env_parse(
                "CASSANDRA_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            )?,
            request_timeout_secs: env_parse(
                "CASSANDRA_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?,
            connections_per_host,
            replication_factor: env_parse(
                "CASSANDRA_REPLICATION_FACTOR",
                defaults.replication_factor,
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cassandra_config_new() {
        let config = CassandraConfig::new(vec!["10.0.0.5:9042"]);
        assert_eq!(config.contact_points, vec!["10.0.0.5:9042"]);
        assert!(config.keyspace.is_none());
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.replication_factor, 1);
    }

    #[test]
    fn test_cassandra_config_with_keyspace() {
        let config = CassandraConfig::with_keyspace(vec!["127.0.0.1:9042"], "cassandra_demo");
        assert_eq!(config.keyspace(), Some("cassandra_demo"));
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_cassandra_config_builder_pattern() {
        let config = CassandraConfig::new(vec!["127.0.0.1:9042"])
            .with_datacenter("datacenter1")
            .with_credentials("cassandra", "cassandra")
            .with_connect_timeout(30)
            .with_request_timeout(5)
            .with_connections_per_host(4)
            .with_replication_factor(3);

        assert_eq!(config.local_datacenter.as_deref(), Some("datacenter1"));
        assert_eq!(config.username.as_deref(), Some("cassandra"));
        assert_eq!(config.password.as_deref(), Some("cassandra"));
        assert_eq!(config.connect_timeout_secs, 30);
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.connections_per_host, 4);
        assert_eq!(config.replication_factor, 3);
    }

    #[test]
    fn test_cassandra_config_default() {
        let config = CassandraConfig::default();
        assert_eq!(config.contact_points(), ["127.0.0.1:9042".to_string()]);
        assert!(config.keyspace().is_none());
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_cassandra_config_from_env() {
        temp_env::with_vars(
            [
                (
                    "CASSANDRA_CONTACT_POINTS",
                    Some("127.0.0.1:9042, 127.0.0.2:9042"),
                ),
                ("CASSANDRA_KEYSPACE", Some("testkeyspace")),
                ("CASSANDRA_REPLICATION_FACTOR", Some("3")),
                ("CASSANDRA_CONNECTIONS_PER_HOST", None),
            ],
            || {
                let config = CassandraConfig::from_env().unwrap();
                assert_eq!(config.contact_points.len(), 2);
                assert_eq!(config.contact_points[1], "127.0.0.2:9042");
                assert_eq!(config.keyspace, Some("testkeyspace".to_string()));
                assert_eq!(config.replication_factor, 3);
                assert_eq!(config.connections_per_host, 1);
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_cassandra_config_from_env_missing() {
        temp_env::with_vars([("CASSANDRA_CONTACT_POINTS", None::<&str>)], || {
            assert!(matches!(
                CassandraConfig::from_env(),
                Err(ConfigError::MissingEnvVar(_))
            ));
        });
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_explicit_contact_points_keep_env_settings() {
        temp_env::with_vars(
            [
                ("CASSANDRA_CONTACT_POINTS", None),
                ("CASSANDRA_USERNAME", Some("cassandra")),
                ("CASSANDRA_PASSWORD", Some("secret")),
                ("CASSANDRA_REPLICATION_FACTOR", Some("3")),
            ],
            || {
                let config = CassandraConfig::from_env_with_contact_points(vec![
                    "10.1.1.1:9042".to_string(),
                ])
                .unwrap();
                assert_eq!(config.contact_points, vec!["10.1.1.1:9042"]);
                assert_eq!(config.username.as_deref(), Some("cassandra"));
                assert_eq!(config.password.as_deref(), Some("secret"));
                assert_eq!(config.replication_factor, 3);

                assert!(CassandraConfig::from_env_with_contact_points(vec![]).is_err());
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_cassandra_config_from_env_blank_points() {
        temp_env::with_vars([("CASSANDRA_CONTACT_POINTS", Some(" , "))], || {
            assert!(matches!(
                CassandraConfig::from_env(),
                Err(ConfigError::ParseError { .. })
            ));
        });
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_cassandra_config_from_env_zero_pool() {
        temp_env::with_vars(
            [
                ("CASSANDRA_CONTACT_POINTS", Some("127.0.0.1:9042")),
                ("CASSANDRA_CONNECTIONS_PER_HOST", Some("0")),
            ],
            || {
                assert!(CassandraConfig::from_env().is_err());
            },
        );
    }
}
