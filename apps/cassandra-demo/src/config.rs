//! Configuration for the Cassandra demo

use core_config::{FromEnv, env_list, env_or_default, env_parse};
use database::RetryConfig;
use database::cassandra::CassandraConfig;
use eyre::Result;

pub const DEFAULT_CONTACT_POINT: &str = "127.0.0.1:9042";
pub const DEFAULT_DATACENTER: &str = "datacenter1";
pub const DEFAULT_KEYSPACE: &str = "cassandra_demo";

#[derive(Debug, Clone)]
pub struct Config {
    pub cassandra: CassandraConfig,
    pub retry: RetryConfig,
    pub demo: DemoSettings,
}

/// How much sample data the scenarios generate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoSettings {
    pub sensor_count: u32,
    pub readings_per_sensor: u32,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            sensor_count: 5,
            readings_per_sensor: 10,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Without `CASSANDRA_CONTACT_POINTS` the demo targets a local node.
    pub fn from_env() -> Result<Self> {
        let contact_points = env_list("CASSANDRA_CONTACT_POINTS")
            .unwrap_or_else(|| vec![DEFAULT_CONTACT_POINT.to_string()]);
        let mut cassandra = CassandraConfig::from_env_with_contact_points(contact_points)?;

        if cassandra.keyspace.is_none() {
            cassandra.keyspace = Some(env_or_default("CASSANDRA_KEYSPACE", DEFAULT_KEYSPACE));
        }
        if cassandra.local_datacenter.is_none() {
            cassandra.local_datacenter =
                Some(env_or_default("CASSANDRA_DATACENTER", DEFAULT_DATACENTER));
        }

        let defaults = DemoSettings::default();
        let demo = DemoSettings {
            sensor_count: env_parse("DEMO_SENSOR_COUNT", defaults.sensor_count)?,
            readings_per_sensor: env_parse(
                "DEMO_READINGS_PER_SENSOR",
                defaults.readings_per_sensor,
            )?,
        };

        Ok(Config {
            cassandra,
            retry: <RetryConfig as FromEnv>::from_env()?,
            demo,
        })
    }

    /// Command line flags win over the environment
    pub fn with_overrides(
        mut self,
        contact_points: Option<Vec<String>>,
        keyspace: Option<String>,
        datacenter: Option<String>,
    ) -> Self {
        if let Some(points) = contact_points.filter(|p| !p.is_empty()) {
            self.cassandra.contact_points = points;
        }
        if keyspace.is_some() {
            self.cassandra.keyspace = keyspace;
        }
        if datacenter.is_some() {
            self.cassandra.local_datacenter = datacenter;
        }
        self
    }
}
