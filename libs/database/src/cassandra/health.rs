use scylla::client::session::Session;
use scylla::response::query_result::QueryResult;
use std::fmt;
use std::time::Instant;

use super::connector::CassandraResult;

/// Health check status for Cassandra
#[derive(Debug, Clone, PartialEq)]
pub struct HealthStatus {
    pub healthy: bool,
    /// Error details when unhealthy
    pub message: Option<String>,
    pub response_time_ms: u64,
    /// Release version reported by the coordinator
    pub version: Option<String>,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.healthy {
            write!(
                f,
                "healthy (version {}, {} ms)",
                self.version.as_deref().unwrap_or("unknown"),
                self.response_time_ms
            )
        } else {
            write!(
                f,
                "unhealthy after {} ms: {}",
                self.response_time_ms,
                self.message.as_deref().unwrap_or("no details")
            )
        }
    }
}

/// Check Cassandra health with a simple query
pub async fn check_health(session: &Session) -> bool {
    session
        .query_unpaged("SELECT release_version FROM system.local", ())
        .await
        .is_ok()
}

/// Check Cassandra health with timing and version information
///
/// # Example
/// ```ignore
/// let status = check_health_detailed(&context.session()).await;
/// println!("Cassandra is {}", status);
/// ```
pub async fn check_health_detailed(session: &Session) -> HealthStatus {
    let start = Instant::now();
    let result = session
        .query_unpaged("SELECT release_version FROM system.local", ())
        .await;
    let response_time_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(result) => HealthStatus {
            healthy: true,
            message: None,
            response_time_ms,
            version: extract_version(result),
        },
        Err(e) => HealthStatus {
            healthy: false,
            message: Some(e.to_string()),
            response_time_ms,
            version: None,
        },
    }
}

fn extract_version(result: QueryResult) -> Option<String> {
    let rows_result = result.into_rows_result().ok()?;
    let (version,) = rows_result.maybe_first_row::<(String,)>().ok()??;
    Some(version)
}

/// Information about the node that coordinated the query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterInfo {
    pub cluster_name: Option<String>,
    pub datacenter: Option<String>,
    pub rack: Option<String>,
    pub release_version: Option<String>,
}

/// Read cluster name, datacenter, rack and version from `system.local`
pub async fn get_cluster_info(session: &Session) -> CassandraResult<ClusterInfo> {
    let result = session
        .query_unpaged(
            "SELECT cluster_name, data_center, rack, release_version FROM system.local",
            (),
        )
        .await?;

    let row = result.into_rows_result()?.maybe_first_row::<(
        Option<String>,
        Option<String>,
        Option<String>,
        Option<String>,
    )>()?;

    Ok(match row {
        Some((cluster_name, datacenter, rack, release_version)) => ClusterInfo {
            cluster_name,
            datacenter,
            rack,
            release_version,
        },
        None => ClusterInfo::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_display() {
        let healthy = HealthStatus {
            healthy: true,
            message: None,
            response_time_ms: 3,
            version: Some("5.0.2".to_string()),
        };
        assert_eq!(healthy.to_string(), "healthy (version 5.0.2, 3 ms)");

        let unhealthy = HealthStatus {
            healthy: false,
            message: Some("timed out".to_string()),
            response_time_ms: 30000,
            version: None,
        };
        assert_eq!(unhealthy.to_string(), "unhealthy after 30000 ms: timed out");
    }

    #[tokio::test]
    #[ignore] // Requires actual Cassandra
    async fn test_check_health_detailed() {
        let session = crate::cassandra::connect(&["127.0.0.1:9042"]).await.unwrap();

        let status = check_health_detailed(&session).await;
        assert!(status.healthy);
        assert!(status.message.is_none());
        assert!(check_health(&session).await);
    }

    #[tokio::test]
    #[ignore] // Requires actual Cassandra
    async fn test_get_cluster_info() {
        let session = crate::cassandra::connect(&["127.0.0.1:9042"]).await.unwrap();
        let info = get_cluster_info(&session).await.unwrap();
        assert!(info.release_version.is_some());
    }
}
