//! Connection context shared by every repository of the demo

use std::sync::Arc;
use tracing::{info, instrument};

use super::connector::{
    CassandraError, CassandraResult, CassandraSession, connect_from_config,
    connect_from_config_with_retry, create_keyspace_if_not_exists, use_keyspace,
};
use super::health::{ClusterInfo, get_cluster_info};
use super::CassandraConfig;
use crate::common::RetryConfig;

/// Owns the session for one keyspace
///
/// Built once at startup; repositories take a clone of [`CassandraContext::session`].
/// The pool is closed when the last session handle is dropped.
#[derive(Clone)]
pub struct CassandraContext {
    session: CassandraSession,
    keyspace: String,
    datacenter: Option<String>,
}

impl CassandraContext {
    /// Connect, create the keyspace when missing and switch the session to it
    ///
    /// `retry` enables connection retries with backoff; `None` tries once.
    #[instrument(skip_all, fields(keyspace = config.keyspace()))]
    pub async fn connect(
        config: &CassandraConfig,
        retry: Option<RetryConfig>,
    ) -> CassandraResult<Self> {
        let keyspace = config
            .keyspace()
            .ok_or_else(|| CassandraError::KeyspaceError("no keyspace configured".to_string()))?
            .to_string();

        let session = match retry {
            Some(retry) => connect_from_config_with_retry(config, Some(retry)).await?,
            None => connect_from_config(config).await?,
        };

        create_keyspace_if_not_exists(&session, &keyspace, config.replication_factor).await?;
        use_keyspace(&session, &keyspace).await?;

        Ok(Self {
            session,
            keyspace,
            datacenter: config.local_datacenter.clone(),
        })
    }

    /// Wrap an already connected session whose keyspace is set
    pub fn from_session(session: CassandraSession, keyspace: impl Into<String>) -> Self {
        Self {
            session,
            keyspace: keyspace.into(),
            datacenter: None,
        }
    }

    /// Execute an unparameterized CQL statement (DDL, maintenance)
    pub async fn execute_cql(&self, cql: &str) -> CassandraResult<()> {
        self.session.query_unpaged(cql, ()).await?;
        Ok(())
    }

    /// Shared session handle
    pub fn session(&self) -> CassandraSession {
        Arc::clone(&self.session)
    }

    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    pub fn datacenter(&self) -> Option<&str> {
        self.datacenter.as_deref()
    }

    /// Cluster name, datacenter and version of the coordinator node
    pub async fn cluster_info(&self) -> CassandraResult<ClusterInfo> {
        let info = get_cluster_info(&self.session).await?;
        info!(
            cluster = info.cluster_name.as_deref().unwrap_or("unknown"),
            datacenter = info.datacenter.as_deref().unwrap_or("unknown"),
            "Connected to cluster"
        );
        Ok(info)
    }
}

impl std::fmt::Debug for CassandraContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CassandraContext")
            .field("keyspace", &self.keyspace)
            .field("datacenter", &self.datacenter)
            .finish_non_exhaustive()
    }
}
