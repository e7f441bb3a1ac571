use scylla::client::session::Session;
use tracing::{debug, info};

use super::connector::{CassandraError, CassandraResult};

/// Apply DDL statements in order
///
/// Every statement must be idempotent (`IF NOT EXISTS`) because repositories
/// apply their schema on every start.
pub async fn apply_schema(
    session: &Session,
    table: &str,
    statements: &[&str],
) -> CassandraResult<()> {
    for statement in statements {
        ensure_idempotent(statement)?;
        debug!(table, statement = %statement.trim(), "Applying schema statement");
        // The driver waits for schema agreement after each DDL statement.
        session.query_unpaged(*statement, ()).await?;
    }

    info!(table, "Schema ready");
    Ok(())
}

/// Reject DDL that would fail (or recreate data) on a second run
pub fn ensure_idempotent(statement: &str) -> CassandraResult<()> {
    let normalized = statement.to_ascii_uppercase();
    if normalized.contains("IF NOT EXISTS") {
        Ok(())
    } else {
        Err(CassandraError::Query(format!(
            "schema statement is not idempotent: {}",
            statement.trim()
        )))
    }
}
