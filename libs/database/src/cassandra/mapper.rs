//! Typed statement execution
//!
//! Small wrappers over the driver that prepare, bind, execute and map rows
//! into `DeserializeRow` structs, converting every driver error into
//! [`CassandraError`] so repositories can use `?` throughout.

use futures::TryStreamExt;
use scylla::client::session::Session;
use scylla::deserialize::row::DeserializeRow;
use scylla::response::PagingState;
use scylla::serialize::batch::BatchValues;
use scylla::serialize::row::SerializeRow;
use scylla::statement::batch::Batch;
use scylla::statement::prepared::PreparedStatement;

use super::connector::CassandraResult;
use super::paging::PageToken;

/// Prepare a statement
pub async fn prepare(session: &Session, cql: &str) -> CassandraResult<PreparedStatement> {
    Ok(session.prepare(cql).await?)
}

/// Execute a prepared statement and ignore its result
pub async fn execute(
    session: &Session,
    statement: &PreparedStatement,
    values: impl SerializeRow,
) -> CassandraResult<()> {
    session.execute_unpaged(statement, values).await?;
    Ok(())
}

/// Execute a prepared query and collect every row of the (unpaged) result
pub async fn fetch_all<R>(
    session: &Session,
    statement: &PreparedStatement,
    values: impl SerializeRow,
) -> CassandraResult<Vec<R>>
where
    R: for<'frame, 'metadata> DeserializeRow<'frame, 'metadata>,
{
    let rows_result = session
        .execute_unpaged(statement, values)
        .await?
        .into_rows_result()?;

    let rows = rows_result.rows::<R>()?.collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Execute a prepared query and return its first row, if any
pub async fn fetch_optional<R>(
    session: &Session,
    statement: &PreparedStatement,
    values: impl SerializeRow,
) -> CassandraResult<Option<R>>
where
    R: for<'frame, 'metadata> DeserializeRow<'frame, 'metadata>,
{
    let rows_result = session
        .execute_unpaged(statement, values)
        .await?
        .into_rows_result()?;

    Ok(rows_result.maybe_first_row::<R>()?)
}

/// Fetch a single page of rows
///
/// The page size is taken from the statement. Returns the rows together with
/// the token for the following page, or `None` when this was the last one.
pub async fn fetch_page<R>(
    session: &Session,
    statement: &PreparedStatement,
    values: impl SerializeRow,
    page: Option<PageToken>,
) -> CassandraResult<(Vec<R>, Option<PageToken>)>
where
    R: for<'frame, 'metadata> DeserializeRow<'frame, 'metadata>,
{
    let paging_state = page
        .map(PageToken::into_paging_state)
        .unwrap_or_else(PagingState::start);

    let (result, paging_response) = session
        .execute_single_page(statement, values, paging_state)
        .await?;

    let rows = result
        .into_rows_result()?
        .rows::<R>()?
        .collect::<Result<Vec<_>, _>>()?;

    Ok((rows, PageToken::from_response(paging_response)))
}

/// Stream through every page of a query, keeping rows accepted by `keep`
///
/// Used for client-side filtering that CQL cannot express portably.
pub async fn scan_filtered<R, F>(
    session: &Session,
    statement: &PreparedStatement,
    values: impl SerializeRow,
    mut keep: F,
) -> CassandraResult<Vec<R>>
where
    R: 'static + for<'frame, 'metadata> DeserializeRow<'frame, 'metadata>,
    F: FnMut(&R) -> bool,
{
    let mut stream = session
        .execute_iter(statement.clone(), values)
        .await?
        .rows_stream::<R>()?;

    let mut kept = Vec::new();
    while let Some(row) = stream.try_next().await? {
        if keep(&row) {
            kept.push(row);
        }
    }
    Ok(kept)
}

/// Execute a batch; one set of bound values per appended statement
pub async fn execute_batch(
    session: &Session,
    batch: &Batch,
    values: impl BatchValues,
) -> CassandraResult<()> {
    session.batch(batch, values).await?;
    Ok(())
}
