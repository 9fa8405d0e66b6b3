use async_trait::async_trait;

use crate::config::ConnectParams;
use crate::dialect::Dialect;
use crate::error::DbalError;
use crate::results::QueryCursor;
use crate::types::{DatabaseType, RowValues};

/// Driver primitives a backend must provide; [`crate::client::DbClient`] builds the
/// full [`crate::database::Database`] surface on top of them.
#[async_trait]
pub trait Backend: Send + Sync + 'static {
    /// An open driver connection.
    type Connection: Send;

    fn database_type(&self) -> DatabaseType;

    fn dialect(&self) -> Dialect;

    /// Open a connection with UTF-8 session defaults.
    ///
    /// Access/authentication failures map to `DbalError::ConnectionError`, every other
    /// failure to `DbalError::ConnectionFault`.
    async fn connect(&self, params: &ConnectParams) -> Result<Self::Connection, DbalError>;

    /// Prepare and execute one statement written in the backend's native placeholder style.
    ///
    /// Statements with a result column list are fully fetched into the cursor; others report
    /// rows affected. Missing tables map to `DbalError::TableNotFound`, other driver failures
    /// to `DbalError::ExecutionError`.
    async fn run(
        &self,
        conn: &mut Self::Connection,
        query: &str,
        params: &[RowValues],
    ) -> Result<QueryCursor, DbalError>;

    /// Execute an INSERT and report the identifier generated by that statement.
    ///
    /// The id is read back from the statement itself, never from session state, so an insert
    /// that generates no id yields `None` even after earlier inserts on the same connection.
    /// `table` has already passed the identifier allow-list.
    async fn run_insert(
        &self,
        conn: &mut Self::Connection,
        table: &str,
        query: &str,
        params: &[RowValues],
    ) -> Result<(QueryCursor, Option<i64>), DbalError>;
}
