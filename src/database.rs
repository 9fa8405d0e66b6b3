use std::fmt;

use async_trait::async_trait;

use crate::config::ConnectParams;
use crate::error::DbalError;
use crate::history::QueryHistory;
use crate::options::ExecOptions;
use crate::results::{CustomDbRow, QueryCursor};
use crate::types::{DatabaseType, FieldMap, QueryParams};

/// Index of a connection inside one client, in the order connections were opened.
pub type ConnectionId = usize;

/// Operations every backend registered with the factory has to support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    NewConnection,
    SetActiveConnection,
    ExecuteQuery,
    NumRows,
    GetRows,
    DeleteRecords,
    UpdateRecords,
    InsertRecords,
}

impl Capability {
    /// The complete capability set.
    pub const ALL: [Capability; 8] = [
        Capability::NewConnection,
        Capability::SetActiveConnection,
        Capability::ExecuteQuery,
        Capability::NumRows,
        Capability::GetRows,
        Capability::DeleteRecords,
        Capability::UpdateRecords,
        Capability::InsertRecords,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::NewConnection => "new_connection",
            Capability::SetActiveConnection => "set_active_connection",
            Capability::ExecuteQuery => "execute_query",
            Capability::NumRows => "num_rows",
            Capability::GetRows => "get_rows",
            Capability::DeleteRecords => "delete_records",
            Capability::UpdateRecords => "update_records",
            Capability::InsertRecords => "insert_records",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The capability interface handed out by the backend factory.
///
/// A client owns its connections; one of them is "active" and receives every statement.
/// Each execution returns its own [`QueryCursor`], and a copy is kept as the "last" cursor
/// behind [`Database::num_rows`] and [`Database::get_rows`].
#[async_trait]
pub trait Database: Send {
    fn database_type(&self) -> DatabaseType;

    /// Operations this implementation supports; checked once when the backend is registered.
    fn capabilities(&self) -> &'static [Capability] {
        &Capability::ALL
    }

    /// Open a new connection and return its index. Does not change the active connection.
    ///
    /// # Errors
    /// `DbalError::ConnectionError` (code 400) on access/authentication failure,
    /// `DbalError::ConnectionFault` on any other connection failure.
    async fn new_connection(&mut self, params: &ConnectParams) -> Result<ConnectionId, DbalError>;

    /// Select the connection used by subsequent statements. Not validated until a statement runs.
    fn set_active_connection(&mut self, id: ConnectionId);

    /// Execute `query` with positional `?` markers bound to `data`, paginated per `options`.
    ///
    /// A blank `query` is a no-op returning `Ok(None)`.
    ///
    /// On PostgreSQL every `?` outside literals and comments is a placeholder; write the JSONB
    /// operators `?`, `?|` and `?&` as `??`, `??|` and `??&`.
    ///
    /// # Errors
    /// `DbalError::TableNotFound` (code 401) for a missing table, `DbalError::ExecutionError`
    /// for other driver failures, `DbalError::NoActiveConnection` /
    /// `DbalError::UnknownConnection` when the active connection does not resolve.
    async fn execute_query(
        &mut self,
        query: &str,
        data: QueryParams,
        options: ExecOptions,
    ) -> Result<Option<QueryCursor>, DbalError>;

    /// Rows returned or affected by the last statement.
    ///
    /// # Errors
    /// `DbalError::NoResultCursor` before any statement ran.
    fn num_rows(&self) -> Result<usize, DbalError>;

    /// Next row of the last statement, `None` once exhausted.
    ///
    /// # Errors
    /// `DbalError::NoResultCursor` before any statement ran.
    fn get_rows(&mut self) -> Result<Option<CustomDbRow>, DbalError>;

    /// Delete rows matching every condition; at most `limit` rows when `limit >= 1`.
    /// Returns the number of rows removed.
    ///
    /// # Errors
    /// Builder errors (`EmptyFieldMap`, `InvalidIdentifier`) or execution errors.
    async fn delete_records(
        &mut self,
        table: &str,
        conditions: &FieldMap,
        limit: Option<usize>,
    ) -> Result<usize, DbalError>;

    /// Apply `changes` to rows matching every condition. Returns the number of rows updated.
    ///
    /// # Errors
    /// Builder errors (`EmptyFieldMap`, `InvalidIdentifier`) or execution errors.
    async fn update_records(
        &mut self,
        table: &str,
        changes: &FieldMap,
        conditions: &FieldMap,
    ) -> Result<usize, DbalError>;

    /// Insert one row. Returns the identifier generated by this insert: the rowid on `SQLite`,
    /// the sequence-backed column on PostgreSQL, `None` when the table has neither.
    ///
    /// # Errors
    /// Builder errors (`EmptyFieldMap`, `InvalidIdentifier`) or execution errors.
    async fn insert_records(&mut self, table: &str, data: &FieldMap)
    -> Result<Option<i64>, DbalError>;

    /// Statements executed successfully over the client's lifetime.
    fn query_count(&self) -> u64;

    fn history(&self) -> &QueryHistory;
}
