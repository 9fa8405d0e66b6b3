// SQLite backend - rusqlite connections driven from the async client
//
// - connection: opening connections and running blocking work off the runtime
// - params: conversion of middleware values to rusqlite values
// - query: statement execution, result extraction and error classification

mod connection;
mod params;
mod query;

use async_trait::async_trait;

use crate::backend::Backend;
use crate::client::DbClient;
use crate::config::ConnectParams;
use crate::dialect::Dialect;
use crate::error::DbalError;
use crate::results::QueryCursor;
use crate::types::{DatabaseType, RowValues};

pub use connection::SharedSqliteConnection;
pub use params::{Params, row_value_to_sqlite_value};
pub use query::build_result_set;

/// Client over `SQLite` connections.
pub type SqliteClient = DbClient<SqliteBackend>;

/// `SQLite` driver primitives.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteBackend;

#[async_trait]
impl Backend for SqliteBackend {
    type Connection = SharedSqliteConnection;

    fn database_type(&self) -> DatabaseType {
        DatabaseType::Sqlite
    }

    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn connect(&self, params: &ConnectParams) -> Result<Self::Connection, DbalError> {
        connection::open(params).await
    }

    async fn run(
        &self,
        conn: &mut Self::Connection,
        query: &str,
        params: &[RowValues],
    ) -> Result<QueryCursor, DbalError> {
        query::run_statement(conn, query, params).await
    }

    async fn run_insert(
        &self,
        conn: &mut Self::Connection,
        _table: &str,
        query: &str,
        params: &[RowValues],
    ) -> Result<(QueryCursor, Option<i64>), DbalError> {
        query::run_insert(conn, query, params).await
    }
}
