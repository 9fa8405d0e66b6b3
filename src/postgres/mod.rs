// PostgreSQL backend - tokio-postgres clients driven from the async client
//
// - connection: config assembly and the background connection task
// - params: `ToSql` for middleware values
// - query: statement execution, result extraction and error classification

mod connection;
mod params;
mod query;

use async_trait::async_trait;
use tokio_postgres::Client;

use crate::backend::Backend;
use crate::client::DbClient;
use crate::config::ConnectParams;
use crate::dialect::Dialect;
use crate::error::DbalError;
use crate::results::QueryCursor;
use crate::types::{DatabaseType, RowValues};

pub use connection::DEFAULT_PORT;
pub use params::Params;
pub use query::{build_result_set_from_statement, postgres_extract_value};

/// Client over PostgreSQL connections.
pub type PostgresClient = DbClient<PostgresBackend>;

/// PostgreSQL driver primitives.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresBackend;

#[async_trait]
impl Backend for PostgresBackend {
    type Connection = Client;

    fn database_type(&self) -> DatabaseType {
        DatabaseType::Postgres
    }

    fn dialect(&self) -> Dialect {
        Dialect::Postgres
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
        table: &str,
        query: &str,
        params: &[RowValues],
    ) -> Result<(QueryCursor, Option<i64>), DbalError> {
        query::run_insert(conn, table, query, params).await
    }
}
