use std::borrow::Cow;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::backend::Backend;
use crate::config::ConnectParams;
use crate::database::{ConnectionId, Database};
use crate::error::DbalError;
use crate::history::QueryHistory;
use crate::options::{ClientOptions, ExecOptions};
use crate::results::{CustomDbRow, QueryCursor};
use crate::statements::{build_delete, build_insert, build_update};
use crate::translation::translate_placeholders;
use crate::types::{DatabaseType, FieldMap, QueryParams, RowValues};

/// Connection registry, executor and statement builders over one [`Backend`].
///
/// ```rust,no_run
/// use sql_dbal::prelude::*;
///
/// # async fn demo() -> Result<(), DbalError> {
/// let mut db = SqliteClient::new(ClientOptions::default());
/// let id = db.new_connection(&ConnectParams::sqlite(":memory:")).await?;
/// db.set_active_connection(id);
/// db.execute_query("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT)", QueryParams::none(), ExecOptions::default())
///     .await?;
/// db.insert_records("t", &FieldMap::new().with("name", "alice")).await?;
/// # Ok(()) }
/// ```
pub struct DbClient<B: Backend> {
    backend: B,
    connections: Vec<B::Connection>,
    active: Option<ConnectionId>,
    history: QueryHistory,
    query_counter: u64,
    last: Option<QueryCursor>,
}

impl<B: Backend + Default> DbClient<B> {
    #[must_use]
    pub fn new(options: ClientOptions) -> Self {
        Self::with_backend(B::default(), options)
    }
}

impl<B: Backend> DbClient<B> {
    #[must_use]
    pub fn with_backend(backend: B, options: ClientOptions) -> Self {
        Self {
            backend,
            connections: Vec::new(),
            active: None,
            history: QueryHistory::new(options.history_capacity),
            query_counter: 0,
            last: None,
        }
    }

    /// Number of open connections.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    #[must_use]
    pub fn active_connection(&self) -> Option<ConnectionId> {
        self.active
    }

    /// The cursor kept from the last statement, if any.
    #[must_use]
    pub fn last_cursor(&self) -> Option<&QueryCursor> {
        self.last.as_ref()
    }

    /// `sql` in the backend's placeholder style.
    fn native_sql<'a>(&self, sql: &'a str) -> Cow<'a, str> {
        if self.backend.dialect().numbered_placeholders() {
            translate_placeholders(sql)
        } else {
            Cow::Borrowed(sql)
        }
    }

    /// Bookkeeping after a successful statement: history, counter and the kept cursor.
    fn record(&mut self, sql: &str, params: &[RowValues], cursor: QueryCursor) -> QueryCursor {
        self.history.record(sql, params);
        self.query_counter += 1;
        self.last = Some(cursor.clone());
        cursor
    }

    fn last_mut(&mut self) -> Result<&mut QueryCursor, DbalError> {
        self.last.as_mut().ok_or(DbalError::NoResultCursor)
    }
}

#[async_trait]
impl<B: Backend> Database for DbClient<B> {
    fn database_type(&self) -> DatabaseType {
        self.backend.database_type()
    }

    async fn new_connection(&mut self, params: &ConnectParams) -> Result<ConnectionId, DbalError> {
        let conn = self.backend.connect(params).await?;
        self.connections.push(conn);
        let id = self.connections.len() - 1;
        info!(
            backend = ?self.backend.database_type(),
            host = %params.host,
            database = %params.database,
            connection_id = id,
            "opened database connection"
        );
        Ok(id)
    }

    fn set_active_connection(&mut self, id: ConnectionId) {
        self.active = Some(id);
    }

    async fn execute_query(
        &mut self,
        query: &str,
        data: QueryParams,
        options: ExecOptions,
    ) -> Result<Option<QueryCursor>, DbalError> {
        if query.trim().is_empty() {
            debug!("skipping blank query");
            return Ok(None);
        }

        let sql = options.apply(query, self.backend.dialect());
        let native = self.native_sql(&sql);
        debug!(query = %native, params = data.len(), "executing query");

        let conn = resolve_active(&mut self.connections, self.active)?;
        let cursor = self.backend.run(conn, &native, data.as_slice()).await?;
        Ok(Some(self.record(&sql, data.as_slice(), cursor)))
    }

    fn num_rows(&self) -> Result<usize, DbalError> {
        self.last
            .as_ref()
            .map(QueryCursor::num_rows)
            .ok_or(DbalError::NoResultCursor)
    }

    fn get_rows(&mut self) -> Result<Option<CustomDbRow>, DbalError> {
        Ok(self.last_mut()?.next_row())
    }

    async fn delete_records(
        &mut self,
        table: &str,
        conditions: &FieldMap,
        limit: Option<usize>,
    ) -> Result<usize, DbalError> {
        let stmt = build_delete(self.backend.dialect(), table, conditions, limit)?;
        let cursor = self
            .execute_query(&stmt.query, stmt.params.into(), ExecOptions::default())
            .await?;
        Ok(cursor.map_or(0, |c| c.num_rows()))
    }

    async fn update_records(
        &mut self,
        table: &str,
        changes: &FieldMap,
        conditions: &FieldMap,
    ) -> Result<usize, DbalError> {
        let stmt = build_update(self.backend.dialect(), table, changes, conditions)?;
        let cursor = self
            .execute_query(&stmt.query, stmt.params.into(), ExecOptions::default())
            .await?;
        Ok(cursor.map_or(0, |c| c.num_rows()))
    }

    async fn insert_records(
        &mut self,
        table: &str,
        data: &FieldMap,
    ) -> Result<Option<i64>, DbalError> {
        let stmt = build_insert(self.backend.dialect(), table, data)?;
        let native = self.native_sql(&stmt.query);
        debug!(query = %native, params = stmt.params.len(), "executing insert");

        let conn = resolve_active(&mut self.connections, self.active)?;
        let (cursor, id) = self
            .backend
            .run_insert(conn, table, &native, &stmt.params)
            .await?;
        self.record(&stmt.query, &stmt.params, cursor);
        Ok(id)
    }

    fn query_count(&self) -> u64 {
        self.query_counter
    }

    fn history(&self) -> &QueryHistory {
        &self.history
    }
}

fn resolve_active<C>(
    connections: &mut [C],
    active: Option<ConnectionId>,
) -> Result<&mut C, DbalError> {
    let id = active.ok_or(DbalError::NoActiveConnection)?;
    connections
        .get_mut(id)
        .ok_or(DbalError::UnknownConnection(id))
}

impl<B: Backend> Drop for DbClient<B> {
    fn drop(&mut self) {
        if !self.connections.is_empty() {
            debug!(
                connections = self.connections.len(),
                "closing database connections"
            );
        }
    }
}
