use std::sync::Arc;

use rusqlite::Statement;
use rusqlite::types::Value;

use super::connection::{SharedSqliteConnection, run_blocking};
use super::params::Params;
use crate::error::DbalError;
use crate::results::{QueryCursor, ResultSet};
use crate::types::RowValues;

/// Prepare and run one statement on the blocking pool.
pub(crate) async fn run_statement(
    conn: &SharedSqliteConnection,
    query: &str,
    params: &[RowValues],
) -> Result<QueryCursor, DbalError> {
    let sql_owned = query.to_owned();
    let params_owned = Params::convert(params);
    run_blocking(Arc::clone(conn), move |guard| {
        let mut stmt = guard.prepare(&sql_owned).map_err(classify_error)?;
        if stmt.column_count() == 0 {
            let affected = stmt
                .execute(&params_owned.as_refs()[..])
                .map_err(classify_error)?;
            Ok(QueryCursor::from_rows_affected(affected))
        } else {
            build_result_set(&mut stmt, &params_owned.0).map(QueryCursor::from)
        }
    })
    .await
}

/// Run an INSERT with `RETURNING rowid` so the id comes from this statement alone.
///
/// Tables declared `WITHOUT ROWID` reject the clause; those fall back to a plain execute
/// and report no id. Any genuine error (missing table, constraint) resurfaces from the
/// fallback prepare or execute.
pub(crate) async fn run_insert(
    conn: &SharedSqliteConnection,
    query: &str,
    params: &[RowValues],
) -> Result<(QueryCursor, Option<i64>), DbalError> {
    let sql_owned = query.to_owned();
    let params_owned = Params::convert(params);
    run_blocking(Arc::clone(conn), move |guard| {
        let returning = format!("{sql_owned} RETURNING rowid");
        if let Ok(mut stmt) = guard.prepare(&returning) {
            let mut rows = stmt
                .query(&params_owned.as_refs()[..])
                .map_err(classify_error)?;
            let mut affected = 0;
            let mut id = None;
            while let Some(row) = rows.next().map_err(classify_error)? {
                affected += 1;
                id = row.get::<_, Option<i64>>(0).map_err(classify_error)?;
            }
            return Ok((QueryCursor::from_rows_affected(affected), id));
        }

        let mut stmt = guard.prepare(&sql_owned).map_err(classify_error)?;
        let affected = stmt
            .execute(&params_owned.as_refs()[..])
            .map_err(classify_error)?;
        Ok((QueryCursor::from_rows_affected(affected), None))
    })
    .await
}

/// Extract a `RowValues` from a `SQLite` row.
fn extract_value(row: &rusqlite::Row, idx: usize) -> Result<RowValues, DbalError> {
    let value: Value = row.get(idx).map_err(classify_error)?;
    Ok(match value {
        Value::Null => RowValues::Null,
        Value::Integer(i) => RowValues::Int(i),
        Value::Real(f) => RowValues::Float(f),
        Value::Text(s) => RowValues::Text(s),
        Value::Blob(b) => RowValues::Blob(b),
    })
}

/// Run a row-returning statement and collect every row.
///
/// # Errors
/// Returns `DbalError::TableNotFound` or `DbalError::ExecutionError` if stepping the statement fails.
pub fn build_result_set(stmt: &mut Statement, params: &[Value]) -> Result<ResultSet, DbalError> {
    let param_refs: Vec<&dyn rusqlite::ToSql> =
        params.iter().map(|v| v as &dyn rusqlite::ToSql).collect();
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let col_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_column_names(Arc::new(column_names));

    let mut rows_iter = stmt.query(&param_refs[..]).map_err(classify_error)?;
    while let Some(row) = rows_iter.next().map_err(classify_error)? {
        let mut row_values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            row_values.push(extract_value(row, i)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}

/// `no such table` becomes `TableNotFound`; everything else is an opaque execution failure.
pub(crate) fn classify_error(err: rusqlite::Error) -> DbalError {
    if let rusqlite::Error::SqliteFailure(_, Some(message)) = &err
        && message.starts_with("no such table")
    {
        return DbalError::TableNotFound(message.clone());
    }
    DbalError::ExecutionError(format!("sqlite error: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory() -> rusqlite::Connection {
        rusqlite::Connection::open_in_memory().unwrap()
    }

    #[test]
    fn missing_table_is_classified() {
        let conn = memory();
        let err = conn.prepare("SELECT * FROM nope").map(|_| ()).unwrap_err();
        assert!(matches!(classify_error(err), DbalError::TableNotFound(_)));
    }

    #[test]
    fn syntax_error_is_opaque() {
        let conn = memory();
        let err = conn.prepare("SELEC 1").map(|_| ()).unwrap_err();
        assert!(matches!(classify_error(err), DbalError::ExecutionError(_)));
    }

    #[test]
    fn collects_rows_with_column_names() {
        let conn = memory();
        conn.execute_batch("CREATE TABLE t (id INTEGER, name TEXT); INSERT INTO t VALUES (1, 'a'), (2, NULL);")
            .unwrap();
        let mut stmt = conn.prepare("SELECT id, name FROM t ORDER BY id").unwrap();
        let rs = build_result_set(&mut stmt, &[]).unwrap();
        assert_eq!(rs.rows_affected, 2);
        assert_eq!(rs.results[0].get("name"), Some(&RowValues::Text("a".into())));
        assert!(rs.results[1].get("name").unwrap().is_null());
    }
}
