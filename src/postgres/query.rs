use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use tokio_postgres::error::SqlState;
use tokio_postgres::{Client, Statement};

use super::params::Params;
use crate::dialect::Dialect;
use crate::error::DbalError;
use crate::results::{QueryCursor, ResultSet};
use crate::types::RowValues;

/// Prepare `query` and either fetch its rows or report rows affected.
pub(crate) async fn run_statement(
    client: &Client,
    query: &str,
    params: &[RowValues],
) -> Result<QueryCursor, DbalError> {
    let stmt = client.prepare(query).await.map_err(classify_error)?;
    let converted = Params::convert(params);

    if stmt.columns().is_empty() {
        let rows = client
            .execute(&stmt, converted.as_refs())
            .await
            .map_err(classify_error)?;
        let affected = usize::try_from(rows).map_err(|e| {
            DbalError::ExecutionError(format!("postgres affected rows conversion error: {e}"))
        })?;
        Ok(QueryCursor::from_rows_affected(affected))
    } else {
        let rows = client
            .query(&stmt, converted.as_refs())
            .await
            .map_err(classify_error)?;
        build_result_set_from_statement(&stmt, &rows).map(QueryCursor::from)
    }
}

/// First column of `table` backed by a sequence (`serial` or identity).
const SEQUENCE_COLUMN: &str = "SELECT a.attname::text FROM pg_attribute a \
     WHERE a.attrelid = $1::text::regclass AND a.attnum > 0 AND NOT a.attisdropped \
     AND pg_get_serial_sequence($1::text, a.attname::text) IS NOT NULL \
     ORDER BY a.attnum LIMIT 1";

/// Run an INSERT and return the value this statement assigned to the table's sequence column.
///
/// The column is looked up in the catalog and read back with `RETURNING`, so the id belongs to
/// this row even when other tables or sessions use sequences. Tables without a sequence-backed
/// column report no id.
pub(crate) async fn run_insert(
    client: &Client,
    table: &str,
    query: &str,
    params: &[RowValues],
) -> Result<(QueryCursor, Option<i64>), DbalError> {
    let column = client
        .query_opt(SEQUENCE_COLUMN, &[&table])
        .await
        .map_err(classify_error)?
        .map(|row| row.try_get::<_, String>(0))
        .transpose()
        .map_err(classify_error)?;
    let Some(column) = column else {
        return run_statement(client, query, params).await.map(|cursor| (cursor, None));
    };

    let returning = format!(
        "{query} RETURNING {}",
        Dialect::Postgres.quote_identifier(&column)
    );
    let stmt = client.prepare(&returning).await.map_err(classify_error)?;
    let converted = Params::convert(params);
    let rows = client
        .query(&stmt, converted.as_refs())
        .await
        .map_err(classify_error)?;
    let id = match rows.first() {
        Some(row) => postgres_extract_value(row, 0)?.as_int().copied(),
        None => None,
    };
    Ok((QueryCursor::from_rows_affected(rows.len()), id))
}

/// Extracts a `RowValues` from a `tokio_postgres` Row at the given index.
///
/// # Errors
/// Returns `DbalError::ExecutionError` if the column cannot be decoded.
pub fn postgres_extract_value(
    row: &tokio_postgres::Row,
    idx: usize,
) -> Result<RowValues, DbalError> {
    let type_info = row.columns()[idx].type_();

    let value = match type_info.name() {
        "int2" => row
            .try_get::<_, Option<i16>>(idx)
            .map(|v| v.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v)))),
        "int4" => row
            .try_get::<_, Option<i32>>(idx)
            .map(|v| v.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v)))),
        "int8" => row
            .try_get::<_, Option<i64>>(idx)
            .map(|v| v.map_or(RowValues::Null, RowValues::Int)),
        "float4" => row
            .try_get::<_, Option<f32>>(idx)
            .map(|v| v.map_or(RowValues::Null, |v| RowValues::Float(f64::from(v)))),
        "float8" => row
            .try_get::<_, Option<f64>>(idx)
            .map(|v| v.map_or(RowValues::Null, RowValues::Float)),
        "bool" => row
            .try_get::<_, Option<bool>>(idx)
            .map(|v| v.map_or(RowValues::Null, RowValues::Bool)),
        "timestamp" => row
            .try_get::<_, Option<NaiveDateTime>>(idx)
            .map(|v| v.map_or(RowValues::Null, RowValues::Timestamp)),
        "timestamptz" => row
            .try_get::<_, Option<chrono::DateTime<chrono::Utc>>>(idx)
            .map(|v| v.map_or(RowValues::Null, |v| RowValues::Timestamp(v.naive_utc()))),
        "date" => row.try_get::<_, Option<NaiveDate>>(idx).map(|v| {
            v.and_then(|d| d.and_hms_opt(0, 0, 0))
                .map_or(RowValues::Null, RowValues::Timestamp)
        }),
        "json" | "jsonb" => row
            .try_get::<_, Option<Value>>(idx)
            .map(|v| v.map_or(RowValues::Null, RowValues::JSON)),
        "bytea" => row
            .try_get::<_, Option<Vec<u8>>>(idx)
            .map(|v| v.map_or(RowValues::Null, RowValues::Blob)),
        // text, varchar, bpchar, name and anything else readable as a string
        _ => row
            .try_get::<_, Option<String>>(idx)
            .map(|v| v.map_or(RowValues::Null, RowValues::Text)),
    };
    value.map_err(classify_error)
}

/// Build a result set using statement metadata for column names.
///
/// # Errors
/// Returns errors from row value extraction.
pub fn build_result_set_from_statement(
    stmt: &Statement,
    rows: &[tokio_postgres::Row],
) -> Result<ResultSet, DbalError> {
    let column_names: Vec<String> = stmt
        .columns()
        .iter()
        .map(|col| col.name().to_string())
        .collect();
    let column_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(rows.len());
    result_set.set_column_names(std::sync::Arc::new(column_names));

    for row in rows {
        let mut row_values = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            row_values.push(postgres_extract_value(row, idx)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}

pub(crate) fn classify_error(err: tokio_postgres::Error) -> DbalError {
    if err.code() == Some(&SqlState::UNDEFINED_TABLE) {
        let message = err
            .as_db_error()
            .map_or_else(|| err.to_string(), |db| db.message().to_string());
        return DbalError::TableNotFound(message);
    }
    DbalError::ExecutionError(format!("postgres error: {err}"))
}
