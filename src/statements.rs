//! Parameterized DELETE / UPDATE / INSERT text built from field maps.
//!
//! Only values are bound; table and column names go into the SQL text after passing the
//! identifier allow-list in [`crate::dialect`].

use crate::dialect::{Dialect, validate_column, validate_table};
use crate::error::DbalError;
use crate::types::{FieldMap, QueryAndParams, RowValues};

/// `DELETE FROM table WHERE c1 = ? AND c2 = ?`, capped at `limit` rows when `limit >= 1`.
///
/// # Errors
/// Returns `DbalError::EmptyFieldMap` without conditions and `DbalError::InvalidIdentifier`
/// for names outside the allow-list.
pub fn build_delete(
    dialect: Dialect,
    table: &str,
    conditions: &FieldMap,
    limit: Option<usize>,
) -> Result<QueryAndParams, DbalError> {
    let table = validate_table(table)?;
    let mut params = Vec::with_capacity(conditions.len());
    let predicate = conjunction(dialect, conditions, "delete conditions", &mut params)?;

    let query = match limit.filter(|n| *n >= 1) {
        Some(n) => {
            let locator = dialect.row_locator();
            format!(
                "DELETE FROM {table} WHERE {locator} IN (SELECT {locator} FROM {table} WHERE {predicate}{})",
                dialect.limit_clause(0, n as u64)
            )
        }
        None => format!("DELETE FROM {table} WHERE {predicate}"),
    };
    Ok(QueryAndParams::new(query, params))
}

/// `UPDATE table SET a = ?, b = ? WHERE c = ? AND d = ?`; binds changes, then conditions.
///
/// # Errors
/// Returns `DbalError::EmptyFieldMap` when either map is empty and
/// `DbalError::InvalidIdentifier` for names outside the allow-list.
pub fn build_update(
    dialect: Dialect,
    table: &str,
    changes: &FieldMap,
    conditions: &FieldMap,
) -> Result<QueryAndParams, DbalError> {
    let table = validate_table(table)?;
    if changes.is_empty() {
        return Err(DbalError::EmptyFieldMap("update changes".to_string()));
    }
    let mut params = Vec::with_capacity(changes.len() + conditions.len());
    let mut assignments = Vec::with_capacity(changes.len());
    for (column, value) in changes.iter() {
        assignments.push(format!("{} = ?", dialect.quote_identifier(validate_column(column)?)));
        params.push(value.clone());
    }
    let predicate = conjunction(dialect, conditions, "update conditions", &mut params)?;

    let query = format!(
        "UPDATE {table} SET {} WHERE {predicate}",
        assignments.join(", ")
    );
    Ok(QueryAndParams::new(query, params))
}

/// `INSERT INTO table (a, b) VALUES (?, ?)` in field-map order.
///
/// # Errors
/// Returns `DbalError::EmptyFieldMap` when `data` is empty and `DbalError::InvalidIdentifier`
/// for names outside the allow-list.
pub fn build_insert(
    dialect: Dialect,
    table: &str,
    data: &FieldMap,
) -> Result<QueryAndParams, DbalError> {
    let table = validate_table(table)?;
    if data.is_empty() {
        return Err(DbalError::EmptyFieldMap("insert data".to_string()));
    }
    let columns = data
        .columns()
        .map(|column| validate_column(column).map(|c| dialect.quote_identifier(c)))
        .collect::<Result<Vec<_>, _>>()?;
    let markers = vec!["?"; columns.len()].join(", ");
    let params: Vec<RowValues> = data.values().cloned().collect();

    let query = format!(
        "INSERT INTO {table} ({}) VALUES ({markers})",
        columns.join(", ")
    );
    Ok(QueryAndParams::new(query, params))
}

fn conjunction(
    dialect: Dialect,
    conditions: &FieldMap,
    what: &str,
    params: &mut Vec<RowValues>,
) -> Result<String, DbalError> {
    if conditions.is_empty() {
        return Err(DbalError::EmptyFieldMap(what.to_string()));
    }
    let mut terms = Vec::with_capacity(conditions.len());
    for (column, value) in conditions.iter() {
        terms.push(format!("{} = ?", dialect.quote_identifier(validate_column(column)?)));
        params.push(value.clone());
    }
    Ok(terms.join(" AND "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_single_condition() {
        let stmt = build_delete(Dialect::Sqlite, "t", &FieldMap::new().with("id", 5), None).unwrap();
        assert_eq!(stmt.query, "DELETE FROM t WHERE `id` = ?");
        assert_eq!(stmt.params, vec![RowValues::Int(5)]);
    }

    #[test]
    fn delete_conditions_follow_insertion_order() {
        let conditions = FieldMap::new().with("b", "x").with("a", 1);
        let stmt = build_delete(Dialect::Sqlite, "t", &conditions, Some(0)).unwrap();
        assert_eq!(stmt.query, "DELETE FROM t WHERE `b` = ? AND `a` = ?");
        assert_eq!(
            stmt.params,
            vec![RowValues::Text("x".into()), RowValues::Int(1)]
        );
    }

    #[test]
    fn delete_with_limit_uses_row_locator() {
        let conditions = FieldMap::new().with("kind", "old");
        let sqlite = build_delete(Dialect::Sqlite, "t", &conditions, Some(3)).unwrap();
        assert_eq!(
            sqlite.query,
            "DELETE FROM t WHERE rowid IN (SELECT rowid FROM t WHERE `kind` = ? LIMIT 0, 3)"
        );
        let pg = build_delete(Dialect::Postgres, "t", &conditions, Some(3)).unwrap();
        assert_eq!(
            pg.query,
            "DELETE FROM t WHERE ctid IN (SELECT ctid FROM t WHERE \"kind\" = ? LIMIT 3 OFFSET 0)"
        );
        assert_eq!(pg.params, vec![RowValues::Text("old".into())]);
    }

    #[test]
    fn update_binds_changes_then_conditions() {
        let stmt = build_update(
            Dialect::Sqlite,
            "t",
            &FieldMap::new().with("name", "a"),
            &FieldMap::new().with("id", 1),
        )
        .unwrap();
        assert_eq!(stmt.query, "UPDATE t SET `name` = ? WHERE `id` = ?");
        assert_eq!(
            stmt.params,
            vec![RowValues::Text("a".into()), RowValues::Int(1)]
        );
    }

    #[test]
    fn update_many_columns() {
        let stmt = build_update(
            Dialect::Postgres,
            "app.t",
            &FieldMap::new().with("a", 1).with("b", 2),
            &FieldMap::new().with("x", 3).with("y", 4),
        )
        .unwrap();
        assert_eq!(
            stmt.query,
            "UPDATE app.t SET \"a\" = ?, \"b\" = ? WHERE \"x\" = ? AND \"y\" = ?"
        );
        assert_eq!(stmt.params.len(), 4);
    }

    #[test]
    fn insert_columns_and_markers() {
        let stmt = build_insert(
            Dialect::Sqlite,
            "t",
            &FieldMap::new().with("a", 1).with("b", 2),
        )
        .unwrap();
        assert_eq!(stmt.query, "INSERT INTO t (`a`, `b`) VALUES (?, ?)");
        assert_eq!(stmt.params, vec![RowValues::Int(1), RowValues::Int(2)]);
    }

    #[test]
    fn empty_maps_are_rejected() {
        let empty = FieldMap::new();
        let some = FieldMap::new().with("id", 1);
        assert!(matches!(
            build_delete(Dialect::Sqlite, "t", &empty, None),
            Err(DbalError::EmptyFieldMap(_))
        ));
        assert!(matches!(
            build_update(Dialect::Sqlite, "t", &empty, &some),
            Err(DbalError::EmptyFieldMap(_))
        ));
        assert!(matches!(
            build_update(Dialect::Sqlite, "t", &some, &empty),
            Err(DbalError::EmptyFieldMap(_))
        ));
        assert!(matches!(
            build_insert(Dialect::Sqlite, "t", &empty),
            Err(DbalError::EmptyFieldMap(_))
        ));
    }

    #[test]
    fn hostile_identifiers_are_rejected() {
        let data = FieldMap::new().with("id", 1);
        assert!(matches!(
            build_insert(Dialect::Sqlite, "t; DROP TABLE t", &data),
            Err(DbalError::InvalidIdentifier(_))
        ));
        let bad_column = FieldMap::new().with("id` = 1 OR `1", 1);
        assert!(matches!(
            build_delete(Dialect::Sqlite, "t", &bad_column, None),
            Err(DbalError::InvalidIdentifier(_))
        ));
    }
}
