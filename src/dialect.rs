use std::sync::LazyLock;

use regex::Regex;

use crate::error::DbalError;

static COLUMN_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*$").expect("column name pattern is valid")
});

static TABLE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*(\.[A-Za-z_][A-Za-z0-9_$]*)?$")
        .expect("table name pattern is valid")
});

/// SQL flavour spoken by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
    Postgres,
}

impl Dialect {
    /// Quote a column name that already passed [`validate_column`].
    #[must_use]
    pub fn quote_identifier(self, name: &str) -> String {
        match self {
            Dialect::Sqlite => format!("`{name}`"),
            Dialect::Postgres => format!("\"{name}\""),
        }
    }

    /// Pagination clause (with a leading space) skipping `start` rows and returning at most `rows`.
    #[must_use]
    pub fn limit_clause(self, start: u64, rows: u64) -> String {
        match self {
            Dialect::Sqlite => format!(" LIMIT {start}, {rows}"),
            Dialect::Postgres => format!(" LIMIT {rows} OFFSET {start}"),
        }
    }

    /// Pseudo-column that addresses a physical row, used to cap DELETEs.
    #[must_use]
    pub fn row_locator(self) -> &'static str {
        match self {
            Dialect::Sqlite => "rowid",
            Dialect::Postgres => "ctid",
        }
    }

    /// Whether `?` templates must become `$1, $2, ...` before reaching the driver.
    #[must_use]
    pub fn numbered_placeholders(self) -> bool {
        matches!(self, Dialect::Postgres)
    }
}

/// Accept a table name, optionally schema-qualified (`schema.table`).
///
/// # Errors
/// Returns `DbalError::InvalidIdentifier` for anything outside the allow-list.
pub fn validate_table(name: &str) -> Result<&str, DbalError> {
    if TABLE_NAME.is_match(name) {
        Ok(name)
    } else {
        Err(DbalError::InvalidIdentifier(name.to_string()))
    }
}

/// Accept a bare column name.
///
/// # Errors
/// Returns `DbalError::InvalidIdentifier` for anything outside the allow-list.
pub fn validate_column(name: &str) -> Result<&str, DbalError> {
    if COLUMN_NAME.is_match(name) {
        Ok(name)
    } else {
        Err(DbalError::InvalidIdentifier(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list() {
        assert!(validate_table("users").is_ok());
        assert!(validate_table("app.users").is_ok());
        assert!(validate_table("app.users.extra").is_err());
        assert!(validate_table("users; drop table x").is_err());
        assert!(validate_column("user_id").is_ok());
        assert!(validate_column("a.b").is_err());
        assert!(validate_column("1abc").is_err());
        assert!(validate_column("na`me").is_err());
        assert!(validate_column("").is_err());
    }

    #[test]
    fn dialect_specific_text() {
        assert_eq!(Dialect::Sqlite.quote_identifier("id"), "`id`");
        assert_eq!(Dialect::Postgres.quote_identifier("id"), "\"id\"");
        assert_eq!(Dialect::Sqlite.limit_clause(10, 5), " LIMIT 10, 5");
        assert_eq!(Dialect::Postgres.limit_clause(10, 5), " LIMIT 5 OFFSET 10");
        assert!(Dialect::Postgres.numbered_placeholders());
        assert!(!Dialect::Sqlite.numbered_placeholders());
    }
}
