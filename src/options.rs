use crate::dialect::Dialect;

/// History capacity used by [`ClientOptions::default`].
pub const DEFAULT_HISTORY_CAPACITY: usize = 1024;

/// Per-call options for `execute_query`.
///
/// Pagination is applied only when both `start` and `rows` are set, `start >= 0` and
/// `rows >= 1`; anything else runs the statement as written.
/// ```rust
/// use sql_dbal::prelude::*;
/// use sql_dbal::dialect::Dialect;
///
/// let page = ExecOptions::page(10, 5);
/// assert_eq!(page.apply("select * from t", Dialect::Sqlite), "select * from t LIMIT 10, 5");
/// assert_eq!(ExecOptions::page(-1, 5).apply("select * from t", Dialect::Sqlite), "select * from t");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOptions {
    pub start: Option<i64>,
    pub rows: Option<i64>,
}

impl ExecOptions {
    #[must_use]
    pub fn page(start: i64, rows: i64) -> Self {
        Self {
            start: Some(start),
            rows: Some(rows),
        }
    }

    #[must_use]
    pub fn with_start(mut self, start: i64) -> Self {
        self.start = Some(start);
        self
    }

    #[must_use]
    pub fn with_rows(mut self, rows: i64) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Validated `(start, rows)` pair, if pagination applies.
    #[must_use]
    pub fn pagination(&self) -> Option<(u64, u64)> {
        let start = u64::try_from(self.start?).ok()?;
        let rows = u64::try_from(self.rows?).ok().filter(|rows| *rows >= 1)?;
        Some((start, rows))
    }

    /// The query text to execute: `query` with the dialect's pagination clause appended when
    /// it applies. A trailing `;` is dropped before appending.
    #[must_use]
    pub fn apply(&self, query: &str, dialect: Dialect) -> String {
        match self.pagination() {
            Some((start, rows)) => {
                let base = query.trim_end().trim_end_matches(';').trim_end();
                format!("{base}{}", dialect.limit_clause(start, rows))
            }
            None => query.to_string(),
        }
    }
}

/// Client-wide settings handed to every backend constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Maximum number of history entries kept. `Some(0)` disables history, `None` keeps
    /// everything for the lifetime of the client.
    pub history_capacity: Option<usize>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            history_capacity: Some(DEFAULT_HISTORY_CAPACITY),
        }
    }
}

impl ClientOptions {
    #[must_use]
    pub fn with_history_capacity(mut self, capacity: Option<usize>) -> Self {
        self.history_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_requires_both_bounds() {
        assert_eq!(ExecOptions::page(10, 5).pagination(), Some((10, 5)));
        assert_eq!(ExecOptions::page(0, 1).pagination(), Some((0, 1)));
        assert_eq!(ExecOptions::page(-1, 5).pagination(), None);
        assert_eq!(ExecOptions::page(0, 0).pagination(), None);
        assert_eq!(ExecOptions::default().with_start(3).pagination(), None);
        assert_eq!(ExecOptions::default().with_rows(3).pagination(), None);
    }

    #[test]
    fn apply_strips_trailing_semicolon() {
        let sql = ExecOptions::page(0, 2).apply("select * from t;  ", Dialect::Postgres);
        assert_eq!(sql, "select * from t LIMIT 2 OFFSET 0");
        let untouched = ExecOptions::default().apply("select * from t;", Dialect::Sqlite);
        assert_eq!(untouched, "select * from t;");
    }
}
