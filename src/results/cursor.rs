use std::iter::FusedIterator;
use std::sync::Arc;

use super::result_set::ResultSet;
use super::row::CustomDbRow;

/// Forward-only handle over the outcome of one executed statement.
///
/// Rows are handed out in order and never revisited; once the last row is
/// returned, every further call to [`QueryCursor::next_row`] yields `None`.
/// ```rust
/// use std::sync::Arc;
/// use sql_dbal::prelude::*;
///
/// let mut rs = ResultSet::with_capacity(1);
/// rs.set_column_names(Arc::new(vec!["id".to_string()]));
/// rs.add_row_values(vec![RowValues::Int(1)]);
///
/// let mut cursor = QueryCursor::from(rs);
/// assert_eq!(cursor.num_rows(), 1);
/// assert!(cursor.next_row().is_some());
/// assert!(cursor.next_row().is_none());
/// assert!(cursor.next_row().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct QueryCursor {
    column_names: Arc<Vec<String>>,
    rows: std::vec::IntoIter<CustomDbRow>,
    rows_affected: usize,
}

impl QueryCursor {
    /// Cursor for a statement that returned no rows but touched `rows_affected` of them.
    #[must_use]
    pub fn from_rows_affected(rows_affected: usize) -> Self {
        Self::from(ResultSet::from_rows_affected(rows_affected))
    }

    /// Rows returned by a SELECT, or rows affected by a DML statement.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows_affected
    }

    /// Column names of the result; empty for statements that return no rows.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Rows not yet fetched.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }

    /// Advance the cursor, or `None` once every row has been fetched.
    pub fn next_row(&mut self) -> Option<CustomDbRow> {
        self.rows.next()
    }
}

impl From<ResultSet> for QueryCursor {
    fn from(result_set: ResultSet) -> Self {
        let column_names = result_set
            .get_column_names()
            .cloned()
            .unwrap_or_default();
        Self {
            column_names,
            rows_affected: result_set.rows_affected,
            rows: result_set.results.into_iter(),
        }
    }
}

impl Iterator for QueryCursor {
    type Item = CustomDbRow;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for QueryCursor {}

impl FusedIterator for QueryCursor {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RowValues;

    fn two_rows() -> ResultSet {
        let mut rs = ResultSet::with_capacity(2);
        rs.set_column_names(Arc::new(vec!["id".to_string()]));
        rs.add_row_values(vec![RowValues::Int(1)]);
        rs.add_row_values(vec![RowValues::Int(2)]);
        rs
    }

    #[test]
    fn exhaustion_is_sticky() {
        let mut cursor = QueryCursor::from(two_rows());
        assert_eq!(cursor.num_rows(), 2);
        assert_eq!(cursor.next_row().unwrap().get("id"), Some(&RowValues::Int(1)));
        assert_eq!(cursor.next_row().unwrap().get("id"), Some(&RowValues::Int(2)));
        for _ in 0..3 {
            assert!(cursor.next_row().is_none());
        }
        // the count describes the statement, not what is left to fetch
        assert_eq!(cursor.num_rows(), 2);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn clones_advance_independently() {
        let mut first = QueryCursor::from(two_rows());
        let mut second = first.clone();
        assert!(first.next_row().is_some());
        assert_eq!(first.remaining(), 1);
        assert_eq!(second.remaining(), 2);
        assert_eq!(second.by_ref().count(), 2);
    }

    #[test]
    fn dml_cursor_has_no_rows() {
        let mut cursor = QueryCursor::from_rows_affected(3);
        assert_eq!(cursor.num_rows(), 3);
        assert!(cursor.column_names().is_empty());
        assert!(cursor.next_row().is_none());
    }
}
