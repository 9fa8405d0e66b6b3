use std::collections::VecDeque;

use crate::types::RowValues;

/// One executed statement: the query text as sent and its bind values.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    query: String,
    params: Vec<RowValues>,
}

impl HistoryEntry {
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn params(&self) -> &[RowValues] {
        &self.params
    }
}

/// Ring buffer of executed statements, oldest first.
#[derive(Debug, Clone)]
pub struct QueryHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: Option<usize>,
}

impl QueryHistory {
    /// `None` keeps every entry; `Some(0)` keeps nothing.
    #[must_use]
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    pub(crate) fn record(&mut self, query: &str, params: &[RowValues]) {
        if let Some(capacity) = self.capacity {
            if capacity == 0 {
                return;
            }
            while self.entries.len() >= capacity {
                self.entries.pop_front();
            }
        }
        self.entries.push_back(HistoryEntry {
            query: query.to_string(),
            params: params.to_vec(),
        });
    }

    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_first() {
        let mut history = QueryHistory::new(Some(2));
        history.record("q1", &[]);
        history.record("q2", &[RowValues::Int(2)]);
        history.record("q3", &[RowValues::Int(3)]);
        let queries: Vec<_> = history.iter().map(HistoryEntry::query).collect();
        assert_eq!(queries, vec!["q2", "q3"]);
        assert_eq!(history.last().unwrap().params(), &[RowValues::Int(3)]);
    }

    #[test]
    fn zero_capacity_disables_recording() {
        let mut history = QueryHistory::new(Some(0));
        history.record("q1", &[]);
        assert!(history.is_empty());
    }

    #[test]
    fn unbounded_keeps_everything() {
        let mut history = QueryHistory::new(None);
        for i in 0..50 {
            history.record(&format!("q{i}"), &[]);
        }
        assert_eq!(history.len(), 50);
    }
}
