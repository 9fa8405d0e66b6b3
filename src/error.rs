use thiserror::Error;

/// Code attached to access/authentication failures while connecting.
pub const CONNECTION_ERROR_CODE: u16 = 400;
/// Code attached to queries that reference a missing table or view.
pub const TABLE_NOT_FOUND_CODE: u16 = 401;

#[derive(Debug, Error)]
pub enum DbalError {
    #[error("Cannot connect to database: {0}")]
    ConnectionError(String),

    #[error("Connection failure: {0}")]
    ConnectionFault(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Database backend not found: {0}")]
    BackendNotFound(String),

    #[error("Invalid database implementation: {0}")]
    InvalidImplementation(String),

    #[error("Table could not be found: {0}")]
    TableNotFound(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("Empty field map: {0}")]
    EmptyFieldMap(String),

    #[error("No active connection has been selected")]
    NoActiveConnection,

    #[error("Unknown connection id: {0}")]
    UnknownConnection(usize),

    #[error("No query has been executed yet")]
    NoResultCursor,

    #[error("Parameter conversion error: {0}")]
    ParameterError(String),

    #[error("Unimplemented feature: {0}")]
    Unimplemented(String),
}

impl DbalError {
    /// Numeric code for the error kinds that carry one.
    #[must_use]
    pub fn code(&self) -> Option<u16> {
        match self {
            DbalError::ConnectionError(_) => Some(CONNECTION_ERROR_CODE),
            DbalError::TableNotFound(_) => Some(TABLE_NOT_FOUND_CODE),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_only_on_connection_and_missing_table() {
        assert_eq!(DbalError::ConnectionError("denied".into()).code(), Some(400));
        assert_eq!(DbalError::TableNotFound("t".into()).code(), Some(401));
        assert_eq!(DbalError::ExecutionError("boom".into()).code(), None);
        assert_eq!(DbalError::NoActiveConnection.code(), None);
    }
}
