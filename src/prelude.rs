//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::backend::Backend;
pub use crate::client::DbClient;
pub use crate::config::ConnectParams;
pub use crate::database::{Capability, ConnectionId, Database};
pub use crate::error::DbalError;
pub use crate::factory::{BackendConstructor, BackendRegistry, create, create_with_options};
pub use crate::history::{HistoryEntry, QueryHistory};
pub use crate::options::{ClientOptions, ExecOptions};
pub use crate::results::{CustomDbRow, QueryCursor, ResultSet};
pub use crate::translation::translate_placeholders;
pub use crate::types::{DatabaseType, FieldMap, QueryAndParams, QueryParams, RowValues};

#[cfg(feature = "postgres")]
pub use crate::postgres::{PostgresBackend, PostgresClient};
#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteBackend, SqliteClient};
