use std::fmt;

use serde::{Deserialize, Serialize};

/// Everything needed to open one connection.
///
/// `SQLite` only looks at `database` (a file path or `:memory:`); the network
/// fields are there for server backends. The password is never serialized and
/// never printed by `Debug`.
/// ```rust
/// use sql_dbal::prelude::*;
///
/// let params: ConnectParams = serde_json::from_str(
///     r#"{"host": "localhost", "port": 5432, "user": "app", "password": "s3cret", "database": "app"}"#,
/// ).unwrap();
/// assert_eq!(params.port, Some(5432));
/// assert!(!format!("{params:?}").contains("s3cret"));
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectParams {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub user: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    pub database: String,
}

impl ConnectParams {
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: None,
            user: user.into(),
            password: password.into(),
            database: database.into(),
        }
    }

    /// Parameters for a `SQLite` database file (or `:memory:`).
    pub fn sqlite(path: impl Into<String>) -> Self {
        Self {
            database: path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }
}

impl fmt::Debug for ConnectParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}
