use std::sync::Arc;

use rusqlite::ErrorCode;
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::ConnectParams;
use crate::error::DbalError;

/// A `SQLite` connection shared with the blocking thread pool.
pub type SharedSqliteConnection = Arc<Mutex<rusqlite::Connection>>;

/// Open `params.database` (creating it if needed) and force UTF-8 text encoding.
pub(crate) async fn open(params: &ConnectParams) -> Result<SharedSqliteConnection, DbalError> {
    if params.database.trim().is_empty() {
        return Err(DbalError::ConfigError(
            "sqlite database path is required".to_string(),
        ));
    }
    if !params.user.is_empty() || !params.password.is_empty() {
        debug!("sqlite ignores user credentials");
    }

    let path = params.database.clone();
    let conn = tokio::task::spawn_blocking(move || {
        let conn = rusqlite::Connection::open(&path).map_err(classify_open_error)?;
        conn.pragma_update(None, "encoding", "UTF-8")
            .map_err(classify_open_error)?;
        Ok::<_, DbalError>(conn)
    })
    .await
    .map_err(|e| DbalError::ConnectionFault(format!("sqlite open join error: {e}")))??;

    Ok(Arc::new(Mutex::new(conn)))
}

/// Access problems surface as `ConnectionError`, anything else as `ConnectionFault`.
fn classify_open_error(err: rusqlite::Error) -> DbalError {
    match err.sqlite_error_code() {
        Some(
            ErrorCode::CannotOpen
            | ErrorCode::PermissionDenied
            | ErrorCode::AuthorizationForStatementDenied
            | ErrorCode::NotADatabase,
        ) => DbalError::ConnectionError(err.to_string()),
        _ => DbalError::ConnectionFault(err.to_string()),
    }
}

pub(crate) async fn run_blocking<F, R>(
    conn: SharedSqliteConnection,
    func: F,
) -> Result<R, DbalError>
where
    F: FnOnce(&mut rusqlite::Connection) -> Result<R, DbalError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = conn.blocking_lock();
        func(&mut guard)
    })
    .await
    .map_err(|e| DbalError::ExecutionError(format!("sqlite spawn_blocking join error: {e}")))?
}
