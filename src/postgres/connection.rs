use tokio_postgres::error::SqlState;
use tokio_postgres::{Client, Config, NoTls};
use tracing::error;

use crate::config::ConnectParams;
use crate::error::DbalError;

pub const DEFAULT_PORT: u16 = 5432;

/// Connect with a UTF-8 client encoding and drive the connection on a background task.
pub(crate) async fn open(params: &ConnectParams) -> Result<Client, DbalError> {
    if params.database.trim().is_empty() {
        return Err(DbalError::ConfigError("dbname is required".to_string()));
    }
    if params.host.trim().is_empty() {
        return Err(DbalError::ConfigError("host is required".to_string()));
    }

    let mut config = Config::new();
    config
        .host(&params.host)
        .port(params.port.unwrap_or(DEFAULT_PORT))
        .user(&params.user)
        .dbname(&params.database)
        .options("-c client_encoding=UTF8");
    if !params.password.is_empty() {
        config.password(&params.password);
    }

    let (client, connection) = config.connect(NoTls).await.map_err(classify_connect_error)?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            error!(error = %e, "postgres connection error");
        }
    });
    Ok(client)
}

/// Authentication failures surface as `ConnectionError`, anything else as `ConnectionFault`.
fn classify_connect_error(err: tokio_postgres::Error) -> DbalError {
    match err.code() {
        Some(code)
            if *code == SqlState::INVALID_PASSWORD
                || *code == SqlState::INVALID_AUTHORIZATION_SPECIFICATION =>
        {
            DbalError::ConnectionError(err.to_string())
        }
        _ => DbalError::ConnectionFault(err.to_string()),
    }
}
