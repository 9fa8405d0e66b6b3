//! A small database access layer.
//!
//! Clients own a set of connections, one of which is active. Statements use positional `?`
//! markers on every backend, and the DELETE / UPDATE / INSERT builders bind values from
//! ordered [`types::FieldMap`]s. Backends are looked up by name through [`factory::create`].
//!
//! ```rust,no_run
//! use sql_dbal::prelude::*;
//!
//! # async fn demo() -> Result<(), DbalError> {
//! let mut db = sql_dbal::create("sqlite")?;
//! let id = db.new_connection(&ConnectParams::sqlite("app.db")).await?;
//! db.set_active_connection(id);
//! db.execute_query("SELECT * FROM users WHERE id = ?", RowValues::Int(1).into(), ExecOptions::default())
//!     .await?;
//! while let Some(row) = db.get_rows()? {
//!     println!("{}", row.to_json());
//! }
//! # Ok(()) }
//! ```

pub mod backend;
pub mod client;
pub mod config;
pub mod database;
pub mod dialect;
pub mod error;
pub mod factory;
pub mod history;
pub mod options;
pub mod prelude;
pub mod results;
pub mod statements;
pub mod translation;
pub mod types;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use error::DbalError;
pub use factory::{create, create_with_options};
