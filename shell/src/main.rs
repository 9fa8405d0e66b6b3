mod args;
mod logging;

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use sql_dbal::prelude::*;
use tracing::{Level, error, info};

use crate::args::{Args, Command, ConnectionArgs, field_map};
use crate::logging::LogWriter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    let writer = match LogWriter::new(args.log.clone()) {
        Ok(writer) => writer,
        Err(err) => {
            eprintln!("failed to open log file: {err}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_target(false)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.code() {
                Some(code) => error!(code, "{err}"),
                None => error!("{err}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), DbalError> {
    let params = connect_params(args.config.as_deref(), args.connection)?;
    let params_json = serde_json::to_string(&params).unwrap_or_else(|_| "{}".to_string());
    info!(backend = args.backend.as_str(), "connection: {}", params_json);

    let mut db = sql_dbal::create(args.backend.as_str())?;
    let id = db.new_connection(&params).await?;
    db.set_active_connection(id);

    let mut out = io::stdout().lock();
    match args.command {
        Command::Query {
            sql,
            params,
            start,
            rows,
        } => {
            let options = ExecOptions { start, rows };
            let Some(cursor) = db.execute_query(&sql, params.into(), options).await? else {
                return Ok(());
            };
            if cursor.column_names().is_empty() {
                print_line(&mut out, &format!("{} row(s) affected", cursor.num_rows()))?;
            }
            for row in cursor {
                print_line(&mut out, &row.to_json().to_string())?;
            }
        }
        Command::Insert { table, set } => {
            let id = db.insert_records(&table, &field_map(set)).await?;
            let line = id.map_or_else(|| "inserted".to_string(), |id| format!("inserted id {id}"));
            print_line(&mut out, &line)?;
        }
        Command::Update {
            table,
            set,
            conditions,
        } => {
            let n = db
                .update_records(&table, &field_map(set), &field_map(conditions))
                .await?;
            print_line(&mut out, &format!("{n} row(s) updated"))?;
        }
        Command::Delete {
            table,
            conditions,
            limit,
        } => {
            let n = db
                .delete_records(&table, &field_map(conditions), limit)
                .await?;
            print_line(&mut out, &format!("{n} row(s) deleted"))?;
        }
    }
    Ok(())
}

/// Start from the JSON config file, if any, then apply flags on top.
fn connect_params(
    config: Option<&Path>,
    flags: ConnectionArgs,
) -> Result<ConnectParams, DbalError> {
    let mut params = match config {
        Some(path) => {
            let file = File::open(path).map_err(|e| {
                DbalError::ConfigError(format!("cannot read {}: {e}", path.display()))
            })?;
            serde_json::from_reader(BufReader::new(file)).map_err(|e| {
                DbalError::ConfigError(format!("invalid config {}: {e}", path.display()))
            })?
        }
        None => ConnectParams::default(),
    };
    if let Some(host) = flags.host {
        params.host = host;
    }
    if let Some(port) = flags.port {
        params.port = Some(port);
    }
    if let Some(user) = flags.user {
        params.user = user;
    }
    if let Some(password) = flags.password {
        params.password = password;
    }
    if let Some(database) = flags.database {
        params.database = database;
    }
    Ok(params)
}

fn print_line(out: &mut impl Write, line: &str) -> Result<(), DbalError> {
    writeln!(out, "{line}").map_err(|e| DbalError::ExecutionError(format!("stdout: {e}")))
}
