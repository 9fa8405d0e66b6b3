use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use sql_dbal::prelude::{DatabaseType, FieldMap, RowValues};

#[derive(Parser, Debug)]
#[command(author, version, about = "Run statements through a sql-dbal backend")]
pub(crate) struct Args {
    /// Backend compiled into this build (`sqlite`, `postgres`, `postgresql`).
    #[arg(long, value_enum, default_value = "sqlite")]
    pub(crate) backend: DatabaseType,
    #[command(flatten)]
    pub(crate) connection: ConnectionArgs,
    /// JSON file with connection parameters; flags override its fields.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    #[arg(long)]
    pub(crate) log: Option<PathBuf>,
    #[arg(long, short)]
    pub(crate) verbose: bool,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(ClapArgs, Debug, Default)]
pub(crate) struct ConnectionArgs {
    #[arg(long)]
    pub(crate) host: Option<String>,
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[arg(long)]
    pub(crate) user: Option<String>,
    #[arg(long, env = "DBAL_PASSWORD", hide_env_values = true)]
    pub(crate) password: Option<String>,
    /// Database name, or file path for `SQLite`.
    #[arg(long)]
    pub(crate) database: Option<String>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Run one statement and print its rows as JSON lines.
    Query {
        sql: String,
        #[arg(long = "param", value_parser = parse_value_arg)]
        params: Vec<RowValues>,
        #[arg(long, allow_negative_numbers = true)]
        start: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        rows: Option<i64>,
    },
    /// Insert one row and print the generated id.
    Insert {
        table: String,
        #[arg(long = "set", value_parser = parse_assignment, required = true)]
        set: Vec<(String, RowValues)>,
    },
    /// Update matching rows and print how many changed.
    Update {
        table: String,
        #[arg(long = "set", value_parser = parse_assignment, required = true)]
        set: Vec<(String, RowValues)>,
        #[arg(long = "where", value_parser = parse_assignment, required = true)]
        conditions: Vec<(String, RowValues)>,
    },
    /// Delete matching rows and print how many were removed.
    Delete {
        table: String,
        #[arg(long = "where", value_parser = parse_assignment, required = true)]
        conditions: Vec<(String, RowValues)>,
        #[arg(long)]
        limit: Option<usize>,
    },
}

/// `null`, `true`/`false`, integers and floats are typed; anything else is text.
/// Wrap a value in single quotes to force text.
pub(crate) fn parse_value(raw: &str) -> RowValues {
    if let Some(quoted) = raw.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        return RowValues::Text(quoted.to_string());
    }
    match raw {
        "null" | "NULL" => RowValues::Null,
        "true" => RowValues::Bool(true),
        "false" => RowValues::Bool(false),
        _ => raw
            .parse::<i64>()
            .map(RowValues::Int)
            .or_else(|_| raw.parse::<f64>().map(RowValues::Float))
            .unwrap_or_else(|_| RowValues::Text(raw.to_string())),
    }
}

fn parse_value_arg(raw: &str) -> Result<RowValues, String> {
    Ok(parse_value(raw))
}

pub(crate) fn parse_assignment(raw: &str) -> Result<(String, RowValues), String> {
    let (column, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected column=value, got {raw:?}"))?;
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("missing column name in {raw:?}"));
    }
    Ok((column.to_string(), parse_value(value)))
}

pub(crate) fn field_map(pairs: Vec<(String, RowValues)>) -> FieldMap {
    pairs.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_typed() {
        assert_eq!(parse_value("null"), RowValues::Null);
        assert_eq!(parse_value("true"), RowValues::Bool(true));
        assert_eq!(parse_value("-12"), RowValues::Int(-12));
        assert_eq!(parse_value("2.5"), RowValues::Float(2.5));
        assert_eq!(parse_value("bob"), RowValues::Text("bob".into()));
        assert_eq!(parse_value("'42'"), RowValues::Text("42".into()));
    }

    #[test]
    fn assignments_split_on_first_equals() {
        let (column, value) = parse_assignment("note=a=b").unwrap();
        assert_eq!(column, "note");
        assert_eq!(value, RowValues::Text("a=b".into()));
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=1").is_err());
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn cli_parses_delete() {
        let args = Args::try_parse_from([
            "dbal-shell",
            "--database",
            "app.db",
            "delete",
            "users",
            "--where",
            "id=3",
            "--limit",
            "1",
        ])
        .unwrap();
        assert_eq!(args.backend, DatabaseType::Sqlite);
        match args.command {
            Command::Delete {
                table,
                conditions,
                limit,
            } => {
                assert_eq!(table, "users");
                assert_eq!(conditions, vec![("id".to_string(), RowValues::Int(3))]);
                assert_eq!(limit, Some(1));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn backend_must_be_compiled_in() {
        let args = |backend: &str| {
            Args::try_parse_from([
                "dbal-shell",
                "--backend",
                backend,
                "query",
                "select 1",
            ])
        };
        assert_eq!(args("sqlite").unwrap().backend.as_str(), "sqlite");
        assert!(args("mysql").is_err());
    }
}
