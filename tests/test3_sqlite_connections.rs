#![cfg(feature = "sqlite")]

mod common;

use sql_dbal::prelude::*;

use common::{temp_db, users_client};

#[tokio::test]
async fn misuse_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = SqliteClient::new(ClientOptions::default());
    assert!(matches!(db.num_rows(), Err(DbalError::NoResultCursor)));
    assert!(matches!(db.get_rows(), Err(DbalError::NoResultCursor)));
    assert!(matches!(
        db.execute_query("SELECT 1", QueryParams::none(), ExecOptions::default())
            .await,
        Err(DbalError::NoActiveConnection)
    ));

    db.set_active_connection(3);
    assert!(matches!(
        db.execute_query("SELECT 1", QueryParams::none(), ExecOptions::default())
            .await,
        Err(DbalError::UnknownConnection(3))
    ));
    Ok(())
}

#[tokio::test]
async fn missing_table_carries_code_401() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, path) = temp_db("missing");
    let mut db = users_client(&path).await?;
    let err = db
        .execute_query("SELECT * FROM nowhere", QueryParams::none(), ExecOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DbalError::TableNotFound(_)));
    assert_eq!(err.code(), Some(401));

    let err = db
        .insert_records("nowhere", &FieldMap::new().with("a", 1))
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(401));
    Ok(())
}

#[tokio::test]
async fn unopenable_path_carries_code_400() {
    let mut db = SqliteClient::new(ClientOptions::default());
    let err = db
        .new_connection(&ConnectParams::sqlite("/nonexistent-dir/for/sure/db.sqlite"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbalError::ConnectionError(_)), "{err:?}");
    assert_eq!(err.code(), Some(400));
    assert_eq!(db.connection_count(), 0);
}

#[tokio::test]
async fn empty_path_is_a_config_error() {
    let mut db = SqliteClient::new(ClientOptions::default());
    assert!(matches!(
        db.new_connection(&ConnectParams::sqlite("  ")).await,
        Err(DbalError::ConfigError(_))
    ));
}

#[tokio::test]
async fn statements_follow_the_active_connection() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir_a, path_a) = temp_db("a");
    let (_dir_b, path_b) = temp_db("b");
    let mut db = SqliteClient::new(ClientOptions::default());

    let a = db.new_connection(&ConnectParams::sqlite(&path_a)).await?;
    let b = db.new_connection(&ConnectParams::sqlite(&path_b)).await?;
    assert_eq!((a, b), (0, 1));
    assert_eq!(db.connection_count(), 2);
    // opening does not select
    assert_eq!(db.active_connection(), None);

    for (id, label) in [(a, "from a"), (b, "from b")] {
        db.set_active_connection(id);
        db.execute_query("CREATE TABLE notes (body TEXT)", QueryParams::none(), ExecOptions::default())
            .await?;
        db.insert_records("notes", &FieldMap::new().with("body", label))
            .await?;
    }

    db.set_active_connection(a);
    db.execute_query("SELECT body FROM notes", QueryParams::none(), ExecOptions::default())
        .await?;
    assert_eq!(db.num_rows()?, 1);
    let row = db.get_rows()?.expect("row");
    assert_eq!(row.get("body").and_then(RowValues::as_text), Some("from a"));
    Ok(())
}

#[tokio::test]
async fn history_capacity_is_honoured() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, path) = temp_db("history");
    let mut db = SqliteClient::new(ClientOptions::default().with_history_capacity(Some(2)));
    let id = db.new_connection(&ConnectParams::sqlite(&path)).await?;
    db.set_active_connection(id);
    for n in 1..=4 {
        db.execute_query(&format!("SELECT {n}"), QueryParams::none(), ExecOptions::default())
            .await?;
    }
    assert_eq!(db.query_count(), 4);
    let kept: Vec<_> = db.history().iter().map(HistoryEntry::query).collect();
    assert_eq!(kept, vec!["SELECT 3", "SELECT 4"]);

    let mut silent = SqliteClient::new(ClientOptions::default().with_history_capacity(Some(0)));
    let id = silent.new_connection(&ConnectParams::sqlite(&path)).await?;
    silent.set_active_connection(id);
    silent
        .execute_query("SELECT 1", QueryParams::none(), ExecOptions::default())
        .await?;
    assert_eq!(silent.query_count(), 1);
    assert!(silent.history().is_empty());
    Ok(())
}
