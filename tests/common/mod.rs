#![allow(dead_code)]

use sql_dbal::prelude::*;
use tempfile::TempDir;

/// A fresh database file inside its own temp dir; the dir lives as long as the returned guard.
pub fn temp_db(name: &str) -> (TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(format!("{name}.db"));
    (dir, path.to_string_lossy().into_owned())
}

/// A SQLite client with one active connection and a `users` table.
pub async fn users_client(path: &str) -> Result<SqliteClient, DbalError> {
    let mut db = SqliteClient::new(ClientOptions::default());
    let id = db.new_connection(&ConnectParams::sqlite(path)).await?;
    db.set_active_connection(id);
    db.execute_query(
        "CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL, age INTEGER, active BOOLEAN)",
        QueryParams::none(),
        ExecOptions::default(),
    )
    .await?;
    Ok(db)
}

pub async fn seed_users(db: &mut SqliteClient, names: &[&str]) -> Result<(), DbalError> {
    for (i, name) in names.iter().enumerate() {
        let age = 20 + i64::try_from(i).expect("small index");
        db.insert_records(
            "users",
            &FieldMap::new()
                .with("name", *name)
                .with("age", age)
                .with("active", true),
        )
        .await?;
    }
    Ok(())
}
