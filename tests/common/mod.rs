#![allow(dead_code)]

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn testdata(dir: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("testdata")
        .join(dir)
}

/// A single connection keeps the run and the assertions on the same database file.
pub async fn sqlite_pool(tmp: &TempDir) -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .filename(tmp.path().join("migrations.db"))
        .create_if_missing(true);
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap()
}

/// Copy the migration files of a fixture into a fresh directory the test may modify
pub fn copy_fixture(fixture: &str, tmp: &TempDir) -> PathBuf {
    let dir = tmp.path().join(fixture);
    fs::create_dir_all(&dir).unwrap();
    for entry in fs::read_dir(testdata(fixture)).unwrap() {
        let path = entry.unwrap().path();
        fs::copy(&path, dir.join(path.file_name().unwrap())).unwrap();
    }
    dir
}

pub async fn applied_versions(pool: &SqlitePool) -> Vec<i64> {
    sqlx::query_scalar("SELECT version FROM schema_migrations ORDER BY version")
        .fetch_all(pool)
        .await
        .unwrap()
}

pub async fn journal(pool: &SqlitePool) -> Vec<String> {
    sqlx::query_scalar("SELECT entry FROM journal ORDER BY id")
        .fetch_all(pool)
        .await
        .unwrap()
}

pub async fn has_object(pool: &SqlitePool, kind: &str, name: &str) -> bool {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE type = ? AND name = ?")
            .bind(kind)
            .bind(name)
            .fetch_one(pool)
            .await
            .unwrap();
    count > 0
}
