use sea_migrate::{ConnectOptions, Migrator};
use sqlx::{Executor, PgPool};
use std::env;
use std::error::Error;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

const MIGRATIONS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/migrations");

#[async_std::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let options = options_from_env();
    let admin = PgPool::connect_with(options.to_pg_connect_options()).await?;

    let secs = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let database = format!("migration_test_{}", secs);
    admin
        .execute(format!(r#"CREATE DATABASE "{}""#, database).as_str())
        .await?;

    let result = run_migrations(&options.clone().database(&database)).await;

    admin
        .execute(format!(r#"DROP DATABASE "{}""#, database).as_str())
        .await?;
    admin.close().await;
    result
}

fn options_from_env() -> ConnectOptions {
    let mut options = ConnectOptions::new()
        .username(env::var("DATABASE_USER").unwrap_or_else(|_| "postgres".to_owned()))
        .host(env::var("DATABASE_HOST").unwrap_or_else(|_| "localhost".to_owned()));
    if let Ok(password) = env::var("DATABASE_PASSWORD") {
        options = options.password(password);
    }
    let port = env::var("DATABASE_PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(5432);
    options.port(port)
}

async fn run_migrations(options: &ConnectOptions) -> Result<(), Box<dyn Error>> {
    let migrator = Migrator::connect(MIGRATIONS_DIR, options).await?;
    let pool = migrator.connection();

    migrator.up().await?;
    assert!(has_table(pool, "test_table").await?);
    assert!(has_index(pool, "test_table_idx").await?);
    assert_eq!(applied_versions(pool).await?, vec![1, 2]);

    migrator.up().await?;
    assert_eq!(applied_versions(pool).await?, vec![1, 2]);

    migrator.down().await?;
    assert!(!has_table(pool, "test_table").await?);
    assert!(has_table(pool, "settings").await?);
    assert_eq!(applied_versions(pool).await?, vec![1]);

    migrator.up().await?;
    assert!(has_table(pool, "test_table").await?);
    assert!(has_index(pool, "test_table_idx").await?);

    pool.close().await;
    println!("Live migration test passed");
    Ok(())
}

async fn has_table(pool: &PgPool, table: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS(SELECT * FROM information_schema.tables WHERE table_schema = CURRENT_SCHEMA() AND table_name = $1)",
    )
    .bind(table)
    .fetch_one(pool)
    .await
}

async fn has_index(pool: &PgPool, index: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT * FROM pg_indexes WHERE indexname = $1)")
        .bind(index)
        .fetch_one(pool)
        .await
}

async fn applied_versions(pool: &PgPool) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT version FROM schema_migrations ORDER BY version")
        .fetch_all(pool)
        .await
}
