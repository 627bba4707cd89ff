pub use super::connection::{
    MigrationConnection, MigrationDbBackend, MigrationQueryResult, MigrationTransaction,
};
pub use super::error::{MigrationDirection, MigrationError, MigrationResult};
pub use super::loader::{Migration, MigrationSet};
pub use super::manager::SchemaManager;
pub use super::migrator::Migrator;
pub use super::options::{ConnectOptions, TransactionMode};
pub use super::statement::MigrationStatementBuilder;
pub use async_trait;
pub use sea_query;
