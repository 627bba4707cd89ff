use super::MigrationStatementBuilder;
use std::error::Error as StdError;

/// The type of database backend for real world databases.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MigrationDbBackend {
    /// A MySQL backend
    MySql,
    /// A PostgreSQL backend
    Postgres,
    /// A SQLite backend
    Sqlite,
}

/// A shared database handle the migrator can open transactions on.
///
/// Pools are expected to be cheap to clone, the [`Migrator`](crate::Migrator) keeps its own copy
/// and the caller stays responsible for the lifetime of the underlying connections.
#[async_trait::async_trait]
pub trait MigrationConnection: Sync {
    type Transaction: MigrationTransaction<QueryResult = Self::QueryResult, Error = Self::Error>;

    type QueryResult: MigrationQueryResult<Error = Self::Error> + Send;

    type Error: StdError + Send + Sync + 'static;

    /// Start a transaction. Dropping it without calling
    /// [`commit`](MigrationTransaction::commit) must roll it back.
    async fn begin(&self) -> Result<Self::Transaction, Self::Error>;

    fn get_database_backend(&self) -> MigrationDbBackend;
}

/// One open transaction; every statement of a migration run is routed through it.
#[async_trait::async_trait]
pub trait MigrationTransaction: Send {
    type QueryResult: MigrationQueryResult<Error = Self::Error> + Send;

    type Error: StdError + Send + Sync + 'static;

    async fn query_one<S>(&mut self, stmt: &S) -> Result<Option<Self::QueryResult>, Self::Error>
    where
        S: MigrationStatementBuilder + Sync;

    async fn exec_stmt<S>(&mut self, stmt: &S) -> Result<(), Self::Error>
    where
        S: MigrationStatementBuilder + Sync;

    async fn commit(self) -> Result<(), Self::Error>;

    async fn rollback(self) -> Result<(), Self::Error>;

    fn get_database_backend(&self) -> MigrationDbBackend;
}

pub trait MigrationQueryResult: Sized {
    type Error: StdError + Send + Sync + 'static;

    fn try_get_i64(&self, col: &str) -> Result<i64, Self::Error>;
}
