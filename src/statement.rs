use super::MigrationDbBackend;
use sea_query::{MysqlQueryBuilder, PostgresQueryBuilder, SqliteQueryBuilder};

/// Render a statement into SQL text for a specific backend.
///
/// Values are inlined, statements built by the migrator only ever carry version numbers and
/// catalog identifiers.
pub trait MigrationStatementBuilder {
    fn build(&self, db_backend: &MigrationDbBackend) -> String;
}

macro_rules! build_query_stmt {
    ($stmt: ty) => {
        impl MigrationStatementBuilder for $stmt {
            fn build(&self, db_backend: &MigrationDbBackend) -> String {
                match db_backend {
                    MigrationDbBackend::MySql => self.to_string(MysqlQueryBuilder),
                    MigrationDbBackend::Postgres => self.to_string(PostgresQueryBuilder),
                    MigrationDbBackend::Sqlite => self.to_string(SqliteQueryBuilder),
                }
            }
        }
    };
}

build_query_stmt!(sea_query::InsertStatement);
build_query_stmt!(sea_query::SelectStatement);
build_query_stmt!(sea_query::DeleteStatement);

macro_rules! build_schema_stmt {
    ($stmt: ty) => {
        impl MigrationStatementBuilder for $stmt {
            fn build(&self, db_backend: &MigrationDbBackend) -> String {
                match db_backend {
                    MigrationDbBackend::MySql => self.build(MysqlQueryBuilder),
                    MigrationDbBackend::Postgres => self.build(PostgresQueryBuilder),
                    MigrationDbBackend::Sqlite => self.build(SqliteQueryBuilder),
                }
            }
        }
    };
}

build_schema_stmt!(sea_query::TableCreateStatement);

impl MigrationStatementBuilder for String {
    fn build(&self, _: &MigrationDbBackend) -> String {
        self.clone()
    }
}
