//! [`MigrationConnection`] implementations for `sqlx` pools.

use super::{
    MigrationConnection, MigrationDbBackend, MigrationQueryResult, MigrationStatementBuilder,
    MigrationTransaction,
};
#[cfg(any(feature = "sqlx-postgres", feature = "sqlx-mysql"))]
use super::{ConnectOptions, MigrationError, MigrationResult, Migrator};
use ::sqlx::{Executor, Row};
#[cfg(any(feature = "sqlx-postgres", feature = "sqlx-mysql"))]
use std::path::PathBuf;

macro_rules! impl_sqlx_connection {
    ($db: ty, $row: ty, $db_backend: expr) => {
        #[async_trait::async_trait]
        impl MigrationConnection for ::sqlx::Pool<$db> {
            type Transaction = ::sqlx::Transaction<'static, $db>;

            type QueryResult = $row;

            type Error = ::sqlx::Error;

            async fn begin(&self) -> Result<Self::Transaction, Self::Error> {
                ::sqlx::Pool::begin(self).await
            }

            fn get_database_backend(&self) -> MigrationDbBackend {
                $db_backend
            }
        }

        #[async_trait::async_trait]
        impl MigrationTransaction for ::sqlx::Transaction<'static, $db> {
            type QueryResult = $row;

            type Error = ::sqlx::Error;

            async fn query_one<S>(&mut self, stmt: &S) -> Result<Option<$row>, Self::Error>
            where
                S: MigrationStatementBuilder + Sync,
            {
                let sql = stmt.build(&$db_backend);
                ::sqlx::query(&sql).fetch_optional(&mut **self).await
            }

            // Without bind arguments sqlx sends a simple query, so scripts holding several
            // statements run as one.
            async fn exec_stmt<S>(&mut self, stmt: &S) -> Result<(), Self::Error>
            where
                S: MigrationStatementBuilder + Sync,
            {
                let sql = stmt.build(&$db_backend);
                (&mut **self).execute(sql.as_str()).await?;
                Ok(())
            }

            async fn commit(self) -> Result<(), Self::Error> {
                ::sqlx::Transaction::commit(self).await
            }

            async fn rollback(self) -> Result<(), Self::Error> {
                ::sqlx::Transaction::rollback(self).await
            }

            fn get_database_backend(&self) -> MigrationDbBackend {
                $db_backend
            }
        }

        impl MigrationQueryResult for $row {
            type Error = ::sqlx::Error;

            fn try_get_i64(&self, col: &str) -> Result<i64, Self::Error> {
                self.try_get(col)
            }
        }
    };
}

macro_rules! impl_sqlx_connect {
    ($db: ty, $connect_options: ty, $to_connect_options: ident) => {
        impl ConnectOptions {
            /// Driver options with every field that is set applied on top of the driver defaults
            pub fn $to_connect_options(&self) -> $connect_options {
                let mut connect_options = <$connect_options>::new();
                if let Some(username) = &self.username {
                    connect_options = connect_options.username(username);
                }
                if let Some(password) = &self.password {
                    connect_options = connect_options.password(password);
                }
                if let Some(host) = &self.host {
                    connect_options = connect_options.host(host);
                }
                if let Some(port) = self.port {
                    connect_options = connect_options.port(port);
                }
                if let Some(database) = &self.database {
                    connect_options = connect_options.database(database);
                }
                connect_options
            }
        }

        impl Migrator<::sqlx::Pool<$db>> {
            /// Build a pool from `options` and create a migrator on it
            pub async fn connect<P>(dir: P, options: &ConnectOptions) -> MigrationResult<Self>
            where
                P: Into<PathBuf>,
            {
                let pool = ::sqlx::Pool::<$db>::connect_with(options.$to_connect_options())
                    .await
                    .map_err(MigrationError::database)?;
                Ok(Self::new(dir, pool))
            }
        }
    };
}

#[cfg(feature = "sqlx-postgres")]
impl_sqlx_connection!(
    ::sqlx::Postgres,
    ::sqlx::postgres::PgRow,
    MigrationDbBackend::Postgres
);

#[cfg(feature = "sqlx-postgres")]
impl_sqlx_connect!(
    ::sqlx::Postgres,
    ::sqlx::postgres::PgConnectOptions,
    to_pg_connect_options
);

#[cfg(feature = "sqlx-mysql")]
impl_sqlx_connection!(
    ::sqlx::MySql,
    ::sqlx::mysql::MySqlRow,
    MigrationDbBackend::MySql
);

#[cfg(feature = "sqlx-mysql")]
impl_sqlx_connect!(
    ::sqlx::MySql,
    ::sqlx::mysql::MySqlConnectOptions,
    to_mysql_connect_options
);

#[cfg(feature = "sqlx-sqlite")]
impl_sqlx_connection!(
    ::sqlx::Sqlite,
    ::sqlx::sqlite::SqliteRow,
    MigrationDbBackend::Sqlite
);

#[cfg(all(test, feature = "sqlx-postgres"))]
mod tests {
    use super::*;

    #[test]
    fn pg_options_keep_driver_defaults_for_unset_fields() {
        let defaults = ::sqlx::postgres::PgConnectOptions::new();
        let options = ConnectOptions::new()
            .host("db.internal")
            .database("app")
            .to_pg_connect_options();

        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_database(), Some("app"));
        assert_eq!(options.get_port(), defaults.get_port());
        assert_eq!(options.get_username(), defaults.get_username());
    }

    #[test]
    fn pg_options_override_port_and_user() {
        let options = ConnectOptions::new()
            .username("postgres")
            .port(5555)
            .to_pg_connect_options();

        assert_eq!(options.get_port(), 5555);
        assert_eq!(options.get_username(), "postgres");
    }
}
