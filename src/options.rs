#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

/// Connection settings used by [`Migrator::connect`](crate::Migrator).
///
/// Every field is optional, an unset field keeps the driver's default (for Postgres that includes
/// the `PGHOST`, `PGUSER`, ... environment variables).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "with-serde", serde(default))]
pub struct ConnectOptions {
    pub username: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: Option<String>,
}

impl ConnectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username<T>(mut self, username: T) -> Self
    where
        T: Into<String>,
    {
        self.username = Some(username.into());
        self
    }

    pub fn password<T>(mut self, password: T) -> Self
    where
        T: Into<String>,
    {
        self.password = Some(password.into());
        self
    }

    pub fn host<T>(mut self, host: T) -> Self
    where
        T: Into<String>,
    {
        self.host = Some(host.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn database<T>(mut self, database: T) -> Self
    where
        T: Into<String>,
    {
        self.database = Some(database.into());
        self
    }
}

/// How a migration run is split into transactions
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
pub enum TransactionMode {
    /// The whole run commits or rolls back as one unit
    #[default]
    PerRun,
    /// The version read commits on its own, then each migration commits together with its
    /// tracking row. A failure keeps earlier migrations
    PerMigration,
}
