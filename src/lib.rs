#![cfg_attr(docsrs, feature(doc_cfg))]

//! <div align="center">
//!
//!   <h1>SeaMigrate</h1>
//!
//!   <p>
//!     <strong>Versioned SQL file migrations with a tracked schema version</strong>
//!   </p>
//!
//! </div>
//!
//! A migration directory holds pairs of files, `<version>_<description>.up.sql` and
//! `<version>_<description>.down.sql`. [`Migrator::up`] applies every migration newer than the
//! version recorded in the `schema_migrations` table, and [`Migrator::down`] reverts them again,
//! all within one transaction.
//!
//! ```ignore
//! use sea_migrate::{ConnectOptions, Migrator};
//!
//! let options = ConnectOptions::new().host("localhost").database("app");
//! let migrator = Migrator::connect("migrations", &options).await?;
//! migrator.up().await?;
//! ```

pub mod connection;
pub mod error;
pub mod loader;
pub mod manager;
pub mod migrator;
pub mod options;
pub mod prelude;
pub mod schema_migrations;
pub mod statement;

#[cfg(feature = "sqlx-dep")]
#[cfg_attr(docsrs, doc(cfg(feature = "sqlx-dep")))]
pub mod driver;

pub use connection::*;
pub use error::*;
pub use loader::*;
pub use manager::*;
pub use migrator::*;
pub use options::*;
pub use statement::*;
