use std::error::Error as StdError;
use std::fmt;
use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

pub type BoxDynError = Box<dyn StdError + Send + Sync + 'static>;

pub type MigrationResult<T> = Result<T, MigrationError>;

/// Which way a migration is being run
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MigrationDirection {
    /// Apply the `up` script
    Up,
    /// Apply the `down` script
    Down,
}

impl fmt::Display for MigrationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self {
            MigrationDirection::Up => "apply",
            MigrationDirection::Down => "roll back",
        };
        write!(f, "{}", direction)
    }
}

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("could not open directory '{}'", .path.display())]
    Directory { path: PathBuf },

    #[error("could not read migration '{}': {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse version of migration '{}'", .path.display())]
    VersionParse {
        path: PathBuf,
        #[source]
        source: Option<ParseIntError>,
    },

    #[error(
        "duplicate migration version {version}: '{}' and '{}'",
        .first.display(),
        .second.display()
    )]
    DuplicateVersion {
        version: i64,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("failed to {direction} migration '{name}': {source}")]
    Execute {
        version: i64,
        name: String,
        direction: MigrationDirection,
        #[source]
        source: BoxDynError,
    },

    #[error("database error: {0}")]
    Database(#[source] BoxDynError),
}

impl MigrationError {
    pub fn database<E>(err: E) -> Self
    where
        E: Into<BoxDynError>,
    {
        MigrationError::Database(err.into())
    }
}
