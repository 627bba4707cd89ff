//! Discovery of `<version>_<description>.up.sql` / `.down.sql` pairs.

use super::{MigrationDirection, MigrationError, MigrationResult};
use std::fs;
use std::path::{Path, PathBuf};

pub const UP_SUFFIX: &str = ".up.sql";
pub const DOWN_SUFFIX: &str = ".down.sql";

/// One versioned, reversible schema change
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Migration {
    version: i64,
    name: String,
    up: String,
    down: String,
}

impl Migration {
    pub fn new<N, U, D>(version: i64, name: N, up: U, down: D) -> Self
    where
        N: Into<String>,
        U: Into<String>,
        D: Into<String>,
    {
        Self {
            version,
            name: name.into(),
            up: up.into(),
            down: down.into(),
        }
    }

    /// Read an up file and its sibling down file
    pub fn from_file<P>(up_path: P) -> MigrationResult<Self>
    where
        P: AsRef<Path>,
    {
        let up_path = up_path.as_ref();
        let file_name = up_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| MigrationError::VersionParse {
                path: up_path.to_path_buf(),
                source: None,
            })?;
        let name = file_name.strip_suffix(UP_SUFFIX).unwrap_or(file_name);
        let down_path = up_path.with_file_name(format!("{}{}", name, DOWN_SUFFIX));

        let up = read_migration_file(up_path)?;
        let down = read_migration_file(&down_path)?;
        let version = parse_version(up_path, file_name)?;

        Ok(Self::new(version, name, up, down))
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn up(&self) -> &str {
        &self.up
    }

    pub fn down(&self) -> &str {
        &self.down
    }

    pub fn sql(&self, direction: MigrationDirection) -> &str {
        match direction {
            MigrationDirection::Up => self.up(),
            MigrationDirection::Down => self.down(),
        }
    }
}

fn read_migration_file(path: &Path) -> MigrationResult<String> {
    fs::read_to_string(path).map_err(|source| MigrationError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// The version is everything before the first underscore of the file name.
fn parse_version(path: &Path, file_name: &str) -> MigrationResult<i64> {
    let token = file_name.split('_').next().unwrap_or_default();
    match token.parse::<i64>() {
        Ok(version) if version > 0 => Ok(version),
        Ok(_) => Err(MigrationError::VersionParse {
            path: path.to_path_buf(),
            source: None,
        }),
        Err(err) => Err(MigrationError::VersionParse {
            path: path.to_path_buf(),
            source: Some(err),
        }),
    }
}

/// Migrations sorted by ascending version, without duplicates
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MigrationSet {
    migrations: Vec<Migration>,
}

impl MigrationSet {
    /// Load every migration pair found directly inside `dir`.
    ///
    /// Files are read in path order so the first failure is deterministic, the result is then
    /// ordered by the parsed version, not by file name.
    pub fn load<P>(dir: P) -> MigrationResult<Self>
    where
        P: AsRef<Path>,
    {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(MigrationError::Directory {
                path: dir.to_path_buf(),
            });
        }
        let entries = fs::read_dir(dir).map_err(|_| MigrationError::Directory {
            path: dir.to_path_buf(),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|_| MigrationError::Directory {
                    path: dir.to_path_buf(),
                })?
                .path();
            // Lossy so names that are not UTF-8 still reach the version parser and fail there
            let is_up_file = path
                .file_name()
                .map_or(false, |name| name.to_string_lossy().ends_with(UP_SUFFIX));
            if is_up_file && path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        let mut indexed = Vec::with_capacity(files.len());
        for path in files {
            indexed.push((Migration::from_file(&path)?, path));
        }

        indexed.sort_by_key(|(migration, _)| migration.version());
        for pair in indexed.windows(2) {
            let ((prev, first), (next, second)) = (&pair[0], &pair[1]);
            if prev.version() == next.version() {
                return Err(MigrationError::DuplicateVersion {
                    version: next.version(),
                    first: first.clone(),
                    second: second.clone(),
                });
            }
        }

        Ok(Self {
            migrations: indexed.into_iter().map(|(migration, _)| migration).collect(),
        })
    }

    /// Build a set from migrations defined in code
    pub fn from_migrations(mut migrations: Vec<Migration>) -> MigrationResult<Self> {
        migrations.sort_by_key(|migration| migration.version());
        for pair in migrations.windows(2) {
            if pair[0].version() == pair[1].version() {
                return Err(MigrationError::DuplicateVersion {
                    version: pair[1].version(),
                    first: PathBuf::from(pair[0].name()),
                    second: PathBuf::from(pair[1].name()),
                });
            }
        }
        Ok(Self { migrations })
    }

    /// The lowest version of the set, [`Migrator::down`](crate::Migrator::down) never reverts it
    pub fn baseline(&self) -> Option<i64> {
        self.migrations.first().map(Migration::version)
    }

    pub fn get(&self, version: i64) -> Option<&Migration> {
        self.migrations
            .binary_search_by_key(&version, Migration::version)
            .ok()
            .map(|idx| &self.migrations[idx])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Migration> {
        self.migrations.iter()
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }
}

impl IntoIterator for MigrationSet {
    type Item = Migration;
    type IntoIter = std::vec::IntoIter<Migration>;

    fn into_iter(self) -> Self::IntoIter {
        self.migrations.into_iter()
    }
}

impl<'a> IntoIterator for &'a MigrationSet {
    type Item = &'a Migration;
    type IntoIter = std::slice::Iter<'a, Migration>;

    fn into_iter(self) -> Self::IntoIter {
        self.migrations.iter()
    }
}
