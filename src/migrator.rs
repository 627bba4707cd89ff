use super::{
    Migration, MigrationConnection, MigrationDirection, MigrationError, MigrationResult,
    MigrationSet, MigrationTransaction, SchemaManager, TransactionMode,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Performing migrations on a database
///
/// With [`TransactionMode::PerRun`] every statement of a run, from the tracking table check to the
/// last migration, goes through the transaction opened at the start of [`up`](Self::up) or
/// [`down`](Self::down).
pub struct Migrator<C>
where
    C: MigrationConnection,
{
    db: C,
    dir: PathBuf,
    transaction_mode: TransactionMode,
}

impl<C> Migrator<C>
where
    C: MigrationConnection,
{
    /// Create a migrator on an existing connection handle
    pub fn new<P>(dir: P, db: C) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            db,
            dir: dir.into(),
            transaction_mode: TransactionMode::default(),
        }
    }

    pub fn with_transaction_mode(mut self, transaction_mode: TransactionMode) -> Self {
        self.transaction_mode = transaction_mode;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn connection(&self) -> &C {
        &self.db
    }

    /// Apply every migration newer than the current version, in ascending order
    pub async fn up(&self) -> MigrationResult<()> {
        info!("Applying all pending migrations");
        self.run(MigrationDirection::Up).await
    }

    /// Revert applied migrations in descending order, down to but excluding the baseline
    pub async fn down(&self) -> MigrationResult<()> {
        info!("Rolling back all applied migrations");
        self.run(MigrationDirection::Down).await
    }

    async fn run(&self, direction: MigrationDirection) -> MigrationResult<()> {
        let mut txn = self.begin().await?;
        let planned = self.plan(&mut txn, direction).await;
        let migrations = match planned {
            Ok(migrations) => migrations,
            Err(err) => return Err(abort(txn, err).await),
        };
        if migrations.is_empty() {
            match direction {
                MigrationDirection::Up => info!("No pending migrations"),
                MigrationDirection::Down => info!("No applied migrations"),
            }
        }

        match self.transaction_mode {
            TransactionMode::PerRun => {
                for migration in migrations {
                    let applied = run_migration(&mut txn, &migration, direction).await;
                    if let Err(err) = applied {
                        return Err(abort(txn, err).await);
                    }
                }
                commit(txn).await
            }
            TransactionMode::PerMigration => {
                commit(txn).await?;
                for migration in migrations {
                    let mut txn = self.begin().await?;
                    let applied = run_migration(&mut txn, &migration, direction).await;
                    if let Err(err) = applied {
                        return Err(abort(txn, err).await);
                    }
                    commit(txn).await?;
                }
                Ok(())
            }
        }
    }

    async fn begin(&self) -> MigrationResult<C::Transaction> {
        let mut txn = self.db.begin().await.map_err(MigrationError::database)?;
        let locked = SchemaManager::new(&mut txn).lock().await;
        if let Err(err) = locked {
            return Err(abort(txn, err).await);
        }
        Ok(txn)
    }

    /// Migrations to run, in the order they must run
    async fn plan(
        &self,
        txn: &mut C::Transaction,
        direction: MigrationDirection,
    ) -> MigrationResult<Vec<Migration>> {
        let version = SchemaManager::new(txn).current_version().await?;
        let migrations = MigrationSet::load(&self.dir)?;

        let plan = match direction {
            MigrationDirection::Up => migrations
                .into_iter()
                .filter(|migration| migration.version() > version)
                .collect(),
            MigrationDirection::Down => {
                let baseline = migrations.baseline().unwrap_or_default();
                migrations
                    .into_iter()
                    .rev()
                    .filter(|migration| {
                        migration.version() > baseline && migration.version() <= version
                    })
                    .collect()
            }
        };
        Ok(plan)
    }
}

async fn run_migration<T>(
    txn: &mut T,
    migration: &Migration,
    direction: MigrationDirection,
) -> MigrationResult<()>
where
    T: MigrationTransaction,
{
    let name = migration.name();
    match direction {
        MigrationDirection::Up => info!("Applying migration '{}'", name),
        MigrationDirection::Down => info!("Rolling back migration '{}'", name),
    }

    let sql = migration.sql(direction).to_owned();
    if !sql.trim().is_empty() {
        txn.exec_stmt(&sql)
            .await
            .map_err(|err| MigrationError::Execute {
                version: migration.version(),
                name: name.to_owned(),
                direction,
                source: err.into(),
            })?;
    }

    let mut manager = SchemaManager::new(txn);
    match direction {
        MigrationDirection::Up => {
            manager.record_version(migration.version()).await?;
            info!("Migration '{}' has been applied", name);
        }
        MigrationDirection::Down => {
            manager.forget_version(migration.version()).await?;
            info!("Migration '{}' has been rolled back", name);
        }
    }
    Ok(())
}

async fn commit<T>(txn: T) -> MigrationResult<()>
where
    T: MigrationTransaction,
{
    txn.commit().await.map_err(MigrationError::database)
}

/// Roll back and hand the original error back to the caller
async fn abort<T>(txn: T, err: MigrationError) -> MigrationError
where
    T: MigrationTransaction,
{
    if let Err(rollback_err) = txn.rollback().await {
        warn!("Failed to roll back migration transaction: {}", rollback_err);
    }
    err
}
