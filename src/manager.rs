use super::{
    schema_migrations, MigrationDbBackend, MigrationError, MigrationQueryResult, MigrationResult,
    MigrationStatementBuilder, MigrationTransaction,
};
use sea_query::{Alias, Condition, Expr, IntoTableRef, Query, SelectStatement, SimpleExpr};
use tracing::debug;

/// Tracking table operations executed through one open transaction
pub struct SchemaManager<'t, T>
where
    T: MigrationTransaction,
{
    txn: &'t mut T,
}

impl<'t, T> SchemaManager<'t, T>
where
    T: MigrationTransaction,
{
    pub fn new(txn: &'t mut T) -> Self {
        Self { txn }
    }

    pub async fn exec_stmt<S>(&mut self, stmt: &S) -> Result<(), T::Error>
    where
        S: MigrationStatementBuilder + Sync,
    {
        self.txn.exec_stmt(stmt).await
    }

    pub fn get_database_backend(&self) -> MigrationDbBackend {
        self.txn.get_database_backend()
    }
}

/// Schema Inspection
impl<'t, T> SchemaManager<'t, T>
where
    T: MigrationTransaction,
{
    pub async fn has_table<N>(&mut self, table: N) -> MigrationResult<bool>
    where
        N: AsRef<str>,
    {
        let mut stmt = Query::select();
        let mut subquery = query_tables(self.get_database_backend());
        subquery.cond_where(Expr::col(Alias::new("table_name")).eq(table.as_ref()));
        stmt.expr_as(Expr::cust("COUNT(*)"), Alias::new("rows"))
            .from_subquery(subquery, Alias::new("subquery"));

        let res = self
            .txn
            .query_one(&stmt)
            .await
            .map_err(MigrationError::database)?
            .ok_or_else(|| MigrationError::database("Fail to check table exists"))?;
        let rows = res.try_get_i64("rows").map_err(MigrationError::database)?;

        Ok(rows > 0)
    }
}

/// Version Tracking
impl<'t, T> SchemaManager<'t, T>
where
    T: MigrationTransaction,
{
    /// Serialize migration runs on backends with transaction scoped advisory locks.
    ///
    /// Released when the transaction commits or rolls back. MySQL and SQLite are not locked.
    pub async fn lock(&mut self) -> MigrationResult<()> {
        if self.get_database_backend() == MigrationDbBackend::Postgres {
            let stmt = format!(
                "SELECT pg_advisory_xact_lock(hashtext('{}'))",
                schema_migrations::TABLE_NAME
            );
            self.exec_stmt(&stmt).await.map_err(MigrationError::database)?;
        }
        Ok(())
    }

    /// Create the `schema_migrations` table unless the catalog already lists it.
    ///
    /// Two processes racing here without [`lock`](Self::lock) may both try to create it.
    pub async fn install(&mut self) -> MigrationResult<()> {
        if self.has_table(schema_migrations::TABLE_NAME).await? {
            return Ok(());
        }
        debug!("Creating table '{}'", schema_migrations::TABLE_NAME);
        self.exec_stmt(&schema_migrations::create_table())
            .await
            .map_err(MigrationError::database)
    }

    /// Version of the most recently migrated row, 0 if nothing has been applied
    pub async fn current_version(&mut self) -> MigrationResult<i64> {
        self.install().await?;
        let stmt = schema_migrations::select_current_version();
        let version = match self
            .txn
            .query_one(&stmt)
            .await
            .map_err(MigrationError::database)?
        {
            Some(res) => {
                schema_migrations::version_from_query_result(res).map_err(MigrationError::database)?
            }
            None => 0,
        };
        debug!("Current schema version is {}", version);
        Ok(version)
    }

    pub async fn record_version(&mut self, version: i64) -> MigrationResult<()> {
        self.exec_stmt(&schema_migrations::insert_version(version))
            .await
            .map_err(MigrationError::database)
    }

    pub async fn forget_version(&mut self, version: i64) -> MigrationResult<()> {
        self.exec_stmt(&schema_migrations::delete_version(version))
            .await
            .map_err(MigrationError::database)
    }
}

pub(crate) fn query_tables(db_backend: MigrationDbBackend) -> SelectStatement {
    let mut stmt = Query::select();
    let (expr, tbl_ref, condition) = match db_backend {
        MigrationDbBackend::MySql => (
            Expr::col(Alias::new("table_name")),
            (Alias::new("information_schema"), Alias::new("tables")).into_table_ref(),
            Condition::all().add(
                Expr::expr(get_current_schema(db_backend))
                    .equals(Alias::new("tables"), Alias::new("table_schema")),
            ),
        ),
        MigrationDbBackend::Postgres => (
            Expr::col(Alias::new("table_name")),
            (Alias::new("information_schema"), Alias::new("tables")).into_table_ref(),
            Condition::all()
                .add(
                    Expr::expr(get_current_schema(db_backend))
                        .equals(Alias::new("tables"), Alias::new("table_schema")),
                )
                .add(Expr::col(Alias::new("table_type")).eq("BASE TABLE")),
        ),
        MigrationDbBackend::Sqlite => (
            Expr::col(Alias::new("name")),
            Alias::new("sqlite_master").into_table_ref(),
            Condition::all()
                .add(Expr::col(Alias::new("type")).eq("table"))
                .add(Expr::col(Alias::new("name")).ne("sqlite_sequence")),
        ),
    };
    stmt.expr_as(expr, Alias::new("table_name"))
        .from(tbl_ref)
        .cond_where(condition);
    stmt
}

fn get_current_schema(db_backend: MigrationDbBackend) -> SimpleExpr {
    match db_backend {
        MigrationDbBackend::MySql => Expr::cust("DATABASE()"),
        MigrationDbBackend::Postgres | MigrationDbBackend::Sqlite => Expr::cust("CURRENT_SCHEMA()"),
    }
}
