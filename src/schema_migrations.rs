//! The `schema_migrations` tracking table.

use super::MigrationQueryResult;
use sea_query::{
    ColumnDef, DeleteStatement, Expr, Iden, InsertStatement, Order, Query, SelectStatement,
    TableCreateStatement,
};

pub const TABLE_NAME: &str = "schema_migrations";

#[derive(Iden)]
#[iden = "schema_migrations"]
pub struct Table;

#[derive(Iden)]
pub enum Column {
    Version,
    MigratedAt,
}

pub fn create_table() -> TableCreateStatement {
    sea_query::Table::create()
        .table(Table)
        .col(
            ColumnDef::new(Column::Version)
                .big_integer()
                .not_null()
                .primary_key(),
        )
        .col(
            ColumnDef::new(Column::MigratedAt)
                .timestamp_with_time_zone()
                .not_null()
                .extra("DEFAULT CURRENT_TIMESTAMP".to_owned()),
        )
        .to_owned()
}

/// Rows written by one transaction share a timestamp, the higher version wins the tie.
pub fn select_current_version() -> SelectStatement {
    Query::select()
        .column(Column::Version)
        .from(Table)
        .order_by(Column::MigratedAt, Order::Desc)
        .order_by(Column::Version, Order::Desc)
        .limit(1)
        .to_owned()
}

pub fn insert_version(version: i64) -> InsertStatement {
    Query::insert()
        .into_table(Table)
        .columns([Column::Version])
        .values_panic([version.into()])
        .to_owned()
}

pub fn delete_version(version: i64) -> DeleteStatement {
    Query::delete()
        .from_table(Table)
        .and_where(Expr::col(Column::Version).eq(version))
        .to_owned()
}

pub fn version_from_query_result<R>(res: R) -> Result<i64, R::Error>
where
    R: MigrationQueryResult,
{
    res.try_get_i64("version")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MigrationDbBackend, MigrationStatementBuilder};

    #[test]
    fn create_table_has_version_key_and_timestamp() {
        let sql = MigrationStatementBuilder::build(&create_table(), &MigrationDbBackend::Postgres);

        assert!(sql.starts_with(r#"CREATE TABLE "schema_migrations""#), "{}", sql);
        assert!(sql.contains(r#""version" bigint NOT NULL PRIMARY KEY"#), "{}", sql);
        assert!(sql.contains(r#""migrated_at""#), "{}", sql);
        assert!(sql.contains("DEFAULT CURRENT_TIMESTAMP"), "{}", sql);
    }

    #[test]
    fn current_version_orders_by_timestamp_then_version() {
        assert_eq!(
            MigrationStatementBuilder::build(&select_current_version(), &MigrationDbBackend::Postgres),
            r#"SELECT "version" FROM "schema_migrations" ORDER BY "migrated_at" DESC, "version" DESC LIMIT 1"#
        );
    }

    #[test]
    fn insert_and_delete_target_one_version() {
        assert_eq!(
            MigrationStatementBuilder::build(&insert_version(7), &MigrationDbBackend::Postgres),
            r#"INSERT INTO "schema_migrations" ("version") VALUES (7)"#
        );
        assert_eq!(
            MigrationStatementBuilder::build(&delete_version(7), &MigrationDbBackend::MySql),
            "DELETE FROM `schema_migrations` WHERE `version` = 7"
        );
    }
}
