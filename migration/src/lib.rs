pub use sea_orm_migration::prelude::*;
use sea_orm_migration::schema;

mod m20240601_000001_create_movie;
mod m20240601_000002_create_rating;
mod m20240601_000003_create_comment;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_movie::Migration),
            Box::new(m20240601_000002_create_rating::Migration),
            Box::new(m20240601_000003_create_comment::Migration),
        ]
    }
}

/// Nullable varchar whose width is enforced by a CHECK constraint.
///
/// SQLite ignores the declared varchar length, so the limit is spelled out as
/// `length(col) <= len`. The expression text shows up verbatim in the
/// constraint violation message.
pub(crate) fn bounded_string_null<T>(col: T, len: u32) -> ColumnDef
where
    T: Iden + 'static,
{
    let check = Expr::cust(format!("length({}) <= {len}", Iden::to_string(&col)));
    schema::string_len_null(col, len).check(check).take()
}

/// Non-null variant of [`bounded_string_null`].
pub(crate) fn bounded_string<T>(col: T, len: u32) -> ColumnDef
where
    T: Iden + 'static,
{
    let check = Expr::cust(format!("length({}) <= {len}", Iden::to_string(&col)));
    schema::string_len(col, len).check(check).take()
}
