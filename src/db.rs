use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};

use crate::error::AppResult;

pub async fn connect_and_migrate(database_url: &str) -> AppResult<DatabaseConnection> {
    let mut opts = ConnectOptions::new(database_url);
    opts.sqlx_logging(false);
    // Every pooled connection to `:memory:` would get its own empty database.
    if database_url.contains(":memory:") {
        opts.max_connections(1).min_connections(1);
    }
    let db = Database::connect(opts).await?;

    for pragma in ["PRAGMA journal_mode=WAL", "PRAGMA synchronous=NORMAL", "PRAGMA foreign_keys=ON"]
    {
        db.execute(Statement::from_string(db.get_database_backend(), pragma.to_string())).await?;
    }

    Migrator::up(&db, None).await?;
    Ok(db)
}
