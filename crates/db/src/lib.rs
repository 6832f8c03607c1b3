//! SQLite connection pool factory and schema bootstrap for bookshelf.

use std::str::FromStr;

use anyhow::Context;
use bookshelf_kernel::settings::DatabaseSettings;
use bookshelf_kernel::Migration;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Open a connection pool for the configured database.
///
/// In-memory databases live only as long as their connection, so they are
/// pinned to a single connection that is never recycled.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&settings.url)
        .with_context(|| format!("invalid database url '{}'", settings.url))?
        .create_if_missing(settings.create_if_missing);

    let in_memory = is_in_memory(&settings.url);
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(settings.max_connections)
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .with_context(|| format!("failed to connect to '{}'", settings.url))?;

    tracing::info!(
        target: "bookshelf-db",
        url = %settings.url,
        in_memory,
        "database pool ready"
    );

    Ok(pool)
}

/// Apply module schema statements in the given order.
pub async fn apply_migrations(
    pool: &SqlitePool,
    migrations: &[(String, Migration)],
) -> anyhow::Result<()> {
    for (module, migration) in migrations {
        tracing::info!(
            target: "bookshelf-db",
            module = %module,
            migration = migration.id,
            "applying schema"
        );

        sqlx::raw_sql(migration.up)
            .execute(pool)
            .await
            .with_context(|| {
                format!(
                    "failed to apply schema '{}' for module '{}'",
                    migration.id, module
                )
            })?;
    }

    Ok(())
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
