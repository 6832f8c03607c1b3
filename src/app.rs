//! Application bootstrap: pool, schema, module lifecycle and HTTP server.

use anyhow::Context;
use bookshelf_kernel::settings::Settings;
use bookshelf_kernel::{InitCtx, ModuleRegistry};
use sqlx::SqlitePool;

use crate::modules;

/// Registry with every application module wired to `pool`
pub fn build_registry(pool: &SqlitePool) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, pool);
    registry
}

/// Open the database and apply every module's schema
pub async fn migrate(settings: &Settings) -> anyhow::Result<SqlitePool> {
    let pool = bookshelf_db::connect(&settings.database).await?;
    let registry = build_registry(&pool);

    bookshelf_db::apply_migrations(&pool, &registry.collect_migrations())
        .await
        .context("failed to bootstrap schema")?;

    Ok(pool)
}

/// Run the service until a shutdown signal arrives
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "bookshelf bootstrap starting"
    );

    let pool = migrate(settings).await?;
    let registry = build_registry(&pool);
    let ctx = InitCtx { settings };

    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    tracing::info!(modules = registry.len(), "bookshelf bootstrap complete");

    let served = bookshelf_http::start_server(&registry, &settings.server).await;

    registry.stop_all().await?;
    pool.close().await;

    served
}
