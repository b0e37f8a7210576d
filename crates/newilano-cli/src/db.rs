//! `db` subcommands.

use std::path::Path;

use anyhow::Context;
use newilano_core::CatalogDocument;

pub(crate) async fn run_ping(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    newilano_db::health_check(pool).await?;
    println!("database: ok");
    Ok(())
}

pub(crate) async fn run_migrate(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let applied = newilano_db::run_migrations(pool).await?;
    println!("applied {applied} migration(s)");
    Ok(())
}

/// Seeds the catalog from a JSON document.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if any write
/// fails (in which case nothing is written).
pub(crate) async fn run_seed(pool: &sqlx::PgPool, file: &Path) -> anyhow::Result<()> {
    let document = CatalogDocument::load(file)
        .with_context(|| format!("loading catalog document {}", file.display()))?;

    let summary = newilano_db::seed_catalog(pool, &document).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
