//! `rank` subcommands: print ranked products as JSON.

use newilano_core::{AppConfig, Product, RankingEngine};
use newilano_db::PgCatalog;
use serde::Serialize;

/// One output line per ranked product, in rank order.
#[derive(Debug, Serialize)]
pub(crate) struct RankedItem<'a> {
    pub rank: usize,
    pub slug: &'a str,
    pub brand: &'a str,
    pub name: &'a str,
    pub price: &'a str,
}

pub(crate) fn engine(pool: sqlx::PgPool, config: &AppConfig) -> RankingEngine<PgCatalog> {
    RankingEngine::new(PgCatalog::new(pool)).with_trending_window(config.trending_window())
}

pub(crate) fn ranked_items(products: &[Product]) -> Vec<RankedItem<'_>> {
    products
        .iter()
        .enumerate()
        .map(|(index, p)| RankedItem {
            rank: index + 1,
            slug: &p.slug,
            brand: &p.brand,
            name: &p.name,
            price: &p.price,
        })
        .collect()
}

fn print_ranked(products: &[Product]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&ranked_items(products))?);
    Ok(())
}

pub(crate) async fn run_most_favorited(
    engine: &RankingEngine<PgCatalog>,
    limit: usize,
) -> anyhow::Result<()> {
    let products = engine.most_favorited_products(limit).await?;
    print_ranked(&products)
}

pub(crate) async fn run_trending(
    engine: &RankingEngine<PgCatalog>,
    limit: usize,
) -> anyhow::Result<()> {
    let products = engine.trending_products(limit).await?;
    print_ranked(&products)
}

pub(crate) async fn run_recommend(
    engine: &RankingEngine<PgCatalog>,
    slug: &str,
    limit: usize,
) -> anyhow::Result<()> {
    let products = engine.recommendations(slug, limit).await?;
    if products.is_empty() {
        tracing::warn!(slug, "no recommendations; unknown slug or empty catalog");
    }
    print_ranked(&products)
}
