use newilano_core::{facet_values, filter_catalog, CatalogFilter};

use crate::rank::ranked_items;

pub(crate) async fn run_catalog(
    pool: &sqlx::PgPool,
    category: Option<String>,
    brand: Option<String>,
    search: Option<String>,
) -> anyhow::Result<()> {
    let products = newilano_db::list_products(pool).await?;
    let filter = CatalogFilter::from_query(category, brand, search);
    let matched = filter_catalog(&products, &filter);

    tracing::info!(
        total = products.len(),
        matched = matched.len(),
        "catalog filtered"
    );

    let output = serde_json::json!({
        "products": ranked_items(&matched),
        "facets": facet_values(&products),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
