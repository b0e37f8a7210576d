use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::products::Product;

/// Browse-view filter. Unset (or empty) fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFilter {
    /// Exact category match.
    pub category: Option<String>,
    /// Exact brand-name match.
    pub brand: Option<String>,
    /// Case-insensitive substring of `"{brand} {name}"`.
    pub search: Option<String>,
}

impl CatalogFilter {
    /// Build a filter from query-string values: search is trimmed and blank
    /// values are treated as unset.
    #[must_use]
    pub fn from_query(
        category: Option<String>,
        brand: Option<String>,
        search: Option<String>,
    ) -> Self {
        Self {
            category: category.filter(|c| !c.is_empty()),
            brand: brand.filter(|b| !b.is_empty()),
            search: search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        active(self.category.as_ref()).is_none()
            && active(self.brand.as_ref()).is_none()
            && active(self.search.as_ref()).is_none()
    }

    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = active(self.category.as_ref()) {
            if product.category != *category {
                return false;
            }
        }

        if let Some(brand) = active(self.brand.as_ref()) {
            if product.brand != *brand {
                return false;
            }
        }

        if let Some(search) = active(self.search.as_ref()) {
            let term = search.to_lowercase();
            if !product.searchable_text().to_lowercase().contains(&term) {
                return false;
            }
        }

        true
    }
}

fn active(value: Option<&String>) -> Option<&String> {
    value.filter(|v| !v.is_empty())
}

/// Returns the products matching `filter`, in input order.
#[must_use]
pub fn filter_catalog(products: &[Product], filter: &CatalogFilter) -> Vec<Product> {
    products
        .iter()
        .filter(|product| filter.matches(product))
        .cloned()
        .collect()
}

/// Distinct values offered as filter chips.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub categories: Vec<String>,
    pub brands: Vec<String>,
}

/// Sorted distinct categories and brands across `products`.
#[must_use]
pub fn facet_values(products: &[Product]) -> Facets {
    let categories: BTreeSet<&str> = products.iter().map(|p| p.category.as_str()).collect();
    let brands: BTreeSet<&str> = products.iter().map(|p| p.brand.as_str()).collect();

    Facets {
        categories: categories.into_iter().map(str::to_string).collect(),
        brands: brands.into_iter().map(str::to_string).collect(),
    }
}
