//! Product catalog routes.

use axum::Router;
use serde::Deserialize;

use storedash_core::query::{contains_ignore_case, search_term};
use storedash_core::{Product, ProductStatus};

use super::crud::{self, ListFilter, PageParams};
use crate::error::AppError;
use crate::extract::parse_filter;
use crate::state::AppState;

/// `GET /api/products` query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

impl ListFilter<Product> for ProductQuery {
    fn page(&self) -> &PageParams {
        &self.page
    }

    fn apply(&self, records: Vec<Product>) -> Result<Vec<Product>, AppError> {
        let status = parse_filter::<ProductStatus>("status", self.status.as_deref())?;
        let category = search_term(self.category.as_deref());
        let search = search_term(self.search.as_deref());

        let mut products: Vec<Product> = records
            .into_iter()
            .filter(|p| status.is_none_or(|s| p.status == s))
            .filter(|p| category.is_none_or(|c| p.category == c))
            .filter(|p| {
                search.is_none_or(|term| {
                    contains_ignore_case(&p.title, term)
                        || contains_ignore_case(&p.description, term)
                        || p.sku.as_deref().is_some_and(|sku| contains_ignore_case(sku, term))
                })
            })
            .collect();

        // Newest first
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(products)
    }
}

pub fn router() -> Router<AppState> {
    crud::router::<Product, ProductQuery>()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;
    use storedash_core::{CreateProductInput, Entity, ProductId};

    fn product(id: i32, title: &str, sku: Option<&str>, category: &str, age_days: i64) -> Product {
        let input = CreateProductInput {
            title: title.to_string(),
            price: Decimal::new(1999, 2),
            sku: sku.map(str::to_string),
            category: category.to_string(),
            ..Default::default()
        };
        Product::from_create(
            ProductId::new(id),
            input,
            Utc::now() - Duration::days(age_days),
        )
        .unwrap()
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Wireless Headphones", Some("WH-001"), "Electronics", 3),
            product(2, "Cotton T-Shirt", Some("TS-002"), "Clothing", 2),
            product(3, "Smart Watch", None, "Electronics", 1),
        ]
    }

    fn ids(products: &[Product]) -> Vec<i32> {
        products.iter().map(|p| p.id.as_i32()).collect()
    }

    #[test]
    fn test_newest_first() {
        let result = ProductQuery::default().apply(catalog()).unwrap();
        assert_eq!(ids(&result), vec![3, 2, 1]);
    }

    #[test]
    fn test_search_matches_title_and_sku() {
        let query = ProductQuery {
            search: Some("wh-0".into()),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(catalog()).unwrap()), vec![1]);

        let query = ProductQuery {
            search: Some("WATCH".into()),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(catalog()).unwrap()), vec![3]);
    }

    #[test]
    fn test_category_and_status_filters() {
        let query = ProductQuery {
            category: Some("Electronics".into()),
            status: Some("active".into()),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(catalog()).unwrap()), vec![3, 1]);

        let query = ProductQuery {
            status: Some("archived".into()),
            ..Default::default()
        };
        assert!(query.apply(catalog()).is_err());
    }
}
