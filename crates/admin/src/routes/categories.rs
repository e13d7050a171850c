//! Category routes.

use axum::Router;
use serde::Deserialize;

use storedash_core::{ActiveStatus, Category, CategoryId};

use super::crud::{self, ListFilter, PageParams};
use crate::error::AppError;
use crate::extract::parse_filter;
use crate::state::AppState;

/// `GET /api/categories` query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryQuery {
    pub status: Option<String>,
    pub parent_category: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

impl ListFilter<Category> for CategoryQuery {
    fn page(&self) -> &PageParams {
        &self.page
    }

    fn apply(&self, records: Vec<Category>) -> Result<Vec<Category>, AppError> {
        let status = parse_filter::<ActiveStatus>("status", self.status.as_deref())?;
        let parent =
            parse_filter::<CategoryId>("parentCategory", self.parent_category.as_deref())?;

        let mut categories: Vec<Category> = records
            .into_iter()
            .filter(|c| status.is_none_or(|s| c.status == s))
            .filter(|c| parent.is_none_or(|p| c.parent_category == Some(p)))
            .collect();

        categories.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        Ok(categories)
    }
}

pub fn router() -> Router<AppState> {
    crud::router::<Category, CategoryQuery>()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use storedash_core::{CreateCategoryInput, Entity};

    fn category(id: i32, name: &str, order: i32, parent: Option<i32>) -> Category {
        let input = CreateCategoryInput {
            name: name.to_string(),
            order,
            parent_category: parent.map(CategoryId::new),
            ..Default::default()
        };
        Category::from_create(CategoryId::new(id), input, Utc::now()).unwrap()
    }

    #[test]
    fn test_sorted_by_order_then_name() {
        let records = vec![
            category(1, "Sports", 2, None),
            category(2, "Clothing", 1, None),
            category(3, "Books", 2, None),
        ];
        let sorted = CategoryQuery::default().apply(records).unwrap();
        let names: Vec<&str> = sorted.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Clothing", "Books", "Sports"]);
    }

    #[test]
    fn test_parent_filter() {
        let records = vec![
            category(1, "Electronics", 1, None),
            category(2, "Phones", 1, Some(1)),
            category(3, "Laptops", 2, Some(1)),
        ];
        let query = CategoryQuery {
            parent_category: Some("1".into()),
            ..Default::default()
        };
        assert_eq!(query.apply(records.clone()).unwrap().len(), 2);

        let query = CategoryQuery {
            parent_category: Some("electronics".into()),
            ..Default::default()
        };
        assert!(query.apply(records).is_err());
    }
}
