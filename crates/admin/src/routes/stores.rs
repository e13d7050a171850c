//! Store routes.

use axum::Router;
use serde::Deserialize;

use storedash_core::query::{contains_ignore_case, search_term};
use storedash_core::{Store, StoreStatus};

use super::crud::{self, ListFilter, PageParams};
use crate::error::AppError;
use crate::extract::parse_filter;
use crate::state::AppState;

/// `GET /api/stores` query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct StoreQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

impl ListFilter<Store> for StoreQuery {
    fn page(&self) -> &PageParams {
        &self.page
    }

    fn apply(&self, records: Vec<Store>) -> Result<Vec<Store>, AppError> {
        let status = parse_filter::<StoreStatus>("status", self.status.as_deref())?;
        let search = search_term(self.search.as_deref());

        Ok(records
            .into_iter()
            .filter(|s| status.is_none_or(|wanted| s.status == wanted))
            .filter(|s| {
                search.is_none_or(|term| {
                    contains_ignore_case(&s.name, term)
                        || contains_ignore_case(&s.city, term)
                        || contains_ignore_case(&s.slug, term)
                })
            })
            .collect())
    }
}

pub fn router() -> Router<AppState> {
    crud::router::<Store, StoreQuery>()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use storedash_core::{CreateStoreInput, Entity, StoreId};

    fn store(id: i32, name: &str, city: &str, status: StoreStatus) -> Store {
        let input = CreateStoreInput {
            name: name.to_string(),
            city: city.to_string(),
            status,
            ..Default::default()
        };
        Store::from_create(StoreId::new(id), input, Utc::now()).unwrap()
    }

    #[test]
    fn test_search_and_status() {
        let records = vec![
            store(1, "Downtown Store", "New York", StoreStatus::Active),
            store(2, "Mall Location", "Los Angeles", StoreStatus::Active),
            store(3, "Airport Kiosk", "New York", StoreStatus::Inactive),
        ];

        let query = StoreQuery {
            search: Some("new york".into()),
            ..Default::default()
        };
        assert_eq!(query.apply(records.clone()).unwrap().len(), 2);

        let query = StoreQuery {
            search: Some("new york".into()),
            status: Some("active".into()),
            ..Default::default()
        };
        let result = query.apply(records.clone()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].slug, "downtown-store");

        let query = StoreQuery {
            search: Some("mall-loc".into()),
            ..Default::default()
        };
        assert_eq!(query.apply(records).unwrap()[0].id, StoreId::new(2));
    }
}
