//! Dashboard user routes.

use axum::Router;
use serde::Deserialize;

use storedash_core::query::{contains_ignore_case, search_term};
use storedash_core::{Role, StoreId, User, UserStatus};

use super::crud::{self, ListFilter, PageParams};
use crate::error::AppError;
use crate::extract::parse_filter;
use crate::state::AppState;

/// `GET /api/users` query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub role: Option<String>,
    pub store_id: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

impl ListFilter<User> for UserQuery {
    fn page(&self) -> &PageParams {
        &self.page
    }

    fn apply(&self, records: Vec<User>) -> Result<Vec<User>, AppError> {
        let role = parse_filter::<Role>("role", self.role.as_deref())?;
        let store_id = parse_filter::<StoreId>("storeId", self.store_id.as_deref())?;
        let status = parse_filter::<UserStatus>("status", self.status.as_deref())?;
        let search = search_term(self.search.as_deref());

        Ok(records
            .into_iter()
            .filter(|u| role.is_none_or(|r| u.role == r))
            .filter(|u| store_id.is_none_or(|s| u.store_id == Some(s)))
            .filter(|u| status.is_none_or(|s| u.status == s))
            .filter(|u| {
                search.is_none_or(|term| {
                    contains_ignore_case(&u.name, term)
                        || contains_ignore_case(u.email.as_str(), term)
                })
            })
            .collect())
    }
}

pub fn router() -> Router<AppState> {
    crud::router::<User, UserQuery>()
}
