//! Order routes.

use axum::Router;
use serde::Deserialize;

use storedash_core::query::{DateRange, contains_ignore_case, search_term};
use storedash_core::{Order, OrderStatus, PaymentStatus, StoreId};

use super::crud::{self, ListFilter, PageParams};
use crate::error::AppError;
use crate::extract::parse_filter;
use crate::state::AppState;

/// `GET /api/orders` query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    #[serde(alias = "statusFilter")]
    pub status: Option<String>,
    pub store_id: Option<String>,
    pub payment_status: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub search: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

impl OrderQuery {
    /// The `dateFrom`/`dateTo` window.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` when either bound is not a date.
    pub fn date_range(&self) -> Result<DateRange, AppError> {
        DateRange::parse(self.date_from.as_deref(), self.date_to.as_deref())
            .map_err(AppError::BadRequest)
    }
}

impl ListFilter<Order> for OrderQuery {
    fn page(&self) -> &PageParams {
        &self.page
    }

    fn apply(&self, records: Vec<Order>) -> Result<Vec<Order>, AppError> {
        let status = parse_filter::<OrderStatus>("status", self.status.as_deref())?;
        let store_id = parse_filter::<StoreId>("storeId", self.store_id.as_deref())?;
        let payment =
            parse_filter::<PaymentStatus>("paymentStatus", self.payment_status.as_deref())?;
        let range = self.date_range()?;
        let search = search_term(self.search.as_deref());

        let mut orders: Vec<Order> = records
            .into_iter()
            .filter(|o| status.is_none_or(|s| o.status == s))
            .filter(|o| store_id.is_none_or(|s| o.store_id == s))
            .filter(|o| payment.is_none_or(|p| o.payment_status == p))
            .filter(|o| range.contains(o.created_at))
            .filter(|o| {
                search.is_none_or(|term| {
                    contains_ignore_case(&o.customer_name, term)
                        || o.customer_email
                            .as_deref()
                            .is_some_and(|email| contains_ignore_case(email, term))
                })
            })
            .collect();

        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(orders)
    }
}

pub fn router() -> Router<AppState> {
    crud::router::<Order, OrderQuery>()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use storedash_core::{CreateOrderInput, Entity, OrderId};

    fn order(id: i32, name: &str, store: i32, status: OrderStatus, day: u32) -> Order {
        let input = CreateOrderInput {
            customer_name: name.to_string(),
            customer_email: Some(format!("{}@example.com", name.to_lowercase())),
            total: Decimal::new(5000, 2),
            status,
            store_id: StoreId::new(store),
            created_at: Some(Utc.with_ymd_and_hms(2026, 3, day, 15, 30, 0).unwrap()),
            ..Default::default()
        };
        Order::from_create(OrderId::new(id), input, Utc::now()).unwrap()
    }

    fn book() -> Vec<Order> {
        vec![
            order(1, "Alice", 1, OrderStatus::Delivered, 1),
            order(2, "Bob", 2, OrderStatus::Pending, 5),
            order(3, "Carol", 1, OrderStatus::Shipped, 10),
        ]
    }

    fn ids(orders: &[Order]) -> Vec<i32> {
        orders.iter().map(|o| o.id.as_i32()).collect()
    }

    #[test]
    fn test_newest_first() {
        assert_eq!(ids(&OrderQuery::default().apply(book()).unwrap()), vec![3, 2, 1]);
    }

    #[test]
    fn test_store_and_status() {
        let query = OrderQuery {
            store_id: Some("1".into()),
            status: Some("shipped".into()),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(book()).unwrap()), vec![3]);
    }

    #[test]
    fn test_date_to_covers_whole_day() {
        let query = OrderQuery {
            date_from: Some("2026-03-05".into()),
            date_to: Some("2026-03-10".into()),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(book()).unwrap()), vec![3, 2]);
    }

    #[test]
    fn test_search_customer_email() {
        let query = OrderQuery {
            search: Some("BOB@".into()),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(book()).unwrap()), vec![2]);
    }

    #[test]
    fn test_bad_date_rejected() {
        let query = OrderQuery {
            date_from: Some("03/05/2026".into()),
            ..Default::default()
        };
        assert!(matches!(query.apply(book()), Err(AppError::BadRequest(_))));
    }
}
