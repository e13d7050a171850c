//! Analytics route handlers.
//!
//! ```text
//! GET /api/analytics          - Dashboard summary and chart series
//! GET /api/analytics/revenue  - Revenue per day or month
//! ```

use axum::{Json, Router, extract::State, routing::get};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use storedash_core::query::DateRange;
use storedash_core::reports::{AnalyticsReport, RevenuePeriod, RevenueSeries, TimeRange};
use storedash_core::{Order, Product, Store, StoreId};

use crate::error::AppError;
use crate::extract::{ApiQuery, parse_filter};
use crate::services::analytics::{self, AnalyticsData, AnalyticsFilter};
use crate::state::AppState;

/// `GET /api/analytics` query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQuery {
    pub store_id: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub time_range: Option<String>,
}

impl AnalyticsQuery {
    fn to_filter(&self) -> Result<AnalyticsFilter, AppError> {
        Ok(AnalyticsFilter {
            store_id: parse_filter::<StoreId>("storeId", self.store_id.as_deref())?,
            range: DateRange::parse(self.date_from.as_deref(), self.date_to.as_deref())
                .map_err(AppError::BadRequest)?,
            time_range: parse_filter::<TimeRange>("timeRange", self.time_range.as_deref())?
                .unwrap_or_default(),
        })
    }
}

/// `GET /api/analytics/revenue` query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueQuery {
    pub store_id: Option<String>,
    pub period: Option<String>,
}

#[instrument(skip(state))]
async fn summary(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AnalyticsQuery>,
) -> Result<Json<AnalyticsReport>, AppError> {
    let filter = query.to_filter()?;

    let orders = state.repo::<Order>().list().await?;
    let products = state.repo::<Product>().list().await?;
    let stores = state.repo::<Store>().list().await?;

    let report = analytics::build_report(
        &filter,
        AnalyticsData {
            orders: &orders,
            products: &products,
            stores: &stores,
        },
        Utc::now().date_naive(),
    );
    Ok(Json(report))
}

#[instrument(skip(state))]
async fn revenue(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<RevenueQuery>,
) -> Result<Json<RevenueSeries>, AppError> {
    let store_id = parse_filter::<StoreId>("storeId", query.store_id.as_deref())?;
    let period =
        parse_filter::<RevenuePeriod>("period", query.period.as_deref())?.unwrap_or_default();

    let orders = state.repo::<Order>().list().await?;
    Ok(Json(analytics::revenue_series(&orders, store_id, period)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/analytics", get(summary))
        .route("/api/analytics/revenue", get(revenue))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_query_to_filter() {
        let query = AnalyticsQuery {
            store_id: Some("2".into()),
            time_range: Some("week".into()),
            ..Default::default()
        };
        let filter = query.to_filter().unwrap();
        assert_eq!(filter.store_id, Some(StoreId::new(2)));
        assert_eq!(filter.time_range, TimeRange::Week);
        assert!(filter.range.from.is_none());
    }

    #[test]
    fn test_bad_time_range() {
        let query = AnalyticsQuery {
            time_range: Some("decade".into()),
            ..Default::default()
        };
        let err = query.to_filter().unwrap_err();
        assert_eq!(err.to_string(), "invalid timeRange: decade");
    }
}
