//! Response shapes for the aggregate endpoints: analytics, revenue series,
//! derived customers and health.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{OrderStatus, StoreId};

/// Window covered by the dashboard charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    /// Last 7 days, daily buckets.
    Week,
    /// Last 30 days, daily buckets.
    #[default]
    Month,
    /// Last 12 months, monthly buckets.
    Year,
}

impl std::str::FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            _ => Err(format!("invalid timeRange: {s}")),
        }
    }
}

/// Bucket width of the revenue series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RevenuePeriod {
    #[default]
    Daily,
    Monthly,
}

impl std::str::FromStr for RevenuePeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "monthly" => Ok(Self::Monthly),
            _ => Err(format!("invalid period: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesPoint {
    pub date: String,
    pub sales: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub date: String,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreComparison {
    pub store_id: StoreId,
    pub name: String,
    pub revenue: Decimal,
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopProduct {
    pub name: String,
    /// Units sold.
    pub sales: u64,
}

/// Dashboard summary returned by `GET /api/analytics`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub total_orders: usize,
    pub total_revenue: Decimal,
    pub avg_order_value: Decimal,
    pub total_products: usize,
    pub low_stock_products: usize,
    pub total_stores: usize,
    pub orders_by_status: BTreeMap<OrderStatus, usize>,
    pub sales_data: Vec<SalesPoint>,
    pub revenue_data: Vec<RevenuePoint>,
    pub store_comparison: Vec<StoreComparison>,
    pub top_products: Vec<TopProduct>,
    /// Orders inside the chart window.
    pub total_sales: usize,
}

/// One bucket of `GET /api/analytics/revenue`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueBucket {
    pub year: i32,
    pub month: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    pub revenue: Decimal,
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueSeries {
    pub revenue_data: Vec<RevenueBucket>,
}

/// A customer reconstructed from the orders placed under one email (or name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub total_orders: usize,
    pub total_spent: Decimal,
    pub last_order_at: DateTime<Utc>,
    pub store_ids: Vec<StoreId>,
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_by_status_keys_are_strings() {
        let mut by_status = BTreeMap::new();
        by_status.insert(OrderStatus::Shipped, 2);
        let json = serde_json::to_value(&by_status).unwrap();
        assert_eq!(json["shipped"], 2);
    }

    #[test]
    fn test_monthly_bucket_omits_day() {
        let bucket = RevenueBucket {
            year: 2024,
            month: 5,
            day: None,
            revenue: Decimal::new(10, 0),
            orders: 1,
        };
        let json = serde_json::to_value(&bucket).unwrap();
        assert!(json.get("day").is_none());
        assert_eq!(json["revenue"], 10.0);
    }

    #[test]
    fn test_query_enums_parse() {
        assert_eq!("year".parse::<TimeRange>().unwrap(), TimeRange::Year);
        assert!("decade".parse::<TimeRange>().is_err());
        assert_eq!(
            "monthly".parse::<RevenuePeriod>().unwrap(),
            RevenuePeriod::Monthly
        );
    }
}
