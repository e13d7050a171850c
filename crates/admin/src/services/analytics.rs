//! Dashboard analytics computed from the stored records.
//!
//! Every matching order counts towards both order counts and revenue,
//! whatever its status. Order totals are capped at
//! [`MAX_AMOUNT`](storedash_core::models::MAX_AMOUNT), so the sums here stay
//! far below the `Decimal` range.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use rust_decimal::Decimal;

use storedash_core::query::DateRange;
use storedash_core::reports::{
    AnalyticsReport, RevenueBucket, RevenuePeriod, RevenuePoint, RevenueSeries, SalesPoint,
    StoreComparison, TimeRange, TopProduct,
};
use storedash_core::{Order, Product, ProductStatus, Store, StoreId, StoreStatus};

/// Products below this stock level count as low stock.
pub const LOW_STOCK_LIMIT: i32 = 10;

/// Number of entries in `topProducts`.
pub const TOP_PRODUCTS: usize = 5;

/// Buckets kept by the revenue series.
pub const REVENUE_SERIES_LEN: usize = 30;

/// Order selection for the analytics report.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticsFilter {
    pub store_id: Option<StoreId>,
    pub range: DateRange,
    pub time_range: TimeRange,
}

impl AnalyticsFilter {
    fn matches(&self, order: &Order) -> bool {
        self.store_id.is_none_or(|s| order.store_id == s) && self.range.contains(order.created_at)
    }
}

/// Records the report is computed from.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticsData<'a> {
    pub orders: &'a [Order],
    pub products: &'a [Product],
    pub stores: &'a [Store],
}

/// Build the dashboard report. Chart series end on `today`.
#[must_use]
pub fn build_report(
    filter: &AnalyticsFilter,
    data: AnalyticsData<'_>,
    today: NaiveDate,
) -> AnalyticsReport {
    let orders: Vec<&Order> = data.orders.iter().filter(|o| filter.matches(o)).collect();
    let total_revenue: Decimal = orders.iter().map(|o| o.total).sum();
    let avg_order_value = if orders.is_empty() {
        Decimal::ZERO
    } else {
        (total_revenue / Decimal::from(orders.len())).round_dp(2)
    };

    let mut orders_by_status = BTreeMap::new();
    for order in &orders {
        *orders_by_status.entry(order.status).or_insert(0) += 1;
    }

    let (sales_data, revenue_data) = chart_series(filter.time_range, &orders, today);
    let total_sales = sales_data.iter().map(|p| p.sales).sum();

    AnalyticsReport {
        total_orders: orders.len(),
        total_revenue,
        avg_order_value,
        total_products: data
            .products
            .iter()
            .filter(|p| p.status == ProductStatus::Active)
            .count(),
        low_stock_products: data
            .products
            .iter()
            .filter(|p| p.status == ProductStatus::Active && p.stock < LOW_STOCK_LIMIT)
            .count(),
        total_stores: data
            .stores
            .iter()
            .filter(|s| s.status == StoreStatus::Active)
            .count(),
        orders_by_status,
        sales_data,
        revenue_data,
        store_comparison: store_comparison(filter.store_id, data.stores, &orders),
        top_products: top_products(&orders),
        total_sales,
    }
}

struct ChartBucket {
    key: String,
    label: String,
}

fn chart_buckets(time_range: TimeRange, today: NaiveDate) -> Vec<ChartBucket> {
    match time_range {
        TimeRange::Week | TimeRange::Month => {
            let days: u64 = if time_range == TimeRange::Week { 7 } else { 30 };
            (0..days)
                .rev()
                .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
                .map(|date| ChartBucket {
                    key: date.format("%Y-%m-%d").to_string(),
                    label: date.format("%m-%d").to_string(),
                })
                .collect()
        }
        TimeRange::Year => {
            let Some(first) = NaiveDate::from_ymd_opt(today.year(), today.month(), 1) else {
                return Vec::new();
            };
            (0..12)
                .rev()
                .filter_map(|offset| first.checked_sub_months(Months::new(offset)))
                .map(|month| {
                    let key = month.format("%Y-%m").to_string();
                    ChartBucket {
                        label: key.clone(),
                        key,
                    }
                })
                .collect()
        }
    }
}

fn bucket_key(time_range: TimeRange, created_at: DateTime<Utc>) -> String {
    match time_range {
        TimeRange::Year => created_at.format("%Y-%m").to_string(),
        TimeRange::Week | TimeRange::Month => created_at.format("%Y-%m-%d").to_string(),
    }
}

/// Zero-filled order count and revenue per bucket of the chart window.
fn chart_series(
    time_range: TimeRange,
    orders: &[&Order],
    today: NaiveDate,
) -> (Vec<SalesPoint>, Vec<RevenuePoint>) {
    let buckets = chart_buckets(time_range, today);
    let index: HashMap<&str, usize> = buckets
        .iter()
        .enumerate()
        .map(|(i, b)| (b.key.as_str(), i))
        .collect();

    let mut sales = vec![0usize; buckets.len()];
    let mut revenue = vec![Decimal::ZERO; buckets.len()];
    for order in orders {
        let key = bucket_key(time_range, order.created_at);
        if let Some(&i) = index.get(key.as_str()) {
            if let Some(count) = sales.get_mut(i) {
                *count += 1;
            }
            if let Some(sum) = revenue.get_mut(i) {
                *sum += order.total;
            }
        }
    }

    buckets
        .into_iter()
        .zip(sales.into_iter().zip(revenue))
        .map(|(bucket, (sales, revenue))| {
            (
                SalesPoint {
                    date: bucket.label.clone(),
                    sales,
                },
                RevenuePoint {
                    date: bucket.label,
                    revenue,
                },
            )
        })
        .unzip()
}

/// Revenue and order count per store, highest revenue first.
fn store_comparison(
    store_id: Option<StoreId>,
    stores: &[Store],
    orders: &[&Order],
) -> Vec<StoreComparison> {
    let mut rows: Vec<StoreComparison> = stores
        .iter()
        .filter(|s| store_id.is_none_or(|id| s.id == id))
        .map(|store| {
            let placed: Vec<&&Order> = orders.iter().filter(|o| o.store_id == store.id).collect();
            StoreComparison {
                store_id: store.id,
                name: store.name.clone(),
                revenue: placed.iter().map(|o| o.total).sum(),
                orders: placed.len(),
            }
        })
        .collect();

    rows.sort_by(|a, b| b.revenue.cmp(&a.revenue).then(a.store_id.cmp(&b.store_id)));
    rows
}

/// Best sellers by units across the given orders.
fn top_products(orders: &[&Order]) -> Vec<TopProduct> {
    let mut units: HashMap<&str, u64> = HashMap::new();
    for item in orders.iter().flat_map(|o| &o.items) {
        *units.entry(item.product_name.as_str()).or_insert(0) += u64::from(item.quantity);
    }

    let mut ranked: Vec<TopProduct> = units
        .into_iter()
        .map(|(name, sales)| TopProduct {
            name: name.to_string(),
            sales,
        })
        .collect();
    ranked.sort_by(|a, b| b.sales.cmp(&a.sales).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(TOP_PRODUCTS);
    ranked
}

/// Revenue grouped per day or per month, ascending, latest buckets only.
#[must_use]
pub fn revenue_series(
    orders: &[Order],
    store_id: Option<StoreId>,
    period: RevenuePeriod,
) -> RevenueSeries {
    let mut buckets: BTreeMap<(i32, u32, Option<u32>), (Decimal, usize)> = BTreeMap::new();
    for order in orders.iter().filter(|o| store_id.is_none_or(|s| o.store_id == s)) {
        let at = order.created_at;
        let day = match period {
            RevenuePeriod::Daily => Some(at.day()),
            RevenuePeriod::Monthly => None,
        };
        let entry = buckets
            .entry((at.year(), at.month(), day))
            .or_insert((Decimal::ZERO, 0));
        entry.0 += order.total;
        entry.1 += 1;
    }

    // Keeps the newest buckets where a plain ascending limit would keep the oldest.
    let skip = buckets.len().saturating_sub(REVENUE_SERIES_LEN);
    RevenueSeries {
        revenue_data: buckets
            .into_iter()
            .skip(skip)
            .map(|((year, month, day), (revenue, orders))| RevenueBucket {
                year,
                month,
                day,
                revenue,
                orders,
            })
            .collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use storedash_core::models::MAX_AMOUNT;
    use storedash_core::{
        CreateOrderInput, CreateProductInput, CreateStoreInput, Entity, OrderId, OrderItem,
        OrderStatus, ProductId,
    };

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    }

    fn noon(days_ago: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap() - Duration::days(days_ago)
    }

    fn order(id: i32, store: i32, total: i64, status: OrderStatus, days_ago: i64) -> Order {
        let input = CreateOrderInput {
            customer_name: format!("Customer {id}"),
            total: Decimal::from(total),
            status,
            store_id: StoreId::new(store),
            items: vec![OrderItem {
                product_id: None,
                product_name: if id % 2 == 0 { "Mouse" } else { "Laptop" }.to_string(),
                quantity: 2,
                price: Decimal::from(total / 2),
            }],
            created_at: Some(noon(days_ago)),
            ..Default::default()
        };
        Order::from_create(OrderId::new(id), input, Utc::now()).unwrap()
    }

    fn product(id: i32, stock: i32, status: ProductStatus) -> Product {
        let input = CreateProductInput {
            title: format!("Product {id}"),
            stock,
            status,
            ..Default::default()
        };
        Product::from_create(ProductId::new(id), input, Utc::now()).unwrap()
    }

    fn store(id: i32, name: &str) -> Store {
        let input = CreateStoreInput {
            name: name.to_string(),
            ..Default::default()
        };
        Store::from_create(StoreId::new(id), input, Utc::now()).unwrap()
    }

    fn fixture() -> (Vec<Order>, Vec<Product>, Vec<Store>) {
        let orders = vec![
            order(1, 1, 100, OrderStatus::Delivered, 0),
            order(2, 1, 50, OrderStatus::Shipped, 2),
            order(3, 2, 80, OrderStatus::Cancelled, 2),
            order(4, 2, 30, OrderStatus::Pending, 40),
        ];
        let products = vec![
            product(1, 50, ProductStatus::Active),
            product(2, 3, ProductStatus::Active),
            product(3, 0, ProductStatus::Draft),
        ];
        let stores = vec![store(1, "Downtown"), store(2, "Mall")];
        (orders, products, stores)
    }

    fn report(filter: &AnalyticsFilter) -> AnalyticsReport {
        let (orders, products, stores) = fixture();
        build_report(
            filter,
            AnalyticsData {
                orders: &orders,
                products: &products,
                stores: &stores,
            },
            today(),
        )
    }

    #[test]
    fn test_totals_include_every_order() {
        let report = report(&AnalyticsFilter::default());
        assert_eq!(report.total_orders, 4);
        assert_eq!(report.total_revenue, Decimal::from(260));
        assert_eq!(report.avg_order_value, Decimal::from(65));
        assert_eq!(report.total_products, 2);
        assert_eq!(report.low_stock_products, 1);
        assert_eq!(report.total_stores, 2);
        assert_eq!(report.orders_by_status[&OrderStatus::Cancelled], 1);
    }

    #[test]
    fn test_month_series_is_zero_filled() {
        let report = report(&AnalyticsFilter::default());
        assert_eq!(report.sales_data.len(), 30);
        assert_eq!(report.revenue_data.len(), 30);

        let last = report.sales_data.last().unwrap();
        assert_eq!(last.date, "06-15");
        assert_eq!(last.sales, 1);

        let two_days_ago = &report.revenue_data[27];
        assert_eq!(two_days_ago.date, "06-13");
        assert_eq!(two_days_ago.revenue, Decimal::from(130));

        // The 40-day-old order is outside the window.
        assert_eq!(report.total_sales, 3);
    }

    #[test]
    fn test_year_series_is_monthly() {
        let report = report(&AnalyticsFilter {
            time_range: TimeRange::Year,
            ..Default::default()
        });
        assert_eq!(report.sales_data.len(), 12);
        assert_eq!(report.sales_data[0].date, "2025-07");
        assert_eq!(report.sales_data[11].date, "2026-06");
        assert_eq!(report.sales_data[10].sales, 1);
        assert_eq!(report.total_sales, 4);
    }

    #[test]
    fn test_store_filter() {
        let report = report(&AnalyticsFilter {
            store_id: Some(StoreId::new(2)),
            ..Default::default()
        });
        assert_eq!(report.total_orders, 2);
        assert_eq!(report.total_revenue, Decimal::from(110));
        assert_eq!(report.store_comparison.len(), 1);
        assert_eq!(report.store_comparison[0].name, "Mall");
        assert_eq!(report.store_comparison[0].orders, 2);
    }

    #[test]
    fn test_store_comparison_and_top_products() {
        let report = report(&AnalyticsFilter::default());
        assert_eq!(report.store_comparison[0].name, "Downtown");
        assert_eq!(report.store_comparison[0].revenue, Decimal::from(150));
        assert_eq!(report.store_comparison[1].revenue, Decimal::from(110));

        // Ties on units fall back to the name.
        assert_eq!(
            report.top_products,
            vec![
                TopProduct {
                    name: "Laptop".into(),
                    sales: 4
                },
                TopProduct {
                    name: "Mouse".into(),
                    sales: 4
                },
            ]
        );
    }

    #[test]
    fn test_date_range_filter() {
        let range = DateRange::parse(Some("2026-06-13"), Some("2026-06-13")).unwrap();
        let report = report(&AnalyticsFilter {
            range,
            ..Default::default()
        });
        assert_eq!(report.total_orders, 2);
    }

    #[test]
    fn test_revenue_series() {
        let (orders, _, _) = fixture();
        let daily = revenue_series(&orders, None, RevenuePeriod::Daily);
        assert_eq!(daily.revenue_data.len(), 3);
        assert_eq!(daily.revenue_data[0].month, 5);
        assert_eq!(daily.revenue_data[1].day, Some(13));
        assert_eq!(daily.revenue_data[1].orders, 2);
        assert_eq!(daily.revenue_data[1].revenue, Decimal::from(130));

        let monthly = revenue_series(&orders, Some(StoreId::new(1)), RevenuePeriod::Monthly);
        assert_eq!(monthly.revenue_data.len(), 1);
        assert_eq!(monthly.revenue_data[0].day, None);
        assert_eq!(monthly.revenue_data[0].revenue, Decimal::from(150));
    }

    #[test]
    fn test_largest_totals_do_not_overflow() {
        let orders: Vec<Order> = (1..=3)
            .map(|id| {
                let mut order = order(id, 1, 0, OrderStatus::Delivered, 0);
                order.total = MAX_AMOUNT;
                order
            })
            .collect();
        let stores = vec![store(1, "Downtown")];
        let report = build_report(
            &AnalyticsFilter::default(),
            AnalyticsData {
                orders: &orders,
                products: &[],
                stores: &stores,
            },
            today(),
        );
        assert_eq!(report.total_revenue, MAX_AMOUNT * Decimal::from(3));
        assert_eq!(report.avg_order_value, MAX_AMOUNT);
        assert_eq!(report.store_comparison[0].revenue, report.total_revenue);

        let series = revenue_series(&orders, None, RevenuePeriod::Monthly);
        assert_eq!(series.revenue_data[0].revenue, report.total_revenue);
    }

    #[test]
    fn test_revenue_series_keeps_latest_buckets() {
        let orders: Vec<Order> = (0..40)
            .map(|i| order(i + 1, 1, 10, OrderStatus::Delivered, i64::from(i)))
            .collect();
        let series = revenue_series(&orders, None, RevenuePeriod::Daily);
        assert_eq!(series.revenue_data.len(), REVENUE_SERIES_LEN);
        let last = series.revenue_data.last().unwrap();
        assert_eq!((last.month, last.day), (6, Some(15)));
    }
}
