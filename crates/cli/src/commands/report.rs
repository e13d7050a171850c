//! Print the dashboard summary from a running admin API.
//!
//! # Usage
//!
//! ```bash
//! sd-cli report --url http://127.0.0.1:8000 --store 2 --time-range week
//! ```

use std::fmt::Write as _;

use storedash_client::{ApiClient, ClientError};
use storedash_core::StoreId;
use storedash_core::format::{format_currency, format_percentage};
use storedash_core::reports::{AnalyticsReport, TimeRange};

/// Fetch `/api/analytics` and print it.
///
/// # Errors
///
/// Returns the client error, already carrying a user-facing message.
pub async fn print(
    base_url: &str,
    store_id: Option<StoreId>,
    time_range: TimeRange,
) -> Result<(), ClientError> {
    let client = ApiClient::new(base_url)?;
    tracing::info!(?client, ?store_id, ?time_range, "Fetching analytics");
    let report = client.analytics(store_id, time_range).await?;

    #[allow(clippy::print_stdout)]
    {
        print!("{}", render(&report));
    }
    Ok(())
}

/// Plain-text rendering of the summary.
#[must_use]
pub fn render(report: &AnalyticsReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Orders:          {}", report.total_orders);
    let _ = writeln!(
        out,
        "Revenue:         {}",
        format_currency(Some(report.total_revenue))
    );
    let _ = writeln!(
        out,
        "Avg order value: {}",
        format_currency(Some(report.avg_order_value))
    );
    let _ = writeln!(
        out,
        "Products:        {} ({} low stock)",
        report.total_products, report.low_stock_products
    );
    let _ = writeln!(out, "Stores:          {}", report.total_stores);

    if !report.orders_by_status.is_empty() {
        let _ = writeln!(out, "\nOrders by status");
        for (status, count) in &report.orders_by_status {
            #[allow(clippy::cast_precision_loss)]
            let share = (report.total_orders > 0)
                .then(|| *count as f64 * 100.0 / report.total_orders as f64);
            let _ = writeln!(
                out,
                "  {:<12} {count:>5}  {}",
                status.as_str(),
                format_percentage(share)
            );
        }
    }

    if !report.store_comparison.is_empty() {
        let _ = writeln!(out, "\nStores by revenue");
        for store in &report.store_comparison {
            let _ = writeln!(
                out,
                "  {:<20} {:>12}  {} orders",
                store.name,
                format_currency(Some(store.revenue)),
                store.orders
            );
        }
    }

    if !report.top_products.is_empty() {
        let _ = writeln!(out, "\nTop products");
        for product in &report.top_products {
            let _ = writeln!(out, "  {:<20} {:>5} sold", product.name, product.sales);
        }
    }
    out
}
