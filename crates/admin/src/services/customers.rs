//! Customers derived from orders.
//!
//! There is no customer collection. Orders are grouped by customer email, or
//! by name when the order has no email.

use std::collections::{BTreeSet, HashMap};

use rust_decimal::Decimal;

use storedash_core::query::contains_ignore_case;
use storedash_core::reports::CustomerSummary;
use storedash_core::{Order, StoreId};

/// Group orders into customers, biggest spenders first.
///
/// Name and phone come from the customer's most recent order. Every order
/// counts towards `totalOrders` and `totalSpent`, cancelled ones included.
#[must_use]
pub fn derive_customers(orders: &[Order], store_id: Option<StoreId>) -> Vec<CustomerSummary> {
    let mut placed: Vec<&Order> = orders
        .iter()
        .filter(|o| store_id.is_none_or(|s| o.store_id == s))
        .collect();
    placed.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

    let mut groups: HashMap<String, (CustomerSummary, BTreeSet<StoreId>)> = HashMap::new();
    for order in placed {
        let (customer, stores) = groups.entry(order.customer_key()).or_insert_with(|| {
            (
                CustomerSummary {
                    name: String::new(),
                    email: None,
                    phone: None,
                    total_orders: 0,
                    total_spent: Decimal::ZERO,
                    last_order_at: order.created_at,
                    store_ids: Vec::new(),
                },
                BTreeSet::new(),
            )
        });

        customer.name.clone_from(&order.customer_name);
        if order.customer_email.is_some() {
            customer.email.clone_from(&order.customer_email);
        }
        if order.customer_phone.is_some() {
            customer.phone.clone_from(&order.customer_phone);
        }
        customer.total_orders += 1;
        customer.total_spent += order.total;
        customer.last_order_at = order.created_at;
        stores.insert(order.store_id);
    }

    let mut customers: Vec<CustomerSummary> = groups
        .into_values()
        .map(|(mut customer, stores)| {
            customer.store_ids = stores.into_iter().collect();
            customer
        })
        .collect();

    customers.sort_by(|a, b| {
        b.total_spent
            .cmp(&a.total_spent)
            .then(b.last_order_at.cmp(&a.last_order_at))
            .then_with(|| a.name.cmp(&b.name))
    });
    customers
}

/// Case-insensitive match on name or email.
#[must_use]
pub fn matches_search(customer: &CustomerSummary, term: &str) -> bool {
    contains_ignore_case(&customer.name, term)
        || customer
            .email
            .as_deref()
            .is_some_and(|email| contains_ignore_case(email, term))
}
