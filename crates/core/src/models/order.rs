//! Customer orders placed against a store.
//!
//! Customer contact fields keep their `snake_case` wire names
//! (`customer_name`, `customer_email`, `customer_phone`); every other field
//! is `camelCase` like the rest of the API.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    Collection, Entity, ValidationError, amount, double_option, optional_text, required_text,
};
use crate::types::{OrderId, OrderStatus, PaymentStatus, ProductId, StoreId};

const DEFAULT_PAYMENT_METHOD: &str = "card";

const fn default_quantity() -> u32 {
    1
}

fn default_payment_method() -> String {
    DEFAULT_PAYMENT_METHOD.to_owned()
}

/// A line of an order. Product name and price are captured at order time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub product_name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub price: Decimal,
}

impl OrderItem {
    /// `quantity * price`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(rename = "customer_name")]
    pub customer_name: String,
    #[serde(
        rename = "customer_email",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub customer_email: Option<String>,
    #[serde(
        rename = "customer_phone",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub customer_phone: Option<String>,
    pub total: Decimal,
    pub status: OrderStatus,
    pub store_id: StoreId,
    pub items: Vec<OrderItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<ShippingAddress>,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Key used to group orders into customers: the lowercased email when
    /// present, otherwise the trimmed name.
    #[must_use]
    pub fn customer_key(&self) -> String {
        self.customer_email.as_deref().map_or_else(
            || format!("name:{}", self.customer_name.trim().to_lowercase()),
            |email| format!("email:{}", email.to_lowercase()),
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderInput {
    #[serde(rename = "customer_name")]
    pub customer_name: String,
    #[serde(
        rename = "customer_email",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub customer_email: Option<String>,
    #[serde(
        rename = "customer_phone",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub customer_phone: Option<String>,
    pub total: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
    pub store_id: StoreId,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub notes: String,
    /// Backdated orders (imports, seed data) may carry their own timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderInput {
    #[serde(
        rename = "customer_name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub customer_name: Option<String>,
    #[serde(
        rename = "customer_email",
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub customer_email: Option<Option<String>>,
    #[serde(
        rename = "customer_phone",
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub customer_phone: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<StoreId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OrderItem>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub shipping_address: Option<Option<ShippingAddress>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn check_items(items: Vec<OrderItem>) -> Result<Vec<OrderItem>, ValidationError> {
    for item in &items {
        amount("items.price", item.price)?;
    }
    Ok(items)
}

impl Entity for Order {
    type Id = OrderId;
    type Create = CreateOrderInput;
    type Patch = UpdateOrderInput;

    const COLLECTION: Collection = Collection::Orders;

    fn id(&self) -> OrderId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_create(
        id: OrderId,
        input: CreateOrderInput,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let payment_method =
            optional_text(Some(input.payment_method)).unwrap_or_else(default_payment_method);
        Ok(Self {
            id,
            customer_name: required_text("customer_name", &input.customer_name)?,
            customer_email: optional_text(input.customer_email),
            customer_phone: optional_text(input.customer_phone),
            total: amount("total", input.total)?,
            status: input.status,
            store_id: input.store_id,
            items: check_items(input.items)?,
            shipping_address: input.shipping_address,
            payment_method,
            payment_status: input.payment_status,
            notes: input.notes,
            created_at: input.created_at.unwrap_or(now),
            updated_at: now,
        })
    }

    fn apply_patch(
        &mut self,
        patch: UpdateOrderInput,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        if let Some(name) = patch.customer_name {
            self.customer_name = required_text("customer_name", &name)?;
        }
        if let Some(email) = patch.customer_email {
            self.customer_email = optional_text(email);
        }
        if let Some(phone) = patch.customer_phone {
            self.customer_phone = optional_text(phone);
        }
        if let Some(total) = patch.total {
            self.total = amount("total", total)?;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(store_id) = patch.store_id {
            self.store_id = store_id;
        }
        if let Some(items) = patch.items {
            self.items = check_items(items)?;
        }
        if let Some(address) = patch.shipping_address {
            self.shipping_address = address;
        }
        if let Some(method) = patch.payment_method {
            self.payment_method = optional_text(Some(method)).unwrap_or_else(default_payment_method);
        }
        if let Some(payment_status) = patch.payment_status {
            self.payment_status = payment_status;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        self.updated_at = now;
        Ok(())
    }
}
