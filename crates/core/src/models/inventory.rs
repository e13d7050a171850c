//! Per-location stock records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Collection, Entity, ValidationError, non_negative_int, required_text};
use crate::types::{InventoryId, InventoryStatus, ProductId};

/// Threshold applied when a record does not set its own.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 10;

const fn default_threshold() -> i32 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: InventoryId,
    pub product_id: ProductId,
    pub sku: String,
    pub stock: i32,
    pub location: String,
    pub low_stock_threshold: i32,
    pub status: InventoryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInventoryInput {
    pub product_id: ProductId,
    pub sku: String,
    pub stock: i32,
    #[serde(default)]
    pub location: String,
    #[serde(default = "default_threshold")]
    pub low_stock_threshold: i32,
    /// Derived from stock and threshold when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<InventoryStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInventoryInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_stock_threshold: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<InventoryStatus>,
}

impl Entity for InventoryItem {
    type Id = InventoryId;
    type Create = CreateInventoryInput;
    type Patch = UpdateInventoryInput;

    const COLLECTION: Collection = Collection::Inventory;

    fn id(&self) -> InventoryId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_create(
        id: InventoryId,
        input: CreateInventoryInput,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let stock = non_negative_int("stock", input.stock)?;
        let low_stock_threshold = non_negative_int("lowStockThreshold", input.low_stock_threshold)?;
        Ok(Self {
            id,
            product_id: input.product_id,
            sku: required_text("sku", &input.sku)?,
            stock,
            location: input.location,
            low_stock_threshold,
            status: input
                .status
                .unwrap_or_else(|| InventoryStatus::from_stock(stock, low_stock_threshold)),
            created_at: now,
            updated_at: now,
        })
    }

    fn apply_patch(
        &mut self,
        patch: UpdateInventoryInput,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        let levels_changed = patch.stock.is_some() || patch.low_stock_threshold.is_some();

        if let Some(product_id) = patch.product_id {
            self.product_id = product_id;
        }
        if let Some(sku) = patch.sku {
            self.sku = required_text("sku", &sku)?;
        }
        if let Some(stock) = patch.stock {
            self.stock = non_negative_int("stock", stock)?;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(threshold) = patch.low_stock_threshold {
            self.low_stock_threshold = non_negative_int("lowStockThreshold", threshold)?;
        }
        match patch.status {
            Some(status) => self.status = status,
            None if levels_changed => {
                self.status = InventoryStatus::from_stock(self.stock, self.low_stock_threshold);
            }
            None => {}
        }
        self.updated_at = now;
        Ok(())
    }
}
