//! Catalog products.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    Collection, Entity, UniqueKey, ValidationError, amount, amount_opt, double_option,
    non_negative_int, optional_text, required_text,
};
use crate::types::{ProductId, ProductStatus};

/// A sellable catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<Decimal>,
    pub stock: i32,
    /// Stock keeping unit, unique when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Category name (free text, not a foreign key).
    pub category: String,
    pub brand: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    pub dimensions: String,
    pub main_image: String,
    pub gallery_images: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub status: ProductStatus,
    pub tags: Vec<String>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/products`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<Decimal>,
    #[serde(default)]
    pub stock: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default)]
    pub dimensions: String,
    #[serde(default)]
    pub main_image: String,
    #[serde(default)]
    pub gallery_images: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured: bool,
}

/// Body of `PUT /api/products/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub sale_price: Option<Option<Decimal>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub cost_price: Option<Option<Decimal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i32>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub sku: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallery_images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

fn check_weight(weight: Option<f64>) -> Result<Option<f64>, ValidationError> {
    match weight {
        Some(w) if !w.is_finite() || w < 0.0 => Err(ValidationError::Negative("weight")),
        other => Ok(other),
    }
}

impl Product {
    /// The price a customer pays: the sale price when set, else the list price.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        self.sale_price.unwrap_or(self.price)
    }
}

impl Entity for Product {
    type Id = ProductId;
    type Create = CreateProductInput;
    type Patch = UpdateProductInput;

    const COLLECTION: Collection = Collection::Products;

    fn id(&self) -> ProductId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_create(
        id: ProductId,
        input: CreateProductInput,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            title: required_text("title", &input.title)?,
            description: input.description,
            price: amount("price", input.price)?,
            sale_price: amount_opt("salePrice", input.sale_price)?,
            cost_price: amount_opt("costPrice", input.cost_price)?,
            stock: non_negative_int("stock", input.stock)?,
            sku: optional_text(input.sku),
            category: input.category.trim().to_owned(),
            brand: input.brand,
            weight: check_weight(input.weight)?,
            dimensions: input.dimensions,
            main_image: input.main_image,
            gallery_images: input.gallery_images,
            attributes: input.attributes,
            status: input.status,
            tags: input.tags,
            featured: input.featured,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply_patch(
        &mut self,
        patch: UpdateProductInput,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        if let Some(title) = patch.title {
            self.title = required_text("title", &title)?;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = amount("price", price)?;
        }
        if let Some(sale_price) = patch.sale_price {
            self.sale_price = amount_opt("salePrice", sale_price)?;
        }
        if let Some(cost_price) = patch.cost_price {
            self.cost_price = amount_opt("costPrice", cost_price)?;
        }
        if let Some(stock) = patch.stock {
            self.stock = non_negative_int("stock", stock)?;
        }
        if let Some(sku) = patch.sku {
            self.sku = optional_text(sku);
        }
        if let Some(category) = patch.category {
            self.category = category.trim().to_owned();
        }
        if let Some(brand) = patch.brand {
            self.brand = brand;
        }
        if let Some(weight) = patch.weight {
            self.weight = check_weight(weight)?;
        }
        if let Some(dimensions) = patch.dimensions {
            self.dimensions = dimensions;
        }
        if let Some(main_image) = patch.main_image {
            self.main_image = main_image;
        }
        if let Some(gallery_images) = patch.gallery_images {
            self.gallery_images = gallery_images;
        }
        if let Some(attributes) = patch.attributes {
            self.attributes = attributes;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(featured) = patch.featured {
            self.featured = featured;
        }
        self.updated_at = now;
        Ok(())
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        self.sku
            .as_deref()
            .map(|sku| UniqueKey::new("sku", sku))
            .into_iter()
            .collect()
    }
}
