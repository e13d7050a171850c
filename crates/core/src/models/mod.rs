//! Entity records, their create/update inputs, and the [`Entity`] trait that
//! ties them to a collection.
//!
//! Create inputs apply schema defaults for omitted fields. Update inputs are
//! partial: every field is optional and only the fields present in the body
//! change the record. Nullable fields use `Option<Option<T>>` so that an
//! explicit `null` clears the value while an absent key leaves it untouched.

pub mod attribute;
pub mod category;
pub mod inventory;
pub mod order;
pub mod product;
pub mod store;
pub mod user;

use std::fmt;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::types::EmailError;

/// Largest accepted money amount, one trillion.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

pub use attribute::{Attribute, CreateAttributeInput, UpdateAttributeInput};
pub use category::{Category, CreateCategoryInput, UpdateCategoryInput};
pub use inventory::{CreateInventoryInput, InventoryItem, UpdateInventoryInput};
pub use order::{CreateOrderInput, Order, OrderItem, ShippingAddress, UpdateOrderInput};
pub use product::{CreateProductInput, Product, UpdateProductInput};
pub use store::{CreateStoreInput, Store, UpdateStoreInput};
pub use user::{CreateUserInput, UpdateUserInput, User};

/// Errors raised while building or merging an entity.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{0} is required")]
    Required(&'static str),

    /// A numeric field is below zero.
    #[error("{0} cannot be negative")]
    Negative(&'static str),

    /// A money field is above [`MAX_AMOUNT`].
    #[error("{0} is too large")]
    TooLarge(&'static str),

    /// A field has an unacceptable value.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Wire name of the offending field.
        field: &'static str,
        /// Human readable explanation.
        reason: String,
    },

    /// An email field failed to parse.
    #[error("invalid email: {0}")]
    Email(#[from] EmailError),
}

/// The collections exposed by the REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Products,
    Categories,
    Attributes,
    Orders,
    Stores,
    Users,
    Inventory,
}

impl Collection {
    /// Every collection, in route registration order.
    pub const ALL: [Self; 7] = [
        Self::Products,
        Self::Categories,
        Self::Attributes,
        Self::Orders,
        Self::Stores,
        Self::Users,
        Self::Inventory,
    ];

    /// Storage name, also the URL segment under `/api`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Categories => "categories",
            Self::Attributes => "attributes",
            Self::Orders => "orders",
            Self::Stores => "stores",
            Self::Users => "users",
            Self::Inventory => "inventory",
        }
    }

    /// Singular display name used in "not found" messages.
    #[must_use]
    pub const fn entity_name(&self) -> &'static str {
        match self {
            Self::Products => "Product",
            Self::Categories => "Category",
            Self::Attributes => "Attribute",
            Self::Orders => "Order",
            Self::Stores => "Store",
            Self::Users => "User",
            Self::Inventory => "Inventory item",
        }
    }

    /// Key holding the records in a list response.
    #[must_use]
    pub const fn list_key(&self) -> &'static str {
        match self {
            Self::Inventory => "items",
            other => other.as_str(),
        }
    }

    /// Page size used when a list request has no `limit`.
    #[must_use]
    pub const fn default_page_size(&self) -> u32 {
        match self {
            Self::Products | Self::Orders => 10,
            Self::Inventory => 20,
            Self::Categories | Self::Attributes | Self::Stores | Self::Users => 50,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field value that must be unique across a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueKey {
    /// Wire name of the field.
    pub field: &'static str,
    /// Normalized value compared across records.
    pub value: String,
}

impl UniqueKey {
    /// Build a key, lowercasing the value so comparisons ignore case.
    #[must_use]
    pub fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_lowercase(),
        }
    }
}

/// A record type stored in one collection.
///
/// Implementations own their defaults and validation, so every persistence
/// backend and the client-side optimistic cache merge records the same way.
pub trait Entity:
    Serialize + DeserializeOwned + Clone + fmt::Debug + PartialEq + Send + Sync + 'static
{
    /// Typed id of the record.
    type Id: Copy
        + Eq
        + Hash
        + Ord
        + fmt::Debug
        + fmt::Display
        + From<i32>
        + Into<i32>
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;

    /// Body accepted by `POST`.
    type Create: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static;

    /// Body accepted by `PUT` (partial merge).
    type Patch: Serialize + DeserializeOwned + Clone + fmt::Debug + Default + Send + Sync + 'static;

    /// Collection the records live in.
    const COLLECTION: Collection;

    /// The record's id.
    fn id(&self) -> Self::Id;

    /// When the record was created.
    fn created_at(&self) -> DateTime<Utc>;

    /// Build a new record from a create input, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when a required field is blank or a value
    /// is out of range.
    fn from_create(id: Self::Id, input: Self::Create, now: DateTime<Utc>)
    -> Result<Self, ValidationError>;

    /// Merge a partial update into the record.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when a supplied field is invalid. The
    /// record may be partially modified in that case; callers merge into a copy.
    fn apply_patch(&mut self, patch: Self::Patch, now: DateTime<Utc>)
    -> Result<(), ValidationError>;

    /// Fields that must not collide with another record of the collection.
    fn unique_keys(&self) -> Vec<UniqueKey> {
        Vec::new()
    }
}

/// Deserialize a present field into `Some(value)`, keeping `null` as `Some(None)`.
///
/// Combine with `#[serde(default)]` so an absent key stays `None`.
///
/// # Errors
///
/// Propagates the inner deserializer's error.
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Trim a required text field and reject blank values.
pub(crate) fn required_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(trimmed.to_owned())
}

/// Trim an optional text field, mapping blank to `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

pub(crate) fn amount(field: &'static str, value: Decimal) -> Result<Decimal, ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::Negative(field));
    }
    if value > MAX_AMOUNT {
        return Err(ValidationError::TooLarge(field));
    }
    Ok(value)
}

pub(crate) fn amount_opt(
    field: &'static str,
    value: Option<Decimal>,
) -> Result<Option<Decimal>, ValidationError> {
    value.map(|v| amount(field, v)).transpose()
}

pub(crate) const fn non_negative_int(field: &'static str, value: i32) -> Result<i32, ValidationError> {
    if value < 0 {
        return Err(ValidationError::Negative(field));
    }
    Ok(value)
}
