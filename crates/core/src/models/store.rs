//! Physical or virtual storefronts that orders and users belong to.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    Collection, Entity, UniqueKey, ValidationError, amount, double_option, non_negative_int,
    optional_text, required_text,
};
use crate::types::{Email, StoreId, StoreStatus, UserId, normalize_slug, slugify};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub location: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
    /// Contact address, empty when unknown.
    pub email: String,
    pub status: StoreStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_admin_id: Option<UserId>,
    pub store_admin_name: String,
    pub total_orders: i32,
    pub total_revenue: Decimal,
    pub active_editors: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoreInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub status: StoreStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_admin_id: Option<UserId>,
    #[serde(default)]
    pub store_admin_name: String,
    #[serde(default)]
    pub total_orders: i32,
    #[serde(default)]
    pub total_revenue: Decimal,
    #[serde(default)]
    pub active_editors: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStoreInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StoreStatus>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub store_admin_id: Option<Option<UserId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_admin_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_orders: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_revenue: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_editors: Option<i32>,
}

/// Blank stays blank; anything else must be a valid address.
fn contact_email(raw: &str) -> Result<String, ValidationError> {
    if raw.trim().is_empty() {
        return Ok(String::new());
    }
    Ok(Email::parse(raw)?.into_inner())
}

fn store_slug(explicit: Option<String>, name: &str) -> Result<String, ValidationError> {
    let slug = optional_text(explicit).map_or_else(|| slugify(name), |s| normalize_slug(&s));
    if slug.is_empty() {
        return Err(ValidationError::Invalid {
            field: "slug",
            reason: "could not derive a slug from the name".to_owned(),
        });
    }
    Ok(slug)
}

impl Entity for Store {
    type Id = StoreId;
    type Create = CreateStoreInput;
    type Patch = UpdateStoreInput;

    const COLLECTION: Collection = Collection::Stores;

    fn id(&self) -> StoreId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_create(
        id: StoreId,
        input: CreateStoreInput,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let name = required_text("name", &input.name)?;
        let slug = store_slug(input.slug, &name)?;
        Ok(Self {
            id,
            name,
            slug,
            description: input.description,
            location: input.location,
            address: input.address,
            city: input.city,
            state: input.state,
            zip: input.zip,
            phone: input.phone,
            email: contact_email(&input.email)?,
            status: input.status,
            store_admin_id: input.store_admin_id,
            store_admin_name: input.store_admin_name,
            total_orders: non_negative_int("totalOrders", input.total_orders)?,
            total_revenue: amount("totalRevenue", input.total_revenue)?,
            active_editors: non_negative_int("activeEditors", input.active_editors)?,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply_patch(
        &mut self,
        patch: UpdateStoreInput,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        if let Some(name) = patch.name {
            self.name = required_text("name", &name)?;
        }
        if let Some(slug) = patch.slug {
            self.slug = store_slug(Some(slug), &self.name)?;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(city) = patch.city {
            self.city = city;
        }
        if let Some(state) = patch.state {
            self.state = state;
        }
        if let Some(zip) = patch.zip {
            self.zip = zip;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(email) = patch.email {
            self.email = contact_email(&email)?;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(admin_id) = patch.store_admin_id {
            self.store_admin_id = admin_id;
        }
        if let Some(admin_name) = patch.store_admin_name {
            self.store_admin_name = admin_name;
        }
        if let Some(total_orders) = patch.total_orders {
            self.total_orders = non_negative_int("totalOrders", total_orders)?;
        }
        if let Some(total_revenue) = patch.total_revenue {
            self.total_revenue = amount("totalRevenue", total_revenue)?;
        }
        if let Some(active_editors) = patch.active_editors {
            self.active_editors = non_negative_int("activeEditors", active_editors)?;
        }
        self.updated_at = now;
        Ok(())
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::new("slug", &self.slug)]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store(body: serde_json::Value) -> Result<Store, ValidationError> {
        let input: CreateStoreInput = serde_json::from_value(body).unwrap();
        Store::from_create(StoreId::new(1), input, Utc::now())
    }

    #[test]
    fn test_create_generates_slug_and_defaults() {
        let store = store(json!({"name": "Main Store NY", "email": "NY@JordanStore.com"})).unwrap();
        assert_eq!(store.slug, "main-store-ny");
        assert_eq!(store.email, "ny@jordanstore.com");
        assert_eq!(store.status, StoreStatus::Active);
        assert_eq!(store.total_orders, 0);
        assert_eq!(store.total_revenue, Decimal::ZERO);
    }

    #[test]
    fn test_create_rejects_bad_contact_email() {
        assert!(matches!(
            store(json!({"name": "LA Store", "email": "not-an-email"})),
            Err(ValidationError::Email(_))
        ));
        assert!(store(json!({"name": "LA Store", "email": ""})).is_ok());
    }

    #[test]
    fn test_patch_suspends_store() {
        let mut store = store(json!({"name": "Boston Store"})).unwrap();
        let patch: UpdateStoreInput =
            serde_json::from_value(json!({"status": "suspended", "activeEditors": 2})).unwrap();
        store.apply_patch(patch, Utc::now()).unwrap();
        assert_eq!(store.status, StoreStatus::Suspended);
        assert_eq!(store.active_editors, 2);
        assert_eq!(store.slug, "boston-store");
    }
}
