//! Product categories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    Collection, Entity, UniqueKey, ValidationError, double_option, optional_text, required_text,
};
use crate::types::{ActiveStatus, CategoryId, normalize_slug, slugify};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub slug: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_category: Option<CategoryId>,
    pub status: ActiveStatus,
    /// Sort position among siblings.
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Generated from the name when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_category: Option<CategoryId>,
    #[serde(default)]
    pub status: ActiveStatus,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_category: Option<Option<CategoryId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ActiveStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

fn resolve_slug(explicit: Option<String>, name: &str) -> Result<String, ValidationError> {
    let slug = optional_text(explicit).map_or_else(|| slugify(name), |s| normalize_slug(&s));
    if slug.is_empty() {
        return Err(ValidationError::Invalid {
            field: "slug",
            reason: "could not derive a slug from the name".to_owned(),
        });
    }
    Ok(slug)
}

impl Entity for Category {
    type Id = CategoryId;
    type Create = CreateCategoryInput;
    type Patch = UpdateCategoryInput;

    const COLLECTION: Collection = Collection::Categories;

    fn id(&self) -> CategoryId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_create(
        id: CategoryId,
        input: CreateCategoryInput,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let name = required_text("name", &input.name)?;
        let slug = resolve_slug(input.slug, &name)?;
        Ok(Self {
            id,
            name,
            description: input.description,
            slug,
            image: input.image,
            parent_category: input.parent_category,
            status: input.status,
            order: input.order,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply_patch(
        &mut self,
        patch: UpdateCategoryInput,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        if let Some(name) = patch.name {
            self.name = required_text("name", &name)?;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        // An existing slug survives renames unless the client replaces it.
        if let Some(slug) = patch.slug {
            self.slug = resolve_slug(Some(slug), &self.name)?;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(parent) = patch.parent_category {
            if parent == Some(self.id) {
                return Err(ValidationError::Invalid {
                    field: "parentCategory",
                    reason: "a category cannot be its own parent".to_owned(),
                });
            }
            self.parent_category = parent;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
        self.updated_at = now;
        Ok(())
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![
            UniqueKey::new("name", &self.name),
            UniqueKey::new("slug", &self.slug),
        ]
    }
}
