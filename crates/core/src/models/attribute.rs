//! Product attribute definitions (color, size, material...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Collection, Entity, ValidationError, required_text};
use crate::types::{ActiveStatus, AttributeId, AttributeType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub id: AttributeId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AttributeType,
    /// Comma separated option list as entered in the editor.
    pub options: String,
    pub status: ActiveStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Attribute {
    /// The individual options, trimmed, blanks dropped.
    pub fn option_list(&self) -> impl Iterator<Item = &str> {
        self.options
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttributeInput {
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: AttributeType,
    #[serde(default)]
    pub options: String,
    #[serde(default)]
    pub status: ActiveStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttributeInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<AttributeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ActiveStatus>,
}

impl Entity for Attribute {
    type Id = AttributeId;
    type Create = CreateAttributeInput;
    type Patch = UpdateAttributeInput;

    const COLLECTION: Collection = Collection::Attributes;

    fn id(&self) -> AttributeId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_create(
        id: AttributeId,
        input: CreateAttributeInput,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            name: required_text("name", &input.name)?,
            kind: input.kind,
            options: input.options.trim().to_owned(),
            status: input.status,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply_patch(
        &mut self,
        patch: UpdateAttributeInput,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        if let Some(name) = patch.name {
            self.name = required_text("name", &name)?;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(options) = patch.options {
            self.options = options.trim().to_owned();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_field_on_the_wire() {
        let input: CreateAttributeInput = serde_json::from_value(json!({
            "name": "Size",
            "type": "size",
            "options": "S, M,,L "
        }))
        .unwrap();
        let attribute = Attribute::from_create(AttributeId::new(2), input, Utc::now()).unwrap();

        assert_eq!(attribute.kind, AttributeType::Size);
        assert_eq!(attribute.option_list().collect::<Vec<_>>(), ["S", "M", "L"]);

        let json = serde_json::to_value(&attribute).unwrap();
        assert_eq!(json["type"], "size");
        assert_eq!(json["status"], "active");
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result = serde_json::from_value::<CreateAttributeInput>(json!({
            "name": "Fabric",
            "type": "fabric"
        }));
        assert!(result.is_err());
    }
}
