//! Dashboard users.
//!
//! Credentials are not part of this model. A `password` key in a request body
//! is accepted and discarded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Collection, Entity, UniqueKey, ValidationError, double_option, required_text};
use crate::auth::Role;
use crate::types::{Email, StoreId, UserId, UserStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
    /// Home store for store-scoped roles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<StoreId>,
    pub phone: String,
    pub avatar: String,
    pub status: UserStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<StoreId>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub store_id: Option<Option<StoreId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_login: Option<Option<DateTime<Utc>>>,
}

impl Entity for User {
    type Id = UserId;
    type Create = CreateUserInput;
    type Patch = UpdateUserInput;

    const COLLECTION: Collection = Collection::Users;

    fn id(&self) -> UserId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_create(
        id: UserId,
        input: CreateUserInput,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            name: required_text("name", &input.name)?,
            email: input.email,
            role: input.role,
            store_id: input.store_id,
            phone: input.phone,
            avatar: input.avatar,
            status: input.status,
            last_login: input.last_login,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply_patch(
        &mut self,
        patch: UpdateUserInput,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        if let Some(name) = patch.name {
            self.name = required_text("name", &name)?;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(store_id) = patch.store_id {
            self.store_id = store_id;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = avatar;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(last_login) = patch.last_login {
            self.last_login = last_login;
        }
        self.updated_at = now;
        Ok(())
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::new("email", self.email.as_str())]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_normalizes_email_and_drops_password() {
        let input: CreateUserInput = serde_json::from_value(json!({
            "name": "Editor User",
            "email": " Editor@Store.com ",
            "password": "hunter2"
        }))
        .unwrap();
        let user = User::from_create(UserId::new(4), input, Utc::now()).unwrap();

        assert_eq!(user.email.as_str(), "editor@store.com");
        assert_eq!(user.role, Role::Editor);
        assert_eq!(user.status, UserStatus::Active);

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "editor");
    }

    #[test]
    fn test_invalid_email_or_role_rejected() {
        assert!(
            serde_json::from_value::<CreateUserInput>(json!({"name": "A", "email": "nope"}))
                .is_err()
        );
        assert!(
            serde_json::from_value::<CreateUserInput>(json!({
                "name": "A",
                "email": "a@b.com",
                "role": "owner"
            }))
            .is_err()
        );
    }

    #[test]
    fn test_patch_moves_user_between_stores() {
        let input: CreateUserInput = serde_json::from_value(json!({
            "name": "John Store Admin",
            "email": "john@store.com",
            "role": "store_admin",
            "storeId": 1
        }))
        .unwrap();
        let mut user = User::from_create(UserId::new(2), input, Utc::now()).unwrap();

        let patch: UpdateUserInput = serde_json::from_value(json!({"storeId": 2})).unwrap();
        user.apply_patch(patch, Utc::now()).unwrap();
        assert_eq!(user.store_id, Some(StoreId::new(2)));

        let patch: UpdateUserInput = serde_json::from_value(json!({"storeId": null})).unwrap();
        user.apply_patch(patch, Utc::now()).unwrap();
        assert_eq!(user.store_id, None);
    }
}
