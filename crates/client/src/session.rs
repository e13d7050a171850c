//! The logged-in dashboard user and the gates derived from their role.

use storedash_core::auth::{Capabilities, Capability, Role};
use storedash_core::{StoreId, User, UserId};

use crate::client::ListQuery;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("You do not have permission to perform this action")]
    Forbidden,
}

/// Who is signed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub store_id: Option<StoreId>,
}

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email.into_inner(),
            role: user.role,
            store_id: user.store_id,
        }
    }
}

/// A signed-in user with the capability table for their role.
#[derive(Debug, Clone)]
pub struct Session {
    user: SessionUser,
    capabilities: Capabilities,
    selected_store: Option<StoreId>,
}

impl Session {
    /// Start a session scoped to the user's home store.
    #[must_use]
    pub const fn new(user: SessionUser) -> Self {
        let capabilities = user.role.capabilities();
        let selected_store = user.store_id;
        Self {
            user,
            capabilities,
            selected_store,
        }
    }

    #[must_use]
    pub const fn user(&self) -> &SessionUser {
        &self.user
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.user.role
    }

    #[must_use]
    pub const fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    #[must_use]
    pub const fn can(&self, capability: Capability) -> bool {
        self.capabilities.allows(capability)
    }

    /// # Errors
    ///
    /// Returns `Forbidden` when the role lacks the capability.
    pub const fn require(&self, capability: Capability) -> Result<(), SessionError> {
        if self.can(capability) {
            Ok(())
        } else {
            Err(SessionError::Forbidden)
        }
    }

    /// # Errors
    ///
    /// Returns `Forbidden` when the role is not in `roles`.
    pub fn require_any(&self, roles: &[Role]) -> Result<(), SessionError> {
        if roles.contains(&self.user.role) {
            Ok(())
        } else {
            Err(SessionError::Forbidden)
        }
    }

    /// Change the active store, or clear it to see every store.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for roles tied to a single store.
    pub fn switch_store(&mut self, store_id: Option<StoreId>) -> Result<(), SessionError> {
        if !self.user.role.can_switch_store() {
            tracing::warn!(role = %self.user.role, "Store switch refused");
            return Err(SessionError::Forbidden);
        }
        self.selected_store = store_id;
        Ok(())
    }

    /// Store whose data the session may see; `None` means all stores.
    #[must_use]
    pub const fn visible_store(&self) -> Option<StoreId> {
        if self.capabilities.view_all_stores {
            self.selected_store
        } else {
            self.user.store_id
        }
    }

    /// Add the `storeId` filter for the visible store, if any.
    #[must_use]
    pub fn scope(&self, query: ListQuery) -> ListQuery {
        match self.visible_store() {
            Some(store_id) => query.filter("storeId", store_id),
            None => query,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn session(role: Role, store: Option<i32>) -> Session {
        Session::new(SessionUser {
            id: UserId::new(1),
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            role,
            store_id: store.map(StoreId::new),
        })
    }

    #[test]
    fn test_capability_gates() {
        let editor = session(Role::Editor, Some(1));
        assert!(editor.can(Capability::EditProducts));
        assert_eq!(
            editor.require(Capability::ViewAnalytics),
            Err(SessionError::Forbidden)
        );

        let admin = session(Role::Admin, None);
        assert!(admin.require(Capability::ViewAnalytics).is_ok());
        assert!(!admin.can(Capability::ManageUsers));
    }

    #[test]
    fn test_require_any() {
        let store_admin = session(Role::StoreAdmin, Some(2));
        assert!(
            store_admin
                .require_any(&[Role::SuperAdmin, Role::StoreAdmin])
                .is_ok()
        );
        let err = store_admin.require_any(&[Role::SuperAdmin]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "You do not have permission to perform this action"
        );
    }

    #[test]
    fn test_store_switching() {
        let mut admin = session(Role::SuperAdmin, None);
        assert_eq!(admin.visible_store(), None);
        admin.switch_store(Some(StoreId::new(3))).unwrap();
        assert_eq!(admin.visible_store(), Some(StoreId::new(3)));
        admin.switch_store(None).unwrap();
        assert_eq!(admin.visible_store(), None);

        let mut store_admin = session(Role::StoreAdmin, Some(2));
        assert_eq!(
            store_admin.switch_store(Some(StoreId::new(3))),
            Err(SessionError::Forbidden)
        );
        assert_eq!(store_admin.visible_store(), Some(StoreId::new(2)));
    }

    #[test]
    fn test_scope_adds_store_filter() {
        let editor = session(Role::Editor, Some(1));
        let query = editor.scope(ListQuery::new().page(1));
        assert_eq!(
            query.params(),
            &[
                ("page".to_string(), "1".to_string()),
                ("storeId".to_string(), "1".to_string()),
            ]
        );

        let admin = session(Role::Admin, None);
        assert!(admin.scope(ListQuery::new()).params().is_empty());
    }
}
