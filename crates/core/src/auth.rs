//! Dashboard roles and the capability table derived from them.
//!
//! The server does not enforce capabilities; the client session uses this
//! table to decide which screens and actions to offer.

use serde::{Deserialize, Serialize};

/// Dashboard user role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Everything, including managing other super admins.
    SuperAdmin,
    /// Read across all stores and edit the catalog.
    Admin,
    /// Runs a single store: its orders, customers, users and settings.
    StoreAdmin,
    /// Catalog editing only.
    #[default]
    Editor,
}

impl Role {
    pub const ALL: [Self; 4] = [Self::SuperAdmin, Self::Admin, Self::StoreAdmin, Self::Editor];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
            Self::StoreAdmin => "store_admin",
            Self::Editor => "editor",
        }
    }

    /// Parse a role, treating anything unrecognized as [`Role::Editor`].
    #[must_use]
    pub fn parse_or_editor(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    /// Default capabilities for the role.
    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        match self {
            Self::SuperAdmin => Capabilities {
                view_all_stores: true,
                manage_stores: true,
                view_all_orders: true,
                view_all_customers: true,
                manage_users: true,
                manage_super_admins: true,
                view_analytics: true,
                edit_products: true,
                edit_settings: true,
            },
            Self::Admin => Capabilities {
                view_all_stores: true,
                view_all_orders: true,
                view_all_customers: true,
                view_analytics: true,
                edit_products: true,
                ..Capabilities::NONE
            },
            Self::StoreAdmin => Capabilities {
                view_all_orders: true,
                view_all_customers: true,
                manage_users: true,
                view_analytics: true,
                edit_products: true,
                edit_settings: true,
                ..Capabilities::NONE
            },
            Self::Editor => Capabilities {
                edit_products: true,
                ..Capabilities::NONE
            },
        }
    }

    /// Whether the role may change the active store selection.
    #[must_use]
    pub const fn can_switch_store(&self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            "store_admin" => Ok(Self::StoreAdmin),
            "editor" => Ok(Self::Editor),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

/// A single permission flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    ViewAllStores,
    ManageStores,
    ViewAllOrders,
    ViewAllCustomers,
    ManageUsers,
    ManageSuperAdmins,
    ViewAnalytics,
    EditProducts,
    EditSettings,
}

/// The full set of permission flags for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct Capabilities {
    pub view_all_stores: bool,
    pub manage_stores: bool,
    pub view_all_orders: bool,
    pub view_all_customers: bool,
    pub manage_users: bool,
    pub manage_super_admins: bool,
    pub view_analytics: bool,
    pub edit_products: bool,
    pub edit_settings: bool,
}

impl Capabilities {
    /// Every flag off.
    pub const NONE: Self = Self {
        view_all_stores: false,
        manage_stores: false,
        view_all_orders: false,
        view_all_customers: false,
        manage_users: false,
        manage_super_admins: false,
        view_analytics: false,
        edit_products: false,
        edit_settings: false,
    };

    #[must_use]
    pub const fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::ViewAllStores => self.view_all_stores,
            Capability::ManageStores => self.manage_stores,
            Capability::ViewAllOrders => self.view_all_orders,
            Capability::ViewAllCustomers => self.view_all_customers,
            Capability::ManageUsers => self.manage_users,
            Capability::ManageSuperAdmins => self.manage_super_admins,
            Capability::ViewAnalytics => self.view_analytics,
            Capability::EditProducts => self.edit_products,
            Capability::EditSettings => self.edit_settings,
        }
    }
}
