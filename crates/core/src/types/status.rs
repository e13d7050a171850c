//! Status enums for the dashboard entities.
//!
//! All of them travel as `snake_case` strings, both in JSON bodies and in
//! query-string filters (`?status=low_stock`).

use serde::{Deserialize, Serialize};

/// Defines a string-backed status enum with `as_str`, `Display` and `FromStr`.
///
/// The first listed variant is the default.
macro_rules! status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $(#[$default_meta:meta])*
            $default:ident => $default_str:literal,
            $( $(#[$variant_meta:meta])* $variant:ident => $variant_str:literal ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $(#[$default_meta])*
            #[default]
            $default,
            $( $(#[$variant_meta])* $variant, )*
        }

        impl $name {
            /// Every variant, default first.
            pub const ALL: &'static [Self] = &[Self::$default, $(Self::$variant),*];

            /// The wire representation.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    Self::$default => $default_str,
                    $( Self::$variant => $variant_str, )*
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| format!("invalid {}: {s}", stringify!($name)))
            }
        }
    };
}

status_enum! {
    /// Catalog visibility of a product.
    ProductStatus {
        Active => "active",
        Inactive => "inactive",
        Draft => "draft",
    }
}

status_enum! {
    /// Simple on/off status shared by categories and attributes.
    ActiveStatus {
        Active => "active",
        Inactive => "inactive",
    }
}

status_enum! {
    /// How an attribute's options are presented in the product editor.
    AttributeType {
        Text => "text",
        Color => "color",
        Size => "size",
        Number => "number",
        Select => "select",
    }
}

status_enum! {
    /// Order fulfillment status.
    OrderStatus {
        Pending => "pending",
        Processing => "processing",
        Shipped => "shipped",
        Delivered => "delivered",
        Cancelled => "cancelled",
    }
}

status_enum! {
    /// Order payment status.
    PaymentStatus {
        Pending => "pending",
        Paid => "paid",
        Failed => "failed",
        Refunded => "refunded",
    }
}

status_enum! {
    /// Store operating status.
    StoreStatus {
        Active => "active",
        Inactive => "inactive",
        Suspended => "suspended",
    }
}

status_enum! {
    /// Dashboard user account status.
    UserStatus {
        Active => "active",
        Inactive => "inactive",
        Suspended => "suspended",
    }
}

status_enum! {
    /// Stock level of an inventory record relative to its threshold.
    InventoryStatus {
        InStock => "in_stock",
        LowStock => "low_stock",
        OutOfStock => "out_of_stock",
    }
}

impl InventoryStatus {
    /// Derive the status from a stock level and its low-stock threshold.
    #[must_use]
    pub const fn from_stock(stock: i32, low_stock_threshold: i32) -> Self {
        if stock <= 0 {
            Self::OutOfStock
        } else if stock <= low_stock_threshold {
            Self::LowStock
        } else {
            Self::InStock
        }
    }
}
