//! Storedash Core - Shared types library.
//!
//! This crate provides the types shared by all Storedash components:
//! - `admin` - REST API server backing the dashboard
//! - `client` - Typed HTTP client and optimistic entity cache
//! - `cli` - Command-line tools for migrations, seeding and reports
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. Entity defaults, validation and partial-update
//! merging live here so the server and the client agree on them.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, statuses, emails and slugs
//! - [`models`] - Entity records with their create/update inputs
//! - [`auth`] - Roles and capability flags
//! - [`query`] - Pagination and filter helpers
//! - [`reports`] - Analytics, revenue and customer response shapes
//! - [`format`] - Display formatting

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod format;
pub mod models;
pub mod query;
pub mod reports;
pub mod types;

pub use auth::{Capabilities, Capability, Role};
pub use models::{
    Attribute, Category, Collection, CreateAttributeInput, CreateCategoryInput,
    CreateInventoryInput, CreateOrderInput, CreateProductInput, CreateStoreInput,
    CreateUserInput, Entity, InventoryItem, Order, OrderItem, Product, ShippingAddress, Store,
    UniqueKey, UpdateAttributeInput, UpdateCategoryInput, UpdateInventoryInput,
    UpdateOrderInput, UpdateProductInput, UpdateStoreInput, UpdateUserInput, User,
    ValidationError,
};
pub use types::*;
