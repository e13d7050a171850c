//! Business logic services for admin.
//!
//! # Services
//!
//! - `analytics` - Dashboard report and revenue series
//! - `customers` - Customers grouped from orders

pub mod analytics;
pub mod customers;
