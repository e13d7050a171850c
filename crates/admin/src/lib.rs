//! Storedash Admin library.
//!
//! The REST API behind the multi-store admin dashboard, exposed as a library
//! so the binary, the CLI and the integration tests share one router.
//!
//! # Modules
//!
//! - [`config`] - Environment configuration
//! - [`db`] - `DocumentStore` seam with memory and `PostgreSQL` backends
//! - [`routes`] - Axum handlers and the application router
//! - [`services`] - Analytics and derived customers
//! - [`seed`] - Demo data

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;

pub use config::AdminConfig;
pub use error::AppError;
pub use routes::app;
pub use state::AppState;
