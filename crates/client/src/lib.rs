//! Storedash Client - typed access to the admin API.
//!
//! - [`ApiClient`] / [`EntityApi`] - reqwest wrappers for every endpoint
//! - [`ClientError`] - API failures with user-facing messages
//! - [`EntitySlice`] / [`SliceSync`] - optimistic list state per entity
//! - [`Session`] - the signed-in user and capability gates

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod error;
pub mod session;
pub mod slice;

pub use client::{ApiClient, EntityApi, ListQuery, Page};
pub use error::{ClientError, ClientResult};
pub use session::{Session, SessionError, SessionUser};
pub use slice::{EntitySlice, LoadStatus, SliceSync, Ticket};
