//! Users resource.
//!
//! CRUD on user records plus the reconciliation of their organization and
//! application memberships.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod handler;
mod prelude;
pub mod reconcile;
pub mod service;
pub mod validate;

#[cfg(test)]
mod mock;

pub use service::UserService;

// vim: ts=4
