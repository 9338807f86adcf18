//! Roster is a users and membership service.
//!
//! # Features
//!
//! - User records with case-insensitive unique email and username
//! - bcrypt password hashing off the async executor
//! - Organization and application memberships with per-link roles
//! - Strict or loose registration

// Re-export shared types and adapter traits from roster-types
pub use roster_types::error;
pub use roster_types::hasher;
pub use roster_types::link_adapter;
pub use roster_types::types;
pub use roster_types::user_adapter;
pub use roster_types::worker;

pub use roster_core::RegistrationMode;

// Feature crate re-exports
pub use roster_users as users;

pub mod app;
pub mod prelude;
pub mod routes;

pub use crate::app::{App, AppBuilder};

// vim: ts=4
