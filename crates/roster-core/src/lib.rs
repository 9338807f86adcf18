//! Core infrastructure for Roster.
//!
//! Holds the shared application state handed to every handler, the process
//! configuration values, and the bcrypt-backed password hasher.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod config;
pub mod hasher;
pub mod prelude;

pub use app::{Adapters, App, AppOpts, AppState};
pub use config::RegistrationMode;

// vim: ts=4
