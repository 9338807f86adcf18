//! Shared types, adapter traits, and core utilities for the Roster users service.
//!
//! Storage adapters and the feature crates only meet here: adapters implement the
//! traits in [`user_adapter`] and [`link_adapter`], feature crates consume them.

pub mod error;
pub mod extract;
pub mod hasher;
pub mod link_adapter;
pub mod prelude;
pub mod types;
pub mod user_adapter;
pub mod utils;
pub mod worker;

// vim: ts=4
