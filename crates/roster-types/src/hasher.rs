//! Password hashing service interface.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::prelude::*;

#[async_trait]
pub trait PasswordHasher: Debug + Send + Sync {
	/// Hashes a plaintext password. The plaintext is consumed.
	async fn hash_password(&self, password: Box<str>) -> ClResult<Box<str>>;
}

// vim: ts=4
