//! bcrypt password hasher. Hashing runs on the worker pool.

use async_trait::async_trait;
use std::sync::Arc;

use roster_types::hasher::PasswordHasher;
use roster_types::worker::WorkerPool;

use crate::prelude::*;

pub const BCRYPT_COST: u32 = 10;

#[derive(Debug)]
pub struct BcryptHasher {
	worker: Arc<WorkerPool>,
	cost: u32,
}

impl BcryptHasher {
	pub fn new(worker: Arc<WorkerPool>) -> Self {
		Self { worker, cost: BCRYPT_COST }
	}

	/// Overrides the work factor (bcrypt accepts 4..=31)
	pub fn with_cost(mut self, cost: u32) -> Self {
		self.cost = cost;
		self
	}
}

fn generate_password_hash_sync(password: &str, cost: u32) -> ClResult<Box<str>> {
	let hash = bcrypt::hash(password, cost)
		.map_err(|err| Error::Internal(format!("bcrypt: {}", err)))?;

	Ok(hash.into())
}

#[async_trait]
impl PasswordHasher for BcryptHasher {
	async fn hash_password(&self, password: Box<str>) -> ClResult<Box<str>> {
		let cost = self.cost;
		self.worker.run(move || generate_password_hash_sync(&password, cost)).await?
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_hash_password() {
		let hasher = BcryptHasher::new(Arc::new(WorkerPool::new(1))).with_cost(4);

		let hash = hasher.hash_password("foo88".into()).await.unwrap();
		assert_ne!(hash.as_ref(), "foo88");
		assert!(bcrypt::verify("foo88", &hash).unwrap());
		assert!(!bcrypt::verify("foo89", &hash).unwrap());
	}

	#[tokio::test]
	async fn test_invalid_cost_fails() {
		let hasher = BcryptHasher::new(Arc::new(WorkerPool::new(1))).with_cost(99);

		let res = hasher.hash_password("foo88".into()).await;
		assert!(matches!(res, Err(Error::Internal(_))));
	}
}

// vim: ts=4
