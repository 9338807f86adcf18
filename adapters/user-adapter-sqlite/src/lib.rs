//! SQLite storage for Roster users and their membership links.
//!
//! Email and username uniqueness among active users is enforced by partial
//! unique indexes; violations surface as `Error::Duplicate`. Link plans are
//! applied inside one transaction.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use std::path::Path;

use roster_types::link_adapter::{Link, LinkAdapter, LinkPlan, Relation};
use roster_types::prelude::*;
use roster_types::user_adapter::{
	CreateUserData, ListUserOptions, UpdateUserData, User, UserAdapter, UserField,
};

mod link;
mod schema;
mod user;
mod utils;

use crate::utils::{db_err, inspect};

pub const DB_FILE: &str = "users.db";

#[derive(Debug)]
pub struct UserAdapterSqlite {
	db: SqlitePool,
}

impl UserAdapterSqlite {
	/// Opens (or creates) the database in the `dir` directory
	pub async fn new(dir: impl AsRef<Path>) -> ClResult<Self> {
		tokio::fs::create_dir_all(dir.as_ref()).await?;

		let opts = sqlite::SqliteConnectOptions::new()
			.filename(dir.as_ref().join(DB_FILE))
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(inspect)
			.map_err(|_| Error::DbError)?;

		schema::init_db(&db).await.inspect_err(inspect).map_err(|_| Error::DbError)?;
		info!("user database opened: {}", dir.as_ref().join(DB_FILE).display());

		Ok(Self { db })
	}
}

#[async_trait]
impl UserAdapter for UserAdapterSqlite {
	async fn create_user(&self, data: &CreateUserData) -> ClResult<()> {
		user::create(&self.db, data).await
	}

	async fn read_user(&self, user_id: &str) -> ClResult<User> {
		user::read(&self.db, user_id).await
	}

	async fn find_user(&self, field: UserField, value: &str) -> ClResult<Option<User>> {
		user::find(&self.db, field, value).await
	}

	async fn list_users(&self, opts: &ListUserOptions) -> ClResult<Vec<User>> {
		user::list(&self.db, opts).await
	}

	async fn update_user(&self, user_id: &str, data: &UpdateUserData) -> ClResult<()> {
		user::update(&self.db, user_id, data).await
	}
}

#[async_trait]
impl LinkAdapter for UserAdapterSqlite {
	async fn list_member_links(&self, relation: Relation, member_id: &str) -> ClResult<Vec<Link>> {
		let mut conn = self.db.acquire().await.map_err(db_err)?;
		link::list_by_member(&mut conn, relation, member_id).await
	}

	async fn add_link(
		&self,
		relation: Relation,
		owner_id: &str,
		member_id: &str,
		roles: &[Box<str>],
	) -> ClResult<()> {
		let mut conn = self.db.acquire().await.map_err(db_err)?;
		link::add(&mut conn, relation, owner_id, member_id, roles).await
	}

	async fn remove_link(&self, relation: Relation, owner_id: &str, member_id: &str) -> ClResult<()> {
		let mut conn = self.db.acquire().await.map_err(db_err)?;
		link::remove(&mut conn, relation, owner_id, member_id).await
	}

	async fn update_link(
		&self,
		relation: Relation,
		owner_id: &str,
		member_id: &str,
		roles: &[Box<str>],
	) -> ClResult<()> {
		let mut conn = self.db.acquire().await.map_err(db_err)?;
		link::update(&mut conn, relation, owner_id, member_id, roles).await
	}

	/// Runs the whole plan in one transaction; a failing mutation rolls back the others
	async fn apply_plan(&self, relation: Relation, member_id: &str, plan: &LinkPlan) -> ClResult<()> {
		let mut tx = self.db.begin().await.map_err(db_err)?;
		link::apply(&mut tx, relation, member_id, plan).await?;
		tx.commit().await.map_err(db_err)?;
		Ok(())
	}
}

// vim: ts=4
