//! Database schema initialization

use sqlx::SqlitePool;

/// Initialize the database schema with all required tables and indexes
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	// Users
	//*******
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS users (
		user_id text NOT NULL,
		username text,
		email text,
		password_hash text,
		first_name text,
		last_name text,
		bio text,
		timezone text,
		facebook_url text,
		twitter_url text,
		image_id text,
		roles json NOT NULL DEFAULT '[]',
		status text NOT NULL DEFAULT 'active',
		organization_ids json NOT NULL DEFAULT '[]',
		application_ids json NOT NULL DEFAULT '[]',
		created_at integer NOT NULL DEFAULT (unixepoch()),
		updated_at integer NOT NULL DEFAULT (unixepoch()),
		PRIMARY KEY(user_id)
	)",
	)
	.execute(&mut *tx)
	.await?;

	// Email and username are unique among active users only
	sqlx::query(
		"CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email
		ON users(lower(email)) WHERE status='active' AND email IS NOT NULL",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE UNIQUE INDEX IF NOT EXISTS idx_users_username
		ON users(lower(username)) WHERE status='active' AND username IS NOT NULL",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_status ON users(status)")
		.execute(&mut *tx)
		.await?;

	// Membership links
	//******************
	for table in ["link_organizations_users", "link_applications_users"] {
		sqlx::query(&format!(
			"CREATE TABLE IF NOT EXISTS {table} (
			owner_id text NOT NULL,
			user_id text NOT NULL,
			roles json NOT NULL DEFAULT '[]',
			created_at integer NOT NULL DEFAULT (unixepoch()),
			PRIMARY KEY(owner_id, user_id)
		)"
		))
		.execute(&mut *tx)
		.await?;
		sqlx::query(&format!("CREATE INDEX IF NOT EXISTS idx_{table}_user ON {table}(user_id)"))
			.execute(&mut *tx)
			.await?;
	}

	tx.commit().await?;

	Ok(())
}

// vim: ts=4
