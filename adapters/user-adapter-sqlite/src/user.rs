//! User records

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use roster_types::prelude::*;
use roster_types::user_adapter::{
	CreateUserData, ListUserOptions, UpdateUserData, User, UserField, UserStatus,
};

use crate::utils::{collect_res, db_err, json_list, map_res, parse_json_list, push_patch, write_err};

const USER_COLUMNS: &str = "user_id, username, email, password_hash, first_name, last_name, bio,
	timezone, facebook_url, twitter_url, image_id, roles, status, organization_ids,
	application_ids, created_at, updated_at";

fn user_from_row(row: &SqliteRow) -> Result<User, sqlx::Error> {
	let status: &str = row.try_get("status")?;
	let status = UserStatus::parse(status)
		.ok_or_else(|| sqlx::Error::Decode(format!("invalid user status '{}'", status).into()))?;

	Ok(User {
		id: row.try_get("user_id")?,
		username: row.try_get("username")?,
		email: row.try_get("email")?,
		password_hash: row.try_get("password_hash")?,
		first_name: row.try_get("first_name")?,
		last_name: row.try_get("last_name")?,
		bio: row.try_get("bio")?,
		timezone: row.try_get("timezone")?,
		facebook_url: row.try_get("facebook_url")?,
		twitter_url: row.try_get("twitter_url")?,
		image_id: row.try_get("image_id")?,
		roles: parse_json_list(row.try_get("roles")?)?,
		status,
		organization_ids: parse_json_list(row.try_get("organization_ids")?)?,
		application_ids: parse_json_list(row.try_get("application_ids")?)?,
		created_at: Timestamp(row.try_get("created_at")?),
		updated_at: Timestamp(row.try_get("updated_at")?),
	})
}

/// Serializes a list patch. Clearing a list stores an empty array.
fn list_patch(patch: &Patch<Vec<Box<str>>>) -> ClResult<Patch<String>> {
	Ok(match patch {
		Patch::Undefined => Patch::Undefined,
		Patch::Null => Patch::Value("[]".into()),
		Patch::Value(list) => Patch::Value(json_list(list)?),
	})
}

pub(crate) async fn create(db: &SqlitePool, user: &CreateUserData) -> ClResult<()> {
	let roles = json_list(&user.roles)?;

	sqlx::query(
		"INSERT INTO users (user_id, username, email, password_hash, first_name, last_name, bio,
			timezone, facebook_url, twitter_url, image_id, roles, status)
		VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'active')",
	)
	.bind(&*user.id)
	.bind(user.username.as_deref())
	.bind(user.email.as_deref())
	.bind(user.password_hash.as_deref())
	.bind(user.first_name.as_deref())
	.bind(user.last_name.as_deref())
	.bind(user.bio.as_deref())
	.bind(user.timezone.as_deref())
	.bind(user.facebook_url.as_deref())
	.bind(user.twitter_url.as_deref())
	.bind(user.image_id.as_deref())
	.bind(roles)
	.execute(db)
	.await
	.map_err(write_err)?;

	Ok(())
}

pub(crate) async fn read(db: &SqlitePool, user_id: &str) -> ClResult<User> {
	let res = sqlx::query(&format!(
		"SELECT {USER_COLUMNS} FROM users WHERE user_id = ? AND status != 'destroyed'"
	))
	.bind(user_id)
	.fetch_one(db)
	.await;

	map_res(res, |row| user_from_row(&row))
}

pub(crate) async fn find(db: &SqlitePool, field: UserField, value: &str) -> ClResult<Option<User>> {
	let mut query = sqlx::QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users "));
	query
		.push("WHERE status = 'active' AND lower(")
		.push(field.column())
		.push(") = lower(")
		.push_bind(value)
		.push(") ORDER BY rowid LIMIT 1");

	let row = query.build().fetch_optional(db).await.map_err(db_err)?;
	row.map(|row| map_res(Ok(row), |row| user_from_row(&row))).transpose()
}

pub(crate) async fn list(db: &SqlitePool, opts: &ListUserOptions) -> ClResult<Vec<User>> {
	let status = opts.status.unwrap_or(UserStatus::Active);

	let mut query = sqlx::QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users WHERE status = "));
	query.push_bind(status.as_str()).push(" AND status != 'destroyed' ORDER BY rowid");
	// SQLite needs a LIMIT before OFFSET; -1 means unlimited
	query.push(" LIMIT ").push_bind(opts.limit.map_or(-1, i64::from));
	if let Some(offset) = opts.offset {
		query.push(" OFFSET ").push_bind(i64::from(offset));
	}

	let rows = query.build().fetch_all(db).await.map_err(db_err)?;
	collect_res(rows.iter().map(user_from_row))
}

pub(crate) async fn update(db: &SqlitePool, user_id: &str, data: &UpdateUserData) -> ClResult<()> {
	let roles = list_patch(&data.roles)?;
	let organization_ids = list_patch(&data.organization_ids)?;
	let application_ids = list_patch(&data.application_ids)?;

	let mut query = sqlx::QueryBuilder::new("UPDATE users SET ");
	let mut has_updates = false;

	has_updates = push_patch!(query, has_updates, "username", &data.username, |v| &**v);
	has_updates = push_patch!(query, has_updates, "email", &data.email, |v| &**v);
	has_updates = push_patch!(query, has_updates, "password_hash", &data.password_hash, |v| &**v);
	has_updates = push_patch!(query, has_updates, "first_name", &data.first_name, |v| &**v);
	has_updates = push_patch!(query, has_updates, "last_name", &data.last_name, |v| &**v);
	has_updates = push_patch!(query, has_updates, "bio", &data.bio, |v| &**v);
	has_updates = push_patch!(query, has_updates, "timezone", &data.timezone, |v| &**v);
	has_updates = push_patch!(query, has_updates, "facebook_url", &data.facebook_url, |v| &**v);
	has_updates = push_patch!(query, has_updates, "twitter_url", &data.twitter_url, |v| &**v);
	has_updates = push_patch!(query, has_updates, "image_id", &data.image_id, |v| &**v);
	has_updates = push_patch!(query, has_updates, "roles", &roles, |v| v.as_str());
	has_updates = push_patch!(query, has_updates, "status", &data.status, |v| v.as_str());
	has_updates =
		push_patch!(query, has_updates, "organization_ids", &organization_ids, |v| v.as_str());
	has_updates =
		push_patch!(query, has_updates, "application_ids", &application_ids, |v| v.as_str());

	if has_updates {
		query.push(", ");
	}
	query.push("updated_at=unixepoch()");
	query.push(" WHERE user_id=").push_bind(user_id).push(" AND status != 'destroyed'");

	let res = query.build().execute(db).await.map_err(write_err)?;

	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}

	Ok(())
}

// vim: ts=4
