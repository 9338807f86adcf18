//! Membership links. One table per relation, keyed by (owner_id, user_id).

use sqlx::{Row, SqliteConnection, sqlite::SqliteRow};

use roster_types::link_adapter::{Link, LinkPlan, Relation};
use roster_types::prelude::*;

use crate::utils::{collect_res, db_err, json_list, parse_json_list};

fn table(relation: Relation) -> &'static str {
	match relation {
		Relation::Organization => "link_organizations_users",
		Relation::Application => "link_applications_users",
	}
}

fn link_from_row(row: &SqliteRow) -> Result<Link, sqlx::Error> {
	Ok(Link {
		owner_id: row.try_get("owner_id")?,
		member_id: row.try_get("user_id")?,
		roles: parse_json_list(row.try_get("roles")?)?,
	})
}

pub(crate) async fn list_by_member(
	conn: &mut SqliteConnection,
	relation: Relation,
	member_id: &str,
) -> ClResult<Vec<Link>> {
	let rows = sqlx::query(&format!(
		"SELECT owner_id, user_id, roles FROM {} WHERE user_id = ? ORDER BY rowid",
		table(relation)
	))
	.bind(member_id)
	.fetch_all(&mut *conn)
	.await
	.map_err(db_err)?;

	collect_res(rows.iter().map(link_from_row))
}

/// Inserts a link. An existing link for the same pair gets the new roles.
pub(crate) async fn add(
	conn: &mut SqliteConnection,
	relation: Relation,
	owner_id: &str,
	member_id: &str,
	roles: &[Box<str>],
) -> ClResult<()> {
	sqlx::query(&format!(
		"INSERT INTO {} (owner_id, user_id, roles) VALUES (?, ?, ?)
		ON CONFLICT(owner_id, user_id) DO UPDATE SET roles=excluded.roles",
		table(relation)
	))
	.bind(owner_id)
	.bind(member_id)
	.bind(json_list(roles)?)
	.execute(&mut *conn)
	.await
	.map_err(db_err)?;

	Ok(())
}

pub(crate) async fn remove(
	conn: &mut SqliteConnection,
	relation: Relation,
	owner_id: &str,
	member_id: &str,
) -> ClResult<()> {
	sqlx::query(&format!("DELETE FROM {} WHERE owner_id = ? AND user_id = ?", table(relation)))
		.bind(owner_id)
		.bind(member_id)
		.execute(&mut *conn)
		.await
		.map_err(db_err)?;

	Ok(())
}

pub(crate) async fn update(
	conn: &mut SqliteConnection,
	relation: Relation,
	owner_id: &str,
	member_id: &str,
	roles: &[Box<str>],
) -> ClResult<()> {
	let res = sqlx::query(&format!(
		"UPDATE {} SET roles = ? WHERE owner_id = ? AND user_id = ?",
		table(relation)
	))
	.bind(json_list(roles)?)
	.bind(owner_id)
	.bind(member_id)
	.execute(&mut *conn)
	.await
	.map_err(db_err)?;

	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}

	Ok(())
}

/// Applies every mutation of a plan on one connection, in remove, add, update order
pub(crate) async fn apply(
	conn: &mut SqliteConnection,
	relation: Relation,
	member_id: &str,
	plan: &LinkPlan,
) -> ClResult<()> {
	for owner_id in &plan.remove {
		remove(conn, relation, owner_id, member_id).await?;
	}
	for (owner_id, roles) in &plan.add {
		add(conn, relation, owner_id, member_id, roles).await?;
	}
	for (owner_id, roles) in &plan.update {
		update(conn, relation, owner_id, member_id, roles).await?;
	}

	Ok(())
}

// vim: ts=4
