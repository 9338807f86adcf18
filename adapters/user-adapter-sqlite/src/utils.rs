//! Shared helpers: patch binding and error mapping

use roster_types::prelude::*;
use sqlx::sqlite::SqliteRow;

/// Applies a Patch field to an UPDATE query. Returns true if the field was added.
macro_rules! push_patch {
	($query:expr, $has_updates:expr, $field:literal, $patch:expr, |$v:ident| $convert:expr) => {{
		match $patch {
			Patch::Undefined => $has_updates,
			Patch::Null => {
				if $has_updates {
					$query.push(", ");
				}
				$query.push(concat!($field, "=NULL"));
				true
			}
			Patch::Value($v) => {
				if $has_updates {
					$query.push(", ");
				}
				$query.push(concat!($field, "=")).push_bind($convert);
				true
			}
		}
	}};
}

pub(crate) use push_patch;

/// Log database error for debugging
pub(crate) fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

pub(crate) fn db_err(err: sqlx::Error) -> Error {
	inspect(&err);
	Error::DbError
}

/// Maps a write error, turning unique index violations on `users` into `Duplicate`
pub(crate) fn write_err(err: sqlx::Error) -> Error {
	if let sqlx::Error::Database(db) = &err
		&& db.is_unique_violation()
	{
		if db.message().contains("email") {
			debug!("unique violation on email");
			return Error::Duplicate(UniqueField::Email);
		}
		if db.message().contains("username") {
			debug!("unique violation on username");
			return Error::Duplicate(UniqueField::Username);
		}
	}
	db_err(err)
}

/// Map a single-row query result, translating SQL errors to ClResult
pub(crate) fn map_res<T, F>(row: Result<SqliteRow, sqlx::Error>, f: F) -> ClResult<T>
where
	F: FnOnce(SqliteRow) -> Result<T, sqlx::Error>,
{
	match row {
		Ok(row) => f(row).inspect_err(inspect).map_err(|_| Error::DbError),
		Err(sqlx::Error::RowNotFound) => Err(Error::NotFound),
		Err(err) => Err(db_err(err)),
	}
}

/// Collect an iterator of query results, translating errors
pub(crate) fn collect_res<T>(
	iter: impl Iterator<Item = Result<T, sqlx::Error>> + Unpin,
) -> ClResult<Vec<T>> {
	let mut items = Vec::new();
	for item in iter {
		items.push(item.inspect_err(inspect).map_err(|_| Error::DbError)?);
	}
	Ok(items)
}

/// Decodes a JSON string list column
pub(crate) fn parse_json_list(s: &str) -> Result<Vec<Box<str>>, sqlx::Error> {
	serde_json::from_str(s).map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

pub(crate) fn json_list(list: &[Box<str>]) -> ClResult<String> {
	Ok(serde_json::to_string(list)?)
}

// vim: ts=4
