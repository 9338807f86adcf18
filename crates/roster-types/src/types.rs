//! Common types used throughout Roster.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::time::SystemTime;

// Timestamp //
//***********//
/// Unix timestamp in seconds
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
	pub fn now() -> Timestamp {
		let res = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
		Timestamp(i64::try_from(res.as_secs()).unwrap_or(i64::MAX))
	}
}

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

// Patch //
//*******//
/// Tri-state value for partial updates.
///
/// `Undefined` leaves the stored value alone, `Null` clears it, `Value` replaces it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Patch<T> {
	#[default]
	Undefined,
	Null,
	Value(T),
}

impl<T> Patch<T> {
	pub fn is_undefined(&self) -> bool {
		matches!(self, Patch::Undefined)
	}

	pub fn value(&self) -> Option<&T> {
		match self {
			Patch::Value(v) => Some(v),
			Patch::Undefined | Patch::Null => None,
		}
	}

	pub fn as_ref(&self) -> Patch<&T> {
		match self {
			Patch::Undefined => Patch::Undefined,
			Patch::Null => Patch::Null,
			Patch::Value(v) => Patch::Value(v),
		}
	}

	pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Patch<U> {
		match self {
			Patch::Undefined => Patch::Undefined,
			Patch::Null => Patch::Null,
			Patch::Value(v) => Patch::Value(f(v)),
		}
	}
}

// ApiResponse //
//*************//
/// Envelope for successful responses
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
	pub data: T,
	pub time: Timestamp,
	pub req_id: Option<String>,
}

impl<T> ApiResponse<T> {
	pub fn new(data: T) -> Self {
		Self { data, time: Timestamp::now(), req_id: None }
	}

	pub fn with_req_id(mut self, req_id: impl Into<String>) -> Self {
		self.req_id = Some(req_id.into());
		self
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
	pub code: String,
	pub message: String,
}

/// Envelope for failed responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	pub error: ErrorDetails,
}

impl ErrorResponse {
	pub fn new(code: String, message: String) -> Self {
		Self { error: ErrorDetails { code, message } }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_patch_map_keeps_state() {
		let undefined: Patch<&str> = Patch::Undefined;
		assert!(undefined.map(str::len).is_undefined());
		assert_eq!(Patch::<&str>::Null.map(str::len), Patch::Null);
		assert_eq!(Patch::Value("abc").map(str::len), Patch::Value(3));
	}

	#[test]
	fn test_api_response_shape() {
		let res = ApiResponse::new(serde_json::json!({ "exists": true }));
		let json = serde_json::to_value(&res).unwrap();
		assert_eq!(json["data"]["exists"], true);
		assert!(json.get("reqId").is_none());
		assert!(json["time"].is_i64());
	}
}

// vim: ts=4
