//! Error type shared by every Roster crate.
//!
//! Each variant maps to a stable, client-visible error code. Internal details
//! (database messages, io errors) are logged but never put in the response body.

use axum::{Json, extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse};

use crate::types::ErrorResponse;

pub type ClResult<T> = std::result::Result<T, Error>;

/// Input fields that can be reported as missing or malformed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
	Username,
	Email,
	Password,
	Timezone,
	Bio,
	FacebookUrl,
	TwitterUrl,
	FirstName,
	LastName,
	ImageId,
	Roles,
	OrganizationId,
	ApplicationId,
	OrganizationIds,
	ApplicationIds,
	OrganizationRoles,
	ApplicationRoles,
}

impl Field {
	/// Key of the field in request payloads
	pub fn key(self) -> &'static str {
		match self {
			Field::Username => "username",
			Field::Email => "email",
			Field::Password => "password",
			Field::Timezone => "timezone",
			Field::Bio => "bio",
			Field::FacebookUrl => "facebookUrl",
			Field::TwitterUrl => "twitterUrl",
			Field::FirstName => "firstName",
			Field::LastName => "lastName",
			Field::ImageId => "imageId",
			Field::Roles => "roles",
			Field::OrganizationId => "organizationId",
			Field::ApplicationId => "applicationId",
			Field::OrganizationIds => "organizationIds",
			Field::ApplicationIds => "applicationIds",
			Field::OrganizationRoles => "organizationRoles",
			Field::ApplicationRoles => "applicationRoles",
		}
	}

	/// `INVALID_<FIELD>` error code
	pub fn invalid_code(self) -> &'static str {
		match self {
			Field::Username => "INVALID_USERNAME",
			Field::Email => "INVALID_EMAIL",
			Field::Password => "INVALID_PASSWORD",
			Field::Timezone => "INVALID_TIMEZONE",
			Field::Bio => "INVALID_BIO",
			Field::FacebookUrl => "INVALID_FACEBOOKURL",
			Field::TwitterUrl => "INVALID_TWITTERURL",
			Field::FirstName => "INVALID_FIRSTNAME",
			Field::LastName => "INVALID_LASTNAME",
			Field::ImageId => "INVALID_IMAGEID",
			Field::Roles => "INVALID_ROLES",
			Field::OrganizationId => "INVALID_ORGANIZATIONID",
			Field::ApplicationId => "INVALID_APPLICATIONID",
			Field::OrganizationIds => "INVALID_ORGANIZATIONIDS",
			Field::ApplicationIds => "INVALID_APPLICATIONIDS",
			Field::OrganizationRoles => "INVALID_ORGANIZATIONROLES",
			Field::ApplicationRoles => "INVALID_APPLICATIONROLES",
		}
	}
}

/// Fields that must be unique among active users
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UniqueField {
	Email,
	Username,
}

#[derive(Debug)]
pub enum Error {
	NotFound,
	DbError,
	/// A field is missing or has the wrong shape
	InvalidField(Field),
	/// Another active user already holds this email or username
	Duplicate(UniqueField),
	/// Existence check on a blacklisted or unknown key
	InvalidKey,
	/// Existence check without a value
	InvalidValue,
	ValidationError(String),
	ConfigError(String),
	Internal(String),

	// externals
	Io(std::io::Error),
}

impl Error {
	pub fn code(&self) -> &'static str {
		match self {
			Error::NotFound => "NOT_FOUND",
			Error::InvalidField(field) => field.invalid_code(),
			Error::Duplicate(UniqueField::Email) => "USER_DUPLICATE_EMAIL",
			Error::Duplicate(UniqueField::Username) => "USER_DUPLICATE_USERNAME",
			Error::InvalidKey => "INVALID_KEY",
			Error::InvalidValue => "INVALID_VALUE",
			Error::ValidationError(_) => "VALIDATION_ERROR",
			Error::DbError | Error::ConfigError(_) | Error::Internal(_) | Error::Io(_) => "UNKNOWN",
		}
	}

	pub fn status(&self) -> StatusCode {
		match self {
			Error::NotFound => StatusCode::NOT_FOUND,
			Error::InvalidField(_)
			| Error::Duplicate(_)
			| Error::InvalidKey
			| Error::InvalidValue
			| Error::ValidationError(_) => StatusCode::BAD_REQUEST,
			Error::DbError | Error::ConfigError(_) | Error::Internal(_) | Error::Io(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}

	fn public_message(&self) -> String {
		match self {
			Error::NotFound => "Resource not found".into(),
			Error::InvalidField(field) => format!("Missing or invalid field '{}'", field.key()),
			Error::Duplicate(UniqueField::Email) => "A user with this email already exists".into(),
			Error::Duplicate(UniqueField::Username) => {
				"A user with this username already exists".into()
			}
			Error::InvalidKey => "Invalid key".into(),
			Error::InvalidValue => "Invalid value".into(),
			Error::ValidationError(msg) => msg.clone(),
			Error::DbError | Error::ConfigError(_) | Error::Internal(_) | Error::Io(_) => {
				"Internal server error".into()
			}
		}
	}
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Self::Internal(format!("json: {}", err))
	}
}

impl From<JsonRejection> for Error {
	fn from(err: JsonRejection) -> Self {
		Self::ValidationError(err.body_text())
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
			Error::ConfigError(msg) => write!(f, "config error: {}", msg),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Io(err) => write!(f, "io error: {}", err),
			_ => f.write_str(self.code()),
		}
	}
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
	fn into_response(self) -> axum::response::Response {
		let status = self.status();
		if status.is_server_error() {
			tracing::error!(error = ?self, "request failed");
		} else {
			tracing::debug!(code = self.code(), "request rejected");
		}
		let body = ErrorResponse::new(self.code().to_string(), self.public_message());
		(status, Json(body)).into_response()
	}
}


// vim: ts=4
