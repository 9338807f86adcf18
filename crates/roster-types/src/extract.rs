//! Custom Axum extractors for Roster-specific types.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::Error;

pub const ORGANIZATION_HEADER: &str = "organizationid";
pub const APPLICATION_HEADER: &str = "applicationid";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// TenantCtx //
//***********//
/// Tenant scope of a request, taken from the `organizationid` and `applicationid` headers.
///
/// Both headers are optional. An empty header counts as missing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TenantCtx {
	pub organization_id: Option<Box<str>>,
	pub application_id: Option<Box<str>>,
}

fn header_value(parts: &Parts, name: &str) -> Result<Option<Box<str>>, Error> {
	let Some(value) = parts.headers.get(name) else {
		return Ok(None);
	};
	let value = value
		.to_str()
		.map_err(|_| Error::ValidationError(format!("Invalid '{}' header", name)))?
		.trim();
	Ok((!value.is_empty()).then(|| Box::from(value)))
}

impl<S> FromRequestParts<S> for TenantCtx
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		Ok(TenantCtx {
			organization_id: header_value(parts, ORGANIZATION_HEADER)?,
			application_id: header_value(parts, APPLICATION_HEADER)?,
		})
	}
}

// RequestId //
//***********//
/// Request ID for tracing and debugging, echoed back as `reqId` when the client sends one
#[derive(Clone, Debug)]
pub struct OptionalRequestId(pub Option<String>);

impl<S> FromRequestParts<S> for OptionalRequestId
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		let req_id = header_value(parts, REQUEST_ID_HEADER)?.map(String::from);
		Ok(OptionalRequestId(req_id))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::http::Request;

	#[tokio::test]
	async fn test_tenant_ctx_from_headers() {
		let req = Request::builder()
			.header(ORGANIZATION_HEADER, "org1")
			.header(APPLICATION_HEADER, "  ")
			.body(())
			.unwrap();
		let (mut parts, ()) = req.into_parts();

		let ctx = TenantCtx::from_request_parts(&mut parts, &()).await.unwrap();
		assert_eq!(ctx.organization_id.as_deref(), Some("org1"));
		assert!(ctx.application_id.is_none());
	}

	#[tokio::test]
	async fn test_optional_request_id() {
		let req = Request::builder().header(REQUEST_ID_HEADER, "abc-1").body(()).unwrap();
		let (mut parts, ()) = req.into_parts();

		let OptionalRequestId(req_id) =
			OptionalRequestId::from_request_parts(&mut parts, &()).await.unwrap();
		assert_eq!(req_id.as_deref(), Some("abc-1"));
	}
}

// vim: ts=4
