use axum::{
	Json,
	extract::{Path, Query, State, rejection::JsonRejection},
	http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::prelude::*;
use crate::service::UserService;
use crate::validate;
use roster_types::extract::{OptionalRequestId, TenantCtx};
use roster_types::types::ApiResponse;
use roster_types::user_adapter::{ListUserOptions, User, UserStatus};

/// Public representation of a user. The password hash is never included.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
	pub id: Box<str>,
	pub username: Option<Box<str>>,
	pub email: Option<Box<str>>,
	pub first_name: Option<Box<str>>,
	pub last_name: Option<Box<str>>,
	pub bio: Option<Box<str>>,
	pub timezone: Option<Box<str>>,
	pub facebook_url: Option<Box<str>>,
	pub twitter_url: Option<Box<str>>,
	pub image_id: Option<Box<str>>,
	pub roles: Vec<Box<str>>,
	pub status: UserStatus,
	pub organization_ids: Vec<Box<str>>,
	pub application_ids: Vec<Box<str>>,
	pub created_at: Timestamp,
	pub updated_at: Timestamp,
}

impl From<User> for UserView {
	fn from(user: User) -> Self {
		Self {
			id: user.id,
			username: user.username,
			email: user.email,
			first_name: user.first_name,
			last_name: user.last_name,
			bio: user.bio,
			timezone: user.timezone,
			facebook_url: user.facebook_url,
			twitter_url: user.twitter_url,
			image_id: user.image_id,
			roles: user.roles,
			status: user.status,
			organization_ids: user.organization_ids,
			application_ids: user.application_ids,
			created_at: user.created_at,
			updated_at: user.updated_at,
		}
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct ExistenceView {
	pub exists: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DestroyedView {
	pub id: Box<str>,
	pub status: UserStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
	pub status: Option<UserStatus>,
	pub limit: Option<u32>,
	pub offset: Option<u32>,
}

fn respond<T>(
	status: StatusCode,
	data: T,
	req_id: Option<String>,
) -> (StatusCode, Json<ApiResponse<T>>) {
	let mut response = ApiResponse::new(data);
	if let Some(id) = req_id {
		response = response.with_req_id(id);
	}
	(status, Json(response))
}

/// GET /api/{version}/users/{id}
pub async fn get_user(
	State(app): State<App>,
	Path(user_id): Path<String>,
	OptionalRequestId(req_id): OptionalRequestId,
) -> ClResult<(StatusCode, Json<ApiResponse<UserView>>)> {
	let user = UserService::from_app(&app).get_by_id(&user_id).await?;
	Ok(respond(StatusCode::OK, user.into(), req_id))
}

/// GET /api/{version}/users
pub async fn list_users(
	State(app): State<App>,
	Query(query): Query<ListUsersQuery>,
	OptionalRequestId(req_id): OptionalRequestId,
) -> ClResult<(StatusCode, Json<ApiResponse<Vec<UserView>>>)> {
	let opts = ListUserOptions { status: query.status, limit: query.limit, offset: query.offset };
	let users = UserService::from_app(&app).get_all(&opts).await?;
	Ok(respond(StatusCode::OK, users.into_iter().map(UserView::from).collect(), req_id))
}

/// GET /api/{version}/users/email/{email}
pub async fn get_user_by_email(
	State(app): State<App>,
	Path(email): Path<String>,
	OptionalRequestId(req_id): OptionalRequestId,
) -> ClResult<(StatusCode, Json<ApiResponse<UserView>>)> {
	let user = UserService::from_app(&app).get_by_email(&email).await?;
	Ok(respond(StatusCode::OK, user.into(), req_id))
}

/// GET /api/{version}/users/username/{username}
pub async fn get_user_by_username(
	State(app): State<App>,
	Path(username): Path<String>,
	OptionalRequestId(req_id): OptionalRequestId,
) -> ClResult<(StatusCode, Json<ApiResponse<UserView>>)> {
	let user = UserService::from_app(&app).get_by_username(&username).await?;
	Ok(respond(StatusCode::OK, user.into(), req_id))
}

/// GET /api/{version}/users/existence/{key}/{value}
pub async fn get_existence(
	State(app): State<App>,
	Path((key, value)): Path<(String, String)>,
	OptionalRequestId(req_id): OptionalRequestId,
) -> ClResult<(StatusCode, Json<ApiResponse<ExistenceView>>)> {
	let exists = UserService::from_app(&app).exists(&key, &value).await?;
	Ok(respond(StatusCode::OK, ExistenceView { exists }, req_id))
}

/// POST /api/{version}/users
pub async fn post_user(
	State(app): State<App>,
	tenant: TenantCtx,
	OptionalRequestId(req_id): OptionalRequestId,
	body: Result<Json<serde_json::Value>, JsonRejection>,
) -> ClResult<(StatusCode, Json<ApiResponse<UserView>>)> {
	let Json(body) = body?;
	let input = validate::parse_create(&body)?;
	let user = UserService::from_app(&app).create(input, &tenant).await?;
	Ok(respond(StatusCode::CREATED, user.into(), req_id))
}

/// PATCH /api/{version}/users/{id}
pub async fn patch_user(
	State(app): State<App>,
	Path(user_id): Path<String>,
	OptionalRequestId(req_id): OptionalRequestId,
	body: Result<Json<serde_json::Value>, JsonRejection>,
) -> ClResult<(StatusCode, Json<ApiResponse<UserView>>)> {
	let Json(body) = body?;
	let patch = validate::parse_patch(&body)?;
	let user = UserService::from_app(&app).update_by_id(&user_id, patch).await?;
	Ok(respond(StatusCode::OK, user.into(), req_id))
}

/// PATCH /api/{version}/users/{id}/profile
pub async fn patch_user_profile(
	State(app): State<App>,
	Path(user_id): Path<String>,
	OptionalRequestId(req_id): OptionalRequestId,
	body: Result<Json<serde_json::Value>, JsonRejection>,
) -> ClResult<(StatusCode, Json<ApiResponse<UserView>>)> {
	let Json(body) = body?;
	let profile = validate::parse_profile_patch(&body)?;
	let user = UserService::from_app(&app).update_profile(&user_id, profile).await?;
	Ok(respond(StatusCode::OK, user.into(), req_id))
}

/// DELETE /api/{version}/users/{id}
pub async fn delete_user(
	State(app): State<App>,
	Path(user_id): Path<String>,
	OptionalRequestId(req_id): OptionalRequestId,
) -> ClResult<(StatusCode, Json<ApiResponse<UserView>>)> {
	let user = UserService::from_app(&app).delete_by_id(&user_id).await?;
	Ok(respond(StatusCode::OK, user.into(), req_id))
}

/// DELETE /api/{version}/users/{id}/destroy
pub async fn destroy_user(
	State(app): State<App>,
	Path(user_id): Path<String>,
	OptionalRequestId(req_id): OptionalRequestId,
) -> ClResult<(StatusCode, Json<ApiResponse<DestroyedView>>)> {
	UserService::from_app(&app).destroy_by_id(&user_id).await?;
	info!(user_id = %user_id, "user destroyed");

	let view = DestroyedView { id: user_id.into(), status: UserStatus::Destroyed };
	Ok(respond(StatusCode::OK, view, req_id))
}

#[cfg(test)]
mod tests {
	use super::*;
	use roster_types::utils::random_id;

	#[test]
	fn test_user_view_hides_password_hash() {
		let user = User {
			id: random_id(),
			username: Some("testuser1".into()),
			email: Some("testuser1@mail.com".into()),
			password_hash: Some("$2b$10$secret".into()),
			first_name: None,
			last_name: None,
			bio: None,
			timezone: None,
			facebook_url: None,
			twitter_url: None,
			image_id: None,
			roles: Vec::new(),
			status: UserStatus::Active,
			organization_ids: vec!["org1".into()],
			application_ids: Vec::new(),
			created_at: Timestamp(1),
			updated_at: Timestamp(2),
		};

		let json = serde_json::to_value(UserView::from(user)).unwrap();
		assert!(json.get("passwordHash").is_none());
		assert!(!json.to_string().contains("secret"));
		assert_eq!(json["organizationIds"][0], "org1");
		assert_eq!(json["status"], "active");
		assert!(json.get("firstName").is_none());
	}
}

// vim: ts=4
