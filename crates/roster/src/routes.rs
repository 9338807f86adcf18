use axum::{
	Router,
	routing::{delete, get, patch},
};
use tower_http::trace::TraceLayer;

use crate::prelude::*;
use roster_users::handler;

fn init_users() -> Router<App> {
	Router::new()
		.route("/", get(handler::list_users).post(handler::post_user))
		.route("/email/{email}", get(handler::get_user_by_email))
		.route("/username/{username}", get(handler::get_user_by_username))
		.route("/existence/{key}/{value}", get(handler::get_existence))
		.route(
			"/{id}",
			get(handler::get_user).patch(handler::patch_user).delete(handler::delete_user),
		)
		.route("/{id}/profile", patch(handler::patch_user_profile))
		.route("/{id}/destroy", delete(handler::destroy_user))
}

/// Builds the API router, mounted at `/api/{api_version}/users`
pub fn init(app: App) -> Router {
	let prefix = format!("/api/{}/users", app.opts.api_version);
	debug!("mounting users routes at {}", prefix);

	Router::new()
		.nest(&prefix, init_users())
		.layer(TraceLayer::new_for_http())
		.with_state(app)
}

// vim: ts=4
