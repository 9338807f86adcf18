//! App state type

use std::sync::Arc;

use crate::config::RegistrationMode;

use roster_types::hasher::PasswordHasher;
use roster_types::link_adapter::LinkAdapter;
use roster_types::user_adapter::UserAdapter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct AppState {
	pub opts: AppOpts,

	pub user_adapter: Arc<dyn UserAdapter>,
	pub link_adapter: Arc<dyn LinkAdapter>,
	pub hasher: Arc<dyn PasswordHasher>,
}

pub type App = Arc<AppState>;

pub struct Adapters {
	pub user_adapter: Option<Arc<dyn UserAdapter>>,
	pub link_adapter: Option<Arc<dyn LinkAdapter>>,
}

#[derive(Debug, Clone)]
pub struct AppOpts {
	pub listen: Box<str>,
	/// Routes are mounted at `/api/{api_version}`
	pub api_version: Box<str>,
	pub registration_mode: RegistrationMode,
	pub worker_threads: usize,
	pub bcrypt_cost: u32,
}

// vim: ts=4
