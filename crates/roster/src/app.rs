//! App builder - constructs and runs the Roster application

use std::sync::Arc;

use crate::hasher::PasswordHasher;
use crate::link_adapter::LinkAdapter;
use crate::prelude::*;
use crate::routes;
use crate::user_adapter::UserAdapter;
use crate::worker::WorkerPool;
pub use roster_core::app::{Adapters, App, AppOpts, AppState, VERSION};
use roster_core::hasher::{BCRYPT_COST, BcryptHasher};
use roster_core::RegistrationMode;

pub struct AppBuilder {
	opts: AppOpts,
	worker: Option<Arc<WorkerPool>>,
	hasher: Option<Arc<dyn PasswordHasher>>,
	adapters: Adapters,
}

impl AppBuilder {
	pub fn new() -> Self {
		// A subscriber may already be installed (tests, embedding applications)
		let _ignore = tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.with_target(false)
			.try_init();
		AppBuilder {
			opts: AppOpts {
				listen: "127.0.0.1:8080".into(),
				api_version: "v1".into(),
				registration_mode: RegistrationMode::Strict,
				worker_threads: 2,
				bcrypt_cost: BCRYPT_COST,
			},
			worker: None,
			hasher: None,
			adapters: Adapters { user_adapter: None, link_adapter: None },
		}
	}

	// Opts
	pub fn listen(&mut self, listen: impl Into<Box<str>>) -> &mut Self {
		self.opts.listen = listen.into();
		self
	}
	pub fn api_version(&mut self, api_version: impl Into<Box<str>>) -> &mut Self {
		self.opts.api_version = api_version.into();
		self
	}
	pub fn registration_mode(&mut self, mode: RegistrationMode) -> &mut Self {
		self.opts.registration_mode = mode;
		self
	}
	pub fn worker_threads(&mut self, threads: usize) -> &mut Self {
		self.opts.worker_threads = threads;
		self
	}
	pub fn bcrypt_cost(&mut self, cost: u32) -> &mut Self {
		self.opts.bcrypt_cost = cost;
		self
	}
	pub fn worker(&mut self, worker: Arc<WorkerPool>) -> &mut Self {
		self.worker = Some(worker);
		self
	}
	pub fn hasher(&mut self, hasher: Arc<dyn PasswordHasher>) -> &mut Self {
		self.hasher = Some(hasher);
		self
	}

	// Adapters
	pub fn user_adapter(&mut self, user_adapter: Arc<dyn UserAdapter>) -> &mut Self {
		self.adapters.user_adapter = Some(user_adapter);
		self
	}
	pub fn link_adapter(&mut self, link_adapter: Arc<dyn LinkAdapter>) -> &mut Self {
		self.adapters.link_adapter = Some(link_adapter);
		self
	}

	/// Creates the shared application state
	pub fn build(self) -> ClResult<App> {
		let Some(user_adapter) = self.adapters.user_adapter else {
			error!("FATAL: No user adapter configured");
			return Err(Error::ConfigError("No user adapter configured".into()));
		};
		let Some(link_adapter) = self.adapters.link_adapter else {
			error!("FATAL: No link adapter configured");
			return Err(Error::ConfigError("No link adapter configured".into()));
		};

		let hasher = match self.hasher {
			Some(hasher) => hasher,
			None => {
				let worker = self
					.worker
					.unwrap_or_else(|| Arc::new(WorkerPool::new(self.opts.worker_threads)));
				Arc::new(BcryptHasher::new(worker).with_cost(self.opts.bcrypt_cost))
			}
		};

		Ok(Arc::new(AppState { opts: self.opts, user_adapter, link_adapter, hasher }))
	}

	pub async fn run(self) -> ClResult<()> {
		info!("Roster V{}", VERSION);

		let app = self.build()?;
		info!(
			"registration mode: {}, api version: {}",
			app.opts.registration_mode, app.opts.api_version
		);

		let router = routes::init(app.clone());
		let listener = tokio::net::TcpListener::bind(app.opts.listen.as_ref()).await?;
		info!("Listening on HTTP {}", app.opts.listen);

		axum::serve(listener, router).await?;

		Ok(())
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

// vim: ts=4
