use std::{env, path, process, sync::Arc};

use roster::{AppBuilder, RegistrationMode};
use roster_user_adapter_sqlite::UserAdapterSqlite;
use tracing::error;

pub struct Config {
	pub listen: String,
	pub db_dir: path::PathBuf,
	pub api_version: String,
	pub registration_mode: RegistrationMode,
	pub worker_threads: usize,
}

impl Config {
	fn from_env() -> Result<Self, String> {
		let registration_mode = match env::var("USER_REGISTRATION") {
			Ok(mode) => mode.parse().map_err(|err: roster::error::Error| err.to_string())?,
			Err(_) => RegistrationMode::Strict,
		};
		let worker_threads = match env::var("WORKER_THREADS") {
			Ok(threads) => {
				threads.parse().map_err(|_| format!("invalid WORKER_THREADS: '{}'", threads))?
			}
			Err(_) => 2,
		};

		Ok(Config {
			listen: env::var("LISTEN").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
			db_dir: path::PathBuf::from(env::var("DB_DIR").unwrap_or_else(|_| "./data".to_string())),
			api_version: env::var("API_VERSION").unwrap_or_else(|_| "v1".to_string()),
			registration_mode,
			worker_threads,
		})
	}
}

#[tokio::main]
async fn main() {
	let mut builder = AppBuilder::new();

	let config = match Config::from_env() {
		Ok(config) => config,
		Err(err) => {
			error!("FATAL: {}", err);
			process::exit(2);
		}
	};

	let adapter = match UserAdapterSqlite::new(&config.db_dir).await {
		Ok(adapter) => Arc::new(adapter),
		Err(err) => {
			error!("FATAL: cannot open user database in {}: {}", config.db_dir.display(), err);
			process::exit(1);
		}
	};

	builder
		.listen(config.listen)
		.api_version(config.api_version)
		.registration_mode(config.registration_mode)
		.worker_threads(config.worker_threads)
		.user_adapter(adapter.clone())
		.link_adapter(adapter);

	if let Err(err) = builder.run().await {
		error!("FATAL: {}", err);
		process::exit(1);
	}
}

// vim: ts=4
