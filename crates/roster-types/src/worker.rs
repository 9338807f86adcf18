//! Worker pool. Runs blocking, CPU-heavy jobs (password hashing) off the async executor.

use flume::{Receiver, Sender};
use futures::channel::oneshot;
use std::thread;

use crate::prelude::*;

type Job = Box<dyn FnOnce() + Send>;

#[derive(Debug)]
pub struct WorkerPool {
	tx: Sender<Job>,
}

impl WorkerPool {
	/// Starts `threads` worker threads (at least one)
	pub fn new(threads: usize) -> Self {
		let (tx, rx) = flume::unbounded::<Job>();

		for n in 0..threads.max(1) {
			let rx = rx.clone();
			let spawned = thread::Builder::new()
				.name(format!("roster-worker-{}", n))
				.spawn(move || worker_loop(&rx));
			if let Err(err) = spawned {
				error!("Failed to spawn worker thread: {}", err);
			}
		}

		Self { tx }
	}

	/// Submits a closure and returns a future resolving to its result
	pub fn run<F, T>(&self, f: F) -> impl std::future::Future<Output = ClResult<T>>
	where
		F: FnOnce() -> T + Send + 'static,
		T: Send + 'static,
	{
		let (res_tx, res_rx) = oneshot::channel();

		let job: Job = Box::new(move || {
			let _ignore = res_tx.send(f());
		});

		if self.tx.send(job).is_err() {
			error!("Failed to send job to worker queue");
		}

		async move {
			res_rx.await.map_err(|_| {
				error!("Worker dropped result channel (task may have panicked)");
				Error::Internal("worker task failed".into())
			})
		}
	}
}

fn worker_loop(rx: &Receiver<Job>) {
	while let Ok(job) = rx.recv() {
		job();
	}
	debug!("Worker queue closed, exiting");
}


// vim: ts=4
