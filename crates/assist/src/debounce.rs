//! Trailing-edge debounce scheduler.
//!
//! [`Debouncer::schedule`] arms a timer for the quiet interval, replacing any
//! armed timer. Only a timer that elapses while still being the newest one
//! invokes the handler, and it does so with the newest value. Timers run on
//! `tokio::time`, so tests drive them with the paused clock.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::token::GenerationClock;

type Handler<T> = Arc<dyn Fn(T) + Send + Sync>;

struct Pending<T> {
	generation: u64,
	cancel: CancellationToken,
	value: T,
}

/// Coalesces bursts of values into one trailing handler invocation.
///
/// Must be used from within a Tokio runtime.
pub struct Debouncer<T> {
	delay: Duration,
	handler: Handler<T>,
	pending: Arc<Mutex<Option<Pending<T>>>>,
	clock: GenerationClock,
}

impl<T: Send + 'static> Debouncer<T> {
	pub fn new<F>(delay: Duration, handler: F) -> Self
	where
		F: Fn(T) + Send + Sync + 'static,
	{
		Self {
			delay,
			handler: Arc::new(handler),
			pending: Arc::new(Mutex::new(None)),
			clock: GenerationClock::new(),
		}
	}

	pub fn delay(&self) -> Duration {
		self.delay
	}

	/// Replaces any pending value with `value` and restarts the quiet interval.
	pub fn schedule(&self, value: T) {
		let generation = self.clock.next();
		let cancel = CancellationToken::new();

		let previous = self.pending.lock().replace(Pending {
			generation,
			cancel: cancel.clone(),
			value,
		});
		if let Some(previous) = previous {
			previous.cancel.cancel();
		}

		let pending = Arc::clone(&self.pending);
		let handler = Arc::clone(&self.handler);
		let delay = self.delay;
		tokio::spawn(async move {
			tokio::select! {
				biased;
				_ = cancel.cancelled() => return,
				_ = sleep(delay) => {}
			}

			let due = {
				let mut slot = pending.lock();
				if slot.as_ref().is_some_and(|p| p.generation == generation) {
					slot.take()
				} else {
					None
				}
			};

			if let Some(due) = due {
				trace!(generation, "debounce elapsed");
				handler(due.value);
			}
		});
	}

	/// Discards the pending value without invoking the handler.
	///
	/// Returns true if a value was pending.
	pub fn cancel(&self) -> bool {
		match self.pending.lock().take() {
			Some(pending) => {
				pending.cancel.cancel();
				true
			}
			None => false,
		}
	}

	/// Invokes the handler now with the pending value, if any.
	///
	/// Returns true if the handler ran.
	pub fn flush(&self) -> bool {
		let Some(pending) = self.pending.lock().take() else {
			return false;
		};
		pending.cancel.cancel();
		trace!(generation = pending.generation, "debounce flushed");
		(self.handler)(pending.value);
		true
	}

	pub fn is_pending(&self) -> bool {
		self.pending.lock().is_some()
	}
}

impl<T> Drop for Debouncer<T> {
	fn drop(&mut self) {
		if let Some(pending) = self.pending.lock().take() {
			pending.cancel.cancel();
		}
	}
}
