use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

/// Monotonic generation clock shared by the tokens of one owner.
#[derive(Debug, Default, Clone)]
pub struct GenerationClock {
	next: Arc<AtomicU64>,
}

impl GenerationClock {
	/// Creates a new generation clock starting at generation 1.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the next generation ID.
	pub fn next(&self) -> u64 {
		self.next.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
	}

	/// Issues a live token for the next generation of this clock.
	pub fn issue(&self) -> AnalysisToken {
		AnalysisToken {
			generation: self.next(),
			origin: Arc::clone(&self.next),
			cancel: CancellationToken::new(),
		}
	}
}

/// Liveness handle of one outstanding analysis request.
///
/// Cancellation is cooperative: holders race their work against
/// [`cancelled`](Self::cancelled) and must also compare [`generation`](Self::generation)
/// with the owner's current token before publishing a result, since a response
/// can complete before the cancel signal is observed.
#[derive(Debug, Clone)]
pub struct AnalysisToken {
	generation: u64,
	origin: Arc<AtomicU64>,
	cancel: CancellationToken,
}

impl AnalysisToken {
	/// Creates a new live token for `generation`, not tied to any clock.
	pub fn new(generation: u64) -> Self {
		Self {
			generation,
			origin: Arc::default(),
			cancel: CancellationToken::new(),
		}
	}

	/// Returns generation ID.
	pub const fn generation(&self) -> u64 {
		self.generation
	}

	/// Returns true when cancellation is requested.
	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Requests cancellation. Idempotent.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Future resolving when cancellation is requested.
	pub async fn cancelled(&self) {
		self.cancel.cancelled().await;
	}

	/// Returns true if `other` has the same generation from the same clock.
	///
	/// Clones always match. Tokens from [`AnalysisToken::new`] only match their
	/// own clones.
	pub fn same_as(&self, other: &AnalysisToken) -> bool {
		self.generation == other.generation && Arc::ptr_eq(&self.origin, &other.origin)
	}
}
