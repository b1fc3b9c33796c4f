//! Per-document analysis coordinator.
//!
//! [`AnalysisCoordinator`] turns a stream of content edits into analysis
//! requests and owns the resulting state:
//! - Edits are coalesced by a [`Debouncer`] (default 2000 ms quiet interval)
//! - Content shorter than the minimum length clears the analysis, no request
//! - At most one request is live; starting a new one cancels its predecessor
//! - Responses are published only if their token is still the current one
//!
//! # Error Handling
//!
//! - Remote failure: recorded in [`AnalysisSnapshot::error`], the previous
//!   analysis is kept
//! - Cancellation: dropped silently
//!
//! ```text
//!  schedule(content)      fire        begin()            settle()
//! ─────────────────▶ Debouncer ───▶ token N+1 ───▶ transport ───▶ state
//!                                   cancels N         │
//!                                                     └─ stale token? discard
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use quill_transport::{AnalyzeRequest, AssistTransport, DocumentId, LinkSuggestion, WritingAnalysis};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, trace, warn};

use crate::config::AssistConfig;
use crate::debounce::Debouncer;
use crate::links::LinkResolver;
use crate::token::{AnalysisToken, GenerationClock};

/// Identity of the document a coordinator is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentContext {
	pub document_id: DocumentId,
	pub document_type: String,
}

impl DocumentContext {
	pub fn new(document_id: impl Into<DocumentId>, document_type: impl Into<String>) -> Self {
		Self {
			document_id: document_id.into(),
			document_type: document_type.into(),
		}
	}
}

/// Whether a request is currently outstanding.
///
/// Settled requests return straight to [`Idle`](Self::Idle); how they settled
/// is recorded in [`AnalysisSnapshot::outcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPhase {
	Idle,
	Analyzing,
}

/// How the most recent analysis attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisOutcome {
	/// A new analysis replaced the previous one.
	Success,
	/// The request failed; any previous analysis was kept.
	Failed,
	/// Content was below the minimum length; the analysis was cleared.
	Skipped,
}

/// Observable analysis state of one document.
#[derive(Debug, Clone, Default)]
pub struct AnalysisSnapshot {
	pub analysis: Option<Arc<WritingAnalysis>>,
	pub error: Option<String>,
	pub is_analyzing: bool,
	/// Generation of the most recently started request, 0 before the first.
	pub generation: u64,
	pub outcome: Option<AnalysisOutcome>,
}

impl AnalysisSnapshot {
	pub fn phase(&self) -> AnalysisPhase {
		if self.is_analyzing {
			AnalysisPhase::Analyzing
		} else {
			AnalysisPhase::Idle
		}
	}
}

struct Inner {
	state: AnalysisSnapshot,
	live: Option<AnalysisToken>,
	disposed: bool,
}

struct Shared {
	context: DocumentContext,
	min_content_length: usize,
	transport: Arc<dyn AssistTransport>,
	clock: GenerationClock,
	inner: Mutex<Inner>,
	snapshots: watch::Sender<AnalysisSnapshot>,
}

impl Shared {
	fn publish(&self, inner: &Inner) {
		self.snapshots.send_replace(inner.state.clone());
	}

	/// Replaces the live token, cancelling the previous one first.
	fn install(&self, inner: &mut Inner) -> AnalysisToken {
		let token = self.clock.issue();
		if let Some(previous) = inner.live.replace(token.clone()) {
			debug!(
				document_id = %self.context.document_id,
				superseded = previous.generation(),
				generation = token.generation(),
				"superseding in-flight analysis"
			);
			previous.cancel();
		}
		token
	}

	/// Handles one debounced firing.
	fn begin(self: &Arc<Self>, content: String) {
		let len = content.chars().count();
		let mut inner = self.inner.lock();
		if inner.disposed {
			return;
		}

		if len < self.min_content_length {
			if let Some(stale) = inner.live.take() {
				stale.cancel();
			}
			debug!(
				document_id = %self.context.document_id,
				len,
				min = self.min_content_length,
				"content below minimum length, clearing analysis"
			);
			inner.state.analysis = None;
			inner.state.error = None;
			inner.state.is_analyzing = false;
			inner.state.outcome = Some(AnalysisOutcome::Skipped);
			self.publish(&inner);
			return;
		}

		let token = self.install(&mut inner);
		inner.state.is_analyzing = true;
		inner.state.generation = token.generation();
		self.publish(&inner);
		drop(inner);

		debug!(
			document_id = %self.context.document_id,
			generation = token.generation(),
			len,
			"starting analysis"
		);

		let request = AnalyzeRequest {
			content,
			document_id: self.context.document_id.clone(),
			document_type: self.context.document_type.clone(),
		};
		let shared = Arc::clone(self);
		tokio::spawn(async move {
			let result = tokio::select! {
				biased;
				_ = token.cancelled() => {
					trace!(generation = token.generation(), "analysis abandoned");
					return;
				}
				result = shared.transport.analyze(&request) => result,
			};
			shared.settle(&token, result);
		});
	}

	/// Publishes a response if `token` is still the live token.
	fn settle(&self, token: &AnalysisToken, result: quill_transport::Result<WritingAnalysis>) {
		let mut inner = self.inner.lock();
		let current = inner.live.as_ref().is_some_and(|live| live.same_as(token));
		if inner.disposed || !current || token.is_cancelled() {
			debug!(
				document_id = %self.context.document_id,
				generation = token.generation(),
				"discarding stale analysis response"
			);
			return;
		}
		inner.live = None;
		inner.state.is_analyzing = false;

		match result {
			Ok(analysis) => {
				debug!(
					document_id = %self.context.document_id,
					generation = token.generation(),
					suggestions = analysis.suggestions.len(),
					"analysis succeeded"
				);
				inner.state.analysis = Some(Arc::new(analysis));
				inner.state.error = None;
				inner.state.outcome = Some(AnalysisOutcome::Success);
			}
			Err(err) if err.is_cancelled() => {
				debug!(
					document_id = %self.context.document_id,
					generation = token.generation(),
					"analysis cancelled by transport"
				);
			}
			Err(err) => {
				warn!(
					document_id = %self.context.document_id,
					generation = token.generation(),
					error = %err,
					"analysis failed"
				);
				inner.state.error = Some(err.to_string());
				inner.state.outcome = Some(AnalysisOutcome::Failed);
			}
		}
		self.publish(&inner);
	}
}

/// Debounced, single-flight analysis of one document.
///
/// Must be created and driven from within a Tokio runtime. Dropping the
/// coordinator disposes it.
pub struct AnalysisCoordinator {
	shared: Arc<Shared>,
	debouncer: Debouncer<String>,
	links: LinkResolver,
}

impl AnalysisCoordinator {
	pub fn new(context: DocumentContext, transport: Arc<dyn AssistTransport>, config: &AssistConfig) -> Self {
		let (snapshots, _) = watch::channel(AnalysisSnapshot::default());
		let shared = Arc::new(Shared {
			context,
			min_content_length: config.analysis.min_content_length,
			transport: Arc::clone(&transport),
			clock: GenerationClock::new(),
			inner: Mutex::new(Inner {
				state: AnalysisSnapshot::default(),
				live: None,
				disposed: false,
			}),
			snapshots,
		});

		let target = Arc::clone(&shared);
		let debouncer = Debouncer::new(config.analysis.debounce(), move |content: String| target.begin(content));

		Self {
			shared,
			debouncer,
			links: LinkResolver::new(transport, &config.links),
		}
	}

	pub fn context(&self) -> &DocumentContext {
		&self.shared.context
	}

	pub fn document_id(&self) -> &DocumentId {
		&self.shared.context.document_id
	}

	/// Records a content change. The request, if any, follows after the quiet
	/// interval. Never fails; request errors surface through [`Self::snapshot`].
	pub fn schedule(&self, content: impl Into<String>) {
		if self.is_disposed() {
			return;
		}
		self.debouncer.schedule(content.into());
	}

	/// Skips the remaining quiet interval for a pending change.
	///
	/// Returns false if no change was pending.
	pub fn analyze_now(&self) -> bool {
		!self.is_disposed() && self.debouncer.flush()
	}

	/// Drops a pending change without analyzing it.
	pub fn cancel_pending(&self) -> bool {
		self.debouncer.cancel()
	}

	pub fn snapshot(&self) -> AnalysisSnapshot {
		self.shared.inner.lock().state.clone()
	}

	pub fn phase(&self) -> AnalysisPhase {
		self.shared.inner.lock().state.phase()
	}

	pub fn analysis(&self) -> Option<Arc<WritingAnalysis>> {
		self.shared.inner.lock().state.analysis.clone()
	}

	pub fn error(&self) -> Option<String> {
		self.shared.inner.lock().state.error.clone()
	}

	pub fn is_analyzing(&self) -> bool {
		self.shared.inner.lock().state.is_analyzing
	}

	/// Receives a fresh snapshot after every state change.
	pub fn subscribe(&self) -> watch::Receiver<AnalysisSnapshot> {
		self.shared.snapshots.subscribe()
	}

	/// Link candidates for a selection in this document. Best-effort.
	pub async fn resolve_links(&self, selected_text: Option<&str>) -> Vec<LinkSuggestion> {
		self.links.resolve(selected_text, self.document_id()).await
	}

	pub fn is_disposed(&self) -> bool {
		self.shared.inner.lock().disposed
	}

	/// Cancels the pending change and the live request. State is frozen
	/// afterwards. Idempotent.
	pub fn dispose(&self) {
		self.debouncer.cancel();
		let mut inner = self.shared.inner.lock();
		if inner.disposed {
			return;
		}
		inner.disposed = true;
		if let Some(live) = inner.live.take() {
			live.cancel();
		}
		debug!(document_id = %self.shared.context.document_id, "analysis coordinator disposed");
	}
}

impl Drop for AnalysisCoordinator {
	fn drop(&mut self) {
		self.dispose();
	}
}
