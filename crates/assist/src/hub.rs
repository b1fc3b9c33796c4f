//! Per-document coordinator registry for hosts with several open editors.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use quill_transport::{AssistTransport, DocumentId};
use tracing::debug;

use crate::config::AssistConfig;
use crate::coordinator::{AnalysisCoordinator, DocumentContext};
use crate::links::LinkResolver;
use crate::recommend::{RecommendationFetcher, RecommendationPanel};

/// Owns one [`AnalysisCoordinator`] per open document.
///
/// All coordinators share the hub's transport and configuration. Dropping the
/// hub disposes every coordinator, including ones still referenced elsewhere.
pub struct AssistHub {
	transport: Arc<dyn AssistTransport>,
	config: AssistConfig,
	coordinators: Mutex<HashMap<DocumentId, Arc<AnalysisCoordinator>>>,
}

impl AssistHub {
	pub fn new(transport: Arc<dyn AssistTransport>, config: AssistConfig) -> Self {
		Self {
			transport,
			config,
			coordinators: Mutex::new(HashMap::new()),
		}
	}

	pub fn config(&self) -> &AssistConfig {
		&self.config
	}

	/// Returns the coordinator for `context`, creating it on first open.
	///
	/// Reopening a document under a different type, or after its coordinator
	/// was disposed through a shared handle, replaces the coordinator.
	pub fn open(&self, context: DocumentContext) -> Arc<AnalysisCoordinator> {
		let mut coordinators = self.coordinators.lock();
		if let Some(existing) = coordinators.get(&context.document_id) {
			if existing.context() == &context && !existing.is_disposed() {
				return Arc::clone(existing);
			}
			existing.dispose();
		}

		debug!(document_id = %context.document_id, document_type = %context.document_type, "opening document");
		let coordinator = Arc::new(AnalysisCoordinator::new(
			context.clone(),
			Arc::clone(&self.transport),
			&self.config,
		));
		coordinators.insert(context.document_id, Arc::clone(&coordinator));
		coordinator
	}

	pub fn get(&self, document_id: &DocumentId) -> Option<Arc<AnalysisCoordinator>> {
		self.coordinators.lock().get(document_id).cloned()
	}

	/// Disposes and forgets the coordinator for `document_id`.
	pub fn close(&self, document_id: &DocumentId) -> bool {
		let Some(coordinator) = self.coordinators.lock().remove(document_id) else {
			return false;
		};
		coordinator.dispose();
		debug!(%document_id, "closed document");
		true
	}

	pub fn len(&self) -> usize {
		self.coordinators.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.coordinators.lock().is_empty()
	}

	pub fn document_ids(&self) -> Vec<DocumentId> {
		let mut ids: Vec<_> = self.coordinators.lock().keys().cloned().collect();
		ids.sort();
		ids
	}

	pub fn link_resolver(&self) -> LinkResolver {
		LinkResolver::new(Arc::clone(&self.transport), &self.config.links)
	}

	pub fn recommendation_panel(&self) -> RecommendationPanel {
		RecommendationPanel::new(RecommendationFetcher::new(Arc::clone(&self.transport)))
	}

	/// Disposes every coordinator.
	pub fn shutdown(&self) {
		let drained: Vec<_> = self.coordinators.lock().drain().map(|(_, c)| c).collect();
		for coordinator in &drained {
			coordinator.dispose();
		}
		if !drained.is_empty() {
			debug!(count = drained.len(), "assist hub shut down");
		}
	}
}

impl Drop for AssistHub {
	fn drop(&mut self) {
		self.shutdown();
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use pretty_assertions::assert_eq;
	use tokio::time::sleep;

	use super::*;
	use crate::testing::{MockTransport, Reply, analysis_for, text};

	fn hub(transport: &Arc<MockTransport>) -> AssistHub {
		AssistHub::new(transport.clone(), AssistConfig::default())
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn reopening_returns_same_coordinator() {
		let transport = Arc::new(MockTransport::new());
		let hub = hub(&transport);

		let first = hub.open(DocumentContext::new("doc-1", "article"));
		let again = hub.open(DocumentContext::new("doc-1", "article"));
		assert!(Arc::ptr_eq(&first, &again));

		let other = hub.open(DocumentContext::new("doc-2", "note"));
		assert!(!Arc::ptr_eq(&first, &other));
		assert_eq!(hub.len(), 2);
		assert_eq!(hub.document_ids(), vec![DocumentId::from("doc-1"), DocumentId::from("doc-2")]);
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn documents_analyze_independently() {
		let transport = Arc::new(MockTransport::new());
		let hub = hub(&transport);
		let one = hub.open(DocumentContext::new("doc-1", "article"));
		let two = hub.open(DocumentContext::new("doc-2", "article"));

		one.schedule(text("one", 120));
		two.schedule(text("two", 140));
		sleep(Duration::from_millis(2001)).await;

		assert_eq!(transport.analyze_calls().len(), 2);
		assert_eq!(one.analysis().map(|a| a.quality_score), Some(120.0));
		assert_eq!(two.analysis().map(|a| a.quality_score), Some(140.0));
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn changed_type_replaces_coordinator() {
		let transport = Arc::new(MockTransport::new());
		let hub = hub(&transport);

		let first = hub.open(DocumentContext::new("doc-1", "article"));
		let replaced = hub.open(DocumentContext::new("doc-1", "report"));
		assert!(first.is_disposed());
		assert!(!replaced.is_disposed());
		assert_eq!(replaced.context().document_type, "report");
		assert_eq!(hub.len(), 1);
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn reopening_after_dispose_yields_live_coordinator() {
		let transport = Arc::new(MockTransport::new());
		let hub = hub(&transport);
		let handle = hub.open(DocumentContext::new("doc-1", "article"));
		handle.dispose();

		let reopened = hub.open(DocumentContext::new("doc-1", "article"));
		assert!(!Arc::ptr_eq(&handle, &reopened));
		assert!(!reopened.is_disposed());
		assert_eq!(hub.len(), 1);
		assert!(hub.get(&"doc-1".into()).is_some_and(|c| Arc::ptr_eq(&c, &reopened)));

		reopened.schedule(text("a", 150));
		sleep(Duration::from_secs(5)).await;
		assert_eq!(transport.analyze_calls().len(), 1);
		assert_eq!(reopened.analysis().map(|a| a.quality_score), Some(150.0));
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn close_disposes_shared_handles() {
		let transport = Arc::new(MockTransport::new());
		transport.push_analysis(Reply::After(Duration::from_secs(1), Ok(analysis_for(&text("a", 120)))));
		let hub = hub(&transport);
		let handle = hub.open(DocumentContext::new("doc-1", "article"));

		handle.schedule(text("a", 120));
		sleep(Duration::from_millis(2001)).await;
		assert!(handle.is_analyzing());

		assert!(hub.close(&"doc-1".into()));
		assert!(!hub.close(&"doc-1".into()));
		assert!(handle.is_disposed());
		assert!(hub.get(&"doc-1".into()).is_none());

		sleep(Duration::from_secs(2)).await;
		assert_eq!(transport.abandoned(), 1);
		assert!(handle.analysis().is_none());
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn shutdown_disposes_everything() {
		let transport = Arc::new(MockTransport::new());
		let hub = hub(&transport);
		let one = hub.open(DocumentContext::new("doc-1", "article"));
		let two = hub.open(DocumentContext::new("doc-2", "article"));
		one.schedule(text("one", 120));

		drop(hub);
		sleep(Duration::from_secs(5)).await;

		assert!(one.is_disposed());
		assert!(two.is_disposed());
		assert!(transport.analyze_calls().is_empty());
	}

	#[tokio::test]
	async fn shared_resolvers_use_hub_settings() {
		let transport = Arc::new(MockTransport::new());
		let mut config = AssistConfig::default();
		config.links.min_selection_length = 3;
		let hub = AssistHub::new(transport.clone(), config);

		assert_eq!(hub.link_resolver().min_selection_length(), 3);
		hub.link_resolver().resolve(Some("abc"), &"doc-1".into()).await;
		assert_eq!(transport.link_calls().len(), 1);

		let panel = hub.recommendation_panel();
		panel.set_active_document("doc-1".into()).await;
		assert_eq!(transport.recommendation_calls().len(), 1);
	}
}
