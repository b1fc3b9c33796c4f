//! Related-document recommendations and navigation.
//!
//! Recommendations are fetched whenever the active document changes and are
//! replaced wholesale. Navigation resolves a clicked entry against the
//! already-loaded document collection owned by the host; entries that are not
//! loaded are ignored rather than fetched.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::sync::Arc;

use parking_lot::Mutex;
use quill_transport::{AssistTransport, DocumentId, RecommendationEntry};
use serde::Serialize;
use tracing::{debug, warn};

use crate::graph::GraphView;

/// Read-only view of the host's loaded documents.
pub trait DocumentCollection {
	type Document;

	fn document(&self, id: &DocumentId) -> Option<&Self::Document>;
}

impl<D, S: BuildHasher> DocumentCollection for HashMap<DocumentId, D, S> {
	type Document = D;

	fn document(&self, id: &DocumentId) -> Option<&D> {
		self.get(id)
	}
}

impl<D> DocumentCollection for BTreeMap<DocumentId, D> {
	type Document = D;

	fn document(&self, id: &DocumentId) -> Option<&D> {
		self.get(id)
	}
}

/// Resolves a clicked recommendation to a loaded document.
///
/// Returns `None`, and performs no request, when the target is not loaded.
pub fn navigate<'c, C>(target: &DocumentId, documents: &'c C) -> Option<&'c C::Document>
where
	C: DocumentCollection + ?Sized,
{
	let document = documents.document(target);
	if document.is_none() {
		debug!(%target, "recommended document not loaded, ignoring navigation");
	}
	document
}

/// Fetches recommendations, degrading every failure to an empty list.
#[derive(Clone)]
pub struct RecommendationFetcher {
	transport: Arc<dyn AssistTransport>,
}

impl RecommendationFetcher {
	pub fn new(transport: Arc<dyn AssistTransport>) -> Self {
		Self { transport }
	}

	pub async fn fetch(&self, document_id: &DocumentId) -> Vec<RecommendationEntry> {
		match self.transport.recommendations(document_id).await {
			Ok(entries) => {
				debug!(%document_id, count = entries.len(), "recommendations fetched");
				entries
			}
			Err(err) if err.is_cancelled() => Vec::new(),
			Err(err) => {
				warn!(%document_id, error = %err, "recommendations unavailable");
				Vec::new()
			}
		}
	}
}

/// Recommendations fetched for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationList {
	pub document_id: Option<DocumentId>,
	pub entries: Vec<RecommendationEntry>,
}

#[derive(Default)]
struct PanelState {
	active: Option<DocumentId>,
	list: RecommendationList,
}

/// Binds recommendations to the active document.
///
/// Concurrent fetches may overlap; whichever resolves last wins.
pub struct RecommendationPanel {
	fetcher: RecommendationFetcher,
	state: Mutex<PanelState>,
}

impl RecommendationPanel {
	pub fn new(fetcher: RecommendationFetcher) -> Self {
		Self {
			fetcher,
			state: Mutex::new(PanelState::default()),
		}
	}

	/// Switches the active document and fetches its recommendations.
	///
	/// Returns false without fetching if `document_id` is already active.
	pub async fn set_active_document(&self, document_id: DocumentId) -> bool {
		{
			let mut state = self.state.lock();
			if state.active.as_ref() == Some(&document_id) {
				return false;
			}
			state.active = Some(document_id.clone());
		}
		self.load(document_id).await;
		true
	}

	/// Refetches recommendations for the active document, if any.
	pub async fn refresh(&self) -> bool {
		let Some(active) = self.active_document() else {
			return false;
		};
		self.load(active).await;
		true
	}

	async fn load(&self, document_id: DocumentId) {
		let entries = self.fetcher.fetch(&document_id).await;
		self.state.lock().list = RecommendationList {
			document_id: Some(document_id),
			entries,
		};
	}

	pub fn active_document(&self) -> Option<DocumentId> {
		self.state.lock().active.clone()
	}

	pub fn list(&self) -> RecommendationList {
		self.state.lock().list.clone()
	}

	pub fn entries(&self) -> Vec<RecommendationEntry> {
		self.state.lock().list.entries.clone()
	}

	/// Neighbourhood graph of the current list, centred on the document it was
	/// fetched for.
	pub fn graph(&self, center_title: &str) -> Option<GraphView> {
		let state = self.state.lock();
		let center = state.list.document_id.as_ref()?;
		Some(GraphView::neighborhood(center, center_title, &state.list.entries))
	}

	/// See [`navigate`].
	pub fn navigate<'c, C>(&self, target: &DocumentId, documents: &'c C) -> Option<&'c C::Document>
	where
		C: DocumentCollection + ?Sized,
	{
		navigate(target, documents)
	}
}
