//! On-demand link suggestions for a text selection.
//!
//! Unlike analysis, this path is neither debounced nor single-flight, and it
//! never reports failure: every error degrades to an empty list.

use std::sync::Arc;

use quill_transport::{AssistTransport, DocumentId, LinkSuggestion, SuggestLinksRequest};
use tracing::{debug, trace, warn};

use crate::config::LinkConfig;

/// Resolves link candidates for selected text.
#[derive(Clone)]
pub struct LinkResolver {
	transport: Arc<dyn AssistTransport>,
	min_selection_length: usize,
}

impl LinkResolver {
	pub fn new(transport: Arc<dyn AssistTransport>, config: &LinkConfig) -> Self {
		Self {
			transport,
			min_selection_length: config.min_selection_length,
		}
	}

	pub fn min_selection_length(&self) -> usize {
		self.min_selection_length
	}

	/// Returns link candidates for `selected_text`.
	///
	/// Missing or short selections return an empty list without a request.
	pub async fn resolve(&self, selected_text: Option<&str>, document_id: &DocumentId) -> Vec<LinkSuggestion> {
		let Some(selected_text) = selected_text.filter(|text| text.chars().count() >= self.min_selection_length)
		else {
			trace!(%document_id, "selection too short for link suggestions");
			return Vec::new();
		};

		let request = SuggestLinksRequest {
			selected_text: selected_text.to_string(),
			document_id: document_id.clone(),
		};
		match self.transport.suggest_links(&request).await {
			Ok(suggestions) => {
				debug!(%document_id, count = suggestions.len(), "link suggestions resolved");
				suggestions
			}
			Err(err) if err.is_cancelled() => Vec::new(),
			Err(err) => {
				warn!(%document_id, error = %err, "link suggestions unavailable");
				Vec::new()
			}
		}
	}
}
