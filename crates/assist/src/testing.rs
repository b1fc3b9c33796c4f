//! Scripted transport double shared by the unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use quill_transport::{
	AnalyzeRequest, AssistTransport, DocumentId, LinkSuggestion, Priority, RecommendationEntry, Result,
	SuggestLinksRequest, SuggestionKind, WritingAnalysis, WritingSuggestion,
};

/// One scripted response.
pub(crate) enum Reply<T> {
	Now(Result<T>),
	After(Duration, Result<T>),
}

/// Records every call and answers from per-endpoint scripts.
///
/// Unscripted analyze calls succeed with [`analysis_for`] of the request
/// content; unscripted link and recommendation calls return empty lists.
#[derive(Default)]
pub(crate) struct MockTransport {
	analyze_calls: Mutex<Vec<AnalyzeRequest>>,
	analyze_replies: Mutex<VecDeque<Reply<WritingAnalysis>>>,
	link_calls: Mutex<Vec<SuggestLinksRequest>>,
	link_replies: Mutex<VecDeque<Reply<Vec<LinkSuggestion>>>>,
	recommendation_calls: Mutex<Vec<DocumentId>>,
	recommendation_replies: Mutex<VecDeque<Reply<Vec<RecommendationEntry>>>>,
	abandoned: AtomicUsize,
}

impl MockTransport {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	pub(crate) fn push_analysis(&self, reply: Reply<WritingAnalysis>) {
		self.analyze_replies.lock().push_back(reply);
	}

	pub(crate) fn push_links(&self, reply: Reply<Vec<LinkSuggestion>>) {
		self.link_replies.lock().push_back(reply);
	}

	pub(crate) fn push_recommendations(&self, reply: Reply<Vec<RecommendationEntry>>) {
		self.recommendation_replies.lock().push_back(reply);
	}

	pub(crate) fn analyze_calls(&self) -> Vec<AnalyzeRequest> {
		self.analyze_calls.lock().clone()
	}

	pub(crate) fn link_calls(&self) -> Vec<SuggestLinksRequest> {
		self.link_calls.lock().clone()
	}

	pub(crate) fn recommendation_calls(&self) -> Vec<DocumentId> {
		self.recommendation_calls.lock().clone()
	}

	/// Number of calls whose future was dropped before completing.
	pub(crate) fn abandoned(&self) -> usize {
		self.abandoned.load(Ordering::SeqCst)
	}

	async fn answer<T>(&self, reply: Reply<T>) -> Result<T> {
		let mut guard = AbandonGuard {
			counter: &self.abandoned,
			finished: false,
		};
		let result = match reply {
			Reply::Now(result) => result,
			Reply::After(delay, result) => {
				tokio::time::sleep(delay).await;
				result
			}
		};
		guard.finished = true;
		result
	}
}

struct AbandonGuard<'a> {
	counter: &'a AtomicUsize,
	finished: bool,
}

impl Drop for AbandonGuard<'_> {
	fn drop(&mut self) {
		if !self.finished {
			self.counter.fetch_add(1, Ordering::SeqCst);
		}
	}
}

#[async_trait]
impl AssistTransport for MockTransport {
	async fn analyze(&self, request: &AnalyzeRequest) -> Result<WritingAnalysis> {
		self.analyze_calls.lock().push(request.clone());
		let reply = self
			.analyze_replies
			.lock()
			.pop_front()
			.unwrap_or_else(|| Reply::Now(Ok(analysis_for(&request.content))));
		self.answer(reply).await
	}

	async fn suggest_links(&self, request: &SuggestLinksRequest) -> Result<Vec<LinkSuggestion>> {
		self.link_calls.lock().push(request.clone());
		let reply = self.link_replies.lock().pop_front().unwrap_or(Reply::Now(Ok(Vec::new())));
		self.answer(reply).await
	}

	async fn recommendations(&self, document_id: &DocumentId) -> Result<Vec<RecommendationEntry>> {
		self.recommendation_calls.lock().push(document_id.clone());
		let reply = self
			.recommendation_replies
			.lock()
			.pop_front()
			.unwrap_or(Reply::Now(Ok(Vec::new())));
		self.answer(reply).await
	}
}

/// Analysis whose quality score equals the analyzed character count, so tests
/// can tell which content produced a result.
pub(crate) fn analysis_for(content: &str) -> WritingAnalysis {
	let len = content.chars().count();
	WritingAnalysis {
		quality_score: len as f64,
		readability_score: 50.0,
		suggestions: vec![WritingSuggestion {
			kind: SuggestionKind::Structure,
			message: format!("analyzed {len} characters"),
			priority: Priority::Medium,
		}],
		..WritingAnalysis::default()
	}
}

/// Text of exactly `len` characters starting with `tag`.
pub(crate) fn text(tag: &str, len: usize) -> String {
	let mut text = tag.to_string();
	while text.chars().count() < len {
		text.push('x');
	}
	text
}

pub(crate) fn link(id: &str, relevance: f64) -> LinkSuggestion {
	LinkSuggestion {
		document_id: DocumentId::from(id),
		title: format!("Document {id}"),
		kind: "note".to_string(),
		matched_concepts: Default::default(),
		relevance_score: relevance,
		context: String::new(),
		reason: "shared concepts".to_string(),
	}
}

pub(crate) fn entry(id: &str, tags: &[&str]) -> RecommendationEntry {
	RecommendationEntry {
		id: DocumentId::from(id),
		title: format!("Document {id}"),
		kind: "note".to_string(),
		word_count: 300,
		tags: tags.iter().map(|tag| tag.to_string()).collect(),
	}
}
