//! Transport layer for the Quill writing-assistance service.
//!
//! The remote service answers every call with a normalized envelope
//! `{success, data?, error?}` (see [`Envelope`]). This crate decodes that
//! envelope into a plain [`Result`], so call sites choose per path whether a
//! failure is surfaced or absorbed.
//!
//! ```text
//! ┌──────────────┐      ┌─────────────────┐      ┌──────────────────┐
//! │  Coordinator │─────▶│ AssistTransport │─────▶│  Remote service  │
//! │   (quill-    │      │  (HttpTransport │      │ /api/smart-...   │
//! │    assist)   │◀─────│   or a mock)    │◀─────│ /api/knowledge-..│
//! └──────────────┘      └─────────────────┘      └──────────────────┘
//! ```
//!
//! The [`AssistTransport`] trait is the seam between coordination logic and
//! the network; tests substitute a recording mock.

mod envelope;
mod http;
pub mod types;

use async_trait::async_trait;
pub use envelope::Envelope;
pub use http::{HttpTransport, ServiceConfig};
pub use types::{
	AnalyzeRequest, DocumentId, LinkSuggestion, Priority, RecommendationEntry, SuggestLinksRequest,
	SuggestionKind, WritingAnalysis, WritingSuggestion,
};

/// A convenient type alias for `Result` with `E` = [`enum@crate::Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Possible transport errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	/// The request never produced a response (connect failure, timeout, TLS).
	#[error("network error: {0}")]
	Network(#[from] reqwest::Error),
	/// The service answered with a non-success status and no readable envelope.
	#[error("unexpected status {status}: {body}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Raw response body, for diagnostics.
		body: String,
	},
	/// The response body was not a valid envelope for the expected payload.
	#[error("invalid response: {0}")]
	Decode(#[from] serde_json::Error),
	/// The service reported `success: false`.
	#[error("{0}")]
	Remote(String),
	/// The service reported `success: true` without a `data` payload.
	#[error("response missing data")]
	MissingData,
	/// The configured base URL cannot be extended with API paths.
	#[error("invalid base url: {0}")]
	InvalidBaseUrl(String),
	/// The request was abandoned before it completed.
	#[error("request cancelled")]
	Cancelled,
}

impl Error {
	/// Returns true if this error only signals cancellation, not a failure.
	pub fn is_cancelled(&self) -> bool {
		matches!(self, Error::Cancelled)
	}
}

/// Calls offered by the remote writing-assistance service.
///
/// Implementations must be cancel-safe: callers abandon in-flight futures by
/// dropping them when the request is superseded.
#[async_trait]
pub trait AssistTransport: Send + Sync {
	/// `POST /api/smart-writing/analyze`
	async fn analyze(&self, request: &AnalyzeRequest) -> Result<WritingAnalysis>;

	/// `POST /api/smart-writing/suggest-links`
	async fn suggest_links(&self, request: &SuggestLinksRequest) -> Result<Vec<LinkSuggestion>>;

	/// `GET /api/knowledge-graph/recommendations/{documentId}`
	async fn recommendations(&self, document_id: &DocumentId) -> Result<Vec<RecommendationEntry>>;
}
