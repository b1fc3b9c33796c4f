//! `reqwest`-backed implementation of [`AssistTransport`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::types::{
	AnalyzeRequest, DocumentId, LinkSuggestion, RecommendationEntry, SuggestLinksRequest, WritingAnalysis,
};
use crate::{AssistTransport, Envelope, Error, Result};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const ANALYZE_PATH: &[&str] = &["api", "smart-writing", "analyze"];
const SUGGEST_LINKS_PATH: &[&str] = &["api", "smart-writing", "suggest-links"];
const RECOMMENDATIONS_PATH: &[&str] = &["api", "knowledge-graph", "recommendations"];

/// Connection settings for the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
	/// Service origin, optionally with a path prefix.
	pub base_url: String,
	/// Per-request timeout in milliseconds.
	pub timeout_ms: u64,
	/// Sent as `Authorization: Bearer ...` when present.
	pub bearer_token: Option<String>,
}

impl Default for ServiceConfig {
	fn default() -> Self {
		Self {
			base_url: "http://localhost:3000".to_string(),
			timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
			bearer_token: None,
		}
	}
}

impl ServiceConfig {
	pub fn timeout(&self) -> Duration {
		Duration::from_millis(self.timeout_ms)
	}
}

/// HTTP client for the writing-assistance and knowledge-graph endpoints.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
	client: Client,
	base_url: Url,
	bearer_token: Option<String>,
}

impl HttpTransport {
	/// Builds a transport from service settings.
	///
	/// Fails if the base URL does not parse or cannot carry a path.
	pub fn new(config: &ServiceConfig) -> Result<Self> {
		let base_url = parse_base_url(&config.base_url)?;
		let client = Client::builder()
			.timeout(config.timeout())
			.user_agent(concat!("quill/", env!("CARGO_PKG_VERSION")))
			.build()?;

		Ok(Self {
			client,
			base_url,
			bearer_token: config.bearer_token.clone(),
		})
	}

	/// Returns the base URL requests are resolved against.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	fn endpoint(&self, segments: &[&str]) -> Result<Url> {
		let mut url = self.base_url.clone();
		url.path_segments_mut()
			.map_err(|()| Error::InvalidBaseUrl(self.base_url.to_string()))?
			.pop_if_empty()
			.extend(segments);
		Ok(url)
	}

	async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
		let request = match &self.bearer_token {
			Some(token) => request.bearer_auth(token),
			None => request,
		};

		let response = request.header(ACCEPT, "application/json").send().await?;
		let status = response.status();
		let body = response.text().await?;
		trace!(%status, len = body.len(), "service response");

		decode_envelope(status, &body)
	}
}

fn parse_base_url(raw: &str) -> Result<Url> {
	let url = Url::parse(raw).map_err(|e| Error::InvalidBaseUrl(format!("{raw}: {e}")))?;
	if url.cannot_be_a_base() {
		return Err(Error::InvalidBaseUrl(raw.to_string()));
	}
	Ok(url)
}

/// Decodes a response body, preferring the service's envelope over the status.
///
/// Error statuses usually still carry an envelope with a readable message; only
/// when the body is not an envelope does the status itself become the error.
fn decode_envelope<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T> {
	match serde_json::from_str::<Envelope<T>>(body) {
		Ok(envelope) => envelope.into_result(),
		Err(err) if status.is_success() => Err(Error::Decode(err)),
		Err(_) => Err(Error::Status {
			status: status.as_u16(),
			body: body.to_string(),
		}),
	}
}

#[async_trait]
impl AssistTransport for HttpTransport {
	async fn analyze(&self, request: &AnalyzeRequest) -> Result<WritingAnalysis> {
		let url = self.endpoint(ANALYZE_PATH)?;
		debug!(document_id = %request.document_id, len = request.content.len(), "POST analyze");
		self.send(self.client.post(url).json(request)).await
	}

	async fn suggest_links(&self, request: &SuggestLinksRequest) -> Result<Vec<LinkSuggestion>> {
		let url = self.endpoint(SUGGEST_LINKS_PATH)?;
		debug!(document_id = %request.document_id, len = request.selected_text.len(), "POST suggest-links");
		self.send(self.client.post(url).json(request)).await
	}

	async fn recommendations(&self, document_id: &DocumentId) -> Result<Vec<RecommendationEntry>> {
		let mut segments = RECOMMENDATIONS_PATH.to_vec();
		segments.push(document_id.as_str());
		let url = self.endpoint(&segments)?;
		debug!(%document_id, "GET recommendations");
		self.send(self.client.get(url)).await
	}
}
