//! Wire types exchanged with the writing-assistance service.
//!
//! Field names follow the service's camelCase JSON, and kind fields use the
//! `type` key. Set-valued fields are [`IndexSet`]s so the service's ordering
//! survives deduplication.

use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Identifier of a document in the externally owned document store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for DocumentId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for DocumentId {
	fn from(id: &str) -> Self {
		Self(id.to_string())
	}
}

impl From<String> for DocumentId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

/// Structured writing-quality assessment of one document revision.
///
/// Always produced wholesale by the service; consumers replace, never patch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingAnalysis {
	pub quality_score: f64,
	pub readability_score: f64,
	#[serde(default)]
	pub suggestions: Vec<WritingSuggestion>,
	#[serde(default)]
	pub related_documents: Vec<LinkSuggestion>,
	#[serde(default)]
	pub professional_terms: IndexSet<String>,
	#[serde(default)]
	pub key_topics: IndexSet<String>,
}

/// Category of a writing suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
	Structure,
	Content,
	Quality,
	Link,
}

impl SuggestionKind {
	pub const ALL: [SuggestionKind; 4] = [
		SuggestionKind::Structure,
		SuggestionKind::Content,
		SuggestionKind::Quality,
		SuggestionKind::Link,
	];
}

/// Urgency of a writing suggestion. Orders `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
	Low,
	Medium,
	High,
}

/// A single suggestion returned by the analysis call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WritingSuggestion {
	#[serde(rename = "type")]
	pub kind: SuggestionKind,
	pub message: String,
	pub priority: Priority,
}

/// A candidate document to link from the current one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSuggestion {
	pub document_id: DocumentId,
	pub title: String,
	#[serde(rename = "type", default)]
	pub kind: String,
	#[serde(default)]
	pub matched_concepts: IndexSet<String>,
	#[serde(default)]
	pub relevance_score: f64,
	#[serde(default)]
	pub context: String,
	#[serde(default)]
	pub reason: String,
}

/// Reduced projection of a related document, for display and lookup only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationEntry {
	pub id: DocumentId,
	pub title: String,
	#[serde(rename = "type", default)]
	pub kind: String,
	#[serde(default)]
	pub word_count: u64,
	#[serde(default)]
	pub tags: Vec<String>,
}

/// Body of `POST /api/smart-writing/analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
	pub content: String,
	pub document_id: DocumentId,
	pub document_type: String,
}

/// Body of `POST /api/smart-writing/suggest-links`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestLinksRequest {
	pub selected_text: String,
	pub document_id: DocumentId,
}
