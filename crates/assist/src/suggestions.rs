//! Presentation-side view of an analysis.
//!
//! Groups suggestions by kind without reordering them and folds link
//! candidates from both the analysis and the selection resolver into one list
//! keyed by document id.

use quill_transport::{LinkSuggestion, Priority, SuggestionKind, WritingAnalysis, WritingSuggestion};
use serde::Serialize;

/// Suggestion counts per priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
	pub high: usize,
	pub medium: usize,
	pub low: usize,
}

impl PriorityCounts {
	pub fn total(&self) -> usize {
		self.high + self.medium + self.low
	}
}

/// Suggestions and link candidates ready for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionSet {
	quality_score: f64,
	readability_score: f64,
	suggestions: Vec<WritingSuggestion>,
	links: Vec<LinkSuggestion>,
	key_topics: Vec<String>,
	professional_terms: Vec<String>,
}

impl SuggestionSet {
	pub fn from_analysis(analysis: &WritingAnalysis) -> Self {
		let mut set = Self {
			quality_score: analysis.quality_score,
			readability_score: analysis.readability_score,
			suggestions: analysis.suggestions.clone(),
			links: Vec::with_capacity(analysis.related_documents.len()),
			key_topics: analysis.key_topics.iter().cloned().collect(),
			professional_terms: analysis.professional_terms.iter().cloned().collect(),
		};
		set.merge_links(analysis.related_documents.iter().cloned());
		set
	}

	pub fn quality_score(&self) -> f64 {
		self.quality_score
	}

	pub fn readability_score(&self) -> f64 {
		self.readability_score
	}

	/// All suggestions in service order.
	pub fn suggestions(&self) -> &[WritingSuggestion] {
		&self.suggestions
	}

	pub fn by_kind(&self, kind: SuggestionKind) -> impl Iterator<Item = &WritingSuggestion> {
		self.suggestions.iter().filter(move |s| s.kind == kind)
	}

	/// Non-empty groups in [`SuggestionKind::ALL`] order.
	pub fn groups(&self) -> Vec<(SuggestionKind, Vec<&WritingSuggestion>)> {
		SuggestionKind::ALL
			.into_iter()
			.map(|kind| (kind, self.by_kind(kind).collect::<Vec<_>>()))
			.filter(|(_, group)| !group.is_empty())
			.collect()
	}

	pub fn priority_counts(&self) -> PriorityCounts {
		let mut counts = PriorityCounts::default();
		for suggestion in &self.suggestions {
			match suggestion.priority {
				Priority::High => counts.high += 1,
				Priority::Medium => counts.medium += 1,
				Priority::Low => counts.low += 1,
			}
		}
		counts
	}

	pub fn highest_priority(&self) -> Option<Priority> {
		self.suggestions.iter().map(|s| s.priority).max()
	}

	pub fn links(&self) -> &[LinkSuggestion] {
		&self.links
	}

	pub fn key_topics(&self) -> &[String] {
		&self.key_topics
	}

	pub fn professional_terms(&self) -> &[String] {
		&self.professional_terms
	}

	/// Adds link candidates, one per document id.
	///
	/// A repeated id keeps its first position and takes whichever candidate
	/// has the higher relevance score.
	pub fn merge_links(&mut self, links: impl IntoIterator<Item = LinkSuggestion>) {
		for link in links {
			match self.links.iter().position(|existing| existing.document_id == link.document_id) {
				Some(i) if link.relevance_score > self.links[i].relevance_score => self.links[i] = link,
				Some(_) => {}
				None => self.links.push(link),
			}
		}
	}

	pub fn is_empty(&self) -> bool {
		self.suggestions.is_empty() && self.links.is_empty()
	}
}
