//! Knowledge-graph neighbourhood of a document, for the graph view.

use std::collections::HashSet;

use quill_transport::{DocumentId, RecommendationEntry};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
	pub id: DocumentId,
	pub title: String,
	pub kind: String,
	pub word_count: u64,
	pub is_center: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeRelation {
	/// Centre document to one of its recommendations.
	Recommended,
	/// Two recommendations carrying common tags.
	SharedTags,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
	pub source: DocumentId,
	pub target: DocumentId,
	pub relation: EdgeRelation,
	/// Tags common to both ends, in the source's tag order.
	pub shared_tags: Vec<String>,
}

impl GraphEdge {
	pub fn weight(&self) -> usize {
		self.shared_tags.len().max(1)
	}
}

/// Star graph around a centre document, plus shared-tag edges between its
/// neighbours. The centre is always `nodes[0]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphView {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
}

impl GraphView {
	/// Builds the neighbourhood of `center` from its recommendations.
	///
	/// Entries pointing at the centre itself and repeated ids are dropped.
	pub fn neighborhood(center: &DocumentId, center_title: &str, entries: &[RecommendationEntry]) -> Self {
		let mut seen = HashSet::new();
		let mut neighbours: Vec<&RecommendationEntry> = Vec::with_capacity(entries.len());
		for entry in entries {
			if &entry.id != center && seen.insert(&entry.id) {
				neighbours.push(entry);
			}
		}

		let mut nodes = Vec::with_capacity(neighbours.len() + 1);
		nodes.push(GraphNode {
			id: center.clone(),
			title: center_title.to_string(),
			kind: String::new(),
			word_count: 0,
			is_center: true,
		});
		nodes.extend(neighbours.iter().map(|entry| GraphNode {
			id: entry.id.clone(),
			title: entry.title.clone(),
			kind: entry.kind.clone(),
			word_count: entry.word_count,
			is_center: false,
		}));

		let mut edges: Vec<GraphEdge> = neighbours
			.iter()
			.map(|entry| GraphEdge {
				source: center.clone(),
				target: entry.id.clone(),
				relation: EdgeRelation::Recommended,
				shared_tags: Vec::new(),
			})
			.collect();

		for (i, left) in neighbours.iter().enumerate() {
			for right in &neighbours[i + 1..] {
				let shared = shared_tags(&left.tags, &right.tags);
				if !shared.is_empty() {
					edges.push(GraphEdge {
						source: left.id.clone(),
						target: right.id.clone(),
						relation: EdgeRelation::SharedTags,
						shared_tags: shared,
					});
				}
			}
		}

		Self { nodes, edges }
	}

	pub fn node(&self, id: &DocumentId) -> Option<&GraphNode> {
		self.nodes.iter().find(|node| &node.id == id)
	}

	/// Edges touching `id`, in either direction.
	pub fn edges_of<'a>(&'a self, id: &'a DocumentId) -> impl Iterator<Item = &'a GraphEdge> + 'a {
		self.edges
			.iter()
			.filter(move |edge| &edge.source == id || &edge.target == id)
	}
}

fn shared_tags(left: &[String], right: &[String]) -> Vec<String> {
	let right: HashSet<&str> = right.iter().map(String::as_str).collect();
	let mut seen = HashSet::new();
	let mut shared = Vec::new();
	for tag in left {
		if right.contains(tag.as_str()) && seen.insert(tag.as_str()) {
			shared.push(tag.clone());
		}
	}
	shared
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::testing::entry;

	#[test]
	fn centre_comes_first_and_links_every_neighbour() {
		let center = DocumentId::from("doc-1");
		let graph = GraphView::neighborhood(&center, "Current", &[entry("a", &[]), entry("b", &[])]);

		assert!(graph.nodes[0].is_center);
		assert_eq!(graph.nodes[0].title, "Current");
		assert_eq!(graph.nodes.len(), 3);
		assert_eq!(graph.edges_of(&center).count(), 2);
		assert!(graph.edges.iter().all(|edge| edge.relation == EdgeRelation::Recommended));
	}

	#[test]
	fn self_references_and_duplicates_are_dropped() {
		let center = DocumentId::from("doc-1");
		let graph = GraphView::neighborhood(
			&center,
			"Current",
			&[entry("doc-1", &[]), entry("a", &[]), entry("a", &["dup"])],
		);

		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.edges.len(), 1);
	}

	#[test]
	fn neighbours_sharing_tags_are_connected() {
		let center = DocumentId::from("doc-1");
		let graph = GraphView::neighborhood(
			&center,
			"Current",
			&[
				entry("a", &["rust", "async", "rust"]),
				entry("b", &["async", "rust"]),
				entry("c", &["gardening"]),
			],
		);

		let tagged: Vec<_> = graph
			.edges
			.iter()
			.filter(|edge| edge.relation == EdgeRelation::SharedTags)
			.collect();
		assert_eq!(tagged.len(), 1);
		assert_eq!(tagged[0].source, DocumentId::from("a"));
		assert_eq!(tagged[0].target, DocumentId::from("b"));
		assert_eq!(tagged[0].shared_tags, vec!["rust".to_string(), "async".to_string()]);
		assert_eq!(tagged[0].weight(), 2);
		assert_eq!(graph.edges_of(&DocumentId::from("c")).count(), 1);
		assert_eq!(graph.node(&DocumentId::from("c")).map(|n| n.word_count), Some(300));
	}
}
