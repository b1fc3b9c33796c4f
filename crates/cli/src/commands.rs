//! Subcommand handlers. Each prints JSON to stdout.

use std::path::Path;

use anyhow::{Context, bail};
use quill_assist::{AnalysisOutcome, AssistHub, DocumentContext, SuggestionSet};
use quill_transport::DocumentId;
use serde::Serialize;
use tracing::info;

pub async fn analyze(hub: &AssistHub, file: &Path, context: DocumentContext) -> anyhow::Result<()> {
	let content = std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
	let report = settle_analysis(hub, content, context).await?;
	print_json(&report)?;
	report.ensure_succeeded()
}

/// Result of one analysis run, as printed by `quill analyze`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
	pub document_id: DocumentId,
	pub outcome: Option<AnalysisOutcome>,
	pub error: Option<String>,
	pub suggestions: Option<SuggestionSet>,
}

impl AnalysisReport {
	pub fn ensure_succeeded(&self) -> anyhow::Result<()> {
		if self.outcome == Some(AnalysisOutcome::Failed) {
			bail!("analysis failed: {}", self.error.as_deref().unwrap_or_default());
		}
		Ok(())
	}
}

/// Runs `content` through the document's coordinator without the quiet
/// interval and waits until the request settles.
pub async fn settle_analysis(
	hub: &AssistHub,
	content: String,
	context: DocumentContext,
) -> anyhow::Result<AnalysisReport> {
	let coordinator = hub.open(context);
	// Subscribe first so the settling update cannot be missed.
	let mut snapshots = coordinator.subscribe();

	coordinator.schedule(content);
	coordinator.analyze_now();
	let snapshot = snapshots
		.wait_for(|snapshot| !snapshot.is_analyzing)
		.await
		.context("analysis coordinator went away")?
		.clone();
	info!(document_id = %coordinator.document_id(), outcome = ?snapshot.outcome, "analysis settled");

	Ok(AnalysisReport {
		document_id: coordinator.document_id().clone(),
		outcome: snapshot.outcome,
		suggestions: snapshot.analysis.as_deref().map(SuggestionSet::from_analysis),
		error: snapshot.error,
	})
}

pub async fn links(hub: &AssistHub, document_id: DocumentId, text: &str) -> anyhow::Result<()> {
	let links = hub.link_resolver().resolve(Some(text), &document_id).await;
	print_json(&links)
}

pub async fn recommend(hub: &AssistHub, document_id: DocumentId, graph: bool) -> anyhow::Result<()> {
	let panel = hub.recommendation_panel();
	panel.set_active_document(document_id.clone()).await;

	if graph {
		let view = panel.graph(document_id.as_str());
		return print_json(&view);
	}
	print_json(&panel.list())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
	println!("{}", serde_json::to_string_pretty(value)?);
	Ok(())
}
