//! Quill command-line front end.
//!
//! Drives the analysis coordinator, link resolver and recommendation panel
//! against a live service and prints their results as JSON.

mod cli;
mod commands;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command};
use quill_assist::{AssistConfig, AssistHub, DocumentContext};
use quill_transport::HttpTransport;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	setup_tracing(cli.verbose);

	let config = load_config(&cli)?;
	info!(base_url = %config.service.base_url, "using assist service");
	let transport = HttpTransport::new(&config.service).context("building HTTP transport")?;
	let hub = AssistHub::new(Arc::new(transport), config);

	match cli.command {
		Command::Analyze {
			file,
			document_id,
			document_type,
		} => commands::analyze(&hub, &file, DocumentContext::new(document_id, document_type)).await,
		Command::Links { document_id, text } => commands::links(&hub, document_id.into(), &text).await,
		Command::Recommend { document_id, graph } => commands::recommend(&hub, document_id.into(), graph).await,
	}
}

fn load_config(cli: &Cli) -> anyhow::Result<AssistConfig> {
	let mut config = match &cli.config {
		Some(path) => AssistConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
		None => AssistConfig::default(),
	};
	if let Some(base_url) = &cli.base_url {
		config.service.base_url = base_url.clone();
		config.validate()?;
	}
	Ok(config)
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	// stdout carries the JSON output
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("quill=debug,quill_assist=debug,quill_transport=debug,info")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(verbose)
		.init();
}
