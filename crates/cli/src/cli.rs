//! CLI schema for the quill binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(about = "Query the Quill writing-assistance service")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// TOML configuration file
	#[arg(short, long, value_name = "PATH", global = true)]
	pub config: Option<PathBuf>,

	/// Service base URL, overrides `service.base_url`
	#[arg(long, value_name = "URL", global = true)]
	pub base_url: Option<String>,

	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
	/// Analyze a file and print grouped suggestions
	Analyze {
		/// File whose content is analyzed
		file: PathBuf,

		/// Document the content belongs to
		#[arg(long, value_name = "ID")]
		document_id: String,

		#[arg(long, value_name = "TYPE", default_value = "article")]
		document_type: String,
	},
	/// Print link suggestions for a text selection
	Links {
		document_id: String,
		text: String,
	},
	/// Print related-document recommendations
	Recommend {
		document_id: String,

		/// Print the knowledge-graph neighbourhood instead of the list
		#[arg(long)]
		graph: bool,
	},
}

#[cfg(test)]
mod tests {
	use clap::CommandFactory;
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn schema_is_consistent() {
		Cli::command().debug_assert();
	}

	#[test]
	fn analyze_defaults_document_type() {
		let cli = Cli::try_parse_from(["quill", "analyze", "draft.md", "--document-id", "doc-1"]).unwrap();
		assert_eq!(
			cli.command,
			Command::Analyze {
				file: PathBuf::from("draft.md"),
				document_id: "doc-1".into(),
				document_type: "article".into(),
			}
		);
		assert!(cli.config.is_none());
	}

	#[test]
	fn global_flags_follow_subcommand() {
		let cli = Cli::try_parse_from([
			"quill",
			"recommend",
			"doc-1",
			"--graph",
			"--base-url",
			"http://example.test",
			"-v",
		])
		.unwrap();
		assert_eq!(
			cli.command,
			Command::Recommend {
				document_id: "doc-1".into(),
				graph: true,
			}
		);
		assert_eq!(cli.base_url.as_deref(), Some("http://example.test"));
		assert!(cli.verbose);
	}

	#[test]
	fn analyze_requires_document_id() {
		assert!(Cli::try_parse_from(["quill", "analyze", "draft.md"]).is_err());
	}
}
