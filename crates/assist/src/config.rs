//! TOML configuration for the assist layer.
//!
//! Every key is optional; missing keys take the documented defaults.
//!
//! ```toml
//! [service]
//! base_url = "http://localhost:3000"
//! timeout_ms = 30000
//!
//! [analysis]
//! debounce_ms = 2000
//! min_content_length = 100
//!
//! [links]
//! min_selection_length = 10
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use quill_transport::ServiceConfig;
use serde::Deserialize;

/// Default quiet interval before an analysis request is issued.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(2000);

/// Default minimum content length, in characters, for an analysis request.
pub const DEFAULT_MIN_CONTENT_LENGTH: usize = 100;

/// Default minimum selection length, in characters, for a link query.
pub const DEFAULT_MIN_SELECTION_LENGTH: usize = 10;

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read {}: {source}", path.display())]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("invalid config: {0}")]
	Parse(#[from] toml::de::Error),
	#[error("invalid config: {0}")]
	Invalid(String),
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssistConfig {
	pub service: ServiceConfig,
	pub analysis: AnalysisConfig,
	pub links: LinkConfig,
}

/// Settings for the debounced analysis loop.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
	pub debounce_ms: u64,
	pub min_content_length: usize,
}

impl Default for AnalysisConfig {
	fn default() -> Self {
		Self {
			debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
			min_content_length: DEFAULT_MIN_CONTENT_LENGTH,
		}
	}
}

impl AnalysisConfig {
	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}
}

/// Settings for on-demand link suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinkConfig {
	pub min_selection_length: usize,
}

impl Default for LinkConfig {
	fn default() -> Self {
		Self {
			min_selection_length: DEFAULT_MIN_SELECTION_LENGTH,
		}
	}
}

impl AssistConfig {
	/// Reads and validates a TOML config file.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&text)
	}

	/// Parses and validates TOML text.
	pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(text)?;
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.service.timeout_ms == 0 {
			return Err(ConfigError::Invalid("service.timeout_ms must be positive".into()));
		}
		if self.service.base_url.trim().is_empty() {
			return Err(ConfigError::Invalid("service.base_url must not be empty".into()));
		}
		Ok(())
	}
}
