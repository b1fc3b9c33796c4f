use serde::Deserialize;

use crate::{Error, Result};

/// Normalized response envelope returned by every service endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
	pub success: bool,
	pub data: Option<T>,
	#[serde(default)]
	pub error: Option<String>,
}

impl<T> Envelope<T> {
	/// Collapses the envelope into a result.
	///
	/// `success: false` becomes [`Error::Remote`] carrying the service's message,
	/// `success: true` without data becomes [`Error::MissingData`].
	pub fn into_result(self) -> Result<T> {
		match (self.success, self.data) {
			(true, Some(data)) => Ok(data),
			(true, None) => Err(Error::MissingData),
			(false, _) => Err(Error::Remote(
				self.error
					.filter(|message| !message.is_empty())
					.unwrap_or_else(|| "request failed".to_string()),
			)),
		}
	}
}
