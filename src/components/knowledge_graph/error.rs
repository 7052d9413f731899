//! Failures that abort loading a knowledge graph.

use thiserror::Error;

/// Errors surfaced to the user while loading graph data.
///
/// Any of these aborts mounting: no partial graph is ever shown. Problems
/// inside otherwise valid data (dangling links, unknown categories) are not
/// errors; the model logs and skips them.
#[derive(Debug, Error)]
pub enum LoadError {
	/// The browser `window` is unavailable (not running in a page).
	#[error("no browser window available")]
	NoWindow,

	/// The request itself failed (network error, CORS, aborted).
	#[error("failed to fetch graph data: {0}")]
	Fetch(String),

	/// The server answered with a non-success status.
	#[error("HTTP error {status} for {url}")]
	Status { status: u16, url: String },

	/// The JSON document lacks a required top-level key.
	#[error("graph data is missing the `{0}` key")]
	MissingKey(&'static str),

	/// The JSON could not be parsed into the expected shape.
	#[error("graph data is malformed: {0}")]
	Malformed(#[from] serde_json::Error),
}

impl LoadError {
	/// Short user-facing notice for this failure.
	pub fn notice(&self) -> String {
		match self {
			LoadError::MissingKey(_) => {
				format!("Failed to load knowledge graph data: invalid data structure ({self}).")
			}
			_ => format!(
				"Failed to load knowledge graph data. Check that the data file exists and is valid JSON.\n{self}"
			),
		}
	}
}
