//! Loading configuration and graph data from the page.
//!
//! Data comes from an embedded `<script id="graph-data">` element when the
//! page provides one, otherwise it is fetched from `dataUrl`. Load failures
//! are reported once through a [`NoticeSink`] and nothing is mounted.

use leptos::prelude::*;
use log::{error, info, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlScriptElement, Response};

use super::config::GraphConfig;
use super::error::LoadError;
use super::types::Dataset;

/// Element id of embedded graph data.
pub const DATA_SCRIPT_ID: &str = "graph-data";
/// Element id of embedded configuration.
pub const CONFIG_SCRIPT_ID: &str = "graph-config";

/// Destination for user-facing failure notices.
pub trait NoticeSink {
	fn notify(&mut self, message: &str);
}

/// Browser notices: an `alert` dialog plus an on-page banner.
#[derive(Clone, Copy)]
pub struct BrowserNotice {
	banner: RwSignal<Option<String>>,
}

impl BrowserNotice {
	pub fn new(banner: RwSignal<Option<String>>) -> Self {
		Self { banner }
	}
}

impl NoticeSink for BrowserNotice {
	fn notify(&mut self, message: &str) {
		if let Some(window) = web_sys::window() {
			let _ = window.alert_with_message(message);
		}
		self.banner.set(Some(message.to_string()));
	}
}

/// Pass a loaded dataset through, or report the failure exactly once.
pub fn accept_dataset(result: Result<Dataset, LoadError>, sink: &mut dyn NoticeSink) -> Option<Dataset> {
	match result {
		Ok(dataset) => {
			info!(
				"knowledge-graph: loaded {} nodes, {} links, {} documents",
				dataset.graph.nodes.len(),
				dataset.graph.links.len(),
				dataset.documents.len()
			);
			Some(dataset)
		}
		Err(e) => {
			error!("knowledge-graph: failed to load graph data: {e}");
			sink.notify(&e.notice());
			None
		}
	}
}

/// Text of a `<script>` element, if the page has one with this id.
fn script_text(id: &str) -> Option<String> {
	let document = web_sys::window()?.document()?;
	let script: HtmlScriptElement = document.get_element_by_id(id)?.dyn_into().ok()?;
	script.text().ok()
}

/// Page configuration from `<script id="graph-config">`, else defaults.
pub fn load_config() -> GraphConfig {
	let Some(text) = script_text(CONFIG_SCRIPT_ID) else {
		return GraphConfig::default();
	};
	GraphConfig::from_json(&text).unwrap_or_else(|e| {
		warn!("knowledge-graph: invalid configuration, using defaults: {e}");
		GraphConfig::default()
	})
}

/// Embedded data if present, otherwise the file at `data_url`.
pub async fn load_dataset(data_url: &str) -> Result<Dataset, LoadError> {
	if let Some(text) = script_text(DATA_SCRIPT_ID) {
		info!("knowledge-graph: using embedded graph data");
		return Dataset::from_json(&text);
	}
	let text = fetch_text(data_url).await?;
	Dataset::from_json(&text)
}

async fn fetch_text(url: &str) -> Result<String, LoadError> {
	let window = web_sys::window().ok_or(LoadError::NoWindow)?;
	let response = JsFuture::from(window.fetch_with_str(url))
		.await
		.map_err(fetch_error)?;
	let response: Response = response.dyn_into().map_err(fetch_error)?;
	if !response.ok() {
		return Err(LoadError::Status {
			status: response.status(),
			url: url.to_string(),
		});
	}
	let body = JsFuture::from(response.text().map_err(fetch_error)?)
		.await
		.map_err(fetch_error)?;
	body.as_string()
		.ok_or_else(|| LoadError::Fetch("response body is not text".to_string()))
}

fn fetch_error(value: JsValue) -> LoadError {
	let message = value
		.dyn_ref::<js_sys::Error>()
		.map(|e| String::from(e.message()))
		.or_else(|| value.as_string())
		.unwrap_or_else(|| format!("{value:?}"));
	LoadError::Fetch(message)
}
