//! knowledge-graph: Interactive force-directed map of concepts and documents.
//!
//! This crate provides a WASM-based visualization that loads a document
//! knowledge graph, lays it out with a force simulation and lets the user
//! explore it with hover highlighting, dragging, pan/zoom and click-through
//! to the underlying documents.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_meta::*;
use log::{Level, info};

pub mod components;

pub use components::knowledge_graph::{
	Dataset, GraphConfig, GraphData, GraphLink, GraphNode, KnowledgeGraph, KnowledgeGraphCanvas,
	LoadError,
};

use components::knowledge_graph::loader::{self, BrowserNotice};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("knowledge-graph: logging initialized");
}

/// Main application component.
/// Loads configuration and graph data, then renders the visualization.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = loader::load_config();
	let dataset = RwSignal::new(None::<Dataset>);
	let notice = RwSignal::new(None::<String>);

	let data_url = config.data_url.clone();
	spawn_local(async move {
		let result = loader::load_dataset(&data_url).await;
		let mut sink = BrowserNotice::new(notice);
		if let Some(loaded) = loader::accept_dataset(result, &mut sink) {
			dataset.set(Some(loaded));
		}
	});

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Knowledge Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<KnowledgeGraphCanvas data=dataset config=config fullscreen=true />
			<div class="graph-overlay">
				<h1>"Knowledge Graph"</h1>
				<p class="subtitle">"Hover to explore. Click a node to open its document. Drag nodes, drag the background to pan, scroll to zoom."</p>
			</div>
			{move || notice.get().map(|message| view! { <div class="error-banner" role="alert">{message}</div> })}
		</div>
	}
}
