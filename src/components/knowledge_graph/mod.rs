//! Interactive knowledge graph visualization.
//!
//! Renders concept and document nodes on an HTML canvas with:
//! - Validated graph model with closed category classification
//! - Force-directed layout (link, charge, center and collision forces)
//! - Hover highlighting of one-hop neighborhoods with an info panel
//! - Node dragging, click-to-open documents, pan and zoom
//!
//! # Example
//!
//! ```ignore
//! use knowledge_graph::{Dataset, GraphConfig, KnowledgeGraphCanvas};
//!
//! let dataset = Dataset::from_json(json_text)?;
//! let data = RwSignal::new(Some(dataset));
//!
//! view! { <KnowledgeGraphCanvas data=data config=GraphConfig::default() fullscreen=true /> }
//! ```

pub mod category;
mod component;
pub mod config;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod loader;
pub mod model;
pub mod render;
mod state;
pub mod theme;
pub mod tooltip;
mod types;

pub use category::{Category, Shape};
pub use component::KnowledgeGraphCanvas;
pub use config::GraphConfig;
pub use error::LoadError;
pub use layout::ForceLayoutEngine;
pub use model::{DocumentIndex, GraphModel, NodeIndex};
pub use state::KnowledgeGraph;
pub use theme::Theme;
pub use types::{CategoryTag, Dataset, DocumentMeta, GraphData, GraphLink, GraphNode};
