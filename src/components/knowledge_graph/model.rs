//! Validated graph model: nodes, resolved links, degrees and classification.

use std::collections::HashMap;

use log::{debug, warn};

use super::category::{Category, Shape};
use super::config::GraphConfig;
use super::theme::Color;
use super::types::{DocumentMeta, GraphData};

/// Position of a node in [`GraphModel::nodes`] and in the layout engine.
pub type NodeIndex = usize;

/// A validated node with its derived display parameters.
#[derive(Clone, Debug)]
pub struct Node {
	pub id: String,
	pub label: String,
	pub category: Category,
	/// Explicit shape from the data, else the category's.
	pub shape: Shape,
	/// Number of links touching this node.
	pub degree: usize,
	/// Visual radius: base + degree / 2 + category bonus.
	pub radius: f64,
	pub fill: Color,
	pub info: Option<String>,
	pub pdf_path: Option<String>,
	/// Position given in the input data, if any.
	pub initial_position: Option<(f64, f64)>,
}

impl Node {
	pub fn stroke(&self) -> Color {
		self.fill.darken(0.35)
	}

	pub fn highlight_stroke(&self) -> Color {
		self.fill.lighten(0.6)
	}
}

/// A link whose endpoints have been resolved to existing nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
	pub source: NodeIndex,
	pub target: NodeIndex,
	pub relation: Option<String>,
}

impl Link {
	pub fn touches(&self, idx: NodeIndex) -> bool {
		self.source == idx || self.target == idx
	}
}

/// Nodes and links after validation.
///
/// Every link refers to an existing node; dangling links, self-loops and
/// duplicate node ids were dropped with a warning during [`GraphModel::build`].
#[derive(Clone, Debug, Default)]
pub struct GraphModel {
	nodes: Vec<Node>,
	links: Vec<Link>,
	id_to_idx: HashMap<String, NodeIndex>,
	adjacency: Vec<Vec<NodeIndex>>,
	skipped_links: usize,
}

/// Count incident links per node.
pub fn degrees(links: &[Link], node_count: usize) -> Vec<usize> {
	let mut degree = vec![0; node_count];
	for link in links {
		degree[link.source] += 1;
		degree[link.target] += 1;
	}
	degree
}

impl GraphModel {
	pub fn build(data: &GraphData, config: &GraphConfig) -> Self {
		let mut id_to_idx = HashMap::with_capacity(data.nodes.len());
		let mut raw_nodes = Vec::with_capacity(data.nodes.len());

		for raw in &data.nodes {
			if id_to_idx.contains_key(&raw.id) {
				warn!("knowledge-graph: duplicate node id `{}`, keeping the first", raw.id);
				continue;
			}
			id_to_idx.insert(raw.id.clone(), raw_nodes.len());
			raw_nodes.push(raw);
		}

		let mut links = Vec::with_capacity(data.links.len());
		let mut skipped_links = 0;
		for raw in &data.links {
			let (source, target) = match (id_to_idx.get(&raw.source), id_to_idx.get(&raw.target)) {
				(Some(&s), Some(&t)) => (s, t),
				(s, _) => {
					let missing = if s.is_none() { &raw.source } else { &raw.target };
					warn!(
						"knowledge-graph: dropping link {} -> {}: unknown node `{}`",
						raw.source, raw.target, missing
					);
					skipped_links += 1;
					continue;
				}
			};
			if source == target {
				warn!("knowledge-graph: dropping self-loop on `{}`", raw.source);
				skipped_links += 1;
				continue;
			}
			links.push(Link {
				source,
				target,
				relation: raw.relation.clone(),
			});
		}

		let degree = degrees(&links, raw_nodes.len());
		let mut adjacency = vec![Vec::new(); raw_nodes.len()];
		for link in &links {
			adjacency[link.source].push(link.target);
			adjacency[link.target].push(link.source);
		}

		let nodes = raw_nodes
			.into_iter()
			.enumerate()
			.map(|(idx, raw)| {
				let category = match raw.category_tag() {
					Some(tag) => Category::from_tag(tag).unwrap_or_else(|err| {
						warn!("knowledge-graph: node `{}`: {err}", raw.id);
						Category::Unclassified
					}),
					None => {
						warn!("knowledge-graph: node `{}` has no category", raw.id);
						Category::Unclassified
					}
				};
				let visual = category.visual();
				let fill = raw
					.color
					.as_deref()
					.and_then(|css| {
						let parsed = Color::parse(css);
						if parsed.is_none() {
							warn!("knowledge-graph: node `{}` has invalid color `{css}`", raw.id);
						}
						parsed
					})
					.unwrap_or_else(|| config.category_color(category));
				let shape = match raw.shape.as_deref() {
					Some(name) => name.parse().unwrap_or_else(|err| {
						warn!("knowledge-graph: node `{}`: {err}", raw.id);
						visual.shape
					}),
					None => visual.shape,
				};
				let base = raw.radius.unwrap_or(config.node_base_radius);

				Node {
					id: raw.id.clone(),
					label: raw.display_label().to_string(),
					category,
					shape,
					degree: degree[idx],
					radius: base + degree[idx] as f64 / 2.0 + visual.radius_bonus,
					fill,
					info: raw.info.clone(),
					pdf_path: raw.pdf_path.clone(),
					initial_position: raw.x.zip(raw.y),
				}
			})
			.collect::<Vec<_>>();

		debug!(
			"knowledge-graph: model built with {} nodes, {} links ({} skipped)",
			nodes.len(),
			links.len(),
			skipped_links
		);

		Self {
			nodes,
			links,
			id_to_idx,
			adjacency,
			skipped_links,
		}
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn links(&self) -> &[Link] {
		&self.links
	}

	pub fn node(&self, idx: NodeIndex) -> &Node {
		&self.nodes[idx]
	}

	pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
		self.id_to_idx.get(id).copied()
	}

	/// Direct (one hop) neighbors of a node.
	pub fn neighbors(&self, idx: NodeIndex) -> &[NodeIndex] {
		&self.adjacency[idx]
	}

	pub fn degree(&self, idx: NodeIndex) -> usize {
		self.nodes[idx].degree
	}

	/// Number of input links dropped as dangling or self-referencing.
	pub fn skipped_links(&self) -> usize {
		self.skipped_links
	}

	/// Nodes whose category tag was missing or unknown.
	pub fn unclassified(&self) -> impl Iterator<Item = NodeIndex> + '_ {
		self.nodes
			.iter()
			.enumerate()
			.filter(|(_, n)| n.category == Category::Unclassified)
			.map(|(i, _)| i)
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// Document metadata keyed by node id.
#[derive(Clone, Debug, Default)]
pub struct DocumentIndex {
	docs: HashMap<String, DocumentMeta>,
}

impl DocumentIndex {
	pub fn new(documents: &[DocumentMeta]) -> Self {
		let mut docs = HashMap::with_capacity(documents.len());
		for doc in documents {
			if docs.insert(doc.id.clone(), doc.clone()).is_some() {
				warn!("knowledge-graph: duplicate document id `{}`, keeping the last", doc.id);
			}
		}
		Self { docs }
	}

	pub fn get(&self, id: &str) -> Option<&DocumentMeta> {
		self.docs.get(id)
	}

	/// Path to open for a node: its own `pdfPath`, else the document's `path`,
	/// else `base_path/filename`.
	pub fn resolve_path(&self, node: &Node, base_path: &str) -> Option<String> {
		if let Some(path) = node.pdf_path.as_deref().filter(|p| !p.is_empty()) {
			return Some(path.to_string());
		}
		let doc = self.get(&node.id)?;
		if let Some(path) = doc.path.as_deref().filter(|p| !p.is_empty()) {
			return Some(path.to_string());
		}
		let filename = doc.filename.as_deref().filter(|f| !f.is_empty())?;
		Some(format!("{}/{}", base_path.trim_end_matches('/'), filename))
	}
}
