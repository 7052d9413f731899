//! Input data structures, as they appear in the graph data JSON.

use serde::Deserialize;
use serde_json::Value;

use super::error::LoadError;

/// Category tag on a raw node: either a name ("ML", "document") or one of the
/// numeric categories 1..5.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CategoryTag {
	Number(u32),
	Name(String),
}

/// A node in the input graph.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
	/// Unique identifier for this node. Used to reference nodes in links.
	pub id: String,
	/// Display label.
	pub label: Option<String>,
	/// Alternative display label used by hand-written concept data.
	pub name: Option<String>,
	/// Category tag, e.g. "ML", "concept" or "document".
	#[serde(rename = "type")]
	pub kind: Option<CategoryTag>,
	/// Fallback category tag.
	pub group: Option<CategoryTag>,
	/// Numeric category (1 = ML .. 5 = CV).
	pub category: Option<CategoryTag>,
	/// Short description shown in the tooltip.
	pub info: Option<String>,
	/// Direct path to an associated document.
	pub pdf_path: Option<String>,
	/// Explicit base radius, overriding `nodeBaseRadius`.
	pub radius: Option<f64>,
	/// Optional CSS color override.
	pub color: Option<String>,
	/// Shape name ("circle", "square", "triangle", "diamond", "star"),
	/// overriding the category's shape.
	pub shape: Option<String>,
	/// Initial position.
	pub x: Option<f64>,
	pub y: Option<f64>,
}

impl GraphNode {
	/// The label to render: `label`, then `name`, then the id.
	pub fn display_label(&self) -> &str {
		self.label
			.as_deref()
			.or(self.name.as_deref())
			.unwrap_or(&self.id)
	}

	/// The first category tag present, in `type` > `group` > `category` order.
	pub fn category_tag(&self) -> Option<&CategoryTag> {
		self.kind
			.as_ref()
			.or(self.group.as_ref())
			.or(self.category.as_ref())
	}
}

/// An edge between two nodes, referencing them by id.
///
/// Links stay in this raw form only until the model resolves them to node
/// indices; see [`super::model::Link`].
#[derive(Clone, Debug, Deserialize)]
pub struct GraphLink {
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
	/// Optional relation label.
	#[serde(rename = "type", default)]
	pub relation: Option<String>,
}

/// Nodes and links of the graph.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	#[serde(default)]
	pub links: Vec<GraphLink>,
}

/// Metadata for a document, joined to graph nodes by id.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct DocumentMeta {
	pub id: String,
	#[serde(default)]
	pub title: String,
	pub filename: Option<String>,
	#[serde(rename = "abstract", default)]
	pub summary: String,
	#[serde(default)]
	pub keywords: Vec<String>,
	/// Explicit path to the document, relative to the page.
	pub path: Option<String>,
}

/// The complete data file: document metadata plus the graph.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Dataset {
	pub documents: Vec<DocumentMeta>,
	pub graph: GraphData,
}

impl Dataset {
	/// Parse a data file, rejecting documents without `graph` or `documents`.
	pub fn from_json(text: &str) -> Result<Self, LoadError> {
		let value: Value = serde_json::from_str(text)?;
		for key in ["graph", "documents"] {
			if value.get(key).is_none_or(Value::is_null) {
				return Err(LoadError::MissingKey(key));
			}
		}
		Ok(serde_json::from_value(value)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_document_dataset() {
		let json = r#"{
			"documents": [{
				"id": "doc_000",
				"filename": "paper.pdf",
				"title": "Paper",
				"abstract": "About things...",
				"keywords": ["AI"],
				"path": "../data/pdfs/paper.pdf"
			}],
			"graph": {
				"nodes": [{"id": "doc_000", "label": "Paper", "type": "document"}],
				"links": []
			}
		}"#;

		let data = Dataset::from_json(json).unwrap();
		assert_eq!(data.documents.len(), 1);
		assert_eq!(data.documents[0].summary, "About things...");
		assert_eq!(data.graph.nodes.len(), 1);
		assert_eq!(
			data.graph.nodes[0].category_tag(),
			Some(&CategoryTag::Name("document".into()))
		);
	}

	#[test]
	fn test_parse_concept_style_nodes() {
		let json = r#"{
			"documents": [],
			"graph": {
				"nodes": [{"id": "ml", "name": "Machine Learning", "category": 1,
					"pdfPath": "pdfs/ml.pdf", "radius": 25, "shape": "star"}],
				"links": [{"source": "ml", "target": "ml2", "type": "related"}]
			}
		}"#;

		let data = Dataset::from_json(json).unwrap();
		let node = &data.graph.nodes[0];
		assert_eq!(node.display_label(), "Machine Learning");
		assert_eq!(node.category_tag(), Some(&CategoryTag::Number(1)));
		assert_eq!(node.pdf_path.as_deref(), Some("pdfs/ml.pdf"));
		assert_eq!(node.shape.as_deref(), Some("star"));
		assert_eq!(data.graph.links[0].relation.as_deref(), Some("related"));
	}

	#[test]
	fn test_missing_keys_are_rejected() {
		assert!(matches!(
			Dataset::from_json("{}"),
			Err(LoadError::MissingKey("graph"))
		));
		assert!(matches!(
			Dataset::from_json(r#"{"graph": {"nodes": []}}"#),
			Err(LoadError::MissingKey("documents"))
		));
	}

	#[test]
	fn test_invalid_json_is_malformed() {
		assert!(matches!(
			Dataset::from_json("not json"),
			Err(LoadError::Malformed(_))
		));
		assert!(matches!(
			Dataset::from_json(r#"{"graph": 3, "documents": []}"#),
			Err(LoadError::Malformed(_))
		));
	}

	#[test]
	fn test_graph_without_links_defaults_empty() {
		let data = Dataset::from_json(r#"{"graph": {}, "documents": []}"#).unwrap();
		assert!(data.graph.nodes.is_empty());
		assert!(data.graph.links.is_empty());
	}
}
