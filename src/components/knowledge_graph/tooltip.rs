//! Info panel shown while a node is hovered.

use leptos::prelude::*;

use super::model::{DocumentIndex, Node};

/// What the panel shows for a node.
#[derive(Clone, Debug, PartialEq)]
pub enum TooltipContent {
	/// A node backed by document metadata.
	Document {
		title: String,
		filename: String,
		summary: String,
		keywords: String,
		/// Document to open, when resolvable.
		link: Option<String>,
	},
	/// A concept node with its own description.
	Concept {
		title: String,
		info: String,
		has_document: bool,
	},
}

impl TooltipContent {
	/// Panel content for a node, or `None` when there is nothing to show.
	pub fn for_node(node: &Node, docs: &DocumentIndex, base_path: &str) -> Option<Self> {
		let link = docs.resolve_path(node, base_path);
		if let Some(doc) = docs.get(&node.id) {
			let filename = doc
				.filename
				.clone()
				.filter(|f| !f.is_empty())
				.unwrap_or_else(|| "N/A".to_string());
			let keywords = if doc.keywords.is_empty() {
				"none".to_string()
			} else {
				doc.keywords.join(", ")
			};
			return Some(TooltipContent::Document {
				title: doc.title.clone(),
				filename,
				summary: doc.summary.clone(),
				keywords,
				link,
			});
		}
		node.info.as_ref().map(|info| TooltipContent::Concept {
			title: node.label.clone(),
			info: info.clone(),
			has_document: link.is_some(),
		})
	}
}

/// Panel content anchored at a pointer position (canvas coordinates).
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipPanel {
	pub content: TooltipContent,
	pub anchor: (f64, f64),
	/// Gap between pointer and panel.
	pub offset: f64,
}

/// Top-left corner for a panel of `size` near `anchor`.
///
/// The panel goes below-right of the pointer, flips to the other side on an
/// axis where it would overflow `bounds`, and is finally clamped inside them.
pub fn place_panel(anchor: (f64, f64), size: (f64, f64), bounds: (f64, f64), offset: f64) -> (f64, f64) {
	let axis = |a: f64, len: f64, limit: f64| {
		let mut v = a + offset;
		if v + len > limit {
			v = a - len - offset;
		}
		v.min(limit - len).max(0.0)
	};
	(
		axis(anchor.0, size.0, bounds.0),
		axis(anchor.1, size.1, bounds.1),
	)
}

fn content_view(content: TooltipContent) -> AnyView {
	match content {
		TooltipContent::Document {
			title,
			filename,
			summary,
			keywords,
			link,
		} => view! {
			<h3 class="tooltip-title">{title}</h3>
			<p class="tooltip-filename">{filename}</p>
			<p class="tooltip-abstract">{summary}</p>
			<p class="tooltip-keywords">{keywords}</p>
			{link.map(|href| view! {
				<a class="tooltip-link" href=href target="_blank">"Open PDF"</a>
			})}
		}
		.into_any(),
		TooltipContent::Concept {
			title,
			info,
			has_document,
		} => view! {
			<strong class="tooltip-title">{title}</strong>
			<p class="tooltip-info">{info}</p>
			{has_document.then(|| view! {
				<span class="tooltip-hint">"Click to open the related document"</span>
			})}
		}
		.into_any(),
	}
}

/// Floating info panel, positioned inside `bounds` next to its anchor.
#[component]
pub fn DocumentTooltip(
	#[prop(into)] panel: Signal<Option<TooltipPanel>>,
	#[prop(into)] bounds: Signal<(f64, f64)>,
) -> impl IntoView {
	let panel_ref = NodeRef::<leptos::html::Div>::new();
	let size = RwSignal::new((0.0, 0.0));

	// Re-measure once the new content is in the DOM.
	Effect::new(move |_| {
		panel.track();
		if let Some(el) = panel_ref.get() {
			size.set((el.offset_width() as f64, el.offset_height() as f64));
		}
	});

	let position = Memo::new(move |_| {
		panel.with(|p| {
			p.as_ref()
				.map(|p| place_panel(p.anchor, size.get(), bounds.get(), p.offset))
				.unwrap_or((0.0, 0.0))
		})
	});

	view! {
		<div
			node_ref=panel_ref
			class="tooltip"
			class:active=move || panel.with(Option::is_some)
			style:position="absolute"
			style:left=move || format!("{}px", position.get().0)
			style:top=move || format!("{}px", position.get().1)
		>
			{move || panel.get().map(|p| content_view(p.content))}
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::knowledge_graph::config::GraphConfig;
	use crate::components::knowledge_graph::model::GraphModel;
	use crate::components::knowledge_graph::types::{CategoryTag, DocumentMeta, GraphData, GraphNode};

	#[test]
	fn test_panel_sits_below_right() {
		assert_eq!(place_panel((100.0, 100.0), (200.0, 80.0), (800.0, 600.0), 20.0), (120.0, 120.0));
	}

	#[test]
	fn test_panel_flips_near_edges() {
		let (x, y) = place_panel((700.0, 550.0), (200.0, 80.0), (800.0, 600.0), 20.0);
		assert_eq!((x, y), (480.0, 450.0));
	}

	#[test]
	fn test_panel_clamped_inside_bounds() {
		// Too wide to fit on either side of the pointer.
		let (x, y) = place_panel((50.0, 10.0), (780.0, 50.0), (800.0, 600.0), 20.0);
		assert!(x >= 0.0 && x + 780.0 <= 800.0);
		assert_eq!(y, 30.0);
		// Larger than the bounds: pinned to the top-left corner.
		assert_eq!(place_panel((400.0, 300.0), (900.0, 700.0), (800.0, 600.0), 20.0), (0.0, 0.0));
	}

	fn model() -> GraphModel {
		let data = GraphData {
			nodes: vec![
				GraphNode {
					id: "doc_000".into(),
					label: Some("Paper".into()),
					kind: Some(CategoryTag::Name("document".into())),
					..Default::default()
				},
				GraphNode {
					id: "rl".into(),
					name: Some("Reinforcement Learning".into()),
					category: Some(CategoryTag::Number(2)),
					info: Some("Agents maximise reward.".into()),
					pdf_path: Some("pdfs/rl.pdf".into()),
					..Default::default()
				},
				GraphNode {
					id: "bare".into(),
					kind: Some(CategoryTag::Name("concept".into())),
					..Default::default()
				},
			],
			links: vec![],
		};
		GraphModel::build(&data, &GraphConfig::default())
	}

	#[test]
	fn test_document_content() {
		let docs = DocumentIndex::new(&[DocumentMeta {
			id: "doc_000".into(),
			title: "Paper".into(),
			filename: Some("paper.pdf".into()),
			summary: "Abstract text".into(),
			keywords: vec!["AI".into(), "graphs".into()],
			path: None,
		}]);
		let m = model();
		let content = TooltipContent::for_node(m.node(0), &docs, "../data/pdfs").unwrap();
		assert_eq!(
			content,
			TooltipContent::Document {
				title: "Paper".into(),
				filename: "paper.pdf".into(),
				summary: "Abstract text".into(),
				keywords: "AI, graphs".into(),
				link: Some("../data/pdfs/paper.pdf".into()),
			}
		);
	}

	#[test]
	fn test_document_placeholders() {
		let docs = DocumentIndex::new(&[DocumentMeta {
			id: "doc_000".into(),
			title: "Paper".into(),
			..Default::default()
		}]);
		let m = model();
		match TooltipContent::for_node(m.node(0), &docs, "").unwrap() {
			TooltipContent::Document {
				filename,
				keywords,
				link,
				..
			} => {
				assert_eq!(filename, "N/A");
				assert_eq!(keywords, "none");
				assert_eq!(link, None);
			}
			other => panic!("unexpected content {other:?}"),
		}
	}

	#[test]
	fn test_concept_content_and_absence() {
		let docs = DocumentIndex::default();
		let m = model();
		assert_eq!(
			TooltipContent::for_node(m.node(1), &docs, ""),
			Some(TooltipContent::Concept {
				title: "Reinforcement Learning".into(),
				info: "Agents maximise reward.".into(),
				has_document: true,
			})
		);
		assert_eq!(TooltipContent::for_node(m.node(2), &docs, ""), None);
	}
}
