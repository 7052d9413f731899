//! Per-frame projection and canvas drawing.
//!
//! [`Frame::project`] turns the current layout and highlight state into a
//! flat list of draw primitives without touching the DOM; [`draw`] paints a
//! frame onto a 2D canvas context. Drawing order:
//! 1. Background gradient (screen space)
//! 2. Links, dimmed first, highlighted on top (graph space)
//! 3. Nodes in the same order, then labels
//! 4. Vignette (screen space)

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::category::Shape;
use super::interaction::ViewTransform;
use super::model::NodeIndex;
use super::state::KnowledgeGraph;
use super::theme::{Color, Theme};

/// Ease values that would otherwise change abruptly.
pub(super) fn smooth_step(t: f64) -> f64 {
	let t = t.clamp(0.0, 1.0);
	t * t * (3.0 - 2.0 * t)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
	a + (b - a) * t
}

/// A link ready to stroke.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkSegment {
	pub from: (f64, f64),
	pub to: (f64, f64),
	pub source_color: Color,
	pub target_color: Color,
	pub opacity: f64,
	pub width: f64,
	/// Eased highlight level, `0.0..=1.0`.
	pub highlight: f64,
}

/// A node ready to fill.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSprite {
	pub index: NodeIndex,
	pub position: (f64, f64),
	pub radius: f64,
	pub shape: Shape,
	pub fill: Color,
	pub stroke: Color,
	pub stroke_width: f64,
	pub opacity: f64,
	pub label: String,
	/// Eased highlight level, `0.0..=1.0`.
	pub highlight: f64,
}

/// Draw primitives for one animation frame, in graph coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
	pub links: Vec<LinkSegment>,
	pub nodes: Vec<NodeSprite>,
	/// Dash offset of flowing links.
	pub dash_offset: f64,
}

impl Frame {
	pub fn project(graph: &KnowledgeGraph) -> Self {
		let config = graph.config();
		let model = graph.model();
		let engine = graph.engine();
		let highlight = graph.highlight();
		let dim = smooth_step(highlight.dim_level());

		let link_base = lerp(config.link_opacity, config.dimmed_link_opacity, dim);
		let links = model
			.links()
			.iter()
			.map(|link| {
				let t = smooth_step(highlight.link_intensity(link));
				LinkSegment {
					from: engine.position(link.source),
					to: engine.position(link.target),
					source_color: model.node(link.source).fill,
					target_color: model.node(link.target).fill,
					opacity: lerp(link_base, config.link_highlight_opacity, t),
					width: lerp(config.link_stroke_width, config.link_highlight_stroke_width, t),
					highlight: t,
				}
			})
			.collect();

		let node_base = lerp(1.0, config.dimmed_node_opacity, dim);
		let nodes = model
			.nodes()
			.iter()
			.enumerate()
			.map(|(idx, node)| {
				let t = smooth_step(highlight.node_intensity(idx));
				let ring = smooth_step(highlight.focus_intensity(idx));
				NodeSprite {
					index: idx,
					position: engine.position(idx),
					radius: graph.drawn_radius(idx),
					shape: node.shape,
					fill: node.fill,
					stroke: node.stroke().lerp(node.highlight_stroke(), ring),
					stroke_width: lerp(config.node_stroke_width, config.node_highlight_stroke_width, ring),
					opacity: lerp(node_base, 1.0, t),
					label: node.label.clone(),
					highlight: t,
				}
			})
			.collect();

		let link_style = &graph.theme().link;
		let dash_offset = match link_style.dash {
			Some((dash, gap)) => -(graph.flow_time() * link_style.flow_speed) % (dash + gap),
			None => 0.0,
		};

		Self {
			links,
			nodes,
			dash_offset,
		}
	}
}

/// Paint a frame onto the canvas.
pub fn draw(
	frame: &Frame,
	ctx: &CanvasRenderingContext2d,
	transform: &ViewTransform,
	theme: &Theme,
	viewport: (f64, f64),
) {
	draw_background(ctx, theme, viewport);

	ctx.save();
	let _ = ctx.translate(transform.x, transform.y);
	let _ = ctx.scale(transform.k, transform.k);

	draw_links(frame, ctx, theme);
	draw_nodes(frame, ctx);
	draw_labels(frame, ctx, theme);

	ctx.restore();

	if theme.background.vignette > 0.0 {
		draw_vignette(ctx, theme, viewport);
	}
}

fn draw_background(ctx: &CanvasRenderingContext2d, theme: &Theme, (w, h): (f64, f64)) {
	let gradient = theme
		.background
		.use_gradient
		.then(|| ctx.create_radial_gradient(w / 2.0, h / 2.0, 0.0, w / 2.0, h / 2.0, w.max(h) * 0.8).ok())
		.flatten();

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &theme.background.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &theme.background.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&theme.background.color.to_css()),
	}
	ctx.fill_rect(0.0, 0.0, w, h);
}

fn draw_vignette(ctx: &CanvasRenderingContext2d, theme: &Theme, (w, h): (f64, f64)) {
	let Ok(gradient) =
		ctx.create_radial_gradient(w / 2.0, h / 2.0, w.min(h) * 0.3, w / 2.0, h / 2.0, w.max(h) * 0.7)
	else {
		return;
	};
	let _ = gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)");
	let _ = gradient.add_color_stop(1.0, &Color::rgba(0, 0, 0, theme.background.vignette).to_css());
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, w, h);
}

fn draw_links(frame: &Frame, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	match theme.link.dash {
		Some((dash, gap)) => {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(dash),
				&JsValue::from_f64(gap),
			));
			ctx.set_line_dash_offset(frame.dash_offset);
		}
		None => {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}
	}

	// Dimmed links first so highlighted ones stay on top.
	let (highlighted, rest): (Vec<&LinkSegment>, Vec<&LinkSegment>) =
		frame.links.iter().partition(|l| l.highlight > 0.01);
	for link in rest.into_iter().chain(highlighted) {
		draw_link(ctx, theme, link);
	}

	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_link(ctx: &CanvasRenderingContext2d, theme: &Theme, link: &LinkSegment) {
	let ((x1, y1), (x2, y2)) = (link.from, link.to);
	if (x2 - x1).hypot(y2 - y1) < 0.001 || link.opacity < 0.005 {
		return;
	}

	let gradient = theme
		.link
		.gradient
		.then(|| ctx.create_linear_gradient(x1, y1, x2, y2));
	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &link.source_color.to_css());
			let _ = gradient.add_color_stop(1.0, &link.target_color.to_css());
			#[allow(deprecated)]
			ctx.set_stroke_style(&gradient);
		}
		None => ctx.set_stroke_style_str(&theme.link.color.to_css()),
	}

	ctx.set_global_alpha(link.opacity);
	ctx.set_line_width(link.width);
	ctx.begin_path();
	ctx.move_to(x1, y1);
	ctx.line_to(x2, y2);
	ctx.stroke();
	ctx.set_global_alpha(1.0);
}

fn trace_shape(ctx: &CanvasRenderingContext2d, shape: Shape, (x, y): (f64, f64), radius: f64) {
	ctx.begin_path();
	match shape.outline(radius) {
		None => {
			let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		}
		Some(points) => {
			let mut points = points.into_iter();
			if let Some((px, py)) = points.next() {
				ctx.move_to(x + px, y + py);
			}
			for (px, py) in points {
				ctx.line_to(x + px, y + py);
			}
			ctx.close_path();
		}
	}
}

fn draw_nodes(frame: &Frame, ctx: &CanvasRenderingContext2d) {
	let (highlighted, rest): (Vec<&NodeSprite>, Vec<&NodeSprite>) =
		frame.nodes.iter().partition(|n| n.highlight > 0.001);

	for node in rest.into_iter().chain(highlighted) {
		ctx.set_global_alpha(node.opacity);
		trace_shape(ctx, node.shape, node.position, node.radius);
		ctx.set_fill_style_str(&node.fill.to_css());
		ctx.fill();
		ctx.set_stroke_style_str(&node.stroke.to_css());
		ctx.set_line_width(node.stroke_width);
		ctx.stroke();
	}
	ctx.set_global_alpha(1.0);
}

fn draw_labels(frame: &Frame, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let style = &theme.label;
	ctx.set_font(&format!("bold {}px sans-serif", style.size));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_fill_style_str(&style.color.to_css());
	if style.shadow_blur > 0.0 {
		ctx.set_shadow_blur(style.shadow_blur);
		ctx.set_shadow_color("rgba(0, 0, 0, 0.9)");
	}

	for node in &frame.nodes {
		if node.label.is_empty() {
			continue;
		}
		let (x, y) = node.position;
		ctx.set_global_alpha(node.opacity);
		let _ = ctx.fill_text(&node.label, x, y + node.radius + style.offset);
	}

	ctx.set_global_alpha(1.0);
	ctx.set_shadow_blur(0.0);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::knowledge_graph::config::GraphConfig;
	use crate::components::knowledge_graph::types::Dataset;

	const DATA: &str = r#"{
		"documents": [],
		"graph": {
			"nodes": [
				{"id": "a", "type": "ML", "x": 100, "y": 100},
				{"id": "b", "type": "CV", "x": 300, "y": 100},
				{"id": "c", "type": "concept", "x": 500, "y": 100},
				{"id": "d", "type": "concept", "x": 700, "y": 100}
			],
			"links": [
				{"source": "a", "target": "b"},
				{"source": "b", "target": "c"},
				{"source": "c", "target": "d"},
				{"source": "a", "target": "nowhere"},
				{"source": "ghost", "target": "d"}
			]
		}
	}"#;

	fn graph() -> KnowledgeGraph {
		let dataset = Dataset::from_json(DATA).unwrap();
		KnowledgeGraph::mount(GraphConfig::default(), &dataset, (800.0, 200.0))
	}

	#[test]
	fn test_dangling_links_never_reach_the_frame() {
		let mut g = graph();
		for _ in 0..20 {
			g.tick(0.016);
		}
		let frame = Frame::project(&g);
		assert_eq!(frame.links.len(), 3);
		assert_eq!(frame.nodes.len(), 4);
		for (segment, link) in frame.links.iter().zip(g.model().links()) {
			assert_eq!(segment.from, frame.nodes[link.source].position);
			assert_eq!(segment.to, frame.nodes[link.target].position);
		}
	}

	#[test]
	fn test_resting_frame_is_undimmed() {
		let g = graph();
		let frame = Frame::project(&g);
		let config = g.config();
		assert!(frame.nodes.iter().all(|n| n.opacity == 1.0));
		assert!(frame.nodes.iter().all(|n| n.stroke_width == config.node_stroke_width));
		assert!(frame.links.iter().all(|l| l.opacity == config.link_opacity));
		assert_eq!(frame.nodes[1].shape, Shape::Star);
		assert_eq!(frame.nodes[0].label, "a");
	}

	#[test]
	fn test_hover_dims_outside_neighborhood() {
		let mut g = graph();
		g.pointer_move((100.0, 100.0));
		for _ in 0..120 {
			g.tick(0.016);
		}
		let frame = Frame::project(&g);
		let config = g.config();

		let focused = &frame.nodes[0];
		assert!((focused.opacity - 1.0).abs() < 0.01);
		assert!((focused.radius - (g.model().node(0).radius + config.node_highlight_radius_increase)).abs() < 0.01);
		assert!((focused.stroke_width - config.node_highlight_stroke_width).abs() < 0.01);
		assert!((frame.nodes[1].opacity - 1.0).abs() < 0.01);
		assert!((frame.nodes[3].opacity - config.dimmed_node_opacity).abs() < 0.01);

		assert!((frame.links[0].opacity - config.link_highlight_opacity).abs() < 0.01);
		assert!((frame.links[0].width - config.link_highlight_stroke_width).abs() < 0.01);
		assert!((frame.links[2].opacity - config.dimmed_link_opacity).abs() < 0.01);
	}

	#[test]
	fn test_dash_offset_wraps() {
		let mut g = graph();
		for _ in 0..500 {
			g.tick(0.016);
		}
		let frame = Frame::project(&g);
		assert!(frame.dash_offset <= 0.0 && frame.dash_offset > -25.0);
	}
}
