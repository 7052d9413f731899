//! Pointer interaction: hover highlighting, node dragging, click navigation,
//! pan and zoom.
//!
//! Input arrives as [`InteractionEvent`]s that already carry the node under
//! the pointer. [`InteractionController::handle`] is the single transition
//! function; it mutates the layout and view through an
//! [`InteractionContext`] and returns the browser-facing [`Effect`]s for the
//! caller to perform.

use std::collections::{HashMap, HashSet};

use log::debug;

use super::config::GraphConfig;
use super::layout::ForceLayoutEngine;
use super::model::{DocumentIndex, GraphModel, Link, NodeIndex};
use super::tooltip::TooltipContent;

/// Pointer travel (screen pixels) below which a press still counts as a click.
pub const CLICK_TOLERANCE: f64 = 3.0;

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn screen_to_graph(&self, (sx, sy): (f64, f64)) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	pub fn graph_to_screen(&self, (gx, gy): (f64, f64)) -> (f64, f64) {
		(gx * self.k + self.x, gy * self.k + self.y)
	}

	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		self.x += dx;
		self.y += dy;
	}

	/// Scale by `factor` keeping the graph point under `anchor` fixed on
	/// screen. The resulting zoom is kept within `extent`.
	pub fn zoom_at(&mut self, anchor: (f64, f64), factor: f64, (min, max): (f64, f64)) {
		let new_k = (self.k * factor).max(min).min(max);
		let ratio = new_k / self.k;
		self.x = anchor.0 - (anchor.0 - self.x) * ratio;
		self.y = anchor.1 - (anchor.1 - self.y) * ratio;
		self.k = new_k;
	}
}

/// Discrete highlight role of a node or link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
	/// Nothing is focused.
	Neutral,
	/// The hovered node.
	Focused,
	/// A one-hop neighbor of the focus, or a link touching it.
	Related,
	/// Everything else while something is focused.
	Dimmed,
}

impl Emphasis {
	pub fn is_highlighted(self) -> bool {
		matches!(self, Emphasis::Focused | Emphasis::Related)
	}
}

/// Minimum time (seconds) a highlight is held before it can fade out.
/// Prevents flashing when the pointer only skirts a node.
const MIN_HOLD_TIME: f64 = 0.12;
const FADE_IN_SPEED: f64 = 6.0;
const FADE_OUT_SPEED: f64 = 4.0;

/// Focus highlight with eased per-node intensities.
///
/// The discrete target (which node is focused and which are its neighbors)
/// changes instantly; each node's intensity in `0.0..=1.0` follows it with
/// exponential smoothing, `v += (target - v) * (1 - e^(-speed * dt))`.
#[derive(Clone, Debug, Default)]
pub struct HighlightState {
	focus: Option<NodeIndex>,
	/// Focus plus its neighbors.
	target_set: HashSet<NodeIndex>,
	node_intensity: HashMap<NodeIndex, f64>,
	focus_intensity: HashMap<NodeIndex, f64>,
	hold_timer: HashMap<NodeIndex, f64>,
	cached_max: f64,
}

impl HighlightState {
	pub fn set_focus(&mut self, node: Option<NodeIndex>, model: &GraphModel) {
		if self.focus == node {
			return;
		}
		self.focus = node;
		self.target_set.clear();
		if let Some(idx) = node {
			self.target_set.insert(idx);
			self.target_set.extend(model.neighbors(idx).iter().copied());
			for &idx in &self.target_set {
				self.hold_timer.insert(idx, MIN_HOLD_TIME);
			}
		}
	}

	pub fn focus(&self) -> Option<NodeIndex> {
		self.focus
	}

	pub fn emphasis(&self, idx: NodeIndex) -> Emphasis {
		match self.focus {
			None => Emphasis::Neutral,
			Some(f) if f == idx => Emphasis::Focused,
			Some(_) if self.target_set.contains(&idx) => Emphasis::Related,
			Some(_) => Emphasis::Dimmed,
		}
	}

	pub fn link_emphasis(&self, link: &Link) -> Emphasis {
		match self.focus {
			None => Emphasis::Neutral,
			Some(f) if link.touches(f) => Emphasis::Related,
			Some(_) => Emphasis::Dimmed,
		}
	}

	/// Move all intensities toward their targets.
	pub fn tick(&mut self, dt: f64) {
		let fade_in = 1.0 - (-FADE_IN_SPEED * dt).exp();
		let fade_out = (-FADE_OUT_SPEED * dt).exp();

		for &idx in &self.target_set {
			let v = self.node_intensity.entry(idx).or_insert(0.0);
			*v += (1.0 - *v) * fade_in;
		}
		if let Some(idx) = self.focus {
			let v = self.focus_intensity.entry(idx).or_insert(0.0);
			*v += (1.0 - *v) * fade_in;
		}

		self.hold_timer.retain(|idx, timer| {
			if self.target_set.contains(idx) {
				return true;
			}
			*timer -= dt;
			*timer > 0.0
		});

		let mut max: f64 = 0.0;
		self.node_intensity.retain(|idx, v| {
			if !self.target_set.contains(idx) && !self.hold_timer.contains_key(idx) {
				*v *= fade_out;
			}
			max = max.max(*v);
			*v > 0.005
		});
		self.focus_intensity.retain(|idx, v| {
			if self.focus != Some(*idx) && !self.hold_timer.contains_key(idx) {
				*v *= fade_out;
			}
			*v > 0.005
		});
		self.cached_max = max;
	}

	/// Eased highlight level of a node.
	pub fn node_intensity(&self, idx: NodeIndex) -> f64 {
		self.node_intensity.get(&idx).copied().unwrap_or(0.0)
	}

	/// Eased level of the focus ring, only ever non-zero around the focus.
	pub fn focus_intensity(&self, idx: NodeIndex) -> f64 {
		self.focus_intensity.get(&idx).copied().unwrap_or(0.0)
	}

	/// Eased highlight level of a link. Follows the focus ring of either
	/// endpoint, so only links touching the focus light up.
	pub fn link_intensity(&self, link: &Link) -> f64 {
		self.focus_intensity(link.source)
			.max(self.focus_intensity(link.target))
	}

	/// How strongly everything outside the highlight is dimmed.
	pub fn dim_level(&self) -> f64 {
		self.cached_max
	}
}

/// Where the pointer is in its press/drag/pan cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerState {
	Idle,
	Hovering(NodeIndex),
	/// Button down on a node, not yet moved past the click tolerance.
	Pressed {
		node: NodeIndex,
		origin: (f64, f64),
		/// Node position minus pointer position, in graph units.
		grab: (f64, f64),
	},
	Dragging {
		node: NodeIndex,
		grab: (f64, f64),
	},
	/// Button down on the background.
	Panning { last: (f64, f64) },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EventKind {
	PointerEnter,
	PointerLeave,
	PointerDown,
	PointerMove,
	PointerUp,
	/// The pointer left the canvas.
	PointerCancel,
	/// Positive `delta` zooms out.
	Wheel { delta: f64 },
}

/// One pointer event in canvas (screen) coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionEvent {
	pub kind: EventKind,
	/// Node under the pointer, or the node entered/left.
	pub node: Option<NodeIndex>,
	pub pointer: (f64, f64),
}

impl InteractionEvent {
	pub fn new(kind: EventKind, node: Option<NodeIndex>, pointer: (f64, f64)) -> Self {
		Self { kind, node, pointer }
	}
}

/// Side effects the host performs on behalf of the controller.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
	ShowTooltip {
		content: TooltipContent,
		anchor: (f64, f64),
	},
	HideTooltip,
	/// Open a document in a new browsing context.
	OpenDocument { path: String },
}

/// Everything a transition may read or mutate.
pub struct InteractionContext<'a> {
	pub model: &'a GraphModel,
	pub documents: &'a DocumentIndex,
	pub engine: &'a mut ForceLayoutEngine,
	pub transform: &'a mut ViewTransform,
	pub config: &'a GraphConfig,
}

#[derive(Clone, Debug)]
pub struct InteractionController {
	state: PointerState,
	highlight: HighlightState,
}

impl Default for InteractionController {
	fn default() -> Self {
		Self {
			state: PointerState::Idle,
			highlight: HighlightState::default(),
		}
	}
}

impl InteractionController {
	pub fn state(&self) -> PointerState {
		self.state
	}

	pub fn highlight(&self) -> &HighlightState {
		&self.highlight
	}

	/// Advance highlight easing.
	pub fn tick(&mut self, dt: f64) {
		self.highlight.tick(dt);
	}

	pub fn handle(&mut self, event: InteractionEvent, ctx: &mut InteractionContext<'_>) -> Vec<Effect> {
		let mut effects = Vec::new();
		match (event.kind, self.state) {
			(EventKind::PointerEnter, PointerState::Idle | PointerState::Hovering(_)) => {
				if let Some(node) = event.node {
					self.enter(node, event.pointer, ctx, &mut effects);
				}
			}
			(EventKind::PointerLeave, PointerState::Hovering(current)) if event.node == Some(current) => {
				self.release_focus(ctx, &mut effects);
			}
			(EventKind::PointerDown, PointerState::Idle | PointerState::Hovering(_)) => {
				self.state = match event.node {
					Some(node) => {
						let (px, py) = ctx.transform.screen_to_graph(event.pointer);
						let (nx, ny) = ctx.engine.position(node);
						PointerState::Pressed {
							node,
							origin: event.pointer,
							grab: (nx - px, ny - py),
						}
					}
					None => PointerState::Panning { last: event.pointer },
				};
			}
			(EventKind::PointerMove, PointerState::Pressed { node, origin, grab }) => {
				let (dx, dy) = (event.pointer.0 - origin.0, event.pointer.1 - origin.1);
				if dx.hypot(dy) > CLICK_TOLERANCE {
					debug!("knowledge-graph: drag start on `{}`", ctx.model.node(node).id);
					self.state = PointerState::Dragging { node, grab };
					self.drag_to(node, grab, event.pointer, ctx);
					ctx.engine.reheat();
					effects.push(Effect::HideTooltip);
				}
			}
			(EventKind::PointerMove, PointerState::Dragging { node, grab }) => {
				self.drag_to(node, grab, event.pointer, ctx);
			}
			(EventKind::PointerMove, PointerState::Panning { last }) => {
				ctx.transform.pan_by(event.pointer.0 - last.0, event.pointer.1 - last.1);
				self.state = PointerState::Panning { last: event.pointer };
			}
			(EventKind::PointerUp, PointerState::Pressed { node, .. }) => {
				let target = ctx.model.node(node);
				match ctx.documents.resolve_path(target, &ctx.config.document_base_path) {
					Some(path) => effects.push(Effect::OpenDocument { path }),
					None => debug!("knowledge-graph: no document for `{}`", target.id),
				}
				// The release may land just outside the pressed node.
				self.settle(event, ctx, &mut effects);
			}
			(EventKind::PointerUp, PointerState::Dragging { node, .. }) => {
				ctx.engine.unpin(node);
				ctx.engine.cool();
				self.settle(event, ctx, &mut effects);
			}
			(EventKind::PointerUp, PointerState::Panning { .. }) => {
				self.settle(event, ctx, &mut effects);
			}
			(EventKind::PointerCancel, state) => {
				if let PointerState::Dragging { node, .. } = state {
					ctx.engine.unpin(node);
					ctx.engine.cool();
				}
				self.release_focus(ctx, &mut effects);
			}
			(EventKind::Wheel { delta }, _) if delta != 0.0 => {
				let factor = if delta > 0.0 { 0.9 } else { 1.1 };
				ctx.transform.zoom_at(event.pointer, factor, ctx.config.zoom_extent);
			}
			_ => {}
		}
		effects
	}

	fn enter(
		&mut self,
		node: NodeIndex,
		anchor: (f64, f64),
		ctx: &InteractionContext<'_>,
		effects: &mut Vec<Effect>,
	) {
		self.state = PointerState::Hovering(node);
		self.highlight.set_focus(Some(node), ctx.model);
		let content = TooltipContent::for_node(
			ctx.model.node(node),
			ctx.documents,
			&ctx.config.document_base_path,
		);
		effects.push(match content {
			Some(content) => Effect::ShowTooltip { content, anchor },
			None => Effect::HideTooltip,
		});
	}

	fn release_focus(&mut self, ctx: &InteractionContext<'_>, effects: &mut Vec<Effect>) {
		self.state = PointerState::Idle;
		self.highlight.set_focus(None, ctx.model);
		effects.push(Effect::HideTooltip);
	}

	/// After a release, hover whatever is under the pointer.
	fn settle(&mut self, event: InteractionEvent, ctx: &InteractionContext<'_>, effects: &mut Vec<Effect>) {
		match event.node {
			Some(node) => self.enter(node, event.pointer, ctx, effects),
			None => self.release_focus(ctx, effects),
		}
	}

	fn drag_to(
		&self,
		node: NodeIndex,
		grab: (f64, f64),
		pointer: (f64, f64),
		ctx: &mut InteractionContext<'_>,
	) {
		let (px, py) = ctx.transform.screen_to_graph(pointer);
		ctx.engine.pin(node, px + grab.0, py + grab.1);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::knowledge_graph::layout::LayoutParams;
	use crate::components::knowledge_graph::types::{CategoryTag, DocumentMeta, GraphData, GraphLink, GraphNode};

	struct Fixture {
		model: GraphModel,
		documents: DocumentIndex,
		engine: ForceLayoutEngine,
		transform: ViewTransform,
		config: GraphConfig,
		controller: InteractionController,
	}

	impl Fixture {
		/// Chain a - b - c - d, plus isolated e. `a` has a document.
		fn new() -> Self {
			let node = |id: &str, x: f64| GraphNode {
				id: id.into(),
				kind: Some(CategoryTag::Name("concept".into())),
				x: Some(x),
				y: Some(100.0),
				..Default::default()
			};
			let link = |s: &str, t: &str| GraphLink {
				source: s.into(),
				target: t.into(),
				relation: None,
			};
			let data = GraphData {
				nodes: vec![
					node("a", 100.0),
					node("b", 200.0),
					node("c", 300.0),
					node("d", 400.0),
					node("e", 500.0),
				],
				links: vec![link("a", "b"), link("b", "c"), link("c", "d")],
			};
			let config = GraphConfig::default();
			let model = GraphModel::build(&data, &config);
			let documents = DocumentIndex::new(&[DocumentMeta {
				id: "a".into(),
				title: "Paper A".into(),
				filename: Some("a.pdf".into()),
				..Default::default()
			}]);
			let engine = ForceLayoutEngine::new(&model, LayoutParams::from(&config), (300.0, 100.0));
			Self {
				model,
				documents,
				engine,
				transform: ViewTransform::default(),
				config,
				controller: InteractionController::default(),
			}
		}

		fn send(&mut self, kind: EventKind, node: Option<NodeIndex>, pointer: (f64, f64)) -> Vec<Effect> {
			let mut ctx = InteractionContext {
				model: &self.model,
				documents: &self.documents,
				engine: &mut self.engine,
				transform: &mut self.transform,
				config: &self.config,
			};
			self.controller
				.handle(InteractionEvent::new(kind, node, pointer), &mut ctx)
		}

		fn opens(effects: &[Effect]) -> usize {
			effects
				.iter()
				.filter(|e| matches!(e, Effect::OpenDocument { .. }))
				.count()
		}
	}

	#[test]
	fn test_hover_highlights_one_hop_neighborhood() {
		let mut f = Fixture::new();
		let effects = f.send(EventKind::PointerEnter, Some(1), (200.0, 100.0));
		assert_eq!(f.controller.state(), PointerState::Hovering(1));
		// `b` has no document and no description.
		assert_eq!(effects, vec![Effect::HideTooltip]);

		let h = f.controller.highlight();
		assert_eq!(h.emphasis(1), Emphasis::Focused);
		assert_eq!(h.emphasis(0), Emphasis::Related);
		assert_eq!(h.emphasis(2), Emphasis::Related);
		assert_eq!(h.emphasis(3), Emphasis::Dimmed);
		assert_eq!(h.emphasis(4), Emphasis::Dimmed);
		let links = f.model.links();
		assert_eq!(h.link_emphasis(&links[0]), Emphasis::Related);
		assert_eq!(h.link_emphasis(&links[2]), Emphasis::Dimmed);
	}

	#[test]
	fn test_unhover_restores_everything() {
		let mut f = Fixture::new();
		f.send(EventKind::PointerEnter, Some(1), (200.0, 100.0));
		let effects = f.send(EventKind::PointerLeave, Some(1), (260.0, 100.0));
		assert_eq!(effects, vec![Effect::HideTooltip]);
		assert_eq!(f.controller.state(), PointerState::Idle);
		for idx in 0..f.model.len() {
			assert_eq!(f.controller.highlight().emphasis(idx), Emphasis::Neutral);
		}
	}

	#[test]
	fn test_highlight_eases_in_and_out() {
		let mut f = Fixture::new();
		f.send(EventKind::PointerEnter, Some(1), (200.0, 100.0));
		f.controller.tick(0.016);
		let early = f.controller.highlight().node_intensity(1);
		assert!(early > 0.0 && early < 0.5);
		for _ in 0..120 {
			f.controller.tick(0.016);
		}
		let h = f.controller.highlight();
		assert!(h.node_intensity(1) > 0.99);
		assert!(h.node_intensity(0) > 0.99);
		assert_eq!(h.node_intensity(3), 0.0);
		assert!(h.dim_level() > 0.99);

		f.send(EventKind::PointerLeave, Some(1), (260.0, 100.0));
		for _ in 0..120 {
			f.controller.tick(0.016);
		}
		let h = f.controller.highlight();
		assert_eq!(h.node_intensity(1), 0.0);
		assert_eq!(h.focus_intensity(1), 0.0);
		assert_eq!(h.dim_level(), 0.0);
	}

	#[test]
	fn test_hover_shows_document_tooltip() {
		let mut f = Fixture::new();
		let effects = f.send(EventKind::PointerEnter, Some(0), (100.0, 100.0));
		match effects.as_slice() {
			[Effect::ShowTooltip { content, anchor }] => {
				assert_eq!(*anchor, (100.0, 100.0));
				assert!(matches!(content, TooltipContent::Document { title, .. } if title == "Paper A"));
			}
			other => panic!("unexpected effects {other:?}"),
		}
	}

	#[test]
	fn test_click_opens_document_once() {
		let mut f = Fixture::new();
		f.send(EventKind::PointerEnter, Some(0), (100.0, 100.0));
		let mut effects = f.send(EventKind::PointerDown, Some(0), (100.0, 100.0));
		effects.extend(f.send(EventKind::PointerMove, Some(0), (101.0, 101.0)));
		effects.extend(f.send(EventKind::PointerUp, Some(0), (101.0, 101.0)));
		assert_eq!(Fixture::opens(&effects), 1);
		assert!(effects.contains(&Effect::OpenDocument {
			path: "../data/pdfs/a.pdf".into()
		}));
		assert_eq!(f.controller.state(), PointerState::Hovering(0));
		assert!(!f.engine.node(0).is_pinned());
	}

	#[test]
	fn test_click_released_off_node_clears_highlight() {
		let mut f = Fixture::new();
		f.send(EventKind::PointerEnter, Some(0), (110.0, 100.0));
		f.send(EventKind::PointerDown, Some(0), (110.0, 100.0));
		let effects = f.send(EventKind::PointerUp, None, (112.0, 100.0));
		assert_eq!(Fixture::opens(&effects), 1);
		assert_eq!(effects.last(), Some(&Effect::HideTooltip));
		assert_eq!(f.controller.state(), PointerState::Idle);
		assert_eq!(f.controller.highlight().focus(), None);
		assert_eq!(f.controller.highlight().emphasis(2), Emphasis::Neutral);
	}

	#[test]
	fn test_click_without_document_opens_nothing() {
		let mut f = Fixture::new();
		f.send(EventKind::PointerEnter, Some(2), (300.0, 100.0));
		f.send(EventKind::PointerDown, Some(2), (300.0, 100.0));
		let effects = f.send(EventKind::PointerUp, Some(2), (300.0, 100.0));
		assert_eq!(Fixture::opens(&effects), 0);
	}

	#[test]
	fn test_drag_is_not_a_click() {
		let mut f = Fixture::new();
		f.send(EventKind::PointerEnter, Some(0), (100.0, 100.0));
		f.send(EventKind::PointerDown, Some(0), (100.0, 100.0));
		let mut effects = f.send(EventKind::PointerMove, Some(0), (110.0, 100.0));
		effects.extend(f.send(EventKind::PointerUp, Some(0), (110.0, 100.0)));
		assert_eq!(Fixture::opens(&effects), 0);
	}

	#[test]
	fn test_drag_pins_with_grab_offset_and_release_unpins() {
		let mut f = Fixture::new();
		// Grab `c` 4px left of its center.
		f.send(EventKind::PointerEnter, Some(2), (296.0, 100.0));
		f.send(EventKind::PointerDown, Some(2), (296.0, 100.0));
		assert!(matches!(f.controller.state(), PointerState::Pressed { node: 2, .. }));

		f.send(EventKind::PointerMove, Some(2), (346.0, 150.0));
		assert!(matches!(f.controller.state(), PointerState::Dragging { node: 2, .. }));
		let pinned = f.engine.node(2);
		assert_eq!((pinned.fx, pinned.fy), (Some(350.0), Some(150.0)));
		assert_eq!(f.engine.alpha_target(), f.config.drag_alpha_target);

		f.send(EventKind::PointerMove, Some(2), (396.0, 200.0));
		f.engine.step();
		assert_eq!(f.engine.position(2), (400.0, 200.0));

		f.send(EventKind::PointerUp, Some(2), (396.0, 200.0));
		assert!(f.engine.nodes().iter().all(|n| !n.is_pinned()));
		assert_eq!(f.engine.alpha_target(), 0.0);
		assert_eq!(f.controller.state(), PointerState::Hovering(2));
	}

	#[test]
	fn test_drag_release_off_node_clears_highlight() {
		let mut f = Fixture::new();
		f.send(EventKind::PointerEnter, Some(2), (300.0, 100.0));
		f.send(EventKind::PointerDown, Some(2), (300.0, 100.0));
		f.send(EventKind::PointerMove, None, (300.0, 300.0));
		let effects = f.send(EventKind::PointerUp, None, (300.0, 300.0));
		assert!(f.engine.nodes().iter().all(|n| !n.is_pinned()));
		assert_eq!(f.controller.state(), PointerState::Idle);
		assert_eq!(f.controller.highlight().focus(), None);
		assert_eq!(effects, vec![Effect::HideTooltip]);
	}

	#[test]
	fn test_cancel_mid_drag_releases_pin() {
		let mut f = Fixture::new();
		f.send(EventKind::PointerEnter, Some(3), (400.0, 100.0));
		f.send(EventKind::PointerDown, Some(3), (400.0, 100.0));
		f.send(EventKind::PointerMove, Some(3), (420.0, 100.0));
		assert!(f.engine.node(3).is_pinned());
		let effects = f.send(EventKind::PointerCancel, None, (420.0, 100.0));
		assert!(!f.engine.node(3).is_pinned());
		assert_eq!(f.controller.state(), PointerState::Idle);
		assert_eq!(f.controller.highlight().emphasis(3), Emphasis::Neutral);
		assert_eq!(effects, vec![Effect::HideTooltip]);
	}

	#[test]
	fn test_background_drag_pans() {
		let mut f = Fixture::new();
		f.send(EventKind::PointerDown, None, (10.0, 10.0));
		f.send(EventKind::PointerMove, None, (30.0, 15.0));
		f.send(EventKind::PointerMove, None, (40.0, 25.0));
		assert_eq!(f.transform, ViewTransform { x: 30.0, y: 15.0, k: 1.0 });
		// Hovers are ignored mid-pan.
		assert!(f.send(EventKind::PointerEnter, Some(0), (40.0, 25.0)).is_empty());
		f.send(EventKind::PointerUp, None, (40.0, 25.0));
		assert_eq!(f.controller.state(), PointerState::Idle);
	}

	#[test]
	fn test_wheel_zoom_is_clamped_about_pointer() {
		let mut f = Fixture::new();
		let anchor = (200.0, 150.0);
		let before = f.transform.screen_to_graph(anchor);
		f.send(EventKind::Wheel { delta: -1.0 }, None, anchor);
		assert!((f.transform.k - 1.1).abs() < 1e-12);
		let after = f.transform.screen_to_graph(anchor);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);

		for _ in 0..100 {
			f.send(EventKind::Wheel { delta: -1.0 }, None, anchor);
		}
		assert_eq!(f.transform.k, 8.0);
		for _ in 0..200 {
			f.send(EventKind::Wheel { delta: 1.0 }, None, anchor);
		}
		assert_eq!(f.transform.k, 0.1);
	}

	#[test]
	fn test_transform_round_trip() {
		let t = ViewTransform { x: 12.0, y: -8.0, k: 2.5 };
		let (gx, gy) = t.screen_to_graph(t.graph_to_screen((3.0, 4.0)));
		assert!((gx - 3.0).abs() < 1e-12 && (gy - 4.0).abs() < 1e-12);
	}
}
