//! The mounted graph instance.
//!
//! [`KnowledgeGraph`] owns the model, the layout engine, the interaction
//! controller and the view transform for one canvas. It is created by
//! [`KnowledgeGraph::mount`], advanced once per animation frame by
//! [`KnowledgeGraph::tick`] and released with [`KnowledgeGraph::unmount`].

use log::{info, warn};

use super::config::GraphConfig;
use super::interaction::{
	Effect, EventKind, HighlightState, InteractionContext, InteractionController, InteractionEvent,
	ViewTransform,
};
use super::layout::{ForceLayoutEngine, LayoutParams};
use super::model::{DocumentIndex, GraphModel, NodeIndex};
use super::render::smooth_step;
use super::theme::Theme;
use super::types::Dataset;

pub struct KnowledgeGraph {
	model: GraphModel,
	documents: DocumentIndex,
	engine: ForceLayoutEngine,
	controller: InteractionController,
	transform: ViewTransform,
	config: GraphConfig,
	theme: Theme,
	width: f64,
	height: f64,
	/// Node currently under the pointer, as last reported to the controller.
	hovered: Option<NodeIndex>,
	/// Seconds since mount; drives the link dash animation.
	flow_time: f64,
}

impl KnowledgeGraph {
	/// Build the model and start a fresh layout centered in `viewport`.
	pub fn mount(config: GraphConfig, dataset: &Dataset, (width, height): (f64, f64)) -> Self {
		let model = GraphModel::build(&dataset.graph, &config);
		let documents = DocumentIndex::new(&dataset.documents);
		let engine = ForceLayoutEngine::new(&model, LayoutParams::from(&config), (width / 2.0, height / 2.0));

		let unclassified = model.unclassified().count();
		if unclassified > 0 {
			warn!("knowledge-graph: {unclassified} nodes have no recognised category");
		}
		info!(
			"knowledge-graph: mounted {} nodes, {} links, {} documents",
			model.len(),
			model.links().len(),
			dataset.documents.len()
		);

		Self {
			theme: config.theme(),
			model,
			documents,
			engine,
			controller: InteractionController::default(),
			transform: ViewTransform::default(),
			config,
			width,
			height,
			hovered: None,
			flow_time: 0.0,
		}
	}

	/// Release the instance.
	pub fn unmount(self) {
		info!(
			"knowledge-graph: unmounted after {} layout ticks",
			self.engine.ticks()
		);
	}

	/// Advance one animation frame. Returns whether the layout moved.
	pub fn tick(&mut self, dt: f64) -> bool {
		self.flow_time += dt;
		self.controller.tick(dt);
		self.engine.step()
	}

	/// Radius a node is drawn with, grown while it is focused.
	pub fn drawn_radius(&self, idx: NodeIndex) -> f64 {
		let ring = smooth_step(self.highlight().focus_intensity(idx));
		self.model.node(idx).radius + self.config.node_highlight_radius_increase * ring
	}

	/// Topmost node whose drawn shape reaches a screen position.
	pub fn node_at(&self, screen: (f64, f64)) -> Option<NodeIndex> {
		let (gx, gy) = self.transform.screen_to_graph(screen);
		(0..self.model.len()).rev().find(|&idx| {
			let (x, y) = self.engine.position(idx);
			let reach = self.drawn_radius(idx) * self.model.node(idx).shape.extent();
			(x - gx).hypot(y - gy) <= reach
		})
	}

	/// Feed one event to the controller.
	pub fn dispatch(&mut self, event: InteractionEvent) -> Vec<Effect> {
		let mut ctx = InteractionContext {
			model: &self.model,
			documents: &self.documents,
			engine: &mut self.engine,
			transform: &mut self.transform,
			config: &self.config,
		};
		self.controller.handle(event, &mut ctx)
	}

	/// Pointer moved: report hover changes, then the move itself.
	pub fn pointer_move(&mut self, pointer: (f64, f64)) -> Vec<Effect> {
		let hit = self.node_at(pointer);
		let mut effects = Vec::new();
		if hit != self.hovered {
			if let Some(old) = self.hovered {
				effects.extend(self.dispatch(InteractionEvent::new(EventKind::PointerLeave, Some(old), pointer)));
			}
			if let Some(new) = hit {
				effects.extend(self.dispatch(InteractionEvent::new(EventKind::PointerEnter, Some(new), pointer)));
			}
			self.hovered = hit;
		}
		effects.extend(self.dispatch(InteractionEvent::new(EventKind::PointerMove, hit, pointer)));
		effects
	}

	pub fn pointer_down(&mut self, pointer: (f64, f64)) -> Vec<Effect> {
		let mut effects = self.pointer_move(pointer);
		effects.extend(self.dispatch(InteractionEvent::new(EventKind::PointerDown, self.hovered, pointer)));
		effects
	}

	pub fn pointer_up(&mut self, pointer: (f64, f64)) -> Vec<Effect> {
		self.hovered = self.node_at(pointer);
		self.dispatch(InteractionEvent::new(EventKind::PointerUp, self.hovered, pointer))
	}

	/// Pointer left the canvas.
	pub fn pointer_cancel(&mut self, pointer: (f64, f64)) -> Vec<Effect> {
		self.hovered = None;
		self.dispatch(InteractionEvent::new(EventKind::PointerCancel, None, pointer))
	}

	pub fn wheel(&mut self, pointer: (f64, f64), delta: f64) -> Vec<Effect> {
		self.dispatch(InteractionEvent::new(EventKind::Wheel { delta }, None, pointer))
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.engine.resize(width, height);
	}

	pub fn model(&self) -> &GraphModel {
		&self.model
	}

	pub fn documents(&self) -> &DocumentIndex {
		&self.documents
	}

	pub fn engine(&self) -> &ForceLayoutEngine {
		&self.engine
	}

	pub fn controller(&self) -> &InteractionController {
		&self.controller
	}

	pub fn highlight(&self) -> &HighlightState {
		self.controller.highlight()
	}

	pub fn transform(&self) -> &ViewTransform {
		&self.transform
	}

	pub fn config(&self) -> &GraphConfig {
		&self.config
	}

	pub fn theme(&self) -> &Theme {
		&self.theme
	}

	pub fn viewport(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	pub fn flow_time(&self) -> f64 {
		self.flow_time
	}
}
