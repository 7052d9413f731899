//! Force-directed layout engine.
//!
//! Positions relax under link, charge, center and collision forces while a
//! scalar temperature (`alpha`) cools geometrically toward `alpha_target`.
//! The engine advances one tick per call to [`ForceLayoutEngine::step`]; the
//! animation loop calls it once per frame until the layout settles.

mod forces;
mod quadtree;

use std::f64::consts::PI;

use log::debug;

use self::forces::{Lcg, Spring};
use super::config::GraphConfig;
use super::model::{GraphModel, Node, NodeIndex};

pub use self::forces::Charge;
pub use self::quadtree::QuadTree;

/// Radius of the first ring of the initial spiral.
const INITIAL_RADIUS: f64 = 10.0;

/// Alpha applied when the viewport is resized.
const RESIZE_ALPHA: f64 = 0.3;

/// Simulation state of one node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimNode {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Pinned position; while set the node ignores forces.
	pub fx: Option<f64>,
	pub fy: Option<f64>,
}

impl SimNode {
	pub fn is_pinned(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}
}

/// Physics parameters taken from [`GraphConfig`].
#[derive(Clone, Debug)]
pub struct LayoutParams {
	pub link_distance: f64,
	pub same_category_link_distance: f64,
	pub link_strength: f64,
	pub core_link_strength: f64,
	pub peripheral_link_strength: f64,
	pub charge: Charge,
	pub center_strength: f64,
	pub collide_padding: f64,
	pub alpha_decay: f64,
	pub alpha_min: f64,
	pub drag_alpha_target: f64,
	pub velocity_decay: f64,
}

impl LayoutParams {
	/// Rest length and strength of a link between `a` and `b`.
	///
	/// Same-category pairs sit close (the spacing plus both radii) and pull
	/// hardest, as do pairs of core categories; links reaching a peripheral
	/// category are weakest.
	fn spring_for(&self, a: &Node, b: &Node) -> (f64, f64) {
		let same = a.category == b.category;
		let distance = if same {
			self.same_category_link_distance + a.radius + b.radius
		} else {
			self.link_distance
		};
		let (ra, rb) = (a.category.rank(), b.category.rank());
		let core = |r: Option<u8>| r.is_some_and(|r| r <= 2);
		let peripheral = |r: Option<u8>| r.is_some_and(|r| r >= 4);
		let strength = if same || (core(ra) && core(rb)) {
			self.core_link_strength
		} else if peripheral(ra) || peripheral(rb) {
			self.peripheral_link_strength
		} else {
			self.link_strength
		};
		(distance, strength)
	}
}

impl From<&GraphConfig> for LayoutParams {
	fn from(config: &GraphConfig) -> Self {
		Self {
			link_distance: config.link_distance,
			same_category_link_distance: config.same_category_link_distance,
			link_strength: config.link_strength,
			core_link_strength: config.core_link_strength,
			peripheral_link_strength: config.peripheral_link_strength,
			charge: Charge {
				strength: config.charge_strength,
				distance_min: config.charge_distance_min,
				distance_max: config.charge_distance_max,
				theta: config.barnes_hut_theta,
				threshold: config.barnes_hut_threshold,
			},
			center_strength: config.center_strength,
			collide_padding: config.collide_padding,
			alpha_decay: config.alpha_decay,
			alpha_min: config.alpha_min,
			drag_alpha_target: config.drag_alpha_target,
			velocity_decay: config.velocity_decay,
		}
	}
}

/// Iterative force simulation over the nodes of a [`GraphModel`].
pub struct ForceLayoutEngine {
	nodes: Vec<SimNode>,
	springs: Vec<Spring>,
	/// Per-node collision radius.
	radii: Vec<f64>,
	params: LayoutParams,
	center: (f64, f64),
	alpha: f64,
	alpha_target: f64,
	rng: Lcg,
	ticks: u64,
}

impl ForceLayoutEngine {
	pub fn new(model: &GraphModel, params: LayoutParams, center: (f64, f64)) -> Self {
		let golden_angle = PI * (3.0 - 5.0_f64.sqrt());
		let nodes = model
			.nodes()
			.iter()
			.enumerate()
			.map(|(i, node)| {
				let (x, y) = node.initial_position.unwrap_or_else(|| {
					let r = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
					let a = i as f64 * golden_angle;
					(center.0 + r * a.cos(), center.1 + r * a.sin())
				});
				SimNode {
					x,
					y,
					..Default::default()
				}
			})
			.collect();

		let springs = model
			.links()
			.iter()
			.map(|l| {
				let (ds, dt) = (model.degree(l.source) as f64, model.degree(l.target) as f64);
				let (distance, strength) = params.spring_for(model.node(l.source), model.node(l.target));
				Spring {
					source: l.source,
					target: l.target,
					bias: ds / (ds + dt),
					distance,
					strength,
				}
			})
			.collect();
		let radii = model
			.nodes()
			.iter()
			.map(|n| n.radius + params.collide_padding)
			.collect();

		Self {
			nodes,
			springs,
			radii,
			params,
			center,
			alpha: 1.0,
			alpha_target: 0.0,
			rng: Lcg::new(1),
			ticks: 0,
		}
	}

	/// Advance one tick. Returns false, doing nothing, once settled.
	pub fn step(&mut self) -> bool {
		if self.is_settled() {
			return false;
		}
		let p = &self.params;
		self.alpha += (self.alpha_target - self.alpha) * p.alpha_decay;

		forces::apply_link(&mut self.nodes, &self.springs, self.alpha, &mut self.rng);
		forces::apply_charge(&mut self.nodes, &p.charge, self.alpha, &mut self.rng);
		forces::apply_center(&mut self.nodes, self.center.0, self.center.1, p.center_strength);
		forces::apply_collide(&mut self.nodes, &self.radii, p.charge.threshold, &mut self.rng);

		let keep = 1.0 - p.velocity_decay;
		for node in &mut self.nodes {
			match node.fx {
				Some(fx) => {
					node.x = fx;
					node.vx = 0.0;
				}
				None => {
					node.vx *= keep;
					node.x += node.vx;
				}
			}
			match node.fy {
				Some(fy) => {
					node.y = fy;
					node.vy = 0.0;
				}
				None => {
					node.vy *= keep;
					node.y += node.vy;
				}
			}
		}

		self.ticks += 1;
		if self.is_settled() {
			debug!("knowledge-graph: layout settled after {} ticks", self.ticks);
		}
		true
	}

	/// Fix a node at `(x, y)` until [`Self::unpin`].
	pub fn pin(&mut self, idx: NodeIndex, x: f64, y: f64) {
		let node = &mut self.nodes[idx];
		node.fx = Some(x);
		node.fy = Some(y);
		node.x = x;
		node.y = y;
	}

	/// Release a pinned node back to the simulation.
	pub fn unpin(&mut self, idx: NodeIndex) {
		let node = &mut self.nodes[idx];
		node.fx = None;
		node.fy = None;
	}

	/// Heat toward the drag temperature so the graph reacts to a moved node.
	pub fn reheat(&mut self) {
		self.alpha_target = self.params.drag_alpha_target;
	}

	/// Let the simulation cool down to rest again.
	pub fn cool(&mut self) {
		self.alpha_target = 0.0;
	}

	pub fn restart(&mut self, alpha: f64) {
		self.alpha = alpha;
	}

	pub fn set_center(&mut self, x: f64, y: f64) {
		self.center = (x, y);
	}

	/// Recenter on a resized viewport and let the layout re-settle.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.set_center(width / 2.0, height / 2.0);
		self.restart(RESIZE_ALPHA);
	}

	pub fn is_settled(&self) -> bool {
		self.alpha < self.params.alpha_min && self.alpha_target < self.params.alpha_min
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	pub fn position(&self, idx: NodeIndex) -> (f64, f64) {
		let node = &self.nodes[idx];
		(node.x, node.y)
	}

	pub fn node(&self, idx: NodeIndex) -> &SimNode {
		&self.nodes[idx]
	}

	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::knowledge_graph::types::{CategoryTag, GraphData, GraphLink, GraphNode};

	fn model(n: usize, links: &[(usize, usize)]) -> GraphModel {
		let data = GraphData {
			nodes: (0..n)
				.map(|i| GraphNode {
					id: format!("n{i}"),
					kind: Some(CategoryTag::Name("concept".into())),
					..Default::default()
				})
				.collect(),
			links: links
				.iter()
				.map(|&(s, t)| GraphLink {
					source: format!("n{s}"),
					target: format!("n{t}"),
					relation: None,
				})
				.collect(),
		};
		GraphModel::build(&data, &GraphConfig::default())
	}

	fn engine(model: &GraphModel, config: GraphConfig) -> ForceLayoutEngine {
		ForceLayoutEngine::new(model, LayoutParams::from(&config), (400.0, 300.0))
	}

	/// Step until settled or `max_ticks` have run; returns the ticks run.
	fn run(e: &mut ForceLayoutEngine, max_ticks: usize) -> usize {
		let mut n = 0;
		while n < max_ticks && e.step() {
			n += 1;
		}
		n
	}

	fn distance(e: &ForceLayoutEngine, a: usize, b: usize) -> f64 {
		let ((x1, y1), (x2, y2)) = (e.position(a), e.position(b));
		(x2 - x1).hypot(y2 - y1)
	}

	#[test]
	fn test_alpha_cools_until_settled() {
		let m = model(5, &[(0, 1), (1, 2), (2, 3), (3, 4)]);
		let mut e = engine(&m, GraphConfig::default());
		let mut last = e.alpha();
		for _ in 0..10 {
			assert!(e.step());
			assert!(e.alpha() < last);
			last = e.alpha();
		}
		let ticks = run(&mut e, 10_000) + 10;
		assert!(e.is_settled());
		assert!((290..=310).contains(&ticks), "settled after {ticks} ticks");
		assert!(!e.step());
	}

	#[test]
	fn test_settled_engine_does_not_move() {
		let m = model(3, &[(0, 1)]);
		let mut e = engine(&m, GraphConfig::default());
		run(&mut e, 10_000);
		let before = e.nodes().to_vec();
		e.step();
		assert_eq!(e.nodes(), &before[..]);
	}

	#[test]
	fn test_link_distance_is_approached() {
		let config = GraphConfig {
			charge_strength: 0.0,
			..Default::default()
		};
		let m = model(2, &[(0, 1)]);
		let mut e = engine(&m, config);
		run(&mut e, 10_000);
		// Two concepts: spacing plus both radii.
		let expected = 70.0 + m.node(0).radius + m.node(1).radius;
		let d = distance(&e, 0, 1);
		assert!((d - expected).abs() < 15.0, "distance {d}, expected {expected}");
	}

	#[test]
	fn test_springs_follow_category_relationship() {
		let node = |id: &str, tag: u32| GraphNode {
			id: id.into(),
			category: Some(CategoryTag::Number(tag)),
			..Default::default()
		};
		let link = |s: &str, t: &str| GraphLink {
			source: s.into(),
			target: t.into(),
			relation: None,
		};
		let data = GraphData {
			nodes: vec![node("ml", 1), node("ml2", 1), node("rl", 2), node("dl", 3), node("cv", 5)],
			links: vec![link("ml", "ml2"), link("ml", "rl"), link("rl", "dl"), link("dl", "cv")],
		};
		let config = GraphConfig::default();
		let m = GraphModel::build(&data, &config);
		let e = engine(&m, config.clone());
		let springs: Vec<(f64, f64)> = e.springs.iter().map(|s| (s.distance, s.strength)).collect();

		let same = config.same_category_link_distance + m.node(0).radius + m.node(1).radius;
		assert_eq!(
			springs,
			vec![
				(same, config.core_link_strength),
				(config.link_distance, config.core_link_strength),
				(config.link_distance, config.link_strength),
				(config.link_distance, config.peripheral_link_strength),
			]
		);
	}

	#[test]
	fn test_charge_spreads_unlinked_nodes() {
		let m = model(6, &[]);
		let mut e = engine(&m, GraphConfig::default());
		let before = distance(&e, 0, 1);
		run(&mut e, 10_000);
		assert!(distance(&e, 0, 1) > before);
	}

	#[test]
	fn test_collision_removes_overlap() {
		let config = GraphConfig {
			charge_strength: 0.0,
			..Default::default()
		};
		let m = model(30, &[]);
		let mut e = engine(&m, config);
		run(&mut e, 10_000);
		for i in 0..30 {
			for j in i + 1..30 {
				let min = e.radii[i] + e.radii[j];
				assert!(distance(&e, i, j) > 0.8 * min);
			}
		}
	}

	#[test]
	fn test_center_holds_mean_near_viewport_center() {
		let m = model(10, &[(0, 1), (2, 3)]);
		let mut e = engine(&m, GraphConfig::default());
		run(&mut e, 10_000);
		let n = e.nodes().len() as f64;
		let mx = e.nodes().iter().map(|n| n.x).sum::<f64>() / n;
		let my = e.nodes().iter().map(|n| n.y).sum::<f64>() / n;
		assert!((mx - 400.0).abs() < 5.0 && (my - 300.0).abs() < 5.0);
	}

	#[test]
	fn test_pinned_node_stays_put() {
		let m = model(4, &[(0, 1), (0, 2), (0, 3)]);
		let mut e = engine(&m, GraphConfig::default());
		e.pin(0, 50.0, 60.0);
		for _ in 0..50 {
			e.step();
			assert_eq!(e.position(0), (50.0, 60.0));
		}
		e.unpin(0);
		assert!(!e.node(0).is_pinned());
		e.step();
		assert_ne!(e.position(0), (50.0, 60.0));
	}

	#[test]
	fn test_reheat_wakes_settled_layout() {
		let m = model(4, &[(0, 1), (1, 2)]);
		let mut e = engine(&m, GraphConfig::default());
		run(&mut e, 10_000);
		assert!(e.is_settled());

		e.reheat();
		let start = e.alpha();
		assert!(e.step());
		assert!(e.alpha() > start);

		e.cool();
		run(&mut e, 10_000);
		assert!(e.is_settled());
	}

	#[test]
	fn test_resize_recenters_and_restarts() {
		let m = model(4, &[(0, 1)]);
		let mut e = engine(&m, GraphConfig::default());
		run(&mut e, 10_000);
		e.resize(1000.0, 1000.0);
		assert_eq!(e.alpha(), 0.3);
		run(&mut e, 10_000);
		let mx = e.nodes().iter().map(|n| n.x).sum::<f64>() / 4.0;
		assert!((mx - 500.0).abs() < 5.0);
	}

	#[test]
	fn test_bias_favors_high_degree_source() {
		// n0 is a hub with three links; the link n0 -> n1 moves n1 more.
		let m = model(4, &[(0, 1), (0, 2), (0, 3)]);
		let e = engine(&m, GraphConfig::default());
		let bias: Vec<f64> = e.springs.iter().map(|s| s.bias).collect();
		assert_eq!(bias, vec![0.75, 0.75, 0.75]);
	}
}
