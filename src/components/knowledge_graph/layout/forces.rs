//! The four forces of the layout. Each one adjusts node velocities (or, for
//! centering, positions) in place; integration happens in the engine.

use super::SimNode;
use super::quadtree::QuadTree;

/// Collisions are resolved fully each tick.
const COLLIDE_STRENGTH: f64 = 1.0;

/// Deterministic linear congruential generator for jiggling coincident nodes.
#[derive(Clone, Debug)]
pub struct Lcg(u64);

impl Lcg {
	const A: u64 = 1_664_525;
	const C: u64 = 1_013_904_223;
	const M: u64 = 1 << 32;

	pub fn new(seed: u64) -> Self {
		Self(seed % Self::M)
	}

	/// Uniform in `[0, 1)`.
	pub fn next_f64(&mut self) -> f64 {
		self.0 = (Self::A * self.0 + Self::C) % Self::M;
		self.0 as f64 / Self::M as f64
	}

	/// A tiny random offset used where a zero distance has no direction.
	pub fn jiggle(&mut self) -> f64 {
		(self.next_f64() - 0.5) * 1e-6
	}
}

/// One link as the spring force sees it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
	pub source: usize,
	pub target: usize,
	/// Share of the correction applied to the target: the source's fraction
	/// of the pair's total degree, so the better connected end moves less.
	pub bias: f64,
	/// Rest length.
	pub distance: f64,
	pub strength: f64,
}

/// Spring force pulling linked nodes toward their rest length.
pub fn apply_link(nodes: &mut [SimNode], springs: &[Spring], alpha: f64, rng: &mut Lcg) {
	for spring in springs {
		let (s, t) = (spring.source, spring.target);
		let mut dx = nodes[t].x + nodes[t].vx - nodes[s].x - nodes[s].vx;
		let mut dy = nodes[t].y + nodes[t].vy - nodes[s].y - nodes[s].vy;
		if dx == 0.0 {
			dx = rng.jiggle();
		}
		if dy == 0.0 {
			dy = rng.jiggle();
		}
		let l = (dx * dx + dy * dy).sqrt();
		let f = (l - spring.distance) / l * alpha * spring.strength;
		dx *= f;
		dy *= f;

		let b = spring.bias;
		nodes[t].vx -= dx * b;
		nodes[t].vy -= dy * b;
		nodes[s].vx += dx * (1.0 - b);
		nodes[s].vy += dy * (1.0 - b);
	}
}

/// Parameters of the many-body force.
#[derive(Clone, Copy, Debug)]
pub struct Charge {
	/// Negative values repel.
	pub strength: f64,
	pub distance_min: f64,
	pub distance_max: f64,
	pub theta: f64,
	/// Above this many nodes the Barnes-Hut approximation is used.
	pub threshold: usize,
}

impl Charge {
	/// Velocity change from a charge of `weight` at offset `(dx, dy)`, or
	/// `None` if it is beyond `distance_max`.
	fn pull(&self, mut dx: f64, mut dy: f64, weight: f64, alpha: f64, rng: &mut Lcg) -> Option<(f64, f64)> {
		let mut l = dx * dx + dy * dy;
		if l >= self.distance_max * self.distance_max {
			return None;
		}
		if dx == 0.0 {
			dx = rng.jiggle();
			l += dx * dx;
		}
		if dy == 0.0 {
			dy = rng.jiggle();
			l += dy * dy;
		}
		let min2 = self.distance_min * self.distance_min;
		if l < min2 {
			l = (min2 * l).sqrt();
		}
		Some((dx * weight * alpha / l, dy * weight * alpha / l))
	}
}

/// Pairwise repulsion (or attraction) between all nodes.
pub fn apply_charge(nodes: &mut [SimNode], charge: &Charge, alpha: f64, rng: &mut Lcg) {
	if charge.strength == 0.0 {
		return;
	}
	if nodes.len() > charge.threshold {
		apply_charge_approximate(nodes, charge, alpha, rng);
		return;
	}

	for i in 0..nodes.len() {
		let (xi, yi) = (nodes[i].x, nodes[i].y);
		let (mut dvx, mut dvy) = (0.0, 0.0);
		for (j, other) in nodes.iter().enumerate() {
			if i == j {
				continue;
			}
			if let Some((vx, vy)) = charge.pull(other.x - xi, other.y - yi, charge.strength, alpha, rng) {
				dvx += vx;
				dvy += vy;
			}
		}
		nodes[i].vx += dvx;
		nodes[i].vy += dvy;
	}
}

fn apply_charge_approximate(nodes: &mut [SimNode], charge: &Charge, alpha: f64, rng: &mut Lcg) {
	let mut tree = QuadTree::build(nodes.iter().map(|n| (n.x, n.y)).collect());
	tree.accumulate(|_| charge.strength, |_| 0.0);
	let theta2 = charge.theta * charge.theta;

	for (i, node) in nodes.iter_mut().enumerate() {
		let (xi, yi) = tree.position(i);
		let (mut dvx, mut dvy) = (0.0, 0.0);
		tree.visit(|cell| {
			if !cell.is_leaf() {
				let (dx, dy) = (cell.cx - xi, cell.cy - yi);
				let w = cell.width();
				// Far enough away: treat the whole cell as one charge.
				if w * w / theta2 < dx * dx + dy * dy {
					if let Some((vx, vy)) = charge.pull(dx, dy, cell.weight, alpha, rng) {
						dvx += vx;
						dvy += vy;
					}
					return false;
				}
				return true;
			}
			for &j in &cell.points {
				if j == i {
					continue;
				}
				let (xj, yj) = tree.position(j);
				if let Some((vx, vy)) = charge.pull(xj - xi, yj - yi, charge.strength, alpha, rng) {
					dvx += vx;
					dvy += vy;
				}
			}
			false
		});
		node.vx += dvx;
		node.vy += dvy;
	}
}

/// Translate all nodes so their mean moves toward `(cx, cy)`.
pub fn apply_center(nodes: &mut [SimNode], cx: f64, cy: f64, strength: f64) {
	if nodes.is_empty() {
		return;
	}
	let n = nodes.len() as f64;
	let (sx, sy) = nodes
		.iter()
		.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
	let (dx, dy) = ((sx / n - cx) * strength, (sy / n - cy) * strength);
	for node in nodes.iter_mut() {
		node.x -= dx;
		node.y -= dy;
	}
}

/// Push overlapping discs apart along the line between their centers.
///
/// Uses predicted positions (`x + vx`). Each pair's correction is split by
/// squared radius, so small nodes give way to large ones.
pub fn apply_collide(nodes: &mut [SimNode], radii: &[f64], threshold: usize, rng: &mut Lcg) {
	let n = nodes.len();
	if n > threshold {
		let mut tree = QuadTree::build(nodes.iter().map(|n| (n.x + n.vx, n.y + n.vy)).collect());
		tree.accumulate(|_| 0.0, |p| radii[p]);
		for i in 0..n {
			let ri = radii[i];
			let (xi, yi) = (nodes[i].x + nodes[i].vx, nodes[i].y + nodes[i].vy);
			tree.visit(|cell| {
				let r = ri + cell.max_radius;
				if cell.x0 > xi + r || cell.x1 < xi - r || cell.y0 > yi + r || cell.y1 < yi - r {
					return false;
				}
				for &j in cell.points.iter().filter(|&&j| j > i) {
					collide_pair(nodes, i, j, (xi, yi), ri, radii[j], rng);
				}
				true
			});
		}
	} else {
		for i in 0..n {
			let ri = radii[i];
			let (xi, yi) = (nodes[i].x + nodes[i].vx, nodes[i].y + nodes[i].vy);
			for j in i + 1..n {
				collide_pair(nodes, i, j, (xi, yi), ri, radii[j], rng);
			}
		}
	}
}

fn collide_pair(
	nodes: &mut [SimNode],
	i: usize,
	j: usize,
	(xi, yi): (f64, f64),
	ri: f64,
	rj: f64,
	rng: &mut Lcg,
) {
	let r = ri + rj;
	let mut dx = xi - nodes[j].x - nodes[j].vx;
	let mut dy = yi - nodes[j].y - nodes[j].vy;
	let mut l = dx * dx + dy * dy;
	if l >= r * r {
		return;
	}
	if dx == 0.0 {
		dx = rng.jiggle();
		l += dx * dx;
	}
	if dy == 0.0 {
		dy = rng.jiggle();
		l += dy * dy;
	}
	let d = l.sqrt();
	let k = (r - d) / d * COLLIDE_STRENGTH;
	dx *= k;
	dy *= k;

	let (ri2, rj2) = (ri * ri, rj * rj);
	let share = rj2 / (ri2 + rj2);
	nodes[i].vx += dx * share;
	nodes[i].vy += dy * share;
	nodes[j].vx -= dx * (1.0 - share);
	nodes[j].vy -= dy * (1.0 - share);
}
