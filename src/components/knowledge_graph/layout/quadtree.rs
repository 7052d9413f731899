//! Point quadtree used to approximate many-body forces and prune collision
//! checks.
//!
//! Cells live in a flat arena; children are always pushed after their parent,
//! so a reverse scan of the arena visits every child before its parent.

/// Depth at which cells stop splitting and hold several points instead.
/// Bounds the tree when points coincide.
const MAX_DEPTH: usize = 24;

/// One cell of the tree.
#[derive(Clone, Debug)]
pub struct Cell {
	pub x0: f64,
	pub y0: f64,
	pub x1: f64,
	pub y1: f64,
	/// Indices of the four children (NW, NE, SW, SE), if split.
	pub children: Option<[usize; 4]>,
	/// Point indices held by a leaf.
	pub points: Vec<usize>,
	/// Sum of point weights below this cell.
	pub weight: f64,
	/// Mean position of the points below this cell.
	pub cx: f64,
	pub cy: f64,
	/// Number of points below this cell.
	pub count: usize,
	/// Largest point radius below this cell.
	pub max_radius: f64,
}

impl Cell {
	fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
		Self {
			x0,
			y0,
			x1,
			y1,
			children: None,
			points: Vec::new(),
			weight: 0.0,
			cx: 0.0,
			cy: 0.0,
			count: 0,
			max_radius: 0.0,
		}
	}

	pub fn width(&self) -> f64 {
		self.x1 - self.x0
	}

	pub fn is_leaf(&self) -> bool {
		self.children.is_none()
	}
}

/// Quadtree over a fixed set of points.
#[derive(Clone, Debug)]
pub struct QuadTree {
	cells: Vec<Cell>,
	positions: Vec<(f64, f64)>,
}

impl QuadTree {
	/// Build a tree over `positions`; point `i` keeps index `i`.
	pub fn build(positions: Vec<(f64, f64)>) -> Self {
		let (mut x0, mut y0, mut x1, mut y1) = (0.0_f64, 0.0_f64, 1.0_f64, 1.0_f64);
		if let Some(&(fx, fy)) = positions.first() {
			(x0, y0, x1, y1) = (fx, fy, fx, fy);
			for &(x, y) in &positions {
				x0 = x0.min(x);
				y0 = y0.min(y);
				x1 = x1.max(x);
				y1 = y1.max(y);
			}
		}
		// Square the bounds so cells stay square at every depth.
		let size = (x1 - x0).max(y1 - y0).max(1.0) + 1.0;

		let mut tree = Self {
			cells: vec![Cell::new(x0, y0, x0 + size, y0 + size)],
			positions,
		};
		for i in 0..tree.positions.len() {
			tree.insert(i);
		}
		tree
	}

	fn insert(&mut self, point: usize) {
		let (x, y) = self.positions[point];
		let mut cell = 0;
		let mut depth = 0;
		loop {
			if let Some(children) = self.cells[cell].children {
				self.cells[cell].count += 1;
				cell = children[self.quadrant(cell, x, y)];
				depth += 1;
				continue;
			}
			if self.cells[cell].points.is_empty() || depth >= MAX_DEPTH {
				self.cells[cell].points.push(point);
				self.cells[cell].count += 1;
				return;
			}
			self.split(cell);
		}
	}

	fn quadrant(&self, cell: usize, x: f64, y: f64) -> usize {
		let c = &self.cells[cell];
		let (mx, my) = ((c.x0 + c.x1) / 2.0, (c.y0 + c.y1) / 2.0);
		(x >= mx) as usize | ((y >= my) as usize) << 1
	}

	fn split(&mut self, cell: usize) {
		let c = &self.cells[cell];
		let (x0, y0, x1, y1) = (c.x0, c.y0, c.x1, c.y1);
		let (mx, my) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
		let first = self.cells.len();
		self.cells.push(Cell::new(x0, y0, mx, my));
		self.cells.push(Cell::new(mx, y0, x1, my));
		self.cells.push(Cell::new(x0, my, mx, y1));
		self.cells.push(Cell::new(mx, my, x1, y1));
		let children = [first, first + 1, first + 2, first + 3];

		let points = std::mem::take(&mut self.cells[cell].points);
		self.cells[cell].children = Some(children);
		for p in points {
			let (x, y) = self.positions[p];
			let q = self.quadrant(cell, x, y);
			self.cells[children[q]].points.push(p);
			self.cells[children[q]].count += 1;
		}
	}

	/// Compute per-cell aggregates: total weight, centroid and max radius.
	pub fn accumulate(&mut self, weight: impl Fn(usize) -> f64, radius: impl Fn(usize) -> f64) {
		for i in (0..self.cells.len()).rev() {
			let (mut w, mut sx, mut sy, mut n, mut r) = (0.0, 0.0, 0.0, 0usize, 0.0_f64);
			match self.cells[i].children {
				None => {
					for &p in &self.cells[i].points {
						let (x, y) = self.positions[p];
						w += weight(p);
						sx += x;
						sy += y;
						n += 1;
						r = r.max(radius(p));
					}
				}
				Some(children) => {
					for c in children {
						let child = &self.cells[c];
						w += child.weight;
						sx += child.cx * child.count as f64;
						sy += child.cy * child.count as f64;
						n += child.count;
						r = r.max(child.max_radius);
					}
				}
			}
			let cell = &mut self.cells[i];
			cell.weight = w;
			cell.count = n;
			cell.max_radius = r;
			if n > 0 {
				cell.cx = sx / n as f64;
				cell.cy = sy / n as f64;
			}
		}
	}

	/// Pre-order traversal of non-empty cells. Children are visited only when
	/// `f` returns true for their parent.
	pub fn visit(&self, mut f: impl FnMut(&Cell) -> bool) {
		let mut stack = vec![0];
		while let Some(i) = stack.pop() {
			let cell = &self.cells[i];
			if cell.count == 0 {
				continue;
			}
			if f(cell) {
				if let Some(children) = cell.children {
					stack.extend(children);
				}
			}
		}
	}

	pub fn position(&self, point: usize) -> (f64, f64) {
		self.positions[point]
	}

	pub fn len(&self) -> usize {
		self.positions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.positions.is_empty()
	}
}
