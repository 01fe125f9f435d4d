// Barnes-Hut quadtree over layout positions

use super::Position;

/// Axis-aligned region covered by a cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Quadrant index for `p`: bit 0 set when right of the midpoint,
    /// bit 1 set when below it.
    fn quadrant_of(&self, p: Position) -> usize {
        let mut q = 0;
        if p.x > self.x + self.width * 0.5 {
            q |= 1;
        }
        if p.y > self.y + self.height * 0.5 {
            q |= 2;
        }
        q
    }

    fn quadrant(&self, q: usize) -> Bounds {
        let hw = self.width * 0.5;
        let hh = self.height * 0.5;
        let x = if q & 1 == 0 { self.x } else { self.x + hw };
        let y = if q & 2 == 0 { self.y } else { self.y + hh };
        Bounds::new(x, y, hw, hh)
    }
}

/// Subdivision limits.
#[derive(Clone, Copy, Debug)]
pub struct TreeLimits {
    /// Points a leaf holds before it tries to split.
    pub capacity: usize,
    pub max_depth: u32,
    /// Cells narrower or shorter than this never split.
    pub min_size: f64,
}

impl Default for TreeLimits {
    fn default() -> Self {
        Self {
            capacity: 8,
            max_depth: 24,
            min_size: 0.5,
        }
    }
}

#[derive(Debug)]
struct Cell {
    bounds: Bounds,
    depth: u32,
    mass: f64,
    sum_x: f64,
    sum_y: f64,
    points: Vec<Position>,
    // index of the first of four consecutive child cells
    children: Option<usize>,
}

impl Cell {
    fn new(bounds: Bounds, depth: u32) -> Self {
        Self {
            bounds,
            depth,
            mass: 0.0,
            sum_x: 0.0,
            sum_y: 0.0,
            points: Vec::new(),
            children: None,
        }
    }

    fn add_mass(&mut self, p: Position) {
        self.mass += 1.0;
        self.sum_x += p.x;
        self.sum_y += p.y;
    }

    fn should_split(&self, limits: &TreeLimits) -> bool {
        self.points.len() > limits.capacity
            && self.depth < limits.max_depth
            && self.bounds.width > limits.min_size
            && self.bounds.height > limits.min_size
    }
}

/// Region quadtree with unit-mass points. Every cell tracks the mass and
/// centre of mass of all points beneath it.
#[derive(Debug)]
pub struct QuadTree {
    cells: Vec<Cell>,
    limits: TreeLimits,
}

impl QuadTree {
    pub fn new(bounds: Bounds, limits: TreeLimits) -> Self {
        Self {
            cells: vec![Cell::new(bounds, 0)],
            limits,
        }
    }

    pub fn build(bounds: Bounds, limits: TreeLimits, points: &[Position]) -> Self {
        let mut tree = Self::new(bounds, limits);
        for &p in points {
            tree.insert(p);
        }
        tree
    }

    pub fn insert(&mut self, p: Position) {
        let mut idx = 0;
        loop {
            self.cells[idx].add_mass(p);
            match self.cells[idx].children {
                Some(first) => {
                    idx = first + self.cells[idx].bounds.quadrant_of(p);
                }
                None => {
                    self.cells[idx].points.push(p);
                    if self.cells[idx].should_split(&self.limits) {
                        self.split(idx);
                    }
                    return;
                }
            }
        }
    }

    fn split(&mut self, idx: usize) {
        let first = self.cells.len();
        let bounds = self.cells[idx].bounds;
        let depth = self.cells[idx].depth + 1;
        for q in 0..4 {
            self.cells.push(Cell::new(bounds.quadrant(q), depth));
        }
        self.cells[idx].children = Some(first);

        let points = std::mem::take(&mut self.cells[idx].points);
        for p in points {
            let child = first + bounds.quadrant_of(p);
            self.cells[child].add_mass(p);
            self.cells[child].points.push(p);
        }
        // all points may land in one quadrant
        for child in first..first + 4 {
            if self.cells[child].should_split(&self.limits) {
                self.split(child);
            }
        }
    }

    /// Total number of inserted points.
    pub fn mass(&self) -> f64 {
        self.cells[0].mass
    }

    pub fn center_of_mass(&self) -> Option<Position> {
        let root = &self.cells[0];
        (root.mass > 0.0).then(|| Position::new(root.sum_x / root.mass, root.sum_y / root.mass))
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn depth(&self) -> u32 {
        self.cells.iter().map(|c| c.depth).max().unwrap_or(0)
    }

    /// Approximate repulsive force on a body at `p`. A cell whose
    /// width/distance ratio is below `theta`, or any leaf, acts as a single
    /// body at its centre of mass.
    pub fn repulsion(&self, p: Position, theta: f64, strength: f64, eps: f64) -> Position {
        let mut force = Position::default();
        self.accumulate(0, p, theta, strength, eps, &mut force);
        force
    }

    fn accumulate(
        &self,
        idx: usize,
        p: Position,
        theta: f64,
        strength: f64,
        eps: f64,
        force: &mut Position,
    ) {
        let cell = &self.cells[idx];
        if cell.mass == 0.0 {
            return;
        }

        let dx = cell.sum_x / cell.mass - p.x;
        let dy = cell.sum_y / cell.mass - p.y;
        let dist_sq = dx * dx + dy * dy + eps;
        let dist = dist_sq.sqrt();

        match cell.children {
            Some(first) if cell.bounds.width / dist >= theta => {
                for child in first..first + 4 {
                    self.accumulate(child, p, theta, strength, eps, force);
                }
            }
            _ => {
                let scale = strength * cell.mass / (dist_sq * dist);
                force.x -= dx * scale;
                force.y -= dy * scale;
            }
        }
    }
}
