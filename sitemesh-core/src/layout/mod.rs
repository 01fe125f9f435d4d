// Force-directed layout with Barnes-Hut repulsion

pub mod quadtree;

use crate::graphml::GraphData;
use quadtree::{Bounds, QuadTree, TreeLimits};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::{Add, Sub};
use tracing::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    fn scale(self, k: f64) -> Self {
        Self::new(self.x * k, self.y * k)
    }
}

impl Add for Position {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Node ids paired with their final positions, in first-seen node order.
pub type Layout = Vec<(String, Position)>;

#[derive(Clone, Debug)]
pub struct LayoutConfig {
    pub iterations: usize,
    /// Barnes-Hut opening criterion. 0 gives the exact all-pairs sum.
    pub theta: f64,
    pub spring_length: f64,
    pub spring_k: f64,
    /// Repulsion strength. `None` scales with the node count: 1000 * sqrt(n).
    pub repulsion: Option<f64>,
    /// Velocity is multiplied by this after each step.
    pub damping: f64,
    /// Per-step cap on each component of the net force.
    pub max_step: f64,
    pub seed: u64,
    pub tree: TreeLimits,
    /// Softening term added to squared distances in repulsion and to
    /// spring lengths, keeping coincident nodes finite.
    pub eps: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 400,
            theta: 0.5,
            spring_length: 80.0,
            spring_k: 0.05,
            repulsion: None,
            damping: 0.85,
            max_step: 50.0,
            seed: 42,
            tree: TreeLimits::default(),
            eps: 1e-4,
        }
    }
}

struct Body {
    pos: Position,
    vel: Position,
}

/// Positions every node of `graph` on a `width` x `height` canvas.
///
/// Edges naming an unknown node are ignored. For a fixed config the result
/// is identical across runs regardless of the rayon thread count.
pub fn compute_layout(graph: &GraphData, width: f64, height: f64, config: &LayoutConfig) -> Layout {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut ids: Vec<&str> = Vec::new();
    for node in &graph.nodes {
        if !index.contains_key(node.as_str()) {
            index.insert(node.as_str(), ids.len());
            ids.push(node.as_str());
        }
    }

    let n = ids.len();
    if n == 0 {
        return Vec::new();
    }

    let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut skipped = 0;
    for (source, target) in &graph.edges {
        match (index.get(source.as_str()), index.get(target.as_str())) {
            (Some(&a), Some(&b)) => {
                neighbors[a].push(b);
                neighbors[b].push(a);
            }
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!("Ignoring {} edges with unknown endpoints", skipped);
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut bodies: Vec<Body> = (0..n)
        .map(|_| Body {
            pos: Position::new(
                width * 0.5 + rng.random::<f64>() * 100.0 - 50.0,
                height * 0.5 + rng.random::<f64>() * 100.0 - 50.0,
            ),
            vel: Position::default(),
        })
        .collect();

    let strength = config
        .repulsion
        .unwrap_or_else(|| 1000.0 * (n as f64).sqrt());
    let bounds = Bounds::new(0.0, 0.0, width, height);

    debug!(
        "Laying out {} nodes for {} iterations (repulsion {:.1})",
        n, config.iterations, strength
    );

    for _ in 0..config.iterations {
        let positions: Vec<Position> = bodies.iter().map(|b| b.pos).collect();
        let tree = QuadTree::build(bounds, config.tree, &positions);

        let velocities: Vec<Position> = bodies
            .par_iter()
            .enumerate()
            .map(|(i, body)| {
                let mut force = tree.repulsion(body.pos, config.theta, strength, config.eps);
                for &j in &neighbors[i] {
                    let delta = positions[j] - body.pos;
                    let dist = delta.length() + config.eps;
                    let pull = config.spring_k * (dist - config.spring_length);
                    force = force + delta.scale(pull / dist);
                }

                let step = config.max_step;
                force = Position::new(force.x.max(-step).min(step), force.y.max(-step).min(step));
                (body.vel + force).scale(config.damping)
            })
            .collect();

        for (body, vel) in bodies.iter_mut().zip(velocities) {
            body.vel = vel;
            body.pos = body.pos + vel;
        }
    }

    ids.into_iter()
        .zip(bodies)
        .map(|(id, body)| (id.to_string(), body.pos))
        .collect()
}
