//! Step placement on the canvas.
//!
//! Each step sits at a fixed distance from its predecessor, at an angle
//! picked from a fan whose width grows with the predecessor's option count.
//! The layout depends only on the path, so re-deriving it is stable; nodes
//! from different branches may overlap.

use std::f64::consts::PI;
use std::fmt::Write as _;

use flowmap_types::config::LayoutConfig;
use flowmap_types::geometry::{Point, Rect};

use crate::graph::{ContentGraph, Node};
use crate::nav::Step;

/// Widest fan; reached from ten options up.
const MAX_SPREAD: f64 = PI * 0.85;
/// Fan width before the per-option growth.
const BASE_SPREAD: f64 = PI * 0.5;
/// Fan growth per option.
const SPREAD_PER_OPTION: f64 = 0.12;

/// Angular width of the fan for a question with `option_count` options.
pub fn fan_width(option_count: usize) -> f64 {
    MAX_SPREAD.min(BASE_SPREAD + SPREAD_PER_OPTION * option_count as f64)
}

/// Offset from a predecessor to the successor reached via `option_index`
/// of `option_count` options.
pub fn step_offset(option_index: usize, option_count: usize, config: &LayoutConfig) -> Point {
    if option_count <= 1 {
        return Point::new(config.node_distance, 0.0);
    }
    let ratio = option_index as f64 / (option_count - 1) as f64;
    let angle = (ratio - 0.5) * fan_width(option_count);
    Point::new(
        angle.cos() * config.node_distance,
        angle.sin() * config.node_distance * config.vertical_spread,
    )
}

/// Layout coordinates of every step, root at the origin.
pub fn compute_positions(
    steps: &[Step],
    graph: &impl ContentGraph,
    config: &LayoutConfig,
) -> Vec<Point> {
    let mut positions: Vec<Point> = Vec::with_capacity(steps.len());
    for (index, _) in steps.iter().enumerate() {
        if index == 0 {
            positions.push(Point::ORIGIN);
            continue;
        }
        let prev = &steps[index - 1];
        let option_count = graph
            .get(&prev.node_id)
            .map(Node::option_count)
            .filter(|&n| n > 0)
            .unwrap_or(1);
        let option_index = prev.option_index.unwrap_or(0);
        let offset = step_offset(option_index, option_count, config);
        positions.push(positions[index - 1] + offset);
    }
    positions
}

/// Top-left corner of a node card in canvas coordinates.
pub fn canvas_position(position: Point, config: &LayoutConfig) -> Point {
    let c = config.canvas_center();
    Point::new(c + position.x, c + position.y)
}

/// Rectangle a node card occupies in canvas coordinates.
pub fn node_rect(position: Point, config: &LayoutConfig) -> Rect {
    let p = canvas_position(position, config);
    Rect::new(p.x, p.y, config.node_width, config.node_height)
}

/// A cubic curve linking the centers of two consecutive node cards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub from: Point,
    pub c1: Point,
    pub c2: Point,
    pub to: Point,
}

impl Connection {
    /// Horizontal-tangent curve between two node centers.
    pub fn between(from: Point, to: Point, curvature: f64) -> Self {
        let dx = (to.x - from.x) * curvature;
        Self {
            from,
            c1: Point::new(from.x + dx, from.y),
            c2: Point::new(to.x - dx, to.y),
            to,
        }
    }

    /// SVG path data (`M x1 y1 C ...`).
    pub fn svg_path(&self) -> String {
        let mut d = String::new();
        let _ = write!(
            d,
            "M {} {} C {} {} {} {} {} {}",
            self.from.x,
            self.from.y,
            self.c1.x,
            self.c1.y,
            self.c2.x,
            self.c2.y,
            self.to.x,
            self.to.y
        );
        d
    }

    /// Point on the curve at parameter `t` in `[0, 1]`.
    pub fn point_at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let b0 = u * u * u;
        let b1 = 3.0 * u * u * t;
        let b2 = 3.0 * u * t * t;
        let b3 = t * t * t;
        Point::new(
            b0 * self.from.x + b1 * self.c1.x + b2 * self.c2.x + b3 * self.to.x,
            b0 * self.from.y + b1 * self.c1.y + b2 * self.c2.y + b3 * self.to.y,
        )
    }
}

/// Connections between consecutive steps, in canvas coordinates.
pub fn connections(positions: &[Point], config: &LayoutConfig) -> Vec<Connection> {
    positions
        .windows(2)
        .map(|pair| {
            let from = node_rect(pair[0], config).center();
            let to = node_rect(pair[1], config).center();
            Connection::between(from, to, config.link_curvature)
        })
        .collect()
}
