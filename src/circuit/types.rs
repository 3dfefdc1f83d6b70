//! Core types for circuit representation.

use std::fmt;

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

/// Fixed-point scale used to snap terminal coordinates onto the grid.
///
/// Components are placed on a fixed editor grid, so a thousandth of a grid
/// unit is far below any real placement difference.
pub const GRID_SCALE: f64 = 1000.0;

/// A terminal coordinate in editor space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Snap the point onto the grid.
    pub fn key(&self) -> NodeKey {
        NodeKey::from_point(*self)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Identity of an electrical junction: a snapped grid coordinate.
///
/// Two terminals belong to the same node exactly when their keys are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeKey {
    pub x: i64,
    pub y: i64,
}

impl NodeKey {
    /// Snap a point to its node key.
    pub fn from_point(p: Point) -> Self {
        Self {
            x: (p.x * GRID_SCALE).round() as i64,
            y: (p.y * GRID_SCALE).round() as i64,
        }
    }

    /// The grid coordinate this key stands for.
    pub fn to_point(&self) -> Point {
        Point::new(self.x as f64 / GRID_SCALE, self.y as f64 / GRID_SCALE)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.to_point();
        write!(f, "({},{})", p.x, p.y)
    }
}

/// Key of a branch: the sorted pair of its terminal node keys.
///
/// Branch currents stored under an `EdgeKey` are signed from `a` to `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    pub a: NodeKey,
    pub b: NodeKey,
}

impl EdgeKey {
    /// Build the key for a branch running `from -> to`.
    ///
    /// Returns the key and the sign that converts a `from -> to` current
    /// into the key's `a -> b` orientation.
    pub fn oriented(from: NodeKey, to: NodeKey) -> (Self, f64) {
        if from <= to {
            (Self { a: from, b: to }, 1.0)
        } else {
            (Self { a: to, b: from }, -1.0)
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.a, self.b)
    }
}

/// Dense index of a node inside one [`Graph`](super::Graph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The same node in the graph's petgraph mirror.
    pub fn index(self) -> NodeIndex {
        NodeIndex::new(self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// Dense index of an edge inside one [`Graph`](super::Graph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// A unique identifier for a component, assigned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(pub usize);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}
