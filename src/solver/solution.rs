//! Scratch results of one strategy run.
//!
//! Strategies never touch components. They fill a [`Solution`], which the
//! analyzer commits onto the components only once the whole analysis has
//! succeeded.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use serde::Serialize;

use crate::circuit::{EdgeId, EdgeKey, Graph, Loop, NodeId, NodeKey};

/// Algorithm that produced a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Series,
    Parallel,
    Nodal,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Strategy::Series => "series reduction",
            Strategy::Parallel => "parallel reduction",
            Strategy::Nodal => "nodal analysis",
        };
        f.write_str(s)
    }
}

/// Displayed reading of one component: magnitudes only.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Reading {
    pub voltage: f64,
    pub current: f64,
}

/// Outcome of a strategy that may decline a circuit it was not built for.
#[derive(Debug)]
pub enum Reduction {
    Solved(Solution),
    /// The graph does not have the shape the reduction assumes
    NotApplicable(String),
}

/// Per-edge and per-node results of one strategy run.
#[derive(Debug, Clone)]
pub struct Solution {
    pub strategy: Strategy,
    /// Reading per edge (edge index == component position)
    pub readings: Vec<Reading>,
    /// Signed potential drop `v(from) - v(to)` per edge
    pub drops: Vec<f64>,
    pub node_voltages: BTreeMap<NodeKey, f64>,
    /// Signed branch currents, oriented by the edge key
    pub branch_currents: BTreeMap<EdgeKey, f64>,
    /// Resistance the primary source sees
    pub equivalent_resistance: Option<f64>,
    /// Current delivered by the primary source
    pub source_current: Option<f64>,
}

impl Solution {
    /// A solution with every reading at zero.
    pub fn new(strategy: Strategy, graph: &Graph) -> Self {
        Self {
            strategy,
            readings: vec![Reading::default(); graph.edge_count()],
            drops: vec![0.0; graph.edge_count()],
            node_voltages: BTreeMap::new(),
            branch_currents: BTreeMap::new(),
            equivalent_resistance: None,
            source_current: None,
        }
    }

    /// Record an edge's signed `from -> to` drop and current.
    pub fn set_edge(&mut self, graph: &Graph, edge: EdgeId, drop: f64, current: f64) {
        self.drops[edge.0] = drop;
        self.readings[edge.0] = Reading {
            voltage: drop.abs(),
            current: current.abs(),
        };
        if !graph.edge(edge).is_self_loop() {
            let (key, sign) = graph.edge_key(edge);
            *self.branch_currents.entry(key).or_insert(0.0) += sign * current;
        }
    }

    pub fn set_node(&mut self, graph: &Graph, node: NodeId, voltage: f64) {
        self.node_voltages.insert(graph.node(node).key, voltage);
    }

    pub fn node_voltage(&self, graph: &Graph, node: NodeId) -> Option<f64> {
        self.node_voltages.get(&graph.node(node).key).copied()
    }

    /// Give nodes hanging off the solved part of the circuit the potential
    /// of the node they hang from.
    ///
    /// Only conductive edges that carry no current in this solution are
    /// crossed, so the potential is unchanged along them.
    pub fn propagate_idle_potentials(&mut self, graph: &Graph) {
        let mut queue: VecDeque<NodeId> = graph
            .nodes()
            .iter()
            .filter(|n| self.node_voltages.contains_key(&n.key))
            .map(|n| n.id)
            .collect();

        while let Some(node) = queue.pop_front() {
            let Some(v) = self.node_voltage(graph, node) else {
                continue;
            };
            for &eid in &graph.node(node).edges {
                let edge = graph.edge(eid);
                if !edge.conductive || self.readings[eid.0].current != 0.0 {
                    continue;
                }
                let next = edge.opposite(node);
                if self.node_voltage(graph, next).is_none() {
                    self.set_node(graph, next, v);
                    queue.push_back(next);
                }
            }
        }
    }

    /// Kirchhoff voltage-law residual of a loop: the signed sum of the edge
    /// drops met while walking it.
    pub fn kvl_residual(&self, graph: &Graph, l: &Loop) -> f64 {
        l.traverse(graph)
            .iter()
            .map(|&(eid, sign)| sign * self.drops[eid.0])
            .sum()
    }
}
