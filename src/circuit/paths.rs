//! Conduction paths and independent loops.
//!
//! Path and loop emission are iterative depth-first searches with
//! visited-edge marking, restricted to conductive edges: voltmeters are never
//! walked and an open switch is indistinguishable from a missing wire. Plain
//! reachability runs on the graph's petgraph mirror through the same filter.

use std::collections::{BTreeSet, HashSet};

use petgraph::algo::has_path_connecting;
use petgraph::visit::EdgeFiltered;

use super::graph::Graph;
use super::types::{EdgeId, NodeId};

/// A closed sequence of edges.
///
/// Starting at `start` and following `edges` in order returns to `start`
/// without reusing an edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loop {
    pub start: NodeId,
    pub edges: Vec<EdgeId>,
}

impl Loop {
    /// Order- and direction-independent identity of the loop.
    pub fn edge_set(&self) -> BTreeSet<EdgeId> {
        self.edges.iter().copied().collect()
    }

    /// Walk the loop, yielding each edge with `+1.0` when it is traversed
    /// `from -> to` and `-1.0` when traversed backwards.
    pub fn traverse(&self, graph: &Graph) -> Vec<(EdgeId, f64)> {
        let mut at = self.start;
        self.edges
            .iter()
            .map(|&eid| {
                let edge = graph.edge(eid);
                let sign = if edge.from == at { 1.0 } else { -1.0 };
                at = edge.opposite(at);
                (eid, sign)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Depth-first path and loop search over the conductive part of a graph.
pub struct PathFinder<'g> {
    graph: &'g Graph,
    excluded: HashSet<EdgeId>,
}

impl<'g> PathFinder<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            excluded: HashSet::new(),
        }
    }

    /// Leave an edge out of every traversal (e.g. the source whose
    /// terminals are being joined).
    pub fn excluding(mut self, edge: EdgeId) -> Self {
        self.excluded.insert(edge);
        self
    }

    fn usable(&self, edge: EdgeId) -> bool {
        self.graph.edge(edge).conductive && !self.excluded.contains(&edge)
    }

    /// First conductive edge sequence leading from `start` to `end`.
    ///
    /// Returns an empty path when `start == end` and `None` when the search
    /// is exhausted.
    pub fn find_conductive_path(&self, start: NodeId, end: NodeId) -> Option<Vec<EdgeId>> {
        if start == end {
            return Some(Vec::new());
        }

        let graph = self.graph;
        let mut visited_edges = vec![false; graph.edge_count()];
        let mut visited_nodes = vec![false; graph.node_count()];
        visited_nodes[start.0] = true;

        // (node, next incident edge to try); path[i] leads from stack[i] to stack[i + 1]
        let mut stack: Vec<(NodeId, usize)> = vec![(start, 0)];
        let mut path: Vec<EdgeId> = Vec::new();

        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            let incident = &graph.node(node).edges;
            if frame.1 >= incident.len() {
                stack.pop();
                path.pop();
                continue;
            }
            let eid = incident[frame.1];
            frame.1 += 1;

            if visited_edges[eid.0] || !self.usable(eid) {
                continue;
            }
            visited_edges[eid.0] = true;

            let next = graph.edge(eid).opposite(node);
            if visited_nodes[next.0] {
                continue;
            }
            visited_nodes[next.0] = true;
            path.push(eid);
            if next == end {
                return Some(path);
            }
            stack.push((next, 0));
        }

        None
    }

    /// Whether `start` and `end` are joined by conductive edges.
    pub fn is_connected(&self, start: NodeId, end: NodeId) -> bool {
        let conductive = EdgeFiltered::from_fn(self.graph.net(), |e| self.usable(*e.weight()));
        has_path_connecting(&conductive, start.index(), end.index(), None)
    }

    /// Enumerate an independent set of loops.
    ///
    /// Every conductive edge that reaches a node still on the DFS stack closes
    /// the loop formed by the stack segment above that node. Since each edge
    /// is visited once, the result has one loop per non-tree edge.
    pub fn find_all_loops(&self) -> Vec<Loop> {
        let graph = self.graph;
        let mut visited_edges = vec![false; graph.edge_count()];
        let mut seen = vec![false; graph.node_count()];
        let mut depth: Vec<Option<usize>> = vec![None; graph.node_count()];
        let mut loops = Vec::new();
        let mut identities: HashSet<BTreeSet<EdgeId>> = HashSet::new();

        for root in graph.nodes().iter().map(|n| n.id) {
            if seen[root.0] {
                continue;
            }
            seen[root.0] = true;
            depth[root.0] = Some(0);

            let mut stack: Vec<(NodeId, usize)> = vec![(root, 0)];
            let mut path: Vec<EdgeId> = Vec::new();

            while let Some(frame) = stack.last_mut() {
                let node = frame.0;
                let incident = &graph.node(node).edges;
                if frame.1 >= incident.len() {
                    depth[node.0] = None;
                    stack.pop();
                    path.pop();
                    continue;
                }
                let eid = incident[frame.1];
                frame.1 += 1;

                if visited_edges[eid.0] || !self.usable(eid) {
                    continue;
                }
                visited_edges[eid.0] = true;

                let next = graph.edge(eid).opposite(node);
                if let Some(k) = depth[next.0] {
                    let mut edges = path[k..].to_vec();
                    edges.push(eid);
                    let candidate = Loop {
                        start: stack[k].0,
                        edges,
                    };
                    if identities.insert(candidate.edge_set()) {
                        loops.push(candidate);
                    }
                } else if !seen[next.0] {
                    seen[next.0] = true;
                    depth[next.0] = Some(stack.len());
                    stack.push((next, 0));
                    path.push(eid);
                }
            }
        }

        loops
    }
}
