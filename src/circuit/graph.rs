//! Node/edge graph built from placed components.
//!
//! Terminals that snap to the same grid coordinate form one node. Every
//! component becomes exactly one edge between the nodes of its `start` and
//! `end` terminals. The graph is rebuilt from scratch for every analysis and
//! owned by that analysis alone.
//!
//! Alongside the incidence lists, the graph keeps a petgraph mirror
//! (node index `i` is `NodeId(i)`, edge weights are `EdgeId`s) for
//! connectivity queries.

use std::collections::HashMap;

use petgraph::graph::UnGraph;
use petgraph::visit::Dfs;
use tracing::debug;

use super::types::{EdgeId, EdgeKey, NodeId, NodeKey};
use crate::components::{Component, ComponentKind};

/// An electrical junction.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub key: NodeKey,
    /// Incident edges in insertion order
    pub edges: Vec<EdgeId>,
}

/// One component seen as a graph edge.
///
/// The electrical quantities are derived once, at build time, from the
/// component's variant and state.
#[derive(Debug, Clone)]
pub struct Edge {
    pub id: EdgeId,
    /// Position of the wrapped component in the analyzed slice
    pub component: usize,
    /// Node of the component's `start` terminal
    pub from: NodeId,
    /// Node of the component's `end` terminal
    pub to: NodeId,
    pub resistance: f64,
    pub conductive: bool,
    pub source_voltage: f64,
    pub kind: ComponentKind,
}

impl Edge {
    /// The node at the other end of this edge.
    pub fn opposite(&self, node: NodeId) -> NodeId {
        if node == self.from {
            self.to
        } else {
            self.from
        }
    }

    /// Whether the edge connects a node to itself.
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }

    pub fn is_source(&self) -> bool {
        self.kind.is_source()
    }

    /// Conductive and not a power source: a branch in the topology sense.
    pub fn is_branch(&self) -> bool {
        self.conductive && !self.is_source()
    }
}

/// The circuit graph of one analysis.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index: HashMap<NodeKey, NodeId>,
    net: UnGraph<NodeId, EdgeId>,
}

impl Graph {
    /// Build the graph for a component list.
    ///
    /// Node ids are handed out in first-seen order, so rebuilding from an
    /// unchanged list yields an identical graph.
    pub fn build(components: &[Component]) -> Self {
        let mut graph = Graph::default();

        for (position, component) in components.iter().enumerate() {
            let from = graph.intern(component.start.key());
            let to = graph.intern(component.end.key());
            let id = EdgeId(graph.edges.len());

            graph.edges.push(Edge {
                id,
                component: position,
                from,
                to,
                resistance: component.effective_resistance(),
                conductive: component.is_conductive(),
                source_voltage: component.source_voltage(),
                kind: component.kind.clone(),
            });

            graph.net.add_edge(from.index(), to.index(), id);
            graph.nodes[from.0].edges.push(id);
            if to != from {
                graph.nodes[to.0].edges.push(id);
            }
        }

        debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "built circuit graph"
        );
        graph
    }

    fn intern(&mut self, key: NodeKey) -> NodeId {
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            id,
            key,
            edges: Vec::new(),
        });
        self.index.insert(key, id);
        self.net.add_node(id);
        id
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    /// The petgraph view of this graph.
    pub fn net(&self) -> &UnGraph<NodeId, EdgeId> {
        &self.net
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Find a node by its grid key.
    pub fn find_node(&self, key: NodeKey) -> Option<NodeId> {
        self.index.get(&key).copied()
    }

    /// Key for an edge's branch current, with the sign that maps a
    /// `from -> to` current onto it.
    pub fn edge_key(&self, id: EdgeId) -> (EdgeKey, f64) {
        let edge = self.edge(id);
        EdgeKey::oriented(self.node(edge.from).key, self.node(edge.to).key)
    }

    /// Edge wrapping the component at `position` in the analyzed slice.
    pub fn edge_for_component(&self, position: usize) -> Option<EdgeId> {
        // Edges are pushed in component order.
        self.edges.get(position).map(|e| e.id)
    }

    /// The first power source in component order.
    pub fn primary_source(&self) -> Option<EdgeId> {
        self.edges.iter().find(|e| e.is_source()).map(|e| e.id)
    }

    /// Label each node with the connected island it belongs to.
    ///
    /// Every edge joins nodes, conductive or not: this is the connectivity
    /// the nodal matrix sees. Returns `(island of each node, island count)`.
    pub fn islands(&self) -> (Vec<usize>, usize) {
        const UNSEEN: usize = usize::MAX;
        let mut label = vec![UNSEEN; self.nodes.len()];
        let mut count = 0;

        for seed in self.net.node_indices() {
            if label[seed.index()] != UNSEEN {
                continue;
            }
            let mut dfs = Dfs::new(&self.net, seed);
            while let Some(node) = dfs.next(&self.net) {
                label[node.index()] = count;
            }
            count += 1;
        }

        (label, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{ComponentId, Point};

    fn series_loop() -> Vec<Component> {
        vec![
            Component::new(ComponentId(0), "V1", (0.0, 0.0), (1.0, 0.0), ComponentKind::battery(9.0)),
            Component::new(ComponentId(1), "R1", (1.0, 0.0), (2.0, 0.0), ComponentKind::resistor(100.0)),
            Component::new(ComponentId(2), "R2", (2.0, 0.0), (3.0, 0.0), ComponentKind::resistor(200.0)),
            Component::new(ComponentId(3), "W1", (3.0, 0.0), (0.0, 0.0), ComponentKind::Wire),
        ]
    }

    #[test]
    fn test_build_shares_coincident_terminals() {
        let graph = Graph::build(&series_loop());
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 4);
        for node in graph.nodes() {
            assert_eq!(node.edges.len(), 2);
        }
    }

    #[test]
    fn test_incidence_is_consistent() {
        let graph = Graph::build(&series_loop());
        for edge in graph.edges() {
            assert!(graph.node(edge.from).edges.contains(&edge.id));
            assert!(graph.node(edge.to).edges.contains(&edge.id));
        }
        for node in graph.nodes() {
            for &eid in &node.edges {
                let e = graph.edge(eid);
                assert!(e.from == node.id || e.to == node.id);
            }
        }
    }

    #[test]
    fn test_petgraph_mirror_matches() {
        let graph = Graph::build(&series_loop());
        let net = graph.net();
        assert_eq!(net.node_count(), graph.node_count());
        assert_eq!(net.edge_count(), graph.edge_count());
        for node in graph.nodes() {
            assert_eq!(net[node.id.index()], node.id);
        }
        for edge in graph.edges() {
            let (a, b) = net.edge_endpoints(petgraph::graph::EdgeIndex::new(edge.id.0)).unwrap();
            assert_eq!((a, b), (edge.from.index(), edge.to.index()));
            assert_eq!(net[petgraph::graph::EdgeIndex::new(edge.id.0)], edge.id);
        }
    }

    #[test]
    fn test_empty_list_builds_empty_graph() {
        let graph = Graph::build(&[]);
        assert!(graph.is_empty());
        assert_eq!(graph.node_count(), 0);
        assert!(graph.primary_source().is_none());
    }

    #[test]
    fn test_rebuild_is_identical() {
        let parts = series_loop();
        let a = Graph::build(&parts);
        let b = Graph::build(&parts);
        let keys = |g: &Graph| g.nodes().iter().map(|n| n.key).collect::<Vec<_>>();
        assert_eq!(keys(&a), keys(&b));
        for (x, y) in a.edges().iter().zip(b.edges()) {
            assert_eq!((x.from, x.to, x.component), (y.from, y.to, y.component));
        }
    }

    #[test]
    fn test_zero_length_component_is_tolerated() {
        let parts = vec![Component::new(
            ComponentId(0),
            "W0",
            (1.0, 1.0),
            (1.0, 1.0),
            ComponentKind::Wire,
        )];
        let graph = Graph::build(&parts);
        assert_eq!(graph.node_count(), 1);
        assert!(graph.edge(EdgeId(0)).is_self_loop());
        assert_eq!(graph.node(NodeId(0)).edges.len(), 1);
        assert_eq!(graph.find_node(Point::new(1.0, 1.0).key()), Some(NodeId(0)));
    }

    #[test]
    fn test_islands() {
        let mut parts = series_loop();
        parts.push(Component::new(
            ComponentId(4),
            "R9",
            (10.0, 10.0),
            (11.0, 10.0),
            ComponentKind::resistor(5.0),
        ));
        let graph = Graph::build(&parts);
        let (labels, count) = graph.islands();
        assert_eq!(count, 2);
        assert_eq!(labels[0], labels[3]);
        assert_ne!(labels[0], labels[4]);
    }
}
