//! Series / parallel / complex classification.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use super::graph::Graph;

/// Qualitative shape of a circuit graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    Series,
    Parallel,
    Complex,
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Topology::Series => "series",
            Topology::Parallel => "parallel",
            Topology::Complex => "complex",
        };
        f.write_str(s)
    }
}

/// Branch and node counts behind a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchCount {
    /// Conductive, non-source edges
    pub branches: usize,
    /// Distinct nodes touched by those edges
    pub nodes: usize,
}

impl BranchCount {
    /// Count branches and their nodes.
    ///
    /// Power sources drive the circuit rather than forming branches of it,
    /// so they are left out of both counts.
    pub fn of(graph: &Graph) -> Self {
        let mut nodes = HashSet::new();
        let mut branches = 0;
        for edge in graph.edges().iter().filter(|e| e.is_branch()) {
            branches += 1;
            nodes.insert(edge.from);
            nodes.insert(edge.to);
        }
        Self {
            branches,
            nodes: nodes.len(),
        }
    }

    /// Apply the classification rule.
    ///
    /// This is a counting heuristic, not a topology proof: anything with
    /// fewer branches than a spanning tree needs is handed to the general
    /// solver.
    pub fn topology(&self) -> Topology {
        let b = self.branches as isize;
        let tree = self.nodes as isize - 1;
        if b == tree {
            Topology::Series
        } else if b > tree {
            Topology::Parallel
        } else {
            Topology::Complex
        }
    }
}

/// Classify a circuit graph.
pub fn classify(graph: &Graph) -> Topology {
    BranchCount::of(graph).topology()
}
