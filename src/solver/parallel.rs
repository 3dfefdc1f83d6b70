//! Parallel reduction: independent branches across one source.

use std::collections::HashSet;

use tracing::debug;

use super::solution::{Reduction, Solution, Strategy};
use crate::circuit::{EdgeId, Graph, NodeId};
use crate::components::ComponentKind;
use crate::error::{CircuitError, Result};

/// A run of edges from the positive rail to the negative rail.
#[derive(Debug)]
struct Branch {
    /// Positive-rail node the branch leaves from
    start: NodeId,
    /// `(edge, +1.0 if crossed from -> to)` in walking order
    edges: Vec<(EdgeId, f64)>,
    resistance: f64,
}

/// Nodes joined to `start` by conductive wires alone.
fn rail(graph: &Graph, start: NodeId) -> HashSet<NodeId> {
    let mut members = HashSet::from([start]);
    let mut stack = vec![start];
    while let Some(node) = stack.pop() {
        for &eid in &graph.node(node).edges {
            let edge = graph.edge(eid);
            if !edge.conductive || !matches!(edge.kind, ComponentKind::Wire) {
                continue;
            }
            let next = edge.opposite(node);
            if members.insert(next) {
                stack.push(next);
            }
        }
    }
    members
}

/// Edges that carry branch current: conductive, non-source, not a rail wire.
fn carries(graph: &Graph, eid: EdgeId, rails: (&HashSet<NodeId>, &HashSet<NodeId>)) -> bool {
    let edge = graph.edge(eid);
    if !edge.is_branch() || edge.is_self_loop() {
        return false;
    }
    let within = |r: &HashSet<NodeId>| r.contains(&edge.from) && r.contains(&edge.to);
    !(matches!(edge.kind, ComponentKind::Wire) && (within(rails.0) || within(rails.1)))
}

/// Solve a circuit whose branches each run straight from one terminal of
/// the single source to the other.
///
/// Each branch sees the full terminal voltage, so `I_b = V / R_b` and the
/// source sees `R_eq = 1 / Σ(1 / R_b)`.
pub fn reduce(graph: &Graph, source: EdgeId) -> Result<Reduction> {
    let sources = graph.edges().iter().filter(|e| e.is_source()).count();
    if sources != 1 {
        return Ok(Reduction::NotApplicable(format!(
            "{} power sources, parallel reduction needs exactly one",
            sources
        )));
    }

    let src = graph.edge(source);
    if src.is_self_loop() {
        return Ok(Reduction::NotApplicable("source terminals coincide".to_string()));
    }

    let positive = rail(graph, src.to);
    let negative = rail(graph, src.from);
    if !positive.is_disjoint(&negative) {
        return Ok(Reduction::NotApplicable("source is shorted by wires".to_string()));
    }
    let rails = (&positive, &negative);

    let mut branches = Vec::new();
    let mut covered = HashSet::new();

    // Start nodes sorted so branch order follows node order.
    let mut starts: Vec<NodeId> = positive.iter().copied().collect();
    starts.sort();

    for start in starts {
        for &first in &graph.node(start).edges {
            if !carries(graph, first, rails) || covered.contains(&first) {
                continue;
            }

            let mut edges = Vec::new();
            let mut resistance = 0.0;
            let mut at = start;
            let mut eid = first;
            loop {
                let edge = graph.edge(eid);
                let dir = if edge.from == at { 1.0 } else { -1.0 };
                edges.push((eid, dir));
                covered.insert(eid);
                resistance += edge.resistance;
                at = edge.opposite(at);

                if negative.contains(&at) {
                    break;
                }
                if positive.contains(&at) {
                    return Ok(Reduction::NotApplicable(format!(
                        "branch through {} returns to the positive rail",
                        first
                    )));
                }

                let onward: Vec<EdgeId> = graph
                    .node(at)
                    .edges
                    .iter()
                    .copied()
                    .filter(|&e| e != eid && carries(graph, e, rails))
                    .collect();
                match onward.as_slice() {
                    [next] if !covered.contains(next) => eid = *next,
                    [] => {
                        return Ok(Reduction::NotApplicable(format!(
                            "branch through {} ends at node {}",
                            first, at
                        )))
                    }
                    _ => {
                        return Ok(Reduction::NotApplicable(format!(
                            "node {} joins more than two branch elements",
                            at
                        )))
                    }
                }
            }

            if resistance <= 0.0 {
                return Err(CircuitError::division_by_zero("parallel branch current"));
            }
            branches.push(Branch {
                start,
                edges,
                resistance,
            });
        }
    }

    if let Some(stray) = graph
        .edges()
        .iter()
        .find(|e| carries(graph, e.id, rails) && !covered.contains(&e.id))
    {
        return Ok(Reduction::NotApplicable(format!(
            "{} is not on a branch between the source terminals",
            stray.id
        )));
    }
    if branches.is_empty() {
        return Ok(Reduction::NotApplicable("no branches across the source".to_string()));
    }

    let conductance: f64 = branches.iter().map(|b| 1.0 / b.resistance).sum();
    let equivalent = 1.0 / conductance;
    let total = src.source_voltage / (equivalent + src.resistance);
    let terminal = total * equivalent;
    debug!(branches = branches.len(), equivalent, total, "parallel reduction");

    let mut solution = Solution::new(Strategy::Parallel, graph);
    solution.equivalent_resistance = Some(equivalent);
    solution.source_current = Some(total);
    solution.set_edge(graph, source, -terminal, total);

    for &node in &positive {
        solution.set_node(graph, node, terminal);
    }
    for &node in &negative {
        solution.set_node(graph, node, 0.0);
    }

    for branch in &branches {
        let current = terminal / branch.resistance;
        let mut potential = terminal;
        let mut at = branch.start;
        for &(eid, dir) in &branch.edges {
            let edge = graph.edge(eid);
            let travel_drop = current * edge.resistance;
            solution.set_edge(graph, eid, dir * travel_drop, dir * current);
            potential -= travel_drop;
            at = edge.opposite(at);
            if !negative.contains(&at) {
                solution.set_node(graph, at, potential);
            }
        }
    }

    solution.propagate_idle_potentials(graph);
    Ok(Reduction::Solved(solution))
}
