//! Nodal analysis for circuits of any shape.
//!
//! Every edge is stamped as a conductance, non-conductive ones included: an
//! open switch is a 1 GΩ resistor and a voltmeter a 1 MΩ one, which keeps
//! the matrix non-singular without special cases. Batteries enter as their
//! Norton equivalent, a current `V / r` in parallel with `1 / r`.
//!
//! Each connected island gets one reference node held at 0 V. In the
//! primary source's island that is the source's negative terminal.

use tracing::debug;

use super::matrix::ConductanceMatrix;
use super::solution::{Solution, Strategy};
use super::{AnalyzerConfig, MIN_SOURCE_RESISTANCE};
use crate::circuit::{EdgeId, Graph, NodeId};
use crate::error::{CircuitError, Result};

/// Matrix row of every node, `None` for island references.
fn assign_rows(graph: &Graph, primary: EdgeId) -> (Vec<Option<usize>>, usize) {
    let (island, count) = graph.islands();
    let mut reference: Vec<Option<NodeId>> = vec![None; count];

    let primary_neg = graph.edge(primary).from;
    reference[island[primary_neg.0]] = Some(primary_neg);

    for edge in graph.edges().iter().filter(|e| e.is_source()) {
        let slot = &mut reference[island[edge.from.0]];
        if slot.is_none() {
            *slot = Some(edge.from);
        }
    }
    // Nodes are visited in id order, so the first seen is the lowest id.
    for node in graph.nodes() {
        let slot = &mut reference[island[node.id.0]];
        if slot.is_none() {
            *slot = Some(node.id);
        }
    }

    let mut rows = vec![None; graph.node_count()];
    let mut size = 0;
    for node in graph.nodes() {
        if reference[island[node.id.0]] != Some(node.id) {
            rows[node.id.0] = Some(size);
            size += 1;
        }
    }
    (rows, size)
}

fn source_resistance(internal: f64) -> f64 {
    internal.max(MIN_SOURCE_RESISTANCE)
}

/// Solve node potentials and branch currents for the whole graph.
pub fn solve(graph: &Graph, primary: EdgeId, config: &AnalyzerConfig) -> Result<Solution> {
    let (rows, size) = assign_rows(graph, primary);
    let mut system = ConductanceMatrix::new(size);

    for edge in graph.edges() {
        if edge.is_self_loop() {
            continue;
        }
        let (a, b) = (rows[edge.from.0], rows[edge.to.0]);
        if edge.is_source() {
            let r = source_resistance(edge.resistance);
            system.stamp_conductance(a, b, 1.0 / r);
            system.stamp_current_source(a, b, edge.source_voltage / r);
        } else {
            if edge.resistance <= 0.0 {
                return Err(CircuitError::division_by_zero(format!(
                    "conductance of {}",
                    edge.kind.type_name()
                )));
            }
            system.stamp_conductance(a, b, 1.0 / edge.resistance);
        }
    }

    debug!(size, "solving nodal system");
    system.solve(config.pivot_tolerance)?;

    let mut solution = Solution::new(Strategy::Nodal, graph);
    for node in graph.nodes() {
        let v = system.voltage(rows[node.id.0]);
        if !v.is_finite() {
            return Err(CircuitError::NumericalOverflow {
                node: node.key.to_string(),
                value: v,
            });
        }
        solution.set_node(graph, node.id, v);
    }

    for edge in graph.edges() {
        let diff = system.voltage(rows[edge.from.0]) - system.voltage(rows[edge.to.0]);
        let current = if edge.is_self_loop() {
            0.0
        } else if edge.is_source() {
            (edge.source_voltage + diff) / source_resistance(edge.resistance)
        } else {
            diff / edge.resistance
        };
        if !current.is_finite() {
            return Err(CircuitError::NumericalOverflow {
                node: graph.node(edge.from).key.to_string(),
                value: current,
            });
        }
        solution.set_edge(graph, edge.id, diff, current);
    }

    let src = graph.edge(primary);
    let current = (src.source_voltage
        + system.voltage(rows[src.from.0])
        - system.voltage(rows[src.to.0]))
        / source_resistance(src.resistance);
    solution.source_current = Some(current);
    if current != 0.0 {
        let terminal = system.voltage(rows[src.to.0]) - system.voltage(rows[src.from.0]);
        solution.equivalent_resistance = Some(terminal / current);
    }

    Ok(solution)
}
