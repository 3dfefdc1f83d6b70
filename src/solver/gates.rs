//! Digital post-pass over the analog solution.
//!
//! Gates take part in the linear solve as plain resistors. Afterwards each
//! gate reads the voltage of every other element on its `start` node as an
//! input bit, evaluates its truth table and forces the ideal output level
//! onto itself and every other element on its `end` node. Gates run in
//! component order, so a gate driven by an earlier gate sees that gate's
//! forced level.
//!
//! Only displayed readings are overridden. Drops and node potentials stay
//! analog, which keeps the Kirchhoff bookkeeping consistent.

use tracing::debug;

use super::feedback::Feedback;
use super::solution::Solution;
use super::AnalyzerConfig;
use crate::circuit::{EdgeId, Graph, NodeId};
use crate::components::{Component, ComponentKind};

fn others_at(graph: &Graph, node: NodeId, gate: EdgeId) -> Vec<EdgeId> {
    graph
        .node(node)
        .edges
        .iter()
        .copied()
        .filter(|&e| e != gate)
        .collect()
}

/// Apply every gate's logic level to the solution.
pub fn evaluate(
    graph: &Graph,
    components: &[Component],
    solution: &mut Solution,
    config: &AnalyzerConfig,
    feedback: &mut Feedback,
) {
    for edge in graph.edges() {
        let ComponentKind::LogicGate(gate) = &edge.kind else {
            continue;
        };
        let name = components
            .get(edge.component)
            .map(|c| c.name.as_str())
            .unwrap_or("?");

        let inputs = others_at(graph, edge.from, edge.id);
        if inputs.is_empty() || edge.is_self_loop() {
            feedback.info(format!("{} gate {} has no inputs, skipped", gate.kind, name));
            continue;
        }

        let bits: Vec<bool> = inputs
            .iter()
            .map(|e| solution.readings[e.0].voltage > config.logic_threshold)
            .collect();
        let high = gate.kind.evaluate(&bits);
        let level = if high { config.logic_high } else { 0.0 };
        debug!(gate = name, kind = %gate.kind, ?bits, high, "gate evaluated");

        solution.readings[edge.id.0].voltage = level;
        for out in others_at(graph, edge.to, edge.id) {
            solution.readings[out.0].voltage = level;
        }
        feedback.info(format!(
            "{} gate {} output {}",
            gate.kind,
            name,
            if high { "HIGH" } else { "LOW" }
        ));
    }
}
