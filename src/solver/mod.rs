//! DC circuit solver.
//!
//! This module turns a circuit [`Graph`] into node potentials and branch
//! currents.
//!
//! ## Strategies
//!
//! The topology classification picks a strategy:
//! - Series: one loop, `I = ΣV / ΣR` through every element
//! - Parallel: independent branches across one source, `R_eq = 1 / Σ(1/R)`
//! - Complex: nodal analysis
//!
//! The two reductions check that the graph really has the shape they assume.
//! When it does not, nodal analysis takes over, so every closed circuit gets
//! solved.
//!
//! ## Nodal analysis
//!
//! Node potentials solve the system G·v = i where:
//! - G is the conductance matrix, one row per non-reference node
//! - v is the vector of node voltages
//! - i is the current injected into each node by the sources
//!
//! Batteries are Norton equivalents, so G is a symmetric weighted Laplacian
//! with the reference rows removed and plain Gaussian elimination is enough.

mod analyzer;
mod feedback;
mod gates;
mod matrix;
mod nodal;
mod parallel;
mod series;
mod solution;
mod voltmeter;

pub use analyzer::{Analysis, AnalysisStatus, Analyzer, AnalyzerConfig};
pub use feedback::{Feedback, FeedbackEntry, Severity};
pub use matrix::ConductanceMatrix;
pub use solution::{Reading, Reduction, Solution, Strategy};
pub use voltmeter::bridged_element;

use crate::circuit::{EdgeId, Graph, Topology};
use crate::error::Result;

/// Gate input voltage above which an input reads high (5 V logic).
pub const DEFAULT_LOGIC_THRESHOLD: f64 = 2.5;

/// Gate output level when high.
pub const DEFAULT_LOGIC_HIGH: f64 = 5.0;

/// Smallest pivot the elimination accepts before reporting a singular matrix.
pub const DEFAULT_PIVOT_TOLERANCE: f64 = 1e-15;

/// Floor on a battery's internal resistance in the nodal solve.
pub const MIN_SOURCE_RESISTANCE: f64 = 0.001;

/// Solve a classified graph driven by `source`.
///
/// Dispatches on the topology and falls back to nodal analysis when a
/// reduction does not apply (or reductions are disabled).
pub fn analyze(
    graph: &Graph,
    topology: Topology,
    source: EdgeId,
    config: &AnalyzerConfig,
    feedback: &mut Feedback,
) -> Result<Solution> {
    if config.reductions {
        let reduction = match topology {
            Topology::Series => Some(series::reduce(graph, source)?),
            Topology::Parallel => Some(parallel::reduce(graph, source)?),
            Topology::Complex => None,
        };
        match reduction {
            Some(Reduction::Solved(solution)) => return Ok(solution),
            Some(Reduction::NotApplicable(reason)) => {
                feedback.info(format!(
                    "{} reduction does not apply ({}), using nodal analysis",
                    topology, reason
                ));
            }
            None => {}
        }
    }
    nodal::solve(graph, source, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::ComponentId;
    use crate::components::{Component, ComponentKind};

    #[test]
    fn test_fallback_is_reported() {
        // Two batteries in parallel: classified parallel, but not reducible
        let parts = vec![
            Component::new(ComponentId(0), "B1", (0.0, 0.0), (0.0, 1.0), ComponentKind::battery(6.0)),
            Component::new(ComponentId(1), "R1", (0.0, 1.0), (0.0, 0.0), ComponentKind::resistor(10.0)),
            Component::new(ComponentId(2), "R2", (0.0, 1.0), (0.0, 0.0), ComponentKind::resistor(10.0)),
            Component::new(ComponentId(3), "B2", (0.0, 0.0), (0.0, 1.0), ComponentKind::battery(6.0)),
        ];
        let graph = Graph::build(&parts);
        let mut fb = Feedback::new();
        let s = analyze(&graph, Topology::Parallel, EdgeId(0), &AnalyzerConfig::default(), &mut fb)
            .unwrap();
        assert_eq!(s.strategy, Strategy::Nodal);
        assert!(fb.entries()[0].message.contains("nodal"));
    }
}
