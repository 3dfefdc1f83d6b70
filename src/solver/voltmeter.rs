//! Voltmeter readings for the reduction strategies.
//!
//! The reductions leave voltmeters out of the circuit entirely, so a
//! voltmeter displays the voltage of the element it is clipped across.

use super::solution::Solution;
use crate::circuit::{Edge, EdgeId, Graph};
use crate::components::ComponentKind;

fn is_voltmeter(edge: &Edge) -> bool {
    matches!(edge.kind, ComponentKind::Voltmeter)
}

/// The element a voltmeter is read across.
///
/// Candidates are tried in order: same terminals in the same orientation,
/// same terminals swapped, then anything sharing one terminal. Returns the
/// edge and the sign mapping its drop onto the voltmeter's orientation.
pub fn bridged_element(graph: &Graph, meter: EdgeId) -> Option<(EdgeId, f64)> {
    let m = graph.edge(meter);
    let others = || {
        graph
            .edges()
            .iter()
            .filter(move |e| e.id != meter && !is_voltmeter(e))
    };

    if let Some(e) = others().find(|e| e.from == m.from && e.to == m.to) {
        return Some((e.id, 1.0));
    }
    if let Some(e) = others().find(|e| e.from == m.to && e.to == m.from) {
        return Some((e.id, -1.0));
    }
    others()
        .find(|e| e.from == m.from || e.to == m.to)
        .map(|e| (e.id, 1.0))
        .or_else(|| {
            others()
                .find(|e| e.from == m.to || e.to == m.from)
                .map(|e| (e.id, -1.0))
        })
}

/// Replace every voltmeter reading with the voltage it bridges.
pub fn resolve(graph: &Graph, solution: &mut Solution) {
    for meter in graph.edges().iter().filter(|e| is_voltmeter(e)) {
        let drop = match bridged_element(graph, meter.id) {
            Some((eid, sign)) => sign * solution.drops[eid.0],
            None => 0.0,
        };
        solution.drops[meter.id.0] = drop;
        solution.readings[meter.id.0].voltage = drop.abs();
        solution.readings[meter.id.0].current = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::ComponentId;
    use crate::components::Component;
    use crate::solver::solution::Strategy;

    fn c(i: usize, a: (f64, f64), b: (f64, f64), kind: ComponentKind) -> Component {
        Component::new(ComponentId(i), format!("X{}", i), a, b, kind)
    }

    #[test]
    fn test_search_order() {
        let parts = vec![
            c(0, (0.0, 0.0), (1.0, 0.0), ComponentKind::resistor(1.0)),
            c(1, (1.0, 0.0), (0.0, 0.0), ComponentKind::resistor(2.0)),
            c(2, (1.0, 0.0), (0.0, 0.0), ComponentKind::Voltmeter),
            c(3, (5.0, 0.0), (1.0, 0.0), ComponentKind::resistor(3.0)),
            c(4, (5.0, 0.0), (6.0, 0.0), ComponentKind::Voltmeter),
            c(5, (8.0, 0.0), (9.0, 0.0), ComponentKind::Voltmeter),
        ];
        let graph = Graph::build(&parts);

        // Exact orientation beats the swapped one listed first.
        assert_eq!(bridged_element(&graph, EdgeId(2)), Some((EdgeId(1), 1.0)));
        // Only a shared terminal
        assert_eq!(bridged_element(&graph, EdgeId(4)), Some((EdgeId(3), 1.0)));
        // Only other voltmeters in sight
        assert_eq!(bridged_element(&graph, EdgeId(5)), None);
    }

    #[test]
    fn test_resolve_copies_bridged_drop() {
        let parts = vec![
            c(0, (0.0, 0.0), (1.0, 0.0), ComponentKind::resistor(100.0)),
            c(1, (1.0, 0.0), (0.0, 0.0), ComponentKind::Voltmeter),
            c(2, (7.0, 0.0), (8.0, 0.0), ComponentKind::Voltmeter),
        ];
        let graph = Graph::build(&parts);
        let mut s = Solution::new(Strategy::Series, &graph);
        s.set_edge(&graph, EdgeId(0), 3.0, 0.03);

        resolve(&graph, &mut s);
        assert_eq!(s.drops[1], -3.0);
        assert_eq!(s.readings[1].voltage, 3.0);
        assert_eq!(s.readings[1].current, 0.0);
        assert_eq!(s.readings[2].voltage, 0.0);
    }
}
