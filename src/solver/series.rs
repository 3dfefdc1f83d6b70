//! Series reduction: one loop, one current.

use tracing::debug;

use super::solution::{Reduction, Solution, Strategy};
use crate::circuit::{EdgeId, Graph, PathFinder};
use crate::error::{CircuitError, Result};

/// Solve a single-loop circuit driven by `source`.
///
/// The loop is the source plus the conductive path from its positive to its
/// negative terminal. Every element of the loop carries `I = ΣV / ΣR`.
/// Meters stay out of `ΣR`; sources add their internal resistance.
pub fn reduce(graph: &Graph, source: EdgeId) -> Result<Reduction> {
    let src = graph.edge(source);
    let (positive, negative) = (src.to, src.from);

    let finder = PathFinder::new(graph).excluding(source);
    let Some(path) = finder.find_conductive_path(positive, negative) else {
        return Ok(Reduction::NotApplicable(
            "no conductive return path for the series loop".to_string(),
        ));
    };

    // The classifier only counts branches: a stray part elsewhere can hide
    // a second path between the terminals.
    let (island, _) = graph.islands();
    let home = island[positive.0];
    let loops = PathFinder::new(graph)
        .find_all_loops()
        .iter()
        .filter(|l| island[l.start.0] == home)
        .count();
    if loops > 1 {
        return Ok(Reduction::NotApplicable(format!(
            "{} loops share the source's island",
            loops
        )));
    }

    if let Some(stray) = graph
        .edges()
        .iter()
        .find(|e| e.is_source() && e.id != source && !path.contains(&e.id))
    {
        return Ok(Reduction::NotApplicable(format!(
            "source {} is not on the series loop",
            stray.id
        )));
    }

    // Walk from the positive terminal back to the negative one, noting the
    // direction each edge is crossed in.
    let mut walk = Vec::with_capacity(path.len());
    let mut at = positive;
    for &eid in &path {
        let edge = graph.edge(eid);
        let dir = if edge.from == at { 1.0 } else { -1.0 };
        walk.push((eid, dir, at));
        at = edge.opposite(at);
    }

    let mut emf = src.source_voltage;
    let mut resistance = src.resistance;
    for &(eid, dir, _) in &walk {
        let edge = graph.edge(eid);
        if edge.is_source() {
            emf += dir * edge.source_voltage;
            resistance += edge.resistance;
        } else if !edge.kind.is_meter() {
            resistance += edge.resistance;
        }
    }

    if resistance <= 0.0 {
        return Err(CircuitError::division_by_zero("series loop current"));
    }
    let current = emf / resistance;
    debug!(emf, resistance, current, "series loop");

    let mut solution = Solution::new(Strategy::Series, graph);
    solution.equivalent_resistance = Some(resistance - src.resistance);
    solution.source_current = Some(current);

    // The source raises its `to` terminal by its EMF, less the drop across
    // its internal resistance, and carries the loop current `from -> to`.
    let terminal = src.source_voltage - current * src.resistance;
    solution.set_edge(graph, source, -terminal, current);
    solution.set_node(graph, negative, 0.0);
    solution.set_node(graph, positive, terminal);

    let mut potential = terminal;
    for &(eid, dir, from) in &walk {
        let edge = graph.edge(eid);
        // Drop along the direction of travel
        let travel_drop = if edge.is_source() {
            current * edge.resistance - dir * edge.source_voltage
        } else if edge.kind.is_meter() {
            0.0
        } else {
            current * edge.resistance
        };
        solution.set_edge(graph, eid, dir * travel_drop, dir * current);

        potential -= travel_drop;
        let next = edge.opposite(from);
        if next != negative {
            solution.set_node(graph, next, potential);
        }
    }

    solution.propagate_idle_potentials(graph);
    Ok(Reduction::Solved(solution))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{ComponentId, Point};
    use crate::components::{Component, ComponentKind};
    use approx::assert_abs_diff_eq;

    fn c(i: usize, a: (f64, f64), b: (f64, f64), kind: ComponentKind) -> Component {
        Component::new(ComponentId(i), format!("X{}", i), a, b, kind)
    }

    fn solved(graph: &Graph) -> Solution {
        match reduce(graph, EdgeId(0)).unwrap() {
            Reduction::Solved(s) => s,
            Reduction::NotApplicable(why) => panic!("not applicable: {}", why),
        }
    }

    #[test]
    fn test_two_resistor_loop() {
        let parts = vec![
            c(0, (0.0, 0.0), (1.0, 0.0), ComponentKind::battery(9.0)),
            c(1, (1.0, 0.0), (2.0, 0.0), ComponentKind::resistor(100.0)),
            c(2, (2.0, 0.0), (3.0, 0.0), ComponentKind::resistor(200.0)),
            c(3, (3.0, 0.0), (0.0, 0.0), ComponentKind::Wire),
        ];
        let graph = Graph::build(&parts);
        let s = solved(&graph);

        let i = 9.0 / 300.001;
        for r in &s.readings {
            assert_abs_diff_eq!(r.current, i, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(s.readings[1].voltage, 100.0 * i, epsilon = 1e-9);
        assert_abs_diff_eq!(s.readings[2].voltage, 200.0 * i, epsilon = 1e-9);
        assert_abs_diff_eq!(s.readings[0].voltage, 9.0);

        // Potential falls from 9 V at the positive terminal to 0 V.
        let v = |x: f64| {
            let node = graph.find_node(Point::new(x, 0.0).key()).unwrap();
            s.node_voltage(&graph, node).unwrap()
        };
        assert_abs_diff_eq!(v(1.0), 9.0);
        assert_abs_diff_eq!(v(2.0), 9.0 - 100.0 * i, epsilon = 1e-9);
        assert_abs_diff_eq!(v(0.0), 0.0);
    }

    #[test]
    fn test_ammeter_carries_current_without_drop() {
        let parts = vec![
            c(0, (0.0, 0.0), (1.0, 0.0), ComponentKind::battery(5.0)),
            c(1, (1.0, 0.0), (2.0, 0.0), ComponentKind::Ammeter),
            c(2, (2.0, 0.0), (0.0, 0.0), ComponentKind::resistor(50.0)),
        ];
        let graph = Graph::build(&parts);
        let s = solved(&graph);
        assert_abs_diff_eq!(s.readings[1].current, 0.1, epsilon = 1e-12);
        assert_eq!(s.readings[1].voltage, 0.0);
        assert_eq!(s.equivalent_resistance, Some(50.0));
    }

    #[test]
    fn test_opposing_sources() {
        // Second battery drawn against the first: net 6 V
        let parts = vec![
            c(0, (0.0, 0.0), (1.0, 0.0), ComponentKind::battery(9.0)),
            c(1, (1.0, 0.0), (2.0, 0.0), ComponentKind::resistor(100.0)),
            c(2, (3.0, 0.0), (2.0, 0.0), ComponentKind::battery(3.0)),
            c(3, (3.0, 0.0), (0.0, 0.0), ComponentKind::Wire),
        ];
        let graph = Graph::build(&parts);
        let s = solved(&graph);
        assert_abs_diff_eq!(s.source_current.unwrap(), 6.0 / 100.001, epsilon = 1e-12);
    }

    #[test]
    fn test_internal_resistance_lowers_terminal_voltage() {
        use crate::components::Battery;
        let parts = vec![
            c(
                0,
                (0.0, 0.0),
                (1.0, 0.0),
                ComponentKind::Battery(Battery::with_internal_resistance(10.0, 1.0)),
            ),
            c(1, (1.0, 0.0), (0.0, 0.0), ComponentKind::resistor(9.0)),
        ];
        let graph = Graph::build(&parts);
        let s = solved(&graph);
        assert_abs_diff_eq!(s.source_current.unwrap(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.readings[0].voltage, 9.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.readings[1].voltage, 9.0, epsilon = 1e-12);
        assert_eq!(s.equivalent_resistance, Some(9.0));
    }

    #[test]
    fn test_source_off_loop_declines() {
        let parts = vec![
            c(0, (0.0, 0.0), (1.0, 0.0), ComponentKind::battery(9.0)),
            c(1, (1.0, 0.0), (0.0, 0.0), ComponentKind::resistor(100.0)),
            c(2, (5.0, 0.0), (6.0, 0.0), ComponentKind::battery(1.5)),
        ];
        let graph = Graph::build(&parts);
        assert!(matches!(reduce(&graph, EdgeId(0)).unwrap(), Reduction::NotApplicable(_)));
    }

    #[test]
    fn test_parallel_pair_beside_stray_part_declines() {
        // Counts as series (3 branches, 4 nodes) but has two loops
        let parts = vec![
            c(0, (0.0, 0.0), (0.0, 1.0), ComponentKind::battery(10.0)),
            c(1, (0.0, 1.0), (0.0, 0.0), ComponentKind::resistor(100.0)),
            c(2, (0.0, 1.0), (0.0, 0.0), ComponentKind::resistor(100.0)),
            c(3, (10.0, 10.0), (11.0, 10.0), ComponentKind::resistor(1000.0)),
        ];
        let graph = Graph::build(&parts);
        assert_eq!(crate::circuit::classify(&graph), crate::circuit::Topology::Series);
        assert!(matches!(reduce(&graph, EdgeId(0)).unwrap(), Reduction::NotApplicable(_)));
    }

    #[test]
    fn test_loop_in_another_island_is_ignored() {
        let parts = vec![
            c(0, (0.0, 0.0), (1.0, 0.0), ComponentKind::battery(9.0)),
            c(1, (1.0, 0.0), (0.0, 0.0), ComponentKind::resistor(90.0)),
            c(2, (5.0, 0.0), (6.0, 0.0), ComponentKind::resistor(10.0)),
            c(3, (6.0, 0.0), (5.0, 0.0), ComponentKind::Wire),
        ];
        let graph = Graph::build(&parts);
        let s = solved(&graph);
        assert_abs_diff_eq!(s.source_current.unwrap(), 0.1, epsilon = 1e-12);
        assert_eq!(s.readings[2].current, 0.0);
    }

    #[test]
    fn test_meter_only_loop_is_division_by_zero() {
        let parts = vec![
            c(0, (0.0, 0.0), (1.0, 0.0), ComponentKind::battery(9.0)),
            c(1, (1.0, 0.0), (0.0, 0.0), ComponentKind::Ammeter),
        ];
        let graph = Graph::build(&parts);
        assert!(matches!(
            reduce(&graph, EdgeId(0)),
            Err(CircuitError::DivisionByZero { .. })
        ));
    }
}
