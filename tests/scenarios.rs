//! End-to-end analysis scenarios, driven through the circuit file format.

use std::collections::BTreeMap;

use approx::assert_abs_diff_eq;
use voltlab_core::circuit::{NodeKey, Topology};
use voltlab_core::solver::{Severity, Strategy};
use voltlab_core::{dsl, AnalysisStatus, Analyzer, AnalyzerConfig, Circuit, CircuitError};

fn circuit(text: &str) -> Circuit {
    Circuit::from_ast(dsl::parse(text).unwrap()).unwrap()
}

fn readings(c: &Circuit) -> Vec<(f64, f64)> {
    c.components.iter().map(|c| (c.voltage, c.current)).collect()
}

const DIVIDER: &str = "\
# 9 V across 100 Ω and 200 Ω
V1 0,0 1,0 9
R1 1,0 2,0 100
R2 2,0 3,0 200
W1 3,0 0,0
";

#[test]
fn series_divider() {
    let mut c = circuit(DIVIDER);
    let analysis = Analyzer::new().analyze(&mut c.components).unwrap();

    assert_eq!(analysis.status, AnalysisStatus::Solved);
    assert!(analysis.circuit_closed);
    assert_eq!(analysis.topology, Some(Topology::Series));
    assert_abs_diff_eq!(analysis.equivalent_resistance.unwrap(), 300.0, epsilon = 1e-2);

    for name in ["V1", "R1", "R2", "W1"] {
        assert_abs_diff_eq!(c.find(name).unwrap().current, 0.03, epsilon = 1e-6);
    }
    assert_abs_diff_eq!(c.find("R1").unwrap().voltage, 3.0, epsilon = 1e-3);
    assert_abs_diff_eq!(c.find("R2").unwrap().voltage, 6.0, epsilon = 1e-3);

    // Σ I·r ≈ V
    let drops: f64 = ["R1", "R2", "W1"].iter().map(|n| c.find(n).unwrap().voltage).sum();
    assert_abs_diff_eq!(drops, 9.0, epsilon = 1e-3);
}

#[test]
fn parallel_pair() {
    let mut c = circuit("V1 0,0 0,1 10\nR1 0,1 0,0 100\nR2 0,1 0,0 100\n");
    let analysis = Analyzer::new().analyze(&mut c.components).unwrap();

    assert_eq!(analysis.topology, Some(Topology::Parallel));
    assert_eq!(analysis.strategy, Some(Strategy::Parallel));
    assert_abs_diff_eq!(analysis.equivalent_resistance.unwrap(), 50.0, epsilon = 1e-9);
    assert_abs_diff_eq!(analysis.source_current.unwrap(), 0.2, epsilon = 1e-9);
    assert_abs_diff_eq!(c.find("R1").unwrap().current, 0.1, epsilon = 1e-9);
    assert_abs_diff_eq!(c.find("R2").unwrap().current, 0.1, epsilon = 1e-9);
    assert_abs_diff_eq!(c.find("V1").unwrap().current, 0.2, epsilon = 1e-9);
}

#[test]
fn parallel_ladder_with_rail_wires() {
    let mut c = circuit(
        "\
V1 0,0 0,2 10
W1 0,2 2,2
W2 0,0 2,0
R1 2,2 2,0 100
W3 2,2 4,2
W4 2,0 4,0
R2 4,2 4,0 100
",
    );
    let analysis = Analyzer::new().analyze(&mut c.components).unwrap();

    assert_eq!(analysis.strategy, Some(Strategy::Parallel));
    assert_abs_diff_eq!(analysis.equivalent_resistance.unwrap(), 50.0, epsilon = 1e-9);
    let branches = c.find("R1").unwrap().current + c.find("R2").unwrap().current;
    assert_abs_diff_eq!(branches, 10.0 / 50.0, epsilon = 1e-9);
    assert_abs_diff_eq!(c.find("R2").unwrap().voltage, 10.0, epsilon = 1e-9);
}

#[test]
fn open_switch_is_reported_and_nothing_changes() {
    let mut c = circuit("V1 0,0 1,0 9\nSW1 1,0 2,0 state=0\nR1 2,0 0,0 100\n");
    for comp in &mut c.components {
        comp.voltage = 7.0;
        comp.current = 0.7;
    }
    let analysis = Analyzer::new().analyze(&mut c.components).unwrap();

    assert_eq!(analysis.status, AnalysisStatus::OpenCircuit);
    assert!(!analysis.circuit_closed);
    assert!(analysis
        .feedback
        .entries()
        .iter()
        .any(|e| e.severity == Severity::Error));
    assert!(readings(&c).iter().all(|&r| r == (7.0, 0.7)));
}

#[test]
fn and_gate_with_both_inputs_high() {
    let mut c = circuit(
        "\
V1 0,0 0,2 10
R1 0,2 1,2 10k
R2 0,2 1,2 10k
AND G1 1,2 2,2
W1 2,2 2,0
W2 2,0 0,0
",
    );
    let analysis = Analyzer::new().analyze(&mut c.components).unwrap();

    assert!(analysis.is_solved());
    // Both input resistors drop well above the threshold
    assert!(c.find("R1").unwrap().voltage > 2.5);
    assert!(c.find("R2").unwrap().voltage > 2.5);
    assert_eq!(c.find("G1").unwrap().voltage, 5.0);
    assert_eq!(c.find("W1").unwrap().voltage, 5.0);
}

#[test]
fn kcl_holds_on_a_bridge() {
    let mut c = circuit(
        "\
V1 0,0 0,2 12
R1 0,2 1,3 100
R2 0,2 1,1 220
R3 1,3 0,0 330
R4 1,1 0,0 470
R5 1,3 1,1 1k
",
    );
    let analysis = Analyzer::new().analyze(&mut c.components).unwrap();
    assert_eq!(analysis.strategy, Some(Strategy::Nodal));

    let mut net: BTreeMap<NodeKey, f64> = BTreeMap::new();
    for (key, &current) in &analysis.branch_currents {
        *net.entry(key.a).or_insert(0.0) -= current;
        *net.entry(key.b).or_insert(0.0) += current;
    }
    assert_eq!(net.len(), 4);
    for sum in net.values() {
        assert_abs_diff_eq!(*sum, 0.0, epsilon = 1e-9);
    }
    assert!(c.find("R5").unwrap().current > 0.0);
    assert!(analysis.kvl_residual < 1e-9);
}

#[test]
fn complex_classification_still_solves() {
    // A divider plus a stray resistor that touches nothing
    let mut c = circuit(&format!("{}R9 10,10 11,10 1k\n", DIVIDER));
    let analysis = Analyzer::new().analyze(&mut c.components).unwrap();

    assert_eq!(analysis.topology, Some(Topology::Complex));
    assert_eq!(analysis.strategy, Some(Strategy::Nodal));
    assert_abs_diff_eq!(c.find("R2").unwrap().voltage, 6.0, epsilon = 1e-3);
    assert_eq!(c.find("R9").unwrap().current, 0.0);
}

#[test]
fn parallel_pair_beside_a_stray_part() {
    // Branch counting calls this series; both branches must still conduct.
    let mut c = circuit("V1 0,0 0,1 10\nR1 0,1 0,0 100\nR2 0,1 0,0 100\nR9 10,10 11,10 1k\n");
    let analysis = Analyzer::new().analyze(&mut c.components).unwrap();

    assert_eq!(analysis.topology, Some(Topology::Series));
    assert_eq!(analysis.strategy, Some(Strategy::Nodal));
    assert_abs_diff_eq!(c.find("R1").unwrap().current, 0.1, epsilon = 1e-4);
    assert_abs_diff_eq!(c.find("R2").unwrap().current, 0.1, epsilon = 1e-4);
    assert_abs_diff_eq!(analysis.source_current.unwrap(), 0.2, epsilon = 1e-4);
    assert_abs_diff_eq!(analysis.equivalent_resistance.unwrap(), 50.0, epsilon = 1e-6);
    assert_eq!(c.find("R9").unwrap().current, 0.0);
    assert!(analysis.kvl_residual < 1e-9);
}

#[test]
fn voltmeter_reads_the_element_it_bridges() {
    let mut c = circuit(&format!("{}VM1 2,0 3,0\n", DIVIDER));
    let analysis = Analyzer::new().analyze(&mut c.components).unwrap();

    assert_eq!(analysis.strategy, Some(Strategy::Series));
    let vm = c.find("VM1").unwrap();
    assert_abs_diff_eq!(vm.voltage, 6.0, epsilon = 1e-3);
    assert_eq!(vm.current, 0.0);
}

#[test]
fn repeated_analysis_is_identical() {
    let mut c = circuit(DIVIDER);
    let analyzer = Analyzer::new();
    let first = analyzer.analyze(&mut c.components).unwrap();
    let after_first = readings(&c);
    let second = analyzer.analyze(&mut c.components).unwrap();

    assert_eq!(readings(&c), after_first);
    assert_eq!(first.node_voltages, second.node_voltages);
    assert_eq!(first.branch_currents, second.branch_currents);
    assert_eq!(first.loops, second.loops);
}

#[test]
fn opening_the_only_switch_keeps_last_readings() {
    let mut c = circuit("V1 0,0 1,0 9\nSW1 1,0 2,0\nR1 2,0 0,0 100\n");
    let analyzer = Analyzer::new();

    let closed = analyzer.analyze(&mut c.components).unwrap();
    assert!(closed.circuit_closed);
    let last = readings(&c);
    assert_abs_diff_eq!(c.find("R1").unwrap().current, 9.0 / 100.001, epsilon = 1e-9);

    c.set_switch("SW1", false).unwrap();
    assert!(!analyzer.is_closed(&c.components));
    let open = analyzer.analyze(&mut c.components).unwrap();
    assert!(!open.circuit_closed);
    assert_eq!(readings(&c), last);
}

#[test]
fn no_power_source() {
    let mut c = circuit("R1 0,0 1,0 100\nW1 1,0 0,0\n");
    let analysis = Analyzer::new().analyze(&mut c.components).unwrap();
    assert_eq!(analysis.status, AnalysisStatus::NoPowerSource);
    assert!(analysis.feedback.has_errors());
    assert!(readings(&c).iter().all(|&r| r == (0.0, 0.0)));
}

#[test]
fn solver_failure_is_an_error_and_nothing_changes() {
    let mut c = circuit(DIVIDER);
    // No pivot can meet this tolerance
    let config = AnalyzerConfig::new()
        .with_reductions(false)
        .with_pivot_tolerance(1e12);
    let err = Analyzer::with_config(config)
        .unwrap()
        .analyze(&mut c.components)
        .unwrap_err();

    assert!(matches!(err, CircuitError::SingularMatrix { row: 0, .. }));
    assert!(err.is_solver_failure());
    assert!(readings(&c).iter().all(|&r| r == (0.0, 0.0)));
}

#[test]
fn duplicate_names_are_rejected() {
    let ast = dsl::parse("R1 0,0 1,0 1k\nR1 1,0 2,0 1k\n").unwrap();
    assert!(matches!(
        Circuit::from_ast(ast),
        Err(CircuitError::DuplicateComponent { .. })
    ));
}
