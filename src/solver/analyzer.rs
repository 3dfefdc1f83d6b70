//! Main analyzer interface.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{error, info};

use super::feedback::Feedback;
use super::solution::{Solution, Strategy};
use super::{
    gates, voltmeter, DEFAULT_LOGIC_HIGH, DEFAULT_LOGIC_THRESHOLD, DEFAULT_PIVOT_TOLERANCE,
};
use crate::circuit::{classify, ComponentId, EdgeKey, Graph, NodeKey, PathFinder, Topology};
use crate::components::Component;
use crate::error::{CircuitError, Result};

/// Configuration for the analyzer.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Input voltage above which a gate input reads as logic high.
    pub logic_threshold: f64,
    /// Voltage a gate drives onto its output side when high.
    pub logic_high: f64,
    /// Smallest pivot magnitude the elimination accepts.
    pub pivot_tolerance: f64,
    /// Try series and parallel reductions before the nodal solve.
    pub reductions: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            logic_threshold: DEFAULT_LOGIC_THRESHOLD,
            logic_high: DEFAULT_LOGIC_HIGH,
            pivot_tolerance: DEFAULT_PIVOT_TOLERANCE,
            reductions: true,
        }
    }
}

impl AnalyzerConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gate input threshold (in volts).
    pub fn with_logic_threshold(mut self, volts: f64) -> Self {
        self.logic_threshold = volts;
        self
    }

    /// Set the gate output high level (in volts).
    pub fn with_logic_high(mut self, volts: f64) -> Self {
        self.logic_high = volts;
        self
    }

    /// Set the pivot tolerance of the nodal solve.
    ///
    /// Open switches (1e9 Ω) next to closed ones (1e-3 Ω) put pivots twelve
    /// orders of magnitude apart, so this has to stay far below 1e-9.
    pub fn with_pivot_tolerance(mut self, tolerance: f64) -> Self {
        self.pivot_tolerance = tolerance;
        self
    }

    /// Enable or disable the series/parallel shortcuts.
    pub fn with_reductions(mut self, enabled: bool) -> Self {
        self.reductions = enabled;
        self
    }

    /// Check the configuration for values the analyzer cannot work with.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(CircuitError::InvalidConfig { message });
        if !self.logic_threshold.is_finite() || self.logic_threshold < 0.0 {
            return invalid(format!(
                "logic threshold must be a non-negative voltage, got {}",
                self.logic_threshold
            ));
        }
        if !self.logic_high.is_finite() || self.logic_high <= self.logic_threshold {
            return invalid(format!(
                "logic high ({}) must be above the threshold ({})",
                self.logic_high, self.logic_threshold
            ));
        }
        if !self.pivot_tolerance.is_finite() || self.pivot_tolerance <= 0.0 {
            return invalid(format!(
                "pivot tolerance must be positive, got {}",
                self.pivot_tolerance
            ));
        }
        Ok(())
    }
}

/// Outcome class of one analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Solved,
    NoPowerSource,
    OpenCircuit,
}

/// Result of one analysis.
///
/// Only a `Solved` analysis has written readings onto the components.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub status: AnalysisStatus,
    pub circuit_closed: bool,
    pub topology: Option<Topology>,
    /// Algorithm actually used; differs from the topology when a reduction
    /// did not fit and the nodal solve took over
    pub strategy: Option<Strategy>,
    pub node_voltages: BTreeMap<NodeKey, f64>,
    pub branch_currents: BTreeMap<EdgeKey, f64>,
    /// Independent loops, as component ids in walking order
    pub loops: Vec<Vec<ComponentId>>,
    /// Largest Kirchhoff voltage-law residual over the loops
    pub kvl_residual: f64,
    pub equivalent_resistance: Option<f64>,
    pub source_current: Option<f64>,
    pub feedback: Feedback,
}

impl Analysis {
    fn unsolved(status: AnalysisStatus, feedback: Feedback) -> Self {
        Self {
            status,
            circuit_closed: false,
            topology: None,
            strategy: None,
            node_voltages: BTreeMap::new(),
            branch_currents: BTreeMap::new(),
            loops: Vec::new(),
            kvl_residual: 0.0,
            equivalent_resistance: None,
            source_current: None,
            feedback,
        }
    }

    pub fn is_solved(&self) -> bool {
        self.status == AnalysisStatus::Solved
    }
}

/// Steady-state DC circuit analyzer.
///
/// Holds configuration only. Every call to [`analyze`](Self::analyze)
/// builds its own graph, so one analyzer can serve any number of circuits.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    /// Create a new analyzer with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new analyzer with custom configuration.
    pub fn with_config(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Whether the primary source's terminals are joined by a conductive
    /// path that does not pass through the source itself.
    pub fn is_closed(&self, components: &[Component]) -> bool {
        let graph = Graph::build(components);
        match graph.primary_source() {
            Some(source) => {
                let src = graph.edge(source);
                PathFinder::new(&graph)
                    .excluding(source)
                    .is_connected(src.to, src.from)
            }
            None => false,
        }
    }

    /// Analyze a circuit and, on success, write each component's voltage
    /// and current.
    ///
    /// A missing source or an open circuit is an `Ok` analysis with the
    /// matching status. Solver failures are errors. In both cases the
    /// components are left untouched.
    pub fn analyze(&self, components: &mut [Component]) -> Result<Analysis> {
        self.analyze_with_feedback(components, &mut Feedback::new())
    }

    /// Like [`analyze`](Self::analyze), but the feedback is written to a
    /// caller-owned stream that survives a failed analysis.
    ///
    /// On success the returned [`Analysis`] carries a copy of the stream.
    pub fn analyze_with_feedback(
        &self,
        components: &mut [Component],
        feedback: &mut Feedback,
    ) -> Result<Analysis> {
        feedback.info(format!("Analyzing {} components", components.len()));

        let graph = Graph::build(components);
        for component in components.iter().filter(|c| c.kind.is_unknown()) {
            feedback.info(format!(
                "{} is a {} with no electrical model, treated as a {} Ω conductor",
                component.name,
                component.kind.type_name(),
                component.effective_resistance()
            ));
        }

        let Some(source) = graph.primary_source() else {
            feedback.error("No power source found");
            return Ok(Analysis::unsolved(AnalysisStatus::NoPowerSource, feedback.clone()));
        };
        let src = graph.edge(source);
        let source_name = &components[src.component].name;
        feedback.info(format!("Power source: {}", source_name));

        let finder = PathFinder::new(&graph).excluding(source);
        if !finder.is_connected(src.to, src.from) {
            feedback.error(format!(
                "Circuit is open: no conductive path between the terminals of {}",
                source_name
            ));
            return Ok(Analysis::unsolved(AnalysisStatus::OpenCircuit, feedback.clone()));
        }
        feedback.success("Circuit is closed");

        let topology = classify(&graph);
        feedback.info(format!("Topology: {}", topology));

        let loops = PathFinder::new(&graph).find_all_loops();
        feedback.info(format!("Found {} independent loops", loops.len()));

        let mut solution =
            match super::analyze(&graph, topology, source, &self.config, feedback) {
                Ok(solution) => solution,
                Err(e) => {
                    error!(error = %e, "analysis failed");
                    feedback.error(format!("Analysis failed: {}", e));
                    return Err(e);
                }
            };

        if solution.strategy != Strategy::Nodal {
            voltmeter::resolve(&graph, &mut solution);
        }
        gates::evaluate(&graph, components, &mut solution, &self.config, feedback);

        let kvl_residual = loops
            .iter()
            .map(|l| solution.kvl_residual(&graph, l).abs())
            .fold(0.0, f64::max);

        commit(&graph, components, &solution);
        info!(strategy = %solution.strategy, kvl_residual, "analysis complete");
        feedback.success(format!("Solved by {}", solution.strategy));

        let loops = loops
            .iter()
            .map(|l| {
                l.edges
                    .iter()
                    .map(|&e| components[graph.edge(e).component].id)
                    .collect()
            })
            .collect();

        Ok(Analysis {
            status: AnalysisStatus::Solved,
            circuit_closed: true,
            topology: Some(topology),
            strategy: Some(solution.strategy),
            node_voltages: solution.node_voltages,
            branch_currents: solution.branch_currents,
            loops,
            kvl_residual,
            equivalent_resistance: solution.equivalent_resistance,
            source_current: solution.source_current,
            feedback: feedback.clone(),
        })
    }
}

/// Write a finished solution onto the components.
fn commit(graph: &Graph, components: &mut [Component], solution: &Solution) {
    for edge in graph.edges() {
        let reading = solution.readings[edge.id.0];
        let component = &mut components[edge.component];
        component.voltage = reading.voltage;
        component.current = reading.current;
    }
}
