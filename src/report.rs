//! Rendering of an analysis for people and programs.
//!
//! A [`Report`] flattens an [`Analysis`] and the analyzed components into
//! plain rows: the text form is what the CLI prints, the JSON form is what
//! `--format json` and the WASM binding hand out.

use std::fmt;

use serde::Serialize;

use crate::circuit::{ComponentId, Point, Topology};
use crate::components::Component;
use crate::error::{CircuitError, Result};
use crate::solver::{Analysis, AnalysisStatus, Feedback, Severity, Strategy};

#[derive(Debug, Clone, Serialize)]
pub struct ComponentRow {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub voltage: f64,
    pub current: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeRow {
    pub node: Point,
    pub voltage: f64,
}

/// Signed current from `from` to `to`.
#[derive(Debug, Clone, Serialize)]
pub struct BranchRow {
    pub from: Point,
    pub to: Point,
    pub current: f64,
}

/// Serializable summary of one analysis.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub status: AnalysisStatus,
    pub circuit_closed: bool,
    pub topology: Option<Topology>,
    pub strategy: Option<Strategy>,
    pub equivalent_resistance: Option<f64>,
    pub source_current: Option<f64>,
    pub kvl_residual: f64,
    pub components: Vec<ComponentRow>,
    pub node_voltages: Vec<NodeRow>,
    pub branch_currents: Vec<BranchRow>,
    /// Independent loops as component names
    pub loops: Vec<Vec<String>>,
    pub feedback: Feedback,
}

impl Report {
    /// Build a report from an analysis and the components it ran on.
    pub fn new(analysis: &Analysis, components: &[Component]) -> Self {
        let name_of = |id: ComponentId| {
            components
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| id.to_string())
        };

        Self {
            status: analysis.status,
            circuit_closed: analysis.circuit_closed,
            topology: analysis.topology,
            strategy: analysis.strategy,
            equivalent_resistance: analysis.equivalent_resistance,
            source_current: analysis.source_current,
            kvl_residual: analysis.kvl_residual,
            components: components
                .iter()
                .map(|c| ComponentRow {
                    name: c.name.clone(),
                    type_name: c.kind.type_name().to_string(),
                    voltage: c.voltage,
                    current: c.current,
                })
                .collect(),
            node_voltages: analysis
                .node_voltages
                .iter()
                .map(|(key, &voltage)| NodeRow {
                    node: key.to_point(),
                    voltage,
                })
                .collect(),
            branch_currents: analysis
                .branch_currents
                .iter()
                .map(|(key, &current)| BranchRow {
                    from: key.a.to_point(),
                    to: key.b.to_point(),
                    current,
                })
                .collect(),
            loops: analysis
                .loops
                .iter()
                .map(|l| l.iter().map(|&id| name_of(id)).collect())
                .collect(),
            feedback: analysis.feedback.clone(),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| CircuitError::SerializationError {
            message: e.to_string(),
        })
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            AnalysisStatus::Solved => {
                write!(f, "Circuit: closed")?;
                if let (Some(topology), Some(strategy)) = (self.topology, self.strategy) {
                    write!(f, ", {} topology, solved by {}", topology, strategy)?;
                }
                writeln!(f)?;
            }
            AnalysisStatus::NoPowerSource => writeln!(f, "Circuit: no power source")?,
            AnalysisStatus::OpenCircuit => writeln!(f, "Circuit: open")?,
        }
        if let Some(r) = self.equivalent_resistance {
            writeln!(f, "Equivalent resistance: {:.3} Ω", r)?;
        }
        if let Some(i) = self.source_current {
            writeln!(f, "Source current: {:.6} A", i)?;
        }

        if !self.components.is_empty() {
            let width = self.components.iter().map(|c| c.name.len()).max().unwrap_or(4).max(4);
            writeln!(f, "\nComponents:")?;
            writeln!(f, "  {:<width$}  {:<12}  {:>12}  {:>12}", "NAME", "TYPE", "VOLTAGE", "CURRENT")?;
            for row in &self.components {
                writeln!(
                    f,
                    "  {:<width$}  {:<12}  {:>10.4} V  {:>10.6} A",
                    row.name, row.type_name, row.voltage, row.current
                )?;
            }
        }

        if !self.node_voltages.is_empty() {
            writeln!(f, "\nNode voltages:")?;
            for row in &self.node_voltages {
                writeln!(f, "  {:<16}  {:>10.4} V", row.node.to_string(), row.voltage)?;
            }
        }

        if !self.branch_currents.is_empty() {
            writeln!(f, "\nBranch currents:")?;
            for row in &self.branch_currents {
                let pair = format!("{} -> {}", row.from, row.to);
                writeln!(f, "  {:<32}  {:>10.6} A", pair, row.current)?;
            }
        }

        if !self.loops.is_empty() {
            writeln!(f, "\nLoops (max KVL residual {:.2e} V):", self.kvl_residual)?;
            for l in &self.loops {
                writeln!(f, "  {}", l.join(" -> "))?;
            }
        }

        writeln!(f, "\nFeedback:")?;
        for entry in self.feedback.entries() {
            let tag = match entry.severity {
                Severity::Info => "info",
                Severity::Success => "ok",
                Severity::Error => "error",
            };
            writeln!(f, "  [{}] {}", tag, entry.message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dsl, Analyzer, Circuit};

    fn divider() -> (Analysis, Circuit) {
        let ast = dsl::parse("V1 0,0 1,0 9\nR1 1,0 2,0 100\nR2 2,0 3,0 200\nW1 3,0 0,0\n").unwrap();
        let mut circuit = Circuit::from_ast(ast).unwrap();
        let analysis = Analyzer::new().analyze(&mut circuit.components).unwrap();
        (analysis, circuit)
    }

    #[test]
    fn test_text_report() {
        let (analysis, circuit) = divider();
        let text = Report::new(&analysis, &circuit.components).to_string();
        assert!(text.starts_with("Circuit: closed, series topology, solved by series reduction"));
        assert!(text.contains("R2"));
        assert!(text.contains("Loops (max KVL residual"));
        assert!(text.contains("[ok] Circuit is closed"));
    }

    #[test]
    fn test_json_report() {
        let (analysis, circuit) = divider();
        let json = Report::new(&analysis, &circuit.components).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["status"], "solved");
        assert_eq!(value["topology"], "series");
        assert_eq!(value["strategy"], "series");
        assert_eq!(value["components"][2]["name"], "R2");
        assert_eq!(value["components"][2]["type"], "resistor");
        assert!((value["components"][2]["voltage"].as_f64().unwrap() - 6.0).abs() < 1e-3);
        assert_eq!(value["feedback"][0]["severity"], "info");
    }
}
