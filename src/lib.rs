//! # Voltlab Core
//!
//! Steady-state DC analysis engine for a drag-and-drop circuit builder.
//!
//! This library provides:
//! - A component model for wires, resistors, batteries, switches, meters and logic gates
//! - A coordinate-keyed circuit graph with topology classification and loop finding
//! - Series, parallel and nodal solvers with a digital post-pass for logic gates
//! - A text format for placed-component lists, used by the CLI and the WASM binding
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`components`] - Component base record and per-variant electrical behaviour
//! - [`circuit`] - Coordinates, the circuit graph, classification and path finding
//! - [`solver`] - The [`Analyzer`], solving strategies and the feedback stream
//! - [`dsl`] - Parser for the circuit file format
//! - `report` - Text/JSON rendering of an analysis (CLI and WASM only)
//!
//! ## Usage
//!
//! ### Library
//!
//! ```
//! use voltlab_core::{dsl, Analyzer, Circuit};
//!
//! let ast = dsl::parse("V1 0,0 1,0 9\nR1 1,0 2,0 100\nR2 2,0 3,0 200\nW1 3,0 0,0\n").unwrap();
//! let mut circuit = Circuit::from_ast(ast).unwrap();
//!
//! let analysis = Analyzer::new().analyze(&mut circuit.components).unwrap();
//! assert!(analysis.circuit_closed);
//! assert!((circuit.find("R2").unwrap().voltage - 6.0).abs() < 1e-3);
//! ```
//!
//! ### Native CLI
//!
//! ```bash
//! voltlab divider.cir --format json -v
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmCircuitAnalyzer } from 'voltlab_core';
//!
//! const analyzer = new WasmCircuitAnalyzer(circuitText);
//! analyzer.set_switch("SW1", false);
//! const report = JSON.parse(analyzer.analyze());
//! ```
//!
//! ## Analysis Method
//!
//! For each analysis:
//!
//! 1. Build the node/edge graph from the component terminals
//! 2. Check that a conductive path closes the primary source
//! 3. Classify the graph as series, parallel or complex and pick a strategy
//! 4. Solve, resolve voltmeters and apply logic-gate levels on a scratch solution
//! 5. Write voltages and currents onto the components
//!
//! Nothing is written when any step fails.

pub mod circuit;
pub mod components;
pub mod dsl;
pub mod error;
pub mod solver;

#[cfg(any(feature = "cli", feature = "wasm"))]
pub mod report;

// Re-export main types for convenience
pub use circuit::Circuit;
pub use components::{Component, ComponentKind};
pub use error::{CircuitError, Result};
pub use solver::{Analysis, AnalysisStatus, Analyzer, AnalyzerConfig};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmCircuitAnalyzer;
