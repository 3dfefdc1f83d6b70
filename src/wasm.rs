//! WASM bindings for Voltlab Core.
//!
//! This module provides JavaScript-friendly bindings for a browser-hosted
//! circuit editor.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmCircuitAnalyzer } from 'voltlab_core';
//!
//! await init();
//!
//! const circuitText = `
//!   V1  0,0 0,2 9
//!   SW1 0,2 2,2
//!   R1  2,2 2,0 1k
//!   W1  2,0 0,0
//! `;
//!
//! const analyzer = new WasmCircuitAnalyzer(circuitText);
//! const report = JSON.parse(analyzer.analyze());
//!
//! // On a click on the switch:
//! analyzer.toggle_switch("SW1");
//! const closed = analyzer.is_closed();
//!
//! // After a failed analysis, the log panel can still show what happened:
//! const log = JSON.parse(analyzer.feedback());
//! ```

use wasm_bindgen::prelude::*;

use crate::circuit::Circuit;
use crate::dsl;
use crate::report::Report;
use crate::solver::{
    Analyzer, AnalyzerConfig, Feedback, DEFAULT_LOGIC_HIGH, DEFAULT_LOGIC_THRESHOLD,
};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WASM-compatible circuit analyzer.
///
/// Owns the component list, so the page only has to send edits (switch
/// clicks) and ask for a fresh analysis.
#[wasm_bindgen]
pub struct WasmCircuitAnalyzer {
    circuit: Circuit,
    analyzer: Analyzer,
    /// Feedback of the most recent analysis
    feedback: Feedback,
}

#[wasm_bindgen]
impl WasmCircuitAnalyzer {
    /// Create a new analyzer from circuit file text.
    ///
    /// # Example
    /// ```javascript
    /// const analyzer = new WasmCircuitAnalyzer(circuitText);
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new(circuit_text: &str) -> Result<WasmCircuitAnalyzer, JsValue> {
        Self::with_config(circuit_text, DEFAULT_LOGIC_THRESHOLD, DEFAULT_LOGIC_HIGH)
    }

    /// Create a new analyzer with custom logic levels.
    ///
    /// # Arguments
    /// * `circuit_text` - The circuit in circuit file format
    /// * `logic_threshold` - Gate input threshold in volts (default: 2.5)
    /// * `logic_high` - Gate output high level in volts (default: 5.0)
    #[wasm_bindgen]
    pub fn with_config(
        circuit_text: &str,
        logic_threshold: f64,
        logic_high: f64,
    ) -> Result<WasmCircuitAnalyzer, JsValue> {
        let ast = dsl::parse(circuit_text).map_err(js_error)?;
        let circuit = Circuit::from_ast(ast).map_err(js_error)?;

        let config = AnalyzerConfig::new()
            .with_logic_threshold(logic_threshold)
            .with_logic_high(logic_high);
        let analyzer = Analyzer::with_config(config).map_err(js_error)?;

        Ok(WasmCircuitAnalyzer {
            circuit,
            analyzer,
            feedback: Feedback::new(),
        })
    }

    /// Open or close a switch or pushbutton by name.
    #[wasm_bindgen]
    pub fn set_switch(&mut self, name: &str, closed: bool) -> Result<(), JsValue> {
        self.circuit.set_switch(name, closed).map_err(js_error)
    }

    /// Flip a switch or pushbutton by name and return its new state.
    #[wasm_bindgen]
    pub fn toggle_switch(&mut self, name: &str) -> Result<bool, JsValue> {
        self.circuit.toggle_switch(name).map_err(js_error)
    }

    /// Whether the primary source currently sees a closed circuit.
    #[wasm_bindgen]
    pub fn is_closed(&self) -> bool {
        self.analyzer.is_closed(&self.circuit.components)
    }

    /// Run an analysis and return the report as JSON.
    ///
    /// Solver failures are thrown; the component readings keep their last
    /// values and [`feedback`](Self::feedback) still holds the log.
    #[wasm_bindgen]
    pub fn analyze(&mut self) -> Result<String, JsValue> {
        self.feedback = Feedback::new();
        let analysis = self
            .analyzer
            .analyze_with_feedback(&mut self.circuit.components, &mut self.feedback)
            .map_err(js_error)?;
        Report::new(&analysis, &self.circuit.components)
            .to_json()
            .map_err(js_error)
    }

    /// Feedback entries of the most recent analysis as JSON.
    #[wasm_bindgen]
    pub fn feedback(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.feedback).map_err(js_error)
    }

    /// Last computed voltage of a named component.
    #[wasm_bindgen]
    pub fn component_voltage(&self, name: &str) -> Option<f64> {
        self.circuit.find(name).map(|c| c.voltage)
    }

    /// Last computed current of a named component.
    #[wasm_bindgen]
    pub fn component_current(&self, name: &str) -> Option<f64> {
        self.circuit.find(name).map(|c| c.current)
    }

    /// Number of components in the circuit.
    #[wasm_bindgen(getter)]
    pub fn component_count(&self) -> usize {
        self.circuit.len()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
