//! Abstract Syntax Tree types for the circuit file format.

use std::collections::HashMap;

use crate::circuit::Point;
use crate::components::GateKind;

/// Complete AST representation of a parsed circuit file.
#[derive(Debug, Clone, Default)]
pub struct CircuitAst {
    /// All component instances, in file order
    pub components: Vec<ComponentDef>,
}

impl CircuitAst {
    /// Create a new empty circuit AST.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A component definition from the circuit file.
#[derive(Debug, Clone)]
pub struct ComponentDef {
    pub component_type: ComponentType,
    /// Unique component name
    pub name: String,
    /// Terminal coordinates, `start` first
    pub terminals: Vec<Point>,
    /// Component value (resistance, voltage, capacitance, ...)
    pub value: Option<f64>,
    /// Additional `key=value` parameters
    pub params: HashMap<String, f64>,
    /// Source line number for error reporting
    pub line: usize,
}

/// Component types supported by the circuit file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentType {
    Wire,
    Resistor,
    Capacitor,
    Inductor,
    Battery,
    CurrentSource,
    ToggleSwitch,
    Pushbutton,
    Voltmeter,
    Ammeter,
    Ohmmeter,
    Gate(GateKind),
}

impl ComponentType {
    /// Parse a component type from its single-letter name prefix.
    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix.to_ascii_uppercase() {
            'R' => Some(Self::Resistor),
            'C' => Some(Self::Capacitor),
            'L' => Some(Self::Inductor),
            'V' | 'B' => Some(Self::Battery),
            'I' => Some(Self::CurrentSource),
            'W' => Some(Self::Wire),
            _ => None,
        }
    }

    /// Parse a component type from a multi-letter name prefix.
    ///
    /// Checked before [`from_prefix`](Self::from_prefix) so that `VM1` is a
    /// voltmeter rather than a battery and `SW1` is not a wire.
    pub fn from_long_prefix(name: &str) -> Option<Self> {
        let upper = name.to_ascii_uppercase();
        if upper.starts_with("OHM") {
            Some(Self::Ohmmeter)
        } else if upper.starts_with("SW") {
            Some(Self::ToggleSwitch)
        } else if upper.starts_with("PB") {
            Some(Self::Pushbutton)
        } else if upper.starts_with("VM") {
            Some(Self::Voltmeter)
        } else if upper.starts_with("AM") {
            Some(Self::Ammeter)
        } else {
            None
        }
    }

    /// Parse a component type from a standalone keyword (`AND G1 ...`).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        if let Some(gate) = GateKind::from_keyword(keyword) {
            return Some(Self::Gate(gate));
        }
        match keyword.to_ascii_uppercase().as_str() {
            "WIRE" => Some(Self::Wire),
            "BATTERY" => Some(Self::Battery),
            "SWITCH" => Some(Self::ToggleSwitch),
            "BUTTON" | "PUSHBUTTON" => Some(Self::Pushbutton),
            "VOLTMETER" => Some(Self::Voltmeter),
            "AMMETER" => Some(Self::Ammeter),
            "OHMMETER" => Some(Self::Ohmmeter),
            _ => None,
        }
    }
}
