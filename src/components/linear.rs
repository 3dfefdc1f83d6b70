//! Passive components: Resistor, Capacitor, Inductor.
//!
//! Capacitors and inductors are stored with their values so the host can
//! display and edit them, but the engine is steady-state DC only: neither is
//! integrated over time and both fall back to the default electrical row.

/// A resistor.
#[derive(Debug, Clone, PartialEq)]
pub struct Resistor {
    /// Resistance in ohms
    pub resistance: f64,
}

impl Resistor {
    /// Create a new resistor.
    pub fn new(resistance: f64) -> Self {
        Self { resistance }
    }
}

/// A capacitor.
#[derive(Debug, Clone, PartialEq)]
pub struct Capacitor {
    /// Capacitance in farads
    pub capacitance: f64,
}

impl Capacitor {
    /// Create a new capacitor.
    pub fn new(capacitance: f64) -> Self {
        Self { capacitance }
    }
}

/// An inductor.
#[derive(Debug, Clone, PartialEq)]
pub struct Inductor {
    /// Inductance in henries
    pub inductance: f64,
}

impl Inductor {
    /// Create a new inductor.
    pub fn new(inductance: f64) -> Self {
        Self { inductance }
    }
}

