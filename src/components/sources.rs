//! Voltage and current sources.

/// A battery (ideal DC voltage source with optional internal resistance).
///
/// The `end` terminal of the owning component is the positive terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct Battery {
    /// Source voltage in volts
    pub voltage: f64,
    /// Internal series resistance in ohms (0 when unset)
    pub internal_resistance: f64,
}

impl Battery {
    /// Create a new ideal battery.
    pub fn new(voltage: f64) -> Self {
        Self {
            voltage,
            internal_resistance: 0.0,
        }
    }

    /// Create a battery with an internal series resistance.
    pub fn with_internal_resistance(voltage: f64, internal_resistance: f64) -> Self {
        Self {
            voltage,
            internal_resistance: internal_resistance.max(0.0),
        }
    }
}

/// A current source.
///
/// Stored for the host; the DC engine treats it with the default electrical
/// row (a near-short) and does not inject its current.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentSource {
    /// Source current in amperes, flowing from `start` to `end`
    pub current: f64,
}

impl CurrentSource {
    /// Create a new current source.
    pub fn new(current: f64) -> Self {
        Self { current }
    }
}
