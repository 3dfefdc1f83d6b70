//! Control components: toggle switches and pushbuttons.

/// How a switch is operated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchKind {
    /// Latching switch: stays where it was put
    Toggle,
    /// Momentary button: conducts only while pressed
    Pushbutton,
}

/// A switch component.
///
/// Modeled as a resistance:
/// - Closed: near-short (0.001 ohms)
/// - Open: near-open (1e9 ohms)
///
/// An open switch is also excluded from path finding, so it behaves exactly
/// like a missing wire when testing whether the circuit is closed.
#[derive(Debug, Clone, PartialEq)]
pub struct Switch {
    pub kind: SwitchKind,
    /// Closed (toggle) or pressed (pushbutton)
    pub closed: bool,
}

impl Switch {
    /// Resistance when closed.
    pub const R_CLOSED: f64 = 0.001;
    /// Resistance when open.
    pub const R_OPEN: f64 = 1e9;

    /// Create a new toggle switch.
    pub fn toggle(closed: bool) -> Self {
        Self {
            kind: SwitchKind::Toggle,
            closed,
        }
    }

    /// Create a new pushbutton.
    pub fn pushbutton(pressed: bool) -> Self {
        Self {
            kind: SwitchKind::Pushbutton,
            closed: pressed,
        }
    }

    /// Get the current resistance.
    pub fn resistance(&self) -> f64 {
        if self.closed {
            Self::R_CLOSED
        } else {
            Self::R_OPEN
        }
    }

    /// Set the switch state.
    pub fn set_state(&mut self, closed: bool) {
        self.closed = closed;
    }

    /// Toggle the switch state.
    pub fn toggle_state(&mut self) {
        self.closed = !self.closed;
    }
}
