//! Component models for circuit analysis.
//!
//! Every placed part is one [`Component`]: a shared base record (identity,
//! terminal coordinates, the last computed voltage/current) plus a
//! [`ComponentKind`] payload with the variant-specific fields:
//! - Passive: Wire, Resistor, Capacitor, Inductor
//! - Sources: Battery, Current Source
//! - Controls: Toggle switch, Pushbutton
//! - Meters: Voltmeter, Ammeter, Ohmmeter
//! - Digital: AND, OR, NAND, NOR, XOR, NOT gates
//!
//! Each variant answers three electrical queries used by the whole engine:
//!
//! | Variant | effective resistance | conductive | source voltage |
//! |---|---|---|---|
//! | Wire | 0.001 Ω | yes | 0 |
//! | Resistor | stored value | yes | 0 |
//! | Switch | 0.001 Ω closed, 1e9 Ω open | when closed | 0 |
//! | Voltmeter | 1e6 Ω | **no** | 0 |
//! | Ammeter | 0.1 Ω | yes | 0 |
//! | Logic gate | 1 kΩ | yes | 0 |
//! | Battery | internal resistance | yes | stored voltage |
//! | anything else | 0.001 Ω | yes | 0 |

mod controls;
mod linear;
mod logic;
mod sources;

pub use controls::{Switch, SwitchKind};
pub use linear::{Capacitor, Inductor, Resistor};
pub use logic::{GateKind, LogicGate};
pub use sources::{Battery, CurrentSource};

use crate::circuit::{ComponentId, Point};
use crate::dsl::{ComponentDef, ComponentType};
use crate::error::{CircuitError, Result};

/// Resistance of an ideal wire. Never exactly zero, so it can always be inverted.
pub const WIRE_RESISTANCE: f64 = 0.001;

/// Internal resistance of a voltmeter.
pub const VOLTMETER_RESISTANCE: f64 = 1e6;

/// Internal resistance of an ammeter.
pub const AMMETER_RESISTANCE: f64 = 0.1;

/// Input resistance of a logic gate.
pub const GATE_RESISTANCE: f64 = 1e3;

/// Resistance used for variants without an electrical model of their own.
pub const DEFAULT_RESISTANCE: f64 = 0.001;

/// Variant-specific payload of a component.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentKind {
    Wire,
    Resistor(Resistor),
    Battery(Battery),
    CurrentSource(CurrentSource),
    Switch(Switch),
    Voltmeter,
    Ammeter,
    Ohmmeter,
    LogicGate(LogicGate),
    Capacitor(Capacitor),
    Inductor(Inductor),
    /// A part type the engine has no model for (e.g. newer editor palettes)
    Unknown { tag: String },
}

impl ComponentKind {
    pub fn resistor(resistance: f64) -> Self {
        Self::Resistor(Resistor::new(resistance))
    }

    pub fn battery(voltage: f64) -> Self {
        Self::Battery(Battery::new(voltage))
    }

    pub fn toggle(closed: bool) -> Self {
        Self::Switch(Switch::toggle(closed))
    }

    pub fn pushbutton(pressed: bool) -> Self {
        Self::Switch(Switch::pushbutton(pressed))
    }

    pub fn gate(kind: GateKind) -> Self {
        Self::LogicGate(LogicGate::new(kind))
    }

    /// Resistance this variant presents in its current state.
    pub fn effective_resistance(&self) -> f64 {
        match self {
            Self::Wire => WIRE_RESISTANCE,
            Self::Resistor(r) => r.resistance,
            Self::Switch(s) => s.resistance(),
            Self::Voltmeter => VOLTMETER_RESISTANCE,
            Self::Ammeter => AMMETER_RESISTANCE,
            Self::LogicGate(_) => GATE_RESISTANCE,
            Self::Battery(b) => b.internal_resistance,
            Self::CurrentSource(_)
            | Self::Ohmmeter
            | Self::Capacitor(_)
            | Self::Inductor(_)
            | Self::Unknown { .. } => DEFAULT_RESISTANCE,
        }
    }

    /// Whether current can flow through this variant right now.
    pub fn is_conductive(&self) -> bool {
        match self {
            Self::Switch(s) => s.closed,
            Self::Voltmeter => false,
            _ => true,
        }
    }

    /// EMF contributed by this variant (zero for everything but batteries).
    pub fn source_voltage(&self) -> f64 {
        match self {
            Self::Battery(b) => b.voltage,
            _ => 0.0,
        }
    }

    /// Whether this variant is a power source.
    pub fn is_source(&self) -> bool {
        matches!(self, Self::Battery(_))
    }

    /// Whether this variant is a measuring instrument.
    pub fn is_meter(&self) -> bool {
        matches!(self, Self::Voltmeter | Self::Ammeter | Self::Ohmmeter)
    }

    /// Whether the engine falls back to the default row for this variant
    /// because it has no model at all.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown { .. })
    }

    /// Short type name for logs and reports.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Wire => "wire",
            Self::Resistor(_) => "resistor",
            Self::Battery(_) => "battery",
            Self::CurrentSource(_) => "current source",
            Self::Switch(s) => match s.kind {
                SwitchKind::Toggle => "switch",
                SwitchKind::Pushbutton => "pushbutton",
            },
            Self::Voltmeter => "voltmeter",
            Self::Ammeter => "ammeter",
            Self::Ohmmeter => "ohmmeter",
            Self::LogicGate(_) => "logic gate",
            Self::Capacitor(_) => "capacitor",
            Self::Inductor(_) => "inductor",
            Self::Unknown { tag } => tag,
        }
    }
}

/// A placed circuit component.
///
/// The host owns components; the engine reads their kind and terminals and,
/// after a successful analysis, writes `voltage` and `current` back.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub id: ComponentId,
    pub name: String,
    /// First terminal (negative terminal of a battery)
    pub start: Point,
    /// Second terminal (positive terminal of a battery)
    pub end: Point,
    /// Last computed voltage across the component, in volts
    pub voltage: f64,
    /// Last computed current through the component, in amperes
    pub current: f64,
    pub kind: ComponentKind,
}

impl Component {
    /// Create a new component with zeroed readings.
    pub fn new(
        id: ComponentId,
        name: impl Into<String>,
        start: impl Into<Point>,
        end: impl Into<Point>,
        kind: ComponentKind,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            start: start.into(),
            end: end.into(),
            voltage: 0.0,
            current: 0.0,
            kind,
        }
    }

    /// Create a component from a circuit-file definition.
    pub fn from_def(id: ComponentId, def: &ComponentDef) -> Result<Self> {
        let (start, end) = match def.terminals.as_slice() {
            [a, b] => (*a, *b),
            other => {
                return Err(CircuitError::invalid_component(
                    &def.name,
                    def.line,
                    format!("expected 2 terminals, got {}", other.len()),
                ))
            }
        };

        let kind = match def.component_type {
            ComponentType::Wire => ComponentKind::Wire,

            ComponentType::Resistor => {
                let value = def.value.ok_or_else(|| {
                    CircuitError::invalid_component(&def.name, def.line, "resistor requires a value")
                })?;
                if value <= 0.0 {
                    return Err(CircuitError::InvalidParameter {
                        component: def.name.clone(),
                        param: "resistance".to_string(),
                        message: format!("must be positive, got {}", value),
                    });
                }
                ComponentKind::resistor(value)
            }

            ComponentType::Capacitor => {
                let value = def.value.ok_or_else(|| {
                    CircuitError::invalid_component(&def.name, def.line, "capacitor requires a value")
                })?;
                ComponentKind::Capacitor(Capacitor::new(value))
            }

            ComponentType::Inductor => {
                let value = def.value.ok_or_else(|| {
                    CircuitError::invalid_component(&def.name, def.line, "inductor requires a value")
                })?;
                ComponentKind::Inductor(Inductor::new(value))
            }

            ComponentType::Battery => {
                let value = def.value.unwrap_or(0.0);
                let internal = def.params.get("r").copied().unwrap_or(0.0);
                if internal < 0.0 {
                    return Err(CircuitError::InvalidParameter {
                        component: def.name.clone(),
                        param: "r".to_string(),
                        message: format!("internal resistance cannot be negative, got {}", internal),
                    });
                }
                ComponentKind::Battery(Battery::with_internal_resistance(value, internal))
            }

            ComponentType::CurrentSource => {
                ComponentKind::CurrentSource(CurrentSource::new(def.value.unwrap_or(0.0)))
            }

            ComponentType::ToggleSwitch => {
                let closed = def.params.get("state").map(|v| *v > 0.5).unwrap_or(true);
                ComponentKind::toggle(closed)
            }

            ComponentType::Pushbutton => {
                let pressed = def.params.get("state").map(|v| *v > 0.5).unwrap_or(false);
                ComponentKind::pushbutton(pressed)
            }

            ComponentType::Voltmeter => ComponentKind::Voltmeter,
            ComponentType::Ammeter => ComponentKind::Ammeter,
            ComponentType::Ohmmeter => ComponentKind::Ohmmeter,
            ComponentType::Gate(kind) => ComponentKind::gate(kind),
        };

        Ok(Self::new(id, def.name.clone(), start, end, kind))
    }

    pub fn effective_resistance(&self) -> f64 {
        self.kind.effective_resistance()
    }

    pub fn is_conductive(&self) -> bool {
        self.kind.is_conductive()
    }

    pub fn source_voltage(&self) -> f64 {
        self.kind.source_voltage()
    }

    /// Set a switch or pushbutton state. Returns false for other variants.
    pub fn set_closed(&mut self, closed: bool) -> bool {
        match &mut self.kind {
            ComponentKind::Switch(s) => {
                s.set_state(closed);
                true
            }
            _ => false,
        }
    }

    /// Flip a switch or pushbutton. Returns the new state, `None` for other
    /// variants.
    pub fn toggle_closed(&mut self) -> Option<bool> {
        match &mut self.kind {
            ComponentKind::Switch(s) => {
                s.toggle_state();
                Some(s.closed)
            }
            _ => None,
        }
    }

    /// Whether the component shares at least one terminal with `other`.
    pub fn shares_terminal(&self, other: &Component) -> bool {
        let (a, b) = (self.start.key(), self.end.key());
        let (c, d) = (other.start.key(), other.end.key());
        a == c || a == d || b == c || b == d
    }
}
