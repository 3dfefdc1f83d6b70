//! Digital logic gates.
//!
//! Gates sit in the analog solve as plain 1 kOhm elements. Their digital
//! behaviour is applied afterwards by the gate evaluator in
//! [`solver`](crate::solver), which thresholds input voltages and overrides
//! the output side with an ideal logic level.

use std::fmt;

/// Gate function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateKind {
    And,
    Or,
    Nand,
    Nor,
    Xor,
    Not,
}

impl GateKind {
    /// Parse a gate kind from its keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_uppercase().as_str() {
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            "NAND" => Some(Self::Nand),
            "NOR" => Some(Self::Nor),
            "XOR" => Some(Self::Xor),
            "NOT" | "INV" => Some(Self::Not),
            _ => None,
        }
    }

    /// Evaluate the truth table.
    ///
    /// XOR is odd parity over all inputs. NOT only looks at the first input.
    /// An empty input set evaluates as if every input were low.
    pub fn evaluate(&self, inputs: &[bool]) -> bool {
        let any = inputs.iter().any(|&b| b);
        let all = !inputs.is_empty() && inputs.iter().all(|&b| b);
        match self {
            Self::And => all,
            Self::Or => any,
            Self::Nand => !all,
            Self::Nor => !any,
            Self::Xor => inputs.iter().filter(|&&b| b).count() % 2 == 1,
            Self::Not => !inputs.first().copied().unwrap_or(false),
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Nand => "NAND",
            Self::Nor => "NOR",
            Self::Xor => "XOR",
            Self::Not => "NOT",
        };
        f.write_str(s)
    }
}

/// A logic gate component.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicGate {
    pub kind: GateKind,
}

impl LogicGate {
    /// Create a new gate.
    pub fn new(kind: GateKind) -> Self {
        Self { kind }
    }
}
