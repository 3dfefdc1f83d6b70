//! Error types for the Voltlab analysis engine.
//!
//! This module provides a unified error type [`CircuitError`] that covers
//! circuit-file parsing, circuit construction, configuration and the
//! failure modes of the nodal solver.
//!
//! Expected outcomes such as a missing power source or an open circuit are
//! *not* errors: they are reported through the feedback stream of an
//! [`Analysis`](crate::solver::Analysis). Only states the engine cannot
//! represent as a result (a singular matrix, a zero divisor) surface here.

use thiserror::Error;

/// Result type alias using [`CircuitError`].
pub type Result<T> = std::result::Result<T, CircuitError>;

/// Unified error type for all Voltlab operations.
#[derive(Error, Debug)]
pub enum CircuitError {
    // ============ Circuit File Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Invalid component definition
    #[error("Invalid component '{name}' at line {line}: {message}")]
    InvalidComponent {
        name: String,
        line: usize,
        message: String,
    },

    /// Unknown component type
    #[error("Unknown component type '{component_type}' at line {line}")]
    UnknownComponentType { component_type: String, line: usize },

    /// Invalid parameter value
    #[error("Invalid parameter '{param}' for component '{component}': {message}")]
    InvalidParameter {
        component: String,
        param: String,
        message: String,
    },

    /// Duplicate component name
    #[error("Duplicate component name '{name}'")]
    DuplicateComponent { name: String },

    /// Component lookup by name failed
    #[error("No component named '{name}'")]
    UnknownComponent { name: String },

    // ============ Solver Errors ============
    /// Matrix is singular and cannot be solved
    #[error("Singular matrix at row {row} (pivot {pivot:.3e}) - overlapping extreme resistances or a floating island")]
    SingularMatrix { row: usize, pivot: f64 },

    /// A reduction hit a zero divisor
    #[error("Division by zero while computing {quantity}")]
    DivisionByZero { quantity: String },

    /// Numerical overflow detected
    #[error("Numerical overflow detected at node {node} (value: {value:.2e})")]
    NumericalOverflow { node: String, value: f64 },

    // ============ Configuration Errors ============
    /// Invalid analyzer configuration
    #[error("Invalid analyzer configuration: {message}")]
    InvalidConfig { message: String },

    // ============ Output Errors ============
    /// Report could not be serialized
    #[error("Failed to serialize report: {message}")]
    SerializationError { message: String },

    // ============ I/O Errors ============
    /// Error reading circuit file
    #[error("Failed to read circuit file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl CircuitError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid component error
    pub fn invalid_component(name: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::InvalidComponent {
            name: name.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a division-by-zero error
    pub fn division_by_zero(quantity: impl Into<String>) -> Self {
        Self::DivisionByZero {
            quantity: quantity.into(),
        }
    }

    /// Whether the error came out of the numeric solver rather than the input.
    pub fn is_solver_failure(&self) -> bool {
        matches!(
            self,
            Self::SingularMatrix { .. } | Self::DivisionByZero { .. } | Self::NumericalOverflow { .. }
        )
    }
}
