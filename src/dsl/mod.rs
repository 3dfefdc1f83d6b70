//! Circuit file format.
//!
//! A line-oriented, SPICE-inspired text form of a placed-component list.
//! It stands in for the editor's in-memory component list in the CLI, the
//! WASM binding and tests. Terminals are grid coordinates: two terminals
//! with the same coordinate are electrically joined.
//!
//! # Grammar Overview
//!
//! ```text
//! circuit   = { line }
//! line      = comment | component | empty
//! comment   = ('#' | ';') { any_char }
//! component = (keyword name | name) point point [value] { param }
//! point     = number ',' number
//! param     = identifier '=' number
//!
//! number      = ['-'|'+'] digit* ['.' digit+] [('e'|'E') ['-'|'+'] digit+] [unit_suffix]
//! unit_suffix = 'p' | 'n' | 'u' | 'm' | 'k' | 'M' | 'G'
//! ```
//!
//! # Component Types
//!
//! | Prefix / keyword | Component | Value | Parameters |
//! |------|-------------|-------|------|
//! | `R` | Resistor | ohms (required) | |
//! | `C` | Capacitor | farads (required) | |
//! | `L` | Inductor | henries (required) | |
//! | `V`, `B`, `BATTERY` | Battery, `end` is positive | volts | `r=` internal resistance |
//! | `I` | Current source | amperes | |
//! | `W`, `WIRE` | Wire | | |
//! | `SW`, `SWITCH` | Toggle switch | | `state=0/1` (default closed) |
//! | `PB`, `BUTTON` | Pushbutton | | `state=0/1` (default released) |
//! | `VM`, `VOLTMETER` | Voltmeter | | |
//! | `AM`, `AMMETER` | Ammeter | | |
//! | `OHM`, `OHMMETER` | Ohmmeter | | |
//! | `AND` `OR` `NAND` `NOR` `XOR` `NOT` | Logic gate, `start` is the input side | | |
//!
//! # Example
//!
//! ```text
//! # Voltage divider
//! V1  0,0  1,0  9
//! R1  1,0  2,0  100
//! R2  2,0  3,0  200
//! W1  3,0  0,0
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{parse_value, Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::error::Result;

/// Parse a circuit file string into an AST.
pub fn parse(input: &str) -> Result<CircuitAst> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer);
    parser.parse()
}

/// Parse a circuit file from disk.
pub fn parse_file(path: &std::path::Path) -> Result<CircuitAst> {
    let content = std::fs::read_to_string(path).map_err(|e| crate::error::CircuitError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}
