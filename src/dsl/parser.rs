//! Parser for the circuit file format.

use std::collections::HashMap;

use super::ast::*;
use super::lexer::{parse_value, Lexer, Token, TokenKind};
use crate::circuit::Point;
use crate::error::{CircuitError, Result};

/// Parser for circuit files.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self {
            lexer,
            current: Token {
                kind: TokenKind::Newline,
                text: String::new(),
                line: 1,
                column: 1,
            },
        }
    }

    /// Parse the entire circuit description.
    pub fn parse(&mut self) -> Result<CircuitAst> {
        let mut ast = CircuitAst::new();
        self.advance()?;

        while self.current.kind != TokenKind::Eof {
            match self.current.kind {
                TokenKind::Newline => {
                    self.advance()?;
                }
                TokenKind::Identifier => {
                    let component = self.parse_component()?;
                    ast.components.push(component);
                }
                _ => {
                    return Err(CircuitError::parse(
                        self.current.line,
                        format!("unexpected token: {:?}", self.current.text),
                    ));
                }
            }
        }

        Ok(ast)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            let tok = self.current.clone();
            self.advance()?;
            Ok(tok)
        } else {
            Err(CircuitError::parse(
                self.current.line,
                format!("expected {:?}, got {:?}", kind, self.current.kind),
            ))
        }
    }

    fn expect_number(&mut self) -> Result<f64> {
        let tok = self.expect(TokenKind::Number)?;
        parse_value(&tok.text)
            .ok_or_else(|| CircuitError::parse(tok.line, format!("invalid number: {}", tok.text)))
    }

    /// `x,y`
    fn parse_point(&mut self) -> Result<Point> {
        let x = self.expect_number()?;
        self.expect(TokenKind::Comma)?;
        let y = self.expect_number()?;
        Ok(Point::new(x, y))
    }

    fn parse_component(&mut self) -> Result<ComponentDef> {
        let first_token = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        // Keywords first (`AND G1 ...`), then long name prefixes (`SW1`), then
        // single-letter prefixes (`R1`).
        let (component_type, name) = if let Some(ct) = ComponentType::from_keyword(&first_token) {
            let actual_name = self.expect(TokenKind::Identifier)?.text;
            (ct, actual_name)
        } else if let Some(ct) = ComponentType::from_long_prefix(&first_token) {
            (ct, first_token)
        } else {
            let first_char = first_token.chars().next().unwrap_or('?');
            let ct = ComponentType::from_prefix(first_char).ok_or_else(|| {
                CircuitError::UnknownComponentType {
                    component_type: first_token.clone(),
                    line,
                }
            })?;
            (ct, first_token)
        };

        let mut terminals = Vec::with_capacity(2);
        for _ in 0..2 {
            if self.current.kind != TokenKind::Number {
                return Err(CircuitError::invalid_component(
                    &name,
                    line,
                    format!("expected 2 terminals, got {}", terminals.len()),
                ));
            }
            terminals.push(self.parse_point()?);
        }

        let mut value = None;
        let mut params = HashMap::new();

        // Optional value, then key=value parameters until end of line
        while self.current.kind != TokenKind::Newline && self.current.kind != TokenKind::Eof {
            match self.current.kind {
                TokenKind::Number if value.is_none() => {
                    value = Some(self.expect_number()?);
                }
                TokenKind::Identifier => {
                    let key = self.current.text.to_lowercase();
                    self.advance()?;
                    self.expect(TokenKind::Equals)?;
                    let v = self.expect_number()?;
                    params.insert(key, v);
                }
                _ => {
                    return Err(CircuitError::parse(
                        line,
                        format!("unexpected token after '{}': {:?}", name, self.current.text),
                    ));
                }
            }
        }

        Ok(ComponentDef {
            component_type,
            name,
            terminals,
            value,
            params,
            line,
        })
    }
}
