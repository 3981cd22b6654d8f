//! Token model for the lexer and parser
//!
//! A [`Token`] is an immutable `(kind, value)` pair plus the source location
//! it was scanned at. The lexer produces tokens in one batch; the parser only
//! reads them through an index-based cursor.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Token categories produced by the lexer.
///
/// Keywords and type names are classified during scanning, not by the
/// parser, so the grammar can dispatch on the kind alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    Character,
    Str,
    Type,
    Keyword,
    Operator,
    Identifier,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Number => "number",
            TokenKind::Character => "character literal",
            TokenKind::Str => "string literal",
            TokenKind::Type => "type",
            TokenKind::Keyword => "keyword",
            TokenKind::Operator => "operator",
            TokenKind::Identifier => "identifier",
        };
        write!(f, "{}", name)
    }
}

/// Numeric payload of a `Number` token and of numeric literals in the
/// lowered tree. Integers and floats are kept distinct end to end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{}", n),
            Number::Float(x) => write!(f, "{}", x),
        }
    }
}

/// Token payload: a numeric value for `Number` tokens, the exact spelling
/// or literal text for every other kind.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Number(Number),
    Text(String),
}

impl TokenValue {
    /// The textual payload, if this value carries one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TokenValue::Text(s) => Some(s),
            TokenValue::Number(_) => None,
        }
    }

    /// Consumes the value, rendering numbers through their `Display` form.
    pub fn into_text(self) -> String {
        match self {
            TokenValue::Text(s) => s,
            TokenValue::Number(n) => n.to_string(),
        }
    }
}

/// A single classified lexical unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, value: TokenValue, location: SourceLocation) -> Self {
        Self {
            kind,
            value,
            location,
        }
    }

    /// True when the token has the given kind and, if one is supplied, the
    /// given textual value.
    pub fn matches(&self, kind: TokenKind, value: Option<&str>) -> bool {
        if self.kind != kind {
            return false;
        }
        match value {
            Some(expected) => self.value.as_text() == Some(expected),
            None => true,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.value) {
            (TokenKind::Number, TokenValue::Number(n)) => write!(f, "number {}", n),
            (TokenKind::Character, v) => {
                write!(f, "character literal '{}'", v.as_text().unwrap_or(""))
            }
            (TokenKind::Str, v) => write!(f, "string literal \"{}\"", v.as_text().unwrap_or("")),
            (TokenKind::Identifier, v) => write!(f, "identifier '{}'", v.as_text().unwrap_or("")),
            (_, v) => write!(f, "'{}'", v.as_text().unwrap_or("")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_matches() {
        let tok = Token::new(
            TokenKind::Operator,
            TokenValue::Text("==".to_string()),
            SourceLocation::new(1, 1),
        );

        assert!(tok.matches(TokenKind::Operator, None));
        assert!(tok.matches(TokenKind::Operator, Some("==")));
        assert!(!tok.matches(TokenKind::Operator, Some("=")));
        assert!(!tok.matches(TokenKind::Keyword, Some("==")));
    }

    #[test]
    fn test_token_display() {
        let loc = SourceLocation::new(1, 1);
        let op = Token::new(TokenKind::Operator, TokenValue::Text("+=".to_string()), loc);
        assert_eq!(op.to_string(), "'+='");

        let num = Token::new(
            TokenKind::Number,
            TokenValue::Number(Number::Int(42)),
            loc,
        );
        assert_eq!(num.to_string(), "number 42");

        let ident = Token::new(TokenKind::Identifier, TokenValue::Text("x".to_string()), loc);
        assert_eq!(ident.to_string(), "identifier 'x'");
    }
}
