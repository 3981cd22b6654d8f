//! Recursive descent parser for the C-like source language
//!
//! Transforms the lexer's token stream into a concrete syntax tree:
//! - [`cursor`]: index-based token-stream cursor
//! - [`cst`]: CST node definitions
//! - [`expressions`]: precedence-climbing expression grammar
//! - [`statements`]: statement and control-flow grammar
//! - This module: `Parser`, error types, and the top-level grammar
//!
//! Parser methods are split across files using `impl Parser` blocks, so each
//! module extends the parser with related productions while sharing the
//! cursor state.
//!
//! Any `expect` mismatch is fatal to the whole parse: there is no error
//! recovery or resynchronization, and no further top-level declarations are
//! attempted after a failure.

pub mod cst;
pub mod cursor;

mod expressions;
mod statements;

use crate::token::{SourceLocation, Token, TokenKind};
use cst::TopLevel;
use cursor::TokenCursor;
use std::fmt;

/// Parser error type
#[derive(Debug)]
pub enum ParseError {
    /// A grammar production required a specific token and found another.
    UnexpectedToken {
        got: String,
        expected: String,
        location: SourceLocation,
    },
    /// The token stream ran out mid-production.
    UnexpectedEof { expected: Option<String> },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedToken {
                got,
                expected,
                location,
            } => write!(
                f,
                "Parse error at {}: got {}, expected {}",
                location, got, expected
            ),
            ParseError::UnexpectedEof { expected: Some(e) } => {
                write!(f, "Parse error: unexpected end of input, expected {}", e)
            }
            ParseError::UnexpectedEof { expected: None } => {
                write!(f, "Parse error: unexpected end of input")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Recursive descent parser over a token stream.
pub struct Parser {
    pub(crate) cursor: TokenCursor,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
        }
    }

    /// Parse every top-level declaration in the stream.
    ///
    /// Clean exhaustion between declarations ends the parse successfully;
    /// running out of tokens inside a declaration is an error.
    pub fn parse_program(&mut self) -> Result<Vec<TopLevel>, ParseError> {
        let mut declarations = Vec::new();

        while !self.cursor.at_end() {
            declarations.push(self.parse_toplevel()?);
        }

        log::debug!("parsed {} top-level declarations", declarations.len());

        Ok(declarations)
    }

    /// `type name (params) ;` is a forward declaration, `type name (params)
    /// block` a full definition.
    fn parse_toplevel(&mut self) -> Result<TopLevel, ParseError> {
        let return_type = self.cursor.expect_text(TokenKind::Type, None)?;
        let name = self.cursor.expect_text(TokenKind::Identifier, None)?;
        let params = self.parse_parameter_list()?;

        if self
            .cursor
            .consume_if(TokenKind::Operator, Some(";"))
            .is_some()
        {
            return Ok(TopLevel::ForwardDecl {
                return_type,
                name,
                params,
            });
        }

        let body = self.parse_block()?;

        Ok(TopLevel::FunctionDef {
            return_type,
            name,
            params,
            body,
        })
    }

    /// `( variable* )` with optional separating commas.
    fn parse_parameter_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut params = Vec::new();

        self.cursor.expect(TokenKind::Operator, Some("("))?;

        while !self.cursor.is(TokenKind::Operator, Some(")")) {
            params.push(self.parse_variable()?);
            self.cursor.consume_if(TokenKind::Operator, Some(","));
        }

        self.cursor.expect(TokenKind::Operator, Some(")"))?;

        Ok(params)
    }

    /// A typed variable: optional `const`, a type, any number of `*`, the
    /// name, and an optional `[ number ]` subscript. Only the name is
    /// retained; the rest is syntactic recognition.
    pub(crate) fn parse_variable(&mut self) -> Result<String, ParseError> {
        self.cursor.consume_if(TokenKind::Keyword, Some("const"));
        self.cursor.expect(TokenKind::Type, None)?;

        while self
            .cursor
            .consume_if(TokenKind::Operator, Some("*"))
            .is_some()
        {}

        let name = self.cursor.expect_text(TokenKind::Identifier, None)?;

        if self
            .cursor
            .consume_if(TokenKind::Operator, Some("["))
            .is_some()
        {
            self.cursor.expect(TokenKind::Number, None)?;
            self.cursor.expect(TokenKind::Operator, Some("]"))?;
        }

        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::scan;
    use cst::{Block, Expr, Stmt};

    fn parse(source: &str) -> Result<Vec<TopLevel>, ParseError> {
        Parser::new(scan(source).unwrap()).parse_program()
    }

    #[test]
    fn test_parse_simple_function() {
        let program = parse("int main() { return 0; }").unwrap();

        assert_eq!(program.len(), 1);
        match &program[0] {
            TopLevel::FunctionDef {
                return_type,
                name,
                params,
                body,
            } => {
                assert_eq!(return_type, "int");
                assert_eq!(name, "main");
                assert!(params.is_empty());
                assert_eq!(body.0.len(), 1);
            }
            other => panic!("expected function definition, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_forward_declaration() {
        let program = parse("int f(int x);").unwrap();

        assert_eq!(program.len(), 1);
        match &program[0] {
            TopLevel::ForwardDecl {
                return_type,
                name,
                params,
            } => {
                assert_eq!(return_type, "int");
                assert_eq!(name, "f");
                assert_eq!(params, &["x".to_string()]);
            }
            other => panic!("expected forward declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_parameters_with_qualifiers() {
        let program = parse("void g(const char *s, int ns[10]) { return; }").unwrap();

        match &program[0] {
            TopLevel::FunctionDef { params, .. } => {
                assert_eq!(params, &["s".to_string(), "ns".to_string()]);
            }
            other => panic!("expected function definition, got {:?}", other),
        }
    }

    #[test]
    fn test_braceless_function_body() {
        let program = parse("int one() return 1;").unwrap();

        match &program[0] {
            TopLevel::FunctionDef {
                body: Block(stmts), ..
            } => {
                assert_eq!(stmts.len(), 1);
                assert!(matches!(stmts[0], Stmt::Return(Some(_))));
            }
            other => panic!("expected function definition, got {:?}", other),
        }
    }

    #[test]
    fn test_multiple_toplevel_declarations() {
        let program = parse("int f(int x); int main() { return f(1); }").unwrap();
        assert_eq!(program.len(), 2);
    }

    #[test]
    fn test_eof_mid_declaration_is_an_error() {
        let err = parse("int f(").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_declaration_initializer_is_kept() {
        let program = parse("int main() { int x = 1 + 2; return x; }").unwrap();

        match &program[0] {
            TopLevel::FunctionDef {
                body: Block(stmts), ..
            } => match &stmts[0] {
                Stmt::Declaration { name, init } => {
                    assert_eq!(name, "x");
                    assert!(matches!(init, Some(Expr::Binary { .. })));
                }
                other => panic!("expected declaration, got {:?}", other),
            },
            other => panic!("expected function definition, got {:?}", other),
        }
    }

    #[test]
    fn test_determinism() {
        let source = "int f(int x) { if (x) { return 1; } return 0; }";
        assert_eq!(parse(source).unwrap(), parse(source).unwrap());
    }
}
