//! Expression parsing
//!
//! Primary expressions are tried as ordered alternatives — parenthesized
//! expression, call, postfix increment/decrement, prefix unary, leaf — where
//! the first alternative whose lookahead matches wins. Binary combination
//! uses precedence climbing over the closed [`BinaryOp`] table.
//!
//! Postfix `--`/`++` collides with the binary forms of `-` and `+` unless
//! resolved up front: a leaf token directly followed by `--`/`++` is taken
//! as a postfix operand before the climbing loop ever sees the operator, so
//! `i-- - 1` groups as `(i--) - 1`. The check is pure lookahead; the token
//! stream is never rewritten.
//!
//! All parsing methods are `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::cst::{BinaryOp, Expr, IncDecOp, UnaryOp};
use crate::parser::{ParseError, Parser};
use crate::token::{TokenKind, TokenValue};

impl Parser {
    /// Parse expression (top-level entry point).
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        let first = self.parse_primary()?;
        self.parse_binary(first, 0)
    }

    /// `( expression )`
    pub(crate) fn parse_paren_expression(&mut self) -> Result<Expr, ParseError> {
        self.cursor.expect(TokenKind::Operator, Some("("))?;
        let expr = self.parse_expression()?;
        self.cursor.expect(TokenKind::Operator, Some(")"))?;
        Ok(expr)
    }

    /// Precedence climbing: while the next operator binds at least as
    /// tightly as `min_precedence`, consume it and a right-hand primary,
    /// climbing recursively while a following operator binds strictly
    /// tighter (or equally, for the right-associative assignment family).
    fn parse_binary(&mut self, mut lhs: Expr, min_precedence: u8) -> Result<Expr, ParseError> {
        while let Some(op) = self.peek_binary_op() {
            if op.precedence() < min_precedence {
                break;
            }
            self.cursor.advance(1);
            let mut rhs = self.parse_primary()?;

            while let Some(next) = self.peek_binary_op() {
                let climbs = next.precedence() > op.precedence()
                    || (next.precedence() == op.precedence() && next.is_right_assoc());
                if !climbs {
                    break;
                }
                rhs = self.parse_binary(rhs, next.precedence())?;
            }

            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }

        Ok(lhs)
    }

    /// The binary operator at the cursor, if the current token is one.
    fn peek_binary_op(&self) -> Option<BinaryOp> {
        let token = self.cursor.peek(0).ok()?;
        if token.kind != TokenKind::Operator {
            return None;
        }
        BinaryOp::from_spelling(token.value.as_text()?)
    }

    /// Ordered primary alternatives; the first whose lookahead matches wins.
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        if self.cursor.is(TokenKind::Operator, Some("(")) {
            return self.parse_paren_expression();
        }

        if self.cursor.is(TokenKind::Identifier, None) && self.peek_is_operator(1, "(") {
            return self.parse_call();
        }

        if let Some(expr) = self.parse_postfix()? {
            return Ok(expr);
        }

        if let Some(op) = self.peek_prefix_op() {
            self.cursor.advance(1);
            let operand = self.parse_primary()?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
            });
        }

        self.parse_leaf()
    }

    /// `name ( args )` with optional separating commas.
    fn parse_call(&mut self) -> Result<Expr, ParseError> {
        let callee = self.cursor.expect_text(TokenKind::Identifier, None)?;
        self.cursor.expect(TokenKind::Operator, Some("("))?;

        let mut args = Vec::new();
        while !self.cursor.is(TokenKind::Operator, Some(")")) {
            args.push(self.parse_expression()?);
            self.cursor.consume_if(TokenKind::Operator, Some(","));
        }

        self.cursor.expect(TokenKind::Operator, Some(")"))?;

        Ok(Expr::Call { callee, args })
    }

    /// A leaf token directly followed by `--`/`++`. Consumes the leaf and
    /// the whole run of postfix operators, folding them with the first
    /// operator outermost. Returns `Ok(None)` when the shape is absent.
    fn parse_postfix(&mut self) -> Result<Option<Expr>, ParseError> {
        let is_leaf = self.cursor.peek(0).is_ok_and(|t| {
            matches!(
                t.kind,
                TokenKind::Identifier | TokenKind::Number | TokenKind::Character | TokenKind::Str
            )
        });
        if !is_leaf || self.peek_postfix_op(1).is_none() {
            return Ok(None);
        }

        let mut node = self.parse_leaf()?;

        let mut ops = Vec::new();
        while let Some(op) = self.peek_postfix_op(0) {
            ops.push(op);
            self.cursor.advance(1);
        }
        for op in ops.into_iter().rev() {
            node = Expr::Postfix {
                op,
                operand: Box::new(node),
            };
        }

        Ok(Some(node))
    }

    fn peek_postfix_op(&self, offset: usize) -> Option<IncDecOp> {
        let token = self.cursor.peek(offset).ok()?;
        if token.kind != TokenKind::Operator {
            return None;
        }
        match token.value.as_text()? {
            "--" => Some(IncDecOp::Dec),
            "++" => Some(IncDecOp::Inc),
            _ => None,
        }
    }

    fn peek_prefix_op(&self) -> Option<UnaryOp> {
        let token = self.cursor.peek(0).ok()?;
        if token.kind != TokenKind::Operator {
            return None;
        }
        UnaryOp::from_spelling(token.value.as_text()?)
    }

    fn peek_is_operator(&self, offset: usize, value: &str) -> bool {
        self.cursor
            .peek(offset)
            .is_ok_and(|t| t.matches(TokenKind::Operator, Some(value)))
    }

    /// Literal and identifier leaves; anything else means no primary
    /// alternative matched, which is fatal.
    fn parse_leaf(&mut self) -> Result<Expr, ParseError> {
        let token = self.cursor.peek(0)?;

        let expr = match (token.kind, &token.value) {
            (TokenKind::Identifier, TokenValue::Text(s)) => Expr::Identifier(s.clone()),
            (TokenKind::Number, TokenValue::Number(n)) => Expr::Number(*n),
            (TokenKind::Character, TokenValue::Text(s)) => Expr::Character(s.clone()),
            (TokenKind::Str, TokenValue::Text(s)) => Expr::Str(s.clone()),
            _ => {
                return Err(ParseError::UnexpectedToken {
                    got: token.to_string(),
                    expected: "an expression".to_string(),
                    location: token.location,
                })
            }
        };

        self.cursor.advance(1);
        Ok(expr)
    }
}
