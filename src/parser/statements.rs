//! Statement parsing
//!
//! Statement dispatch is by the current token: a type keyword (or `const`)
//! starts a declaration, a control keyword routes to its sub-parser, and
//! anything else is a bare expression statement. Declarations, returns and
//! expression statements take a trailing `;` at this level; `if`, `for` and
//! `while` do not — a bodyless header (`if (c);`, `while (c);`, `for (…);`)
//! consumes its own `;` marker inside the sub-parser.
//!
//! Bodies may be brace-less: a block with no `{` is a single statement
//! wrapped as a one-statement block.

use crate::parser::cst::{Block, ElseBranch, IfStmt, Stmt};
use crate::parser::{ParseError, Parser};
use crate::token::TokenKind;

impl Parser {
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        if self.cursor.is(TokenKind::Type, None)
            || self.cursor.is(TokenKind::Keyword, Some("const"))
        {
            let stmt = self.parse_declaration()?;
            self.cursor.expect(TokenKind::Operator, Some(";"))?;
            return Ok(stmt);
        }

        if self.cursor.is(TokenKind::Keyword, None) {
            let keyword = self.cursor.peek(0)?.value.clone().into_text();
            return match keyword.as_str() {
                "if" => Ok(Stmt::If(self.parse_if()?)),
                "for" => self.parse_for(),
                "while" => self.parse_while(),
                "return" => {
                    let stmt = self.parse_return()?;
                    self.cursor.expect(TokenKind::Operator, Some(";"))?;
                    Ok(stmt)
                }
                _ => {
                    let token = self.cursor.peek(0)?;
                    Err(ParseError::UnexpectedToken {
                        got: token.to_string(),
                        expected: "a statement".to_string(),
                        location: token.location,
                    })
                }
            };
        }

        let expr = self.parse_expression()?;
        self.cursor.expect(TokenKind::Operator, Some(";"))?;
        Ok(Stmt::Expr(expr))
    }

    /// `[const] type [*]* name [subscript] [= initializer]`
    fn parse_declaration(&mut self) -> Result<Stmt, ParseError> {
        let name = self.parse_variable()?;

        let init = if self
            .cursor
            .consume_if(TokenKind::Operator, Some("="))
            .is_some()
        {
            Some(self.parse_expression()?)
        } else {
            None
        };

        Ok(Stmt::Declaration { name, init })
    }

    /// `if (cond) …` — also consumes the `else if` keyword when called for
    /// a chain link. A `;` in place of the body is a no-op conditional.
    fn parse_if(&mut self) -> Result<IfStmt, ParseError> {
        self.cursor.expect(TokenKind::Keyword, None)?;
        let cond = self.parse_paren_expression()?;

        if self
            .cursor
            .consume_if(TokenKind::Operator, Some(";"))
            .is_some()
        {
            return Ok(IfStmt {
                cond,
                body: None,
                else_branch: None,
            });
        }

        let body = self.parse_block()?;

        let else_branch = if self.cursor.is(TokenKind::Keyword, Some("else if")) {
            Some(ElseBranch::ElseIf(Box::new(self.parse_if()?)))
        } else if self
            .cursor
            .consume_if(TokenKind::Keyword, Some("else"))
            .is_some()
        {
            Some(ElseBranch::Else(self.parse_block()?))
        } else {
            None
        };

        Ok(IfStmt {
            cond,
            body: Some(body),
            else_branch,
        })
    }

    /// `for (init?; cond?; step?)` with a `;` or block body.
    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        self.cursor.expect(TokenKind::Keyword, Some("for"))?;
        self.cursor.expect(TokenKind::Operator, Some("("))?;

        let init = if self.cursor.is(TokenKind::Operator, Some(";")) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.cursor.expect(TokenKind::Operator, Some(";"))?;

        let cond = if self.cursor.is(TokenKind::Operator, Some(";")) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.cursor.expect(TokenKind::Operator, Some(";"))?;

        let step = if self.cursor.is(TokenKind::Operator, Some(")")) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.cursor.expect(TokenKind::Operator, Some(")"))?;

        let body = if self
            .cursor
            .consume_if(TokenKind::Operator, Some(";"))
            .is_some()
        {
            None
        } else {
            Some(self.parse_block()?)
        };

        Ok(Stmt::For {
            init,
            cond,
            step,
            body,
        })
    }

    /// `while (cond)` with a `;` or block body.
    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        self.cursor.expect(TokenKind::Keyword, Some("while"))?;
        let cond = self.parse_paren_expression()?;

        let body = if self
            .cursor
            .consume_if(TokenKind::Operator, Some(";"))
            .is_some()
        {
            None
        } else {
            Some(self.parse_block()?)
        };

        Ok(Stmt::While { cond, body })
    }

    /// `return [expression]` — the trailing `;` belongs to the statement
    /// level, so a bare `return;` takes exactly one.
    fn parse_return(&mut self) -> Result<Stmt, ParseError> {
        self.cursor.expect(TokenKind::Keyword, Some("return"))?;

        if self.cursor.is(TokenKind::Operator, Some(";")) {
            return Ok(Stmt::Return(None));
        }

        Ok(Stmt::Return(Some(self.parse_expression()?)))
    }

    /// `{ stmt* }`, or a single statement as an implicit block.
    pub(crate) fn parse_block(&mut self) -> Result<Block, ParseError> {
        if !self.cursor.is(TokenKind::Operator, Some("{")) {
            return Ok(Block(vec![self.parse_statement()?]));
        }

        self.cursor.expect(TokenKind::Operator, Some("{"))?;

        let mut statements = Vec::new();
        while !self.cursor.is(TokenKind::Operator, Some("}")) {
            statements.push(self.parse_statement()?);
        }

        self.cursor.expect(TokenKind::Operator, Some("}"))?;

        Ok(Block(statements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::scan;
    use crate::parser::cst::Expr;

    fn parse_stmt(source: &str) -> Result<Stmt, ParseError> {
        Parser::new(scan(source).unwrap()).parse_statement()
    }

    #[test]
    fn test_if_else_if_else_chain() {
        let stmt = parse_stmt("if (x) { y; } else if (z) { w; } else { v; }").unwrap();

        let Stmt::If(first) = stmt else {
            panic!("expected if statement");
        };
        assert!(first.body.is_some());

        let Some(ElseBranch::ElseIf(second)) = first.else_branch else {
            panic!("expected else-if link");
        };
        assert!(matches!(second.else_branch, Some(ElseBranch::Else(_))));
    }

    #[test]
    fn test_bodyless_if_consumes_marker() {
        let mut parser = Parser::new(scan("if (x); y;").unwrap());

        let stmt = parser.parse_statement().unwrap();
        let Stmt::If(if_stmt) = stmt else {
            panic!("expected if statement");
        };
        assert!(if_stmt.body.is_none());

        // The next statement must parse cleanly after the `;` marker.
        let next = parser.parse_statement().unwrap();
        assert!(matches!(next, Stmt::Expr(Expr::Identifier(ref n)) if n == "y"));
    }

    #[test]
    fn test_braceless_bodies() {
        let stmt = parse_stmt("if (x) y = 1;").unwrap();

        let Stmt::If(if_stmt) = stmt else {
            panic!("expected if statement");
        };
        let body = if_stmt.body.unwrap();
        assert_eq!(body.0.len(), 1);
    }

    #[test]
    fn test_for_with_all_clauses() {
        let stmt = parse_stmt("for (i = 0; i < 10; i += 1) { f(i); }").unwrap();

        match stmt {
            Stmt::For {
                init,
                cond,
                step,
                body,
            } => {
                assert!(init.is_some());
                assert!(cond.is_some());
                assert!(step.is_some());
                assert!(body.is_some());
            }
            other => panic!("expected for statement, got {:?}", other),
        }
    }

    #[test]
    fn test_headerless_bodyless_for() {
        let stmt = parse_stmt("for (;;);").unwrap();

        match stmt {
            Stmt::For {
                init,
                cond,
                step,
                body,
            } => {
                assert!(init.is_none());
                assert!(cond.is_none());
                assert!(step.is_none());
                assert!(body.is_none());
            }
            other => panic!("expected for statement, got {:?}", other),
        }
    }

    #[test]
    fn test_while_with_empty_body() {
        let stmt = parse_stmt("while (x);").unwrap();
        assert!(matches!(stmt, Stmt::While { body: None, .. }));

        let stmt = parse_stmt("while (x) { f(); }").unwrap();
        assert!(matches!(stmt, Stmt::While { body: Some(_), .. }));
    }

    #[test]
    fn test_return_forms() {
        assert!(matches!(parse_stmt("return;").unwrap(), Stmt::Return(None)));
        assert!(matches!(
            parse_stmt("return x + 1;").unwrap(),
            Stmt::Return(Some(_))
        ));
    }

    #[test]
    fn test_const_declaration() {
        let stmt = parse_stmt("const int x = 3;").unwrap();
        assert!(matches!(
            stmt,
            Stmt::Declaration {
                init: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn test_expression_statement_needs_semicolon() {
        let err = parse_stmt("f()").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_stray_else_is_rejected() {
        let err = parse_stmt("else { x; }").unwrap_err();
        match err {
            ParseError::UnexpectedToken { got, .. } => assert_eq!(got, "'else'"),
            other => panic!("expected UnexpectedToken, got {:?}", other),
        }
    }
}
