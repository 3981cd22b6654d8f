//! Token-stream cursor
//!
//! An index-based view over the immutable token sequence produced by the
//! lexer. All grammar-level consumption goes through [`TokenCursor::expect`]
//! and [`TokenCursor::consume_if`]; disambiguation uses bounded [`peek`]
//! lookahead, never mutation of the underlying sequence.
//!
//! [`peek`]: TokenCursor::peek

use crate::parser::ParseError;
use crate::token::{SourceLocation, Token, TokenKind, TokenValue};

pub struct TokenCursor {
    tokens: Vec<Token>,
    position: usize,
}

fn describe_expectation(kind: TokenKind, value: Option<&str>) -> String {
    match value {
        Some(v) => format!("'{}'", v),
        None => kind.to_string(),
    }
}

impl TokenCursor {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// The token `offset` positions ahead of the cursor. Past-end access
    /// signals end of input.
    pub fn peek(&self, offset: usize) -> Result<&Token, ParseError> {
        self.tokens
            .get(self.position + offset)
            .ok_or(ParseError::UnexpectedEof { expected: None })
    }

    pub fn advance(&mut self, n: usize) {
        self.position += n;
    }

    /// True when the current token has the given kind and, if supplied,
    /// value. False at end of input.
    pub fn is(&self, kind: TokenKind, value: Option<&str>) -> bool {
        self.tokens
            .get(self.position)
            .is_some_and(|t| t.matches(kind, value))
    }

    /// True when the current token has the given kind and its value is one
    /// of `values`.
    pub fn is_in(&self, kind: TokenKind, values: &[&str]) -> bool {
        values.iter().any(|v| self.is(kind, Some(v)))
    }

    /// Consumes the current token and returns its value, or fails with the
    /// observed and expected descriptions when it does not match.
    pub fn expect(
        &mut self,
        kind: TokenKind,
        value: Option<&str>,
    ) -> Result<TokenValue, ParseError> {
        match self.tokens.get(self.position) {
            None => Err(ParseError::UnexpectedEof {
                expected: Some(describe_expectation(kind, value)),
            }),
            Some(token) if token.matches(kind, value) => {
                let consumed = token.value.clone();
                self.position += 1;
                Ok(consumed)
            }
            Some(token) => Err(ParseError::UnexpectedToken {
                got: token.to_string(),
                expected: describe_expectation(kind, value),
                location: token.location,
            }),
        }
    }

    /// [`expect`], rendering the consumed value as text.
    ///
    /// [`expect`]: TokenCursor::expect
    pub fn expect_text(
        &mut self,
        kind: TokenKind,
        value: Option<&str>,
    ) -> Result<String, ParseError> {
        self.expect(kind, value).map(TokenValue::into_text)
    }

    /// Non-failing variant of [`expect`]: consumes and returns the current
    /// token's value iff it matches, and leaves the cursor alone otherwise.
    ///
    /// [`expect`]: TokenCursor::expect
    pub fn consume_if(&mut self, kind: TokenKind, value: Option<&str>) -> Option<TokenValue> {
        if self.is(kind, value) {
            let consumed = self.tokens[self.position].value.clone();
            self.position += 1;
            Some(consumed)
        } else {
            None
        }
    }

    /// Location of the current token, or of the last token when the input
    /// is exhausted.
    pub fn location(&self) -> SourceLocation {
        self.tokens
            .get(self.position)
            .or_else(|| self.tokens.last())
            .map(|t| t.location)
            .unwrap_or(SourceLocation::new(1, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::scan;

    fn cursor(source: &str) -> TokenCursor {
        TokenCursor::new(scan(source).unwrap())
    }

    #[test]
    fn test_peek_and_advance() {
        let mut c = cursor("int x ;");
        assert_eq!(c.peek(0).unwrap().value.as_text(), Some("int"));
        assert_eq!(c.peek(2).unwrap().value.as_text(), Some(";"));
        c.advance(2);
        assert!(c.is(TokenKind::Operator, Some(";")));
        c.advance(1);
        assert!(c.at_end());
        assert!(c.peek(0).is_err());
    }

    #[test]
    fn test_expect_success_and_failure() {
        let mut c = cursor("x = 1");
        assert_eq!(
            c.expect_text(TokenKind::Identifier, None).unwrap(),
            "x"
        );

        let err = c.expect(TokenKind::Operator, Some(";")).unwrap_err();
        match err {
            ParseError::UnexpectedToken { got, expected, .. } => {
                assert_eq!(got, "'='");
                assert_eq!(expected, "';'");
            }
            other => panic!("expected UnexpectedToken, got {:?}", other),
        }
    }

    #[test]
    fn test_expect_at_end_of_input() {
        let mut c = cursor("x");
        c.advance(1);
        let err = c.expect(TokenKind::Operator, Some(";")).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_consume_if() {
        let mut c = cursor(", x");
        assert!(c.consume_if(TokenKind::Operator, Some(";")).is_none());
        assert!(c.consume_if(TokenKind::Operator, Some(",")).is_some());
        assert!(c.is(TokenKind::Identifier, Some("x")));
    }

    #[test]
    fn test_is_in() {
        let c = cursor("while");
        assert!(c.is_in(TokenKind::Keyword, &["if", "while", "for"]));
        assert!(!c.is_in(TokenKind::Keyword, &["if", "for"]));
    }
}
