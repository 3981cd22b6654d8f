//! Lexer (tokenizer) for the C-like source language
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the
//! parser. Scanning applies an ordered rule table: at each position the first
//! rule that matches wins, and its match length is consumed. Ordering is load
//! bearing — comments before operators (`/*` vs `/`), float numerals before
//! integers (`.5`), hexadecimal before the bare-zero rule, multi-character
//! operator spellings before their single-character prefixes (`==` vs `=`),
//! and type/keyword rules before the generic identifier rule.
//!
//! Comment and whitespace rules are silent: they consume text without
//! producing a token. When no rule matches, scanning aborts with a
//! [`LexError`] carrying the entire unconsumed remainder.

use crate::token::{Number, SourceLocation, Token, TokenKind, TokenValue};
use std::fmt;

/// Lexer error type
#[derive(Debug)]
pub struct LexError {
    pub message: String,
    /// The unconsumed tail of the input, starting at the failure position.
    pub remainder: String,
    pub location: SourceLocation,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lexer error at {}: {}",
            self.location, self.message
        )
    }
}

impl std::error::Error for LexError {}

/// Base type names recognized by the scanner, tried in order.
const TYPES: &[&str] = &["char", "int", "float", "void"];

/// Control and storage keywords, tried in order. `else if` is scanned as a
/// single two-word keyword token and therefore must precede `else`.
const KEYWORDS: &[&str] = &["if", "else if", "else", "for", "while", "return", "const"];

/// Operator and punctuation spellings, longest first so compound operators
/// are never split into their prefixes.
const OPERATORS: &[&str] = &[
    "==", "!=", ">=", "<=", "<<", ">>", "-=", "+=", "*=", "/=", "&&", "||", "++", "--", ">", "<",
    "&", "^", "|", "+", "-", "*", "/", "%", "!", "~", "=", ";", ",", "[", "(", "{", "]", ")", "}",
];

/// One scanner rule. The rule's identity selects both its matcher and the
/// token (if any) it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    BlockComment,
    LineComment,
    Float,
    Hex,
    Int,
    Zero,
    CharLiteral,
    StrLiteral,
    Type,
    Keyword,
    Operator,
    Identifier,
    Whitespace,
}

/// The scan order. First match wins; every matcher consumes at least one
/// character, so scanning always makes progress.
const RULES: &[Rule] = &[
    Rule::BlockComment,
    Rule::LineComment,
    Rule::Float,
    Rule::Hex,
    Rule::Int,
    Rule::Zero,
    Rule::CharLiteral,
    Rule::StrLiteral,
    Rule::Type,
    Rule::Keyword,
    Rule::Operator,
    Rule::Identifier,
    Rule::Whitespace,
];

impl Rule {
    /// Returns the number of characters this rule matches at the start of
    /// `input`, or `None` when it does not apply there.
    fn match_len(self, input: &[char]) -> Option<usize> {
        match self {
            Rule::BlockComment => match_block_comment(input),
            Rule::LineComment => match_line_comment(input),
            Rule::Float => match_float(input),
            Rule::Hex => match_hex(input),
            Rule::Int => match_int(input),
            Rule::Zero => match_char(input, '0'),
            Rule::CharLiteral => match_char_literal(input),
            Rule::StrLiteral => match_string_literal(input),
            Rule::Type => match_word_list(input, TYPES),
            Rule::Keyword => match_word_list(input, KEYWORDS),
            Rule::Operator => OPERATORS
                .iter()
                .find(|op| starts_with(input, op))
                .map(|op| op.len()),
            Rule::Identifier => match_identifier(input),
            Rule::Whitespace => match_run(input, |c| matches!(c, ' ' | '\t' | '\r' | '\n')),
        }
    }

    /// Converts the matched text into a token. Silent rules yield `None`;
    /// a malformed payload (e.g. an out-of-range integer) yields an error
    /// message for the caller to wrap.
    fn emit(self, text: &str, location: SourceLocation) -> Result<Option<Token>, String> {
        let token = match self {
            Rule::BlockComment | Rule::LineComment | Rule::Whitespace => return Ok(None),
            Rule::Float => {
                let value: f64 = text
                    .parse()
                    .map_err(|_| format!("malformed float literal '{}'", text))?;
                Token::new(
                    TokenKind::Number,
                    TokenValue::Number(Number::Float(value)),
                    location,
                )
            }
            Rule::Hex => {
                let value = i64::from_str_radix(&text[2..], 16)
                    .map_err(|_| format!("hexadecimal literal '{}' out of range", text))?;
                Token::new(
                    TokenKind::Number,
                    TokenValue::Number(Number::Int(value)),
                    location,
                )
            }
            Rule::Int | Rule::Zero => {
                let value: i64 = text
                    .parse()
                    .map_err(|_| format!("integer literal '{}' out of range", text))?;
                Token::new(
                    TokenKind::Number,
                    TokenValue::Number(Number::Int(value)),
                    location,
                )
            }
            // Quoted literals keep their raw inner text; escape sequences
            // are passed through for the consumer to interpret.
            Rule::CharLiteral => Token::new(
                TokenKind::Character,
                TokenValue::Text(text[1..text.len() - 1].to_string()),
                location,
            ),
            Rule::StrLiteral => Token::new(
                TokenKind::Str,
                TokenValue::Text(text[1..text.len() - 1].to_string()),
                location,
            ),
            Rule::Type => Token::new(TokenKind::Type, TokenValue::Text(text.to_string()), location),
            Rule::Keyword => Token::new(
                TokenKind::Keyword,
                TokenValue::Text(text.to_string()),
                location,
            ),
            Rule::Operator => Token::new(
                TokenKind::Operator,
                TokenValue::Text(text.to_string()),
                location,
            ),
            Rule::Identifier => Token::new(
                TokenKind::Identifier,
                TokenValue::Text(text.to_string()),
                location,
            ),
        };

        Ok(Some(token))
    }
}

/// Tokenize the entire input.
pub fn scan(source: &str) -> Result<Vec<Token>, LexError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut position = 0;
    let mut line = 1;
    let mut column = 1;

    while position < chars.len() {
        let rest = &chars[position..];
        let location = SourceLocation::new(line, column);

        let matched = RULES
            .iter()
            .find_map(|rule| rule.match_len(rest).map(|len| (*rule, len)));

        let Some((rule, len)) = matched else {
            return Err(LexError {
                message: "no scanner rule matches".to_string(),
                remainder: rest.iter().collect(),
                location,
            });
        };

        let text: String = rest[..len].iter().collect();
        if let Some(token) = rule.emit(&text, location).map_err(|message| LexError {
            message,
            remainder: rest.iter().collect(),
            location,
        })? {
            tokens.push(token);
        }

        for ch in &rest[..len] {
            if *ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        position += len;
    }

    log::debug!("lexed {} tokens", tokens.len());

    Ok(tokens)
}

// ===== Matchers =====

fn starts_with(input: &[char], pattern: &str) -> bool {
    let mut chars = pattern.chars();
    let mut i = 0;
    for expected in &mut chars {
        if input.get(i) != Some(&expected) {
            return false;
        }
        i += 1;
    }
    true
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn match_run(input: &[char], pred: impl Fn(char) -> bool) -> Option<usize> {
    let len = input.iter().take_while(|c| pred(**c)).count();
    if len > 0 {
        Some(len)
    } else {
        None
    }
}

fn match_char(input: &[char], expected: char) -> Option<usize> {
    if input.first() == Some(&expected) {
        Some(1)
    } else {
        None
    }
}

/// `/* ... */`, possibly spanning lines; unterminated comments do not match
/// (the failure surfaces as an unmatched remainder).
fn match_block_comment(input: &[char]) -> Option<usize> {
    if !starts_with(input, "/*") {
        return None;
    }
    let mut i = 2;
    while i + 1 < input.len() {
        if input[i] == '*' && input[i + 1] == '/' {
            return Some(i + 2);
        }
        i += 1;
    }
    None
}

/// `// ...` up to, but not including, the end of the line.
fn match_line_comment(input: &[char]) -> Option<usize> {
    if !starts_with(input, "//") {
        return None;
    }
    Some(
        2 + input[2..]
            .iter()
            .take_while(|c| **c != '\n')
            .count(),
    )
}

fn digit_run(input: &[char]) -> usize {
    input.iter().take_while(|c| c.is_ascii_digit()).count()
}

/// An optional integer part (`0` or a nonzero digit run), a dot, and at
/// least one fractional digit. Accepts `.5` with no leading digits.
fn match_float(input: &[char]) -> Option<usize> {
    let int_len = match input.first() {
        Some('0') => 1,
        Some(c) if c.is_ascii_digit() => digit_run(input),
        _ => 0,
    };

    if input.get(int_len) != Some(&'.') {
        return None;
    }

    let frac_len = digit_run(&input[int_len + 1..]);
    if frac_len == 0 {
        return None;
    }

    Some(int_len + 1 + frac_len)
}

fn match_hex(input: &[char]) -> Option<usize> {
    if !starts_with(input, "0x") {
        return None;
    }
    let digits = input[2..]
        .iter()
        .take_while(|c| c.is_ascii_hexdigit())
        .count();
    if digits == 0 {
        return None;
    }
    Some(2 + digits)
}

/// A nonzero decimal integer. Leading zeros are left to the bare-zero rule.
fn match_int(input: &[char]) -> Option<usize> {
    match input.first() {
        Some('1'..='9') => Some(digit_run(input)),
        _ => None,
    }
}

/// A single-quoted literal holding exactly one payload character, which may
/// be a two-character backslash escape.
fn match_char_literal(input: &[char]) -> Option<usize> {
    if input.first() != Some(&'\'') {
        return None;
    }
    let payload_len = match input.get(1) {
        Some('\\') => 2,
        Some('\'') | None => return None,
        Some(_) => 1,
    };
    if input.get(1 + payload_len) == Some(&'\'') {
        Some(payload_len + 2)
    } else {
        None
    }
}

/// A double-quoted literal running to the next unescaped closing quote;
/// unterminated strings do not match.
fn match_string_literal(input: &[char]) -> Option<usize> {
    if input.first() != Some(&'"') {
        return None;
    }
    let mut i = 1;
    loop {
        match input.get(i) {
            None => return None,
            Some('"') => return Some(i + 1),
            Some('\\') => i += 2,
            Some(_) => i += 1,
        }
    }
}

/// First word in `words` that matches at the current position, with a
/// word-boundary check so `intx` stays an identifier.
fn match_word_list(input: &[char], words: &[&str]) -> Option<usize> {
    for word in words {
        let len = word.chars().count();
        if starts_with(input, word)
            && !input.get(len).is_some_and(|c| is_identifier_continue(*c))
        {
            return Some(len);
        }
    }
    None
}

fn match_identifier(input: &[char]) -> Option<usize> {
    match input.first() {
        Some(c) if is_identifier_start(*c) => Some(
            1 + input[1..]
                .iter()
                .take_while(|c| is_identifier_continue(**c))
                .count(),
        ),
        _ => None,
    }
}
