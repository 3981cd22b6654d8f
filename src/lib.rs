//! # Introduction
//!
//! lowc is the front half of a compiler for a small statically-typed C-like
//! language: it scans source text, parses it with a recursive-descent parser,
//! and lowers the resulting concrete syntax tree into a target-agnostic
//! imperative AST that a back end (interpreter, bytecode emitter, printer)
//! can consume.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → CST → Lowering → Module
//! ```
//!
//! 1. [`lexer`] — ordered-rule scanner producing located [`token::Token`]s.
//! 2. [`parser`] — recursive-descent parser building the concrete syntax
//!    tree in [`parser::cst`].
//! 3. [`lower`] — desugaring pass producing the [`ast::Module`].
//!
//! ## Supported language subset
//!
//! Types: `int`, `char`, `float`, `void` (recognized, not checked).
//! Control flow: `if`/`else if`/`else`, `while`, `for`, `return`.
//! Expressions: the C arithmetic, bitwise, comparison, boolean and
//! assignment operators, prefix and postfix `++`/`--`, and calls.
//!
//! Each stage is usable on its own; [`compile`] and [`compile_program`] run
//! the whole pipeline.

pub mod ast;
pub mod lexer;
pub mod lower;
pub mod parser;
pub mod token;

use std::fmt;

/// Any error the pipeline can produce, tagged by the stage that raised it.
#[derive(Debug)]
pub enum PipelineError {
    Lex(lexer::LexError),
    Parse(parser::ParseError),
    Lower(lower::LowerError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Lex(e) => write!(f, "{}", e),
            PipelineError::Parse(e) => write!(f, "{}", e),
            PipelineError::Lower(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Lex(e) => Some(e),
            PipelineError::Parse(e) => Some(e),
            PipelineError::Lower(e) => Some(e),
        }
    }
}

impl From<lexer::LexError> for PipelineError {
    fn from(e: lexer::LexError) -> Self {
        PipelineError::Lex(e)
    }
}

impl From<parser::ParseError> for PipelineError {
    fn from(e: parser::ParseError) -> Self {
        PipelineError::Parse(e)
    }
}

impl From<lower::LowerError> for PipelineError {
    fn from(e: lower::LowerError) -> Self {
        PipelineError::Lower(e)
    }
}

/// Run the full pipeline on `source` and return the lowered module.
pub fn compile(source: &str) -> Result<ast::Module, PipelineError> {
    let tokens = lexer::scan(source)?;
    let declarations = parser::Parser::new(tokens).parse_program()?;
    let module = lower::lower_program(declarations)?;
    Ok(module)
}

/// [`compile`], then append a no-argument call of `entry` so the module runs
/// as a program when handed to an executing back end.
pub fn compile_program(source: &str, entry: &str) -> Result<ast::Module, PipelineError> {
    let mut module = compile(source)?;
    module.push_entry_call(entry);
    Ok(module)
}
