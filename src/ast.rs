//! Lowered AST definitions
//!
//! The pipeline's final artifact: a target-agnostic imperative tree shaped
//! after the statement/expression split of common scripting runtimes. The
//! consumer — an interpreter, a bytecode emitter, or a source printer — only
//! depends on these node kinds, so the whole tree derives serde traits for
//! transport out of process.
//!
//! Every name reference carries an explicit [`BindingMode`]; the mode is
//! structural, set by whichever transform produced the reference, never
//! inferred at use time.

use crate::token::Number;
use serde::{Deserialize, Serialize};

/// How a name reference binds: read, write, or formal parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingMode {
    Load,
    Store,
    Param,
}

/// A reference to a name, together with its binding mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameRef {
    pub name: String,
    pub mode: BindingMode,
}

impl NameRef {
    pub fn load(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: BindingMode::Load,
        }
    }

    pub fn store(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: BindingMode::Store,
        }
    }

    pub fn param(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: BindingMode::Param,
        }
    }
}

/// Arithmetic and bitwise binary operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArithOp {
    Add,
    Sub,
    Mult,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    LShift,
    RShift,
}

/// Comparison operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CmpOp {
    Eq,
    NotEq,
    Gt,
    GtE,
    Lt,
    LtE,
}

/// Short-circuiting boolean operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoolOpKind {
    And,
    Or,
}

/// Unary operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOpKind {
    UAdd,
    USub,
    Not,
    Invert,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    BinOp {
        op: ArithOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Compare {
        op: CmpOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    BoolOp {
        op: BoolOpKind,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    UnaryOp {
        op: UnaryOpKind,
        operand: Box<Expr>,
    },
    /// Assignment in expression position (`a = b = c` nests these).
    Assign {
        target: NameRef,
        value: Box<Expr>,
    },
    Call {
        func: NameRef,
        args: Vec<Expr>,
    },
    Name(NameRef),
    Num(Number),
    Str(String),
    /// Sentinel value assigned by a declaration with no initializer.
    Uninit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    FunctionDef {
        name: String,
        params: Vec<NameRef>,
        body: Vec<Stmt>,
    },
    Assign {
        target: NameRef,
        value: Expr,
    },
    If {
        cond: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    While {
        cond: Expr,
        body: Vec<Stmt>,
    },
    Return {
        value: Option<Expr>,
    },
    /// Statement wrapper for an expression evaluated for its effects.
    Expr {
        value: Expr,
    },
}

/// A lowered program: function definitions (and, optionally, an appended
/// entry-point call) in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub body: Vec<Stmt>,
}

impl Module {
    pub fn new(body: Vec<Stmt>) -> Self {
        Self { body }
    }

    /// Number of function definitions in the module.
    pub fn function_count(&self) -> usize {
        self.body
            .iter()
            .filter(|s| matches!(s, Stmt::FunctionDef { .. }))
            .count()
    }

    /// "Run this module as a program" adapter: appends a no-argument call
    /// of the named entry function as an expression statement.
    pub fn push_entry_call(&mut self, name: &str) {
        self.body.push(Stmt::Expr {
            value: Expr::Call {
                func: NameRef::load(name),
                args: Vec::new(),
            },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_entry_call() {
        let mut module = Module::new(vec![Stmt::FunctionDef {
            name: "main".to_string(),
            params: Vec::new(),
            body: Vec::new(),
        }]);

        module.push_entry_call("main");

        assert_eq!(module.function_count(), 1);
        match module.body.last().unwrap() {
            Stmt::Expr {
                value: Expr::Call { func, args },
            } => {
                assert_eq!(func, &NameRef::load("main"));
                assert!(args.is_empty());
            }
            other => panic!("expected entry call, got {:?}", other),
        }
    }
}
