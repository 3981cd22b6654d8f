//! Concrete syntax tree definitions
//!
//! The CST preserves surface-level structure as the grammar produced it:
//! else-if chains are a distinct shape from nested blocks, prefix and postfix
//! operators are separate node kinds, and for-loop headers keep their three
//! optional clauses. Every variant's arity is fixed by its shape; the
//! lowering pass consumes the tree by value, exactly once.

use crate::token::Number;

/// A top-level declaration: a typed function signature followed either by a
/// body (definition) or a bare `;` (forward declaration).
#[derive(Debug, Clone, PartialEq)]
pub enum TopLevel {
    FunctionDef {
        return_type: String,
        name: String,
        params: Vec<String>,
        body: Block,
    },
    ForwardDecl {
        return_type: String,
        name: String,
        params: Vec<String>,
    },
}

/// A statement list. Brace-less single-statement bodies parse as a
/// one-statement block.
#[derive(Debug, Clone, PartialEq)]
pub struct Block(pub Vec<Stmt>);

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `type name [subscript] [= init];` — only the name and initializer are
    /// retained; types and subscripts are recognized, not recorded.
    Declaration { name: String, init: Option<Expr> },
    If(IfStmt),
    For {
        init: Option<Expr>,
        cond: Option<Expr>,
        step: Option<Expr>,
        body: Option<Block>,
    },
    While {
        cond: Expr,
        body: Option<Block>,
    },
    Return(Option<Expr>),
    Expr(Expr),
}

/// `if (cond) body` with an optional chained else branch. A bodyless
/// conditional (`if (cond);`) has `body: None`.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub cond: Expr,
    pub body: Option<Block>,
    pub else_branch: Option<ElseBranch>,
}

/// The tail of an if statement: either another if (an `else if` chain link)
/// or a final else block.
#[derive(Debug, Clone, PartialEq)]
pub enum ElseBranch {
    ElseIf(Box<IfStmt>),
    Else(Block),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Call {
        callee: String,
        args: Vec<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Postfix {
        op: IncDecOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Identifier(String),
    Number(Number),
    Character(String),
    Str(String),
}

/// Prefix unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,    // !x
    Invert, // ~x
    AddrOf, // &x
    Plus,   // +x
    Minus,  // -x
    Inc,    // ++x
    Dec,    // --x
}

impl UnaryOp {
    pub fn from_spelling(spelling: &str) -> Option<Self> {
        match spelling {
            "!" => Some(UnaryOp::Not),
            "~" => Some(UnaryOp::Invert),
            "&" => Some(UnaryOp::AddrOf),
            "+" => Some(UnaryOp::Plus),
            "-" => Some(UnaryOp::Minus),
            "--" => Some(UnaryOp::Dec),
            "++" => Some(UnaryOp::Inc),
            _ => None,
        }
    }
}

/// Postfix increment/decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncDecOp {
    Inc,
    Dec,
}

/// Binary operators, including the assignment family. The set is closed:
/// the expression parser only consumes operators with a known precedence,
/// so lowering can match exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Mul,
    Div,
    Mod,
    Add,
    Sub,
    Shl,
    Shr,
    Eq,
    Ne,
    Ge,
    Le,
    Gt,
    Lt,
    BitAnd,
    BitXor,
    BitOr,
    And,
    Or,
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
}

impl BinaryOp {
    pub fn from_spelling(spelling: &str) -> Option<Self> {
        match spelling {
            "*" => Some(BinaryOp::Mul),
            "/" => Some(BinaryOp::Div),
            "%" => Some(BinaryOp::Mod),
            "+" => Some(BinaryOp::Add),
            "-" => Some(BinaryOp::Sub),
            "<<" => Some(BinaryOp::Shl),
            ">>" => Some(BinaryOp::Shr),
            "==" => Some(BinaryOp::Eq),
            "!=" => Some(BinaryOp::Ne),
            ">=" => Some(BinaryOp::Ge),
            "<=" => Some(BinaryOp::Le),
            ">" => Some(BinaryOp::Gt),
            "<" => Some(BinaryOp::Lt),
            "&" => Some(BinaryOp::BitAnd),
            "^" => Some(BinaryOp::BitXor),
            "|" => Some(BinaryOp::BitOr),
            "&&" => Some(BinaryOp::And),
            "||" => Some(BinaryOp::Or),
            "=" => Some(BinaryOp::Assign),
            "+=" => Some(BinaryOp::AddAssign),
            "-=" => Some(BinaryOp::SubAssign),
            "*=" => Some(BinaryOp::MulAssign),
            "/=" => Some(BinaryOp::DivAssign),
            _ => None,
        }
    }

    /// Precedence, low to high. The assignment family binds loosest.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Assign
            | BinaryOp::AddAssign
            | BinaryOp::SubAssign
            | BinaryOp::MulAssign
            | BinaryOp::DivAssign => 1,
            BinaryOp::Or => 3,
            BinaryOp::And => 4,
            BinaryOp::BitOr => 5,
            BinaryOp::BitXor => 6,
            BinaryOp::BitAnd => 7,
            BinaryOp::Eq
            | BinaryOp::Ne
            | BinaryOp::Ge
            | BinaryOp::Le
            | BinaryOp::Gt
            | BinaryOp::Lt => 8,
            BinaryOp::Shl | BinaryOp::Shr => 10,
            BinaryOp::Add | BinaryOp::Sub => 11,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 12,
        }
    }

    /// The assignment family chains right: `a = b = c` groups as
    /// `a = (b = c)`. Every other operator is left-associative.
    pub fn is_right_assoc(self) -> bool {
        matches!(
            self,
            BinaryOp::Assign
                | BinaryOp::AddAssign
                | BinaryOp::SubAssign
                | BinaryOp::MulAssign
                | BinaryOp::DivAssign
        )
    }

    pub fn is_assignment(self) -> bool {
        self.is_right_assoc()
    }
}
