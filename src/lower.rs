//! Lowering from the CST to the target-agnostic AST
//!
//! A tree-to-tree transform consuming the parser's output by value. Dispatch
//! is an exhaustive match over the closed CST enums, so a CST shape with no
//! lowering is a compile error rather than a runtime lookup failure.
//!
//! Desugarings performed here:
//! - compound assignment folds a load of the target into the value
//!   (`a += e` ⇒ `a = a + e`)
//! - prefix and postfix `++`/`--` become read-modify-write assignments
//! - for-loops become `init; while cond { body…; step }`, spliced into the
//!   enclosing statement list
//! - blocks flatten to statement lists; else-if chains nest as conditionals
//!   whose else branch is a single-element list

use crate::ast::{self, ArithOp, BoolOpKind, CmpOp, Module, NameRef, UnaryOpKind};
use crate::parser::cst::{self, BinaryOp, Block, ElseBranch, IfStmt, IncDecOp, TopLevel, UnaryOp};
use crate::token::Number;
use std::fmt;

/// Lowering error type
#[derive(Debug)]
pub enum LowerError {
    /// The target of an assignment or increment is not a plain name. The
    /// grammar admits such shapes (`5 = 3;` is syntactically well formed);
    /// lowering is where they have no legal rendering.
    InvalidAssignmentTarget { found: String },
}

impl fmt::Display for LowerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LowerError::InvalidAssignmentTarget { found } => {
                write!(f, "Lowering error: cannot assign to {}", found)
            }
        }
    }
}

impl std::error::Error for LowerError {}

/// Lower a parsed program into a module, each top-level declaration in
/// source order.
pub fn lower_program(declarations: Vec<TopLevel>) -> Result<Module, LowerError> {
    let body = declarations
        .into_iter()
        .map(lower_toplevel)
        .collect::<Result<Vec<_>, _>>()?;

    let module = Module::new(body);
    log::debug!("lowered module with {} functions", module.function_count());

    Ok(module)
}

/// Both declaration forms lower to a function definition; a forward
/// declaration contributes no executable statements, so its body is empty.
fn lower_toplevel(declaration: TopLevel) -> Result<ast::Stmt, LowerError> {
    match declaration {
        TopLevel::FunctionDef {
            name, params, body, ..
        } => Ok(ast::Stmt::FunctionDef {
            name,
            params: lower_parameter_list(params),
            body: lower_block(body)?,
        }),
        TopLevel::ForwardDecl { name, params, .. } => Ok(ast::Stmt::FunctionDef {
            name,
            params: lower_parameter_list(params),
            body: Vec::new(),
        }),
    }
}

fn lower_parameter_list(params: Vec<String>) -> Vec<NameRef> {
    params.into_iter().map(NameRef::param).collect()
}

fn lower_block(block: Block) -> Result<Vec<ast::Stmt>, LowerError> {
    let mut statements = Vec::new();
    for stmt in block.0 {
        lower_statement(stmt, &mut statements)?;
    }
    Ok(statements)
}

/// One CST statement may expand to several lowered statements (for-loops),
/// so lowering appends into the enclosing list.
fn lower_statement(stmt: cst::Stmt, out: &mut Vec<ast::Stmt>) -> Result<(), LowerError> {
    match stmt {
        cst::Stmt::Declaration { name, init } => {
            let value = match init {
                Some(expr) => lower_expr(expr)?,
                None => ast::Expr::Uninit,
            };
            out.push(ast::Stmt::Assign {
                target: NameRef::store(name),
                value,
            });
        }
        cst::Stmt::If(if_stmt) => out.push(lower_if(if_stmt)?),
        cst::Stmt::For {
            init,
            cond,
            step,
            body,
        } => {
            if let Some(init) = init {
                out.push(as_statement(lower_expr(init)?));
            }
            let cond = match cond {
                Some(cond) => lower_expr(cond)?,
                None => ast::Expr::Num(Number::Int(1)),
            };
            let mut loop_body = match body {
                Some(block) => lower_block(block)?,
                None => Vec::new(),
            };
            if let Some(step) = step {
                loop_body.push(as_statement(lower_expr(step)?));
            }
            out.push(ast::Stmt::While {
                cond,
                body: loop_body,
            });
        }
        cst::Stmt::While { cond, body } => out.push(ast::Stmt::While {
            cond: lower_expr(cond)?,
            body: body.map(lower_block).transpose()?.unwrap_or_default(),
        }),
        cst::Stmt::Return(value) => out.push(ast::Stmt::Return {
            value: value.map(lower_expr).transpose()?,
        }),
        cst::Stmt::Expr(expr) => out.push(as_statement(lower_expr(expr)?)),
    }
    Ok(())
}

/// Statement wrapping: an assignment becomes an assignment statement,
/// anything else an expression statement.
fn as_statement(expr: ast::Expr) -> ast::Stmt {
    match expr {
        ast::Expr::Assign { target, value } => ast::Stmt::Assign {
            target,
            value: *value,
        },
        other => ast::Stmt::Expr { value: other },
    }
}

fn lower_if(if_stmt: IfStmt) -> Result<ast::Stmt, LowerError> {
    let cond = lower_expr(if_stmt.cond)?;
    let body = if_stmt.body.map(lower_block).transpose()?.unwrap_or_default();

    // An else-if tail becomes a single-element branch list so the shape
    // matches a plain else branch.
    let orelse = match if_stmt.else_branch {
        None => Vec::new(),
        Some(ElseBranch::ElseIf(inner)) => vec![lower_if(*inner)?],
        Some(ElseBranch::Else(block)) => lower_block(block)?,
    };

    Ok(ast::Stmt::If { cond, body, orelse })
}

fn lower_expr(expr: cst::Expr) -> Result<ast::Expr, LowerError> {
    match expr {
        cst::Expr::Binary { op, lhs, rhs } => lower_binary(op, *lhs, *rhs),
        cst::Expr::Unary { op, operand } => match op {
            UnaryOp::Inc => lower_increment(*operand, ArithOp::Add),
            UnaryOp::Dec => lower_increment(*operand, ArithOp::Sub),
            UnaryOp::Not => lower_unary(UnaryOpKind::Not, *operand),
            UnaryOp::Invert => lower_unary(UnaryOpKind::Invert, *operand),
            UnaryOp::Plus => lower_unary(UnaryOpKind::UAdd, *operand),
            UnaryOp::Minus => lower_unary(UnaryOpKind::USub, *operand),
            // No pointers in the target: address-of is the identity.
            UnaryOp::AddrOf => lower_expr(*operand),
        },
        cst::Expr::Postfix { op, operand } => match op {
            IncDecOp::Inc => lower_increment(*operand, ArithOp::Add),
            IncDecOp::Dec => lower_increment(*operand, ArithOp::Sub),
        },
        cst::Expr::Call { callee, args } => Ok(ast::Expr::Call {
            func: NameRef::load(callee),
            args: args
                .into_iter()
                .map(lower_expr)
                .collect::<Result<Vec<_>, _>>()?,
        }),
        cst::Expr::Identifier(name) => Ok(ast::Expr::Name(NameRef::load(name))),
        cst::Expr::Number(n) => Ok(ast::Expr::Num(n)),
        cst::Expr::Character(text) | cst::Expr::Str(text) => Ok(ast::Expr::Str(text)),
    }
}

fn lower_unary(op: UnaryOpKind, operand: cst::Expr) -> Result<ast::Expr, LowerError> {
    Ok(ast::Expr::UnaryOp {
        op,
        operand: Box::new(lower_expr(operand)?),
    })
}

/// Read-modify-write for `++`/`--` in either position: the target's
/// store-mode reference assigned from its load-mode reference combined
/// with the literal 1.
fn lower_increment(operand: cst::Expr, op: ArithOp) -> Result<ast::Expr, LowerError> {
    let name = assignable_name(&operand)?;

    Ok(ast::Expr::Assign {
        target: NameRef::store(name.clone()),
        value: Box::new(ast::Expr::BinOp {
            op,
            left: Box::new(ast::Expr::Name(NameRef::load(name))),
            right: Box::new(ast::Expr::Num(Number::Int(1))),
        }),
    })
}

fn assignable_name(expr: &cst::Expr) -> Result<String, LowerError> {
    match expr {
        cst::Expr::Identifier(name) => Ok(name.clone()),
        other => Err(LowerError::InvalidAssignmentTarget {
            found: describe(other),
        }),
    }
}

fn describe(expr: &cst::Expr) -> String {
    match expr {
        cst::Expr::Call { .. } => "a call".to_string(),
        cst::Expr::Unary { .. } => "a unary expression".to_string(),
        cst::Expr::Postfix { .. } => "a postfix expression".to_string(),
        cst::Expr::Binary { .. } => "a binary expression".to_string(),
        cst::Expr::Identifier(name) => format!("identifier '{}'", name),
        cst::Expr::Number(n) => format!("number {}", n),
        cst::Expr::Character(text) => format!("character literal '{}'", text),
        cst::Expr::Str(text) => format!("string literal \"{}\"", text),
    }
}

/// Which lowered node kind a binary operator produces. This match is the
/// authoritative operator table: arithmetic/bitwise, comparison, boolean,
/// and the assignment family (with the compound operation, if any).
enum BinaryLowering {
    Arith(ArithOp),
    Cmp(CmpOp),
    Bool(BoolOpKind),
    Assignment(Option<ArithOp>),
}

fn classify(op: BinaryOp) -> BinaryLowering {
    match op {
        BinaryOp::Add => BinaryLowering::Arith(ArithOp::Add),
        BinaryOp::Sub => BinaryLowering::Arith(ArithOp::Sub),
        BinaryOp::Mul => BinaryLowering::Arith(ArithOp::Mult),
        BinaryOp::Div => BinaryLowering::Arith(ArithOp::Div),
        BinaryOp::Mod => BinaryLowering::Arith(ArithOp::Mod),
        BinaryOp::BitAnd => BinaryLowering::Arith(ArithOp::BitAnd),
        BinaryOp::BitOr => BinaryLowering::Arith(ArithOp::BitOr),
        BinaryOp::BitXor => BinaryLowering::Arith(ArithOp::BitXor),
        BinaryOp::Shl => BinaryLowering::Arith(ArithOp::LShift),
        BinaryOp::Shr => BinaryLowering::Arith(ArithOp::RShift),
        BinaryOp::Eq => BinaryLowering::Cmp(CmpOp::Eq),
        BinaryOp::Ne => BinaryLowering::Cmp(CmpOp::NotEq),
        BinaryOp::Gt => BinaryLowering::Cmp(CmpOp::Gt),
        BinaryOp::Ge => BinaryLowering::Cmp(CmpOp::GtE),
        BinaryOp::Lt => BinaryLowering::Cmp(CmpOp::Lt),
        BinaryOp::Le => BinaryLowering::Cmp(CmpOp::LtE),
        BinaryOp::And => BinaryLowering::Bool(BoolOpKind::And),
        BinaryOp::Or => BinaryLowering::Bool(BoolOpKind::Or),
        BinaryOp::Assign => BinaryLowering::Assignment(None),
        BinaryOp::AddAssign => BinaryLowering::Assignment(Some(ArithOp::Add)),
        BinaryOp::SubAssign => BinaryLowering::Assignment(Some(ArithOp::Sub)),
        BinaryOp::MulAssign => BinaryLowering::Assignment(Some(ArithOp::Mult)),
        BinaryOp::DivAssign => BinaryLowering::Assignment(Some(ArithOp::Div)),
    }
}

fn lower_binary(op: BinaryOp, lhs: cst::Expr, rhs: cst::Expr) -> Result<ast::Expr, LowerError> {
    if let BinaryLowering::Assignment(compound) = classify(op) {
        let name = assignable_name(&lhs)?;
        let value = lower_expr(rhs)?;

        let value = match compound {
            Some(arith) => ast::Expr::BinOp {
                op: arith,
                left: Box::new(ast::Expr::Name(NameRef::load(name.clone()))),
                right: Box::new(value),
            },
            None => value,
        };

        return Ok(ast::Expr::Assign {
            target: NameRef::store(name),
            value: Box::new(value),
        });
    }

    let left = Box::new(lower_expr(lhs)?);
    let right = Box::new(lower_expr(rhs)?);

    Ok(match classify(op) {
        BinaryLowering::Arith(op) => ast::Expr::BinOp { op, left, right },
        BinaryLowering::Cmp(op) => ast::Expr::Compare { op, left, right },
        BinaryLowering::Bool(op) => ast::Expr::BoolOp { op, left, right },
        BinaryLowering::Assignment(_) => unreachable!("handled above"),
    })
}
