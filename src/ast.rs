//! Abstract Syntax Tree definitions for Lox
//!
//! The tree is stored flat: one dense array per node kind, addressed by
//! `(kind, index)` handles instead of pointers. Handles stay valid for the
//! lifetime of the `Program`; nodes never move once inserted.

use crate::literal::Literal;
use crate::token::Token;

/// Expression node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprKind {
    Literal,
    Identifier,
    Grouping,
    Unary,
    Binary,
    Logical,
    Assignment,
    IncDec,
    Call,
}

/// Statement node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StmtKind {
    Expression,
    Variable,
    Constant,
    Scope,
    Branch,
    Loop,
    Function,
    Return,
}

/// Typed index of an expression node within a `Program`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExprHandle {
    pub kind: ExprKind,
    pub index: u32,
}

/// Typed index of a statement node within a `Program`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StmtHandle {
    pub kind: StmtKind,
    pub index: u32,
}

// ==================== Expression nodes ====================

#[derive(Debug, Clone)]
pub struct LiteralExpr {
    pub value: Literal,
}

#[derive(Debug, Clone, Copy)]
pub struct IdentifierExpr {
    pub name: Token,
}

#[derive(Debug, Clone, Copy)]
pub struct GroupingExpr {
    pub inner: ExprHandle,
}

/// Unary operation: `-x`, `!x`
#[derive(Debug, Clone, Copy)]
pub struct UnaryExpr {
    pub op: Token,
    pub operand: ExprHandle,
}

/// Arithmetic or comparison operation: `a + b`, `x < y`
#[derive(Debug, Clone, Copy)]
pub struct BinaryExpr {
    pub op: Token,
    pub left: ExprHandle,
    pub right: ExprHandle,
}

/// Short-circuiting `and` / `or`
#[derive(Debug, Clone, Copy)]
pub struct LogicalExpr {
    pub op: Token,
    pub left: ExprHandle,
    pub right: ExprHandle,
}

#[derive(Debug, Clone, Copy)]
pub struct AssignmentExpr {
    pub target: Token,
    pub value: ExprHandle,
}

/// Prefix `++x` / `--x`
#[derive(Debug, Clone, Copy)]
pub struct IncDecExpr {
    pub target: Token,
    pub op: Token,
}

/// Function call: `callee(args...)`. `paren` is the closing parenthesis,
/// kept for error reporting.
#[derive(Debug, Clone)]
pub struct CallExpr {
    pub callee: ExprHandle,
    pub paren: Token,
    pub args: Vec<ExprHandle>,
}

// ==================== Statement nodes ====================

#[derive(Debug, Clone, Copy)]
pub struct ExpressionStmt {
    pub expr: ExprHandle,
}

/// `var name { initializer? }`. A missing initializer binds `null`.
#[derive(Debug, Clone, Copy)]
pub struct VariableStmt {
    pub name: Token,
    pub initializer: Option<ExprHandle>,
}

/// `const name { initializer }`. The initializer is always present.
#[derive(Debug, Clone, Copy)]
pub struct ConstantStmt {
    pub name: Token,
    pub initializer: ExprHandle,
}

/// Block: `{ body... }`
#[derive(Debug, Clone)]
pub struct ScopeStmt {
    pub body: Vec<StmtHandle>,
}

/// `if (condition) { } else { }`
#[derive(Debug, Clone, Copy)]
pub struct BranchStmt {
    pub condition: ExprHandle,
    pub then_branch: StmtHandle,
    pub else_branch: Option<StmtHandle>,
}

/// `while (condition) { }`, also the lowered form of `for`.
#[derive(Debug, Clone, Copy)]
pub struct LoopStmt {
    pub condition: ExprHandle,
    pub body: Option<StmtHandle>,
}

/// `fun name(params) { }`
#[derive(Debug, Clone)]
pub struct FunctionStmt {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: StmtHandle,
}

/// `return value?;`
#[derive(Debug, Clone, Copy)]
pub struct ReturnStmt {
    pub keyword: Token,
    pub value: Option<ExprHandle>,
}

/// A complete program: per-kind node arenas plus the ordered list of
/// top-level statements.
#[derive(Debug, Default)]
pub struct Program {
    literals: Vec<LiteralExpr>,
    identifiers: Vec<IdentifierExpr>,
    groupings: Vec<GroupingExpr>,
    unaries: Vec<UnaryExpr>,
    binaries: Vec<BinaryExpr>,
    logicals: Vec<LogicalExpr>,
    assignments: Vec<AssignmentExpr>,
    incdecs: Vec<IncDecExpr>,
    calls: Vec<CallExpr>,

    expressions: Vec<ExpressionStmt>,
    variables: Vec<VariableStmt>,
    constants: Vec<ConstantStmt>,
    scopes: Vec<ScopeStmt>,
    branches: Vec<BranchStmt>,
    loops: Vec<LoopStmt>,
    functions: Vec<FunctionStmt>,
    returns: Vec<ReturnStmt>,

    pub statements: Vec<StmtHandle>,
}

macro_rules! expr_arena {
    ($add:ident, $get:ident, $field:ident, $node:ty, $kind:ident) => {
        pub fn $add(&mut self, node: $node) -> ExprHandle {
            let index = self.$field.len() as u32;
            self.$field.push(node);
            ExprHandle {
                kind: ExprKind::$kind,
                index,
            }
        }

        pub fn $get(&self, handle: ExprHandle) -> &$node {
            debug_assert_eq!(handle.kind, ExprKind::$kind);
            &self.$field[handle.index as usize]
        }
    };
}

macro_rules! stmt_arena {
    ($add:ident, $get:ident, $field:ident, $node:ty, $kind:ident) => {
        pub fn $add(&mut self, node: $node) -> StmtHandle {
            let index = self.$field.len() as u32;
            self.$field.push(node);
            StmtHandle {
                kind: StmtKind::$kind,
                index,
            }
        }

        pub fn $get(&self, handle: StmtHandle) -> &$node {
            debug_assert_eq!(handle.kind, StmtKind::$kind);
            &self.$field[handle.index as usize]
        }
    };
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    expr_arena!(add_literal, literal, literals, LiteralExpr, Literal);
    expr_arena!(add_identifier, identifier, identifiers, IdentifierExpr, Identifier);
    expr_arena!(add_grouping, grouping, groupings, GroupingExpr, Grouping);
    expr_arena!(add_unary, unary, unaries, UnaryExpr, Unary);
    expr_arena!(add_binary, binary, binaries, BinaryExpr, Binary);
    expr_arena!(add_logical, logical, logicals, LogicalExpr, Logical);
    expr_arena!(add_assignment, assignment, assignments, AssignmentExpr, Assignment);
    expr_arena!(add_incdec, incdec, incdecs, IncDecExpr, IncDec);
    expr_arena!(add_call, call, calls, CallExpr, Call);

    stmt_arena!(add_expression, expression, expressions, ExpressionStmt, Expression);
    stmt_arena!(add_variable, variable, variables, VariableStmt, Variable);
    stmt_arena!(add_constant, constant, constants, ConstantStmt, Constant);
    stmt_arena!(add_scope, scope, scopes, ScopeStmt, Scope);
    stmt_arena!(add_branch, branch, branches, BranchStmt, Branch);
    stmt_arena!(add_loop, loop_stmt, loops, LoopStmt, Loop);
    stmt_arena!(add_function, function, functions, FunctionStmt, Function);
    stmt_arena!(add_return, return_stmt, returns, ReturnStmt, Return);

    /// Record a handle in the top-level statement list.
    pub fn add_statement(&mut self, stmt: StmtHandle) {
        self.statements.push(stmt);
    }
}
