//! Function records for Lox
//!
//! User-defined and built-in functions share one registry in the
//! environment; a function name resolves to a constant holding its
//! registry index.

use std::fmt;
use std::io::Write;

use crate::ast::StmtHandle;
use crate::literal::Literal;
use crate::token::Token;

/// Signature of a built-in function. Natives write through the
/// evaluator's output sink so effects stay capturable.
pub type NativeFnPtr = fn(&mut dyn Write, &[Literal]) -> Literal;

/// A host-provided function.
#[derive(Clone, Copy)]
pub struct NativeFn {
    pub name: &'static str,
    /// `None` means variadic.
    pub arity: Option<usize>,
    pub func: NativeFnPtr,
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}

/// A user-defined function: parameters plus the handle of its body block.
#[derive(Debug, Clone)]
pub struct DeclaredFn {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: StmtHandle,
}

#[derive(Debug, Clone)]
pub enum Function {
    Native(NativeFn),
    Declared(DeclaredFn),
}

impl Function {
    pub fn arity(&self) -> Option<usize> {
        match self {
            Function::Native(native) => native.arity,
            Function::Declared(declared) => Some(declared.params.len()),
        }
    }

    /// Whether a call with `count` arguments satisfies the arity contract.
    pub fn accepts(&self, count: usize) -> bool {
        self.arity().map_or(true, |arity| arity == count)
    }
}
