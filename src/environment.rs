//! Variable environment for Lox
//!
//! Handles lexically scoped variable and constant storage plus the
//! function registry. Bindings live in one flat vector; a scope is just a
//! mark into it, so popping a scope truncates back to the mark.

use crate::function::Function;
use crate::lexemes::LexemeId;
use crate::literal::Literal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mutability {
    Variable,
    Constant,
}

/// A binding in the environment
#[derive(Debug, Clone)]
struct Binding {
    id: LexemeId,
    value: Literal,
    mutability: Mutability,
}

/// Outcome of an assignment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignStatus {
    Ok,
    NotFound,
    Constant,
}

/// How far a `contains` lookup reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchRange {
    Globally,
    CurrentScope,
}

/// Lexically scoped name-to-value bindings and the function registry.
#[derive(Debug, Default)]
pub struct Environment {
    bindings: Vec<Binding>,
    scopes: Vec<usize>,
    functions: Vec<Function>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(self.bindings.len());
    }

    /// Truncate bindings back to the last scope mark and drop the mark.
    pub fn pop_scope(&mut self) {
        let rewind_point = self.rewind_point();
        self.bindings.truncate(rewind_point);
        self.scopes.pop();
    }

    /// Define a mutable variable. Fails if the current scope already binds
    /// the name; shadowing an outer scope is fine.
    pub fn define_variable(&mut self, id: LexemeId, value: Literal) -> bool {
        self.push_binding(id, value, Mutability::Variable)
    }

    /// Define an immutable constant, with the same shadowing rule.
    pub fn define_constant(&mut self, id: LexemeId, value: Literal) -> bool {
        self.push_binding(id, value, Mutability::Constant)
    }

    pub fn contains(&self, id: LexemeId, range: SearchRange) -> bool {
        let bindings = match range {
            SearchRange::Globally => &self.bindings[..],
            SearchRange::CurrentScope => &self.bindings[self.rewind_point()..],
        };
        bindings.iter().any(|binding| binding.id == id)
    }

    /// Search for a binding from the innermost scope outwards.
    pub fn look_up(&self, id: LexemeId) -> Option<&Literal> {
        self.index_of(id).map(|index| &self.bindings[index].value)
    }

    /// Mutate the innermost binding of `id` if it is a variable.
    pub fn assign(&mut self, id: LexemeId, value: Literal) -> AssignStatus {
        let Some(index) = self.index_of(id) else {
            return AssignStatus::NotFound;
        };

        let binding = &mut self.bindings[index];
        if binding.mutability == Mutability::Constant {
            return AssignStatus::Constant;
        }

        binding.value = value;
        AssignStatus::Ok
    }

    /// Append to the function registry and bind `id` as a constant holding
    /// the registry index.
    pub fn register_function(&mut self, id: LexemeId, function: Function) -> bool {
        let address = Literal::Int(self.functions.len() as i64);
        self.functions.push(function);
        self.define_constant(id, address)
    }

    pub fn function_at(&self, index: usize) -> Option<&Function> {
        self.functions.get(index)
    }

    fn index_of(&self, id: LexemeId) -> Option<usize> {
        self.bindings.iter().rposition(|binding| binding.id == id)
    }

    fn push_binding(&mut self, id: LexemeId, value: Literal, mutability: Mutability) -> bool {
        if self.contains(id, SearchRange::CurrentScope) {
            return false;
        }

        self.bindings.push(Binding {
            id,
            value,
            mutability,
        });
        true
    }

    fn rewind_point(&self) -> usize {
        self.scopes.last().copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u16) -> LexemeId {
        LexemeId(n)
    }

    #[test]
    fn pop_scope_restores_bindings_exactly() {
        let mut env = Environment::new();
        assert!(env.define_variable(id(1), Literal::Int(1)));

        env.push_scope();
        assert!(env.define_variable(id(2), Literal::Int(2)));
        assert!(env.contains(id(2), SearchRange::Globally));
        env.pop_scope();

        assert!(env.contains(id(1), SearchRange::Globally));
        assert!(!env.contains(id(2), SearchRange::Globally));
    }

    #[test]
    fn shadowing_is_allowed_in_inner_scopes() {
        let mut env = Environment::new();
        assert!(env.define_variable(id(1), Literal::Int(1)));

        env.push_scope();
        assert!(env.define_variable(id(1), Literal::Int(2)));
        assert_eq!(env.look_up(id(1)), Some(&Literal::Int(2)));
        env.pop_scope();

        assert_eq!(env.look_up(id(1)), Some(&Literal::Int(1)));
    }

    #[test]
    fn same_scope_redeclaration_is_rejected() {
        let mut env = Environment::new();
        assert!(env.define_variable(id(1), Literal::Int(1)));
        assert!(!env.define_variable(id(1), Literal::Int(2)));
        assert!(!env.define_constant(id(1), Literal::Int(3)));
        assert_eq!(env.look_up(id(1)), Some(&Literal::Int(1)));
    }

    #[test]
    fn assignment_respects_mutability() {
        let mut env = Environment::new();
        assert!(env.define_variable(id(1), Literal::Int(1)));
        assert!(env.define_constant(id(2), Literal::Num(3.14)));

        assert_eq!(env.assign(id(1), Literal::Int(5)), AssignStatus::Ok);
        assert_eq!(env.assign(id(2), Literal::Int(3)), AssignStatus::Constant);
        assert_eq!(env.assign(id(9), Literal::Null), AssignStatus::NotFound);

        assert_eq!(env.look_up(id(1)), Some(&Literal::Int(5)));
        assert_eq!(env.look_up(id(2)), Some(&Literal::Num(3.14)));
    }

    #[test]
    fn assignment_targets_the_innermost_binding() {
        let mut env = Environment::new();
        assert!(env.define_variable(id(1), Literal::Int(1)));
        env.push_scope();
        assert!(env.define_variable(id(1), Literal::Int(2)));

        assert_eq!(env.assign(id(1), Literal::Int(20)), AssignStatus::Ok);
        env.pop_scope();
        assert_eq!(env.look_up(id(1)), Some(&Literal::Int(1)));
    }

    #[test]
    fn functions_register_as_constant_addresses() {
        use crate::function::NativeFn;
        use std::io::Write;

        fn nop(_: &mut dyn Write, _: &[Literal]) -> Literal {
            Literal::Null
        }

        let mut env = Environment::new();
        let native = Function::Native(NativeFn {
            name: "nop",
            arity: Some(0),
            func: nop,
        });
        assert!(env.register_function(id(1), native));

        assert_eq!(env.look_up(id(1)), Some(&Literal::Int(0)));
        assert_eq!(env.assign(id(1), Literal::Int(9)), AssignStatus::Constant);
        assert!(env.function_at(0).is_some());
        assert!(env.function_at(1).is_none());
    }
}
