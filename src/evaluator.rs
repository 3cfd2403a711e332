//! Tree-walking evaluator for Lox
//!
//! Walks the program arenas, maintains the scoped environment and
//! dispatches operators over the literal value model. Non-local control
//! flow uses the `Unwind` channel: `return` carries its payload to the
//! call site, runtime errors unwind to the enclosing block boundary.
//! Every error is also reported to the `Reporter`, and a latch records
//! that execution went wrong even when the program keeps running.

use std::io::Write;

use crate::ast::{
    AssignmentExpr, BinaryExpr, BranchStmt, CallExpr, ConstantStmt, ExprHandle, ExprKind,
    FunctionStmt, IncDecExpr, LogicalExpr, LoopStmt, Program, ReturnStmt, ScopeStmt, StmtHandle,
    StmtKind, UnaryExpr, VariableStmt,
};
use crate::environment::{AssignStatus, Environment};
use crate::function::{DeclaredFn, Function};
use crate::lexemes::LexemeDatabase;
use crate::literal::Literal;
use crate::reporter::{ErrorCode, Record, Reporter};
use crate::token::{Token, TokenKind};

/// Deepest allowed call nesting.
pub const MAX_CALL_DEPTH: usize = 256;

/// Non-local transfer of control out of a nested evaluation.
#[derive(Debug)]
pub enum Unwind {
    /// `return` with its payload, caught at the function call site.
    Return(Literal),
    /// A runtime fault; the diagnostic is already recorded.
    Error,
}

type Exec = Result<(), Unwind>;
type Eval = Result<Literal, Unwind>;

// Numeric operands after promotion.
enum NumPair {
    Ints(i64, i64),
    Nums(f64, f64),
}

fn numeric_pair(lhs: &Literal, rhs: &Literal) -> Option<NumPair> {
    match (lhs, rhs) {
        (Literal::Int(a), Literal::Int(b)) => Some(NumPair::Ints(*a, *b)),
        (Literal::Num(a), Literal::Num(b)) => Some(NumPair::Nums(*a, *b)),
        (Literal::Int(a), Literal::Num(b)) => Some(NumPair::Nums(*a as f64, *b)),
        (Literal::Num(a), Literal::Int(b)) => Some(NumPair::Nums(*a, *b as f64)),
        _ => None,
    }
}

/// The evaluator state
pub struct Evaluator<'a> {
    program: &'a Program,
    lexemes: &'a LexemeDatabase,
    errout: &'a mut Reporter,
    out: &'a mut dyn Write,
    env: Environment,
    call_depth: usize,
    got_runtime_error: bool,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        program: &'a Program,
        lexemes: &'a LexemeDatabase,
        errout: &'a mut Reporter,
        out: &'a mut dyn Write,
        env: Environment,
    ) -> Self {
        Self {
            program,
            lexemes,
            errout,
            out,
            env,
            call_depth: 0,
            got_runtime_error: false,
        }
    }

    /// Execute every top-level statement. A statement that unwinds with an
    /// error is abandoned and execution continues with the next one; a
    /// top-level `return` stops the program. Returns `true` when nothing
    /// went wrong.
    pub fn run(&mut self) -> bool {
        for &stmt in &self.program.statements {
            match self.execute(stmt) {
                Ok(()) => {}
                Err(Unwind::Error) => {}
                Err(Unwind::Return(_)) => {
                    self.error_bare(
                        ErrorCode::RuntimeError,
                        "'return' outside of a function",
                    );
                    break;
                }
            }
        }
        !self.got_runtime_error
    }

    // ==================== Statements ====================

    fn execute(&mut self, stmt: StmtHandle) -> Exec {
        match stmt.kind {
            StmtKind::Expression => {
                self.eval(self.program.expression(stmt).expr)?;
                Ok(())
            }
            StmtKind::Variable => self.execute_variable(self.program.variable(stmt)),
            StmtKind::Constant => self.execute_constant(self.program.constant(stmt)),
            StmtKind::Scope => self.execute_scope(self.program.scope(stmt)),
            StmtKind::Branch => self.execute_branch(self.program.branch(stmt)),
            StmtKind::Loop => self.execute_loop(self.program.loop_stmt(stmt)),
            StmtKind::Function => self.execute_function(self.program.function(stmt)),
            StmtKind::Return => self.execute_return(self.program.return_stmt(stmt)),
        }
    }

    fn execute_variable(&mut self, stmt: &VariableStmt) -> Exec {
        let value = match stmt.initializer {
            Some(initializer) => self.eval(initializer)?,
            None => Literal::Null,
        };

        if !self.env.define_variable(stmt.name.lexeme, value) {
            let name = self.lexemes.get(stmt.name.lexeme).to_string();
            self.error(
                ErrorCode::IdentifierAlreadyExists,
                format!("Variable \"{name}\" is already defined"),
                &stmt.name,
            );
        }
        Ok(())
    }

    fn execute_constant(&mut self, stmt: &ConstantStmt) -> Exec {
        let value = self.eval(stmt.initializer)?;

        if !self.env.define_constant(stmt.name.lexeme, value) {
            let name = self.lexemes.get(stmt.name.lexeme).to_string();
            self.error(
                ErrorCode::IdentifierAlreadyExists,
                format!("Constant \"{name}\" is already defined"),
                &stmt.name,
            );
        }
        Ok(())
    }

    /// Runs the block body in a fresh scope. The scope pops on every exit
    /// path; an unwind skips the remaining statements and keeps going up.
    fn execute_scope(&mut self, stmt: &ScopeStmt) -> Exec {
        self.env.push_scope();

        let mut result = Ok(());
        for &inner in &stmt.body {
            if let Err(unwind) = self.execute(inner) {
                result = Err(unwind);
                break;
            }
        }

        self.env.pop_scope();
        result
    }

    fn execute_branch(&mut self, stmt: &BranchStmt) -> Exec {
        let Ok(condition) = self.eval(stmt.condition) else {
            self.error_bare(
                ErrorCode::ConditionNotLogical,
                "The condition of branch couldn't be converted to boolean type!",
            );
            return Ok(());
        };

        if condition.is_truthy() {
            self.execute(stmt.then_branch)
        } else if let Some(else_branch) = stmt.else_branch {
            self.execute(else_branch)
        } else {
            Ok(())
        }
    }

    fn execute_loop(&mut self, stmt: &LoopStmt) -> Exec {
        loop {
            let Ok(condition) = self.eval(stmt.condition) else {
                self.error_bare(
                    ErrorCode::ConditionNotLogical,
                    "The condition of loop couldn't be converted to boolean type!",
                );
                return Ok(());
            };
            if !condition.is_truthy() {
                return Ok(());
            }

            if let Some(body) = stmt.body {
                self.execute(body)?;
            }
        }
    }

    /// Registers the function and binds its name as a constant holding the
    /// registry address.
    fn execute_function(&mut self, stmt: &FunctionStmt) -> Exec {
        let declared = Function::Declared(DeclaredFn {
            name: stmt.name,
            params: stmt.params.clone(),
            body: stmt.body,
        });

        if !self.env.register_function(stmt.name.lexeme, declared) {
            let name = self.lexemes.get(stmt.name.lexeme).to_string();
            self.error(
                ErrorCode::IdentifierAlreadyExists,
                format!("Function \"{name}\" is already defined"),
                &stmt.name,
            );
        }
        Ok(())
    }

    fn execute_return(&mut self, stmt: &ReturnStmt) -> Exec {
        let value = match stmt.value {
            Some(value) => self.eval(value)?,
            None => Literal::Null,
        };
        Err(Unwind::Return(value))
    }

    // ==================== Expressions ====================

    fn eval(&mut self, expr: ExprHandle) -> Eval {
        match expr.kind {
            ExprKind::Literal => Ok(self.program.literal(expr).value.clone()),
            ExprKind::Identifier => {
                let name = self.program.identifier(expr).name;
                self.eval_identifier(&name)
            }
            ExprKind::Grouping => self.eval(self.program.grouping(expr).inner),
            ExprKind::Unary => self.eval_unary(self.program.unary(expr)),
            ExprKind::Binary => self.eval_binary(self.program.binary(expr)),
            ExprKind::Logical => self.eval_logical(self.program.logical(expr)),
            ExprKind::Assignment => self.eval_assignment(self.program.assignment(expr)),
            ExprKind::IncDec => self.eval_incdec(self.program.incdec(expr)),
            ExprKind::Call => self.eval_call(self.program.call(expr)),
        }
    }

    fn eval_identifier(&mut self, name: &Token) -> Eval {
        if let Some(value) = self.env.look_up(name.lexeme) {
            return Ok(value.clone());
        }

        let text = self.lexemes.get(name.lexeme).to_string();
        Err(self.error(
            ErrorCode::UndefinedIdentifier,
            format!("Undefined identifier \"{text}\""),
            name,
        ))
    }

    fn eval_unary(&mut self, unary: &UnaryExpr) -> Eval {
        let value = self.eval(unary.operand)?;

        match unary.op.kind {
            TokenKind::Bang => Ok(Literal::Bool(!value.is_truthy())),
            TokenKind::Minus => match value {
                Literal::Int(i) => Ok(Literal::Int(i.wrapping_neg())),
                Literal::Num(n) => Ok(Literal::Num(-n)),
                other => Err(self.error_no_suitable_unary(&unary.op, &other)),
            },
            TokenKind::Plus => {
                if value.is_numeric() {
                    Ok(value)
                } else {
                    Err(self.error_no_suitable_unary(&unary.op, &value))
                }
            }
            _ => Err(self.error(
                ErrorCode::RuntimeError,
                format!("Unknown unary operation '{}'", unary.op.kind),
                &unary.op,
            )),
        }
    }

    fn eval_binary(&mut self, binary: &BinaryExpr) -> Eval {
        let lhs = self.eval(binary.left)?;
        let rhs = self.eval(binary.right)?;

        match binary.op.kind {
            TokenKind::Plus | TokenKind::Minus | TokenKind::Star | TokenKind::Slash => {
                self.arithmetic(&binary.op, lhs, rhs)
            }
            TokenKind::EqualEqual | TokenKind::BangEqual => self.equality(&binary.op, lhs, rhs),
            TokenKind::Less | TokenKind::LessEqual | TokenKind::Greater | TokenKind::GreaterEqual => {
                self.ordering(&binary.op, lhs, rhs)
            }
            _ => Err(self.error(
                ErrorCode::RuntimeError,
                format!("Unknown operation '{}'", binary.op.kind),
                &binary.op,
            )),
        }
    }

    /// `+ - * /` with numeric promotion; integer arithmetic wraps around;
    /// `+` over two strings concatenates.
    fn arithmetic(&mut self, op: &Token, lhs: Literal, rhs: Literal) -> Eval {
        match numeric_pair(&lhs, &rhs) {
            Some(NumPair::Ints(a, b)) => match op.kind {
                TokenKind::Plus => Ok(Literal::Int(a.wrapping_add(b))),
                TokenKind::Minus => Ok(Literal::Int(a.wrapping_sub(b))),
                TokenKind::Star => Ok(Literal::Int(a.wrapping_mul(b))),
                _ => {
                    if b == 0 {
                        return Err(self.error(
                            ErrorCode::RuntimeError,
                            "Division by zero",
                            op,
                        ));
                    }
                    Ok(Literal::Int(a.wrapping_div(b)))
                }
            },
            Some(NumPair::Nums(a, b)) => Ok(Literal::Num(match op.kind {
                TokenKind::Plus => a + b,
                TokenKind::Minus => a - b,
                TokenKind::Star => a * b,
                _ => a / b,
            })),
            None => match (op.kind, lhs, rhs) {
                (TokenKind::Plus, Literal::Str(a), Literal::Str(b)) => Ok(Literal::Str(a + &b)),
                (_, lhs, rhs) => Err(self.error_no_suitable(op, &lhs, &rhs)),
            },
        }
    }

    /// `== !=` over any matching type pair, or numerics after promotion.
    fn equality(&mut self, op: &Token, lhs: Literal, rhs: Literal) -> Eval {
        let equal = match numeric_pair(&lhs, &rhs) {
            Some(NumPair::Ints(a, b)) => a == b,
            Some(NumPair::Nums(a, b)) => a == b,
            None => {
                if std::mem::discriminant(&lhs) != std::mem::discriminant(&rhs) {
                    return Err(self.error_no_suitable(op, &lhs, &rhs));
                }
                lhs == rhs
            }
        };

        Ok(Literal::Bool(match op.kind {
            TokenKind::EqualEqual => equal,
            _ => !equal,
        }))
    }

    /// `< <= > >=` over numerics after promotion, or two strings compared
    /// lexicographically over raw bytes.
    fn ordering(&mut self, op: &Token, lhs: Literal, rhs: Literal) -> Eval {
        let holds = match numeric_pair(&lhs, &rhs) {
            Some(NumPair::Ints(a, b)) => Self::compare(op.kind, &a, &b),
            Some(NumPair::Nums(a, b)) => Self::compare(op.kind, &a, &b),
            None => match (&lhs, &rhs) {
                (Literal::Str(a), Literal::Str(b)) => {
                    Self::compare(op.kind, a.as_bytes(), b.as_bytes())
                }
                _ => return Err(self.error_no_suitable(op, &lhs, &rhs)),
            },
        };
        Ok(Literal::Bool(holds))
    }

    fn compare<T: PartialOrd + ?Sized>(op: TokenKind, a: &T, b: &T) -> bool {
        match op {
            TokenKind::Less => a < b,
            TokenKind::LessEqual => a <= b,
            TokenKind::Greater => a > b,
            _ => a >= b,
        }
    }

    /// Short-circuiting `and` / `or`. The result is the last evaluated
    /// operand, not a coerced boolean.
    fn eval_logical(&mut self, logical: &LogicalExpr) -> Eval {
        let lhs = self.eval(logical.left)?;

        let decided = match logical.op.kind {
            TokenKind::Or => lhs.is_truthy(),
            _ => !lhs.is_truthy(),
        };
        if decided {
            return Ok(lhs);
        }

        self.eval(logical.right)
    }

    /// `x = e` evaluates `e`, writes to `x` and yields the written value.
    fn eval_assignment(&mut self, assignment: &AssignmentExpr) -> Eval {
        let value = self.eval(assignment.value)?;
        self.assign(&assignment.target, value.clone())?;
        Ok(value)
    }

    /// `++x` / `--x` over an existing integer variable; the result is the
    /// new value.
    fn eval_incdec(&mut self, incdec: &IncDecExpr) -> Eval {
        let Some(current) = self.env.look_up(incdec.target.lexeme) else {
            let text = self.lexemes.get(incdec.target.lexeme).to_string();
            return Err(self.error(
                ErrorCode::UndefinedIdentifier,
                format!("Undefined identifier \"{text}\""),
                &incdec.target,
            ));
        };

        let Literal::Int(value) = *current else {
            let current = current.clone();
            return Err(self.error_no_suitable_unary(&incdec.op, &current));
        };

        let next = match incdec.op.kind {
            TokenKind::Increment => value.wrapping_add(1),
            _ => value.wrapping_sub(1),
        };

        self.assign(&incdec.target, Literal::Int(next))?;
        Ok(Literal::Int(next))
    }

    /// Call dispatch: the callee must evaluate to an integer holding a
    /// function-registry address.
    fn eval_call(&mut self, call: &CallExpr) -> Eval {
        let callee = self.eval(call.callee)?;
        let Literal::Int(address) = callee else {
            return Err(self.error(
                ErrorCode::InvalidCallable,
                "Invalid callable expression",
                &call.paren,
            ));
        };

        let function = match usize::try_from(address)
            .ok()
            .and_then(|index| self.env.function_at(index))
        {
            Some(function) => function.clone(),
            None => {
                return Err(self.error(
                    ErrorCode::CallableNotFound,
                    "Cannot find function",
                    &call.paren,
                ))
            }
        };

        if !function.accepts(call.args.len()) {
            let expected = function
                .arity()
                .map_or_else(|| "variadic amount".to_string(), |a| a.to_string());
            return Err(self.error(
                ErrorCode::InvalidArgumentsCount,
                format!(
                    "Invalid count of arguments. Expected {expected}, but got {}",
                    call.args.len()
                ),
                &call.paren,
            ));
        }

        let mut args = Vec::with_capacity(call.args.len());
        for &arg in &call.args {
            args.push(self.eval(arg)?);
        }

        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(self.error(
                ErrorCode::StackOverflow,
                format!("Call depth exceeded {MAX_CALL_DEPTH} frames"),
                &call.paren,
            ));
        }

        self.call_depth += 1;
        self.env.push_scope();

        let result = match &function {
            Function::Native(native) => Ok((native.func)(self.out, &args)),
            Function::Declared(declared) => self.call_declared(declared, args),
        };

        self.env.pop_scope();
        self.call_depth -= 1;
        result
    }

    // Parameters are already bound to a fresh scope by the caller; the
    // `return` unwind is absorbed here, errors keep going up.
    fn call_declared(&mut self, declared: &DeclaredFn, args: Vec<Literal>) -> Eval {
        for (param, arg) in declared.params.iter().zip(args) {
            self.env.define_variable(param.lexeme, arg);
        }

        match self.execute(declared.body) {
            Ok(()) => Ok(Literal::Null),
            Err(Unwind::Return(value)) => Ok(value),
            Err(Unwind::Error) => Err(Unwind::Error),
        }
    }

    // ==================== Error helpers ====================

    fn assign(&mut self, target: &Token, value: Literal) -> Exec {
        match self.env.assign(target.lexeme, value) {
            AssignStatus::Ok => Ok(()),
            AssignStatus::NotFound => {
                let text = self.lexemes.get(target.lexeme).to_string();
                Err(self.error(
                    ErrorCode::UndefinedIdentifier,
                    format!("Undefined variable \"{text}\""),
                    target,
                ))
            }
            AssignStatus::Constant => {
                let text = self.lexemes.get(target.lexeme).to_string();
                Err(self.error(
                    ErrorCode::ConstantAssignment,
                    format!("Attempt to assign \"{text}\" constant"),
                    target,
                ))
            }
        }
    }

    fn error(&mut self, code: ErrorCode, message: impl Into<String>, token: &Token) -> Unwind {
        self.got_runtime_error = true;
        self.errout.report(message, Record::at_token(code, token));
        Unwind::Error
    }

    fn error_bare(&mut self, code: ErrorCode, message: impl Into<String>) -> Unwind {
        self.got_runtime_error = true;
        self.errout.report(message, Record::bare(code));
        Unwind::Error
    }

    fn error_no_suitable_unary(&mut self, op: &Token, value: &Literal) -> Unwind {
        let message = format!(
            "Value '{value}' is not suitable for '{}' unary operation",
            op.kind
        );
        self.error(ErrorCode::LiteralNotSuitable, message, op)
    }

    fn error_no_suitable(&mut self, op: &Token, lhs: &Literal, rhs: &Literal) -> Unwind {
        let message = format!(
            "No operator '{0}' for literals with types: '{1}' and '{2}':\n\t{3} {0} {4}",
            op.kind,
            lhs.type_name(),
            rhs.type_name(),
            lhs,
            rhs
        );
        self.error(ErrorCode::LiteralNotSuitable, message, op)
    }
}
