//! Lox - a small dynamically-typed scripting language
//!
//! The pipeline runs in three phases: a scanner producing tokens with a
//! literal pool and interned lexemes, a recursive-descent parser producing
//! a flat index-addressed syntax tree, and a tree-walking evaluator driven
//! by lexical environments. All phases report into one diagnostics
//! reporter; any recorded error turns the run's exit code into `software`.

use std::io::Write;

pub mod ast;
pub mod builtins;
pub mod environment;
pub mod evaluator;
pub mod exit_code;
pub mod function;
pub mod lexemes;
pub mod literal;
pub mod parser;
pub mod printer;
pub mod reporter;
pub mod scanner;
pub mod token;

pub use evaluator::Evaluator;
pub use exit_code::ExitCode;
pub use literal::Literal;
pub use parser::Parser;
pub use reporter::Reporter;
pub use scanner::Scanner;

/// Version of the Lox interpreter
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run `source` through the whole pipeline, writing program output and
/// diagnostics to `out`.
///
/// Diagnostics are exported and cleared after each phase, under a phase
/// header; execution is attempted even when earlier phases reported, so
/// recovery keeps as much of the program observable as possible.
pub fn interpret(path: &str, source: &str, out: &mut dyn Write) -> ExitCode {
    let mut errout = Reporter::new(path, source);
    let mut had_errors = false;

    let mut scanned = Scanner::new(source).scan(&mut errout);
    had_errors |= flush_diagnostics(&mut errout, "Scan Errors:", out);

    let program = Parser::new(&scanned, &mut errout).parse();
    had_errors |= flush_diagnostics(&mut errout, "Parse Errors:", out);

    let mut env = environment::Environment::new();
    builtins::register(&mut scanned.lexemes, &mut env);

    let clean = {
        let mut evaluator = Evaluator::new(&program, &scanned.lexemes, &mut errout, out, env);
        evaluator.run()
    };
    had_errors |= !clean;
    had_errors |= flush_diagnostics(&mut errout, "Runtime Errors:", out);

    if had_errors {
        ExitCode::Software
    } else {
        ExitCode::Ok
    }
}

fn flush_diagnostics(errout: &mut Reporter, header: &str, out: &mut dyn Write) -> bool {
    if errout.empty() {
        return false;
    }

    let _ = writeln!(out, "{header}");
    errout.export(|message| {
        let _ = writeln!(out, "{message}");
    });
    errout.clear();
    true
}
