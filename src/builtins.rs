//! Built-in functions for Lox
//!
//! Host-provided functions registered into the global environment before
//! execution starts.

use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::environment::Environment;
use crate::function::{Function, NativeFn};
use crate::lexemes::LexemeDatabase;
use crate::literal::Literal;

/// Register every built-in; returns how many were registered.
pub fn register(lexemes: &mut LexemeDatabase, env: &mut Environment) -> usize {
    let natives = [
        NativeFn {
            name: "print",
            arity: None,
            func: native_print,
        },
        NativeFn {
            name: "println",
            arity: None,
            func: native_println,
        },
        NativeFn {
            name: "time",
            arity: Some(0),
            func: native_time,
        },
    ];

    let mut registered = 0;
    for native in natives {
        let id = lexemes.add(native.name);
        if env.register_function(id, Function::Native(native)) {
            registered += 1;
        }
    }
    registered
}

/// `print(...)` writes each argument's string form and returns `null`.
fn native_print(out: &mut dyn Write, args: &[Literal]) -> Literal {
    for arg in args {
        let _ = write!(out, "{arg}");
    }
    Literal::Null
}

/// `println(...)` is `print` followed by a line terminator.
fn native_println(out: &mut dyn Write, args: &[Literal]) -> Literal {
    native_print(out, args);
    let _ = writeln!(out);
    Literal::Null
}

/// `time()` returns wall-clock milliseconds as an integer.
fn native_time(_out: &mut dyn Write, _args: &[Literal]) -> Literal {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64);
    Literal::Int(millis)
}
