//! Expression printers
//!
//! Debug helpers that render an expression subtree either as a
//! parenthesized prefix form or in reverse Polish notation. Handy when
//! inspecting what the parser actually built.

use crate::ast::{ExprHandle, ExprKind, Program};
use crate::lexemes::LexemeDatabase;

/// Render an expression as a parenthesized prefix form, e.g.
/// `(* (group (+ 1 2)) 3)`.
pub fn parenthesized(program: &Program, lexemes: &LexemeDatabase, expr: ExprHandle) -> String {
    let mut out = String::new();
    write_prefix(program, lexemes, expr, &mut out);
    out
}

/// Render an expression in reverse Polish notation, e.g. `1 2 + 3 *`.
pub fn rpn(program: &Program, lexemes: &LexemeDatabase, expr: ExprHandle) -> String {
    let mut out = String::new();
    write_rpn(program, lexemes, expr, &mut out);
    out.truncate(out.trim_end().len());
    out
}

fn write_prefix(program: &Program, lexemes: &LexemeDatabase, expr: ExprHandle, out: &mut String) {
    match expr.kind {
        ExprKind::Literal => out.push_str(&program.literal(expr).value.to_string()),
        ExprKind::Identifier => {
            out.push_str(lexemes.get(program.identifier(expr).name.lexeme));
        }
        ExprKind::Grouping => {
            let inner = program.grouping(expr).inner;
            group(program, lexemes, "group", &[inner], out);
        }
        ExprKind::Unary => {
            let unary = program.unary(expr);
            group(program, lexemes, unary.op.kind.text(), &[unary.operand], out);
        }
        ExprKind::Binary => {
            let binary = program.binary(expr);
            group(
                program,
                lexemes,
                binary.op.kind.text(),
                &[binary.left, binary.right],
                out,
            );
        }
        ExprKind::Logical => {
            let logical = program.logical(expr);
            group(
                program,
                lexemes,
                logical.op.kind.text(),
                &[logical.left, logical.right],
                out,
            );
        }
        ExprKind::Assignment => {
            let assignment = program.assignment(expr);
            out.push_str("(= ");
            out.push_str(lexemes.get(assignment.target.lexeme));
            out.push(' ');
            write_prefix(program, lexemes, assignment.value, out);
            out.push(')');
        }
        ExprKind::IncDec => {
            let incdec = program.incdec(expr);
            out.push('(');
            out.push_str(incdec.op.kind.text());
            out.push(' ');
            out.push_str(lexemes.get(incdec.target.lexeme));
            out.push(')');
        }
        ExprKind::Call => {
            let call = program.call(expr);
            out.push_str("(call ");
            write_prefix(program, lexemes, call.callee, out);
            for &arg in &call.args {
                out.push(' ');
                write_prefix(program, lexemes, arg, out);
            }
            out.push(')');
        }
    }
}

fn group(
    program: &Program,
    lexemes: &LexemeDatabase,
    label: &str,
    parts: &[ExprHandle],
    out: &mut String,
) {
    out.push('(');
    out.push_str(label);
    for &part in parts {
        out.push(' ');
        write_prefix(program, lexemes, part, out);
    }
    out.push(')');
}

fn write_rpn(program: &Program, lexemes: &LexemeDatabase, expr: ExprHandle, out: &mut String) {
    match expr.kind {
        ExprKind::Literal => {
            out.push_str(&program.literal(expr).value.to_string());
            out.push(' ');
        }
        ExprKind::Identifier => {
            out.push_str(lexemes.get(program.identifier(expr).name.lexeme));
            out.push(' ');
        }
        ExprKind::Grouping => write_rpn(program, lexemes, program.grouping(expr).inner, out),
        ExprKind::Unary => {
            let unary = program.unary(expr);
            write_rpn(program, lexemes, unary.operand, out);
            out.push_str(unary.op.kind.text());
            out.push(' ');
        }
        ExprKind::Binary => {
            let binary = program.binary(expr);
            write_rpn(program, lexemes, binary.left, out);
            write_rpn(program, lexemes, binary.right, out);
            out.push_str(binary.op.kind.text());
            out.push(' ');
        }
        ExprKind::Logical => {
            let logical = program.logical(expr);
            write_rpn(program, lexemes, logical.left, out);
            write_rpn(program, lexemes, logical.right, out);
            out.push_str(logical.op.kind.text());
            out.push(' ');
        }
        ExprKind::Assignment => {
            let assignment = program.assignment(expr);
            write_rpn(program, lexemes, assignment.value, out);
            out.push_str(lexemes.get(assignment.target.lexeme));
            out.push_str(" = ");
        }
        ExprKind::IncDec => {
            let incdec = program.incdec(expr);
            out.push_str(lexemes.get(incdec.target.lexeme));
            out.push(' ');
            out.push_str(incdec.op.kind.text());
            out.push(' ');
        }
        ExprKind::Call => {
            let call = program.call(expr);
            for &arg in &call.args {
                write_rpn(program, lexemes, arg, out);
            }
            write_rpn(program, lexemes, call.callee, out);
            out.push_str("call ");
        }
    }
}
