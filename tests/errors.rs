use lox::{interpret, ExitCode};

fn run(source: &str) -> (String, ExitCode) {
    let mut out = Vec::new();
    let code = interpret("script.lox", source, &mut out);
    (String::from_utf8(out).expect("output is utf-8"), code)
}

#[test]
fn empty_input_reports_no_sources() {
    let (out, code) = run("");
    assert!(out.contains("Scan Errors:"), "unexpected output: {out}");
    assert!(out.contains("#0002"), "unexpected output: {out}");
    assert_eq!(code, ExitCode::Software);
}

#[test]
fn whitespace_only_input_is_empty_too() {
    let (out, code) = run("  \n\t  ");
    assert!(out.contains("#0002"), "unexpected output: {out}");
    assert_eq!(code, ExitCode::Software);
}

#[test]
fn undefined_identifier_in_a_call() {
    let (out, code) = run("println(undefined_name);");
    assert!(out.contains("#0204"), "unexpected output: {out}");
    assert_eq!(code, ExitCode::Software);
}

#[test]
fn diagnostics_carry_location_and_excerpt() {
    let (out, _) = run("println(undefined_name);");
    assert!(
        out.contains("script.lox:1:9 > error #0204:"),
        "unexpected output: {out}"
    );
    assert!(
        out.contains("| println(undefined_name);"),
        "unexpected output: {out}"
    );
}

#[test]
fn unterminated_string_resynchronizes() {
    let (out, code) = run("\"oops; var y { 1 } println(y);");
    // The scanner reports the broken literal, resynchronizes at the `;`,
    // and the parser still runs on the remaining tokens.
    assert!(out.contains("#0004"), "unexpected output: {out}");
    assert!(out.contains("1\n"), "unexpected output: {out}");
    assert_eq!(code, ExitCode::Software);
}

#[test]
fn unexpected_symbol_is_skipped() {
    let (out, code) = run("var x { 1 } @ println(x);");
    assert!(out.contains("Scan Errors:"), "unexpected output: {out}");
    assert!(out.contains("#0003"), "unexpected output: {out}");
    assert!(out.contains("1\n"), "unexpected output: {out}");
    assert_eq!(code, ExitCode::Software);
}

#[test]
fn assignment_to_undefined_name_continues() {
    let (out, code) = run("var a { 1 } b = 2; println(a);");
    assert!(out.starts_with("1\n"), "unexpected output: {out}");
    assert!(out.contains("#0204"), "unexpected output: {out}");
    assert_eq!(code, ExitCode::Software);
}

#[test]
fn same_scope_redeclaration_keeps_the_first_binding() {
    let (out, code) = run("var x { 1 } var x { 2 } println(x);");
    assert!(out.starts_with("1\n"), "unexpected output: {out}");
    assert!(out.contains("#0205"), "unexpected output: {out}");
    assert_eq!(code, ExitCode::Software);
}

#[test]
fn missing_semicolon_drops_the_statement() {
    let (out, code) = run("println(1)");
    assert!(out.contains("Parse Errors:"), "unexpected output: {out}");
    assert!(out.contains("#0101"), "unexpected output: {out}");
    assert_eq!(code, ExitCode::Software);
}

#[test]
fn constant_without_braces_is_rejected() {
    let (out, code) = run("const pi; println(2);");
    assert!(out.contains("#0105"), "unexpected output: {out}");
    assert!(out.contains("2\n"), "unexpected output: {out}");
    assert_eq!(code, ExitCode::Software);
}

#[test]
fn assignment_needs_an_lvalue() {
    let (out, code) = run("1 = 2;");
    assert!(out.contains("#0106"), "unexpected output: {out}");
    assert_eq!(code, ExitCode::Software);
}

#[test]
fn parse_recovery_reaches_later_statements() {
    let (out, code) = run("var x { 1 } ); println(x);");
    assert!(out.contains("Parse Errors:"), "unexpected output: {out}");
    assert!(out.contains("1\n"), "unexpected output: {out}");
    assert_eq!(code, ExitCode::Software);
}

#[test]
fn errors_skip_the_rest_of_the_block() {
    let source = r#"
        var tail { "kept" }
        {
            println(missing);
            tail = "clobbered";
        }
        println(tail);
    "#;
    let (out, code) = run(source);
    assert!(out.starts_with("kept\n"), "unexpected output: {out}");
    assert!(out.contains("#0204"), "unexpected output: {out}");
    assert_eq!(code, ExitCode::Software);
}

#[test]
fn top_level_return_stops_the_program() {
    let (out, code) = run("println(1); return 5; println(2);");
    assert!(out.starts_with("1\n"), "unexpected output: {out}");
    assert!(!out.contains("2\n"), "unexpected output: {out}");
    assert!(out.contains("#0202"), "unexpected output: {out}");
    assert_eq!(code, ExitCode::Software);
}

#[test]
fn runtime_diagnostics_follow_program_output() {
    let (out, code) = run("println(\"shown\"); boom = 1;");
    let shown = out.find("shown\n").expect("program output present");
    let header = out.find("Runtime Errors:").expect("runtime header present");
    assert!(shown < header, "unexpected output: {out}");
    assert_eq!(code, ExitCode::Software);
}

#[test]
fn operands_must_suit_the_operator() {
    let (out, code) = run("println(1 + \"s\");");
    assert!(out.contains("#0201"), "unexpected output: {out}");
    assert_eq!(code, ExitCode::Software);
}

#[test]
fn incdec_requires_an_integer_variable() {
    let (out, code) = run("var x { 1.5 } ++x;");
    assert!(out.contains("#0201"), "unexpected output: {out}");
    assert_eq!(code, ExitCode::Software);

    let (out, code) = run("++ghost;");
    assert!(out.contains("#0204"), "unexpected output: {out}");
    assert_eq!(code, ExitCode::Software);
}

#[test]
fn incdec_on_a_constant_is_rejected() {
    let (out, code) = run("const c { 1 } ++c; println(c);");
    assert!(out.contains("#0206"), "unexpected output: {out}");
    assert!(out.contains("1\n"), "unexpected output: {out}");
    assert_eq!(code, ExitCode::Software);
}

#[test]
fn integer_division_by_zero_is_a_runtime_error() {
    let (out, code) = run("println(1 / 0);");
    assert!(out.contains("#0202"), "unexpected output: {out}");
    assert_eq!(code, ExitCode::Software);
}

#[test]
fn float_division_by_zero_follows_ieee() {
    let (out, code) = run("println(1.0 / 0); println(-1.0 / 0); println(0.0 / 0);");
    assert_eq!(out, "inf\n-inf\nNaN\n");
    assert_eq!(code, ExitCode::Ok);
}

#[test]
fn clean_scripts_exit_ok() {
    let (out, code) = run("println(\"fine\");");
    assert_eq!(out, "fine\n");
    assert_eq!(code, ExitCode::Ok);
}
