use lox::{interpret, ExitCode};

fn run(source: &str) -> (String, ExitCode) {
    let mut out = Vec::new();
    let code = interpret("script.lox", source, &mut out);
    (String::from_utf8(out).expect("output is utf-8"), code)
}

#[test]
fn recursive_factorial() {
    let source =
        "fun fact(n) { if (n <= 1) { return 1; } return n * fact(n - 1); } println(fact(5));";
    let (out, code) = run(source);
    assert_eq!(out, "120\n");
    assert_eq!(code, ExitCode::Ok);
}

#[test]
fn arguments_bind_in_order() {
    let source = r#"
        fun describe(name, value) {
            println(name + ": " + value);
        }
        describe("answer", "42");
    "#;
    let (out, code) = run(source);
    assert_eq!(out, "answer: 42\n");
    assert_eq!(code, ExitCode::Ok);
}

#[test]
fn function_without_return_yields_null() {
    let (out, code) = run("fun quiet() { } println(quiet());");
    assert_eq!(out, "null\n");
    assert_eq!(code, ExitCode::Ok);
}

#[test]
fn bare_return_yields_null() {
    let (out, code) = run("fun quiet() { return; } println(quiet());");
    assert_eq!(out, "null\n");
    assert_eq!(code, ExitCode::Ok);
}

#[test]
fn return_skips_the_rest_of_the_body() {
    let source = r#"
        fun pick(flag) {
            if (flag) { return "early"; }
            println("late path");
            return "late";
        }
        println(pick(true));
    "#;
    let (out, code) = run(source);
    assert_eq!(out, "early\n");
    assert_eq!(code, ExitCode::Ok);
}

#[test]
fn arity_mismatch_ends_the_enclosing_statement() {
    let source = r#"
        fun add(a, b) { return a + b; }
        println(add(1));
        println("after");
    "#;
    let (out, code) = run(source);
    assert!(out.starts_with("after\n"), "unexpected output: {out}");
    assert!(out.contains("#0210"), "unexpected output: {out}");
    assert_eq!(code, ExitCode::Software);
}

#[test]
fn stack_overflow_is_reported() {
    let (out, code) = run("fun dive(n) { return dive(n + 1); } dive(0);");
    assert!(out.contains("#0211"), "unexpected output: {out}");
    assert_eq!(code, ExitCode::Software);
}

#[test]
fn deep_recursion_under_the_cap_succeeds() {
    let source = r#"
        fun descend(n) {
            if (n <= 0) { return 0; }
            return descend(n - 1);
        }
        println(descend(200));
    "#;
    let (out, code) = run(source);
    assert_eq!(out, "0\n");
    assert_eq!(code, ExitCode::Ok);
}

#[test]
fn calling_a_non_integer_value_fails() {
    let (out, code) = run("var x { 1.5 } x();");
    assert!(out.contains("#0208"), "unexpected output: {out}");
    assert_eq!(code, ExitCode::Software);
}

#[test]
fn calling_a_dangling_address_fails() {
    let (out, code) = run("var x { 99 } x();");
    assert!(out.contains("#0209"), "unexpected output: {out}");
    assert_eq!(code, ExitCode::Software);
}

#[test]
fn function_names_are_constants() {
    let (out, code) = run("fun f() { } f = 1;");
    assert!(out.contains("#0206"), "unexpected output: {out}");
    assert_eq!(code, ExitCode::Software);
}

#[test]
fn parameters_scope_to_the_call() {
    let source = r#"
        fun echo(a) { return a; }
        println(echo(7));
        println(a);
    "#;
    let (out, code) = run(source);
    assert!(out.starts_with("7\n"), "unexpected output: {out}");
    assert!(out.contains("#0204"), "unexpected output: {out}");
    assert_eq!(code, ExitCode::Software);
}

#[test]
fn arguments_evaluate_left_to_right() {
    let source = r#"
        fun second(a, b) { return b; }
        var trace { "" }
        fun mark(label) { trace += label; return label; }
        second(mark("L"), mark("R"));
        println(trace);
    "#;
    let (out, code) = run(source);
    assert_eq!(out, "LR\n");
    assert_eq!(code, ExitCode::Ok);
}

#[test]
fn time_returns_an_integer() {
    let (out, code) = run("println(time() >= 0);");
    assert_eq!(out, "true\n");
    assert_eq!(code, ExitCode::Ok);
}

#[test]
fn time_takes_no_arguments() {
    let (out, code) = run("time(1);");
    assert!(out.contains("#0210"), "unexpected output: {out}");
    assert_eq!(code, ExitCode::Software);
}

#[test]
fn print_is_variadic() {
    let (out, code) = run("print(1, \" \", true, \" \", null); println();");
    assert_eq!(out, "1 true null\n");
    assert_eq!(code, ExitCode::Ok);
}
