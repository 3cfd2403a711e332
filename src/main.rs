//! Lox CLI and REPL
//!
//! Usage:
//!   lox            - Start the interactive prompt
//!   lox <script>   - Execute a Lox script

use std::io;
use std::process;
use std::{env, fs};

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use lox::{interpret, ExitCode, VERSION};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() > 2 {
        let executable = args[0].rsplit(['/', '\\']).next().unwrap_or("lox");
        println!("Usage: {executable} [script]");
        process::exit(ExitCode::Usage.code());
    }

    let code = match args.get(1) {
        Some(path) => run_file(path),
        None => run_prompt(),
    };
    process::exit(code.code());
}

fn run_file(path: &str) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(reason) => {
            eprintln!("{}: cannot read file '{path}': {reason}", "error".red());
            return ExitCode::IoErr;
        }
    };

    let mut out = io::stdout().lock();
    interpret(path, &source, &mut out)
}

/// One line per prompt; every line runs the whole pipeline against a fresh
/// interpreter and reports its own exit code.
fn run_prompt() -> ExitCode {
    println!("Lox {VERSION}");

    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(reason) => {
            eprintln!("{}: cannot start the prompt: {reason}", "error".red());
            return ExitCode::OsErr;
        }
    };

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line.as_str());

                let code = {
                    let mut out = io::stdout().lock();
                    interpret("console", &line, &mut out)
                };
                println!("Result {:X}: {}", code.code(), code.name());
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
            }
            Err(ReadlineError::Eof) => break,
            Err(reason) => {
                eprintln!("{}: {reason}", "error".red());
                break;
            }
        }
    }

    ExitCode::Ok
}
