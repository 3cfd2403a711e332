//! Diagnostics for Lox
//!
//! All three phases report into one `Reporter`, which accumulates records
//! with source locations and renders them with an excerpt on demand.

use std::collections::HashMap;

use crate::token::Token;

/// Numeric diagnostic codes, grouped by phase: scanner in the single
/// digits, parser in the 100s, evaluator in the 200s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Scanner
    NoSources = 2,
    UnexpectedSymbol = 3,
    ScanBrokenSymmetry = 4,

    // Parser
    MissingEndOfStatement = 101,
    UnexpectedToken = 102,
    ParseBrokenSymmetry = 103,
    MissingLiteral = 104,
    MissingConstInitialization = 105,
    LvalueAssignment = 106,
    TooManyArguments = 107,

    // Evaluator
    LiteralNotSuitable = 201,
    RuntimeError = 202,
    MissingExpression = 203,
    UndefinedIdentifier = 204,
    IdentifierAlreadyExists = 205,
    ConstantAssignment = 206,
    ConditionNotLogical = 207,
    InvalidCallable = 208,
    CallableNotFound = 209,
    InvalidArgumentsCount = 210,
    StackOverflow = 211,
}

impl ErrorCode {
    pub fn value(self) -> u32 {
        self as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn name(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// One diagnostic record. `from`/`to` are byte positions in the source;
/// a record with `line` zero carries no location at all.
#[derive(Debug, Clone, Copy)]
pub struct Record {
    pub code: ErrorCode,
    pub severity: Severity,
    pub line: u32,
    pub from: u32,
    pub to: u32,
}

impl Record {
    /// An error record spanning `from..to` on `line`.
    pub fn at(code: ErrorCode, line: u32, from: u32, to: u32) -> Self {
        Self {
            code,
            severity: Severity::Error,
            line,
            from,
            to,
        }
    }

    /// An error record underlining a token.
    pub fn at_token(code: ErrorCode, token: &Token) -> Self {
        let width = token.kind.text().len() as u32;
        Self::at(code, token.line, token.position, token.position + width)
    }

    /// An error record with no source location.
    pub fn bare(code: ErrorCode) -> Self {
        Self {
            code,
            severity: Severity::Error,
            line: 0,
            from: 0,
            to: 0,
        }
    }
}

// A stored record has its positions already rebased onto the line.
#[derive(Debug, Clone, Copy)]
struct Located {
    code: ErrorCode,
    severity: Severity,
    line: u32,
    column: u32,
    width: u32,
}

/// Accumulates diagnostics for one source file and renders them as
///
/// ```text
/// <path>:<line>:<col> > <severity> #<NNNN>: <message>
/// <line> | <line text>
///        | ^^^^
/// ```
#[derive(Debug)]
pub struct Reporter {
    path: String,
    source: String,
    records: Vec<Located>,
    messages: Vec<String>,
    lines: HashMap<u32, String>,
}

impl Reporter {
    pub fn new(path: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
            records: Vec::new(),
            messages: Vec::new(),
            lines: HashMap::new(),
        }
    }

    /// Record a diagnostic. The source line text is cached at report time so
    /// rendering stays cheap and repeatable.
    pub fn report(&mut self, message: impl Into<String>, record: Record) {
        let located = if record.line == 0 {
            Located {
                code: record.code,
                severity: record.severity,
                line: 0,
                column: 0,
                width: 0,
            }
        } else {
            let line_start = self.line_start(record.from);
            if !self.lines.contains_key(&record.line) {
                let text = self.take_line(line_start);
                self.lines.insert(record.line, text);
            }
            Located {
                code: record.code,
                severity: record.severity,
                line: record.line,
                column: record.from - line_start as u32 + 1,
                width: record.to.saturating_sub(record.from),
            }
        };

        self.records.push(located);
        self.messages.push(message.into());
    }

    pub fn empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.messages.clear();
        self.lines.clear();
    }

    /// Render every record, invoking `sink` once per record.
    pub fn export<F: FnMut(&str)>(&self, mut sink: F) {
        for (record, message) in self.records.iter().zip(&self.messages) {
            sink(&self.render(record, message));
        }
    }

    fn render(&self, record: &Located, message: &str) -> String {
        if record.line == 0 {
            return format!(
                "{} > {} #{:04}: {}",
                self.path,
                record.severity.name(),
                record.code.value(),
                message
            );
        }

        let mut out = format!(
            "{}:{}:{} > {} #{:04}: {}",
            self.path,
            record.line,
            record.column,
            record.severity.name(),
            record.code.value(),
            message
        );

        if let Some(text) = self.lines.get(&record.line) {
            out.push_str(&format!("\n{:>4} | {}", record.line, text));
            if record.width > 0 {
                out.push_str(&format!(
                    "\n     | {}{}",
                    " ".repeat(record.column as usize - 1),
                    "^".repeat(record.width as usize)
                ));
            }
        }
        out
    }

    // Byte offset of the start of the line containing `pos`.
    fn line_start(&self, pos: u32) -> usize {
        let upto = (pos as usize).min(self.source.len());
        match self.source[..upto].rfind('\n') {
            Some(eol) => eol + 1,
            None => 0,
        }
    }

    fn take_line(&self, line_start: usize) -> String {
        let rest = &self.source[line_start..];
        let line_end = rest.find('\n').unwrap_or(rest.len());
        rest[..line_end].to_string()
    }
}
