//! Scanner for Lox
//!
//! Converts source text into a stream of tokens, a deduplicated literal
//! pool and an interned lexeme database. The scanner reports lexical
//! errors but never aborts: every input produces an `Eof`-terminated
//! token stream.

use crate::lexemes::LexemeDatabase;
use crate::literal::{to_number_literal, Literal, LiteralPool};
use crate::reporter::{ErrorCode, Record, Reporter};
use crate::token::{lookup_keyword, Token, TokenKind};

/// Everything one scan produces.
#[derive(Debug)]
pub struct ScanOutput {
    pub tokens: Vec<Token>,
    pub literals: LiteralPool,
    pub lexemes: LexemeDatabase,
}

/// The scanner state: a single forward pass with a byte cursor.
pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    line: u32,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
        }
    }

    /// Tokenize the entire source.
    pub fn scan(mut self, errout: &mut Reporter) -> ScanOutput {
        let mut out = ScanOutput {
            tokens: Vec::new(),
            literals: LiteralPool::seeded(),
            lexemes: LexemeDatabase::new(),
        };

        if self.source.trim().is_empty() {
            errout.report("No source was given!", Record::bare(ErrorCode::NoSources));
            out.tokens
                .push(Token::new(TokenKind::Eof, self.line, self.pos as u32));
            return out;
        }

        while self.pos < self.source.len() {
            self.skip_whitespace();
            if self.pos >= self.source.len() {
                break;
            }
            self.next_token(&mut out, errout);
        }

        out.tokens
            .push(Token::new(TokenKind::Eof, self.line, self.pos as u32));
        out
    }

    fn next_token(&mut self, out: &mut ScanOutput, errout: &mut Reporter) {
        let byte = self.source.as_bytes()[self.pos];

        match byte {
            b'(' => self.add_token(out, TokenKind::LeftParen, 1),
            b')' => self.add_token(out, TokenKind::RightParen, 1),
            b'{' => self.add_token(out, TokenKind::LeftBrace, 1),
            b'}' => self.add_token(out, TokenKind::RightBrace, 1),
            b',' => self.add_token(out, TokenKind::Comma, 1),
            b';' => self.add_token(out, TokenKind::Semicolon, 1),
            b'.' => self.add_token(out, TokenKind::Dot, 1),

            b'+' => match self.peek_next() {
                Some(b'+') => self.add_token(out, TokenKind::Increment, 2),
                Some(b'=') => self.add_token(out, TokenKind::PlusEqual, 2),
                _ => self.add_token(out, TokenKind::Plus, 1),
            },
            b'-' => match self.peek_next() {
                Some(b'-') => self.add_token(out, TokenKind::Decrement, 2),
                Some(b'=') => self.add_token(out, TokenKind::MinusEqual, 2),
                _ => self.add_token(out, TokenKind::Minus, 1),
            },
            b'*' => match self.peek_next() {
                Some(b'=') => self.add_token(out, TokenKind::StarEqual, 2),
                _ => self.add_token(out, TokenKind::Star, 1),
            },
            b'/' => match self.peek_next() {
                Some(b'/') => self.skip_line_comment(),
                Some(b'*') => self.skip_block_comment(),
                Some(b'=') => self.add_token(out, TokenKind::SlashEqual, 2),
                _ => self.add_token(out, TokenKind::Slash, 1),
            },

            b'!' => self.one_or_two(out, TokenKind::Bang, TokenKind::BangEqual),
            b'=' => self.one_or_two(out, TokenKind::Equal, TokenKind::EqualEqual),
            b'<' => self.one_or_two(out, TokenKind::Less, TokenKind::LessEqual),
            b'>' => self.one_or_two(out, TokenKind::Greater, TokenKind::GreaterEqual),

            b'"' => self.scan_string(out, errout),
            b'0'..=b'9' => self.scan_number(out),
            b'_' => self.scan_identifier(out),
            b if b.is_ascii_alphabetic() => self.scan_identifier(out),

            _ => {
                let Some(symbol) = self.source[self.pos..].chars().next() else {
                    return;
                };
                errout.report(
                    format!("Unexpected symbol '{symbol}'"),
                    Record::at(
                        ErrorCode::UnexpectedSymbol,
                        self.line,
                        self.pos as u32,
                        self.pos as u32 + 1,
                    ),
                );
                // Keep going one symbol later.
                self.pos += symbol.len_utf8();
            }
        }
    }

    fn add_token(&mut self, out: &mut ScanOutput, kind: TokenKind, len: usize) {
        out.tokens
            .push(Token::new(kind, self.line, self.pos as u32));
        self.pos += len;
    }

    fn one_or_two(&mut self, out: &mut ScanOutput, single: TokenKind, with_equal: TokenKind) {
        if self.peek_next() == Some(b'=') {
            self.add_token(out, with_equal, 2);
        } else {
            self.add_token(out, single, 1);
        }
    }

    fn peek_next(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos + 1).copied()
    }

    /// Scan a string literal. May span lines; bytes are taken raw, no
    /// escape decoding. An unterminated literal is reported on its opening
    /// line and the cursor resynchronizes to the next `;`.
    fn scan_string(&mut self, out: &mut ScanOutput, errout: &mut Reporter) {
        let bytes = self.source.as_bytes();
        let start = self.pos;
        let opening_line = self.line;

        let mut cur = start + 1;
        let mut newlines = 0u32;
        while cur < bytes.len() && bytes[cur] != b'"' {
            newlines += u32::from(bytes[cur] == b'\n');
            cur += 1;
        }

        if cur == bytes.len() {
            errout.report(
                r#"Unclosed string literal! No '"' was found"#,
                Record::at(
                    ErrorCode::ScanBrokenSymmetry,
                    opening_line,
                    start as u32,
                    start as u32 + 1,
                ),
            );

            let resync = self.source[start + 1..]
                .find(';')
                .map_or(bytes.len(), |offset| start + 1 + offset);
            self.line += self.source[start..resync].matches('\n').count() as u32;
            self.pos = resync;
            return;
        }

        let value = self.source[start + 1..cur].to_string();
        let id = out.literals.insert(Literal::Str(value));
        out.tokens.push(Token::with_literal(
            TokenKind::String,
            opening_line,
            start as u32,
            id,
        ));

        self.line += newlines;
        self.pos = cur + 1;
    }

    /// Scan a number literal: decimal digits with an optional single `.`;
    /// `'` inside digit runs is digit grouping and ignored.
    fn scan_number(&mut self, out: &mut ScanOutput) {
        let bytes = self.source.as_bytes();
        let start = self.pos;

        let is_digit_or_quote = |b: u8| b.is_ascii_digit() || b == b'\'';

        let mut cur = start + 1;
        while cur < bytes.len() && is_digit_or_quote(bytes[cur]) {
            cur += 1;
        }
        if cur < bytes.len() && bytes[cur] == b'.' {
            cur += 1;
            while cur < bytes.len() && is_digit_or_quote(bytes[cur]) {
                cur += 1;
            }
        }

        let id = out
            .literals
            .insert(to_number_literal(&self.source[start..cur]));
        out.tokens.push(Token::with_literal(
            TokenKind::Number,
            self.line,
            start as u32,
            id,
        ));

        self.pos = cur;
    }

    /// Scan an identifier or keyword. `null`, `true` and `false` become
    /// literal-bearing tokens rather than keywords.
    fn scan_identifier(&mut self, out: &mut ScanOutput) {
        let bytes = self.source.as_bytes();
        let start = self.pos;

        let mut cur = start + 1;
        while cur < bytes.len() && (bytes[cur].is_ascii_alphanumeric() || bytes[cur] == b'_') {
            cur += 1;
        }

        let text = &self.source[start..cur];
        let position = start as u32;
        match text {
            "null" => {
                let id = out.literals.insert(Literal::Null);
                out.tokens
                    .push(Token::with_literal(TokenKind::Null, self.line, position, id));
            }
            "true" | "false" => {
                let id = out.literals.insert(Literal::Bool(text == "true"));
                out.tokens.push(Token::with_literal(
                    TokenKind::Boolean,
                    self.line,
                    position,
                    id,
                ));
            }
            _ => {
                if let Some(keyword) = lookup_keyword(text) {
                    out.tokens.push(Token::new(keyword, self.line, position));
                } else {
                    let id = out.lexemes.add(text);
                    out.tokens.push(Token::with_lexeme(
                        TokenKind::Identifier,
                        self.line,
                        position,
                        id,
                    ));
                }
            }
        }

        self.pos = cur;
    }

    fn skip_whitespace(&mut self) {
        let bytes = self.source.as_bytes();
        while self.pos < bytes.len() {
            let byte = bytes[self.pos];
            if !byte.is_ascii_whitespace() {
                break;
            }
            self.line += u32::from(byte == b'\n');
            self.pos += 1;
        }
    }

    // `// ...` to end of line. The newline itself stays for the whitespace
    // skip to count.
    fn skip_line_comment(&mut self) {
        self.pos = self.source[self.pos..]
            .find('\n')
            .map_or(self.source.len(), |offset| self.pos + offset);
    }

    // `/* ... */`, not nested. An unterminated comment runs to end of input.
    fn skip_block_comment(&mut self) {
        let rest = &self.source[self.pos + 2..];
        match rest.find("*/") {
            Some(offset) => {
                self.line += rest[..offset].matches('\n').count() as u32;
                self.pos += 2 + offset + 2;
            }
            None => {
                self.line += rest.matches('\n').count() as u32;
                self.pos = self.source.len();
            }
        }
    }
}
