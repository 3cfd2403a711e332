//! Parser for Lox
//!
//! Recursive descent over the token stream, emitting nodes into the
//! program's per-kind arenas. Errors use panic-mode recovery: the current
//! declaration is abandoned and tokens are discarded up to the next
//! synchronization point.

use crate::ast::{
    AssignmentExpr, BinaryExpr, BranchStmt, CallExpr, ConstantStmt, ExprHandle, ExprKind,
    ExpressionStmt, FunctionStmt, GroupingExpr, IdentifierExpr, IncDecExpr, LiteralExpr,
    LogicalExpr, LoopStmt, Program, ReturnStmt, ScopeStmt, StmtHandle, UnaryExpr, VariableStmt,
};
use crate::literal::Literal;
use crate::reporter::{ErrorCode, Record, Reporter};
use crate::scanner::ScanOutput;
use crate::token::{Token, TokenKind};

/// Calls accept at most this many arguments.
pub const MAX_CALL_ARGUMENTS: usize = 256;

// The diagnostic is recorded before this is raised; it only signals
// "abandon the current declaration and synchronize".
struct ParseAbort;

type ParseResult<T> = Result<T, ParseAbort>;

/// The parser state
pub struct Parser<'a> {
    tokens: &'a [Token],
    context: &'a ScanOutput,
    errout: &'a mut Reporter,
    current: usize,
    program: Program,
}

impl<'a> Parser<'a> {
    pub fn new(context: &'a ScanOutput, errout: &'a mut Reporter) -> Self {
        Self {
            tokens: &context.tokens,
            context,
            errout,
            current: 0,
            program: Program::new(),
        }
    }

    /// Parse the whole token stream into a program.
    pub fn parse(mut self) -> Program {
        while !self.is_at_end() {
            match self.declaration() {
                Ok(stmt) => self.program.add_statement(stmt),
                Err(ParseAbort) => self.synchronize(),
            }
        }
        self.program
    }

    // ==================== Declarations ====================

    fn declaration(&mut self) -> ParseResult<StmtHandle> {
        if self.match_kind(TokenKind::Var) {
            self.variable_declaration()
        } else if self.match_kind(TokenKind::Const) {
            self.constant_declaration()
        } else if self.match_kind(TokenKind::Fun) {
            self.function_declaration()
        } else {
            self.statement()
        }
    }

    /// `var IDENT ('{' expression? '}')? ';'?`
    fn variable_declaration(&mut self) -> ParseResult<StmtHandle> {
        let name = self.expect_identifier("Expected variable name")?;

        let mut initializer = None;
        if self.match_kind(TokenKind::LeftBrace) {
            if !self.match_kind(TokenKind::RightBrace) {
                initializer = Some(self.expression()?);
                self.expect(
                    TokenKind::RightBrace,
                    "Missed '}' brace during variable initialization",
                    ErrorCode::ParseBrokenSymmetry,
                )?;
            }
        }

        // Skip it if present. No one cares.
        self.match_kind(TokenKind::Semicolon);

        Ok(self.program.add_variable(VariableStmt { name, initializer }))
    }

    /// `const IDENT '{' expression '}' ';'?`. The braces are mandatory;
    /// empty braces initialize to `null` so the node always carries an
    /// initializer.
    fn constant_declaration(&mut self) -> ParseResult<StmtHandle> {
        let name = self.expect_identifier("Expected constant name")?;

        self.expect(
            TokenKind::LeftBrace,
            "Missed initialization braces for constant! Constant has to be initialized",
            ErrorCode::MissingConstInitialization,
        )?;

        let initializer = if self.match_kind(TokenKind::RightBrace) {
            self.program.add_literal(LiteralExpr {
                value: Literal::Null,
            })
        } else {
            let expr = self.expression()?;
            self.expect(
                TokenKind::RightBrace,
                "Missed '}' brace during constant initialization",
                ErrorCode::ParseBrokenSymmetry,
            )?;
            expr
        };

        self.match_kind(TokenKind::Semicolon);

        Ok(self.program.add_constant(ConstantStmt { name, initializer }))
    }

    /// `fun IDENT '(' params? ')' block`
    fn function_declaration(&mut self) -> ParseResult<StmtHandle> {
        let name = self.expect_identifier("Expected function name")?;

        self.expect(
            TokenKind::LeftParen,
            "Expected '(' after function name",
            ErrorCode::UnexpectedToken,
        )?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                params.push(self.expect_identifier("Expected parameter name")?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(
            TokenKind::RightParen,
            "Expected ')' after parameters",
            ErrorCode::ParseBrokenSymmetry,
        )?;

        let body = self.expect_block("Expected '{' before function body")?;

        Ok(self.program.add_function(FunctionStmt { name, params, body }))
    }

    // ==================== Statements ====================

    fn statement(&mut self) -> ParseResult<StmtHandle> {
        if self.match_kind(TokenKind::If) {
            self.if_statement()
        } else if self.match_kind(TokenKind::While) {
            self.while_statement()
        } else if self.match_kind(TokenKind::For) {
            self.for_statement()
        } else if self.match_kind(TokenKind::Return) {
            self.return_statement()
        } else if self.match_kind(TokenKind::LeftBrace) {
            self.scope_statement()
        } else {
            self.expression_statement()
        }
    }

    /// `if '(' declaration? expression ')' block ('else' block)?`
    ///
    /// A declaration inside the parens scopes to the whole statement, so
    /// the branch gets wrapped in a synthesized scope when one is present.
    fn if_statement(&mut self) -> ParseResult<StmtHandle> {
        self.expect(
            TokenKind::LeftParen,
            "Expected '(' after 'if'",
            ErrorCode::UnexpectedToken,
        )?;

        let init = self.paren_declaration()?;
        let condition = self.expression()?;
        self.expect(
            TokenKind::RightParen,
            "Expected ')' after condition",
            ErrorCode::ParseBrokenSymmetry,
        )?;

        let then_branch = self.expect_block("Expected '{' after if condition")?;
        let else_branch = if self.match_kind(TokenKind::Else) {
            Some(self.expect_block("Expected '{' after else")?)
        } else {
            None
        };

        let branch = self.program.add_branch(BranchStmt {
            condition,
            then_branch,
            else_branch,
        });

        Ok(self.wrap_with_init(init, branch))
    }

    /// `while '(' declaration? expression ')' block`
    fn while_statement(&mut self) -> ParseResult<StmtHandle> {
        self.expect(
            TokenKind::LeftParen,
            "Expected '(' after 'while'",
            ErrorCode::UnexpectedToken,
        )?;

        let init = self.paren_declaration()?;
        let condition = self.expression()?;
        self.expect(
            TokenKind::RightParen,
            "Expected ')' after condition",
            ErrorCode::ParseBrokenSymmetry,
        )?;

        let body = self.expect_block("Expected '{' after while condition")?;
        let loop_stmt = self.program.add_loop(LoopStmt {
            condition,
            body: Some(body),
        });

        Ok(self.wrap_with_init(init, loop_stmt))
    }

    /// `for '(' (declaration | exprStmt | ';') expression? ';' expression? ')' block`
    ///
    /// Lowers to `scope { init?; loop(cond, scope { body; step?; }) }`; a
    /// missing condition becomes the literal `true`.
    fn for_statement(&mut self) -> ParseResult<StmtHandle> {
        self.expect(
            TokenKind::LeftParen,
            "Expected '(' after 'for'",
            ErrorCode::UnexpectedToken,
        )?;

        let init = if self.match_kind(TokenKind::Semicolon) {
            None
        } else {
            Some(self.declaration()?)
        };

        let condition = if self.check(TokenKind::Semicolon) {
            self.program.add_literal(LiteralExpr {
                value: Literal::Bool(true),
            })
        } else {
            self.expression()?
        };
        self.expect(
            TokenKind::Semicolon,
            "Expected ';' after loop condition",
            ErrorCode::MissingEndOfStatement,
        )?;

        let step = if self.check(TokenKind::RightParen) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect(
            TokenKind::RightParen,
            "Expected ')' after for clauses",
            ErrorCode::ParseBrokenSymmetry,
        )?;

        let body = self.expect_block("Expected '{' after for clauses")?;

        let mut inner = vec![body];
        if let Some(step) = step {
            inner.push(self.program.add_expression(ExpressionStmt { expr: step }));
        }
        let inner_scope = self.program.add_scope(ScopeStmt { body: inner });

        let loop_stmt = self.program.add_loop(LoopStmt {
            condition,
            body: Some(inner_scope),
        });

        let mut outer = Vec::new();
        if let Some(init) = init {
            outer.push(init);
        }
        outer.push(loop_stmt);
        Ok(self.program.add_scope(ScopeStmt { body: outer }))
    }

    /// `return expression? ';'`
    fn return_statement(&mut self) -> ParseResult<StmtHandle> {
        let keyword = self.previous();

        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect(
            TokenKind::Semicolon,
            "Expected ';' after return value",
            ErrorCode::MissingEndOfStatement,
        )?;

        Ok(self.program.add_return(ReturnStmt { keyword, value }))
    }

    /// `'{' declaration* '}'`, with the opening brace already consumed.
    /// A failed declaration only abandons itself; the rest of the block
    /// still parses.
    fn scope_statement(&mut self) -> ParseResult<StmtHandle> {
        let mut body = Vec::new();

        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            match self.declaration() {
                Ok(stmt) => body.push(stmt),
                Err(ParseAbort) => self.synchronize(),
            }
        }

        self.expect(
            TokenKind::RightBrace,
            "Expected '}' after block",
            ErrorCode::ParseBrokenSymmetry,
        )?;

        Ok(self.program.add_scope(ScopeStmt { body }))
    }

    /// `expression ';'`
    fn expression_statement(&mut self) -> ParseResult<StmtHandle> {
        let expr = self.expression()?;
        self.expect(
            TokenKind::Semicolon,
            "Expected ';' after statement",
            ErrorCode::MissingEndOfStatement,
        )?;
        Ok(self.program.add_expression(ExpressionStmt { expr }))
    }

    // An optional `var`/`const`/`fun` declaration at the head of an
    // `if`/`while` parenthesis.
    fn paren_declaration(&mut self) -> ParseResult<Option<StmtHandle>> {
        if self.check(TokenKind::Var) || self.check(TokenKind::Const) || self.check(TokenKind::Fun)
        {
            return Ok(Some(self.declaration()?));
        }
        Ok(None)
    }

    // Wraps `stmt` into `scope { init; stmt }` when a paren declaration
    // was present.
    fn wrap_with_init(&mut self, init: Option<StmtHandle>, stmt: StmtHandle) -> StmtHandle {
        match init {
            Some(init) => self.program.add_scope(ScopeStmt {
                body: vec![init, stmt],
            }),
            None => stmt,
        }
    }

    fn expect_block(&mut self, message: &str) -> ParseResult<StmtHandle> {
        self.expect(TokenKind::LeftBrace, message, ErrorCode::UnexpectedToken)?;
        self.scope_statement()
    }

    // ==================== Expressions ====================

    fn expression(&mut self) -> ParseResult<ExprHandle> {
        self.incdec()
    }

    /// `('++' | '--') logical_or | assignment`. The operand must be an
    /// identifier.
    fn incdec(&mut self) -> ParseResult<ExprHandle> {
        if self.match_kind(TokenKind::Increment) || self.match_kind(TokenKind::Decrement) {
            let op = self.previous();
            let operand = self.logical_or()?;

            if operand.kind != ExprKind::Identifier {
                self.error(
                    "Increment and decrement require a variable",
                    ErrorCode::LvalueAssignment,
                    &op,
                );
                return Ok(operand);
            }

            let target = self.program.identifier(operand).name;
            return Ok(self.program.add_incdec(IncDecExpr { target, op }));
        }

        self.assignment()
    }

    /// Right-associative assignment; compound forms desugar to
    /// `name = name <op> value` reusing the binary node.
    fn assignment(&mut self) -> ParseResult<ExprHandle> {
        let expr = self.logical_or()?;

        let compound = match self.peek().kind {
            TokenKind::Equal => None,
            TokenKind::PlusEqual => Some(TokenKind::Plus),
            TokenKind::MinusEqual => Some(TokenKind::Minus),
            TokenKind::StarEqual => Some(TokenKind::Star),
            TokenKind::SlashEqual => Some(TokenKind::Slash),
            _ => return Ok(expr),
        };

        let op = self.advance();
        let value = self.assignment()?;

        if expr.kind != ExprKind::Identifier {
            self.error("Invalid assignment target", ErrorCode::LvalueAssignment, &op);
            return Ok(expr);
        }

        let target = self.program.identifier(expr).name;
        let value = match compound {
            None => value,
            Some(kind) => {
                let mut desugared_op = op;
                desugared_op.kind = kind;
                let left = self.program.add_identifier(IdentifierExpr { name: target });
                self.program.add_binary(BinaryExpr {
                    op: desugared_op,
                    left,
                    right: value,
                })
            }
        };

        Ok(self.program.add_assignment(AssignmentExpr { target, value }))
    }

    fn logical_or(&mut self) -> ParseResult<ExprHandle> {
        let left = self.logical_and()?;

        if self.match_kind(TokenKind::Or) {
            let op = self.previous();
            let right = self.logical_and()?;
            return Ok(self.program.add_logical(LogicalExpr { op, left, right }));
        }

        Ok(left)
    }

    fn logical_and(&mut self) -> ParseResult<ExprHandle> {
        let left = self.equality()?;

        if self.match_kind(TokenKind::And) {
            let op = self.previous();
            let right = self.equality()?;
            return Ok(self.program.add_logical(LogicalExpr { op, left, right }));
        }

        Ok(left)
    }

    fn equality(&mut self) -> ParseResult<ExprHandle> {
        let mut left = self.comparison()?;

        while self.match_kind(TokenKind::EqualEqual) || self.match_kind(TokenKind::BangEqual) {
            let op = self.previous();
            let right = self.comparison()?;
            left = self.program.add_binary(BinaryExpr { op, left, right });
        }

        Ok(left)
    }

    fn comparison(&mut self) -> ParseResult<ExprHandle> {
        let mut left = self.term()?;

        while self.match_kind(TokenKind::Less)
            || self.match_kind(TokenKind::LessEqual)
            || self.match_kind(TokenKind::Greater)
            || self.match_kind(TokenKind::GreaterEqual)
        {
            let op = self.previous();
            let right = self.term()?;
            left = self.program.add_binary(BinaryExpr { op, left, right });
        }

        Ok(left)
    }

    fn term(&mut self) -> ParseResult<ExprHandle> {
        let mut left = self.factor()?;

        while self.match_kind(TokenKind::Plus) || self.match_kind(TokenKind::Minus) {
            let op = self.previous();
            let right = self.factor()?;
            left = self.program.add_binary(BinaryExpr { op, left, right });
        }

        Ok(left)
    }

    fn factor(&mut self) -> ParseResult<ExprHandle> {
        let mut left = self.unary()?;

        while self.match_kind(TokenKind::Star) || self.match_kind(TokenKind::Slash) {
            let op = self.previous();
            let right = self.unary()?;
            left = self.program.add_binary(BinaryExpr { op, left, right });
        }

        Ok(left)
    }

    fn unary(&mut self) -> ParseResult<ExprHandle> {
        if self.match_kind(TokenKind::Bang) || self.match_kind(TokenKind::Minus) {
            let op = self.previous();
            let operand = self.unary()?;
            return Ok(self.program.add_unary(UnaryExpr { op, operand }));
        }

        self.call()
    }

    fn call(&mut self) -> ParseResult<ExprHandle> {
        let mut expr = self.primary()?;

        while self.match_kind(TokenKind::LeftParen) {
            expr = self.finish_call(expr)?;
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: ExprHandle) -> ParseResult<ExprHandle> {
        let mut args = Vec::new();

        if !self.check(TokenKind::RightParen) {
            loop {
                if args.len() == MAX_CALL_ARGUMENTS {
                    let paren = self.peek();
                    self.error(
                        format!("A call takes at most {MAX_CALL_ARGUMENTS} arguments"),
                        ErrorCode::TooManyArguments,
                        &paren,
                    );
                }
                args.push(self.expression()?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }

        let paren = self.expect(
            TokenKind::RightParen,
            "Expected ')' after arguments",
            ErrorCode::ParseBrokenSymmetry,
        )?;

        Ok(self.program.add_call(CallExpr {
            callee,
            paren,
            args,
        }))
    }

    fn primary(&mut self) -> ParseResult<ExprHandle> {
        let token = self.peek();

        match token.kind {
            TokenKind::String | TokenKind::Number | TokenKind::Boolean | TokenKind::Null => {
                self.advance();
                let Some(value) = self.context.literals.get(token.literal) else {
                    self.error(
                        format!(
                            "Missing literal #{} of the \"{}\" token!",
                            token.literal.0, token.kind
                        ),
                        ErrorCode::MissingLiteral,
                        &token,
                    );
                    return Err(ParseAbort);
                };
                Ok(self.program.add_literal(LiteralExpr {
                    value: value.clone(),
                }))
            }
            TokenKind::Identifier => {
                self.advance();
                Ok(self.program.add_identifier(IdentifierExpr { name: token }))
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.expression()?;
                self.expect(
                    TokenKind::RightParen,
                    "Expected ')' after expression",
                    ErrorCode::ParseBrokenSymmetry,
                )?;
                Ok(self.program.add_grouping(GroupingExpr { inner }))
            }
            _ => {
                self.error("Unexpected token!", ErrorCode::UnexpectedToken, &token);
                Err(ParseAbort)
            }
        }
    }

    // ==================== Helpers ====================

    /// Discard tokens until the next synchronization point. A `;` or `}`
    /// is consumed; a keyword that can start a declaration is left for the
    /// caller.
    fn synchronize(&mut self) {
        while !self.is_at_end() {
            match self.peek().kind {
                TokenKind::Semicolon | TokenKind::RightBrace => {
                    self.advance();
                    return;
                }
                TokenKind::Class
                | TokenKind::Fun
                | TokenKind::Var
                | TokenKind::Const
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Return => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn peek(&self) -> Token {
        self.tokens[self.current]
    }

    fn previous(&self) -> Token {
        self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            return true;
        }
        false
    }

    fn expect(&mut self, kind: TokenKind, message: &str, code: ErrorCode) -> ParseResult<Token> {
        if self.check(kind) {
            return Ok(self.advance());
        }

        let token = self.peek();
        self.error(message, code, &token);
        Err(ParseAbort)
    }

    fn expect_identifier(&mut self, message: &str) -> ParseResult<Token> {
        self.expect(TokenKind::Identifier, message, ErrorCode::UnexpectedToken)
    }

    fn error(&mut self, message: impl Into<String>, code: ErrorCode, token: &Token) {
        self.errout.report(message, Record::at_token(code, token));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::StmtKind;
    use crate::scanner::Scanner;

    fn parse(source: &str) -> (Program, Reporter) {
        let mut errout = Reporter::new("test.lox", source);
        let scanned = Scanner::new(source).scan(&mut errout);
        let program = Parser::new(&scanned, &mut errout).parse();
        (program, errout)
    }

    #[test]
    fn variable_declaration_shapes() {
        let (program, errout) = parse("var x { 10 } var y { } var z");
        assert!(errout.empty());
        assert_eq!(program.statements.len(), 3);

        let x = program.variable(program.statements[0]);
        assert!(x.initializer.is_some());
        let y = program.variable(program.statements[1]);
        assert!(y.initializer.is_none());
        let z = program.variable(program.statements[2]);
        assert!(z.initializer.is_none());
    }

    #[test]
    fn constant_requires_braces() {
        let (_, errout) = parse("const pi;");
        assert!(!errout.empty());

        let (program, errout) = parse("const pi { 3.14 }");
        assert!(errout.empty());
        assert_eq!(program.statements[0].kind, StmtKind::Constant);
    }

    #[test]
    fn empty_constant_braces_initialize_to_null() {
        let (program, errout) = parse("const nothing { }");
        assert!(errout.empty());
        let constant = program.constant(program.statements[0]);
        assert_eq!(constant.initializer.kind, ExprKind::Literal);
        assert_eq!(
            program.literal(constant.initializer).value,
            Literal::Null
        );
    }

    #[test]
    fn precedence_builds_the_expected_tree() {
        let (program, errout) = parse("println(1 + 2 * 3);");
        assert!(errout.empty());

        let stmt = program.expression(program.statements[0]);
        let call = program.call(stmt.expr);
        assert_eq!(call.args.len(), 1);

        // 1 + (2 * 3)
        let sum = program.binary(call.args[0]);
        assert_eq!(sum.op.kind, TokenKind::Plus);
        assert_eq!(sum.left.kind, ExprKind::Literal);
        assert_eq!(sum.right.kind, ExprKind::Binary);
        assert_eq!(program.binary(sum.right).op.kind, TokenKind::Star);
    }

    #[test]
    fn compound_assignment_desugars_to_binary() {
        let (program, errout) = parse("n += 2;");
        assert!(errout.empty());

        let stmt = program.expression(program.statements[0]);
        assert_eq!(stmt.expr.kind, ExprKind::Assignment);

        let assignment = program.assignment(stmt.expr);
        assert_eq!(assignment.value.kind, ExprKind::Binary);

        let binary = program.binary(assignment.value);
        assert_eq!(binary.op.kind, TokenKind::Plus);
        assert_eq!(binary.left.kind, ExprKind::Identifier);
    }

    #[test]
    fn incdec_takes_identifiers_only() {
        let (program, errout) = parse("++n;");
        assert!(errout.empty());
        let stmt = program.expression(program.statements[0]);
        assert_eq!(stmt.expr.kind, ExprKind::IncDec);

        let (_, errout) = parse("++5;");
        assert!(!errout.empty());
    }

    #[test]
    fn assignment_to_non_identifier_is_reported() {
        let (_, errout) = parse("1 = 2;");
        assert!(!errout.empty());
    }

    #[test]
    fn for_lowers_to_scoped_loop() {
        let (program, errout) = parse("for (var i { 0 }; i < 5; ++i) { i; }");
        assert!(errout.empty());
        assert_eq!(program.statements.len(), 1);

        // scope { var i; loop(cond, scope { body; step }) }
        let outer = program.scope(program.statements[0]);
        assert_eq!(outer.body.len(), 2);
        assert_eq!(outer.body[0].kind, StmtKind::Variable);
        assert_eq!(outer.body[1].kind, StmtKind::Loop);

        let lowered = program.loop_stmt(outer.body[1]);
        let inner = program.scope(lowered.body.expect("loop body"));
        assert_eq!(inner.body.len(), 2);
        assert_eq!(inner.body[0].kind, StmtKind::Scope);
        assert_eq!(inner.body[1].kind, StmtKind::Expression);
    }

    #[test]
    fn for_without_condition_loops_on_true() {
        let (program, errout) = parse("for (;;) { }");
        assert!(errout.empty());

        let outer = program.scope(program.statements[0]);
        let lowered = program.loop_stmt(outer.body[0]);
        assert_eq!(
            program.literal(lowered.condition).value,
            Literal::Bool(true)
        );
    }

    #[test]
    fn if_with_paren_declaration_gains_a_scope() {
        let (program, errout) = parse("if (var d { 10 } d > 3) { d; }");
        assert!(errout.empty());

        let outer = program.scope(program.statements[0]);
        assert_eq!(outer.body.len(), 2);
        assert_eq!(outer.body[0].kind, StmtKind::Variable);
        assert_eq!(outer.body[1].kind, StmtKind::Branch);
    }

    #[test]
    fn missing_semicolon_is_reported() {
        let (_, errout) = parse("1 + 2");
        assert!(!errout.empty());
    }

    #[test]
    fn panic_mode_recovers_at_the_next_statement() {
        let (program, errout) = parse("var x { 1 } ); println(x);");
        assert!(!errout.empty());
        // The bad declaration is dropped; the println still parses.
        assert!(program
            .statements
            .iter()
            .any(|s| s.kind == StmtKind::Expression));
    }

    #[test]
    fn functions_parse_with_params_and_body() {
        let (program, errout) = parse("fun add(a, b) { return a + b; }");
        assert!(errout.empty());

        let function = program.function(program.statements[0]);
        assert_eq!(function.params.len(), 2);
        assert_eq!(function.body.kind, StmtKind::Scope);
    }

    #[test]
    fn call_argument_cap_is_reported() {
        let mut source = String::from("f(");
        for _ in 0..MAX_CALL_ARGUMENTS {
            source.push_str("1,");
        }
        source.push_str("1);");

        let (program, errout) = parse(&source);
        assert!(!errout.empty());
        // The call still parses with every argument collected.
        let stmt = program.expression(program.statements[0]);
        let call = program.call(stmt.expr);
        assert_eq!(call.args.len(), MAX_CALL_ARGUMENTS + 1);
    }
}
