use super::errors::{ParserError, ParserErrorType, ParserResult};
use super::grammar::{BlockStatement, Expression, FuncInfo, Identifier, Program, Statement};
use super::lexer::Lexer;
use super::operator::{ParserOperator, Precedence, PrefixOperator};
use super::token::{SpannedToken, Token};

use crate::stack::ensure_sufficient_stack;

use std::rc::Rc;
use tracing::{debug, trace};

/// Pratt parser over a token stream with one token of lookahead.
///
/// Parse functions start with `current` on the first token of their construct
/// and return with `current` on its last token.
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    current: SpannedToken,
    peek: SpannedToken,
    errors: Vec<ParserError>,
}

impl<'src> Parser<'src> {
    pub fn new(mut lexer: Lexer<'src>) -> Self {
        let current = lexer.next_token();
        let peek = lexer.next_token();

        Parser {
            lexer,
            current,
            peek,
            errors: vec![],
        }
    }

    /// Errors collected so far. A program parsed with errors must not be
    /// evaluated.
    pub fn errors(&self) -> &[ParserError] {
        &self.errors
    }

    /// Parses the whole input, returning the program only if it is free of
    /// errors.
    pub fn parse(mut self) -> Result<Program, Vec<ParserError>> {
        let program = self.parse_program();

        if self.errors.is_empty() {
            Ok(program)
        } else {
            Err(self.errors)
        }
    }

    /// Parses statements up to the end of input. Statements that fail to parse
    /// are left out of the program and recorded in `errors`.
    pub fn parse_program(&mut self) -> Program {
        let mut statements = vec![];

        while self.current.token != Token::EndOfFile {
            if let Some(stmt) = self.parse_statement_with_recovery() {
                statements.push(stmt);
            }
            self.bump();
        }

        Program { statements }
    }

    /// Advances the stream.
    fn bump(&mut self) {
        self.current = std::mem::replace(&mut self.peek, self.lexer.next_token());
    }

    fn peek_is(&self, t: &Token) -> bool {
        self.peek.token == *t
    }

    /// Advances onto the next token if it is `expected`.
    fn expect_peek(&mut self, expected: Token) -> ParserResult<()> {
        if self.peek_is(&expected) {
            self.bump();
            return Ok(());
        }

        let error = match &self.peek.token {
            Token::Illegal(text) => ParserErrorType::IllegalToken(text.clone()),
            got => ParserErrorType::ExpectedToken {
                expected,
                got: got.clone(),
            },
        };

        Err(ParserError {
            span: self.peek.span,
            error,
        })
    }

    fn error_at_current(&self, error: ParserErrorType) -> ParserError {
        ParserError {
            span: self.current.span,
            error,
        }
    }

    /// True when the last error was reported on the `}` under the cursor.
    /// That brace still closes the enclosing block.
    fn failed_on_current_brace(&self) -> bool {
        self.current.token == Token::RightBrace
            && self.errors.last().map_or(false, |e| e.span == self.current.span)
    }

    /// Skips the rest of a failed statement. Stops on its terminating `;`, or
    /// right before a closing brace so the enclosing block can finish.
    fn synchronize(&mut self) {
        if self.failed_on_current_brace() {
            return;
        }

        while !matches!(self.current.token, Token::Semicolon | Token::EndOfFile)
            && !matches!(self.peek.token, Token::RightBrace | Token::EndOfFile)
        {
            self.bump();
        }
    }

    fn parse_statement_with_recovery(&mut self) -> Option<Statement> {
        match self.parse_statement() {
            Ok(stmt) => Some(stmt),
            Err(err) => {
                debug!(error = %err, "recovering from parse error");
                self.errors.push(err);
                self.synchronize();
                None
            }
        }
    }

    fn parse_statement(&mut self) -> ParserResult<Statement> {
        trace!(token = %self.current.token, "parsing statement");

        match self.current.token {
            Token::Let => self.parse_let_statement(),
            Token::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> ParserResult<Statement> {
        self.bump();
        let name = self.parse_identifier()?;
        self.expect_peek(Token::Equals)?;
        self.bump();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(Token::Semicolon)?;

        Ok(Statement::Let { name, value })
    }

    fn parse_return_statement(&mut self) -> ParserResult<Statement> {
        self.bump();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(Token::Semicolon)?;

        Ok(Statement::Return { value })
    }

    fn parse_expression_statement(&mut self) -> ParserResult<Statement> {
        let expr = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(&Token::Semicolon) {
            self.bump();
        }

        Ok(Statement::Expression { expr })
    }

    /// Reads statements up to the closing brace. `current` must be on the
    /// opening brace.
    fn parse_block(&mut self) -> ParserResult<BlockStatement> {
        let mut statements = vec![];
        self.bump();

        while !matches!(self.current.token, Token::RightBrace | Token::EndOfFile) {
            match self.parse_statement_with_recovery() {
                Some(stmt) => statements.push(stmt),
                None if self.failed_on_current_brace() => break,
                None => {}
            }
            self.bump();
        }

        if self.current.token == Token::EndOfFile {
            return Err(self.error_at_current(ParserErrorType::UnclosedBlock));
        }

        Ok(BlockStatement { statements })
    }

    /// Pratt parsing algo.
    pub fn parse_expression(&mut self, min_precedence: Precedence) -> ParserResult<Expression> {
        ensure_sufficient_stack(|| self.parse_expression_inner(min_precedence))
    }

    fn parse_expression_inner(&mut self, min_precedence: Precedence) -> ParserResult<Expression> {
        let mut lhs = self.parse_prefix()?;

        while !self.peek_is(&Token::Semicolon) {
            let op = match ParserOperator::from_token(&self.peek.token) {
                Some(op) if op.is_higher_precedence(min_precedence) => op,
                _ => break,
            };

            self.bump();

            lhs = match op {
                ParserOperator::Infix(op) => {
                    self.bump();
                    let rhs = self.parse_expression(op.precedence())?;
                    Expression::infix(op, lhs, rhs)
                }
                ParserOperator::Call => self.parse_call(lhs)?,
                ParserOperator::Index => self.parse_index(lhs)?,
            };
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> ParserResult<Expression> {
        let expr = match &self.current.token {
            // Literals
            Token::Int(value) => Expression::IntegerLiteral(*value),
            Token::String(value) => Expression::StringLiteral(value.clone()),
            Token::True => Expression::Boolean(true),
            Token::False => Expression::Boolean(false),
            Token::Identifier(name) => Expression::identifier(name),

            // Grouping
            Token::LeftParen => {
                self.bump();
                let expr = self.parse_expression(Precedence::Lowest)?;
                self.expect_peek(Token::RightParen)?;
                expr
            }

            Token::If => self.parse_if()?,
            Token::Fn => self.parse_function_literal()?,
            Token::LeftBracket => {
                let elements =
                    self.parse_comma_sep(Token::RightBracket, |this| {
                        this.parse_expression(Precedence::Lowest)
                    })?;
                Expression::ArrayLiteral(elements)
            }

            Token::Illegal(text) => {
                let error = ParserErrorType::IllegalToken(text.clone());
                return Err(self.error_at_current(error));
            }

            // Prefix operator
            t => match PrefixOperator::from_token(t) {
                Some(op) => {
                    self.bump();
                    let operand = self.parse_expression(op.precedence())?;
                    Expression::prefix(op, operand)
                }
                None => {
                    let error = ParserErrorType::NoPrefixRule(t.clone());
                    return Err(self.error_at_current(error));
                }
            },
        };

        Ok(expr)
    }

    fn parse_if(&mut self) -> ParserResult<Expression> {
        self.expect_peek(Token::LeftParen)?;
        self.bump();
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(Token::RightParen)?;

        self.expect_peek(Token::LeftBrace)?;
        let consequence = self.parse_block()?;

        let alternative = if self.peek_is(&Token::Else) {
            self.bump();
            self.expect_peek(Token::LeftBrace)?;
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Expression::If {
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn parse_function_literal(&mut self) -> ParserResult<Expression> {
        self.expect_peek(Token::LeftParen)?;
        let params = self.parse_comma_sep(Token::RightParen, Self::parse_identifier)?;

        self.expect_peek(Token::LeftBrace)?;
        let body = self.parse_block()?;

        Ok(Expression::FunctionLiteral(Rc::new(FuncInfo::new(
            params, body,
        ))))
    }

    /// `current` is on the `(` following the callee.
    fn parse_call(&mut self, callee: Expression) -> ParserResult<Expression> {
        let callee = match callee {
            Expression::Identifier(ident) => ident,
            other => {
                let error = ParserErrorType::CallOnNonIdentifier(other.to_string());
                return Err(self.error_at_current(error));
            }
        };

        let args = self.parse_comma_sep(Token::RightParen, |this| {
            this.parse_expression(Precedence::Lowest)
        })?;

        Ok(Expression::Call { callee, args })
    }

    /// `current` is on the `[` following the collection.
    fn parse_index(&mut self, collection: Expression) -> ParserResult<Expression> {
        self.bump();
        let index = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(Token::RightBracket)?;

        Ok(Expression::Index {
            collection: Box::new(collection),
            index: Box::new(index),
        })
    }

    fn parse_identifier(&mut self) -> ParserResult<Identifier> {
        match &self.current.token {
            Token::Identifier(name) => Ok(Identifier::new(name.as_str())),
            Token::Illegal(text) => {
                let error = ParserErrorType::IllegalToken(text.clone());
                Err(self.error_at_current(error))
            }
            t => {
                let error = ParserErrorType::ExpectedIdentifier(t.clone());
                Err(self.error_at_current(error))
            }
        }
    }

    /// Parses `item, item, ...` up to `end`. `current` must be on the opening
    /// delimiter; on success it is left on `end`.
    fn parse_comma_sep<T, F>(&mut self, end: Token, parser: F) -> ParserResult<Vec<T>>
    where
        F: Fn(&mut Parser<'src>) -> ParserResult<T>,
    {
        let mut items = vec![];
        if self.peek_is(&end) {
            self.bump();
            return Ok(items);
        }

        self.bump();
        items.push(parser(self)?);

        while self.peek_is(&Token::Comma) {
            self.bump();
            self.bump();
            items.push(parser(self)?);
        }

        self.expect_peek(end)?;

        Ok(items)
    }
}
