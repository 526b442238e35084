use std::fmt::{Display, Formatter};
use thiserror::Error;
use tracing::debug;
use crate::lang::ast::{BinaryOperator, Decl, Expr, FunctionDecl, Program, Stmt};
use crate::lang::lexer::{Token, TokenPos, TokenType};


/// How far the body of `if cond : ...` and `yap cond : ...` reaches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColonBody {
    /// Exactly one statement.
    Single,
    /// The first statement, plus every further statement starting on the same
    /// line as the `:`. Stops early at `}`, `vibe` or the end of input.
    #[default]
    RestOfLine,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParserOptions {
    pub colon_body: ColonBody,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub struct ParseError {
    message: String,
    token: Token,
}

impl ParseError {
    pub fn new(message: impl Into<String>, token: Token) -> ParseError {
        ParseError { message: message.into(), token }
    }

    pub fn message(&self) -> &str { &self.message }
    pub fn token(&self) -> &Token { &self.token }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Error", self.token.start())?;

        if self.token.token_type() == TokenType::Eof {
            write!(f, " at EOF: ")?;
        } else {
            write!(f, " at '{}': ", self.token.source())?;
        }

        write!(f, "{} (found {:?})", self.message, self.token.token_type())
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,

    options: ParserOptions,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Parser {
        Parser::with_options(tokens, ParserOptions::default())
    }

    pub fn with_options(mut tokens: Vec<Token>, options: ParserOptions) -> Parser {
        // The cursor never moves past the final Eof
        if tokens.last().map(Token::token_type) != Some(TokenType::Eof) {
            let pos = tokens.last().map(|token| *token.end()).unwrap_or_else(TokenPos::begin);
            tokens.push(Token::eof(pos));
        }

        Parser {
            tokens,
            current: 0,
            options,
        }
    }

    // Declaration parsing

    pub fn parse(&mut self) -> ParseResult<Program> {
        let mut declarations = Vec::new();

        while !self.is_eof() {
            if self.matches(TokenType::Vibe) {
                declarations.push(Decl::Function(self.parse_function_declaration()?));
            } else {
                declarations.push(Decl::Statement(self.parse_statement()?));
            }
        }

        debug!(declarations = declarations.len(), "parsed program");
        Ok(Program::new(declarations))
    }

    fn parse_function_declaration(&mut self) -> ParseResult<FunctionDecl> {
        let name = self.expect(TokenType::Identifier, "Expected function name after 'vibe'")?;

        self.expect(TokenType::ParenthesisLeft, "Expected '(' after function name")?;
        self.expect(TokenType::ParenthesisRight, "Expected ')' after '('; functions take no parameters")?;

        let body = if self.matches(TokenType::BracketLeft) {
            self.parse_block()?
        } else {
            self.parse_statements_until(&[TokenType::Vibe])?
        };

        Ok(FunctionDecl::new(name.source().to_owned(), body))
    }

    // Statement parsing

    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        if self.matches(TokenType::Lit) {
            return self.parse_variable_declaration();
        } else if self.matches(TokenType::If) {
            return self.parse_if_statement();
        } else if self.matches(TokenType::Yap) {
            return self.parse_while_statement();
        } else if self.matches(TokenType::Say) {
            return Ok(Stmt::Expression(self.parse_keyword_call("say")?));
        } else if self.check(TokenType::Identifier) && self.check_next(TokenType::Assign) {
            return self.parse_assignment();
        }

        Ok(Stmt::Expression(self.parse_expression()?))
    }

    fn parse_variable_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.expect(TokenType::Identifier, "Expected variable name after 'lit'")?;
        self.expect(TokenType::Assign, "Expected '=' in variable declaration")?;

        let initializer = self.parse_expression()?;
        Ok(Stmt::Var { name: name.source().to_owned(), initializer })
    }

    fn parse_assignment(&mut self) -> ParseResult<Stmt> {
        let name = self.expect(TokenType::Identifier, "Expected identifier for assignment")?;
        self.expect(TokenType::Assign, "Expected '=' in assignment")?;

        let value = self.parse_expression()?;
        Ok(Stmt::Assign { name: name.source().to_owned(), value })
    }

    fn parse_if_statement(&mut self) -> ParseResult<Stmt> {
        let condition = self.parse_expression()?;
        let then_branch = self.parse_body()?;

        // `else` has no production; the branch stays empty
        Ok(Stmt::If { condition, then_branch, else_branch: None })
    }

    fn parse_while_statement(&mut self) -> ParseResult<Stmt> {
        let condition = self.parse_expression()?;
        let body = self.parse_body()?;

        Ok(Stmt::While { condition, body })
    }

    fn parse_body(&mut self) -> ParseResult<Vec<Stmt>> {
        if self.matches(TokenType::Colon) {
            match self.options.colon_body {
                ColonBody::Single => self.parse_single_statement_body(),
                ColonBody::RestOfLine => {
                    let line = self.previous().start().line;
                    self.parse_rest_of_line(line)
                },
            }
        } else if self.matches(TokenType::BracketLeft) {
            self.parse_block()
        } else {
            self.parse_single_statement_body()
        }
    }

    fn parse_single_statement_body(&mut self) -> ParseResult<Vec<Stmt>> {
        if self.is_eof() {
            Ok(Vec::new())
        } else {
            Ok(vec![self.parse_statement()?])
        }
    }

    fn parse_rest_of_line(&mut self, line: i32) -> ParseResult<Vec<Stmt>> {
        let terminators = [TokenType::BracketRight, TokenType::Vibe];
        let mut statements = Vec::new();

        while !self.is_eof() && !terminators.iter().any(|token_type| self.check(*token_type)) {
            if !statements.is_empty() && self.peek().start().line != line {
                break;
            }

            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    /// Parses statements after a consumed `{` up to and including the matching `}`.
    fn parse_block(&mut self) -> ParseResult<Vec<Stmt>> {
        let statements = self.parse_statements_until(&[TokenType::BracketRight])?;
        self.expect(TokenType::BracketRight, "Expected '}' after block")?;

        Ok(statements)
    }

    fn parse_statements_until(&mut self, terminators: &[TokenType]) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.is_eof() && !terminators.iter().any(|token_type| self.check(*token_type)) {
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    // Expression parsing

    fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_equality()
    }

    fn parse_equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_comparison()?;

        while let Some(operator) = self.match_operator(&[TokenType::Equal, TokenType::NotEqual]) {
            let right = self.parse_comparison()?;

            expr = Expr::binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_term()?;

        while let Some(operator) = self.match_operator(&[TokenType::Greater, TokenType::GreaterEqual, TokenType::Less, TokenType::LessEqual]) {
            let right = self.parse_term()?;

            expr = Expr::binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn parse_term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_factor()?;

        while let Some(operator) = self.match_operator(&[TokenType::Plus, TokenType::Minus]) {
            let right = self.parse_factor()?;

            expr = Expr::binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn parse_factor(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_call()?;

        while let Some(operator) = self.match_operator(&[TokenType::Multiply, TokenType::Divide]) {
            let right = self.parse_call()?;

            expr = Expr::binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn parse_call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;

        while self.matches(TokenType::ParenthesisLeft) {
            expr = self.finish_call(expr)?;
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut arguments = vec![];

        if !self.check(TokenType::ParenthesisRight) {
            arguments.push(self.parse_expression()?);

            while self.matches(TokenType::Comma) {
                arguments.push(self.parse_expression()?);
            }
        }

        self.expect(TokenType::ParenthesisRight, "Expected ')' after arguments")?;
        Ok(Expr::Call { callee: Box::new(callee), args: arguments })
    }

    /// A call introduced by a keyword (`say`, `spill`) that was already consumed.
    fn parse_keyword_call(&mut self, name: &str) -> ParseResult<Expr> {
        self.expect(TokenType::ParenthesisLeft, &format!("Expected '(' after '{}'", name))?;
        self.finish_call(Expr::identifier(name))
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        if self.matches(TokenType::Number) || self.matches(TokenType::String) {
            return Ok(Expr::Literal(self.previous().source().to_owned()));
        } else if self.matches(TokenType::Identifier) {
            return Ok(Expr::Identifier(self.previous().source().to_owned()));
        } else if self.matches(TokenType::Spill) {
            return self.parse_keyword_call("spill");
        }

        Err(self.error_at_current("Unexpected token"))
    }

    // Token helpers

    fn consume(&mut self) -> &Token {
        if !self.is_eof() {
            self.current += 1;
        }

        self.previous()
    }

    fn expect(&mut self, token_type: TokenType, message: &str) -> ParseResult<Token> {
        if self.check(token_type) {
            return Ok(self.consume().clone());
        }

        Err(self.error_at_current(message))
    }

    fn matches(&mut self, token_type: TokenType) -> bool { // Should be called "match", but that's a keyword
        if !self.check(token_type) {
            return false;
        }

        self.consume();
        true
    }

    fn match_operator(&mut self, token_types: &[TokenType]) -> Option<BinaryOperator> {
        for token_type in token_types {
            if self.check(*token_type) {
                if let Some(operator) = BinaryOperator::from_token_type(*token_type) {
                    self.consume();
                    return Some(operator);
                }
            }
        }

        None
    }

    #[inline]
    fn check(&self, token_type: TokenType) -> bool {
        self.peek().token_type() == token_type
    }

    fn check_next(&self, token_type: TokenType) -> bool {
        self.tokens.get(self.current + 1).map(Token::token_type) == Some(token_type)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn is_eof(&self) -> bool {
        self.check(TokenType::Eof)
    }

    // Error handling

    fn error_at_current(&self, message: &str) -> ParseError {
        ParseError::new(message, self.peek().clone())
    }
}

/// Parses a token sequence with default options.
pub fn parse(tokens: Vec<Token>) -> ParseResult<Program> {
    Parser::new(tokens).parse()
}
