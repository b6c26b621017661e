use thiserror::Error;

use crate::{
    ast::Expr,
    token::{Token, TokenType},
    types::Literal,
};

pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Deepest run of nested groupings and unary operators accepted.
pub const MAX_DEPTH: usize = 256;

/// Parses one expression from `tokens`.
pub fn parse(tokens: Vec<Token>) -> ParseResult<Expr> {
    Parser::new(tokens).parse()
}

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    depth: usize,
}

impl Parser {
    /// Appends an `Eof` when `tokens` does not already end with one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(Token::is_eof) {
            let line = tokens.last().map_or(1, |token| token.line);
            tokens.push(Token::eof(line));
        }

        Parser {
            tokens,
            current: 0,
            depth: 0,
        }
    }

    /// Parses a single expression. Tokens after it are left unconsumed.
    pub fn parse(mut self) -> ParseResult<Expr> {
        self.expression()
    }

    fn expression(&mut self) -> ParseResult<Expr> {
        self.equality()
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        self.binary(
            &[TokenType::BangEqual, TokenType::EqualEqual],
            Self::comparison,
        )
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        self.binary(
            &[
                TokenType::Greater,
                TokenType::GreaterEqual,
                TokenType::Less,
                TokenType::LessEqual,
            ],
            Self::addition,
        )
    }

    fn addition(&mut self) -> ParseResult<Expr> {
        self.binary(&[TokenType::Minus, TokenType::Plus], Self::multiplication)
    }

    fn multiplication(&mut self) -> ParseResult<Expr> {
        self.binary(&[TokenType::Slash, TokenType::Star], Self::unary)
    }

    // One left-associative precedence level: operand ( op operand )*
    fn binary(
        &mut self,
        operators: &[TokenType],
        operand: fn(&mut Self) -> ParseResult<Expr>,
    ) -> ParseResult<Expr> {
        let mut left = operand(self)?;

        while self.matches(operators) {
            let operator = self.previous().clone();
            let right = operand(self)?;
            left = self.node(Expr::binary(left, operator, right));
        }

        Ok(left)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        if self.matches(&[TokenType::Bang, TokenType::Minus]) {
            let operator = self.previous().clone();
            let right = self.nested(Self::unary)?;
            return Ok(self.node(Expr::unary(operator, right)));
        }

        self.primary()
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        if self.matches(&[TokenType::False]) {
            return Ok(self.node(Expr::literal(false)));
        }

        if self.matches(&[TokenType::True]) {
            return Ok(self.node(Expr::literal(true)));
        }

        if self.matches(&[TokenType::Nil]) {
            return Ok(self.node(Expr::literal(Literal::Nil)));
        }

        if self.matches(&[TokenType::Number, TokenType::String]) {
            let token = self.previous();
            return match &token.literal {
                Some(literal) => Ok(self.node(Expr::literal(literal.clone()))),
                None => Err(ParseError::new(
                    token.clone(),
                    ParseErrorKind::MissingLiteralValue,
                )),
            };
        }

        if self.matches(&[TokenType::LeftParen]) {
            let expr = self.nested(Self::expression)?;
            self.consume(
                TokenType::RightParen,
                ParseErrorKind::ExpectedRightParenthesis,
            )?;
            return Ok(self.node(Expr::grouping(expr)));
        }

        Err(ParseError::new(
            self.peek().clone(),
            ParseErrorKind::ExpectedExpression,
        ))
    }

    // Recursion is bounded so hostile input fails with an error instead of
    // overflowing the stack.
    fn nested(&mut self, rule: fn(&mut Self) -> ParseResult<Expr>) -> ParseResult<Expr> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::new(self.peek().clone(), ParseErrorKind::TooDeep));
        }

        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    fn matches(&mut self, token_types: &[TokenType]) -> bool {
        for &token_type in token_types.iter() {
            if self.check(token_type) {
                self.advance();
                return true;
            }
        }

        false
    }

    fn check(&self, token_type: TokenType) -> bool {
        if self.is_at_end() {
            return false;
        }

        self.peek().token_type == token_type
    }

    fn is_at_end(&self) -> bool {
        self.peek().is_eof()
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }

        self.previous()
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn consume(&mut self, token_type: TokenType, error_kind: ParseErrorKind) -> ParseResult<Token> {
        if self.check(token_type) {
            return Ok(self.advance().clone());
        }

        Err(ParseError::new(self.peek().clone(), error_kind))
    }

    fn node(&self, expr: Expr) -> Expr {
        #[cfg(feature = "trace")]
        crate::debug::trace(
            "parse",
            format_args!("{}", crate::printers::AstPrinter.print(&expr)),
        );

        expr
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub struct ParseError {
    token: Token,
    kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(token: Token, kind: ParseErrorKind) -> Self {
        ParseError { token, kind }
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn line(&self) -> u32 {
        self.token.line
    }

    pub fn lexeme(&self) -> &str {
        &self.token.lexeme
    }

    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.token.is_eof() {
            write!(f, "[line {}] Error at end: {}", self.token.line, self.kind)
        } else {
            write!(
                f,
                "[line {}] Error at '{}': {}",
                self.token.line, self.token.lexeme, self.kind
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error("Expected expression.")]
    ExpectedExpression,
    #[error("Expected ')' after expression.")]
    ExpectedRightParenthesis,
    #[error("Literal token has no value.")]
    MissingLiteralValue,
    #[error("Expression nesting too deep.")]
    TooDeep,
}
