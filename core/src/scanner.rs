use std::sync::OnceLock;

use fnv::FnvHashMap;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

use crate::token::{Token, TokenType};
use crate::types::{Literal, Number};

pub type ScanResult<T> = std::result::Result<T, ScanError>;

/// Scans `source` into tokens, terminated by a single `Eof`.
pub fn scan(source: &str) -> ScanResult<Vec<Token>> {
    Scanner::new(source).scan_tokens()
}

fn keywords() -> &'static FnvHashMap<&'static str, TokenType> {
    static KEYWORDS: OnceLock<FnvHashMap<&'static str, TokenType>> = OnceLock::new();
    KEYWORDS.get_or_init(|| {
        [
            ("and", TokenType::And),
            ("class", TokenType::Class),
            ("else", TokenType::Else),
            ("false", TokenType::False),
            ("fn", TokenType::Fn),
            ("for", TokenType::For),
            ("if", TokenType::If),
            ("nil", TokenType::Nil),
            ("or", TokenType::Or),
            ("print", TokenType::Print),
            ("return", TokenType::Return),
            ("super", TokenType::Super),
            ("this", TokenType::This),
            ("true", TokenType::True),
            ("var", TokenType::Var),
            ("while", TokenType::While),
        ]
        .into_iter()
        .collect()
    })
}

pub struct Scanner<'a> {
    source: Vec<&'a str>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: u32,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Scanner {
            source: source.graphemes(true).collect(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
        }
    }

    pub fn scan_tokens(mut self) -> ScanResult<Vec<Token>> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token()?;
        }

        self.tokens.push(Token::eof(self.line));

        #[cfg(feature = "dump")]
        eprint!("{}", crate::debug::dump_tokens(&self.tokens, "tokens"));

        Ok(self.tokens)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn scan_token(&mut self) -> ScanResult<()> {
        match self.advance() {
            // Single character tokens
            "(" => self.add_token(TokenType::LeftParen, None),
            ")" => self.add_token(TokenType::RightParen, None),
            "{" => self.add_token(TokenType::LeftBrace, None),
            "}" => self.add_token(TokenType::RightBrace, None),
            "," => self.add_token(TokenType::Comma, None),
            "." => self.add_token(TokenType::Dot, None),
            "-" => self.add_token(TokenType::Minus, None),
            "+" => self.add_token(TokenType::Plus, None),
            ";" => self.add_token(TokenType::Semicolon, None),
            "*" => self.add_token(TokenType::Star, None),

            // One or two character tokens
            "!" => self.add_either("=", TokenType::BangEqual, TokenType::Bang),
            "=" => self.add_either("=", TokenType::EqualEqual, TokenType::Equal),
            ">" => self.add_either("=", TokenType::GreaterEqual, TokenType::Greater),
            "<" => self.add_either("=", TokenType::LessEqual, TokenType::Less),

            // Comments
            "/" => {
                if self.matches("/") {
                    // A comment goes until the end of the line
                    while let Some(str) = self.peek() {
                        if Self::is_newline(str) {
                            break;
                        }
                        self.advance();
                    }
                    Ok(())
                } else {
                    self.add_token(TokenType::Slash, None)
                }
            }

            // Ignore whitespace
            " " | "\r" | "\t" => Ok(()),

            "\n" | "\r\n" => {
                self.line += 1;
                Ok(())
            }

            r#"""# => self.string(),

            str => {
                if Self::is_digit(str) {
                    self.number()
                } else if Self::is_alpha(str) {
                    self.identifier()
                } else {
                    Err(ScanError::new(
                        self.line,
                        ScanErrorKind::UnexpectedCharacter(str.to_string()),
                    ))
                }
            }
        }
    }

    fn add_either(
        &mut self,
        expected: &str,
        matched: TokenType,
        otherwise: TokenType,
    ) -> ScanResult<()> {
        if self.matches(expected) {
            self.add_token(matched, None)
        } else {
            self.add_token(otherwise, None)
        }
    }

    fn number(&mut self) -> ScanResult<()> {
        self.consume_while(Self::is_digit);

        // Look for a fractional part
        if let (Some("."), Some(next)) = (self.peek(), self.peek_next()) {
            if Self::is_digit(next) {
                // Consume .
                self.advance();
                self.consume_while(Self::is_digit);
            }
        }

        let text = self.lexeme(self.start, self.current);
        let number = Number::from_lexeme(&text)
            .ok_or_else(|| ScanError::new(self.line, ScanErrorKind::InvalidNumber(text)))?;
        self.add_token(TokenType::Number, Some(Literal::Number(number)))
    }

    fn identifier(&mut self) -> ScanResult<()> {
        self.consume_while(Self::is_alphanumeric);

        let text = self.lexeme(self.start, self.current);
        let token_type = keywords()
            .get(text.as_str())
            .copied()
            .unwrap_or(TokenType::Identifier);
        let literal = match token_type {
            TokenType::True => Some(Literal::Boolean(true)),
            TokenType::False => Some(Literal::Boolean(false)),
            _ => None,
        };

        self.add_token(token_type, literal)
    }

    fn string(&mut self) -> ScanResult<()> {
        while let Some(str) = self.peek() {
            if str == r#"""# {
                break;
            }

            if Self::is_newline(str) {
                self.line += 1;
            }

            self.advance();
        }

        if self.is_at_end() {
            return Err(ScanError::new(self.line, ScanErrorKind::UnterminatedString));
        }

        // Consume the closing "
        self.advance();

        // Trim surrounding quotes
        let value = self.lexeme(self.start + 1, self.current - 1);
        self.add_token(TokenType::String, Some(Literal::String(value)))
    }

    fn consume_while(&mut self, predicate: fn(&str) -> bool) {
        while let Some(str) = self.peek() {
            if !predicate(str) {
                break;
            }
            self.advance();
        }
    }

    fn is_digit(str: &str) -> bool {
        str.len() == 1 && str.bytes().all(|c| c.is_ascii_digit())
    }

    fn is_alpha(str: &str) -> bool {
        str == "_" || (str.len() == 1 && str.bytes().all(|c| c.is_ascii_alphabetic()))
    }

    fn is_alphanumeric(str: &str) -> bool {
        Self::is_alpha(str) || Self::is_digit(str)
    }

    fn is_newline(str: &str) -> bool {
        str == "\n" || str == "\r\n"
    }

    fn peek(&self) -> Option<&'a str> {
        self.source.get(self.current).copied()
    }

    fn peek_next(&self) -> Option<&'a str> {
        self.source.get(self.current + 1).copied()
    }

    fn matches(&mut self, expected: &str) -> bool {
        match self.peek() {
            Some(str) if str == expected => {
                self.current += 1;
                true
            }
            _ => false,
        }
    }

    fn advance(&mut self) -> &'a str {
        let grapheme = self.source.get(self.current).copied().unwrap_or("");
        self.current += 1;
        grapheme
    }

    fn lexeme(&self, start: usize, end: usize) -> String {
        self.source[start..end].concat()
    }

    fn add_token(&mut self, token_type: TokenType, literal: Option<Literal>) -> ScanResult<()> {
        let lexeme = self.lexeme(self.start, self.current);
        let token = Token::new(token_type, lexeme, literal, self.line);

        #[cfg(feature = "trace")]
        crate::debug::trace("scan", format_args!("{}", token));

        self.tokens.push(token);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("[line {line}] Error: {kind}")]
pub struct ScanError {
    line: u32,
    kind: ScanErrorKind,
}

impl ScanError {
    pub fn new(line: u32, kind: ScanErrorKind) -> Self {
        ScanError { line, kind }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn kind(&self) -> &ScanErrorKind {
        &self.kind
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanErrorKind {
    #[error("Unexpected character '{0}'.")]
    UnexpectedCharacter(String),
    #[error("Unterminated string.")]
    UnterminatedString,
    #[error("Invalid number literal '{0}'.")]
    InvalidNumber(String),
}
