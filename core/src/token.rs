use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::types::Literal;

/// Token categories. The discriminant is the token's numeric code, in
/// declaration order starting from zero.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum TokenType {
    // Single character tokens
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // One or two character tokens
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals
    Identifier,
    String,
    Number,

    // Keywords
    And,
    Class,
    Else,
    False,
    Fn,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    // End of file marker
    Eof,
}

impl TokenType {
    pub fn code(self) -> u8 {
        self.into()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    pub literal: Option<Literal>,
    pub line: u32,
}

impl Token {
    pub fn new(token_type: TokenType, lexeme: String, literal: Option<Literal>, line: u32) -> Self {
        Token {
            token_type,
            lexeme,
            literal,
            line,
        }
    }

    pub fn eof(line: u32) -> Self {
        Token::new(TokenType::Eof, String::new(), None, line)
    }

    pub fn is_eof(&self) -> bool {
        self.token_type == TokenType::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "code = {}, lexeme = '{}', value = ",
            self.token_type.code(),
            self.lexeme
        )?;
        match &self.literal {
            Some(literal) => write!(f, "{}", literal),
            None => write!(f, "nil"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_declaration_order() {
        assert_eq!(TokenType::LeftParen.code(), 0);
        assert_eq!(TokenType::Star.code(), 10);
        assert_eq!(TokenType::Number.code(), 21);
        assert_eq!(TokenType::Eof.code(), 38);
    }

    #[test]
    fn codes_convert_back_to_token_types() {
        for code in 0..=TokenType::Eof.code() {
            let token_type = TokenType::try_from(code).unwrap();
            assert_eq!(token_type.code(), code);
        }
        assert!(TokenType::try_from(TokenType::Eof.code() + 1).is_err());
    }

    #[test]
    fn display_shows_code_lexeme_and_value() {
        let number = Token::new(
            TokenType::Number,
            "1.5".to_string(),
            Some(Literal::from(1.5)),
            1,
        );
        assert_eq!(number.to_string(), "code = 21, lexeme = '1.5', value = 1.5");

        let plus = Token::new(TokenType::Plus, "+".to_string(), None, 1);
        assert_eq!(plus.to_string(), "code = 7, lexeme = '+', value = nil");
    }
}
