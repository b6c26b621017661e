use std::fmt::Write;

use crate::token::Token;

pub fn format_token(token: &Token) -> String {
    format!("Token [{}]", token)
}

/// One line per token, with the source line in the left gutter. Runs of
/// tokens on the same line show `|` in the gutter.
pub fn dump_tokens(tokens: &[Token], name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", name);

    let mut previous_line = None;
    for (index, token) in tokens.iter().enumerate() {
        let _ = write!(out, "{:04} ", index);
        if previous_line == Some(token.line) {
            let _ = write!(out, "   | ");
        } else {
            let _ = write!(out, "{:4} ", token.line);
        }
        let _ = writeln!(out, "{}", format_token(token));
        previous_line = Some(token.line);
    }

    out
}

#[cfg(feature = "trace")]
pub fn trace(stage: &str, message: std::fmt::Arguments<'_>) {
    eprintln!("[trace] {}: {}", stage, message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    #[test]
    fn dump_marks_repeated_lines() {
        let tokens = vec![
            Token::new(TokenType::Nil, "nil".to_string(), None, 1),
            Token::new(TokenType::Bang, "!".to_string(), None, 1),
            Token::eof(2),
        ];

        let dump = dump_tokens(&tokens, "tokens");
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines[0], "== tokens ==");
        assert_eq!(
            lines[1],
            "0000    1 Token [code = 29, lexeme = 'nil', value = nil]"
        );
        assert_eq!(
            lines[2],
            "0001    | Token [code = 11, lexeme = '!', value = nil]"
        );
        assert_eq!(
            lines[3],
            "0002    2 Token [code = 38, lexeme = '', value = nil]"
        );
    }
}
