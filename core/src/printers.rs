use crate::{
    ast::{Binary, Expr, Grouping, Unary, Visitor},
    token::TokenType,
    types::Literal,
};

/// Parenthesised prefix form: `(+ 1 (group (* 2 3)))`.
pub struct AstPrinter;

impl AstPrinter {
    pub fn print(&mut self, e: &Expr) -> String {
        e.accept(self)
    }

    fn parenthesize(&mut self, name: &str, exprs: &[&Expr]) -> String {
        let mut out = format!("({}", name);
        for expr in exprs {
            out.push(' ');
            out.push_str(&expr.accept(self));
        }
        out.push(')');
        out
    }
}

impl Visitor for AstPrinter {
    type Result = String;

    fn visit_binary_expr(&mut self, binary: &Binary) -> Self::Result {
        self.parenthesize(
            &binary.operator.lexeme,
            &[binary.left.as_ref(), binary.right.as_ref()],
        )
    }

    fn visit_grouping_expr(&mut self, grouping: &Grouping) -> Self::Result {
        self.parenthesize("group", &[grouping.expr.as_ref()])
    }

    fn visit_literal_expr(&mut self, literal: &Literal) -> Self::Result {
        literal.to_string()
    }

    fn visit_unary_expr(&mut self, unary: &Unary) -> Self::Result {
        self.parenthesize(&unary.operator.lexeme, &[unary.expr.as_ref()])
    }
}

/// Reverse Polish notation: `1 2 3 * +`. Unary minus prints as `~`.
pub struct RpnPrinter;

impl RpnPrinter {
    pub fn print(&mut self, e: &Expr) -> String {
        e.accept(self)
    }
}

impl Visitor for RpnPrinter {
    type Result = String;

    fn visit_binary_expr(&mut self, binary: &Binary) -> Self::Result {
        format!(
            "{} {} {}",
            binary.left.accept(self),
            binary.right.accept(self),
            binary.operator.lexeme,
        )
    }

    fn visit_grouping_expr(&mut self, grouping: &Grouping) -> Self::Result {
        grouping.expr.accept(self)
    }

    fn visit_literal_expr(&mut self, literal: &Literal) -> Self::Result {
        literal.to_string()
    }

    fn visit_unary_expr(&mut self, unary: &Unary) -> Self::Result {
        let operator = if unary.operator.token_type == TokenType::Minus {
            "~"
        } else {
            &unary.operator.lexeme
        };
        format!("{} {}", unary.expr.accept(self), operator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;

    fn token(token_type: TokenType, lexeme: &str) -> Token {
        Token::new(token_type, lexeme.to_string(), None, 1)
    }

    fn sample() -> Expr {
        Expr::binary(
            Expr::unary(token(TokenType::Minus, "-"), Expr::literal(123_i64)),
            token(TokenType::Star, "*"),
            Expr::grouping(Expr::literal(45.67)),
        )
    }

    #[test]
    fn ast_printer_parenthesizes() {
        assert_eq!(AstPrinter.print(&sample()), "(* (- 123) (group 45.67))");
    }

    #[test]
    fn ast_printer_literals() {
        assert_eq!(AstPrinter.print(&Expr::literal(Literal::Nil)), "nil");
        assert_eq!(AstPrinter.print(&Expr::literal(false)), "false");
        assert_eq!(AstPrinter.print(&Expr::literal("a b")), "a b");
    }

    #[test]
    fn rpn_printer_puts_operators_last() {
        assert_eq!(RpnPrinter.print(&sample()), "123 ~ 45.67 *");

        let e = Expr::binary(
            Expr::grouping(Expr::binary(
                Expr::literal(1_i64),
                token(TokenType::Plus, "+"),
                Expr::literal(2_i64),
            )),
            token(TokenType::Star, "*"),
            Expr::grouping(Expr::binary(
                Expr::literal(4_i64),
                token(TokenType::Minus, "-"),
                Expr::literal(3_i64),
            )),
        );
        assert_eq!(RpnPrinter.print(&e), "1 2 + 4 3 - *");
    }

    #[test]
    fn rpn_printer_keeps_bang() {
        let e = Expr::unary(token(TokenType::Bang, "!"), Expr::literal(true));
        assert_eq!(RpnPrinter.print(&e), "true !");
    }
}
