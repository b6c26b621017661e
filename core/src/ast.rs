use crate::token::Token;
use crate::types::Literal;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Binary(Binary),
    Grouping(Grouping),
    Literal(Literal),
    Unary(Unary),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grouping {
    pub expr: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    pub operator: Token,
    pub expr: Box<Expr>,
}

/// One operation per `Expr` variant. Adding a variant means updating every
/// implementor.
pub trait Visitor {
    type Result;

    fn visit_binary_expr(&mut self, binary: &Binary) -> Self::Result;
    fn visit_grouping_expr(&mut self, grouping: &Grouping) -> Self::Result;
    fn visit_literal_expr(&mut self, literal: &Literal) -> Self::Result;
    fn visit_unary_expr(&mut self, unary: &Unary) -> Self::Result;
}

impl Expr {
    pub fn binary(left: Expr, operator: Token, right: Expr) -> Self {
        Expr::Binary(Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    pub fn grouping(expr: Expr) -> Self {
        Expr::Grouping(Grouping {
            expr: Box::new(expr),
        })
    }

    pub fn literal(literal: impl Into<Literal>) -> Self {
        Expr::Literal(literal.into())
    }

    pub fn unary(operator: Token, expr: Expr) -> Self {
        Expr::Unary(Unary {
            operator,
            expr: Box::new(expr),
        })
    }

    pub fn accept<V: Visitor>(&self, visitor: &mut V) -> V::Result {
        match self {
            Self::Binary(binary) => visitor.visit_binary_expr(binary),
            Self::Grouping(grouping) => visitor.visit_grouping_expr(grouping),
            Self::Literal(literal) => visitor.visit_literal_expr(literal),
            Self::Unary(unary) => visitor.visit_unary_expr(unary),
        }
    }
}
