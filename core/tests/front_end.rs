use lox_expr::{
    parse, parse_source,
    printers::{AstPrinter, RpnPrinter},
    scan,
    token::TokenType,
    types::{Literal, Number},
    Error, Expr,
};

fn print(source: &str) -> String {
    AstPrinter.print(&parse_source(source).unwrap())
}

#[test]
fn scans_the_sample_expression() {
    let tokens = scan("11 * (1.1 / 4) + 2").unwrap();
    let types: Vec<TokenType> = tokens.iter().map(|token| token.token_type).collect();
    assert_eq!(
        types,
        vec![
            TokenType::Number,
            TokenType::Star,
            TokenType::LeftParen,
            TokenType::Number,
            TokenType::Slash,
            TokenType::Number,
            TokenType::RightParen,
            TokenType::Plus,
            TokenType::Number,
            TokenType::Eof,
        ]
    );

    let numbers: Vec<Literal> = tokens
        .iter()
        .filter_map(|token| token.literal.clone())
        .collect();
    assert_eq!(
        numbers,
        vec![
            Literal::Number(Number::Integer(11)),
            Literal::Number(Number::Float(1.1)),
            Literal::Number(Number::Integer(4)),
            Literal::Number(Number::Integer(2)),
        ]
    );
}

#[test]
fn parses_and_prints_the_sample_expression() {
    let expr = parse(scan("11 * (1.1 / 4) + 2").unwrap()).unwrap();
    assert_eq!(AstPrinter.print(&expr), "(+ (* 11 (group (/ 1.1 4))) 2)");
    assert_eq!(RpnPrinter.print(&expr), "11 1.1 4 / * 2 +");

    match expr {
        Expr::Binary(plus) => {
            assert_eq!(plus.operator.token_type, TokenType::Plus);
            assert_eq!(
                *plus.right,
                Expr::Literal(Literal::Number(Number::Integer(2)))
            );
            assert!(matches!(*plus.left, Expr::Binary(_)));
        }
        other => panic!("expected binary expression, got {:?}", other),
    }
}

#[test]
fn precedence_and_associativity() {
    assert_eq!(print("1 + 2 * 3"), "(+ 1 (* 2 3))");
    assert_eq!(print("1 - 2 - 3"), "(- (- 1 2) 3)");
    assert_eq!(print("8 / 4 / 2"), "(/ (/ 8 4) 2)");
    assert_eq!(print("1 < 2 == 3 >= 4"), "(== (< 1 2) (>= 3 4))");
    assert_eq!(print("-1 * -2"), "(* (- 1) (- 2))");
    assert_eq!(print("!!true"), "(! (! true))");
    assert_eq!(print("\"a\" != nil"), "(!= a nil)");
}

#[test]
fn comments_and_newlines_are_skipped() {
    assert_eq!(print("1 // one\n+ 2 // two\n"), "(+ 1 2)");
}

#[test]
fn lexical_errors_surface_through_parse_source() {
    let err = parse_source("1 + \"open").unwrap_err();
    assert!(matches!(err, Error::Scan(_)));
    assert_eq!(err.to_string(), "[line 1] Error: Unterminated string.");
}

#[test]
fn syntax_errors_surface_through_parse_source() {
    let err = parse_source("(1 + 2").unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
    assert_eq!(err.line(), 1);
    assert_eq!(
        err.to_string(),
        "[line 1] Error at end: Expected ')' after expression."
    );

    let err = parse_source("\n\n( )").unwrap_err();
    assert_eq!(
        err.to_string(),
        "[line 3] Error at ')': Expected expression."
    );
}

#[test]
fn scans_on_separate_threads() {
    let handles: Vec<_> = ["1 + 2", "3 * 4", "(5)"]
        .into_iter()
        .map(|source| std::thread::spawn(move || print(source)))
        .collect();
    let printed: Vec<String> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();
    assert_eq!(printed, vec!["(+ 1 2)", "(* 3 4)", "(group 5)"]);
}
