//! Unit tests for the expression normalizer and lexer

use bcal_engine::lexer::{normalize, tokenize, Normalized};
use bcal_engine::token::{Operator, Paren, Token};
use bcal_engine::SyntaxError;

fn normalized(input: &str) -> String {
    match normalize(input) {
        Ok(Normalized::Expression(s)) => s,
        other => panic!("expected expression for {input:?}, got {other:?}"),
    }
}

#[test]
fn test_single_value_has_no_separator() {
    assert_eq!(
        normalize("  1.5GiB ").unwrap(),
        Normalized::SingleValue("1.5GiB".into())
    );
    assert_eq!(
        normalize("\"4 KiB\"").unwrap(),
        Normalized::SingleValue("4KiB".into())
    );
    assert_eq!(normalize("0x200").unwrap(), Normalized::SingleValue("0x200".into()));
}

#[test]
fn test_byte_suffix_space_survives() {
    assert_eq!(normalized("512 b"), "512 b");
    assert_eq!(normalized("0x10   b + 1kib"), "0x10 b + 1kib");
}

#[test]
fn test_uppercase_byte_suffix() {
    assert_eq!(normalized("r B"), "r B");
    assert_eq!(normalized("(1+2) B"), "( 1 + 2 ) B");

    let tokens = tokenize(&normalized("r B")).unwrap();
    assert_eq!(tokens, vec![Token::operand("r"), Token::ByteSuffix]);
}

#[test]
fn test_operators_are_separated() {
    assert_eq!(normalized("2*(3+4)"), "2 * ( 3 + 4 )");
    assert_eq!(normalized("10 % 3 ^ 1 | 8 & 12"), "10 % 3 ^ 1 | 8 & 12");
    assert_eq!(normalized("(r/2)"), "( r / 2 )");
}

#[test]
fn test_shift_pairs() {
    assert_eq!(normalized("1<<10"), "1 << 10");
    assert_eq!(normalized("1 GiB >> 2"), "1GiB >> 2");
    assert_eq!(
        normalize("1 < 2"),
        Err(SyntaxError::InvalidShift("<".into()))
    );
    assert_eq!(
        normalize("1 >>> 2"),
        Err(SyntaxError::InvalidShift(">>>".into()))
    );
    assert_eq!(normalize("1 <> 2"), Err(SyntaxError::InvalidShift("<".into())));
}

#[test]
fn test_rejects_other_brackets() {
    assert_eq!(normalize("[1+2]"), Err(SyntaxError::InvalidBracket));
    assert_eq!(normalize("1 + {2}"), Err(SyntaxError::InvalidBracket));
}

#[test]
fn test_rejects_unary_minus() {
    assert_eq!(normalize("-5 + 1"), Err(SyntaxError::NegativeToken));
    assert_eq!(normalize("5 * -1"), Err(SyntaxError::NegativeToken));
    assert_eq!(normalize("(-1)"), Err(SyntaxError::NegativeToken));
}

#[test]
fn test_rejects_letter_after_operator() {
    assert_eq!(normalize("1+KiB"), Err(SyntaxError::UnexpectedLetter('K')));
    assert!(normalize("1+r").is_ok());
}

#[test]
fn test_rejects_adjacent_operators() {
    assert_eq!(normalize("1 + * 2"), Err(SyntaxError::AdjacentOperators('+', '*')));
    assert_eq!(normalize("1 ** 2"), Err(SyntaxError::AdjacentOperators('*', '*')));
}

#[test]
fn test_empty_input() {
    assert_eq!(normalize("   "), Err(SyntaxError::EmptyExpression));
    assert_eq!(normalize("''"), Err(SyntaxError::EmptyExpression));
}

#[test]
fn test_tokenize_classifies_once() {
    let tokens = tokenize("( 1KiB + 512 b ) << 2").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::Paren(Paren::Open),
            Token::operand("1KiB"),
            Token::Operator(Operator::Add),
            Token::operand("512"),
            Token::ByteSuffix,
            Token::Paren(Paren::Close),
            Token::Operator(Operator::ShiftLeft),
            Token::operand("2"),
        ]
    );
}

#[test]
fn test_tokenize_rejects_unknown_operator_run() {
    assert_eq!(
        tokenize("1 +- 2"),
        Err(SyntaxError::MultiCharOperator("+-".into()))
    );
}
