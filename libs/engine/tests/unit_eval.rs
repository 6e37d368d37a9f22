//! Unit tests for the postfix evaluator

use bcal_engine::{
    evaluate, normalize, to_postfix, tokenize, Diagnostic, EvalError, Evaluation, LastResult,
    Normalized, ValueError,
};

fn eval_with(expr: &str, last: Option<&LastResult>) -> Result<Evaluation, EvalError> {
    let text = match normalize(expr).unwrap() {
        Normalized::Expression(text) => text,
        Normalized::SingleValue(text) => text,
    };
    let postfix = to_postfix(tokenize(&text).unwrap()).unwrap();
    evaluate(postfix, last)
}

fn eval(expr: &str) -> Result<Evaluation, EvalError> {
    eval_with(expr, None)
}

#[test]
fn test_units_add_up() {
    let result = eval("1 KiB + 512 b").unwrap();
    assert_eq!(result.bytes, 1536);
    assert!(result.is_unit);
    assert!(result.diagnostics.is_empty());

    let result = eval("1 KiB + 1 kB").unwrap();
    assert_eq!(result.bytes, 2024);
    assert!(result.is_unit);
}

#[test]
fn test_uppercase_byte_suffix_marks_unit() {
    let result = eval("3 B * 2").unwrap();
    assert_eq!(result.bytes, 6);
    assert!(result.is_unit);

    let last = LastResult {
        bytes: 7,
        is_unit: false,
    };
    let result = eval_with("r B + 1 KiB", Some(&last)).unwrap();
    assert_eq!(result.bytes, 1031);
    assert!(result.is_unit);
}

#[test]
fn test_add_unit_mismatch() {
    assert_eq!(
        eval("1 KiB + 5"),
        Err(EvalError::UnitMismatch { op: "+" })
    );
    assert_eq!(eval("5 | 1b"), Err(EvalError::UnitMismatch { op: "|" }));
}

#[test]
fn test_plain_arithmetic() {
    let result = eval("(2 + 3) * 4").unwrap();
    assert_eq!(result.bytes, 20);
    assert!(!result.is_unit);

    assert_eq!(eval("0xff & 0x0f").unwrap().bytes, 0x0f);
    assert_eq!(eval("0b1010 ^ 0b0110").unwrap().bytes, 0b1100);
    assert_eq!(eval("17 % 5").unwrap().bytes, 2);
}

#[test]
fn test_exact_division_has_no_diagnostic() {
    let result = eval("1 GiB / 1024").unwrap();
    assert_eq!(result.bytes, 1_048_576);
    assert!(result.is_unit);
    assert!(!result.is_truncated());
}

#[test]
fn test_truncated_division_still_returns_quotient() {
    let result = eval("10 / 3").unwrap();
    assert_eq!(result.bytes, 3);
    assert!(!result.is_unit);
    assert_eq!(
        result.diagnostics,
        vec![Diagnostic::Truncated {
            dividend: 10,
            divisor: 3,
            quotient: 3,
        }]
    );
}

#[test]
fn test_unit_ratio_is_dimensionless() {
    let result = eval("1 GiB / 1 MiB").unwrap();
    assert_eq!(result.bytes, 1024);
    assert!(!result.is_unit);
}

#[test]
fn test_divide_plain_by_unit_is_mismatch() {
    assert_eq!(eval("10 / 1kib"), Err(EvalError::UnitMismatch { op: "/" }));
}

#[test]
fn test_division_by_zero() {
    assert_eq!(eval("1 / 0"), Err(EvalError::DivisionByZero));
    assert_eq!(eval("1 % 0"), Err(EvalError::DivisionByZero));
    assert_eq!(eval("1 GiB / 0"), Err(EvalError::DivisionByZero));
}

#[test]
fn test_subtraction() {
    assert_eq!(eval("10 - 5").unwrap().bytes, 5);
    assert_eq!(eval("5 - 10"), Err(EvalError::NegativeResult));
    assert_eq!(eval("1 GiB - 1 MiB").unwrap().bytes, 1_072_693_248);
    assert_eq!(eval("1 GiB - 1"), Err(EvalError::UnitMismatch { op: "-" }));
}

#[test]
fn test_multiplication_rules() {
    let result = eval("4 * 1 KiB").unwrap();
    assert_eq!(result.bytes, 4096);
    assert!(result.is_unit);

    assert_eq!(
        eval("1 KiB * 1 KiB"),
        Err(EvalError::UnitMismatch { op: "*" })
    );
}

#[test]
fn test_modulo_rejects_units() {
    assert_eq!(eval("1 MB % 1 kB"), Err(EvalError::UnitMismatch { op: "%" }));
    assert_eq!(eval("1 MB % 3"), Err(EvalError::UnitMismatch { op: "%" }));
}

#[test]
fn test_shifts() {
    let result = eval("1 KiB << 2").unwrap();
    assert_eq!(result.bytes, 4096);
    assert!(result.is_unit);

    assert_eq!(eval("1024 >> 3").unwrap().bytes, 128);
    assert_eq!(eval("1 << 1b"), Err(EvalError::UnitMismatch { op: "<<" }));
}

#[test]
fn test_overflow_never_wraps() {
    let max = u128::MAX.to_string();
    assert_eq!(
        eval(&format!("{max} + 1")),
        Err(EvalError::Overflow { op: "+" })
    );
    assert_eq!(
        eval(&format!("{max} * 2")),
        Err(EvalError::Overflow { op: "*" })
    );
    assert_eq!(eval("1 << 128"), Err(EvalError::Overflow { op: "<<" }));
    assert!(matches!(
        eval("340282366920938463463374607431768211456 + 1"),
        Err(EvalError::Value(ValueError::Overflow(_)))
    ));
}

#[test]
fn test_last_result_substitution() {
    let last = LastResult {
        bytes: 4096,
        is_unit: true,
    };
    let result = eval_with("r + 1 KiB", Some(&last)).unwrap();
    assert_eq!(result.bytes, 5120);
    assert!(result.is_unit);

    assert_eq!(eval("r + 1"), Err(EvalError::NoStoredResult));
}

#[test]
fn test_single_operand_queue() {
    let result = eval("( 2 GiB )").unwrap();
    assert_eq!(result.bytes, 2 << 30);
    assert!(result.is_unit);

    let result = eval("(42)").unwrap();
    assert_eq!(result.bytes, 42);
    assert!(!result.is_unit);
}

#[test]
fn test_invalid_operands() {
    assert_eq!(
        eval("1.5 + 1"),
        Err(EvalError::Value(ValueError::InvalidToken("1.5".into())))
    );
    assert_eq!(
        eval("2 PiB + 1 b"),
        Err(EvalError::Value(ValueError::UnknownUnit("PiB".into())))
    );
}

#[test]
fn test_leftover_values() {
    assert_eq!(eval("(1) (2)"), Err(EvalError::InvalidExpression));
}
