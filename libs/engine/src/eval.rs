//! Postfix evaluator
//!
//! Operands stay tokens on the value stack until an operator needs them, so
//! the unit flag of each side is still visible when the operator checks
//! compatibility. Every intermediate result is pushed back as decimal text.

use std::fmt;

use crate::error::EvalError;
use crate::parser::{Postfix, PostfixItem};
use crate::token::{Operand, Operator};
use crate::units::resolve;

/// Value kept between evaluations for the `r` operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LastResult {
    pub bytes: u128,
    pub is_unit: bool,
}

impl LastResult {
    fn to_operand(self, is_unit: bool) -> Operand {
        Operand::with_unit(self.bytes.to_string(), self.is_unit || is_unit)
    }
}

impl fmt::Display for LastResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unit {
            write!(f, "{} B", self.bytes)
        } else {
            write!(f, "{}", self.bytes)
        }
    }
}

/// Non-fatal findings reported alongside a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Diagnostic {
    /// Integer division dropped a remainder
    Truncated {
        dividend: u128,
        divisor: u128,
        quotient: u128,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Truncated { .. } => write!(f, "result truncated"),
        }
    }
}

/// Final value of an expression
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evaluation {
    pub bytes: u128,
    /// `true` for a byte count, `false` for a plain integer
    pub is_unit: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl Evaluation {
    pub fn is_truncated(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::Truncated { .. }))
    }
}

#[derive(Debug, Clone, Copy)]
struct Quantity {
    value: u128,
    is_unit: bool,
}

impl Quantity {
    fn resolve(operand: &Operand) -> Result<Self, EvalError> {
        let (value, is_unit) = resolve(operand)?;
        Ok(Self { value, is_unit })
    }
}

fn substitute(operand: Operand, last: Option<&LastResult>) -> Result<Operand, EvalError> {
    if !operand.is_last_result() {
        return Ok(operand);
    }
    last.map(|l| l.to_operand(operand.is_unit))
        .ok_or(EvalError::NoStoredResult)
}

/// Evaluate a postfix queue
///
/// `last` backs the `r` operand; evaluation fails with
/// [`EvalError::NoStoredResult`] if `r` is used and nothing is stored.
pub fn evaluate(queue: Postfix, last: Option<&LastResult>) -> Result<Evaluation, EvalError> {
    let mut diagnostics = Vec::new();
    let mut stack: Vec<Operand> = Vec::new();

    if queue.is_empty() {
        return Err(EvalError::EmptyExpression);
    }

    for item in queue {
        match item {
            PostfixItem::Operand(operand) => {
                let operand = substitute(operand, last)?;
                tracing::trace!(operand = %operand, "push");
                stack.push(operand);
            }
            PostfixItem::Operator(op) => {
                let missing = EvalError::MissingOperand { op: op.symbol() };
                let rhs = stack.pop().ok_or_else(|| missing.clone())?;
                let lhs = stack.pop().ok_or(missing)?;

                let b = Quantity::resolve(&rhs)?;
                let a = Quantity::resolve(&lhs)?;

                tracing::debug!(
                    lhs = %a.value,
                    lhs_unit = a.is_unit,
                    op = op.symbol(),
                    rhs = %b.value,
                    rhs_unit = b.is_unit,
                    "apply"
                );

                let c = apply(op, a, b, &mut diagnostics)?;
                stack.push(Operand::with_unit(c.value.to_string(), c.is_unit));
            }
        }
    }

    let result = stack.pop().ok_or(EvalError::InvalidExpression)?;
    if !stack.is_empty() {
        return Err(EvalError::InvalidExpression);
    }

    let result = Quantity::resolve(&result)?;
    Ok(Evaluation {
        bytes: result.value,
        is_unit: result.is_unit,
        diagnostics,
    })
}

fn require_same_unit(op: Operator, a: Quantity, b: Quantity) -> Result<(), EvalError> {
    if a.is_unit != b.is_unit {
        return Err(EvalError::UnitMismatch { op: op.symbol() });
    }
    Ok(())
}

fn apply(
    op: Operator,
    a: Quantity,
    b: Quantity,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Quantity, EvalError> {
    let overflow = || EvalError::Overflow { op: op.symbol() };
    let mismatch = || EvalError::UnitMismatch { op: op.symbol() };

    let result = match op {
        Operator::ShiftLeft | Operator::ShiftRight => {
            if b.is_unit {
                return Err(mismatch());
            }
            let value = if op == Operator::ShiftLeft {
                shift_left(a.value, b.value).ok_or_else(overflow)?
            } else {
                shift_right(a.value, b.value)
            };
            Quantity {
                value,
                is_unit: a.is_unit,
            }
        }
        Operator::Add => {
            require_same_unit(op, a, b)?;
            Quantity {
                value: a.value.checked_add(b.value).ok_or_else(overflow)?,
                is_unit: a.is_unit,
            }
        }
        Operator::And | Operator::Or | Operator::Xor => {
            require_same_unit(op, a, b)?;
            let value = match op {
                Operator::And => a.value & b.value,
                Operator::Or => a.value | b.value,
                _ => a.value ^ b.value,
            };
            Quantity {
                value,
                is_unit: a.is_unit,
            }
        }
        Operator::Subtract => {
            require_same_unit(op, a, b)?;
            if b.value > a.value {
                return Err(EvalError::NegativeResult);
            }
            Quantity {
                value: a.value - b.value,
                is_unit: a.is_unit,
            }
        }
        Operator::Multiply => {
            if a.is_unit && b.is_unit {
                return Err(mismatch());
            }
            Quantity {
                value: a.value.checked_mul(b.value).ok_or_else(overflow)?,
                is_unit: a.is_unit || b.is_unit,
            }
        }
        Operator::Divide => {
            if b.value == 0 {
                return Err(EvalError::DivisionByZero);
            }
            let is_unit = match (a.is_unit, b.is_unit) {
                // bytes / bytes is a ratio
                (true, true) => false,
                (lhs, false) => lhs,
                (false, true) => return Err(mismatch()),
            };
            let quotient = a.value / b.value;
            check_truncation(a.value, b.value, quotient, diagnostics);
            Quantity {
                value: quotient,
                is_unit,
            }
        }
        Operator::Modulo => {
            if b.value == 0 {
                return Err(EvalError::DivisionByZero);
            }
            if a.is_unit || b.is_unit {
                return Err(mismatch());
            }
            Quantity {
                value: a.value % b.value,
                is_unit: false,
            }
        }
    };

    Ok(result)
}

fn shift_left(value: u128, amount: u128) -> Option<u128> {
    if value == 0 {
        return Some(0);
    }
    let amount = u32::try_from(amount).ok()?;
    if amount > value.leading_zeros() {
        return None;
    }
    Some(value << amount)
}

fn shift_right(value: u128, amount: u128) -> u128 {
    match u32::try_from(amount) {
        Ok(amount) if amount < u128::BITS => value >> amount,
        _ => 0,
    }
}

fn check_truncation(
    dividend: u128,
    divisor: u128,
    quotient: u128,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if divisor * quotient < dividend {
        tracing::warn!(
            dividend = %dividend,
            divisor = %divisor,
            quotient = %quotient,
            "result truncated"
        );
        diagnostics.push(Diagnostic::Truncated {
            dividend,
            divisor,
            quotient,
        });
    }
}
