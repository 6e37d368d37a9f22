//! Storage units and operand resolution
//!
//! Integers are exact: decimal, `0x` hex and `0b` binary literals are parsed
//! straight into `u128` with overflow detection. Fractions and exponents are
//! only accepted by [`resolve_unit_value`], the single-value conversion entry
//! point. Their integer part is scaled in `u128`; the fractional tail goes
//! through `rust_decimal` before truncation to whole bytes.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::error::ValueError;
use crate::lexer::strip;
use crate::token::Operand;

/// A storage unit accepted as a suffix or conversion target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Unit {
    B,
    KiB,
    MiB,
    GiB,
    TiB,
    KB,
    MB,
    GB,
    TB,
}

impl Unit {
    pub const ALL: [Unit; 9] = [
        Unit::B,
        Unit::KiB,
        Unit::MiB,
        Unit::GiB,
        Unit::TiB,
        Unit::KB,
        Unit::MB,
        Unit::GB,
        Unit::TB,
    ];

    /// Binary (base 2) multiples
    pub const IEC: [Unit; 4] = [Unit::KiB, Unit::MiB, Unit::GiB, Unit::TiB];

    /// Decimal (base 10) multiples
    pub const SI: [Unit; 4] = [Unit::KB, Unit::MB, Unit::GB, Unit::TB];

    /// Number of bytes in one unit
    pub fn multiplier(self) -> u128 {
        match self {
            Unit::B => 1,
            Unit::KiB => 1 << 10,
            Unit::MiB => 1 << 20,
            Unit::GiB => 1 << 30,
            Unit::TiB => 1 << 40,
            Unit::KB => 1_000,
            Unit::MB => 1_000_000,
            Unit::GB => 1_000_000_000,
            Unit::TB => 1_000_000_000_000,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Unit::B => "B",
            Unit::KiB => "KiB",
            Unit::MiB => "MiB",
            Unit::GiB => "GiB",
            Unit::TiB => "TiB",
            Unit::KB => "kB",
            Unit::MB => "MB",
            Unit::GB => "GB",
            Unit::TB => "TB",
        }
    }

    /// Case-insensitive suffix lookup
    pub fn from_suffix(suffix: &str) -> Option<Unit> {
        Unit::ALL
            .into_iter()
            .find(|unit| unit.symbol().eq_ignore_ascii_case(suffix))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Unit {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::from_suffix(s).ok_or_else(|| ValueError::UnknownUnit(s.to_string()))
    }
}

/// Split `text` into (radix, integer digits, remainder)
fn split_integer(text: &str) -> (u32, &str, &str) {
    let (radix, start) = match text.as_bytes() {
        [b'0', b'x' | b'X', d, ..] if d.is_ascii_hexdigit() => (16, 2),
        [b'0', b'b' | b'B', b'0' | b'1', ..] => (2, 2),
        _ => (10, 0),
    };
    let body = &text[start..];
    let end = body
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(body.len());
    (radix, &body[..end], &body[end..])
}

fn digits_to_u128(digits: &str, radix: u32, text: &str) -> Result<u128, ValueError> {
    let mut value: u128 = 0;
    for c in digits.chars() {
        let digit = c
            .to_digit(radix)
            .ok_or_else(|| ValueError::InvalidToken(text.to_string()))?;
        value = value
            .checked_mul(u128::from(radix))
            .and_then(|v| v.checked_add(u128::from(digit)))
            .ok_or_else(|| ValueError::Overflow(text.to_string()))?;
    }
    Ok(value)
}

/// Parse an unsigned integer in decimal, `0x` hex or `0b` binary
pub fn parse_uint(text: &str) -> Result<u128, ValueError> {
    let (radix, digits, rest) = split_integer(text);
    if digits.is_empty() || !rest.is_empty() {
        return Err(ValueError::InvalidToken(text.to_string()));
    }
    digits_to_u128(digits, radix, text)
}

fn apply_unit(value: u128, unit: Unit, text: &str) -> Result<u128, ValueError> {
    value
        .checked_mul(unit.multiplier())
        .ok_or_else(|| ValueError::Overflow(text.to_string()))
}

/// Resolve an operand to a byte count and its unit flag
///
/// A bare integer is dimensionless unless the operand was already flagged
/// (e.g. by a following `b`); any unit suffix makes it unit-bearing.
pub fn resolve(operand: &Operand) -> Result<(u128, bool), ValueError> {
    let text = operand.text.as_str();
    let (radix, digits, suffix) = split_integer(text);
    if digits.is_empty() {
        return Err(ValueError::InvalidToken(text.to_string()));
    }

    let value = digits_to_u128(digits, radix, text)?;
    if suffix.is_empty() {
        return Ok((value, operand.is_unit));
    }

    if !suffix.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValueError::InvalidToken(text.to_string()));
    }

    let unit = Unit::from_str(suffix)?;
    Ok((apply_unit(value, unit, text)?, true))
}

/// Parse a single conversion value, returning bytes and the source unit
///
/// Without an explicit `unit`, a trailing alphabetic suffix of `value`
/// names it; no suffix means bytes.
pub fn parse_quantity(value: &str, unit: Option<&str>) -> Result<(u128, Unit), ValueError> {
    let value = strip(value);
    if value.is_empty() {
        return Err(ValueError::InvalidToken(String::new()));
    }

    let (number, unit) = match unit {
        Some(unit) => (value, Unit::from_str(strip(unit))?),
        None => split_unit_suffix(value)?,
    };

    if let Ok(exact) = parse_uint(number) {
        return Ok((apply_unit(exact, unit, value)?, unit));
    }

    let bytes = scale_fraction(number, unit.multiplier(), value)?;
    Ok((bytes, unit))
}

/// Byte count of a single value with an optional unit
pub fn resolve_unit_value(value: &str, unit: Option<&str>) -> Result<u128, ValueError> {
    parse_quantity(value, unit).map(|(bytes, _)| bytes)
}

fn split_unit_suffix(value: &str) -> Result<(&str, Unit), ValueError> {
    // Integer literals first, so hex digits are never mistaken for a suffix.
    let (_, digits, rest) = split_integer(value);
    let split_at = if !digits.is_empty() && rest.chars().all(|c| c.is_ascii_alphabetic()) {
        value.len() - rest.len()
    } else {
        value.trim_end_matches(|c: char| c.is_ascii_alphabetic()).len()
    };

    let (number, suffix) = value.split_at(split_at);
    if suffix.is_empty() {
        return Ok((number, Unit::B));
    }
    Ok((number, Unit::from_str(suffix)?))
}

/// Digits kept after the point when the fraction goes through `Decimal`
const FRACTION_DIGITS: usize = 28;

/// Exact `number * multiplier` for a decimal literal with optional fraction
/// and exponent, truncated to whole bytes
///
/// The integer part is scaled in `u128`; only the fractional tail, which
/// contributes less than `multiplier`, uses `Decimal`.
fn scale_fraction(number: &str, multiplier: u128, text: &str) -> Result<u128, ValueError> {
    let invalid = || ValueError::InvalidToken(text.to_string());
    let overflow = || ValueError::Overflow(text.to_string());

    let (mantissa, exponent) = match number.split_once(['e', 'E']) {
        Some((m, e)) => (m, e.parse::<i64>().map_err(|_| invalid())?),
        None => (number, 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    let empty = int_part.is_empty() && frac_part.is_empty();
    if empty || !all_digits(int_part) || !all_digits(frac_part) {
        return Err(invalid());
    }

    let (int_digits, frac_digits) =
        shift_point(int_part, frac_part, exponent).ok_or_else(overflow)?;

    let whole = if int_digits.is_empty() {
        0
    } else {
        digits_to_u128(&int_digits, 10, text)?
            .checked_mul(multiplier)
            .ok_or_else(overflow)?
    };

    let frac_digits = frac_digits.trim_end_matches('0');
    if frac_digits.is_empty() {
        return Ok(whole);
    }
    let kept = &frac_digits[..frac_digits.len().min(FRACTION_DIGITS)];
    let fraction = Decimal::from_str(&format!("0.{kept}")).map_err(|_| invalid())?;
    let part = Decimal::from_u128(multiplier)
        .and_then(|m| fraction.checked_mul(m))
        .and_then(|d| d.trunc().to_u128())
        .ok_or_else(overflow)?;

    whole.checked_add(part).ok_or_else(overflow)
}

/// Move the decimal point of `int.frac` by `exponent` places
///
/// Returns `None` when the integer part cannot fit in 128 bits.
fn shift_point(int: &str, frac: &str, exponent: i64) -> Option<(String, String)> {
    // u128::MAX has 39 decimal digits
    const MAX_DIGITS: usize = 40;

    let int = int.trim_start_matches('0');
    if exponent >= 0 {
        let shift = usize::try_from(exponent).ok()?;
        let moved = shift.min(frac.len());
        let mut int_digits = format!("{int}{}", &frac[..moved]);
        let int_digits_len = int_digits.trim_start_matches('0').len();
        let zeros = shift - moved;
        if int_digits_len > 0 && int_digits_len + zeros > MAX_DIGITS {
            return None;
        }
        if int_digits_len > 0 {
            int_digits.extend(std::iter::repeat('0').take(zeros));
        }
        Some((int_digits, frac[moved..].to_string()))
    } else {
        let shift = usize::try_from(exponent.unsigned_abs()).ok()?;
        let moved = shift.min(int.len());
        let split = int.len() - moved;
        let zeros = (shift - moved).min(MAX_DIGITS);
        let frac_digits = format!("{}{}{frac}", "0".repeat(zeros), &int[split..]);
        Some((int[..split].to_string(), frac_digits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_integer() {
        assert_eq!(split_integer("0x1fkib"), (16, "1f", "kib"));
        assert_eq!(split_integer("0b101"), (2, "101", ""));
        assert_eq!(split_integer("0b"), (10, "0", "b"));
        assert_eq!(split_integer("12GiB"), (10, "12", "GiB"));
        assert_eq!(split_integer("1.5"), (10, "1", ".5"));
    }

    #[test]
    fn test_shift_point() {
        let pair = |a: &str, b: &str| Some((a.to_string(), b.to_string()));
        assert_eq!(shift_point("1", "25", 1), pair("12", "5"));
        assert_eq!(shift_point("1", "", 3), pair("1000", ""));
        assert_eq!(shift_point("12", "5", -3), pair("", "0125"));
        assert_eq!(shift_point("0", "", 10_000), pair("", ""));
        assert_eq!(shift_point("1", "", 40), None);
    }

    #[test]
    fn test_split_unit_suffix() {
        assert_eq!(split_unit_suffix("1.5GiB").unwrap(), ("1.5", Unit::GiB));
        assert_eq!(split_unit_suffix("0x1F").unwrap(), ("0x1F", Unit::B));
        assert_eq!(split_unit_suffix("4096").unwrap(), ("4096", Unit::B));
        assert!(matches!(
            split_unit_suffix("3pb"),
            Err(ValueError::UnknownUnit(u)) if u == "pb"
        ));
    }
}
