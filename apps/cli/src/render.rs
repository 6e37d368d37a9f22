//! Text rendering for calculator results
//!
//! Every function returns a `String` so output can be checked without a
//! terminal. `main` and the REPL decide where it goes.

use std::fmt::Write as _;

use bcal_engine::{Address, Chs, Conversion, Evaluation, Outcome, Unit};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

const FRACTION_DIGITS: u32 = 10;
const VALUE_WIDTH: usize = 40;

/// Lowercase hex with a `0x` prefix
pub fn hex(n: u128) -> String {
    format!("{n:#x}")
}

/// Binary digits grouped in bytes, most significant group first
pub fn binary(n: u128) -> String {
    let digits = format!("{n:b}");
    let lead = digits.len() % 8;
    let mut out = String::with_capacity(digits.len() + digits.len() / 8);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 8 - lead) % 8 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// `bytes / unit` with up to 10 fractional digits, integers without fraction
pub fn scaled(bytes: u128, unit: Unit) -> String {
    let divisor = unit.multiplier();
    if bytes % divisor == 0 {
        return (bytes / divisor).to_string();
    }

    let rounded = match (Decimal::from_u128(bytes), Decimal::from_u128(divisor)) {
        (Some(b), Some(d)) => {
            (b / d).round_dp_with_strategy(FRACTION_DIGITS, RoundingStrategy::MidpointNearestEven)
        }
        _ => Decimal::ZERO,
    };

    // zero after rounding, or beyond Decimal's 96-bit mantissa
    if rounded.is_zero() {
        let value = bytes as f64 / divisor as f64;
        return format!("{value:.10e}");
    }
    rounded.normalize().to_string()
}

/// Byte count followed by the IEC and SI expansion
pub fn expansion(bytes: u128) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>VALUE_WIDTH$} B", bytes);

    out.push_str("\n            IEC standard (base 2)\n\n");
    for unit in Unit::IEC {
        let _ = writeln!(out, "{:>VALUE_WIDTH$} {}", scaled(bytes, unit), unit);
    }

    out.push_str("\n            SI standard (base 10)\n\n");
    for unit in Unit::SI {
        let _ = writeln!(out, "{:>VALUE_WIDTH$} {}", scaled(bytes, unit), unit);
    }
    out
}

pub fn address(bytes: u128) -> String {
    format!("ADDRESS\n (d) {}\n (h) {}\n", bytes, hex(bytes))
}

pub fn lba_offset(addr: &Address, sector_size: u64) -> String {
    format!(
        "LBA:OFFSET (sector size: {})\n (d) {}:{}\n (h) {}:{}\n",
        hex(u128::from(sector_size)),
        addr.lba,
        addr.offset,
        hex(addr.lba),
        hex(addr.offset)
    )
}

/// Render an engine outcome
///
/// Dimensionless expression results print as a bare number. Byte quantities
/// get the full expansion unless `minimal` is set.
pub fn outcome(outcome: &Outcome, sector_size: u64, minimal: bool) -> String {
    match outcome {
        Outcome::Expression(eval) => expression(eval, minimal),
        Outcome::Conversion(conv) => conversion(conv, sector_size, minimal),
    }
}

fn expression(eval: &Evaluation, minimal: bool) -> String {
    let mut out = String::new();
    for diagnostic in &eval.diagnostics {
        let _ = writeln!(out, "warning: {diagnostic}");
    }

    if !eval.is_unit {
        let _ = writeln!(out, "{}", eval.bytes);
        return out;
    }
    if minimal {
        let _ = writeln!(out, "{} B", eval.bytes);
        return out;
    }

    out.push_str("RESULT\n");
    out.push_str(&expansion(eval.bytes));
    out.push('\n');
    out.push_str(&address(eval.bytes));
    out
}

fn conversion(conv: &Conversion, sector_size: u64, minimal: bool) -> String {
    if minimal {
        return format!("{} B\n", conv.bytes);
    }

    let mut out = String::new();
    let _ = writeln!(out, "UNIT CONVERSION ({})", conv.unit);
    out.push_str(&expansion(conv.bytes));
    out.push('\n');
    out.push_str(&address(conv.bytes));
    out.push('\n');
    out.push_str(&lba_offset(&conv.address, sector_size));
    out
}

/// A number in binary, decimal and hex
pub fn bases(n: u128) -> String {
    format!(" (b) {}\n (d) {}\n (h) {}\n", binary(n), n, hex(n))
}

pub fn lba(lba: u128) -> String {
    format!("  LBA: (d) {}, (h) {}\n", lba, hex(lba))
}

pub fn chs(chs: &Chs) -> String {
    format!(
        "  CHS: (d) {} {} {}, (h) {} {} {}\n",
        chs.cylinder,
        chs.head,
        chs.sector,
        hex(chs.cylinder),
        hex(u128::from(chs.head)),
        hex(u128::from(chs.sector))
    )
}

/// The stored result as shown by the `r` key
pub fn last_result(bytes: u128, is_unit: bool) -> String {
    if is_unit {
        format!("r = {bytes} B\n")
    } else {
        format!("r = {bytes}\n")
    }
}

/// Sizes of the machine types relevant to storage arithmetic
pub fn storage_sizes() -> String {
    let rows: [(&str, usize); 9] = [
        ("char", std::mem::size_of::<u8>()),
        ("short", std::mem::size_of::<u16>()),
        ("int", std::mem::size_of::<u32>()),
        ("long", std::mem::size_of::<usize>()),
        ("long long", std::mem::size_of::<u64>()),
        ("u128", std::mem::size_of::<u128>()),
        ("float", std::mem::size_of::<f32>()),
        ("double", std::mem::size_of::<f64>()),
        ("decimal", std::mem::size_of::<Decimal>()),
    ];

    let mut out = String::from("---------------\n Storage sizes\n---------------\n");
    for (name, size) in rows {
        let _ = writeln!(out, "{name:<11}: {size}");
    }
    out
}

pub fn prompt_help() -> &'static str {
    "prompt keys:\n \
     r          show result from last operation\n \
     s          show sizes of storage types\n \
     c N        show N in binary, decimal, hex\n \
     ?          show prompt help\n \
     q/double \u{21b5} quit program\n"
}
