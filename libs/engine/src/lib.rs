//! Storage capacity calculator engine
//!
//! Evaluates expressions mixing plain integers, storage units and the last
//! result, exactly, in 128-bit unsigned arithmetic. Also converts disk
//! addresses between CHS and LBA.
//!
//! # Pipeline
//!
//! ```text
//! Input line
//!      |
//!   normalize -> canonical, space separated text
//!      |
//!   tokenize  -> Token stream
//!      |
//!   to_postfix -> Postfix queue
//!      |
//!   evaluate  -> bytes + unit flag (+ diagnostics)
//! ```
//!
//! Units (case-insensitive): `b`, `KiB`, `MiB`, `GiB`, `TiB` (base 2) and
//! `kB`, `MB`, `GB`, `TB` (base 10). A standalone `b` after a number marks
//! it as a byte count: `0x200 b`.
//!
//! Operators, from lowest to highest priority: `|`, `^`, `&`, `<<` `>>`,
//! `+` `-`, `*` `/` `%`.
//!
//! ```
//! use bcal_engine::{Outcome, Session};
//!
//! let mut session = Session::default();
//! let Outcome::Expression(eval) = session.evaluate("1 KiB + 512 b").unwrap() else {
//!     panic!("expected an expression");
//! };
//! assert_eq!(eval.bytes, 1536);
//! assert!(eval.is_unit);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod eval;
pub mod geometry;
pub mod lexer;
pub mod parser;
pub mod session;
pub mod token;
pub mod units;

pub use error::{Error, EvalError, GeometryError, Result, SyntaxError, ValueError};
pub use eval::{evaluate, Diagnostic, Evaluation, LastResult};
pub use geometry::{
    chs_to_lba, lba_to_chs, Chs, ChsParams, GeometryRequest, LbaParams, DEFAULT_MAX_HEAD,
    DEFAULT_MAX_SECTOR,
};
pub use lexer::{normalize, tokenize, Normalized};
pub use parser::{to_postfix, Postfix, PostfixItem};
pub use session::{Address, Conversion, Outcome, Session, DEFAULT_SECTOR_SIZE};
pub use token::{Operand, Operator, Paren, Token};
pub use units::{parse_quantity, parse_uint, resolve, resolve_unit_value, Unit};
