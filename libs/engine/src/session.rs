//! Calculator session
//!
//! Owns the state that outlives a single input line: the last result read
//! by the `r` operand and the sector size used for address display. The
//! last result is only replaced after a successful evaluation.

use crate::error::{EvalError, GeometryError, Result, ValueError};
use crate::eval::{evaluate, Evaluation, LastResult};
use crate::lexer::{normalize, strip, tokenize, Normalized};
use crate::parser::to_postfix;
use crate::token::LAST_RESULT;
use crate::units::{parse_quantity, parse_uint, Unit};

pub const DEFAULT_SECTOR_SIZE: u64 = 512;

/// Byte position split into sector index and offset within that sector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address {
    pub lba: u128,
    pub offset: u128,
}

/// Single value converted to bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    pub bytes: u128,
    /// Unit the value was given in
    pub unit: Unit,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Expression(Evaluation),
    Conversion(Conversion),
}

impl Outcome {
    pub fn bytes(&self) -> u128 {
        match self {
            Outcome::Expression(eval) => eval.bytes,
            Outcome::Conversion(conv) => conv.bytes,
        }
    }

    pub fn is_unit(&self) -> bool {
        match self {
            Outcome::Expression(eval) => eval.is_unit,
            Outcome::Conversion(_) => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    last: Option<LastResult>,
    sector_size: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            last: None,
            sector_size: DEFAULT_SECTOR_SIZE,
        }
    }
}

impl Session {
    pub fn new(sector_size: u64) -> std::result::Result<Self, GeometryError> {
        if sector_size == 0 {
            return Err(GeometryError::ZeroSectorSize);
        }
        Ok(Self {
            last: None,
            sector_size,
        })
    }

    pub fn sector_size(&self) -> u64 {
        self.sector_size
    }

    pub fn last_result(&self) -> Option<&LastResult> {
        self.last.as_ref()
    }

    /// Evaluate an expression, or convert it if it is a single value
    pub fn evaluate(&mut self, expr: &str) -> Result<Outcome> {
        let text = match normalize(expr)? {
            Normalized::SingleValue(value) if value == LAST_RESULT => {
                let last = self.last.ok_or(EvalError::NoStoredResult)?;
                return Ok(Outcome::Expression(Evaluation {
                    bytes: last.bytes,
                    is_unit: last.is_unit,
                    diagnostics: Vec::new(),
                }));
            }
            Normalized::SingleValue(value) => return self.convert(&value, None),
            Normalized::Expression(text) => text,
        };

        let tokens = tokenize(&text)?;
        let postfix = to_postfix(tokens)?;
        let eval = evaluate(postfix, self.last.as_ref())?;

        self.last = Some(LastResult {
            bytes: eval.bytes,
            is_unit: eval.is_unit,
        });
        tracing::debug!(bytes = %eval.bytes, is_unit = eval.is_unit, "stored result");

        Ok(Outcome::Expression(eval))
    }

    /// Convert a single value with an optional unit to bytes
    pub fn convert(&mut self, value: &str, unit: Option<&str>) -> Result<Outcome> {
        let (bytes, unit) = parse_quantity(value, unit)?;
        let address = self.address(bytes);

        self.last = Some(LastResult {
            bytes,
            is_unit: true,
        });
        tracing::debug!(bytes = %bytes, unit = %unit, "stored conversion");

        Ok(Outcome::Conversion(Conversion {
            bytes,
            unit,
            address,
        }))
    }

    /// Sector index and offset of a byte position
    pub fn address(&self, bytes: u128) -> Address {
        let sector_size = u128::from(self.sector_size);
        Address {
            lba: bytes / sector_size,
            offset: bytes % sector_size,
        }
    }

    /// Parse a number for base conversion, `r` reads the last result
    pub fn base_value(&self, text: &str) -> Result<u128> {
        let text = strip(text);
        if text.is_empty() {
            return Err(ValueError::InvalidToken(String::new()).into());
        }
        if text.starts_with('-') {
            return Err(ValueError::Negative.into());
        }
        if text == LAST_RESULT {
            return self
                .last
                .map(|last| last.bytes)
                .ok_or_else(|| EvalError::NoStoredResult.into());
        }
        Ok(parse_uint(text)?)
    }
}
