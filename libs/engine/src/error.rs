//! Error types for the storage calculator engine

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Malformed expression text, detected before any value is computed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("first brackets only")]
    InvalidBracket,

    #[error("negative token")]
    NegativeToken,

    #[error("unexpected letter '{0}' after operator")]
    UnexpectedLetter(char),

    #[error("invalid operator {0}")]
    InvalidShift(String),

    #[error("adjacent operators {0}{1}")]
    AdjacentOperators(char, char),

    #[error("invalid token terminator in '{0}'")]
    MultiCharOperator(String),

    #[error("byte suffix without a value")]
    StrayByteSuffix,

    #[error("unbalanced expression")]
    UnbalancedParens,

    #[error("empty expression")]
    EmptyExpression,
}

/// A single operand that cannot be turned into a byte count
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("invalid token '{0}'")]
    InvalidToken(String),

    #[error("unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("value '{0}' exceeds 128 bits")]
    Overflow(String),

    #[error("N must be >= 0")]
    Negative,
}

/// Failure while applying operators to the postfix queue
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error(transparent)]
    Value(#[from] ValueError),

    #[error("unit mismatch in {op}")]
    UnitMismatch { op: &'static str },

    #[error("division by 0")]
    DivisionByZero,

    #[error("negative result")]
    NegativeResult,

    #[error("invalid expression")]
    InvalidExpression,

    #[error("missing operand for {op}")]
    MissingOperand { op: &'static str },

    #[error("overflow in {op}")]
    Overflow { op: &'static str },

    #[error("no result stored")]
    NoStoredResult,

    #[error("nothing to evaluate")]
    EmptyExpression,
}

/// Invalid CHS / LBA conversion input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("CHS missing")]
    MissingChs,

    #[error("LBA missing")]
    MissingLba,

    #[error("invalid geometry component '{0}'")]
    InvalidComponent(String),

    #[error("invalid input")]
    InvalidInput,

    #[error("MAX_HEAD = 0")]
    ZeroMaxHead,

    #[error("MAX_SECTOR = 0")]
    ZeroMaxSector,

    #[error("S = 0")]
    ZeroSector,

    #[error("H > MAX_HEAD")]
    HeadOutOfRange,

    #[error("S > MAX_SECTOR")]
    SectorOutOfRange,

    #[error("sector size must be > 0")]
    ZeroSectorSize,

    #[error("LBA exceeds 128 bits")]
    Overflow,
}

/// Any engine error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Value(#[from] ValueError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
