//! Token types for the expression lexer
//!
//! Every whitespace-delimited piece of a normalized expression is classified
//! into exactly one [`Token`] variant. Downstream stages match on the variant
//! and never look at raw characters again.

use std::fmt;

/// Text of the operand that stands for the last stored result
pub const LAST_RESULT: &str = "r";

/// A lexical element of a storage expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Number with an optional unit suffix, or `r`
    Operand(Operand),
    Operator(Operator),
    Paren(Paren),
    /// A standalone `b` marking the preceding operand as a byte count
    ByteSuffix,
}

impl Token {
    pub fn operand(text: impl Into<String>) -> Self {
        Token::Operand(Operand::new(text))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Operand(operand) => write!(f, "{}", operand),
            Token::Operator(op) => write!(f, "{}", op),
            Token::Paren(Paren::Open) => write!(f, "("),
            Token::Paren(Paren::Close) => write!(f, ")"),
            Token::ByteSuffix => write!(f, "b"),
        }
    }
}

/// An operand as it travels through the postfix queue and value stack
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Operand {
    pub text: String,
    /// Known to represent a byte quantity
    pub is_unit: bool,
}

impl Operand {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_unit: false,
        }
    }

    pub fn with_unit(text: impl Into<String>, is_unit: bool) -> Self {
        Self {
            text: text.into(),
            is_unit,
        }
    }

    pub fn is_last_result(&self) -> bool {
        self.text == LAST_RESULT
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unit {
            write!(f, "{} b", self.text)
        } else {
            write!(f, "{}", self.text)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paren {
    Open,
    Close,
}

/// Binary operators, all left-associative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Or,         // |
    Xor,        // ^
    And,        // &
    ShiftLeft,  // <<
    ShiftRight, // >>
    Add,        // +
    Subtract,   // -
    Multiply,   // *
    Divide,     // /
    Modulo,     // %
}

impl Operator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "|" => Operator::Or,
            "^" => Operator::Xor,
            "&" => Operator::And,
            "<<" => Operator::ShiftLeft,
            ">>" => Operator::ShiftRight,
            "+" => Operator::Add,
            "-" => Operator::Subtract,
            "*" => Operator::Multiply,
            "/" => Operator::Divide,
            "%" => Operator::Modulo,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Or => "|",
            Operator::Xor => "^",
            Operator::And => "&",
            Operator::ShiftLeft => "<<",
            Operator::ShiftRight => ">>",
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Modulo => "%",
        }
    }

    /// Binding strength, higher binds tighter
    pub fn priority(self) -> u8 {
        match self {
            Operator::Or => 1,
            Operator::Xor => 2,
            Operator::And => 3,
            Operator::ShiftLeft | Operator::ShiftRight => 4,
            Operator::Add | Operator::Subtract => 5,
            Operator::Multiply | Operator::Divide | Operator::Modulo => 6,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Characters that may form an operator or parenthesis
pub fn is_operator_char(c: char) -> bool {
    matches!(
        c,
        '+' | '-' | '*' | '/' | '%' | '<' | '>' | '&' | '|' | '^' | '(' | ')'
    )
}

/// Operator characters excluding parentheses
pub fn is_sign_char(c: char) -> bool {
    is_operator_char(c) && c != '(' && c != ')'
}
