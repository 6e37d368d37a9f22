//! Expression normalizer and lexer
//!
//! Raw user input is first rewritten into a canonical form where every
//! operator and operand is separated by exactly one space, then split and
//! classified into [`Token`]s.
//!
//! Rules applied by [`normalize`]:
//! - surrounding whitespace and quote characters are dropped
//! - inner whitespace is removed, except a space in front of a `b`/`B` byte
//!   suffix
//! - `{ } [ ]` are rejected, only parentheses group
//! - `-` after an operator or `(` is rejected (no unary minus)
//! - a letter right after an operator must be the last-result operand `r`
//! - shifts are written `<<` / `>>`, a lone `<` or `>` is rejected

use crate::error::SyntaxError;
use crate::token::{is_operator_char, is_sign_char, Operator, Paren, Token};

/// Outcome of normalizing an input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// Separator-delimited expression ready for [`tokenize`]
    Expression(String),
    /// No separator at all: a single value for unit conversion
    SingleValue(String),
}

impl Normalized {
    pub fn as_str(&self) -> &str {
        match self {
            Normalized::Expression(s) | Normalized::SingleValue(s) => s,
        }
    }
}

fn is_trim_char(c: char) -> bool {
    c.is_whitespace() || c == '"' || c == '\''
}

/// Strip surrounding whitespace and quotes
pub fn strip(input: &str) -> &str {
    input.trim_matches(is_trim_char)
}

/// Drop inner whitespace, keeping one space in front of a `b`/`B` suffix
fn remove_inner_spaces(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(chars.len());
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_whitespace() {
            out.push(c);
        } else if matches!(chars.get(i + 1).copied(), Some('b' | 'B')) {
            out.push(' ');
        }
    }
    out
}

fn is_shift_char(c: char) -> bool {
    c == '<' || c == '>'
}

/// Rewrite `expr` so every token is separated by a single space
pub fn normalize(expr: &str) -> Result<Normalized, SyntaxError> {
    let compact = remove_inner_spaces(strip(expr));
    if compact.is_empty() {
        return Err(SyntaxError::EmptyExpression);
    }

    let chars: Vec<char> = compact.chars().collect();
    let mut out = String::with_capacity(chars.len() * 2);
    let mut prev = '(';

    for (i, &cur) in chars.iter().enumerate() {
        let next = chars.get(i + 1).copied();

        if matches!(cur, '{' | '}' | '[' | ']') {
            return Err(SyntaxError::InvalidBracket);
        }

        if cur == '-' && (is_sign_char(prev) || prev == '(') {
            return Err(SyntaxError::NegativeToken);
        }

        if let Some(n) = next {
            if is_operator_char(cur) && n.is_alphabetic() && n != 'r' {
                return Err(SyntaxError::UnexpectedLetter(n));
            }
        }

        let mut glued = false;
        if is_shift_char(cur) {
            if prev != cur && next != Some(cur) {
                return Err(SyntaxError::InvalidShift(cur.to_string()));
            }
            if prev == cur && next == Some(cur) {
                return Err(SyntaxError::InvalidShift(format!("{cur}{cur}{cur}")));
            }
            // first half of << or >>
            glued = next == Some(cur) && prev != cur;
        }

        if let Some(n) = next {
            if is_sign_char(cur) && is_sign_char(n) && n != '-' && !glued {
                return Err(SyntaxError::AdjacentOperators(cur, n));
            }
        }

        out.push(cur);

        if let Some(n) = next {
            let boundary = is_operator_char(cur) || is_operator_char(n);
            if boundary && !glued && !cur.is_whitespace() && !n.is_whitespace() {
                out.push(' ');
            }
        }

        prev = cur;
    }

    tracing::debug!(normalized = %out, "normalized expression");

    if out.contains(' ') {
        Ok(Normalized::Expression(out))
    } else {
        Ok(Normalized::SingleValue(out))
    }
}

/// Split a normalized expression and classify every piece
pub fn tokenize(normalized: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut tokens = Vec::new();

    for piece in normalized.split_whitespace() {
        let token = match piece {
            "(" => Token::Paren(Paren::Open),
            ")" => Token::Paren(Paren::Close),
            "b" | "B" => Token::ByteSuffix,
            _ if piece.chars().all(is_operator_char) => Operator::from_symbol(piece)
                .map(Token::Operator)
                .ok_or_else(|| SyntaxError::MultiCharOperator(piece.to_string()))?,
            _ => Token::operand(piece),
        };
        tokens.push(token);
    }

    if tokens.is_empty() {
        return Err(SyntaxError::EmptyExpression);
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(input: &str) -> String {
        match normalize(input).unwrap() {
            Normalized::Expression(s) => s,
            Normalized::SingleValue(s) => panic!("expected expression, got single value {s}"),
        }
    }

    #[test]
    fn test_strip_quotes_and_spaces() {
        assert_eq!(strip("  '1 KiB'\n"), "1 KiB");
        assert_eq!(strip("\"42\""), "42");
    }

    #[test]
    fn test_remove_inner_spaces_keeps_byte_suffix() {
        assert_eq!(remove_inner_spaces("1 KiB +   512 b"), "1KiB+512 b");
        assert_eq!(remove_inner_spaces("0x10  b"), "0x10 b");
        assert_eq!(remove_inner_spaces("(1 + 2)  B"), "(1+2) B");
    }

    #[test]
    fn test_spacing() {
        assert_eq!(expr("1KiB+512b"), "1KiB + 512b");
        assert_eq!(expr("(1+2)*3"), "( 1 + 2 ) * 3");
        assert_eq!(expr("r*2"), "r * 2");
    }

    #[test]
    fn test_shift_stays_glued() {
        assert_eq!(expr("1<<2"), "1 << 2");
        assert_eq!(expr("0x100 >> 4"), "0x100 >> 4");
    }
}
