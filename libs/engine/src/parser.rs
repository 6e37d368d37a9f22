//! Infix to postfix conversion (shunting-yard)
//!
//! One operator stack, one output queue. Parentheses only steer the
//! conversion and never reach the output.

use std::collections::VecDeque;
use std::fmt;
use std::iter::Peekable;

use crate::error::SyntaxError;
use crate::token::{Operand, Operator, Paren, Token};

/// A single entry of the postfix queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostfixItem {
    Operand(Operand),
    Operator(Operator),
}

impl fmt::Display for PostfixItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostfixItem::Operand(operand) => write!(f, "{}", operand),
            PostfixItem::Operator(op) => write!(f, "{}", op),
        }
    }
}

/// Ordered postfix (reverse polish) queue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Postfix {
    items: VecDeque<PostfixItem>,
}

impl Postfix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, item: PostfixItem) {
        self.items.push_back(item);
    }

    pub fn dequeue(&mut self) -> Option<PostfixItem> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PostfixItem> {
        self.items.iter()
    }
}

impl FromIterator<PostfixItem> for Postfix {
    fn from_iter<I: IntoIterator<Item = PostfixItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Postfix {
    type Item = PostfixItem;
    type IntoIter = std::collections::vec_deque::IntoIter<PostfixItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl fmt::Display for Postfix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", item)?;
        }
        Ok(())
    }
}

/// Operator stack entry: a parenthesis blocks popping
#[derive(Debug, Clone, Copy)]
enum StackEntry {
    Open,
    Op(Operator),
}

/// Convert infix tokens to a postfix queue
pub fn to_postfix(tokens: Vec<Token>) -> Result<Postfix, SyntaxError> {
    let mut output = Postfix::new();
    let mut stack: Vec<StackEntry> = Vec::new();
    let mut balance: i32 = 0;
    let mut tokens = tokens.into_iter().peekable();

    while let Some(token) = tokens.next() {
        match token {
            Token::Operand(mut operand) => {
                if take_byte_suffix(&mut tokens) {
                    operand.is_unit = true;
                }
                output.enqueue(PostfixItem::Operand(operand));
            }
            Token::ByteSuffix => return Err(SyntaxError::StrayByteSuffix),
            Token::Paren(Paren::Open) => {
                balance += 1;
                stack.push(StackEntry::Open);
            }
            Token::Paren(Paren::Close) => {
                loop {
                    match stack.pop() {
                        Some(StackEntry::Op(op)) => output.enqueue(PostfixItem::Operator(op)),
                        Some(StackEntry::Open) => break,
                        None => return Err(SyntaxError::UnbalancedParens),
                    }
                }
                balance -= 1;
            }
            Token::Operator(op) => {
                while let Some(&StackEntry::Op(top)) = stack.last() {
                    if top.priority() < op.priority() {
                        break;
                    }
                    stack.pop();
                    output.enqueue(PostfixItem::Operator(top));
                }
                stack.push(StackEntry::Op(op));
            }
        }
    }

    while let Some(entry) = stack.pop() {
        match entry {
            StackEntry::Op(op) => output.enqueue(PostfixItem::Operator(op)),
            StackEntry::Open => return Err(SyntaxError::UnbalancedParens),
        }
    }

    if balance != 0 {
        return Err(SyntaxError::UnbalancedParens);
    }

    tracing::debug!(postfix = %output, "converted to postfix");

    Ok(output)
}

fn take_byte_suffix<I>(tokens: &mut Peekable<I>) -> bool
where
    I: Iterator<Item = Token>,
{
    if matches!(tokens.peek(), Some(Token::ByteSuffix)) {
        tokens.next();
        true
    } else {
        false
    }
}
