//! Infix to postfix conversion (shunting-yard).

use crate::error::ParseError;
use crate::expr::OpType;
use crate::lexer::Token;

#[derive(Clone, Copy)]
enum Pending {
    Op(OpType),
    LParen,
}

/// Reorders `tokens` into postfix order. Parentheses are consumed.
///
/// While the operator on top of the stack binds tighter than the incoming
/// one (or equally tight, with the incoming one left-associative) it is
/// moved to the output. A `)` also releases a prefix operator exposed by
/// removing its `(`, so `sin(x)` yields `x sin`.
///
/// # Errors
///
/// Returns [`ParseError::UnbalancedParens`] for a stray `(` or `)`.
pub fn to_postfix(tokens: Vec<Token>) -> Result<Vec<Token>, ParseError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Pending> = Vec::new();

    for token in tokens {
        match token {
            Token::Number(_) | Token::Ident(_) => output.push(token),
            Token::Op(op) => {
                while let Some(&Pending::Op(top)) = stack.last() {
                    let pops = top.precedence() > op.precedence()
                        || (top.precedence() == op.precedence() && op.is_left_assoc());
                    if !pops {
                        break;
                    }
                    stack.pop();
                    output.push(Token::Op(top));
                }
                stack.push(Pending::Op(op));
            }
            Token::LParen => stack.push(Pending::LParen),
            Token::RParen => {
                loop {
                    match stack.pop() {
                        Some(Pending::Op(op)) => output.push(Token::Op(op)),
                        Some(Pending::LParen) => break,
                        None => return Err(ParseError::UnbalancedParens),
                    }
                }
                if let Some(&Pending::Op(op)) = stack.last() {
                    if op.is_unary() {
                        stack.pop();
                        output.push(Token::Op(op));
                    }
                }
            }
        }
    }

    while let Some(pending) = stack.pop() {
        match pending {
            Pending::Op(op) => output.push(Token::Op(op)),
            Pending::LParen => return Err(ParseError::UnbalancedParens),
        }
    }

    Ok(output)
}
