//! Tokenizer for infix expression text.
//!
//! Whitespace separates tokens. Each of `+ - * / ^ ( )` is a token of its
//! own; any other run of characters is one word, classified as a number,
//! a function name or a variable.

use symdag_rational::Rational;
use tracing::trace;

use crate::error::ParseError;
use crate::expr::OpType;
use crate::value::Value;

/// A lexical token.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    /// A numeric literal.
    Number(Value),
    /// A variable name.
    Ident(String),
    /// An operator or function name. `-` is already resolved to
    /// [`OpType::Neg`] where it cannot be binary.
    Op(OpType),
    /// `(`
    LParen,
    /// `)`
    RParen,
}

/// Splits `input` into tokens.
///
/// # Errors
///
/// Returns [`ParseError::UnknownToken`] for a word that is neither a
/// number nor an identifier.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut word_start: Option<usize> = None;

    for (i, c) in input.char_indices() {
        let is_separator = c.is_whitespace() || is_operator_char(c) || c == '(' || c == ')';
        if !is_separator {
            word_start.get_or_insert(i);
            continue;
        }

        if let Some(start) = word_start.take() {
            tokens.push(classify(&input[start..i])?);
        }

        match c {
            '(' => tokens.push(Token::LParen),
            ')' => tokens.push(Token::RParen),
            '-' if can_negate(tokens.last()) => tokens.push(Token::Op(OpType::Neg)),
            c if is_operator_char(c) => {
                let mut buf = [0u8; 4];
                if let Some(op) = OpType::from_token(c.encode_utf8(&mut buf)) {
                    tokens.push(Token::Op(op));
                }
            }
            _ => {}
        }
    }

    if let Some(start) = word_start {
        tokens.push(classify(&input[start..])?);
    }

    trace!(count = tokens.len(), "tokenized expression");
    Ok(tokens)
}

fn is_operator_char(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '^')
}

// A `-` is a negation at the start, after `(`, or after another operator.
fn can_negate(previous: Option<&Token>) -> bool {
    matches!(previous, None | Some(Token::LParen | Token::Op(_)))
}

fn classify(word: &str) -> Result<Token, ParseError> {
    let first = word.chars().next().unwrap_or(' ');

    if first.is_ascii_digit() || first == '.' {
        return parse_number(word)
            .map(Token::Number)
            .ok_or_else(|| ParseError::UnknownToken(word.to_owned()));
    }

    if is_identifier(word) {
        return Ok(match OpType::from_function_name(word) {
            Some(op) => Token::Op(op),
            None => Token::Ident(word.to_owned()),
        });
    }

    Err(ParseError::UnknownToken(word.to_owned()))
}

fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parses a digit sequence with at most one decimal point.
///
/// Integers become `Int`; decimals become exact rationals when numerator
/// and denominator fit in `i64`. Anything too large falls back to a float.
fn parse_number(word: &str) -> Option<Value> {
    let (int_part, frac_part) = match word.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (word, None),
    };

    let digits_ok = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !digits_ok(int_part) || !frac_part.map_or(true, digits_ok) {
        return None;
    }
    if int_part.is_empty() && frac_part.map_or(true, str::is_empty) {
        return None;
    }

    let exact = match frac_part {
        None => int_part.parse::<i64>().ok().map(Value::Int),
        Some(frac) => decimal_to_rational(int_part, frac).map(Value::from_rational),
    };

    exact.or_else(|| word.parse::<f64>().ok().map(Value::Float))
}

fn decimal_to_rational(int_part: &str, frac: &str) -> Option<Rational> {
    let scale = 10_i64.checked_pow(u32::try_from(frac.len()).ok()?)?;
    let digits: String = int_part.chars().chain(frac.chars()).collect();
    let numerator = if digits.is_empty() { 0 } else { digits.parse::<i64>().ok()? };
    Rational::new(numerator, scale).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(s: &str) -> Token {
        Token::Ident(s.to_owned())
    }

    fn int(n: i64) -> Token {
        Token::Number(Value::Int(n))
    }

    #[test]
    fn test_operators_split_words() {
        let tokens = tokenize("a+b*(c-2)").unwrap();
        assert_eq!(
            tokens,
            vec![
                ident("a"),
                Token::Op(OpType::Add),
                ident("b"),
                Token::Op(OpType::Mul),
                Token::LParen,
                ident("c"),
                Token::Op(OpType::Sub),
                int(2),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_whitespace_is_discarded() {
        assert_eq!(tokenize("  x \t+\n 1 ").unwrap().len(), 3);
        assert!(tokenize("   ").unwrap().is_empty());
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(tokenize("-x").unwrap()[0], Token::Op(OpType::Neg));
        assert_eq!(tokenize("(-x)").unwrap()[1], Token::Op(OpType::Neg));
        assert_eq!(tokenize("2*-x").unwrap()[2], Token::Op(OpType::Neg));
        assert_eq!(tokenize("x - -y").unwrap()[1..3], [Token::Op(OpType::Sub), Token::Op(OpType::Neg)]);
        assert_eq!(tokenize("sin -x").unwrap()[1], Token::Op(OpType::Neg));
        assert_eq!(tokenize("(x)-y").unwrap()[3], Token::Op(OpType::Sub));
    }

    #[test]
    fn test_functions_and_identifiers() {
        assert_eq!(tokenize("sqrt(x_1)").unwrap()[0], Token::Op(OpType::Sqrt));
        assert_eq!(tokenize("x_1").unwrap()[0], ident("x_1"));
        assert_eq!(tokenize("sine").unwrap()[0], ident("sine"));
        // Negation is only reachable through `-`
        assert_eq!(tokenize("neg").unwrap()[0], ident("neg"));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(tokenize("42").unwrap()[0], int(42));
        assert_eq!(
            tokenize("2.5").unwrap()[0],
            Token::Number(Value::from_rational(Rational::new(5, 2).unwrap()))
        );
        assert_eq!(tokenize("3.0").unwrap()[0], int(3));
        assert_eq!(
            tokenize(".25").unwrap()[0],
            Token::Number(Value::from_rational(Rational::new(1, 4).unwrap()))
        );
        assert_eq!(
            tokenize("99999999999999999999").unwrap()[0],
            Token::Number(Value::Float(1e20))
        );
    }

    #[test]
    fn test_unknown_tokens() {
        assert_eq!(tokenize("x$"), Err(ParseError::UnknownToken("x$".into())));
        assert_eq!(tokenize("1.2.3"), Err(ParseError::UnknownToken("1.2.3".into())));
        assert_eq!(tokenize("2x"), Err(ParseError::UnknownToken("2x".into())));
        assert_eq!(tokenize("."), Err(ParseError::UnknownToken(".".into())));
    }
}
