//! Error type for rational arithmetic.

use thiserror::Error;

/// Errors produced by rational construction, parsing and arithmetic.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RationalError {
    /// A fraction was constructed with a zero denominator.
    #[error("denominator cannot be zero")]
    ZeroDenominator,

    /// An intermediate or final value left the `i64` range.
    #[error("integer overflow in rational {op}")]
    Overflow {
        /// The operation that overflowed.
        op: &'static str,
    },

    /// Division by (or reciprocal of) a zero rational.
    #[error("division by zero")]
    DivisionByZero,

    /// The text was not of the form `[-]a` or `[-]a/b`.
    #[error("malformed rational literal {0:?}")]
    Parse(String),

    /// NaN or an infinity was given to the approximator.
    #[error("cannot approximate a non-finite value")]
    NotFinite,
}
