//! Numeric values and variable bindings.
//!
//! A [`Value`] is exact (an integer or a rational) or approximate (a
//! float). Combining an exact value with a float yields a float; two exact
//! values stay exact, with integral rationals demoted to integers. Any
//! operation whose result is generally irrational yields a float.

use std::fmt;

use rustc_hash::FxHashMap;
use symdag_rational::Rational;

use crate::error::EvalError;
use crate::expr::OpType;

/// A numeric value carried by constants and produced by evaluation.
///
/// `Rational` never holds an integral value; see [`Value::from_rational`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    /// An exact integer.
    Int(i64),
    /// An exact, non-integral rational.
    Rational(Rational),
    /// A floating approximation.
    Float(f64),
}

enum Operands {
    Exact(Rational, Rational),
    Float(f64, f64),
}

impl Value {
    /// Wraps a rational, demoting it to `Int` when its denominator is 1.
    #[must_use]
    pub fn from_rational(r: Rational) -> Self {
        if r.is_integer() {
            Value::Int(r.numerator())
        } else {
            Value::Rational(r)
        }
    }

    /// Returns true for `Int` and `Rational`.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        !matches!(self, Value::Float(_))
    }

    /// The exact value, if there is one.
    #[must_use]
    pub fn as_rational(&self) -> Option<Rational> {
        match *self {
            Value::Int(n) => Some(Rational::from_integer(n)),
            Value::Rational(r) => Some(r),
            Value::Float(_) => None,
        }
    }

    /// Converts to the nearest `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_f64(&self) -> f64 {
        match *self {
            Value::Int(n) => n as f64,
            Value::Rational(r) => r.to_f64(),
            Value::Float(x) => x,
        }
    }

    /// Converts to `Float`.
    #[must_use]
    pub fn to_float(self) -> Self {
        Value::Float(self.to_f64())
    }

    /// Returns true for exact zero and `±0.0`.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match *self {
            Value::Int(n) => n == 0,
            Value::Rational(_) => false,
            Value::Float(x) => x == 0.0,
        }
    }

    /// Returns true for exact one and `1.0`.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_one(&self) -> bool {
        match *self {
            Value::Int(n) => n == 1,
            Value::Rational(_) => false,
            Value::Float(x) => x == 1.0,
        }
    }

    /// Returns true if the value is strictly below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        match *self {
            Value::Int(n) => n < 0,
            Value::Rational(r) => r.is_negative(),
            Value::Float(x) => x < 0.0,
        }
    }

    fn operands(self, rhs: Self) -> Operands {
        match (self.as_rational(), rhs.as_rational()) {
            (Some(a), Some(b)) => Operands::Exact(a, b),
            _ => Operands::Float(self.to_f64(), rhs.to_f64()),
        }
    }

    /// Adds two values.
    ///
    /// # Errors
    ///
    /// Fails if exact arithmetic overflows.
    pub fn try_add(self, rhs: Self) -> Result<Self, EvalError> {
        match self.operands(rhs) {
            Operands::Exact(a, b) => Ok(Self::from_rational(a.try_add(b)?)),
            Operands::Float(a, b) => Ok(Value::Float(a + b)),
        }
    }

    /// Subtracts `rhs` from `self`.
    ///
    /// # Errors
    ///
    /// Fails if exact arithmetic overflows.
    pub fn try_sub(self, rhs: Self) -> Result<Self, EvalError> {
        match self.operands(rhs) {
            Operands::Exact(a, b) => Ok(Self::from_rational(a.try_sub(b)?)),
            Operands::Float(a, b) => Ok(Value::Float(a - b)),
        }
    }

    /// Multiplies two values.
    ///
    /// # Errors
    ///
    /// Fails if exact arithmetic overflows.
    pub fn try_mul(self, rhs: Self) -> Result<Self, EvalError> {
        match self.operands(rhs) {
            Operands::Exact(a, b) => Ok(Self::from_rational(a.try_mul(b)?)),
            Operands::Float(a, b) => Ok(Value::Float(a * b)),
        }
    }

    /// Divides `self` by `rhs`.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::DivisionByZero`] if `rhs` is zero in either
    /// mode, and fails if exact arithmetic overflows.
    pub fn try_div(self, rhs: Self) -> Result<Self, EvalError> {
        match self.operands(rhs) {
            Operands::Exact(a, b) => Ok(Self::from_rational(a.try_div(b)?)),
            Operands::Float(_, b) if b == 0.0 => Err(EvalError::DivisionByZero),
            Operands::Float(a, b) => Ok(Value::Float(a / b)),
        }
    }

    /// Raises `self` to `rhs`.
    ///
    /// The result is exact when both operands are exact and the exponent
    /// is an integer in `i32` range; otherwise it is a float.
    ///
    /// # Errors
    ///
    /// Fails for an exact zero raised to a negative power, and if exact
    /// arithmetic overflows.
    pub fn try_pow(self, rhs: Self) -> Result<Self, EvalError> {
        if let (Some(base), Value::Int(exp)) = (self.as_rational(), rhs) {
            if let Ok(exp) = i32::try_from(exp) {
                return Ok(Self::from_rational(base.try_pow(exp)?));
            }
        }
        Ok(Value::Float(self.to_f64().powf(rhs.to_f64())))
    }

    /// Negates the value.
    ///
    /// # Errors
    ///
    /// Fails if the exact negation overflows.
    pub fn try_neg(self) -> Result<Self, EvalError> {
        match self.as_rational() {
            Some(r) => Ok(Self::from_rational(r.try_neg()?)),
            None => Ok(Value::Float(-self.to_f64())),
        }
    }

    /// Absolute value.
    ///
    /// # Errors
    ///
    /// Fails if the exact result overflows.
    pub fn try_abs(self) -> Result<Self, EvalError> {
        match self.as_rational() {
            Some(r) => Ok(Self::from_rational(r.try_abs()?)),
            None => Ok(Value::Float(self.to_f64().abs())),
        }
    }

    /// Applies a unary operator.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::Arity`] for a binary operator, and fails as the
    /// individual operation does.
    pub fn apply_unary(self, op: OpType) -> Result<Self, EvalError> {
        let x = self.to_f64();
        let result = match op {
            OpType::Neg => return self.try_neg(),
            OpType::Abs => return self.try_abs(),
            OpType::Sin => x.sin(),
            OpType::Cos => x.cos(),
            OpType::Tan => x.tan(),
            OpType::Log => x.ln(),
            OpType::Exp => x.exp(),
            OpType::Sqrt => x.sqrt(),
            OpType::Add | OpType::Sub | OpType::Mul | OpType::Div | OpType::Pow => {
                return Err(EvalError::Arity {
                    op,
                    expected: op.arity(),
                    found: 1,
                })
            }
        };
        Ok(Value::Float(result))
    }

    /// Applies a binary operator.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::Arity`] for a unary operator, and fails as the
    /// individual operation does.
    pub fn apply_binary(op: OpType, lhs: Self, rhs: Self) -> Result<Self, EvalError> {
        match op {
            OpType::Add => lhs.try_add(rhs),
            OpType::Sub => lhs.try_sub(rhs),
            OpType::Mul => lhs.try_mul(rhs),
            OpType::Div => lhs.try_div(rhs),
            OpType::Pow => lhs.try_pow(rhs),
            _ => Err(EvalError::Arity {
                op,
                expected: op.arity(),
                found: 2,
            }),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Int(0)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<Rational> for Value {
    fn from(r: Rational) -> Self {
        Value::from_rational(r)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Rational(r) => write!(f, "{r}"),
            // Integral floats keep a decimal point so they read back as numbers.
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e15 => {
                write!(f, "{x:.1}")
            }
            Value::Float(x) => write!(f, "{x}"),
        }
    }
}

/// Resolves the named mathematical constants `pi`, `PI`, `e`, `tau`, `TAU`.
#[must_use]
pub fn named_constant(name: &str) -> Option<f64> {
    match name {
        "pi" | "PI" => Some(std::f64::consts::PI),
        "e" => Some(std::f64::consts::E),
        "tau" | "TAU" => Some(std::f64::consts::TAU),
        _ => None,
    }
}

/// Variable values supplied to one evaluation.
#[derive(Clone, Debug, Default)]
pub struct Bindings(FxHashMap<String, Value>);

impl Bindings {
    /// Creates an empty set of bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a binding, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Binds `name`, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    /// Looks up a binding.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.get(name).copied()
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the bindings in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Value)> + '_ {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bindings = Bindings::new();
        for (name, value) in iter {
            bindings.insert(name, value);
        }
        bindings
    }
}
