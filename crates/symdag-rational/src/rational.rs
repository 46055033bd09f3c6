//! Overflow-checked rational numbers.
//!
//! This module provides exact fraction arithmetic bounded by `i64`. Every
//! operation that could leave that range has a `try_*` form returning
//! [`RationalError::Overflow`]; the `std::ops` forms panic instead, the same
//! way primitive integer arithmetic does on overflow.

use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, CheckedSub, One, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use crate::approx::{stern_brocot, ApproxConfig};
use crate::error::RationalError;

/// A rational number `numerator / denominator` over `i64`.
///
/// Always stored in lowest terms with a positive denominator; the sign
/// lives on the numerator.
#[derive(Clone, Copy)]
pub struct Rational {
    num: i64,
    den: i64,
}

impl Rational {
    /// The rational zero.
    pub const ZERO: Self = Self { num: 0, den: 1 };
    /// The rational one.
    pub const ONE: Self = Self { num: 1, den: 1 };

    /// Creates a normalized rational from a numerator and denominator.
    ///
    /// # Errors
    ///
    /// Returns [`RationalError::ZeroDenominator`] if `den == 0`, or
    /// [`RationalError::Overflow`] if the normalized fraction does not fit
    /// in `i64` (only possible for `i64::MIN` inputs).
    pub fn new(num: i64, den: i64) -> Result<Self, RationalError> {
        if den == 0 {
            return Err(RationalError::ZeroDenominator);
        }
        Self::from_wide(i128::from(num), i128::from(den), "normalization")
    }

    /// Creates a rational from an integer (denominator = 1).
    #[must_use]
    pub const fn from_integer(n: i64) -> Self {
        Self { num: n, den: 1 }
    }

    /// Approximates a floating value with the default [`ApproxConfig`].
    ///
    /// # Errors
    ///
    /// See [`stern_brocot`].
    pub fn approximate(value: f64) -> Result<Self, RationalError> {
        Self::approximate_with(value, &ApproxConfig::default())
    }

    /// Approximates a floating value by the simplest fraction within the
    /// configured tolerance.
    ///
    /// # Errors
    ///
    /// See [`stern_brocot`].
    pub fn approximate_with(value: f64, config: &ApproxConfig) -> Result<Self, RationalError> {
        let (num, den) = stern_brocot(value, config)?;
        Self::new(num, den)
    }

    // Reduces a wide fraction; `den` must be non-zero.
    fn from_wide(num: i128, den: i128, op: &'static str) -> Result<Self, RationalError> {
        if num == 0 {
            return Ok(Self::ZERO);
        }

        let g = gcd(num.unsigned_abs(), den.unsigned_abs());
        // g divides both magnitudes, which are at most 2^127
        let g = i128::try_from(g).map_err(|_| RationalError::Overflow { op })?;
        let (mut n, mut d) = (num / g, den / g);
        if d < 0 {
            n = -n;
            d = -d;
        }

        match (i64::try_from(n), i64::try_from(d)) {
            (Ok(num), Ok(den)) => Ok(Self { num, den }),
            _ => Err(RationalError::Overflow { op }),
        }
    }

    /// Returns the numerator (carries the sign).
    #[must_use]
    pub const fn numerator(&self) -> i64 {
        self.num
    }

    /// Returns the denominator (always positive).
    #[must_use]
    pub const fn denominator(&self) -> i64 {
        self.den
    }

    /// Returns `(numerator, denominator)`.
    #[must_use]
    pub const fn pair(&self) -> (i64, i64) {
        (self.num, self.den)
    }

    /// Returns true if the denominator is 1.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        self.den == 1
    }

    /// Returns true if this is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.num == 0
    }

    /// Returns true if negative.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.num < 0
    }

    /// Returns the sign: -1, 0, or 1.
    #[must_use]
    pub const fn signum(&self) -> i64 {
        self.num.signum()
    }

    /// Integer part, truncated toward zero.
    #[must_use]
    pub const fn trunc(&self) -> i64 {
        self.num / self.den
    }

    /// Converts to the nearest `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Checked addition: `a/b + c/d = (ad + bc) / bd`.
    ///
    /// # Errors
    ///
    /// Returns [`RationalError::Overflow`] if any cross-product or the sum
    /// leaves the `i64` range.
    pub fn try_add(self, rhs: Self) -> Result<Self, RationalError> {
        const OP: &str = "addition";
        let ad = checked_mul(self.num, rhs.den, OP)?;
        let bc = checked_mul(self.den, rhs.num, OP)?;
        let bd = checked_mul(self.den, rhs.den, OP)?;
        let n = ad.checked_add(bc).ok_or(RationalError::Overflow { op: OP })?;
        Self::from_wide(i128::from(n), i128::from(bd), OP)
    }

    /// Checked subtraction: `a/b - c/d = (ad - bc) / bd`.
    ///
    /// # Errors
    ///
    /// Returns [`RationalError::Overflow`] on `i64` overflow.
    pub fn try_sub(self, rhs: Self) -> Result<Self, RationalError> {
        const OP: &str = "subtraction";
        let ad = checked_mul(self.num, rhs.den, OP)?;
        let bc = checked_mul(self.den, rhs.num, OP)?;
        let bd = checked_mul(self.den, rhs.den, OP)?;
        let n = ad.checked_sub(bc).ok_or(RationalError::Overflow { op: OP })?;
        Self::from_wide(i128::from(n), i128::from(bd), OP)
    }

    /// Checked multiplication.
    ///
    /// # Errors
    ///
    /// Returns [`RationalError::Overflow`] on `i64` overflow.
    pub fn try_mul(self, rhs: Self) -> Result<Self, RationalError> {
        const OP: &str = "multiplication";
        let n = checked_mul(self.num, rhs.num, OP)?;
        let d = checked_mul(self.den, rhs.den, OP)?;
        Self::from_wide(i128::from(n), i128::from(d), OP)
    }

    /// Checked division.
    ///
    /// # Errors
    ///
    /// Returns [`RationalError::DivisionByZero`] if `rhs` is zero, or
    /// [`RationalError::Overflow`] on `i64` overflow.
    pub fn try_div(self, rhs: Self) -> Result<Self, RationalError> {
        const OP: &str = "division";
        if rhs.is_zero() {
            return Err(RationalError::DivisionByZero);
        }
        let n = checked_mul(self.num, rhs.den, OP)?;
        let d = checked_mul(self.den, rhs.num, OP)?;
        Self::from_wide(i128::from(n), i128::from(d), OP)
    }

    /// Checked negation.
    ///
    /// # Errors
    ///
    /// Returns [`RationalError::Overflow`] for a numerator of `i64::MIN`.
    pub fn try_neg(self) -> Result<Self, RationalError> {
        let num = self
            .num
            .checked_neg()
            .ok_or(RationalError::Overflow { op: "negation" })?;
        Ok(Self { num, den: self.den })
    }

    /// Checked absolute value.
    ///
    /// # Errors
    ///
    /// Returns [`RationalError::Overflow`] for a numerator of `i64::MIN`.
    pub fn try_abs(self) -> Result<Self, RationalError> {
        if self.num < 0 {
            self.try_neg()
        } else {
            Ok(self)
        }
    }

    /// Checked reciprocal (1/x).
    ///
    /// # Errors
    ///
    /// Returns [`RationalError::DivisionByZero`] if this is zero.
    pub fn try_recip(self) -> Result<Self, RationalError> {
        if self.is_zero() {
            return Err(RationalError::DivisionByZero);
        }
        Self::from_wide(i128::from(self.den), i128::from(self.num), "reciprocal")
    }

    /// Checked integer power; negative exponents take the reciprocal first.
    ///
    /// # Errors
    ///
    /// Returns [`RationalError::DivisionByZero`] for a negative power of
    /// zero, or [`RationalError::Overflow`] on `i64` overflow.
    pub fn try_pow(self, exp: i32) -> Result<Self, RationalError> {
        const OP: &str = "exponentiation";
        let base = if exp < 0 { self.try_recip()? } else { self };
        let e = exp.unsigned_abs();
        // Powers of coprime integers stay coprime, so no re-normalization.
        let num = base
            .num
            .checked_pow(e)
            .ok_or(RationalError::Overflow { op: OP })?;
        let den = base
            .den
            .checked_pow(e)
            .ok_or(RationalError::Overflow { op: OP })?;
        Ok(Self { num, den })
    }

    fn cross(&self, other: &Self) -> (i128, i128) {
        (
            i128::from(self.num) * i128::from(other.den),
            i128::from(other.num) * i128::from(self.den),
        )
    }
}

fn checked_mul(a: i64, b: i64, op: &'static str) -> Result<i64, RationalError> {
    a.checked_mul(b).ok_or(RationalError::Overflow { op })
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl Default for Rational {
    fn default() -> Self {
        Self::ZERO
    }
}

// Equality cross-multiplies so it stays correct even for values that did
// not come through normalization; the 128-bit products cannot overflow.
impl PartialEq for Rational {
    fn eq(&self, other: &Self) -> bool {
        let (l, r) = self.cross(other);
        l == r
    }
}

impl Eq for Rational {}

impl Hash for Rational {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.num.hash(state);
        self.den.hash(state);
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        let (l, r) = self.cross(other);
        l.cmp(&r)
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rational({self})")
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl FromStr for Rational {
    type Err = RationalError;

    /// Parses `"[-]a"` or `"[-]a/b"`. Spaces anywhere are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let malformed = || RationalError::Parse(s.to_string());

        let (negative, body) = match compact.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, compact.as_str()),
        };

        let (num_text, den_text) = match body.split_once('/') {
            Some((n, d)) => (n, Some(d)),
            None => (body, None),
        };

        let mut num = parse_magnitude(num_text).ok_or_else(malformed)?;
        let den = match den_text {
            Some(d) => match d.strip_prefix('-') {
                Some(mag) => -parse_magnitude(mag).ok_or_else(malformed)?,
                None => parse_magnitude(d).ok_or_else(malformed)?,
            },
            None => 1,
        };
        if den == 0 {
            return Err(RationalError::ZeroDenominator);
        }
        if negative {
            num = -num;
        }

        Self::from_wide(num, den, "parse")
    }
}

// Unsigned decimal digits only; at most 38 digits always fit in i128.
fn parse_magnitude(text: &str) -> Option<i128> {
    if text.is_empty() || text.len() > 38 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Self::from_integer(n)
    }
}

impl From<i32> for Rational {
    fn from(n: i32) -> Self {
        Self::from_integer(i64::from(n))
    }
}

impl TryFrom<(i64, i64)> for Rational {
    type Error = RationalError;

    fn try_from((num, den): (i64, i64)) -> Result<Self, Self::Error> {
        Self::new(num, den)
    }
}

impl TryFrom<f64> for Rational {
    type Error = RationalError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::approximate(value)
    }
}

// Operator forms panic on failure, mirroring primitive overflow behavior.
impl Add for Rational {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.try_add(rhs)
            .unwrap_or_else(|e| panic!("rational addition failed: {e}"))
    }
}

impl Sub for Rational {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self.try_sub(rhs)
            .unwrap_or_else(|e| panic!("rational subtraction failed: {e}"))
    }
}

impl Mul for Rational {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.try_mul(rhs)
            .unwrap_or_else(|e| panic!("rational multiplication failed: {e}"))
    }
}

impl Div for Rational {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        self.try_div(rhs)
            .unwrap_or_else(|e| panic!("rational division failed: {e}"))
    }
}

impl Neg for Rational {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.try_neg()
            .unwrap_or_else(|e| panic!("rational negation failed: {e}"))
    }
}

impl Zero for Rational {
    fn zero() -> Self {
        Self::ZERO
    }

    fn is_zero(&self) -> bool {
        self.num == 0
    }
}

impl One for Rational {
    fn one() -> Self {
        Self::ONE
    }

    fn is_one(&self) -> bool {
        self.num == 1 && self.den == 1
    }
}

impl CheckedAdd for Rational {
    fn checked_add(&self, v: &Self) -> Option<Self> {
        self.try_add(*v).ok()
    }
}

impl CheckedSub for Rational {
    fn checked_sub(&self, v: &Self) -> Option<Self> {
        self.try_sub(*v).ok()
    }
}

impl CheckedMul for Rational {
    fn checked_mul(&self, v: &Self) -> Option<Self> {
        self.try_mul(*v).ok()
    }
}

impl CheckedDiv for Rational {
    fn checked_div(&self, v: &Self) -> Option<Self> {
        self.try_div(*v).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(n: i64, d: i64) -> Rational {
        Rational::new(n, d).unwrap()
    }

    #[test]
    fn test_basic_ops() {
        let a = q(1, 2);
        let b = q(1, 3);

        // 1/2 + 1/3 = 5/6
        assert_eq!(a.try_add(b).unwrap().pair(), (5, 6));
        // 1/2 - 1/3 = 1/6
        assert_eq!(a.try_sub(b).unwrap().pair(), (1, 6));
        // 1/2 * 1/3 = 1/6
        assert_eq!(a.try_mul(b).unwrap().pair(), (1, 6));
        // (1/2) / (1/3) = 3/2
        assert_eq!(a.try_div(b).unwrap().pair(), (3, 2));
    }

    #[test]
    fn test_thirds_sum_to_one() {
        assert_eq!(q(1, 3) + q(2, 3), q(1, 1));
        assert!((q(1, 3) + q(2, 3)).is_integer());
    }

    #[test]
    fn test_reduction_and_sign() {
        assert_eq!(q(4, 6).pair(), (2, 3));
        assert_eq!(q(4, -6).pair(), (-2, 3));
        assert_eq!(q(-4, -6).pair(), (2, 3));
        assert_eq!(q(0, -7).pair(), (0, 1));
    }

    #[test]
    fn test_min_normalizes() {
        assert_eq!(q(i64::MIN, i64::MIN).pair(), (1, 1));
        assert_eq!(q(i64::MIN, 2).pair(), (i64::MIN / 2, 1));
        assert_eq!(
            Rational::new(1, i64::MIN),
            Err(RationalError::Overflow { op: "normalization" })
        );
    }

    #[test]
    fn test_zero_denominator() {
        assert_eq!(Rational::new(1, 0), Err(RationalError::ZeroDenominator));
    }

    #[test]
    fn test_add_overflow_is_reported() {
        let big = q(i64::MAX, 2);
        let other = q(1, 3);
        assert!(matches!(
            big.try_add(other),
            Err(RationalError::Overflow { .. })
        ));
        assert_eq!(big.checked_add(&other), None);
    }

    #[test]
    #[should_panic(expected = "rational multiplication failed")]
    fn test_operator_panics_on_overflow() {
        let _ = Rational::from(i64::MAX) * Rational::from(2);
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            q(1, 2).try_div(Rational::ZERO),
            Err(RationalError::DivisionByZero)
        );
        assert_eq!(Rational::ZERO.try_recip(), Err(RationalError::DivisionByZero));
    }

    #[test]
    fn test_pow() {
        assert_eq!(q(2, 3).try_pow(3).unwrap(), q(8, 27));
        assert_eq!(q(2, 3).try_pow(-2).unwrap(), q(9, 4));
        assert_eq!(q(-1, 2).try_pow(-1).unwrap(), q(-2, 1));
        assert_eq!(q(5, 7).try_pow(0).unwrap(), Rational::ONE);
        assert!(Rational::from(10).try_pow(40).is_err());
    }

    #[test]
    fn test_comparisons_cross_multiply() {
        assert!(q(1, 3) < q(1, 2));
        assert!(q(-1, 2) < q(-1, 3));
        assert_eq!(q(2, 4), q(1, 2));
        assert!(q(i64::MAX, 3) > q(i64::MAX, 4));
    }

    #[test]
    fn test_display() {
        assert_eq!(q(3, 1).to_string(), "3");
        assert_eq!(q(2, 3).to_string(), "2/3");
        assert_eq!(q(-1, 12).to_string(), "-1/12");
    }

    #[test]
    fn test_parse() {
        assert_eq!("-1/12".parse::<Rational>().unwrap().to_string(), "-1/12");
        assert_eq!(" 6 / 8 ".parse::<Rational>().unwrap(), q(3, 4));
        assert_eq!("-5".parse::<Rational>().unwrap(), q(-5, 1));
        assert_eq!("7".parse::<Rational>().unwrap(), q(7, 1));
        assert_eq!("3/-4".parse::<Rational>().unwrap(), q(-3, 4));
        assert!(matches!("3/--4".parse::<Rational>(), Err(RationalError::Parse(_))));
        assert_eq!("1/0".parse::<Rational>(), Err(RationalError::ZeroDenominator));
        assert!(matches!("".parse::<Rational>(), Err(RationalError::Parse(_))));
        assert!(matches!("1/2/3".parse::<Rational>(), Err(RationalError::Parse(_))));
        assert!(matches!("x".parse::<Rational>(), Err(RationalError::Parse(_))));
        assert_eq!(
            "-9223372036854775808".parse::<Rational>().unwrap().numerator(),
            i64::MIN
        );
    }

    #[test]
    fn test_conversions() {
        assert_eq!(q(7, 2).trunc(), 3);
        assert_eq!(q(-7, 2).trunc(), -3);
        assert!((q(1, 4).to_f64() - 0.25).abs() < f64::EPSILON);
        assert_eq!(Rational::try_from(0.75).unwrap(), q(3, 4));
        assert_eq!(Rational::try_from((6, -9)).unwrap(), q(-2, 3));
    }
}
