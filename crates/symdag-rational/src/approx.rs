//! Stern–Brocot approximation of floating values.
//!
//! The search walks the Stern–Brocot tree by repeated mediants, narrowing
//! a `[left, right]` fraction interval around the target until a mediant
//! lands within `epsilon` of it or the denominators grow past a cutoff.
//! Only the fractional part is searched (the subtree under every integer
//! is a shifted copy of the one under zero), which bounds the number of
//! steps by `max_denominator` regardless of magnitude.

use crate::error::RationalError;

/// Configuration for [`stern_brocot`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ApproxConfig {
    /// Absolute tolerance for accepting a mediant.
    pub epsilon: f64,
    /// Denominator cutoff; the search stops before exceeding it.
    pub max_denominator: i64,
}

impl Default for ApproxConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-10,
            max_denominator: 1_000_000,
        }
    }
}

impl ApproxConfig {
    /// Sets the tolerance.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the denominator cutoff.
    #[must_use]
    pub fn with_max_denominator(mut self, max_denominator: i64) -> Self {
        self.max_denominator = max_denominator;
        self
    }
}

/// Finds the simplest fraction within `config.epsilon` of `value`.
///
/// Returns `(numerator, denominator)` in lowest terms with a positive
/// denominator and the sign of `value`. If the cutoff is reached first,
/// the closest lower bound found so far is returned. `0.0` maps to
/// `(0, 1)`.
///
/// # Errors
///
/// Returns [`RationalError::NotFinite`] for NaN or infinities, and
/// [`RationalError::Overflow`] if the integer part does not fit in `i64`.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn stern_brocot(value: f64, config: &ApproxConfig) -> Result<(i64, i64), RationalError> {
    const OP: &str = "approximation";

    if !value.is_finite() {
        return Err(RationalError::NotFinite);
    }
    if value == 0.0 {
        return Ok((0, 1));
    }

    let magnitude = value.abs();
    let whole = magnitude.floor();
    // 2^63 is exactly representable; anything at or above it cannot fit.
    if whole >= i64::MAX as f64 {
        return Err(RationalError::Overflow { op: OP });
    }

    let (frac_num, den) = search_unit_interval(magnitude - whole, config);
    let num = (whole as i64)
        .checked_mul(den)
        .and_then(|w| w.checked_add(frac_num))
        .ok_or(RationalError::Overflow { op: OP })?;

    Ok((if value < 0.0 { -num } else { num }, den))
}

// `x` lies in [0, 1). Mediants of Stern–Brocot neighbours are already in
// lowest terms, so no gcd is needed along the way.
#[allow(clippy::cast_precision_loss)]
fn search_unit_interval(x: f64, config: &ApproxConfig) -> (i64, i64) {
    if x < config.epsilon {
        return (0, 1);
    }
    if 1.0 - x < config.epsilon {
        return (1, 1);
    }

    let (mut left_num, mut left_den) = (0_i64, 1_i64);
    let (mut right_num, mut right_den) = (1_i64, 1_i64);

    loop {
        let mid_num = left_num + right_num;
        let mid_den = left_den + right_den;
        if mid_den > config.max_denominator {
            break;
        }

        let mid = mid_num as f64 / mid_den as f64;
        if (x - mid).abs() < config.epsilon {
            return (mid_num, mid_den);
        }

        if x < mid {
            right_num = mid_num;
            right_den = mid_den;
        } else {
            left_num = mid_num;
            left_den = mid_den;
        }
    }

    (left_num, left_den)
}
