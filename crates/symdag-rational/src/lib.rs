//! # symdag-rational
//!
//! Exact rational arithmetic on machine-width integers for symdag.
//!
//! This crate provides:
//! - `Rational`: a normalized `i64` fraction whose arithmetic fails loudly
//!   on overflow instead of wrapping
//! - Stern–Brocot approximation of floating values by simple fractions
//!
//! ## Invariants
//!
//! Every `Rational` is stored in lowest terms with a strictly positive
//! denominator, so two equal values always share one representation.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod approx;
pub mod error;
pub mod rational;

#[cfg(test)]
mod proptests;

pub use approx::{stern_brocot, ApproxConfig};
pub use error::RationalError;
pub use rational::Rational;
