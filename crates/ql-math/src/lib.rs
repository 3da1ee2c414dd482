//! # ql-math
//!
//! Numerical utilities consumed by the finite-difference framework:
//! the nalgebra-backed `Array`, floating-point comparison, the normal
//! distribution, 1D interpolation and Simpson integration.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Dense real vector.
pub mod array;

/// Floating-point comparison utilities.
pub mod comparison;

/// Probability distributions.
pub mod distributions;

/// Numerical integration.
pub mod integrals;

/// 1D interpolation schemes.
pub mod interpolations;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use array::Array;
pub use comparison::{close, close_enough, is_strictly_increasing};
pub use distributions::{normal_cdf, normal_cdf_inverse, normal_pdf};
pub use integrals::{Integrator, SimpsonIntegral};
pub use interpolations::{CubicNaturalSpline, Interpolation1D, LinearInterpolation};
