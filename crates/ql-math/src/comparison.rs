//! Comparison utilities (translates `ql/math/comparison.hpp`).

use ql_core::Real;

/// Default epsilon for absolute comparisons.
pub const EPSILON: Real = 1e-10;

/// Return `true` if `|a - b| <= epsilon`.
#[inline]
pub fn close(a: Real, b: Real, epsilon: Real) -> bool {
    (a - b).abs() <= epsilon
}

/// Return `true` if `|a - b| <= n * ε * max(|a|, |b|)` with `ε` the machine
/// epsilon.
///
/// Two zeros compare equal; a zero never compares equal to a non-zero value
/// since the tolerance is relative.
#[inline]
pub fn close_enough(a: Real, b: Real, n: u32) -> bool {
    if a == b {
        return true;
    }
    let eps = (a.abs().max(b.abs())) * f64::EPSILON * n as f64;
    (a - b).abs() <= eps
}

/// Return `true` if every element is finite and strictly larger than its
/// predecessor.
pub fn is_strictly_increasing(xs: &[Real]) -> bool {
    xs.iter().all(|x| x.is_finite()) && xs.windows(2).all(|w| w[1] > w[0])
}
