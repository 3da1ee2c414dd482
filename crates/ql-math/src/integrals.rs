//! Numerical integration (translates `ql/math/integrals/`).
//!
//! Only the composite Simpson rule is carried; the finite-difference
//! framework uses it for cell averages of payoffs.

use ql_core::{
    errors::{Error, Result},
    Real,
};

/// A numerical integrator.
///
/// Corresponds to the abstract `QuantLib::Integrator` class.
pub trait Integrator {
    /// Integrate `f` on `[a, b]`.
    fn integrate<F: Fn(Real) -> Real>(&self, f: F, a: Real, b: Real) -> Result<Real>;
}

// ── Simpson ───────────────────────────────────────────────────────────────────

/// Simpson's rule (composite), refined by interval doubling until two
/// successive estimates agree to `absolute_accuracy`.
///
/// Corresponds to `QuantLib::SimpsonIntegral`.
#[derive(Debug, Clone)]
pub struct SimpsonIntegral {
    max_evaluations: usize,
    absolute_accuracy: Real,
}

impl SimpsonIntegral {
    /// Create a new Simpson integrator.
    pub fn new(absolute_accuracy: Real, max_evaluations: usize) -> Self {
        Self {
            max_evaluations,
            absolute_accuracy,
        }
    }

    /// Required agreement between successive refinements.
    pub fn absolute_accuracy(&self) -> Real {
        self.absolute_accuracy
    }

    /// Evaluation budget before the integration fails.
    pub fn max_evaluations(&self) -> usize {
        self.max_evaluations
    }
}

impl Integrator for SimpsonIntegral {
    fn integrate<F: Fn(Real) -> Real>(&self, f: F, a: Real, b: Real) -> Result<Real> {
        if a == b {
            return Ok(0.0);
        }
        let fa = f(a);
        let fb = f(b);
        let mut n = 1usize;
        let mut old_value = Real::MAX;
        let mut evals = 2;

        loop {
            let h = (b - a) / (2.0 * n as Real);
            // S = h/3 * [f(a) + 4*Σf(odd) + 2*Σf(even) + f(b)]
            let mut sum_odd = 0.0;
            let mut sum_even = 0.0;
            for i in 1..2 * n {
                let x = a + i as Real * h;
                if i % 2 == 1 {
                    sum_odd += f(x);
                } else {
                    sum_even += f(x);
                }
            }
            evals += 2 * n - 1;
            let value = h / 3.0 * (fa + 4.0 * sum_odd + 2.0 * sum_even + fb);

            if n > 1 && (value - old_value).abs() < self.absolute_accuracy {
                return Ok(value);
            }
            if evals >= self.max_evaluations {
                return Err(Error::Runtime(format!(
                    "SimpsonIntegral: max evaluations ({}) exceeded",
                    self.max_evaluations
                )));
            }
            old_value = value;
            n *= 2;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn simpson_x_squared() {
        let s = SimpsonIntegral::new(1e-10, 10_000);
        // ∫₀¹ x² dx = 1/3, exact for the rule
        let result = s.integrate(|x| x * x, 0.0, 1.0).unwrap();
        assert_abs_diff_eq!(result, 1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn simpson_handles_a_kink() {
        let s = SimpsonIntegral::new(1e-10, 100_000);
        // ∫₋₁² max(x, 0) dx = 2
        let result = s.integrate(|x: Real| x.max(0.0), -1.0, 2.0).unwrap();
        assert_abs_diff_eq!(result, 2.0, epsilon = 1e-8);
        assert_eq!(s.integrate(|x| x, 3.0, 3.0).unwrap(), 0.0);
    }

    #[test]
    fn simpson_reports_an_exhausted_budget() {
        let s = SimpsonIntegral::new(1e-300, 50);
        let err = s.integrate(|x: Real| x.sin(), 0.0, 1.0).unwrap_err();
        assert!(matches!(err, Error::Runtime(_)));
        assert_eq!(s.max_evaluations(), 50);
    }
}
