//! Square-root (CIR) process (translates `ql/processes/squarerootprocess.hpp`).
//!
//! ```text
//! dX = a(b − X) dt + σ √X dW
//! ```
//!
//! The Cox-Ingersoll-Ross process; its forward (Fokker-Planck) operator is
//! the variance part of the Heston density equation.

use crate::stochastic_process::StochasticProcess1D;
use ql_core::{ensure, errors::Result, Real, Time};

/// A square-root (CIR) process.
///
/// `dX = speed · (mean − X) dt + volatility · √X · dW`
///
/// Corresponds to `QuantLib::SquareRootProcess`.
#[derive(Debug, Clone)]
pub struct SquareRootProcess {
    x0: Real,
    speed: Real,
    mean: Real,
    volatility: Real,
}

impl SquareRootProcess {
    /// Create a new square-root (CIR) process.
    ///
    /// # Errors
    /// `Error::Precondition` if `x0`, `speed` or `mean` is negative or
    /// `volatility` is not positive.
    pub fn new(speed: Real, mean: Real, volatility: Real, x0: Real) -> Result<Self> {
        ensure!(x0 >= 0.0, "initial value must be non-negative, got {x0}");
        ensure!(speed >= 0.0, "mean-reversion speed must be non-negative, got {speed}");
        ensure!(mean >= 0.0, "long-run mean must be non-negative, got {mean}");
        ensure!(volatility > 0.0, "volatility must be positive, got {volatility}");
        Ok(Self {
            x0,
            speed,
            mean,
            volatility,
        })
    }

    /// Mean-reversion speed.
    pub fn speed(&self) -> Real {
        self.speed
    }

    /// Long-run mean level.
    pub fn mean(&self) -> Real {
        self.mean
    }

    /// Volatility.
    pub fn volatility(&self) -> Real {
        self.volatility
    }

    /// `2κθ ≥ σ²`: the origin is never reached.
    pub fn satisfies_feller(&self) -> bool {
        2.0 * self.speed * self.mean >= self.volatility * self.volatility
    }
}

impl StochasticProcess1D for SquareRootProcess {
    fn x0(&self) -> Real {
        self.x0
    }

    fn drift(&self, _t: Time, x: Real) -> Real {
        self.speed * (self.mean - x)
    }

    fn diffusion(&self, _t: Time, x: Real) -> Real {
        self.volatility * x.max(0.0).sqrt()
    }

    fn expectation(&self, _t: Time, x: Real, dt: Time) -> Real {
        self.mean + (x - self.mean) * (-self.speed * dt).exp()
    }

    fn variance(&self, _t: Time, x: Real, dt: Time) -> Real {
        let s2 = self.volatility * self.volatility;
        if self.speed < 1e-15 {
            return s2 * x * dt;
        }
        let e = (-self.speed * dt).exp();
        x * s2 / self.speed * (e - e * e) + self.mean * s2 / (2.0 * self.speed) * (1.0 - e) * (1.0 - e)
    }

    fn std_deviation(&self, t: Time, x: Real, dt: Time) -> Real {
        self.variance(t, x, dt).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn drift_vanishes_at_the_mean() {
        let p = SquareRootProcess::new(1.0, 0.04, 0.3, 0.04).unwrap();
        assert_abs_diff_eq!(p.drift(0.0, 0.04), 0.0, epsilon = 1e-15);
        assert!(p.drift(0.0, 0.01) > 0.0);
        assert!(p.drift(0.0, 0.10) < 0.0);
    }

    #[test]
    fn diffusion_is_floored_at_zero() {
        let p = SquareRootProcess::new(1.0, 0.04, 0.3, 0.0).unwrap();
        assert_eq!(p.diffusion(0.0, 0.0), 0.0);
        assert_eq!(p.diffusion(0.0, -0.01), 0.0);
        assert_abs_diff_eq!(p.diffusion(0.0, 0.04), 0.06, epsilon = 1e-15);
    }

    #[test]
    fn exact_moments() {
        let p = SquareRootProcess::new(2.0, 0.04, 0.3, 0.09).unwrap();
        let e = (-2.0_f64).exp();
        assert_abs_diff_eq!(p.expectation(0.0, 0.09, 1.0), 0.04 + 0.05 * e, epsilon = 1e-15);
        let var = 0.09 * 0.09 / 2.0 * (e - e * e) + 0.04 * 0.09 / 4.0 * (1.0 - e).powi(2);
        assert_abs_diff_eq!(p.variance(0.0, 0.09, 1.0), var, epsilon = 1e-15);
        assert!(!p.satisfies_feller());
        assert!(SquareRootProcess::new(1.0, 0.1, 0.2, 0.1).unwrap().satisfies_feller());
    }

    #[test]
    fn rejects_negative_inputs() {
        assert!(SquareRootProcess::new(1.0, 0.04, 0.3, -0.01).is_err());
        assert!(SquareRootProcess::new(1.0, 0.04, 0.0, 0.01).is_err());
    }
}
