//! Ornstein-Uhlenbeck mean-reverting process
//! (translates `ql/processes/ornsteinuhlenbeckprocess.hpp`).
//!
//! ```text
//! dX = a(b − X) dt + σ dW
//! ```
//!
//! With `a = 0` the process is an arithmetic Brownian motion, which turns
//! the associated backward PDE into the heat equation.  Read as a short
//! rate it is the Vasicek model.

use crate::stochastic_process::StochasticProcess1D;
use ql_core::{ensure, errors::Result, Real, Time};

/// An Ornstein-Uhlenbeck mean-reverting process.
///
/// `dX = speed · (level − X) dt + volatility · dW`
///
/// Corresponds to `QuantLib::OrnsteinUhlenbeckProcess`.
#[derive(Debug, Clone)]
pub struct OrnsteinUhlenbeckProcess {
    x0: Real,
    speed: Real,
    level: Real,
    volatility: Real,
}

impl OrnsteinUhlenbeckProcess {
    /// Create a new Ornstein-Uhlenbeck process.
    ///
    /// # Errors
    /// `Error::Precondition` if `speed` or `volatility` is negative.
    pub fn new(speed: Real, volatility: Real, x0: Real, level: Real) -> Result<Self> {
        ensure!(speed >= 0.0, "mean-reversion speed must be non-negative, got {speed}");
        ensure!(volatility >= 0.0, "volatility must be non-negative, got {volatility}");
        Ok(Self {
            x0,
            speed,
            level,
            volatility,
        })
    }

    /// Arithmetic Brownian motion `dX = σ dW` started at `x0`.
    pub fn brownian_motion(volatility: Real, x0: Real) -> Result<Self> {
        Self::new(0.0, volatility, x0, 0.0)
    }

    /// Speed of mean reversion.
    pub fn speed(&self) -> Real {
        self.speed
    }

    /// Long-run level.
    pub fn level(&self) -> Real {
        self.level
    }

    /// Volatility.
    pub fn volatility(&self) -> Real {
        self.volatility
    }
}

impl StochasticProcess1D for OrnsteinUhlenbeckProcess {
    fn x0(&self) -> Real {
        self.x0
    }

    fn drift(&self, _t: Time, x: Real) -> Real {
        self.speed * (self.level - x)
    }

    fn diffusion(&self, _t: Time, _x: Real) -> Real {
        self.volatility
    }

    fn expectation(&self, _t: Time, x: Real, dt: Time) -> Real {
        self.level + (x - self.level) * (-self.speed * dt).exp()
    }

    fn std_deviation(&self, t: Time, x: Real, dt: Time) -> Real {
        self.variance(t, x, dt).sqrt()
    }

    fn variance(&self, _t: Time, _x: Real, dt: Time) -> Real {
        let v2 = self.volatility * self.volatility;
        if self.speed < 1e-15 {
            v2 * dt
        } else {
            v2 * (1.0 - (-2.0 * self.speed * dt).exp()) / (2.0 * self.speed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn drift_pulls_towards_level() {
        let p = OrnsteinUhlenbeckProcess::new(2.0, 0.3, 0.5, 1.0).unwrap();
        assert_abs_diff_eq!(p.drift(0.0, 0.5), 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(p.diffusion(0.0, 100.0), 0.3, epsilon = 1e-15);
        assert_abs_diff_eq!(p.expectation(0.0, 1.0, 0.25), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn exact_moments() {
        let p = OrnsteinUhlenbeckProcess::new(1.0, 0.2, 0.5, 0.0).unwrap();
        assert_abs_diff_eq!(p.expectation(0.0, 0.5, 1.0), 0.5 * (-1.0_f64).exp(), epsilon = 1e-12);
        let var = p.variance(0.0, 0.5, 0.5);
        assert_abs_diff_eq!(var, 0.04 * (1.0 - (-1.0_f64).exp()) / 2.0, epsilon = 1e-15);
        assert_abs_diff_eq!(p.std_deviation(0.0, 0.5, 0.5).powi(2), var, epsilon = 1e-15);
    }

    #[test]
    fn zero_speed_is_brownian_motion() {
        let p = OrnsteinUhlenbeckProcess::brownian_motion(1.0, 0.0).unwrap();
        assert_abs_diff_eq!(p.drift(0.3, 0.7), 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(p.variance(0.0, 1.0, 0.25), 0.25, epsilon = 1e-15);
    }

    #[test]
    fn rejects_negative_parameters() {
        assert!(OrnsteinUhlenbeckProcess::new(-1.0, 0.2, 0.0, 0.0).is_err());
        assert!(OrnsteinUhlenbeckProcess::new(1.0, -0.2, 0.0, 0.0).is_err());
    }
}
