//! Geometric Brownian motion process
//! (translates `ql/processes/geometricbrownianmotionprocess.hpp`).
//!
//! ```text
//! dS = μ S dt + σ S dW
//! ```
//!
//! The state variable is the price itself, so a finite-difference operator
//! built from this process works on a spot (not log-spot) mesh.

use crate::stochastic_process::StochasticProcess1D;
use ql_core::{ensure, errors::Result, Real, Time};

/// Geometric Brownian motion with constant drift and volatility.
///
/// Corresponds to `QuantLib::GeometricBrownianMotionProcess`.
#[derive(Debug, Clone)]
pub struct GeometricBrownianMotionProcess {
    x0: Real,
    mu: Real,
    sigma: Real,
}

impl GeometricBrownianMotionProcess {
    /// Create a new GBM process.
    ///
    /// # Errors
    /// `Error::Precondition` unless `x0 > 0` and `sigma >= 0`.
    pub fn new(x0: Real, mu: Real, sigma: Real) -> Result<Self> {
        ensure!(x0 > 0.0, "initial value must be positive, got {x0}");
        ensure!(sigma >= 0.0, "volatility must be non-negative, got {sigma}");
        Ok(Self { x0, mu, sigma })
    }
}

impl StochasticProcess1D for GeometricBrownianMotionProcess {
    fn x0(&self) -> Real {
        self.x0
    }

    fn drift(&self, _t: Time, x: Real) -> Real {
        self.mu * x
    }

    fn diffusion(&self, _t: Time, x: Real) -> Real {
        self.sigma * x
    }

    fn expectation(&self, _t: Time, x: Real, dt: Time) -> Real {
        x * (self.mu * dt).exp()
    }
}
