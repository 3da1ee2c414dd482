//! `StochasticProcess1D`: the coefficient interface the finite-difference
//! operators consume (translates `ql/stochasticprocess.hpp`).
//!
//! A one-dimensional diffusion `dX = μ(t,X) dt + σ(t,X) dW` is described by
//! its drift and diffusion coefficients.  The PDE operators only ever read
//! these two functions; the remaining methods describe the transition over a
//! finite step and come with Euler defaults.

use ql_core::{Real, Time};

/// A 1-dimensional stochastic process `dX = μ(t,X) dt + σ(t,X) dW`.
///
/// Corresponds to `QuantLib::StochasticProcess1D`.
pub trait StochasticProcess1D: std::fmt::Debug + Send + Sync {
    /// Initial value of the state variable.
    fn x0(&self) -> Real;

    /// Drift `μ(t, x)`.
    fn drift(&self, t: Time, x: Real) -> Real;

    /// Diffusion `σ(t, x)`.
    fn diffusion(&self, t: Time, x: Real) -> Real;

    /// Expected value `E[x(t+Δt) | x(t) = x]`.
    fn expectation(&self, t: Time, x: Real, dt: Time) -> Real {
        x + self.drift(t, x) * dt
    }

    /// Standard deviation of the step, `σ(t,x) · √Δt`.
    fn std_deviation(&self, t: Time, x: Real, dt: Time) -> Real {
        self.diffusion(t, x) * dt.sqrt()
    }

    /// Variance of the step, `σ(t,x)² · Δt`.
    fn variance(&self, t: Time, x: Real, dt: Time) -> Real {
        let s = self.diffusion(t, x);
        s * s * dt
    }

    /// Advance the state by one step driven by the standard normal draw `dw`.
    fn evolve(&self, t: Time, x: Real, dt: Time, dw: Real) -> Real {
        self.expectation(t, x, dt) + self.std_deviation(t, x, dt) * dw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// `dX = 0.05 dt + 0.20 dW`
    #[derive(Debug)]
    struct ConstantProcess {
        mu: Real,
        sigma: Real,
    }

    impl StochasticProcess1D for ConstantProcess {
        fn x0(&self) -> Real {
            100.0
        }

        fn drift(&self, _t: Time, _x: Real) -> Real {
            self.mu
        }

        fn diffusion(&self, _t: Time, _x: Real) -> Real {
            self.sigma
        }
    }

    #[test]
    fn euler_defaults() {
        let p = ConstantProcess { mu: 0.05, sigma: 0.20 };
        assert_abs_diff_eq!(p.expectation(0.0, 100.0, 1.0), 100.05, epsilon = 1e-12);
        assert_abs_diff_eq!(p.variance(0.0, 100.0, 0.25), 0.01, epsilon = 1e-15);
        assert_abs_diff_eq!(p.std_deviation(0.0, 100.0, 0.25), 0.1, epsilon = 1e-15);
        // one standard deviation up
        assert_abs_diff_eq!(p.evolve(0.0, 100.0, 1.0, 1.0), 100.25, epsilon = 1e-12);
    }
}
