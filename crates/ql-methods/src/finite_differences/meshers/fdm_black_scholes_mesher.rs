//! Log-spot mesher for Black-Scholes type problems
//! (translates `ql/methods/finitedifferences/meshers/fdmblackscholesmesher.hpp`).
//!
//! The grid covers `ln S` over the range the spot can reach with tail
//! probability `eps` up to maturity:
//!
//! ```text
//! [ln(min S) − k·σ√T·Φ⁻¹(1−eps),  ln(max S) + k·σ√T·Φ⁻¹(1−eps)]
//! ```
//!
//! where the minimum and maximum run over the forward path of the spot
//! (reduced by any discrete cash dividends) and `k` is the scale factor.

use ql_core::{ensure_config, errors::Result, Real, Size, Time};
use ql_math::normal_cdf_inverse;
use ql_processes::BlackScholesMertonProcess;
use tracing::debug;

use super::Fdm1dMesher;

/// Builder for the log-spot mesher of a Black-Scholes problem.
///
/// Corresponds to `QuantLib::FdmBlackScholesMesher`.
#[derive(Debug, Clone)]
pub struct FdmBlackScholesMesher<'a> {
    size: Size,
    process: &'a BlackScholesMertonProcess,
    maturity: Time,
    strike: Real,
    eps: Real,
    scale_factor: Real,
    concentration: Option<(Real, Real)>,
    dividends: Vec<(Time, Real)>,
}

impl<'a> FdmBlackScholesMesher<'a> {
    /// Mesher with `size` nodes for `process` up to `maturity`, making sure
    /// `strike` lies inside the grid.
    pub fn new(size: Size, process: &'a BlackScholesMertonProcess, maturity: Time, strike: Real) -> Self {
        Self {
            size,
            process,
            maturity,
            strike,
            eps: 1e-4,
            scale_factor: 1.5,
            concentration: None,
            dividends: Vec::new(),
        }
    }

    /// Tail probability left outside the grid (default `1e-4`).
    pub fn with_eps(mut self, eps: Real) -> Self {
        self.eps = eps;
        self
    }

    /// Widening factor applied to the tail quantile (default `1.5`).
    pub fn with_scale_factor(mut self, scale_factor: Real) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Concentrate nodes around the spot level `point` with the given
    /// relative density.
    pub fn with_concentration(mut self, point: Real, density: Real) -> Self {
        self.concentration = Some((point, density));
        self
    }

    /// Discrete cash dividends `(time, amount)` paid before maturity.
    pub fn with_dividends(mut self, dividends: Vec<(Time, Real)>) -> Self {
        self.dividends = dividends;
        self
    }

    /// Build the mesher.
    ///
    /// # Errors
    /// `Error::Configuration` for a non-positive maturity, strike or size
    /// below 2, or an `eps` outside `(0, 1)`.
    pub fn build(&self) -> Result<Fdm1dMesher> {
        ensure_config!(self.size >= 2, "a mesh needs at least 2 points, got {}", self.size);
        ensure_config!(self.maturity > 0.0, "maturity must be positive, got {}", self.maturity);
        ensure_config!(self.strike > 0.0, "strike must be positive, got {}", self.strike);
        ensure_config!(
            self.eps > 0.0 && self.eps < 1.0,
            "tail probability must be in (0, 1), got {}",
            self.eps
        );
        ensure_config!(self.scale_factor > 0.0, "scale factor must be positive");

        let p = self.process;
        let mut dividends = self.dividends.clone();
        dividends.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut spot = p.spot();
        let (mut lo, mut hi) = (spot, spot);
        let mut t = 0.0;
        for &(td, amount) in dividends.iter().filter(|d| d.0 > 0.0 && d.0 <= self.maturity) {
            spot *= p.dividend_discount(td) / p.dividend_discount(t) * p.discount(t) / p.discount(td);
            lo = lo.min(spot);
            hi = hi.max(spot);
            spot = (spot - amount).max(1e-4 * spot);
            lo = lo.min(spot);
            hi = hi.max(spot);
            t = td;
        }
        let forward_at_maturity = spot * p.dividend_discount(self.maturity) / p.dividend_discount(t)
            * p.discount(t)
            / p.discount(self.maturity);
        lo = lo.min(forward_at_maturity);
        hi = hi.max(forward_at_maturity);

        let sigma_sqrt_t = p.black_variance(self.maturity).sqrt().max(1e-4);
        let width = sigma_sqrt_t * normal_cdf_inverse(1.0 - self.eps)? * self.scale_factor;
        let x_min = lo.ln().min(self.strike.ln()) - width;
        let x_max = hi.ln().max(self.strike.ln()) + width;
        debug!(size = self.size, x_min, x_max, "black-scholes mesher");

        let c_point = self.concentration.map(|(s, density)| (s.ln(), density));
        Fdm1dMesher::concentrating(x_min, x_max, self.size, c_point, c_point.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn covers_the_tail_quantiles() {
        let process = BlackScholesMertonProcess::new(100.0, 0.0, 0.0, 0.2).unwrap();
        let m = FdmBlackScholesMesher::new(101, &process, 1.0, 100.0)
            .with_scale_factor(1.0)
            .build()
            .unwrap();
        let width = 0.2 * normal_cdf_inverse(1.0 - 1e-4).unwrap();
        assert_eq!(m.size(), 101);
        assert_abs_diff_eq!(m.locations()[0], 100.0_f64.ln() - width, epsilon = 1e-12);
        assert_abs_diff_eq!(m.locations()[100], 100.0_f64.ln() + width, epsilon = 1e-12);
        // symmetric, so the centre node is the spot
        assert_abs_diff_eq!(m.locations()[50], 100.0_f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn includes_far_strike_and_forward_drift() {
        let process = BlackScholesMertonProcess::new(100.0, 0.05, 0.0, 0.1).unwrap();
        let m = FdmBlackScholesMesher::new(51, &process, 2.0, 400.0).build().unwrap();
        assert!(m.locations()[50] > 400.0_f64.ln());
        assert!(m.locations()[0] < 100.0_f64.ln());
    }

    #[test]
    fn concentrates_on_the_strike() {
        let process = BlackScholesMertonProcess::new(100.0, 0.03, 0.0, 0.25).unwrap();
        let m = FdmBlackScholesMesher::new(81, &process, 1.0, 110.0)
            .with_concentration(110.0, 0.1)
            .build()
            .unwrap();
        let k = 110.0_f64.ln();
        assert_eq!(m.location(m.nearest_index(k)).unwrap(), k);
    }

    #[test]
    fn dividends_widen_the_lower_end() {
        let process = BlackScholesMertonProcess::new(100.0, 0.0, 0.0, 0.2).unwrap();
        let plain = FdmBlackScholesMesher::new(51, &process, 1.0, 100.0).build().unwrap();
        let paying = FdmBlackScholesMesher::new(51, &process, 1.0, 100.0)
            .with_dividends(vec![(0.5, 20.0)])
            .build()
            .unwrap();
        assert!(paying.locations()[0] < plain.locations()[0]);
    }

    #[test]
    fn rejects_bad_parameters() {
        let process = BlackScholesMertonProcess::new(100.0, 0.0, 0.0, 0.2).unwrap();
        assert!(FdmBlackScholesMesher::new(51, &process, 0.0, 100.0).build().is_err());
        assert!(FdmBlackScholesMesher::new(51, &process, 1.0, 100.0)
            .with_eps(1.0)
            .build()
            .is_err());
    }
}
