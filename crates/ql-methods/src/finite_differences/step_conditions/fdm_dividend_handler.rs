//! Discrete cash dividends on a log-spot grid
//! (translates `ql/methods/finitedifferences/stepconditions/fdmdividendhandler.hpp`).
//!
//! Rolling back across a dividend `D` paid at `t_D` the value just before
//! the payment is the value just after it at the reduced spot:
//!
//! ```text
//! V(t_D⁻, x) = V(t_D⁺, ln(max(eˣ − D, S_min)))
//! ```
//!
//! with `S_min` the lowest spot on the grid; values between nodes are
//! interpolated linearly along each grid line.

use std::sync::Arc;

use ql_core::{ensure_config, errors::Result, Real, Size, Time};
use ql_math::{close_enough, Array, Interpolation1D, LinearInterpolation};
use tracing::debug;

use super::StepCondition;
use crate::finite_differences::meshers::FdmMesher;

/// Applies discrete cash dividends along a log-spot direction.
///
/// Corresponds to `QuantLib::FdmDividendHandler`.
#[derive(Debug, Clone)]
pub struct FdmDividendHandler {
    dividends: Vec<(Time, Real)>,
    mesher: Arc<FdmMesher>,
    direction: Size,
    x: Vec<Real>,
    lines: Vec<Vec<Size>>,
}

impl FdmDividendHandler {
    /// Handler for `(time, amount)` dividends along `direction`.
    ///
    /// # Errors
    /// `Error::Configuration` for negative or non-finite amounts or times.
    pub fn new(mut dividends: Vec<(Time, Real)>, mesher: Arc<FdmMesher>, direction: Size) -> Result<Self> {
        ensure_config!(
            dividends
                .iter()
                .all(|&(t, d)| t >= 0.0 && t.is_finite() && d >= 0.0 && d.is_finite()),
            "dividends need non-negative finite times and amounts, got {dividends:?}"
        );
        dividends.sort_by(|a, b| a.0.total_cmp(&b.0));
        let x = mesher.mesher(direction)?.locations().to_vec();
        let lines = mesher.layout().lines(direction)?;
        Ok(Self {
            dividends,
            mesher,
            direction,
            x,
            lines,
        })
    }

    /// Dividend schedule, sorted by time.
    pub fn dividends(&self) -> &[(Time, Real)] {
        &self.dividends
    }

    fn apply_dividend(&self, a: &mut Array, amount: Real) -> Result<()> {
        let s_min = self.x[0].exp();
        let targets: Vec<Real> = self
            .x
            .iter()
            .map(|&x| (x.exp() - amount).max(s_min).ln())
            .collect();
        let mut ys = vec![0.0; self.x.len()];
        for line in &self.lines {
            for (y, &i) in ys.iter_mut().zip(line) {
                *y = a[i];
            }
            let interp = LinearInterpolation::new(&self.x, &ys)?;
            for (&i, &target) in line.iter().zip(&targets) {
                a[i] = interp.operator(target);
            }
        }
        Ok(())
    }
}

impl StepCondition for FdmDividendHandler {
    fn apply_to(&mut self, a: &mut Array, t: Time) -> Result<()> {
        ensure_config!(
            a.size() == self.mesher.size(),
            "array of size {} does not match a mesh of size {}",
            a.size(),
            self.mesher.size()
        );
        for &(td, amount) in &self.dividends {
            if close_enough(td, t, 100) {
                debug!(t, amount, direction = self.direction, "applying dividend");
                self.apply_dividend(a, amount)?;
            }
        }
        Ok(())
    }

    fn stopping_times(&self) -> Vec<Time> {
        self.dividends.iter().map(|d| d.0).collect()
    }
}
