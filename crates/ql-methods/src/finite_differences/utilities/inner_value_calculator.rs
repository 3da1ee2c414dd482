//! Payoff values on the grid
//! (translates `ql/methods/finitedifferences/utilities/fdminnervaluecalculator.hpp`).

use std::fmt;
use std::sync::Arc;

use ql_core::{errors::Result, Real, Size, Time};
use ql_instruments::Payoff;
use ql_math::{Integrator, SimpsonIntegral};

use crate::finite_differences::meshers::FdmMesher;

/// Agreement required between Simpson refinements of a cell average.
const CELL_ACCURACY: Real = 1e-8;
/// Evaluation budget of a single cell average.
const CELL_EVALUATIONS: Size = 1_000_000;

/// Exercise value of an instrument at every grid point.
///
/// Corresponds to `QuantLib::FdmInnerValueCalculator`.
pub trait FdmInnerValueCalculator: fmt::Debug + Send + Sync {
    /// The mesh the values live on.
    fn mesher(&self) -> &Arc<FdmMesher>;

    /// Value at grid point `index` and time `t`.
    fn inner_value(&self, index: Size, t: Time) -> Result<Real>;

    /// Value averaged over the grid cell around `index`; used for the
    /// terminal condition so that kinks between nodes are smoothed.
    fn avg_inner_value(&self, index: Size, t: Time) -> Result<Real> {
        self.inner_value(index, t)
    }
}

/// Payoff of `exp(x)` for a log-spot direction.
///
/// Corresponds to `QuantLib::FdmLogInnerValue`.
#[derive(Debug, Clone)]
pub struct FdmLogInnerValue {
    payoff: Arc<dyn Payoff>,
    mesher: Arc<FdmMesher>,
    direction: Size,
}

impl FdmLogInnerValue {
    /// Calculator for `payoff` along the log-spot `direction` of `mesher`.
    pub fn new(payoff: Arc<dyn Payoff>, mesher: Arc<FdmMesher>, direction: Size) -> Result<Self> {
        mesher.layout().check_direction(direction)?;
        Ok(Self {
            payoff,
            mesher,
            direction,
        })
    }
}

impl FdmInnerValueCalculator for FdmLogInnerValue {
    fn mesher(&self) -> &Arc<FdmMesher> {
        &self.mesher
    }

    fn inner_value(&self, index: Size, _t: Time) -> Result<Real> {
        let x = self.mesher.location(index, self.direction)?;
        Ok(self.payoff.value(x.exp()))
    }

    fn avg_inner_value(&self, index: Size, _t: Time) -> Result<Real> {
        let x = self.mesher.location(index, self.direction)?;
        let (hm, hp) = self.mesher.spacings(index, self.direction)?;
        let a = x - 0.5 * hm.unwrap_or(0.0);
        let b = x + 0.5 * hp.unwrap_or(0.0);
        if b <= a {
            return Ok(self.payoff.value(x.exp()));
        }
        let simpson = SimpsonIntegral::new(CELL_ACCURACY * (b - a), CELL_EVALUATIONS);
        Ok(simpson.integrate(|y| self.payoff.value(y.exp()), a, b)? / (b - a))
    }
}

/// Payoff of the state variable itself.
#[derive(Debug, Clone)]
pub struct FdmStateInnerValue {
    payoff: Arc<dyn Payoff>,
    mesher: Arc<FdmMesher>,
    direction: Size,
}

impl FdmStateInnerValue {
    /// Calculator for `payoff` along `direction` of `mesher`.
    pub fn new(payoff: Arc<dyn Payoff>, mesher: Arc<FdmMesher>, direction: Size) -> Result<Self> {
        mesher.layout().check_direction(direction)?;
        Ok(Self {
            payoff,
            mesher,
            direction,
        })
    }
}

impl FdmInnerValueCalculator for FdmStateInnerValue {
    fn mesher(&self) -> &Arc<FdmMesher> {
        &self.mesher
    }

    fn inner_value(&self, index: Size, _t: Time) -> Result<Real> {
        Ok(self.payoff.value(self.mesher.location(index, self.direction)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finite_differences::meshers::Fdm1dMesher;
    use approx::assert_abs_diff_eq;
    use ql_instruments::{OptionType, PlainVanillaPayoff};

    fn mesher() -> Arc<FdmMesher> {
        let m = Fdm1dMesher::uniform(90.0_f64.ln(), 110.0_f64.ln(), 5).unwrap();
        Arc::new(FdmMesher::from_1d(m).unwrap())
    }

    #[test]
    fn log_values_are_payoffs_of_the_spot() {
        let payoff = Arc::new(PlainVanillaPayoff::new(OptionType::Put, 100.0));
        let calc = FdmLogInnerValue::new(payoff, mesher(), 0).unwrap();
        assert_abs_diff_eq!(calc.inner_value(0, 0.0).unwrap(), 10.0, epsilon = 1e-12);
        assert_eq!(calc.inner_value(4, 0.0).unwrap(), 0.0);
        assert!(calc.inner_value(5, 0.0).is_err());
    }

    #[test]
    fn cell_average_smooths_the_kink() {
        let payoff = Arc::new(PlainVanillaPayoff::new(OptionType::Call, 100.0));
        let m = Fdm1dMesher::predefined(vec![4.5, 100.0_f64.ln(), 4.7]).unwrap();
        let at_strike = Arc::new(FdmMesher::from_1d(m).unwrap());
        let calc = FdmLogInnerValue::new(payoff.clone(), at_strike.clone(), 0).unwrap();
        assert_eq!(calc.inner_value(1, 0.0).unwrap(), 0.0);
        assert!(calc.avg_inner_value(1, 0.0).unwrap() > 0.0);
        // the state calculator has no cell average of its own
        let state = FdmStateInnerValue::new(payoff, at_strike, 0).unwrap();
        assert_eq!(state.avg_inner_value(2, 0.0).unwrap(), state.inner_value(2, 0.0).unwrap());
    }

    #[test]
    fn cell_average_matches_the_closed_form() {
        // cell [ln 100 - 0.05, ln 100 + 0.05] around the strike of a call:
        // (1/w) ∫ max(e^y - K, 0) dy = (e^b - K - K (b - ln K)) / w
        let strike: Real = 100.0;
        let (x0, half) = (strike.ln(), 0.05);
        let m = Fdm1dMesher::predefined(vec![x0 - 2.0 * half, x0, x0 + 2.0 * half]).unwrap();
        let mesher = Arc::new(FdmMesher::from_1d(m).unwrap());
        let payoff = Arc::new(PlainVanillaPayoff::new(OptionType::Call, strike));
        let calc = FdmLogInnerValue::new(payoff, mesher, 0).unwrap();
        let b = x0 + half;
        let expected = (b.exp() - strike - strike * (b - x0)) / (2.0 * half);
        assert_abs_diff_eq!(calc.avg_inner_value(1, 0.0).unwrap(), expected, epsilon = 1e-8);
    }
}
