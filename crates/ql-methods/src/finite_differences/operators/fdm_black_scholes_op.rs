//! Black-Scholes operator in log-spot coordinates
//! (translates `ql/methods/finitedifferences/operators/fdmblackscholesop.hpp`).
//!
//! For `x = ln S` the pricing equation `∂V/∂t + L·V = 0` has
//!
//! ```text
//! L = ½σ²·∂²/∂x² + (r − q − ½σ²)·∂/∂x − r
//! ```

use std::sync::Arc;

use ql_core::{errors::Result, Rate, Real, Size, Time};
use ql_math::Array;
use ql_processes::BlackScholesMertonProcess;
use tracing::trace;

use super::{FdmLinearOpComposite, TripleBandLinearOp};
use crate::finite_differences::meshers::FdmMesher;

/// Black-Scholes operator acting along one (log-spot) direction.
///
/// Corresponds to `QuantLib::FdmBlackScholesOp`.
#[derive(Debug, Clone)]
pub struct FdmBlackScholesOp {
    mesher: Arc<FdmMesher>,
    process: BlackScholesMertonProcess,
    direction: Size,
    dx: TripleBandLinearOp,
    dxx: TripleBandLinearOp,
    map: TripleBandLinearOp,
    coefficients: (Rate, Rate, Real),
}

impl FdmBlackScholesOp {
    /// Operator for `process` along `direction` of `mesher`, whose
    /// locations along that direction are log-spots.
    pub fn new(mesher: Arc<FdmMesher>, process: BlackScholesMertonProcess, direction: Size) -> Result<Self> {
        let dx = TripleBandLinearOp::first_derivative(direction, mesher.clone())?;
        let dxx = TripleBandLinearOp::second_derivative(direction, mesher.clone())?;
        let coefficients = (
            process.risk_free_rate(),
            process.dividend_yield(),
            process.volatility() * process.volatility(),
        );
        let map = Self::build(&dx, &dxx, coefficients)?;
        Ok(Self {
            mesher,
            process,
            direction,
            dx,
            dxx,
            map,
            coefficients,
        })
    }

    /// The underlying process.
    pub fn process(&self) -> &BlackScholesMertonProcess {
        &self.process
    }

    fn build(
        dx: &TripleBandLinearOp,
        dxx: &TripleBandLinearOp,
        (r, q, v): (Rate, Rate, Real),
    ) -> Result<TripleBandLinearOp> {
        TripleBandLinearOp::axpyb(
            Some(&Array::from_element(1, r - q - 0.5 * v)),
            dx,
            &dxx.scale(0.5 * v),
            Some(&Array::from_element(1, -r)),
        )
    }
}

impl FdmLinearOpComposite for FdmBlackScholesOp {
    fn directions(&self) -> Size {
        self.mesher.dimensions()
    }

    fn mesher(&self) -> &Arc<FdmMesher> {
        &self.mesher
    }

    fn set_time(&mut self, t1: Time, t2: Time) -> Result<()> {
        let r = self.process.forward_rate(t1, t2);
        let q = self.process.dividend_forward_rate(t1, t2);
        let v = if t2 > t1 {
            self.process.black_forward_variance(t1, t2) / (t2 - t1)
        } else {
            self.process.volatility() * self.process.volatility()
        };
        if (r, q, v) != self.coefficients {
            trace!(t1, t2, r, q, v, "rebuilding black-scholes operator");
            self.coefficients = (r, q, v);
            self.map = Self::build(&self.dx, &self.dxx, self.coefficients)?;
        }
        Ok(())
    }

    fn apply(&self, r: &Array) -> Result<Array> {
        self.map.apply(r)
    }

    fn apply_direction(&self, direction: Size, r: &Array) -> Result<Array> {
        if direction == self.direction {
            self.map.apply(r)
        } else {
            Ok(Array::zeros(r.size()))
        }
    }

    fn solve_splitting(&self, direction: Size, r: &Array, a: Real) -> Result<Array> {
        if direction == self.direction {
            self.map.solve_splitting(r, a, 1.0)
        } else {
            Ok(r.clone())
        }
    }

    fn band(&self, direction: Size) -> Result<TripleBandLinearOp> {
        if direction == self.direction {
            Ok(self.map.clone())
        } else {
            TripleBandLinearOp::new(direction, self.mesher.clone())
        }
    }

    fn clone_box(&self) -> Box<dyn FdmLinearOpComposite> {
        Box::new(self.clone())
    }
}
