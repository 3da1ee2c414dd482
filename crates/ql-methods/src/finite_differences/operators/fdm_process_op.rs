//! Generator of an arbitrary one-dimensional diffusion
//! (`μ(t,x)·∂/∂x + ½σ²(t,x)·∂²/∂x² − r`).

use std::sync::Arc;

use ql_core::{errors::Result, Rate, Real, Size, Time};
use ql_math::Array;
use ql_processes::StochasticProcess1D;

use super::{FdmLinearOpComposite, TripleBandLinearOp};
use crate::finite_differences::meshers::FdmMesher;

/// Discount term of a [`FdmProcessOp`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Discounting {
    /// No discounting: the plain backward Kolmogorov operator.
    None,
    /// Constant short rate.
    Constant(Rate),
    /// The state variable itself is the short rate.
    ShortRate,
}

/// Spatial operator built from the drift and diffusion of a process.
///
/// Coefficients are sampled at the mid-point of every step, so the
/// operator handles time-dependent processes.
///
/// Corresponds to the 1D operators of `ql/methods/finitedifferences/operators/`
/// (`FdmOrnsteinUhlenbeckOp` and friends).
#[derive(Debug, Clone)]
pub struct FdmProcessOp {
    mesher: Arc<FdmMesher>,
    process: Arc<dyn StochasticProcess1D>,
    direction: Size,
    discounting: Discounting,
    x: Array,
    dx: TripleBandLinearOp,
    dxx: TripleBandLinearOp,
    map: TripleBandLinearOp,
}

impl FdmProcessOp {
    /// Operator for `process` along `direction` of `mesher`.
    pub fn new(
        mesher: Arc<FdmMesher>,
        process: Arc<dyn StochasticProcess1D>,
        direction: Size,
        discounting: Discounting,
    ) -> Result<Self> {
        let x = mesher.locations(direction)?;
        let dx = TripleBandLinearOp::first_derivative(direction, mesher.clone())?;
        let dxx = TripleBandLinearOp::second_derivative(direction, mesher.clone())?;
        let map = TripleBandLinearOp::new(direction, mesher.clone())?;
        let mut op = Self {
            mesher,
            process,
            direction,
            discounting,
            x,
            dx,
            dxx,
            map,
        };
        op.set_time(0.0, 0.0)?;
        Ok(op)
    }

    /// The discount term.
    pub fn discounting(&self) -> Discounting {
        self.discounting
    }
}

impl FdmLinearOpComposite for FdmProcessOp {
    fn directions(&self) -> Size {
        self.mesher.dimensions()
    }

    fn mesher(&self) -> &Arc<FdmMesher> {
        &self.mesher
    }

    fn set_time(&mut self, t1: Time, t2: Time) -> Result<()> {
        let t = 0.5 * (t1 + t2);
        let drift = self.x.map(|x| self.process.drift(t, x));
        let half_variance = self.x.map(|x| {
            let s = self.process.diffusion(t, x);
            0.5 * s * s
        });
        let rate = match self.discounting {
            Discounting::None => None,
            Discounting::Constant(r) => Some(Array::from_element(1, -r)),
            Discounting::ShortRate => Some(-&self.x),
        };
        self.map = TripleBandLinearOp::axpyb(
            Some(&drift),
            &self.dx,
            &self.dxx.mult(&half_variance)?,
            rate.as_ref(),
        )?;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finite_differences::meshers::Fdm1dMesher;
    use approx::assert_abs_diff_eq;
    use ql_processes::{GeometricBrownianMotionProcess, OrnsteinUhlenbeckProcess};

    fn mesher() -> Arc<FdmMesher> {
        Arc::new(FdmMesher::from_1d(Fdm1dMesher::uniform(-2.0, 2.0, 41).unwrap()).unwrap())
    }

    #[test]
    fn brownian_motion_gives_half_laplacian() {
        let bm = OrnsteinUhlenbeckProcess::brownian_motion(1.0, 0.0).unwrap();
        let op = FdmProcessOp::new(mesher(), Arc::new(bm), 0, Discounting::None).unwrap();
        let expected = TripleBandLinearOp::second_derivative(0, mesher()).unwrap().scale(0.5);
        for i in 0..41 {
            let (l, d, u) = op.band(0).unwrap().row(i).unwrap();
            let (el, ed, eu) = expected.row(i).unwrap();
            assert_abs_diff_eq!(l, el, epsilon = 1e-10);
            assert_abs_diff_eq!(d, ed, epsilon = 1e-10);
            assert_abs_diff_eq!(u, eu, epsilon = 1e-10);
        }
    }

    #[test]
    fn mean_reversion_and_discounting() {
        let ou = OrnsteinUhlenbeckProcess::new(0.5, 0.1, 0.0, 0.3).unwrap();
        let m = mesher();
        let x = m.locations(0).unwrap();
        let op = FdmProcessOp::new(m.clone(), Arc::new(ou.clone()), 0, Discounting::ShortRate).unwrap();
        // L·x = μ(x) − x·x for the linear function
        let lx = op.apply(&x).unwrap();
        for i in 1..40 {
            assert_abs_diff_eq!(lx[i], 0.5 * (0.3 - x[i]) - x[i] * x[i], epsilon = 1e-12);
        }
        let constant = FdmProcessOp::new(m, Arc::new(ou), 0, Discounting::Constant(0.03)).unwrap();
        let lc = constant.apply(&Array::from_element(41, 2.0)).unwrap();
        assert_abs_diff_eq!(lc[20], -0.06, epsilon = 1e-12);
    }

    #[test]
    fn discounted_spot_is_a_martingale_on_a_spot_grid() {
        let m = Arc::new(FdmMesher::from_1d(Fdm1dMesher::uniform(10.0, 200.0, 39).unwrap()).unwrap());
        let gbm = GeometricBrownianMotionProcess::new(100.0, 0.04, 0.3).unwrap();
        let op = FdmProcessOp::new(m.clone(), Arc::new(gbm), 0, Discounting::Constant(0.04)).unwrap();
        // μ·S − r·S vanishes for μ = r; the curvature term is zero on a line
        let lx = op.apply(&m.locations(0).unwrap()).unwrap();
        for i in 1..38 {
            assert_abs_diff_eq!(lx[i], 0.0, epsilon = 1e-10);
        }
        assert_eq!(op.discounting(), Discounting::Constant(0.04));
    }
}
