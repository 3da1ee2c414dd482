//! One-dimensional backward solver with interpolated results
//! (translates `ql/methods/finitedifferences/solvers/fdm1dimsolver.hpp`).
//!
//! The solver rolls the terminal payoff back to `t = 0` once, at
//! construction.  A snapshot taken at
//!
//! ```text
//! θt = 0.99 · min(1/365, T)
//! ```
//!
//! gives the time derivative by a one-sided difference.  Values between
//! nodes come from a natural cubic spline; the space derivatives are the
//! central differences of the solution, interpolated linearly.

use std::sync::Arc;

use ql_core::{
    ensure_config, ensure_post,
    errors::{Error, Result},
    Real, Size, Time,
};
use ql_math::{Array, CubicNaturalSpline, Interpolation1D, LinearInterpolation};
use tracing::debug;

use super::{FdmBackwardSolver, FdmSolverDesc};
use crate::finite_differences::meshers::FdmMesher;
use crate::finite_differences::operators::{FdmLinearOpComposite, TripleBandLinearOp};
use crate::finite_differences::schemes::FdmSchemeDesc;
use crate::finite_differences::step_conditions::FdmSnapshotCondition;

/// Solution of a one-dimensional problem at `t = 0`.
///
/// Corresponds to `QuantLib::Fdm1DimSolver`.
#[derive(Debug)]
pub struct Fdm1DimSolver {
    mesher: Arc<FdmMesher>,
    locations: Array,
    values: Array,
    theta_time: Time,
    value: CubicNaturalSpline,
    snapshot: CubicNaturalSpline,
    first: LinearInterpolation,
    second: LinearInterpolation,
}

impl Fdm1DimSolver {
    /// Roll `desc` back from maturity to today with `scheme` and `op`.
    ///
    /// # Errors
    /// `Error::Configuration` unless the mesh is one-dimensional with at
    /// least three points and the maturity is positive; any error of the
    /// rollback.
    pub fn new(desc: FdmSolverDesc, scheme: FdmSchemeDesc, op: Box<dyn FdmLinearOpComposite>) -> Result<Self> {
        let FdmSolverDesc {
            mesher,
            bcs,
            mut condition,
            calculator,
            maturity,
            time_steps,
            damping_steps,
        } = desc;
        ensure_config!(
            mesher.dimensions() == 1,
            "expected a one-dimensional mesh, got {} dimensions",
            mesher.dimensions()
        );
        // derivatives are interpolated through at least two interior nodes
        ensure_config!(
            mesher.size() >= 4,
            "a solver mesh needs at least 4 points, got {}",
            mesher.size()
        );
        ensure_config!(maturity > 0.0, "maturity must be positive, got {maturity}");

        let theta_time = 0.99 * (1.0 / 365.0_f64).min(maturity);
        condition.push(Box::new(FdmSnapshotCondition::new(theta_time)));

        let locations = mesher.locations(0)?;
        let mut values = Array::zeros(mesher.size());
        for i in 0..mesher.size() {
            values[i] = calculator.avg_inner_value(i, maturity)?;
        }
        debug!(size = mesher.size(), maturity, time_steps, damping_steps, "fdm 1d solver");

        let mut solver = FdmBackwardSolver::new(op, bcs, condition, scheme);
        solver.rollback(&mut values, maturity, 0.0, time_steps, damping_steps)?;
        ensure_post!(values.is_finite(), "rollback produced non-finite values");

        let snapshot = solver
            .condition()
            .snapshot_at(theta_time)
            .cloned()
            .ok_or_else(|| Error::Postcondition(format!("no snapshot was taken at t={theta_time}")))?;

        let xs = locations.as_slice();
        let d1 = TripleBandLinearOp::first_derivative(0, mesher.clone())?.apply(&values)?;
        let d2 = TripleBandLinearOp::second_derivative(0, mesher.clone())?.apply(&values)?;
        Ok(Self {
            value: CubicNaturalSpline::new(xs, values.as_slice())?,
            snapshot: CubicNaturalSpline::new(xs, snapshot.as_slice())?,
            first: interior_interpolation(xs, &d1)?,
            second: interior_interpolation(xs, &d2)?,
            mesher,
            locations,
            values,
            theta_time,
        })
    }

    /// The mesh.
    pub fn mesher(&self) -> &Arc<FdmMesher> {
        &self.mesher
    }

    /// Grid locations.
    pub fn locations(&self) -> &Array {
        &self.locations
    }

    /// Solution on the grid at `t = 0`.
    pub fn values(&self) -> &Array {
        &self.values
    }

    /// Solution at `x`.
    pub fn value_at(&self, x: Real) -> Real {
        self.value.operator(x)
    }

    /// `∂V/∂x` at `x`.
    pub fn derivative_x(&self, x: Real) -> Real {
        self.first.operator(x)
    }

    /// `∂²V/∂x²` at `x`.
    pub fn derivative_xx(&self, x: Real) -> Real {
        self.second.operator(x)
    }

    /// `∂V/∂t` at `x` and `t = 0`.
    pub fn theta_at(&self, x: Real) -> Real {
        (self.snapshot.operator(x) - self.value.operator(x)) / self.theta_time
    }

    /// Solution at the centre of the grid.
    pub fn value_at_center(&self) -> Real {
        value_at_center(&self.values)
    }
}

/// The middle value of `a`, or the mean of the two middle values if `a` has
/// an even length.
pub fn value_at_center(a: &Array) -> Real {
    let n = a.size();
    match n {
        0 => Real::NAN,
        _ if n % 2 == 1 => a[n / 2],
        _ => 0.5 * (a[n / 2 - 1] + a[n / 2]),
    }
}

/// Linear interpolation of a derivative through the interior nodes, where
/// the differences are defined.
fn interior_interpolation(xs: &[Real], d: &Array) -> Result<LinearInterpolation> {
    let n: Size = xs.len();
    LinearInterpolation::new(&xs[1..n - 1], &d.as_slice()[1..n - 1])
}
