//! Interface of the spatial operators driven by the time-stepping schemes
//! (translates `ql/methods/finitedifferences/operators/fdmlinearopcomposite.hpp`).

use std::fmt;
use std::sync::Arc;

use ql_core::{errors::Result, Real, Size, Time};
use ql_math::Array;

use super::TripleBandLinearOp;
use crate::finite_differences::meshers::FdmMesher;

/// A spatial operator `L(t)` split into one tridiagonal part per mesh
/// direction plus an optional mixed part:
///
/// ```text
/// L = L₀ + L₁ + … + L_mixed
/// ```
///
/// Schemes call [`set_time`](Self::set_time) once per step before any other
/// method.
///
/// Corresponds to `QuantLib::FdmLinearOpComposite`.
pub trait FdmLinearOpComposite: fmt::Debug + Send {
    /// Number of direction splits.
    fn directions(&self) -> Size;

    /// The mesh the operator is defined on.
    fn mesher(&self) -> &Arc<FdmMesher>;

    /// Freeze time-dependent coefficients for a step from `t1` to `t2`.
    fn set_time(&mut self, t1: Time, t2: Time) -> Result<()>;

    /// `L·r`.
    fn apply(&self, r: &Array) -> Result<Array>;

    /// `L_mixed·r`.
    fn apply_mixed(&self, r: &Array) -> Result<Array> {
        Ok(Array::zeros(r.size()))
    }

    /// `L_direction·r`.
    fn apply_direction(&self, direction: Size, r: &Array) -> Result<Array>;

    /// Solve `(I + a·L_direction)·x = r`.
    fn solve_splitting(&self, direction: Size, r: &Array, a: Real) -> Result<Array>;

    /// The tridiagonal part along `direction` as a standalone operator.
    fn band(&self, direction: Size) -> Result<TripleBandLinearOp>;

    /// Clone into a fresh box.
    fn clone_box(&self) -> Box<dyn FdmLinearOpComposite>;
}

impl Clone for Box<dyn FdmLinearOpComposite> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
