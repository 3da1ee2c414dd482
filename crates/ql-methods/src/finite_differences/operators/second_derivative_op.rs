//! Second derivative on a non-uniform grid
//! (translates `ql/methods/finitedifferences/operators/secondderivativeop.hpp`).

use std::sync::Arc;

use ql_core::{errors::Result, Size};

use super::TripleBandLinearOp;
use crate::finite_differences::meshers::FdmMesher;

impl TripleBandLinearOp {
    /// `∂²/∂x²` along `direction`.
    ///
    /// Interior rows use
    /// `(2/(h⁻(h⁻+h⁺)), −2/(h⁻h⁺), 2/(h⁺(h⁻+h⁺)))`; edge rows are zero,
    /// i.e. the solution is taken to have no curvature at the grid edge.
    ///
    /// Corresponds to `QuantLib::SecondDerivativeOp`.
    pub fn second_derivative(direction: Size, mesher: Arc<FdmMesher>) -> Result<Self> {
        let mut op = Self::new(direction, mesher.clone())?;
        for i in 0..mesher.size() {
            if let (Some(hm), Some(hp)) = mesher.spacings(i, direction)? {
                op.set_row(
                    i,
                    2.0 / (hm * (hm + hp)),
                    -2.0 / (hm * hp),
                    2.0 / (hp * (hm + hp)),
                )?;
            }
        }
        Ok(op)
    }
}
