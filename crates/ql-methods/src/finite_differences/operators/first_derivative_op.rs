//! Central first derivative on a non-uniform grid
//! (translates `ql/methods/finitedifferences/operators/firstderivativeop.hpp`).

use std::sync::Arc;

use ql_core::{errors::Result, Size};

use super::TripleBandLinearOp;
use crate::finite_differences::meshers::FdmMesher;

impl TripleBandLinearOp {
    /// `∂/∂x` along `direction`.
    ///
    /// Interior rows use the three-point central formula with spacings
    /// `h⁻ = x[i] − x[i−1]` and `h⁺ = x[i+1] − x[i]`:
    ///
    /// ```text
    /// (−h⁺ / (h⁻(h⁻+h⁺)),  (h⁺−h⁻) / (h⁻h⁺),  h⁻ / (h⁺(h⁻+h⁺)))
    /// ```
    ///
    /// which is exact for quadratics.  Edge rows fall back to one-sided
    /// differences.
    ///
    /// Corresponds to `QuantLib::FirstDerivativeOp`.
    pub fn first_derivative(direction: Size, mesher: Arc<FdmMesher>) -> Result<Self> {
        let mut op = Self::new(direction, mesher.clone())?;
        for i in 0..mesher.size() {
            match mesher.spacings(i, direction)? {
                (Some(hm), Some(hp)) => op.set_row(
                    i,
                    -hp / (hm * (hm + hp)),
                    (hp - hm) / (hm * hp),
                    hm / (hp * (hm + hp)),
                )?,
                (None, Some(hp)) => op.set_row(i, 0.0, -1.0 / hp, 1.0 / hp)?,
                (Some(hm), None) => op.set_row(i, -1.0 / hm, 1.0 / hm, 0.0)?,
                (None, None) => {}
            }
        }
        Ok(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finite_differences::meshers::Fdm1dMesher;
    use approx::assert_abs_diff_eq;
    use ql_math::Array;

    #[test]
    fn exact_for_quadratics_on_non_uniform_grids() {
        let m = Fdm1dMesher::predefined(vec![0.0, 0.1, 0.35, 0.4, 0.9, 1.0]).unwrap();
        let xs = m.locations().to_vec();
        let mesher = Arc::new(FdmMesher::from_1d(m).unwrap());
        let d1 = TripleBandLinearOp::first_derivative(0, mesher).unwrap();
        let f = Array::from_fn(xs.len(), |i| 3.0 * xs[i] * xs[i] - xs[i] + 2.0);
        let df = d1.apply(&f).unwrap();
        for i in 1..xs.len() - 1 {
            assert_abs_diff_eq!(df[i], 6.0 * xs[i] - 1.0, epsilon = 1e-12);
        }
        // one-sided at the edges: slope of the first and last chord
        assert_abs_diff_eq!(df[0], (f[1] - f[0]) / 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(df[5], (f[5] - f[4]) / 0.1, epsilon = 1e-12);
    }
}
