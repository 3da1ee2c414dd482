//! Tridiagonal operator acting along one direction of a mesh
//! (translates `ql/methods/finitedifferences/operators/triplebandlinearop.hpp`).
//!
//! Row `i` couples grid point `i` with its lower and upper neighbours along
//! the operator's direction:
//!
//! ```text
//! (L·a)[i] = lower[i]·a[i−s] + diag[i]·a[i] + upper[i]·a[i+s]
//! ```
//!
//! where `s` is the stride of the direction.  At a grid edge the missing
//! neighbour's coefficient is always zero.

use std::sync::Arc;

use ql_core::{ensure_config, errors::Error, errors::Result, Real, Size};
use ql_math::Array;
use tracing::trace;

use crate::finite_differences::meshers::FdmMesher;

/// Pivots below this multiple of the row magnitude are treated as zero.
const PIVOT_TOLERANCE: Real = 1e-14;

/// Banded operator with three diagonals along a single mesh direction.
///
/// Corresponds to `QuantLib::TripleBandLinearOp`.
#[derive(Debug, Clone, PartialEq)]
pub struct TripleBandLinearOp {
    direction: Size,
    mesher: Arc<FdmMesher>,
    i0: Arc<Vec<Size>>,
    i2: Arc<Vec<Size>>,
    lines: Arc<Vec<Vec<Size>>>,
    lower: Vec<Real>,
    diag: Vec<Real>,
    upper: Vec<Real>,
}

impl TripleBandLinearOp {
    /// The zero operator along `direction`.
    pub fn new(direction: Size, mesher: Arc<FdmMesher>) -> Result<Self> {
        let layout = mesher.layout();
        layout.check_direction(direction)?;
        let n = layout.size();
        let last = layout.dim()[direction] - 1;
        let mut i0 = Vec::with_capacity(n);
        let mut i2 = Vec::with_capacity(n);
        for i in 0..n {
            let c = layout.coordinate(i, direction);
            i0.push(if c > 0 { layout.neighbourhood(i, direction, -1)? } else { i });
            i2.push(if c < last { layout.neighbourhood(i, direction, 1)? } else { i });
        }
        let lines = layout.lines(direction)?;
        Ok(Self {
            direction,
            mesher,
            i0: Arc::new(i0),
            i2: Arc::new(i2),
            lines: Arc::new(lines),
            lower: vec![0.0; n],
            diag: vec![0.0; n],
            upper: vec![0.0; n],
        })
    }

    /// The identity operator along `direction`.
    pub fn identity(direction: Size, mesher: Arc<FdmMesher>) -> Result<Self> {
        let mut op = Self::new(direction, mesher)?;
        op.diag.fill(1.0);
        Ok(op)
    }

    /// Direction the operator acts along.
    pub fn direction(&self) -> Size {
        self.direction
    }

    /// The mesh the operator is defined on.
    pub fn mesher(&self) -> &Arc<FdmMesher> {
        &self.mesher
    }

    /// Number of rows.
    pub fn size(&self) -> Size {
        self.diag.len()
    }

    /// Sub-diagonal coefficients, one per row.
    pub fn lower(&self) -> &[Real] {
        &self.lower
    }

    /// Diagonal coefficients.
    pub fn diag(&self) -> &[Real] {
        &self.diag
    }

    /// Super-diagonal coefficients.
    pub fn upper(&self) -> &[Real] {
        &self.upper
    }

    /// `(lower, diag, upper)` coefficients of row `i`.
    pub fn row(&self, i: Size) -> Result<(Real, Real, Real)> {
        self.check_row(i)?;
        Ok((self.lower[i], self.diag[i], self.upper[i]))
    }

    /// Overwrite row `i`.
    ///
    /// # Errors
    /// `Error::Configuration` if a non-zero coefficient is given for a
    /// neighbour outside the grid.
    pub fn set_row(&mut self, i: Size, lower: Real, diag: Real, upper: Real) -> Result<()> {
        self.check_row(i)?;
        ensure_config!(
            lower == 0.0 || self.i0[i] != i,
            "row {i} sits on the lower edge and has no lower neighbour"
        );
        ensure_config!(
            upper == 0.0 || self.i2[i] != i,
            "row {i} sits on the upper edge and has no upper neighbour"
        );
        self.lower[i] = lower;
        self.diag[i] = diag;
        self.upper[i] = upper;
        Ok(())
    }

    /// `L·a`.
    pub fn apply(&self, a: &Array) -> Result<Array> {
        self.check_size(a.size())?;
        Ok(Array::from_fn(self.size(), |i| {
            self.lower[i] * a[self.i0[i]] + self.diag[i] * a[i] + self.upper[i] * a[self.i2[i]]
        }))
    }

    /// Solve `(a·L + b·I)·x = r` by Thomas elimination along every grid line.
    ///
    /// # Errors
    /// `Error::Numerical` when a pivot vanishes, `Error::Configuration` on a
    /// size mismatch.
    pub fn solve_splitting(&self, r: &Array, a: Real, b: Real) -> Result<Array> {
        self.check_size(r.size())?;
        let mut x = Array::zeros(self.size());
        let mut c_prime = Vec::new();
        let mut r_prime = Vec::new();
        for line in self.lines.iter() {
            let n = line.len();
            c_prime.clear();
            r_prime.clear();
            for (k, &row) in line.iter().enumerate() {
                let sub = if k > 0 { a * self.lower[row] } else { 0.0 };
                let sup = if k + 1 < n { a * self.upper[row] } else { 0.0 };
                let d = a * self.diag[row] + b;
                let (prev_c, prev_r) = if k > 0 { (c_prime[k - 1], r_prime[k - 1]) } else { (0.0, 0.0) };
                let pivot = d - sub * prev_c;
                let scale = d.abs() + sub.abs() + sup.abs();
                if !(pivot.abs() > PIVOT_TOLERANCE * scale) {
                    trace!(row, pivot, "zero pivot");
                    return Err(Error::Numerical("singular tridiagonal system".into()));
                }
                c_prime.push(sup / pivot);
                r_prime.push((r[row] - sub * prev_r) / pivot);
            }
            x[line[n - 1]] = r_prime[n - 1];
            for k in (0..n - 1).rev() {
                x[line[k]] = r_prime[k] - c_prime[k] * x[line[k + 1]];
            }
        }
        if !x.is_finite() {
            return Err(Error::Numerical("non-finite solution of tridiagonal system".into()));
        }
        Ok(x)
    }

    /// Solve `L·x = r`.
    pub fn solve_for(&self, r: &Array) -> Result<Array> {
        self.solve_splitting(r, 1.0, 0.0)
    }

    /// `L + other`.
    ///
    /// # Errors
    /// `Error::Configuration` if the operators act along different
    /// directions or live on different meshes.
    #[allow(clippy::should_implement_trait)]
    pub fn add(&self, other: &TripleBandLinearOp) -> Result<Self> {
        self.check_compatible(other)?;
        let mut out = self.clone();
        for i in 0..self.size() {
            out.lower[i] += other.lower[i];
            out.diag[i] += other.diag[i];
            out.upper[i] += other.upper[i];
        }
        Ok(out)
    }

    /// `k·L`.
    pub fn scale(&self, k: Real) -> Self {
        let mut out = self.clone();
        for v in out
            .lower
            .iter_mut()
            .chain(out.diag.iter_mut())
            .chain(out.upper.iter_mut())
        {
            *v *= k;
        }
        out
    }

    /// `diag(u)·L`, scaling row `i` by `u[i]`.
    pub fn mult(&self, u: &Array) -> Result<Self> {
        self.check_size(u.size())?;
        let mut out = self.clone();
        for i in 0..self.size() {
            out.lower[i] *= u[i];
            out.diag[i] *= u[i];
            out.upper[i] *= u[i];
        }
        Ok(out)
    }

    /// `L·diag(u)`, scaling column `j` by `u[j]`.
    pub fn mult_r(&self, u: &Array) -> Result<Self> {
        self.check_size(u.size())?;
        let mut out = self.clone();
        for i in 0..self.size() {
            out.lower[i] *= u[self.i0[i]];
            out.diag[i] *= u[i];
            out.upper[i] *= u[self.i2[i]];
        }
        Ok(out)
    }

    /// `L + diag(u)`.
    pub fn add_array(&self, u: &Array) -> Result<Self> {
        self.check_size(u.size())?;
        let mut out = self.clone();
        for (d, v) in out.diag.iter_mut().zip(u.iter()) {
            *d += v;
        }
        Ok(out)
    }

    /// `I + k·L`.
    pub fn scaled_plus_identity(&self, k: Real) -> Self {
        let mut out = self.scale(k);
        for d in out.diag.iter_mut() {
            *d += 1.0;
        }
        out
    }

    /// `diag(a)·x + y + diag(b)`, where a missing `a` drops the first term
    /// and a missing `b` the last.  Coefficient arrays hold either one value
    /// per row or a single value for every row.
    ///
    /// Corresponds to `QuantLib::TripleBandLinearOp::axpyb`.
    pub fn axpyb(
        a: Option<&Array>,
        x: &TripleBandLinearOp,
        y: &TripleBandLinearOp,
        b: Option<&Array>,
    ) -> Result<Self> {
        x.check_compatible(y)?;
        for c in a.iter().chain(b.iter()) {
            if c.size() != 1 {
                x.check_size(c.size())?;
            }
        }
        let mut out = y.clone();
        for i in 0..out.size() {
            if let Some(s) = coefficient_at(a, i) {
                out.lower[i] += s * x.lower[i];
                out.diag[i] += s * x.diag[i];
                out.upper[i] += s * x.upper[i];
            }
            if let Some(s) = coefficient_at(b, i) {
                out.diag[i] += s;
            }
        }
        Ok(out)
    }

    fn check_row(&self, i: Size) -> Result<()> {
        if i >= self.size() {
            return Err(Error::IndexOutOfRange {
                index: i,
                size: self.size(),
            });
        }
        Ok(())
    }

    fn check_size(&self, n: Size) -> Result<()> {
        ensure_config!(
            n == self.size(),
            "array of size {n} does not match an operator of size {}",
            self.size()
        );
        Ok(())
    }

    fn check_compatible(&self, other: &TripleBandLinearOp) -> Result<()> {
        ensure_config!(
            self.direction == other.direction,
            "cannot combine operators along directions {} and {}",
            self.direction,
            other.direction
        );
        ensure_config!(
            Arc::ptr_eq(&self.mesher, &other.mesher) || self.mesher == other.mesher,
            "cannot combine operators defined on different meshes"
        );
        Ok(())
    }
}

fn coefficient_at(c: Option<&Array>, i: Size) -> Option<Real> {
    c.map(|c| if c.size() == 1 { c[0] } else { c[i] })
}

/// Sum of a non-empty list of operators along the same direction.
pub fn add_operators(ops: &[TripleBandLinearOp]) -> Result<TripleBandLinearOp> {
    let (first, rest) = ops
        .split_first()
        .ok_or_else(|| Error::Configuration("cannot sum an empty list of operators".into()))?;
    rest.iter().try_fold(first.clone(), |acc, op| acc.add(op))
}
