//! Natural cubic spline (translates the `CubicInterpolation::Spline`
//! variant of `ql/math/interpolations/cubicinterpolation.hpp` with
//! second-derivative boundary conditions set to zero).
//!
//! On each interval `[x_i, x_{i+1}]` the spline is stored as
//!
//!   `f(x) = y_i + dx*(a_i + dx*(b_i + dx*c_i))`,  `dx = x - x_i`.

use ql_core::{errors::Result, Real};

use super::{check_points, locate, Interpolation1D};

/// Natural cubic spline: C² with vanishing second derivative at both ends.
///
/// Corresponds to `QuantLib::CubicNaturalSpline`.
#[derive(Debug, Clone)]
pub struct CubicNaturalSpline {
    xs: Vec<Real>,
    ys: Vec<Real>,
    a: Vec<Real>,
    b: Vec<Real>,
    c: Vec<Real>,
}

impl CubicNaturalSpline {
    /// Build the spline through `(xs[i], ys[i])`.
    ///
    /// Two points give the straight line through them.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        check_points(xs, ys, 2)?;
        let n = xs.len();
        let h: Vec<Real> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let s: Vec<Real> = (0..n - 1).map(|i| (ys[i + 1] - ys[i]) / h[i]).collect();

        // second derivatives at the nodes, m[0] = m[n-1] = 0
        let mut m = vec![0.0; n];
        if n > 2 {
            let k = n - 2;
            let mut upper = vec![0.0; k];
            let mut rhs = vec![0.0; k];
            let mut bet = 2.0 * (h[0] + h[1]);
            rhs[0] = 6.0 * (s[1] - s[0]) / bet;
            for j in 1..k {
                upper[j] = h[j] / bet;
                bet = 2.0 * (h[j] + h[j + 1]) - h[j] * upper[j];
                rhs[j] = (6.0 * (s[j + 1] - s[j]) - h[j] * rhs[j - 1]) / bet;
            }
            for j in (0..k - 1).rev() {
                rhs[j] -= upper[j + 1] * rhs[j + 1];
            }
            m[1..n - 1].copy_from_slice(&rhs);
        }

        let mut a = Vec::with_capacity(n - 1);
        let mut b = Vec::with_capacity(n - 1);
        let mut c = Vec::with_capacity(n - 1);
        for i in 0..n - 1 {
            a.push(s[i] - h[i] * (2.0 * m[i] + m[i + 1]) / 6.0);
            b.push(0.5 * m[i]);
            c.push((m[i + 1] - m[i]) / (6.0 * h[i]));
        }

        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            a,
            b,
            c,
        })
    }
}

impl Interpolation1D for CubicNaturalSpline {
    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        self.xs[self.xs.len() - 1]
    }

    fn operator(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        let dx = x - self.xs[i];
        self.ys[i] + dx * (self.a[i] + dx * (self.b[i] + dx * self.c[i]))
    }

    fn derivative(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        let dx = x - self.xs[i];
        self.a[i] + dx * (2.0 * self.b[i] + 3.0 * dx * self.c[i])
    }

    fn second_derivative(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        let dx = x - self.xs[i];
        2.0 * self.b[i] + 6.0 * dx * self.c[i]
    }
}
