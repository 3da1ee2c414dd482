//! Fokker-Planck operator of the square-root process
//! (translates `ql/methods/finitedifferences/operators/fdmsquarerootfwdop.hpp`).
//!
//! The density `p(t, v)` of `dv = κ(θ − v) dt + σ√v dW` solves
//!
//! ```text
//! ∂p/∂t = ½σ² v ∂²p/∂v² + (κ(v − θ) + σ²) ∂p/∂v + κ p
//! ```
//!
//! with no probability flux through either end of the grid.  The operator
//! is time-independent and is evolved forward with
//! [`FiniteDifferenceModel::roll_forward`](crate::finite_differences::FiniteDifferenceModel::roll_forward).

use std::sync::Arc;

use ql_core::{ensure_config, errors::Result, Real, Size, Time};
use ql_math::Array;
use ql_processes::SquareRootProcess;

use super::{FdmLinearOpComposite, TripleBandLinearOp};
use crate::finite_differences::meshers::FdmMesher;

/// Unknown the density equation is written in.
///
/// Corresponds to `QuantLib::FdmSquareRootFwdOp::TransformationType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SquareRootTransform {
    /// The density `p(v)` on a variance grid.
    Plain,
    /// `q(v) = p(v) / v^ν` with `ν = 2κθ/σ² − 1`, on a variance grid.
    /// Removes the power-law behaviour of `p` at the origin.
    Power,
    /// `q(z) = v·p(v)`, the density of `z = ln v`, on a log-variance grid.
    Log,
}

/// Forward operator of a square-root process along one direction.
///
/// Corresponds to `QuantLib::FdmSquareRootFwdOp`.
#[derive(Debug, Clone)]
pub struct FdmSquareRootFwdOp {
    mesher: Arc<FdmMesher>,
    direction: Size,
    kappa: Real,
    theta: Real,
    sigma: Real,
    transform: SquareRootTransform,
    map: TripleBandLinearOp,
}

impl FdmSquareRootFwdOp {
    /// Operator for `process` along `direction` of `mesher`, whose
    /// locations are variances (or log-variances for
    /// [`SquareRootTransform::Log`]).
    ///
    /// # Errors
    /// `Error::Configuration` for fewer than three points along `direction`
    /// or a variance grid that does not start above zero.
    pub fn new(
        mesher: Arc<FdmMesher>,
        process: &SquareRootProcess,
        direction: Size,
        transform: SquareRootTransform,
    ) -> Result<Self> {
        mesher.layout().check_direction(direction)?;
        let nodes = mesher.mesher(direction)?.locations().to_vec();
        ensure_config!(
            nodes.len() >= 3,
            "the square-root operator needs at least 3 points, got {}",
            nodes.len()
        );
        ensure_config!(
            transform == SquareRootTransform::Log || nodes[0] > 0.0,
            "a variance grid must start above zero, got {}",
            nodes[0]
        );

        let (kappa, theta, sigma) = (process.speed(), process.mean(), process.volatility());
        let s2 = sigma * sigma;
        let x = mesher.locations(direction)?;
        let dx = TripleBandLinearOp::first_derivative(direction, mesher.clone())?;
        let dxx = TripleBandLinearOp::second_derivative(direction, mesher.clone())?;

        let (drift, half_variance, constant) = match transform {
            SquareRootTransform::Plain => (
                x.map(|v| kappa * (v - theta) + s2),
                x.map(|v| 0.5 * s2 * v),
                x.map(|_| kappa),
            ),
            SquareRootTransform::Power => (
                x.map(|v| kappa * (v + theta)),
                x.map(|v| 0.5 * s2 * v),
                x.map(|_| 2.0 * kappa * kappa * theta / s2),
            ),
            SquareRootTransform::Log => (
                x.map(|z| (-z).exp() * (-0.5 * s2 - kappa * theta) + kappa),
                x.map(|z| 0.5 * s2 * (-z).exp()),
                x.map(|z| kappa * theta * (-z).exp()),
            ),
        };
        let mut map =
            TripleBandLinearOp::axpyb(Some(&drift), &dx, &dxx.mult(&half_variance)?, None)?.add_array(&constant)?;

        let edges = ZeroFlux {
            v: &nodes,
            kappa,
            theta,
            sigma,
            transform,
        };
        let (_, beta, gamma) = edges.coefficients(1);
        let (b, c, f) = edges.lower();
        let lower_row = (0.0, beta + f * b, gamma + f * c);
        let n = nodes.len();
        let (alpha_n, beta_n, _) = edges.coefficients(n);
        let (b, c, f) = edges.upper();
        let upper_row = (alpha_n + f * c, beta_n + f * b, 0.0);

        for line in mesher.layout().lines(direction)? {
            if let (Some(&first), Some(&last)) = (line.first(), line.last()) {
                map.set_row(first, lower_row.0, lower_row.1, lower_row.2)?;
                map.set_row(last, upper_row.0, upper_row.1, upper_row.2)?;
            }
        }

        Ok(Self {
            mesher,
            direction,
            kappa,
            theta,
            sigma,
            transform,
            map,
        })
    }

    /// The unknown the equation is written in.
    pub fn transform(&self) -> SquareRootTransform {
        self.transform
    }

    /// `(κ, θ, σ)` of the process.
    pub fn parameters(&self) -> (Real, Real, Real) {
        (self.kappa, self.theta, self.sigma)
    }

    /// `ν = 2κθ/σ² − 1`, the exponent of [`SquareRootTransform::Power`].
    pub fn power_exponent(&self) -> Real {
        2.0 * self.kappa * self.theta / (self.sigma * self.sigma) - 1.0
    }
}

impl FdmLinearOpComposite for FdmSquareRootFwdOp {
    fn directions(&self) -> Size {
        self.mesher.dimensions()
    }

    fn mesher(&self) -> &Arc<FdmMesher> {
        &self.mesher
    }

    fn set_time(&mut self, _t1: Time, _t2: Time) -> Result<()> {
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

// ── Zero-flux edge rows ───────────────────────────────────────────────────────

/// Stencil geometry of one grid line, indexed from 1 with a ghost node at
/// 0 and at `n + 1`.  The ghost value is eliminated through the zero-flux
/// condition, which scales a fixed combination of the neighbours by a
/// transform-dependent factor.
struct ZeroFlux<'a> {
    v: &'a [Real],
    kappa: Real,
    theta: Real,
    sigma: Real,
    transform: SquareRootTransform,
}

impl ZeroFlux<'_> {
    fn v(&self, i: Size) -> Real {
        let n = self.v.len();
        match i {
            0 => match self.transform {
                SquareRootTransform::Log => 2.0 * self.v[0] - self.v[1],
                _ => (0.5 * self.v[0]).max(self.v[0] - 0.01 * (self.v[1] - self.v[0])),
            },
            i if i == n + 1 => 2.0 * self.v[n - 1] - self.v[n - 2],
            i => self.v[i - 1],
        }
    }

    fn h(&self, i: Size) -> Real {
        self.v(i + 1) - self.v(i)
    }

    fn zetam(&self, i: Size) -> Real {
        self.h(i - 1) * (self.h(i - 1) + self.h(i))
    }

    fn zeta(&self, i: Size) -> Real {
        self.h(i - 1) * self.h(i)
    }

    fn zetap(&self, i: Size) -> Real {
        self.h(i) * (self.h(i - 1) + self.h(i))
    }

    fn s2(&self) -> Real {
        self.sigma * self.sigma
    }

    /// Diffusion coefficient (times two) and drift at node `i`.
    fn diffusion_and_drift(&self, i: Size) -> (Real, Real) {
        let (k, th, s2, v) = (self.kappa, self.theta, self.s2(), self.v(i));
        match self.transform {
            SquareRootTransform::Plain => (s2 * v, k * (v - th) + s2),
            SquareRootTransform::Power => (s2 * v, k * (v + th)),
            SquareRootTransform::Log => {
                let e = (-v).exp();
                (s2 * e, (-k * th - 0.5 * s2) * e + k)
            }
        }
    }

    /// `(α, β, γ)` of the interior stencil centred at node `i`.
    fn coefficients(&self, i: Size) -> (Real, Real, Real) {
        let (d, mu) = self.diffusion_and_drift(i);
        let constant = match self.transform {
            SquareRootTransform::Plain => self.kappa,
            SquareRootTransform::Power => 2.0 * self.kappa * self.kappa * self.theta / self.s2(),
            SquareRootTransform::Log => self.kappa * self.theta * (-self.v(i)).exp(),
        };
        let (hm, hp) = (self.h(i - 1), self.h(i));
        (
            (d - mu * hp) / self.zetam(i),
            (-d + mu * (hp - hm)) / self.zeta(i) + constant,
            (d + mu * hm) / self.zetap(i),
        )
    }

    /// `ν(g)`: the zero-flux relation evaluated at the ghost node `g`,
    /// plus the weight `w(g)` the ghost value is scaled by.
    fn ghost(&self, g: Size, a: Real) -> (Real, Real) {
        let (k, th, s2, vg) = (self.kappa, self.theta, self.s2(), self.v(g));
        match self.transform {
            SquareRootTransform::Plain => (a * vg + (2.0 * k * (vg - th) + s2) / s2, vg),
            SquareRootTransform::Power => (a * vg + 2.0 * k * vg / s2, vg),
            SquareRootTransform::Log => {
                let e = (-vg).exp();
                (a * e + 2.0 * k * (1.0 - th * e) / s2, e)
            }
        }
    }

    /// `(b, c, f)` of the first node's row.
    fn lower(&self) -> (Real, Real, Real) {
        let a = -(2.0 * self.h(0) + self.h(1)) / self.zetam(1);
        let (alpha, _, _) = self.coefficients(1);
        let (nu, w) = self.ghost(0, a);
        (
            -(self.h(0) + self.h(1)) / self.zeta(1),
            self.h(0) / self.zetap(1),
            alpha / nu * w,
        )
    }

    /// `(b, c, f)` of the last node's row.
    fn upper(&self) -> (Real, Real, Real) {
        let n = self.v.len();
        let a = (2.0 * self.h(n) + self.h(n - 1)) / self.zetap(n);
        let (_, _, gamma) = self.coefficients(n);
        let (nu, w) = self.ghost(n + 1, a);
        (
            (self.h(n) + self.h(n - 1)) / self.zeta(n),
            -self.h(n) / self.zetam(n),
            gamma / nu * w,
        )
    }
}
