//! Douglas ADI scheme
//! (translates `ql/methods/finitedifferences/schemes/douglasscheme.hpp`).
//!
//! For `L = L₀ + … + L_{d−1}` one backward step is
//!
//! ```text
//! y₀ = a + dt·L·a
//! (I − θ·dt·L_i)·y_{i+1} = y_i − θ·dt·L_i·a      for i = 0 … d−1
//! ```
//!
//! For a single direction this is the theta scheme.

use ql_core::{
    ensure_config,
    errors::{Error, Result},
    Real, Time,
};
use ql_math::Array;
use tracing::trace;

use super::mixed_scheme::at_step;
use super::Evolver;
use crate::finite_differences::boundary_conditions::{self, BoundaryConditionSet, BoundaryConditionType};
use crate::finite_differences::operators::FdmLinearOpComposite;

/// Operator-splitting scheme for multi-direction operators.
///
/// Corresponds to `QuantLib::DouglasScheme`.
#[derive(Debug)]
pub struct DouglasScheme {
    op: Box<dyn FdmLinearOpComposite>,
    bcs: BoundaryConditionSet,
    theta: Real,
    dt: Option<Time>,
}

impl DouglasScheme {
    /// Scheme with implicitness `theta`.
    ///
    /// # Errors
    /// `Error::Configuration` if `theta` is outside `[0, 1]` or two boundary
    /// conditions collide.
    pub fn new(op: Box<dyn FdmLinearOpComposite>, bcs: BoundaryConditionSet, theta: Real) -> Result<Self> {
        ensure_config!((0.0..=1.0).contains(&theta), "theta must lie in [0, 1], got {theta}");
        boundary_conditions::validate(&bcs)?;
        Ok(Self {
            op,
            bcs,
            theta,
            dt: None,
        })
    }

    fn do_step(&mut self, a: &mut Array, t: Time, dt: Time) -> Result<()> {
        ensure_config!(
            a.size() == self.op.mesher().size(),
            "array of size {} does not match a mesh of size {}",
            a.size(),
            self.op.mesher().size()
        );
        self.op.set_time((t - dt).max(0.0), t)?;
        for bc in &mut self.bcs {
            bc.set_time(t - dt)?;
        }

        let mut y = a.clone();
        y.axpy(dt, &self.op.apply(a)?);
        for bc in &self.bcs {
            bc.after_applying(&mut y);
        }

        for direction in 0..self.op.directions() {
            let mut rhs = y;
            rhs.axpy(-self.theta * dt, &self.op.apply_direction(direction, a)?);
            let active: Vec<_> = self
                .bcs
                .iter()
                .filter(|bc| bc.direction() == direction && bc.kind() != BoundaryConditionType::None)
                .collect();
            y = if active.is_empty() {
                self.op.solve_splitting(direction, &rhs, -self.theta * dt)?
            } else {
                let mut m = self.op.band(direction)?.scaled_plus_identity(-self.theta * dt);
                for bc in &active {
                    bc.before_solving(&mut m, &mut rhs)?;
                }
                let mut solved = m.solve_for(&rhs)?;
                for bc in &active {
                    bc.after_solving(&mut solved);
                }
                solved
            };
        }
        *a = y;
        Ok(())
    }
}

impl Evolver for DouglasScheme {
    fn step(&mut self, a: &mut Array, t: Time) -> Result<()> {
        let dt = self
            .dt
            .ok_or_else(|| Error::Configuration("time step not set before stepping".into()))?;
        trace!(t, dt, theta = self.theta, "douglas step");
        self.do_step(a, t, dt).map_err(|e| at_step(e, t))
    }

    fn set_step(&mut self, dt: Time) {
        self.dt = Some(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finite_differences::boundary_conditions::{BoundaryCondition, BoundarySide};
    use crate::finite_differences::meshers::{Fdm1dMesher, FdmMesher};
    use crate::finite_differences::operators::{FdmSplitOp, TripleBandLinearOp};
    use crate::finite_differences::schemes::MixedScheme;
    use std::f64::consts::PI;
    use std::sync::Arc;

    #[test]
    fn two_dimensional_heat_mode() {
        // sin(πx)·sin(πy) decays like exp(−2π² τ) under u_τ = Δu
        let x = Arc::new(Fdm1dMesher::uniform(0.0, 1.0, 31).unwrap());
        let m = Arc::new(FdmMesher::new(vec![x.clone(), x]).unwrap());
        let op = FdmSplitOp::new(vec![
            TripleBandLinearOp::second_derivative(0, m.clone()).unwrap(),
            TripleBandLinearOp::second_derivative(1, m.clone()).unwrap(),
        ])
        .unwrap();
        let mut bcs = Vec::new();
        for direction in 0..2 {
            for side in [BoundarySide::Lower, BoundarySide::Upper] {
                bcs.push(BoundaryCondition::dirichlet(side, 0.0, direction, &m).unwrap());
            }
        }
        let mut scheme = DouglasScheme::new(Box::new(op), bcs, 0.5).unwrap();
        let xs = m.locations(0).unwrap();
        let ys = m.locations(1).unwrap();
        let mut a = Array::from_fn(m.size(), |i| (PI * xs[i]).sin() * (PI * ys[i]).sin());
        let dt = 0.0005;
        scheme.set_step(dt);
        for k in 0..100 {
            scheme.step(&mut a, 0.05 - k as Real * dt).unwrap();
        }
        let centre = m.layout().index(&[15, 15]).unwrap();
        let expected = (-2.0 * PI * PI * 0.05).exp();
        assert!((a[centre] - expected).abs() < 2e-3, "{} vs {expected}", a[centre]);
    }

    #[test]
    fn reduces_to_the_theta_scheme_in_one_dimension() {
        let m = Arc::new(FdmMesher::from_1d(Fdm1dMesher::uniform(0.0, 1.0, 21).unwrap()).unwrap());
        let op = FdmSplitOp::new(vec![TripleBandLinearOp::second_derivative(0, m.clone()).unwrap()]).unwrap();
        let a0 = m.locations(0).unwrap().map(|x| (3.0 * x).cos());
        let mut douglas = DouglasScheme::new(Box::new(op.clone()), vec![], 0.5).unwrap();
        let mut cn = MixedScheme::crank_nicolson(Box::new(op), vec![]).unwrap();
        let (mut a, mut b) = (a0.clone(), a0);
        douglas.set_step(0.01);
        cn.set_step(0.01);
        douglas.step(&mut a, 1.0).unwrap();
        cn.step(&mut b, 1.0).unwrap();
        for i in 0..21 {
            assert!((a[i] - b[i]).abs() < 1e-12);
        }
    }
}
