//! Theta scheme for single-direction operators
//! (translates `ql/methods/finitedifferences/mixedscheme.hpp`).
//!
//! With `θ ∈ [0, 1]` one backward step solves
//!
//! ```text
//! (I − θ·dt·L)·a' = (I + (1−θ)·dt·L)·a
//! ```
//!
//! `θ = 0` is explicit Euler, `θ = 1` implicit Euler and `θ = ½`
//! Crank-Nicolson.

use ql_core::{
    ensure_config,
    errors::{Error, Result},
    Real, Time,
};
use ql_math::Array;
use tracing::trace;

use super::Evolver;
use crate::finite_differences::boundary_conditions::{self, BoundaryConditionSet};
use crate::finite_differences::operators::FdmLinearOpComposite;

/// Theta scheme with boundary conditions.
///
/// Corresponds to `QuantLib::MixedScheme`.
#[derive(Debug)]
pub struct MixedScheme {
    op: Box<dyn FdmLinearOpComposite>,
    bcs: BoundaryConditionSet,
    theta: Real,
    dt: Option<Time>,
}

impl MixedScheme {
    /// Scheme with implicitness `theta`.
    ///
    /// # Errors
    /// `Error::Configuration` if `theta` is outside `[0, 1]`, the operator
    /// has more than one direction, or two boundary conditions collide.
    pub fn new(op: Box<dyn FdmLinearOpComposite>, bcs: BoundaryConditionSet, theta: Real) -> Result<Self> {
        ensure_config!((0.0..=1.0).contains(&theta), "theta must lie in [0, 1], got {theta}");
        ensure_config!(
            op.directions() == 1,
            "the theta scheme needs a one-direction operator, got {} directions",
            op.directions()
        );
        boundary_conditions::validate(&bcs)?;
        Ok(Self {
            op,
            bcs,
            theta,
            dt: None,
        })
    }

    /// `θ = 0`.
    ///
    /// Corresponds to `QuantLib::ExplicitEuler`.
    pub fn explicit_euler(op: Box<dyn FdmLinearOpComposite>, bcs: BoundaryConditionSet) -> Result<Self> {
        Self::new(op, bcs, 0.0)
    }

    /// `θ = 1`.
    ///
    /// Corresponds to `QuantLib::ImplicitEuler`.
    pub fn implicit_euler(op: Box<dyn FdmLinearOpComposite>, bcs: BoundaryConditionSet) -> Result<Self> {
        Self::new(op, bcs, 1.0)
    }

    /// `θ = ½`.
    ///
    /// Corresponds to `QuantLib::CrankNicolson`.
    pub fn crank_nicolson(op: Box<dyn FdmLinearOpComposite>, bcs: BoundaryConditionSet) -> Result<Self> {
        Self::new(op, bcs, 0.5)
    }

    /// Implicitness of the scheme.
    pub fn theta(&self) -> Real {
        self.theta
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
        let band = self.op.band(0)?;

        if self.theta != 1.0 {
            let mut explicit = band.scaled_plus_identity((1.0 - self.theta) * dt);
            for bc in &self.bcs {
                bc.before_applying(&mut explicit)?;
            }
            *a = explicit.apply(a)?;
            for bc in &self.bcs {
                bc.after_applying(a);
            }
        }
        if self.theta != 0.0 {
            let mut implicit = band.scaled_plus_identity(-self.theta * dt);
            for bc in &self.bcs {
                bc.before_solving(&mut implicit, a)?;
            }
            *a = implicit.solve_for(a)?;
            for bc in &self.bcs {
                bc.after_solving(a);
            }
        }
        Ok(())
    }
}

impl Evolver for MixedScheme {
    fn step(&mut self, a: &mut Array, t: Time) -> Result<()> {
        let dt = self
            .dt
            .ok_or_else(|| Error::Configuration("time step not set before stepping".into()))?;
        trace!(t, dt, theta = self.theta, "mixed scheme step");
        self.do_step(a, t, dt).map_err(|e| at_step(e, t))
    }

    fn set_step(&mut self, dt: Time) {
        self.dt = Some(dt);
    }
}

/// Attach the step time to numerical failures.
pub(super) fn at_step(error: Error, t: Time) -> Error {
    match error {
        Error::Numerical(msg) => Error::Numerical(format!("{msg} at step t={t}")),
        other => other,
    }
}
