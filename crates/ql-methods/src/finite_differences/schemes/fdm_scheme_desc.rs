//! Scheme selection
//! (translates `ql/methods/finitedifferences/solvers/fdmbackwardsolver.hpp`, `FdmSchemeDesc`).

use ql_core::{ensure_config, errors::Result, Real};

use super::{DouglasScheme, Evolver, MixedScheme};
use crate::finite_differences::boundary_conditions::BoundaryConditionSet;
use crate::finite_differences::operators::FdmLinearOpComposite;

/// Available time-stepping schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FdmSchemeType {
    /// Explicit Euler.
    ExplicitEuler,
    /// Implicit Euler.
    ImplicitEuler,
    /// Crank-Nicolson, or any theta scheme.
    CrankNicolson,
    /// Douglas ADI splitting.
    Douglas,
}

/// Scheme type together with its implicitness.
///
/// Corresponds to `QuantLib::FdmSchemeDesc`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FdmSchemeDesc {
    /// The scheme.
    pub scheme_type: FdmSchemeType,
    /// Implicitness `θ`; ignored by the Euler schemes.
    pub theta: Real,
}

impl FdmSchemeDesc {
    /// `θ = 0` explicit Euler.
    pub fn explicit_euler() -> Self {
        Self {
            scheme_type: FdmSchemeType::ExplicitEuler,
            theta: 0.0,
        }
    }

    /// `θ = 1` implicit Euler.
    pub fn implicit_euler() -> Self {
        Self {
            scheme_type: FdmSchemeType::ImplicitEuler,
            theta: 1.0,
        }
    }

    /// `θ = ½` Crank-Nicolson.
    pub fn crank_nicolson() -> Self {
        Self {
            scheme_type: FdmSchemeType::CrankNicolson,
            theta: 0.5,
        }
    }

    /// Douglas splitting with `θ = ½`.
    pub fn douglas() -> Self {
        Self {
            scheme_type: FdmSchemeType::Douglas,
            theta: 0.5,
        }
    }

    /// Override the implicitness.
    pub fn with_theta(mut self, theta: Real) -> Self {
        self.theta = theta;
        self
    }

    /// Build the evolver for `op` and `bcs`.
    ///
    /// # Errors
    /// `Error::Configuration` for a `θ` outside `[0, 1]`, and whatever the
    /// chosen scheme rejects.
    pub fn make_evolver(
        &self,
        op: Box<dyn FdmLinearOpComposite>,
        bcs: BoundaryConditionSet,
    ) -> Result<Box<dyn Evolver>> {
        ensure_config!(
            (0.0..=1.0).contains(&self.theta),
            "theta must lie in [0, 1], got {}",
            self.theta
        );
        Ok(match self.scheme_type {
            FdmSchemeType::ExplicitEuler => Box::new(MixedScheme::explicit_euler(op, bcs)?),
            FdmSchemeType::ImplicitEuler => Box::new(MixedScheme::implicit_euler(op, bcs)?),
            FdmSchemeType::CrankNicolson => Box::new(MixedScheme::new(op, bcs, self.theta)?),
            FdmSchemeType::Douglas => Box::new(DouglasScheme::new(op, bcs, self.theta)?),
        })
    }
}

impl Default for FdmSchemeDesc {
    fn default() -> Self {
        Self::douglas()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finite_differences::meshers::{Fdm1dMesher, FdmMesher};
    use crate::finite_differences::operators::{FdmSplitOp, TripleBandLinearOp};
    use std::sync::Arc;

    fn op() -> Box<dyn FdmLinearOpComposite> {
        let m = Arc::new(FdmMesher::from_1d(Fdm1dMesher::uniform(0.0, 1.0, 5).unwrap()).unwrap());
        Box::new(FdmSplitOp::new(vec![TripleBandLinearOp::second_derivative(0, m).unwrap()]).unwrap())
    }

    #[test]
    fn presets() {
        assert_eq!(FdmSchemeDesc::default(), FdmSchemeDesc::douglas());
        assert_eq!(FdmSchemeDesc::crank_nicolson().theta, 0.5);
        assert_eq!(FdmSchemeDesc::implicit_euler().with_theta(0.6).theta, 0.6);
        for desc in [
            FdmSchemeDesc::explicit_euler(),
            FdmSchemeDesc::implicit_euler(),
            FdmSchemeDesc::crank_nicolson(),
            FdmSchemeDesc::douglas(),
        ] {
            assert!(desc.make_evolver(op(), vec![]).is_ok());
        }
        assert!(FdmSchemeDesc::douglas()
            .with_theta(-0.1)
            .make_evolver(op(), vec![])
            .is_err());
    }
}
