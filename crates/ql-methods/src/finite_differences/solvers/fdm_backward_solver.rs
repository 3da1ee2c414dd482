//! Backward solver with optional damping steps
//! (translates `ql/methods/finitedifferences/solvers/fdmbackwardsolver.hpp`).
//!
//! With `n` scheme steps and `m` damping steps over `[to, from]` the first
//! `m / (n + m)` of the interval is covered by implicit Euler, which smooths
//! the kinks of the payoff before the main scheme takes over:
//!
//! ```text
//! damping_to = from − (from − to)·m / (n + m)
//! ```

use ql_core::{errors::Result, Size, Time};
use ql_math::Array;
use tracing::{debug, warn};

use crate::finite_differences::boundary_conditions::BoundaryConditionSet;
use crate::finite_differences::finite_difference_model::FiniteDifferenceModel;
use crate::finite_differences::operators::FdmLinearOpComposite;
use crate::finite_differences::schemes::{FdmSchemeDesc, FdmSchemeType, MixedScheme};
use crate::finite_differences::step_conditions::FdmStepConditionComposite;

/// Rolls a terminal condition back with the configured scheme.
///
/// Corresponds to `QuantLib::FdmBackwardSolver`.
#[derive(Debug)]
pub struct FdmBackwardSolver {
    op: Box<dyn FdmLinearOpComposite>,
    bcs: BoundaryConditionSet,
    condition: FdmStepConditionComposite,
    scheme: FdmSchemeDesc,
}

impl FdmBackwardSolver {
    /// Solver for `op` with boundary and step conditions.
    pub fn new(
        op: Box<dyn FdmLinearOpComposite>,
        bcs: BoundaryConditionSet,
        condition: FdmStepConditionComposite,
        scheme: FdmSchemeDesc,
    ) -> Self {
        Self {
            op,
            bcs,
            condition,
            scheme,
        }
    }

    /// The step conditions, including anything they captured.
    pub fn condition(&self) -> &FdmStepConditionComposite {
        &self.condition
    }

    /// Evolve `a` from `from` back to `to`.
    pub fn rollback(&mut self, a: &mut Array, from: Time, to: Time, steps: Size, damping_steps: Size) -> Result<()> {
        let stops = self.condition.stopping_times().to_vec();
        let mut main_from = from;
        let mut main_steps = steps;

        if damping_steps > 0 {
            if self.scheme.scheme_type == FdmSchemeType::ImplicitEuler {
                warn!(damping_steps, "damping with an implicit Euler scheme; folding into the main steps");
                main_steps += damping_steps;
            } else {
                let damping_to = from - (from - to) * damping_steps as Time / (steps + damping_steps) as Time;
                debug!(from, damping_to, damping_steps, "damping");
                let evolver = MixedScheme::implicit_euler(self.op.clone_box(), self.bcs.clone())?;
                FiniteDifferenceModel::new(evolver, stops.clone()).rollback(
                    a,
                    from,
                    damping_to,
                    damping_steps,
                    Some(&mut self.condition),
                )?;
                main_from = damping_to;
            }
        }

        let evolver = self.scheme.make_evolver(self.op.clone_box(), self.bcs.clone())?;
        FiniteDifferenceModel::new(evolver, stops).rollback(a, main_from, to, main_steps, Some(&mut self.condition))
    }
}
