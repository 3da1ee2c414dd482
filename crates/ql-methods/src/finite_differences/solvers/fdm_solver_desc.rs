use std::sync::Arc;

use ql_core::{Size, Time};

use crate::finite_differences::boundary_conditions::BoundaryConditionSet;
use crate::finite_differences::meshers::FdmMesher;
use crate::finite_differences::step_conditions::FdmStepConditionComposite;
use crate::finite_differences::utilities::FdmInnerValueCalculator;

/// Everything a backward solver needs besides the operator and the scheme.
///
/// Corresponds to `QuantLib::FdmSolverDesc`.
#[derive(Debug)]
pub struct FdmSolverDesc {
    /// The spatial grid.
    pub mesher: Arc<FdmMesher>,
    /// Boundary conditions.
    pub bcs: BoundaryConditionSet,
    /// Step conditions.
    pub condition: FdmStepConditionComposite,
    /// Terminal payoff on the grid.
    pub calculator: Arc<dyn FdmInnerValueCalculator>,
    /// Time to maturity.
    pub maturity: Time,
    /// Number of time steps of the main scheme.
    pub time_steps: Size,
    /// Number of implicit Euler steps run first to smooth the payoff.
    pub damping_steps: Size,
}
