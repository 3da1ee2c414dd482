//! Finite-difference framework for parabolic pricing equations
//! (translates `ql/methods/finitedifferences/`).
//!
//! A problem is set up bottom-up:
//!
//! * [`meshers`] lay out the grid, one [`Fdm1dMesher`] per direction;
//! * [`operators`] discretise the spatial operator `L` as sums of
//!   [`TripleBandLinearOp`]s;
//! * [`boundary_conditions`] patch the operator rows at the grid edges;
//! * [`step_conditions`] modify the solution between steps (early
//!   exercise, dividends, snapshots);
//! * [`schemes`] step `∂V/∂t + L·V = 0` backward in time, driven by a
//!   [`FiniteDifferenceModel`] on a [`TimeGrid`]; the same schemes evolve
//!   a density `∂p/∂t = L·p` forward under a forward operator such as
//!   [`FdmSquareRootFwdOp`];
//! * [`solvers`] tie everything together and read off values and greeks.

/// Boundary conditions.
pub mod boundary_conditions;

/// Backward rollback and forward evolution over a time grid.
pub mod finite_difference_model;

/// Spatial grids.
pub mod meshers;

/// Linear operators on the grid.
pub mod operators;

/// Time-stepping schemes.
pub mod schemes;

/// Solvers and their result accessors.
pub mod solvers;

/// Conditions applied between time steps.
pub mod step_conditions;

/// Time discretisation.
pub mod time_grid;

/// Payoff evaluation on the grid.
pub mod utilities;

pub use boundary_conditions::{BoundaryCondition, BoundaryConditionSet, BoundaryConditionType, BoundarySide};
pub use finite_difference_model::{roll_forward, rollback, FiniteDifferenceModel};
pub use meshers::{Fdm1dMesher, FdmBlackScholesMesher, FdmMesher};
pub use operators::{
    add_operators, Discounting, FdmBlackScholesOp, FdmLinearOpComposite, FdmLinearOpIterator, FdmLinearOpLayout,
    FdmProcessOp, FdmSplitOp, FdmSquareRootFwdOp, SquareRootTransform, TripleBandLinearOp,
};
pub use schemes::{DouglasScheme, Evolver, FdmSchemeDesc, FdmSchemeType, MixedScheme};
pub use solvers::{
    value_at_center, Fdm1DimSolver, FdmBackwardSolver, FdmBlackScholesSolver, FdmBlackScholesSolverDesc,
    FdmResults, FdmSolverDesc,
};
pub use step_conditions::{
    FdmAmericanStepCondition, FdmBermudanStepCondition, FdmDividendHandler, FdmSnapshotCondition,
    FdmStepConditionComposite, StepCondition,
};
pub use time_grid::TimeGrid;
pub use utilities::{FdmInnerValueCalculator, FdmLogInnerValue, FdmStateInnerValue};
