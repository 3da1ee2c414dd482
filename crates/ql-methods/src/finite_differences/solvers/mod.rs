//! Backward solvers: rollback with damping, 1D solver with interpolated
//! greeks and the Black-Scholes vanilla solver.

mod fdm_1dim_solver;
mod fdm_backward_solver;
mod fdm_black_scholes_solver;
mod fdm_solver_desc;

pub use fdm_1dim_solver::{value_at_center, Fdm1DimSolver};
pub use fdm_backward_solver::FdmBackwardSolver;
pub use fdm_black_scholes_solver::{FdmBlackScholesSolver, FdmBlackScholesSolverDesc, FdmResults};
pub use fdm_solver_desc::FdmSolverDesc;
