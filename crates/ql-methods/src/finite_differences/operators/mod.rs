//! Spatial operators on a mesh.

mod fdm_black_scholes_op;
mod fdm_linear_op_composite;
mod fdm_linear_op_layout;
mod fdm_process_op;
mod fdm_split_op;
mod fdm_square_root_fwd_op;
mod first_derivative_op;
mod second_derivative_op;
mod triple_band_linear_op;

pub use fdm_black_scholes_op::FdmBlackScholesOp;
pub use fdm_linear_op_composite::FdmLinearOpComposite;
pub use fdm_linear_op_layout::{FdmLinearOpIterator, FdmLinearOpLayout};
pub use fdm_process_op::{Discounting, FdmProcessOp};
pub use fdm_split_op::FdmSplitOp;
pub use fdm_square_root_fwd_op::{FdmSquareRootFwdOp, SquareRootTransform};
pub use triple_band_linear_op::{add_operators, TripleBandLinearOp};
