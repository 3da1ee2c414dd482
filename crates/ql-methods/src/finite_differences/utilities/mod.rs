//! Helpers shared by the conditions and solvers.

mod inner_value_calculator;

pub use inner_value_calculator::{FdmInnerValueCalculator, FdmLogInnerValue, FdmStateInnerValue};
