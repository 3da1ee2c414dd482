//! Conditions applied to the solution between time steps
//! (translates `ql/methods/finitedifferences/stepconditions/`).

use std::fmt;

use ql_core::{errors::Result, Time};
use ql_math::Array;

mod fdm_american_step_condition;
mod fdm_bermudan_step_condition;
mod fdm_dividend_handler;
mod fdm_snapshot_condition;
mod fdm_step_condition_composite;

pub use fdm_american_step_condition::FdmAmericanStepCondition;
pub use fdm_bermudan_step_condition::FdmBermudanStepCondition;
pub use fdm_dividend_handler::FdmDividendHandler;
pub use fdm_snapshot_condition::FdmSnapshotCondition;
pub use fdm_step_condition_composite::FdmStepConditionComposite;

/// A condition applied to the solution array after a backward step lands
/// on time `t`.
///
/// Corresponds to `QuantLib::StepCondition<Array>`.
pub trait StepCondition: fmt::Debug + Send {
    /// Modify `a` in place for time `t`.
    fn apply_to(&mut self, a: &mut Array, t: Time) -> Result<()>;

    /// Times the time grid must hit exactly for this condition.
    fn stopping_times(&self) -> Vec<Time> {
        Vec::new()
    }

    /// Time of the snapshot this condition takes, if it takes one.
    fn snapshot_time(&self) -> Option<Time> {
        None
    }

    /// Values captured by a snapshot condition.
    fn snapshot_values(&self) -> Option<&Array> {
        None
    }
}
