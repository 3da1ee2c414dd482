use std::sync::Arc;

use ql_core::{ensure_config, errors::Result, Time};
use ql_math::Array;

use super::StepCondition;
use crate::finite_differences::utilities::FdmInnerValueCalculator;

/// Early exercise at every step: `a[i] = max(a[i], inner_value(i, t))`.
///
/// Corresponds to `QuantLib::FdmAmericanStepCondition`.
#[derive(Debug, Clone)]
pub struct FdmAmericanStepCondition {
    calculator: Arc<dyn FdmInnerValueCalculator>,
}

impl FdmAmericanStepCondition {
    /// Clamp against the values of `calculator`.
    pub fn new(calculator: Arc<dyn FdmInnerValueCalculator>) -> Self {
        Self { calculator }
    }
}

impl StepCondition for FdmAmericanStepCondition {
    fn apply_to(&mut self, a: &mut Array, t: Time) -> Result<()> {
        clamp(self.calculator.as_ref(), a, t)
    }
}

pub(super) fn clamp(calculator: &dyn FdmInnerValueCalculator, a: &mut Array, t: Time) -> Result<()> {
    let n = calculator.mesher().size();
    ensure_config!(
        a.size() == n,
        "array of size {} does not match a mesh of size {n}",
        a.size()
    );
    for i in 0..n {
        let exercise = calculator.inner_value(i, t)?;
        if exercise > a[i] {
            a[i] = exercise;
        }
    }
    Ok(())
}
