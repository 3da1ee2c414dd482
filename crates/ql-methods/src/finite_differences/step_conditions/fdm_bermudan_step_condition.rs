use std::sync::Arc;

use ql_core::{errors::Result, Time};
use ql_math::{close_enough, Array};

use super::fdm_american_step_condition::clamp;
use super::StepCondition;
use crate::finite_differences::utilities::FdmInnerValueCalculator;

/// Early exercise on a discrete set of times.
///
/// Corresponds to `QuantLib::FdmBermudanStepCondition`.
#[derive(Debug, Clone)]
pub struct FdmBermudanStepCondition {
    exercise_times: Vec<Time>,
    calculator: Arc<dyn FdmInnerValueCalculator>,
}

impl FdmBermudanStepCondition {
    /// Clamp against `calculator` whenever a step lands on one of
    /// `exercise_times`.
    pub fn new(mut exercise_times: Vec<Time>, calculator: Arc<dyn FdmInnerValueCalculator>) -> Self {
        exercise_times.sort_by(|a, b| a.total_cmp(b));
        exercise_times.dedup();
        Self {
            exercise_times,
            calculator,
        }
    }

    /// The exercise times.
    pub fn exercise_times(&self) -> &[Time] {
        &self.exercise_times
    }
}

impl StepCondition for FdmBermudanStepCondition {
    fn apply_to(&mut self, a: &mut Array, t: Time) -> Result<()> {
        if self.exercise_times.iter().any(|&e| close_enough(e, t, 100)) {
            clamp(self.calculator.as_ref(), a, t)?;
        }
        Ok(())
    }

    fn stopping_times(&self) -> Vec<Time> {
        self.exercise_times.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finite_differences::meshers::{Fdm1dMesher, FdmMesher};
    use crate::finite_differences::utilities::FdmStateInnerValue;
    use ql_instruments::{OptionType, PlainVanillaPayoff};

    #[test]
    fn exercises_only_on_listed_times() {
        let m = Arc::new(FdmMesher::from_1d(Fdm1dMesher::uniform(0.0, 2.0, 3).unwrap()).unwrap());
        let payoff = Arc::new(PlainVanillaPayoff::new(OptionType::Call, 0.5));
        let calc = Arc::new(FdmStateInnerValue::new(payoff, m, 0).unwrap());
        let mut cond = FdmBermudanStepCondition::new(vec![0.5, 0.25, 0.5], calc);
        assert_eq!(cond.stopping_times(), vec![0.25, 0.5]);

        let mut a = Array::zeros(3);
        cond.apply_to(&mut a, 0.3).unwrap();
        assert_eq!(a, Array::zeros(3));
        cond.apply_to(&mut a, 0.5).unwrap();
        assert_eq!(a.to_vec(), vec![0.0, 0.5, 1.5]);
    }
}
