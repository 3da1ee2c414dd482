//! Ordered list of step conditions
//! (translates `ql/methods/finitedifferences/stepconditions/fdmstepconditioncomposite.hpp`).

use std::sync::Arc;

use ql_core::{errors::Result, Real, Size, Time};
use ql_instruments::{Exercise, ExerciseType};
use ql_math::{close_enough, Array};

use super::{FdmAmericanStepCondition, FdmBermudanStepCondition, FdmDividendHandler, StepCondition};
use crate::finite_differences::meshers::FdmMesher;
use crate::finite_differences::utilities::FdmInnerValueCalculator;

/// Step conditions applied in insertion order, together with the union of
/// their stopping times.
///
/// Corresponds to `QuantLib::FdmStepConditionComposite`.
#[derive(Debug, Default)]
pub struct FdmStepConditionComposite {
    conditions: Vec<Box<dyn StepCondition>>,
    stopping_times: Vec<Time>,
}

impl FdmStepConditionComposite {
    /// An empty composite.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a condition; it runs after every condition added before it.
    pub fn push(&mut self, condition: Box<dyn StepCondition>) {
        self.stopping_times.extend(condition.stopping_times());
        self.stopping_times.sort_by(|a, b| a.total_cmp(b));
        self.stopping_times.dedup_by(|a, b| close_enough(*a, *b, 100));
        self.conditions.push(condition);
    }

    /// Builder form of [`push`](Self::push).
    pub fn with(mut self, condition: impl StepCondition + 'static) -> Self {
        self.push(Box::new(condition));
        self
    }

    /// Sorted union of the stopping times of all conditions.
    pub fn stopping_times(&self) -> &[Time] {
        &self.stopping_times
    }

    /// Number of conditions.
    pub fn len(&self) -> Size {
        self.conditions.len()
    }

    /// `true` if there are no conditions.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Values captured by the first snapshot condition taken at `t`.
    pub fn snapshot_at(&self, t: Time) -> Option<&Array> {
        self.conditions
            .iter()
            .find(|c| c.snapshot_time().is_some_and(|s| close_enough(s, t, 100)))
            .and_then(|c| c.snapshot_values())
    }

    /// Conditions of `first` followed by those of `second`.
    pub fn join(first: Self, second: Self) -> Self {
        let mut out = first;
        for c in second.conditions {
            out.push(c);
        }
        out
    }

    /// The usual conditions of a vanilla option: discrete dividends first,
    /// then American or Bermudan exercise.
    pub fn vanilla_composite(
        dividends: Vec<(Time, Real)>,
        exercise: &Exercise,
        mesher: Arc<FdmMesher>,
        calculator: Arc<dyn FdmInnerValueCalculator>,
        direction: Size,
    ) -> Result<Self> {
        let mut composite = Self::new();
        if !dividends.is_empty() {
            composite.push(Box::new(FdmDividendHandler::new(dividends, mesher, direction)?));
        }
        match exercise.exercise_type() {
            ExerciseType::European => {}
            ExerciseType::American => {
                composite.push(Box::new(FdmAmericanStepCondition::new(calculator)));
            }
            ExerciseType::Bermudan => {
                composite.push(Box::new(FdmBermudanStepCondition::new(
                    exercise.times().to_vec(),
                    calculator,
                )));
            }
        }
        Ok(composite)
    }
}

impl StepCondition for FdmStepConditionComposite {
    fn apply_to(&mut self, a: &mut Array, t: Time) -> Result<()> {
        for c in &mut self.conditions {
            c.apply_to(a, t)?;
        }
        Ok(())
    }

    fn stopping_times(&self) -> Vec<Time> {
        self.stopping_times.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finite_differences::meshers::Fdm1dMesher;
    use crate::finite_differences::step_conditions::FdmSnapshotCondition;
    use crate::finite_differences::utilities::FdmLogInnerValue;
    use ql_instruments::{OptionType, PlainVanillaPayoff};

    /// Adds a constant; lets the tests observe the order of application.
    #[derive(Debug)]
    struct Shift(Real, Vec<Time>);

    impl StepCondition for Shift {
        fn apply_to(&mut self, a: &mut Array, _t: Time) -> Result<()> {
            for v in a.iter_mut() {
                *v = *v * 2.0 + self.0;
            }
            Ok(())
        }

        fn stopping_times(&self) -> Vec<Time> {
            self.1.clone()
        }
    }

    #[test]
    fn applies_in_insertion_order() {
        let mut composite = FdmStepConditionComposite::new()
            .with(Shift(1.0, vec![0.5, 0.25]))
            .with(Shift(3.0, vec![0.25, 0.75]));
        assert_eq!(composite.stopping_times(), &[0.25, 0.5, 0.75]);
        let mut a = Array::from_element(1, 0.0);
        composite.apply_to(&mut a, 0.1).unwrap();
        // (0·2 + 1)·2 + 3
        assert_eq!(a[0], 5.0);
    }

    #[test]
    fn join_keeps_both_orders() {
        let first = FdmStepConditionComposite::new().with(Shift(1.0, vec![]));
        let second = FdmStepConditionComposite::new()
            .with(FdmSnapshotCondition::new(0.5))
            .with(Shift(0.0, vec![1.0]));
        let mut joined = FdmStepConditionComposite::join(first, second);
        assert_eq!(joined.len(), 3);
        assert_eq!(joined.stopping_times(), &[0.5, 1.0]);
        let mut a = Array::from_element(2, 1.0);
        joined.apply_to(&mut a, 0.5).unwrap();
        assert_eq!(joined.snapshot_at(0.5), Some(&Array::from_element(2, 3.0)));
        assert_eq!(a[0], 6.0);
        assert!(joined.snapshot_at(0.25).is_none());
    }

    #[test]
    fn vanilla_composite_by_exercise_type() {
        let m = Fdm1dMesher::uniform(4.0, 5.0, 11).unwrap();
        let mesher = Arc::new(FdmMesher::from_1d(m).unwrap());
        let payoff = Arc::new(PlainVanillaPayoff::new(OptionType::Put, 100.0));
        let calc: Arc<dyn FdmInnerValueCalculator> =
            Arc::new(FdmLogInnerValue::new(payoff, mesher.clone(), 0).unwrap());

        let european = Exercise::european(1.0).unwrap();
        let c = FdmStepConditionComposite::vanilla_composite(vec![], &european, mesher.clone(), calc.clone(), 0)
            .unwrap();
        assert!(c.is_empty());

        let bermudan = Exercise::bermudan(vec![0.5, 1.0]).unwrap();
        let c = FdmStepConditionComposite::vanilla_composite(
            vec![(0.3, 1.0)],
            &bermudan,
            mesher.clone(),
            calc.clone(),
            0,
        )
        .unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c.stopping_times(), &[0.3, 0.5, 1.0]);

        let american = Exercise::american(1.0).unwrap();
        let mut c = FdmStepConditionComposite::vanilla_composite(vec![], &american, mesher, calc, 0).unwrap();
        let mut a = Array::zeros(11);
        c.apply_to(&mut a, 0.7).unwrap();
        assert!((a[0] - (100.0 - 4.0_f64.exp())).abs() < 1e-12);
    }
}
