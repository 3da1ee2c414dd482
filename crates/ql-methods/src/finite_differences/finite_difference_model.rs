//! Backward rollback and forward evolution driver
//! (translates `ql/methods/finitedifferences/finitedifferencemodel.hpp`).

use ql_core::{ensure_config, errors::Result, Size, Time};
use ql_math::{close_enough, Array};
use tracing::{debug, trace};

use super::schemes::Evolver;
use super::step_conditions::StepCondition;
use super::time_grid::TimeGrid;

/// Rolls a solution array back in time with an evolver, stopping exactly
/// on a set of times and applying a step condition after every step.
///
/// Corresponds to `QuantLib::FiniteDifferenceModel`.
#[derive(Debug)]
pub struct FiniteDifferenceModel<E: Evolver> {
    evolver: E,
    stopping_times: Vec<Time>,
}

impl<E: Evolver> FiniteDifferenceModel<E> {
    /// Model around `evolver` that must land on every `stopping_times` entry.
    pub fn new(evolver: E, mut stopping_times: Vec<Time>) -> Self {
        stopping_times.sort_by(|a, b| a.total_cmp(b));
        stopping_times.dedup_by(|a, b| close_enough(*a, *b, 100));
        Self {
            evolver,
            stopping_times,
        }
    }

    /// The evolver.
    pub fn evolver(&self) -> &E {
        &self.evolver
    }

    /// Mutable access to the evolver.
    pub fn evolver_mut(&mut self) -> &mut E {
        &mut self.evolver
    }

    /// Stopping times, sorted.
    pub fn stopping_times(&self) -> &[Time] {
        &self.stopping_times
    }

    /// Evolve `a` from time `from` back to `to < from` in about `steps`
    /// steps.
    ///
    /// The time grid contains every stopping time of the model and of
    /// `condition` inside the interval.  `condition` is applied after every
    /// step, and once at `from` before stepping if `from` is a stopping time.
    ///
    /// # Errors
    /// `Error::Configuration` if `to > from` or `steps == 0`; any error of
    /// the evolver or the condition.
    pub fn rollback(
        &mut self,
        a: &mut Array,
        from: Time,
        to: Time,
        steps: Size,
        mut condition: Option<&mut dyn StepCondition>,
    ) -> Result<()> {
        ensure_config!(from >= to, "cannot roll back from {from} to the later time {to}");
        ensure_config!(steps > 0, "rollback needs at least one step");

        let stops = self.stops(condition.as_deref());
        if let Some(c) = condition.as_deref_mut() {
            if stops.iter().any(|&s| close_enough(s, from, 100)) {
                c.apply_to(a, from)?;
            }
        }
        if close_enough(from, to, 100) {
            return Ok(());
        }

        let grid = interval_grid(&stops, to, from, steps)?;
        debug!(from, to, steps = grid.steps(), "rollback");

        for i in (0..grid.steps()).rev() {
            let (t, dt) = (grid.time(i + 1)?, grid.dt(i)?);
            trace!(t, dt, "rollback step");
            self.evolver.set_step(dt);
            self.evolver.step(a, t)?;
            if let Some(c) = condition.as_deref_mut() {
                c.apply_to(a, grid.time(i)?)?;
            }
        }
        Ok(())
    }

    /// Evolve `a` from time `from` forward to `to > from` in about `steps`
    /// steps, for operators that are the forward generator of a density.
    ///
    /// The evolver is handed the end of every step, so the operator sees a
    /// step as `[t_i, t_{i+1}]`.  Stopping times and `condition` are handled
    /// as in [`rollback`](Self::rollback).
    ///
    /// # Errors
    /// `Error::Configuration` if `to < from` or `steps == 0`; any error of
    /// the evolver or the condition.
    pub fn roll_forward(
        &mut self,
        a: &mut Array,
        from: Time,
        to: Time,
        steps: Size,
        mut condition: Option<&mut dyn StepCondition>,
    ) -> Result<()> {
        ensure_config!(to >= from, "cannot roll forward from {from} to the earlier time {to}");
        ensure_config!(steps > 0, "forward evolution needs at least one step");

        let stops = self.stops(condition.as_deref());
        if let Some(c) = condition.as_deref_mut() {
            if stops.iter().any(|&s| close_enough(s, from, 100)) {
                c.apply_to(a, from)?;
            }
        }
        if close_enough(from, to, 100) {
            return Ok(());
        }

        let grid = interval_grid(&stops, from, to, steps)?;
        debug!(from, to, steps = grid.steps(), "roll forward");

        for i in 0..grid.steps() {
            let (t, dt) = (grid.time(i + 1)?, grid.dt(i)?);
            trace!(t, dt, "forward step");
            self.evolver.set_step(dt);
            self.evolver.step(a, t)?;
            if let Some(c) = condition.as_deref_mut() {
                c.apply_to(a, t)?;
            }
        }
        Ok(())
    }

    fn stops(&self, condition: Option<&dyn StepCondition>) -> Vec<Time> {
        let mut stops = self.stopping_times.clone();
        if let Some(c) = condition {
            stops.extend(c.stopping_times());
        }
        stops
    }
}

/// Grid over `[start, end]` through every stop strictly inside it.
fn interval_grid(stops: &[Time], start: Time, end: Time, steps: Size) -> Result<TimeGrid> {
    let inside: Vec<Time> = stops
        .iter()
        .copied()
        .filter(|&s| s > start && s < end && !close_enough(s, start, 100) && !close_enough(s, end, 100))
        .collect();
    TimeGrid::with_mandatory_times(start, end, &inside, steps)
}

/// Roll `a` back from `from` to `to` in `steps` equal steps with no
/// stopping times and no step condition.
pub fn rollback<E: Evolver + ?Sized>(
    evolver: &mut E,
    a: &mut Array,
    from: Time,
    to: Time,
    steps: Size,
) -> Result<()> {
    FiniteDifferenceModel::new(evolver, Vec::new()).rollback(a, from, to, steps, None)
}

/// Evolve `a` forward from `from` to `to` in `steps` equal steps with no
/// stopping times and no step condition.
pub fn roll_forward<E: Evolver + ?Sized>(
    evolver: &mut E,
    a: &mut Array,
    from: Time,
    to: Time,
    steps: Size,
) -> Result<()> {
    FiniteDifferenceModel::new(evolver, Vec::new()).roll_forward(a, from, to, steps, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ql_core::errors::Error;

    /// Records every step and adds `dt` to each value.
    #[derive(Debug, Default)]
    struct Recorder {
        dt: Time,
        steps: Vec<(Time, Time)>,
    }

    impl Evolver for Recorder {
        fn step(&mut self, a: &mut Array, t: Time) -> Result<()> {
            self.steps.push((t, self.dt));
            for v in a.iter_mut() {
                *v += self.dt;
            }
            Ok(())
        }

        fn set_step(&mut self, dt: Time) {
            self.dt = dt;
        }
    }

    /// Records the times it was applied at.
    #[derive(Debug, Default)]
    struct Seen(Vec<Time>, Vec<Time>);

    impl StepCondition for Seen {
        fn apply_to(&mut self, _a: &mut Array, t: Time) -> Result<()> {
            self.0.push(t);
            Ok(())
        }

        fn stopping_times(&self) -> Vec<Time> {
            self.1.clone()
        }
    }

    #[test]
    fn lands_on_every_stopping_time() {
        let mut model = FiniteDifferenceModel::new(Recorder::default(), vec![0.37, 2.0]);
        let mut seen = Seen(vec![], vec![0.81, 1.0]);
        let mut a = Array::zeros(2);
        model.rollback(&mut a, 1.0, 0.0, 10, Some(&mut seen)).unwrap();

        // applied at `from` (a stopping time) and after each step
        assert_eq!(seen.0[0], 1.0);
        assert!(seen.0.contains(&0.37));
        assert!(seen.0.contains(&0.81));
        assert_eq!(*seen.0.last().unwrap(), 0.0);
        assert_eq!(seen.0.len(), model.evolver().steps.len() + 1);
        // steps run backward from `from`
        assert_eq!(model.evolver().steps[0].0, 1.0);
        // the step sizes cover the whole interval
        assert!((a[0] - 1.0).abs() < 1e-14);
    }

    #[test]
    fn plain_rollback_without_condition() {
        let mut model = FiniteDifferenceModel::new(Recorder::default(), vec![]);
        let mut a = Array::zeros(1);
        model.rollback(&mut a, 2.0, 1.0, 4, None).unwrap();
        assert_eq!(model.evolver().steps.len(), 4);
        assert_eq!(model.evolver().steps[3], (1.25, 0.25));
        model.rollback(&mut a, 1.0, 1.0, 4, None).unwrap();
        assert_eq!(model.evolver().steps.len(), 4);
    }

    #[test]
    fn free_rollback_borrows_the_evolver() {
        let mut recorder = Recorder::default();
        let mut a = Array::zeros(1);
        rollback(&mut recorder, &mut a, 1.0, 0.0, 5).unwrap();
        assert_eq!(recorder.steps.len(), 5);
        assert!((a[0] - 1.0).abs() < 1e-14);
    }

    #[test]
    fn rejects_forward_rollback() {
        let mut model = FiniteDifferenceModel::new(Recorder::default(), vec![]);
        let err = model.rollback(&mut Array::zeros(1), 0.0, 1.0, 4, None).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn forward_evolution_steps_up_to_the_end() {
        let mut model = FiniteDifferenceModel::new(Recorder::default(), vec![0.5]);
        let mut seen = Seen(vec![], vec![0.0, 0.3]);
        let mut a = Array::zeros(1);
        model.roll_forward(&mut a, 0.0, 1.0, 4, Some(&mut seen)).unwrap();

        let steps = &model.evolver().steps;
        assert!(steps.windows(2).all(|w| w[0].0 < w[1].0));
        assert!((steps[0].0 - steps[0].1).abs() < 1e-14);
        assert!((steps.last().unwrap().0 - 1.0).abs() < 1e-14);
        assert!(steps.iter().any(|s| (s.0 - 0.3).abs() < 1e-14));
        assert!(steps.iter().any(|s| (s.0 - 0.5).abs() < 1e-14));
        // applied at `from` and after each step, at the step's end
        assert_eq!(seen.0[0], 0.0);
        assert_eq!(seen.0.len(), steps.len() + 1);
        assert!((a[0] - 1.0).abs() < 1e-14);

        let err = model.roll_forward(&mut a, 1.0, 0.0, 4, None).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn free_roll_forward_borrows_the_evolver() {
        let mut recorder = Recorder::default();
        let mut a = Array::zeros(1);
        roll_forward(&mut recorder, &mut a, 1.0, 3.0, 4).unwrap();
        assert_eq!(recorder.steps, vec![(1.5, 0.5), (2.0, 0.5), (2.5, 0.5), (3.0, 0.5)]);
    }
}
