//! Option exercise rights.
//!
//! Translates `ql/exercise.hpp`, with exercise dates already converted to
//! year fractions from the valuation date.

use ql_core::{ensure, errors::Result, Time};

/// Type of exercise right.
///
/// Corresponds to `QuantLib::Exercise::Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExerciseType {
    /// Only at expiry.
    European,
    /// At any time up to expiry.
    American,
    /// On a discrete set of times.
    Bermudan,
}

/// Exercise specification for an option.
///
/// Corresponds to `QuantLib::Exercise` and its subclasses.
#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    exercise_type: ExerciseType,
    times: Vec<Time>,
}

impl Exercise {
    /// European exercise at `expiry`.
    pub fn european(expiry: Time) -> Result<Self> {
        Self::build(ExerciseType::European, vec![expiry])
    }

    /// American exercise at any time in `[0, expiry]`.
    pub fn american(expiry: Time) -> Result<Self> {
        Self::build(ExerciseType::American, vec![expiry])
    }

    /// Bermudan exercise at the given times (sorted and de-duplicated).
    pub fn bermudan(mut times: Vec<Time>) -> Result<Self> {
        ensure!(!times.is_empty(), "bermudan exercise needs at least one time");
        ensure!(
            times.iter().all(|t| t.is_finite()),
            "exercise times must be finite"
        );
        times.sort_by(|a, b| a.total_cmp(b));
        times.dedup();
        Self::build(ExerciseType::Bermudan, times)
    }

    fn build(exercise_type: ExerciseType, times: Vec<Time>) -> Result<Self> {
        ensure!(
            times.iter().all(|&t| t >= 0.0 && t.is_finite()),
            "exercise times must be non-negative, got {times:?}"
        );
        Ok(Self {
            exercise_type,
            times,
        })
    }

    /// The type of exercise.
    pub fn exercise_type(&self) -> ExerciseType {
        self.exercise_type
    }

    /// The exercise times.  For European and American exercise this is the
    /// single expiry.
    pub fn times(&self) -> &[Time] {
        &self.times
    }

    /// The last possible exercise time.
    pub fn last_time(&self) -> Time {
        self.times[self.times.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bermudan_times_are_sorted() {
        let ex = Exercise::bermudan(vec![1.0, 0.25, 0.5, 0.25]).unwrap();
        assert_eq!(ex.times(), &[0.25, 0.5, 1.0]);
        assert_eq!(ex.last_time(), 1.0);
        assert_eq!(ex.exercise_type(), ExerciseType::Bermudan);
    }

    #[test]
    fn invalid_times_are_rejected() {
        assert!(Exercise::european(-1.0).is_err());
        assert!(Exercise::bermudan(vec![]).is_err());
        assert!(Exercise::american(Time::NAN).is_err());
        assert_eq!(Exercise::american(2.0).unwrap().last_time(), 2.0);
    }
}
