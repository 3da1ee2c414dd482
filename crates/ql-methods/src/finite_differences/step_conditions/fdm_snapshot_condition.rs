use ql_core::{errors::Result, Time};
use ql_math::{close_enough, Array};

use super::StepCondition;

/// Records a copy of the solution when a step lands on a given time.
///
/// The first matching call captures the values; later matches are ignored
/// until [`reset`](Self::reset).
///
/// Corresponds to `QuantLib::FdmSnapshotCondition`.
#[derive(Debug, Clone, PartialEq)]
pub struct FdmSnapshotCondition {
    t: Time,
    values: Option<Array>,
}

impl FdmSnapshotCondition {
    /// Snapshot at time `t`.
    pub fn new(t: Time) -> Self {
        Self { t, values: None }
    }

    /// Time of the snapshot.
    pub fn time(&self) -> Time {
        self.t
    }

    /// Captured values, once the snapshot time was reached.
    pub fn values(&self) -> Option<&Array> {
        self.values.as_ref()
    }

    /// Forget the captured values.
    pub fn reset(&mut self) {
        self.values = None;
    }
}

impl StepCondition for FdmSnapshotCondition {
    fn apply_to(&mut self, a: &mut Array, t: Time) -> Result<()> {
        if self.values.is_none() && close_enough(t, self.t, 100) {
            self.values = Some(a.clone());
        }
        Ok(())
    }

    fn stopping_times(&self) -> Vec<Time> {
        vec![self.t]
    }

    fn snapshot_time(&self) -> Option<Time> {
        Some(self.t)
    }

    fn snapshot_values(&self) -> Option<&Array> {
        self.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_once_until_reset() {
        let mut snap = FdmSnapshotCondition::new(0.25);
        let mut a = Array::from_element(3, 1.0);
        snap.apply_to(&mut a, 0.5).unwrap();
        assert!(snap.values().is_none());
        snap.apply_to(&mut a, 0.25).unwrap();
        let mut b = Array::from_element(3, 2.0);
        snap.apply_to(&mut b, 0.25).unwrap();
        assert_eq!(snap.values(), Some(&Array::from_element(3, 1.0)));
        // the solution itself is untouched
        assert_eq!(b, Array::from_element(3, 2.0));
        snap.reset();
        assert!(snap.snapshot_values().is_none());
        assert_eq!(snap.stopping_times(), vec![0.25]);
    }
}
