//! Time discretisation of a rollback (translates `ql/timegrid.hpp`).

use ql_core::{
    ensure_config,
    errors::{Error, Result},
    Size, Time,
};
use ql_math::close_enough;

/// Strictly increasing set of times from `start` to `end` that contains
/// every mandatory time exactly.
///
/// Each segment between consecutive mandatory times is cut into
/// `max(round(len / dt_max), 1)` equal steps, where `dt_max` is the step
/// size of a plain grid with the requested number of steps.
///
/// Corresponds to `QuantLib::TimeGrid`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeGrid {
    times: Vec<Time>,
    dts: Vec<Time>,
}

impl TimeGrid {
    /// `steps` equal steps over `[0, end]`.
    pub fn new(end: Time, steps: Size) -> Result<Self> {
        Self::with_mandatory_times(0.0, end, &[], steps)
    }

    /// Grid over `[start, end]` hitting every mandatory time.
    ///
    /// # Errors
    /// `Error::Configuration` for an empty interval, zero steps or a
    /// mandatory time outside `[start, end]`.
    pub fn with_mandatory_times(start: Time, end: Time, mandatory: &[Time], steps: Size) -> Result<Self> {
        ensure_config!(
            start.is_finite() && end.is_finite() && start < end,
            "time grid needs start < end, got [{start}, {end}]"
        );
        ensure_config!(steps > 0, "time grid needs at least one step");
        for &t in mandatory {
            ensure_config!(
                t.is_finite()
                    && (t >= start || close_enough(t, start, 100))
                    && (t <= end || close_enough(t, end, 100)),
                "mandatory time {t} lies outside [{start}, {end}]"
            );
        }

        let mut points: Vec<Time> = mandatory.to_vec();
        points.push(end);
        points.sort_by(|a, b| a.total_cmp(b));
        points.dedup_by(|a, b| close_enough(*a, *b, 100));
        points.retain(|&t| !close_enough(t, start, 100) && t > start);
        if let Some(last) = points.last_mut() {
            *last = end;
        }

        let dt_max = (end - start) / steps as Time;
        let mut times = vec![start];
        let mut begin = start;
        for &stop in &points {
            let n = (((stop - begin) / dt_max).round() as Size).max(1);
            let dt = (stop - begin) / n as Time;
            times.extend((1..n).map(|k| begin + k as Time * dt));
            times.push(stop);
            begin = stop;
        }
        let dts = times.windows(2).map(|w| w[1] - w[0]).collect();
        Ok(Self { times, dts })
    }

    /// Number of time points.
    pub fn size(&self) -> Size {
        self.times.len()
    }

    /// Number of steps, one less than the number of points.
    pub fn steps(&self) -> Size {
        self.dts.len()
    }

    /// Time point `i`.
    pub fn time(&self, i: Size) -> Result<Time> {
        self.times.get(i).copied().ok_or(Error::IndexOutOfRange {
            index: i,
            size: self.size(),
        })
    }

    /// Length of step `i`, from point `i` to point `i + 1`.
    pub fn dt(&self, i: Size) -> Result<Time> {
        self.dts.get(i).copied().ok_or(Error::IndexOutOfRange {
            index: i,
            size: self.steps(),
        })
    }

    /// All time points.
    pub fn times(&self) -> &[Time] {
        &self.times
    }

    /// Index of the grid point matching `t`.
    ///
    /// # Errors
    /// `Error::Range` if `t` is not a grid point.
    pub fn index_of(&self, t: Time) -> Result<Size> {
        self.times
            .iter()
            .position(|&s| close_enough(s, t, 100))
            .ok_or_else(|| Error::Range(format!("time {t} is not on the grid")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn plain_grid() {
        let grid = TimeGrid::new(1.0, 4).unwrap();
        assert_eq!(grid.times(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(grid.steps(), 4);
        assert_eq!(grid.dt(3).unwrap(), 0.25);
        assert!(grid.dt(4).is_err());
    }

    #[test]
    fn mandatory_times_are_hit_exactly() {
        let grid = TimeGrid::with_mandatory_times(0.0, 1.0, &[0.3, 0.3 + 1e-17, 0.61], 10).unwrap();
        assert_eq!(grid.time(grid.index_of(0.3).unwrap()).unwrap(), 0.3);
        assert_eq!(grid.time(grid.index_of(0.61).unwrap()).unwrap(), 0.61);
        assert_eq!(grid.times()[grid.size() - 1], 1.0);
        // [0, 0.3] gets 3 steps, [0.3, 0.61] 3 and [0.61, 1] 4
        assert_eq!(grid.steps(), 10);
        for w in grid.times().windows(2) {
            assert!(w[1] > w[0]);
        }
        assert_abs_diff_eq!(grid.dt(0).unwrap(), 0.1, epsilon = 1e-15);
    }

    #[test]
    fn tiny_segments_get_one_step() {
        let grid = TimeGrid::with_mandatory_times(0.0, 1.0, &[0.001], 4).unwrap();
        assert_eq!(grid.times()[1], 0.001);
        assert_eq!(grid.steps(), 5);
    }

    #[test]
    fn start_and_end_as_mandatory_times() {
        let grid = TimeGrid::with_mandatory_times(0.5, 1.5, &[0.5, 1.5], 2).unwrap();
        assert_eq!(grid.times(), &[0.5, 1.0, 1.5]);
    }

    #[test]
    fn rejects_bad_grids() {
        assert!(TimeGrid::new(0.0, 10).unwrap_err().is_configuration());
        assert!(TimeGrid::new(1.0, 0).is_err());
        assert!(TimeGrid::with_mandatory_times(0.0, 1.0, &[1.5], 10)
            .unwrap_err()
            .is_configuration());
        assert!(TimeGrid::new(1.0, 2).unwrap().index_of(0.3).is_err());
    }
}
