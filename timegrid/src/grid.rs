use crate::Error;
use num_traits::Float;

fn from_usize<A: Float>(n: usize) -> Result<A, Error> {
    <A as num_traits::NumCast>::from(n).ok_or(Error::FloatConversion)
}

/// ordered sequence of time instants
///
/// Adjacent instants are non-decreasing, equal instants are allowed and
/// describe a zero-length interval, e.g. a stage boundary.
///
/// `add_time`, `insert_time` and `merge` keep that order.
/// `set_time` writes the raw slot and leaves the global order to the caller,
/// `is_valid_time_order` can be used to verify it after bulk edits.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<A = f64> {
    times: Vec<A>,
}

impl<A: Float> Default for Grid<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Float> Grid<A> {
    /// grid without any points
    pub fn new() -> Self {
        Self { times: Vec::new() }
    }

    /// grid with `count` points, all at time zero
    pub fn with_count(count: usize) -> Self {
        Self {
            times: vec![A::zero(); count],
        }
    }

    /// `num_points` equally spaced instants, including both `start` and `end`
    pub fn equidistant(start: A, end: A, num_points: usize) -> Result<Self, Error> {
        if !start.is_finite() || !end.is_finite() {
            return Err(Error::InvalidArgument("grid bounds must be finite"));
        }
        if end < start {
            return Err(Error::InvalidArgument("grid end is before its start"));
        }

        match num_points {
            0 => Err(Error::InvalidArgument("a grid needs at least one point")),
            1 if start != end => Err(Error::InvalidArgument(
                "a single point grid needs start == end",
            )),
            1 => Ok(Self { times: vec![start] }),
            _ => {
                let last = num_points - 1;
                let step = (end - start) / from_usize::<A>(last)?;

                let mut times = Vec::with_capacity(num_points);
                for i in 0..last {
                    times.push(start + step * from_usize::<A>(i)?);
                }
                // no rounding drift on the final point
                times.push(end);

                Ok(Self { times })
            }
        }
    }

    /// takes over a list of instants which must already be non-decreasing
    pub fn from_times(times: Vec<A>) -> Result<Self, Error> {
        let grid = Self { times };
        if !grid.is_valid_time_order() {
            return Err(Error::InvalidArgument("grid times are not in order"));
        }
        Ok(grid)
    }

    /// takes over a list of instants as-is
    pub(crate) fn from_times_unchecked(times: Vec<A>) -> Self {
        Self { times }
    }

    pub fn num_points(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// number of intervals between adjacent points
    pub fn num_intervals(&self) -> usize {
        self.times.len().saturating_sub(1)
    }

    pub fn times(&self) -> &[A] {
        &self.times
    }

    pub(crate) fn check_index(&self, index: usize) -> Result<(), Error> {
        if index >= self.times.len() {
            return Err(Error::OutOfRange {
                index,
                len: self.times.len(),
            });
        }
        Ok(())
    }

    pub fn time(&self, index: usize) -> Result<A, Error> {
        self.check_index(index)?;
        Ok(self.times[index])
    }

    /// overwrites a single instant without restoring the order
    pub fn set_time(&mut self, index: usize, value: A) -> Result<(), Error> {
        self.check_index(index)?;
        self.times[index] = value;
        Ok(())
    }

    /// appends a new last instant
    ///
    /// Fails if `value` lies before the current last instant.
    pub fn add_time(&mut self, value: A) -> Result<(), Error> {
        self.check_next_time(value)?;
        self.times.push(value);
        Ok(())
    }

    pub(crate) fn check_next_time(&self, value: A) -> Result<(), Error> {
        if value.is_nan() {
            return Err(Error::InvalidArgument("time is NaN"));
        }
        if let Some(&last) = self.times.last() {
            if value < last {
                return Err(Error::InvalidArgument(
                    "time is before the last grid point",
                ));
            }
        }
        Ok(())
    }

    /// inserts an instant at its ordered position and returns that index
    ///
    /// An instant equal to existing ones lands after them.
    pub fn insert_time(&mut self, value: A) -> Result<usize, Error> {
        if value.is_nan() {
            return Err(Error::InvalidArgument("time is NaN"));
        }

        let index = self.times.partition_point(|t| *t <= value);
        self.times.insert(index, value);
        Ok(index)
    }

    /// appends instants without checking the order across the join
    pub(crate) fn extend_unchecked(&mut self, times: &[A]) {
        self.times.extend_from_slice(times);
    }

    pub fn first_time(&self) -> Result<A, Error> {
        self.times.first().copied().ok_or(Error::EmptyGrid)
    }

    pub fn last_time(&self) -> Result<A, Error> {
        self.times.last().copied().ok_or(Error::EmptyGrid)
    }

    /// last instant minus first instant
    pub fn interval_length(&self) -> Result<A, Error> {
        Ok(self.last_time()? - self.first_time()?)
    }

    pub fn has_time(&self, time: A) -> bool {
        self.find_first_index(time)
            .map(|index| self.times[index] == time)
            .unwrap_or(false)
    }

    /// index of the first instant at or after `time`
    pub fn find_first_index(&self, time: A) -> Option<usize> {
        let index = self.times.partition_point(|t| *t < time);
        (index < self.times.len()).then_some(index)
    }

    /// index of the last instant at or before `time`
    pub fn find_last_index(&self, time: A) -> Option<usize> {
        self.times
            .partition_point(|t| *t <= time)
            .checked_sub(1)
    }

    pub fn shift_times(&mut self, offset: A) {
        for t in &mut self.times {
            *t = *t + offset;
        }
    }

    /// multiplies every instant by a non-negative factor
    pub fn scale_times(&mut self, factor: A) -> Result<(), Error> {
        if factor.is_nan() || factor < A::zero() {
            return Err(Error::InvalidArgument("scale factor must not be negative"));
        }

        for t in &mut self.times {
            *t = *t * factor;
        }
        Ok(())
    }

    /// true if all intervals match the first one within `tolerance`
    pub fn is_equidistant(&self, tolerance: A) -> bool {
        if self.times.len() < 3 {
            return true;
        }

        let step = self.times[1] - self.times[0];
        self.times
            .windows(2)
            .all(|w| (w[1] - w[0] - step).abs() <= tolerance)
    }

    /// true if no instant lies before its predecessor
    pub fn is_valid_time_order(&self) -> bool {
        self.times.windows(2).all(|w| w[0] <= w[1])
    }

    /// sorted union of both grids, equal instants collapse into one
    pub fn merge(&self, other: &Self) -> Self {
        self.merged(other, A::zero())
    }

    /// like `merge`, but instants closer than `tolerance` to the previously
    /// kept one collapse as well
    pub fn merge_with_tolerance(&self, other: &Self, tolerance: A) -> Result<Self, Error> {
        if tolerance.is_nan() || tolerance < A::zero() {
            return Err(Error::InvalidArgument(
                "merge tolerance must not be negative",
            ));
        }
        Ok(self.merged(other, tolerance))
    }

    fn merged(&self, other: &Self, tolerance: A) -> Self {
        let mut times: Vec<A> = self.times.iter().chain(&other.times).copied().collect();

        // the operands may have been edited through set_time, NaNs go last
        times.sort_by(|a, b| {
            a.partial_cmp(b)
                .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
        });
        // inf - inf is NaN, so exact matches need their own check
        times.dedup_by(|cur, kept| *cur == *kept || *cur - *kept <= tolerance);

        Self { times }
    }
}

impl<A: Float + std::fmt::Display> std::fmt::Display for Grid<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for t in &self.times {
            writeln!(f, "{}", t)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn equidistant() {
        let mut grid = Grid::equidistant(0.0, 2.0, 5).unwrap();
        testlib::assert_times_eq(grid.times(), &[0.0, 0.5, 1.0, 1.5, 2.0]);
        assert_abs_diff_eq!(grid.time(2).unwrap(), 1.0);

        grid.add_time(7.0).unwrap();
        testlib::assert_times_eq(grid.times(), &[0.0, 0.5, 1.0, 1.5, 2.0, 7.0]);
        assert_abs_diff_eq!(grid.interval_length().unwrap(), 7.0);
    }

    #[test]
    fn equidistant_spacing() {
        let grid = Grid::equidistant(0.1, 0.3, 7).unwrap();
        assert_eq!(grid.num_points(), 7);
        assert_eq!(grid.first_time().unwrap(), 0.1);
        assert_eq!(grid.last_time().unwrap(), 0.3);
        assert!(grid.is_equidistant(1.0e-12));

        for w in grid.times().windows(2) {
            assert_abs_diff_eq!(w[1] - w[0], 0.2 / 6.0, epsilon = 1.0e-12);
        }
    }

    #[test]
    fn equidistant_single_point() {
        let grid = Grid::equidistant(3.0, 3.0, 1).unwrap();
        testlib::assert_times_eq(grid.times(), &[3.0]);
        assert_abs_diff_eq!(grid.interval_length().unwrap(), 0.0);

        assert!(matches!(
            Grid::equidistant(3.0, 4.0, 1),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn equidistant_invalid() {
        assert!(matches!(
            Grid::equidistant(2.0, 1.0, 4),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Grid::equidistant(0.0, 1.0, 0),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Grid::equidistant(0.0, f64::INFINITY, 3),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn equidistant_f32() {
        let grid = Grid::<f32>::equidistant(0.0, 1.0, 3).unwrap();
        assert_eq!(grid.times(), &[0.0f32, 0.5, 1.0]);
    }

    #[test]
    fn set_time() {
        let mut grid = Grid::with_count(3);
        testlib::assert_times_eq(grid.times(), &[0.0, 0.0, 0.0]);

        grid.set_time(0, -1.0).unwrap();
        grid.set_time(1, 1.0).unwrap();
        grid.set_time(2, 5.0).unwrap();
        testlib::assert_times_eq(grid.times(), &[-1.0, 1.0, 5.0]);
        assert_abs_diff_eq!(grid.interval_length().unwrap(), 6.0);
        assert!(grid.is_valid_time_order());

        // order is the caller's business
        grid.set_time(1, 9.0).unwrap();
        assert!(!grid.is_valid_time_order());
    }

    #[test]
    fn out_of_range() {
        let mut grid = Grid::with_count(2);
        assert!(matches!(
            grid.time(2),
            Err(Error::OutOfRange { index: 2, len: 2 })
        ));
        assert!(matches!(
            grid.set_time(5, 1.0),
            Err(Error::OutOfRange { index: 5, len: 2 })
        ));
    }

    #[test]
    fn add_time() {
        let mut grid = Grid::new();
        grid.add_time(-4.0).unwrap();
        grid.add_time(-4.0).unwrap();
        grid.add_time(1.0).unwrap();
        assert_eq!(grid.num_points(), 3);
        assert_eq!(grid.last_time().unwrap(), 1.0);

        assert!(matches!(
            grid.add_time(0.5),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            grid.add_time(f64::NAN),
            Err(Error::InvalidArgument(_))
        ));
        // rejected calls leave the grid untouched
        testlib::assert_times_eq(grid.times(), &[-4.0, -4.0, 1.0]);
    }

    #[test]
    fn insert_time() {
        let mut grid = Grid::from_times(vec![0.0, 1.0, 1.0, 3.0]).unwrap();
        assert_eq!(grid.insert_time(2.0).unwrap(), 3);
        assert_eq!(grid.insert_time(1.0).unwrap(), 3);
        assert_eq!(grid.insert_time(-1.0).unwrap(), 0);
        assert_eq!(grid.insert_time(8.0).unwrap(), 7);
        testlib::assert_times_eq(grid.times(), &[-1.0, 0.0, 1.0, 1.0, 1.0, 2.0, 3.0, 8.0]);
        assert!(grid.is_valid_time_order());
    }

    #[test]
    fn from_times() {
        assert!(Grid::from_times(vec![0.0, 0.0, 1.0]).is_ok());
        assert!(matches!(
            Grid::from_times(vec![0.0, 2.0, 1.0]),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn empty() {
        let grid = Grid::<f64>::new();
        assert!(grid.is_empty());
        assert_eq!(grid.num_intervals(), 0);
        assert!(matches!(grid.interval_length(), Err(Error::EmptyGrid)));
        assert!(matches!(grid.first_time(), Err(Error::EmptyGrid)));
        assert_eq!(grid.find_first_index(0.0), None);
        assert_eq!(grid.find_last_index(0.0), None);
        assert!(grid.is_valid_time_order());
    }

    #[test]
    fn lookup() {
        let grid = Grid::from_times(vec![0.0, 1.0, 1.0, 2.5]).unwrap();
        assert_eq!(grid.find_first_index(-1.0), Some(0));
        assert_eq!(grid.find_first_index(1.0), Some(1));
        assert_eq!(grid.find_first_index(1.5), Some(3));
        assert_eq!(grid.find_first_index(3.0), None);

        assert_eq!(grid.find_last_index(-1.0), None);
        assert_eq!(grid.find_last_index(1.0), Some(2));
        assert_eq!(grid.find_last_index(9.0), Some(3));

        assert!(grid.has_time(2.5));
        assert!(!grid.has_time(2.0));
    }

    #[test]
    fn shift_scale() {
        let mut grid = Grid::equidistant(0.0, 2.0, 3).unwrap();
        grid.shift_times(1.0);
        testlib::assert_times_eq(grid.times(), &[1.0, 2.0, 3.0]);

        grid.scale_times(2.0).unwrap();
        testlib::assert_times_eq(grid.times(), &[2.0, 4.0, 6.0]);

        assert!(matches!(
            grid.scale_times(-1.0),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn is_equidistant() {
        assert!(Grid::from_times(vec![0.0, 1.0]).unwrap().is_equidistant(0.0));
        assert!(!Grid::from_times(vec![0.0, 1.0, 3.0])
            .unwrap()
            .is_equidistant(1.0e-9));
    }

    #[test]
    fn merge() {
        let a = Grid::from_times(vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        let b = Grid::from_times(vec![0.5, 1.0, 2.5, 4.0]).unwrap();

        let ab = a.merge(&b);
        let ba = b.merge(&a);
        testlib::assert_times_eq(ab.times(), &[0.0, 0.5, 1.0, 2.0, 2.5, 3.0, 4.0]);
        assert_eq!(ab, ba);
        assert!(ab.is_valid_time_order());

        // operands stay untouched
        assert_eq!(a.num_points(), 4);
        assert_eq!(b.num_points(), 4);
    }

    #[test]
    fn merge_empty() {
        let a = Grid::equidistant(0.0, 1.0, 3).unwrap();
        let empty = Grid::new();
        assert_eq!(a.merge(&empty), a);
        assert_eq!(empty.merge(&a), a);
        assert!(empty.merge(&empty).is_empty());
    }

    #[test]
    fn merge_collapses_stage_boundaries() {
        let a = Grid::from_times(vec![0.0, 1.0, 1.0]).unwrap();
        let b = Grid::from_times(vec![1.0, 2.0]).unwrap();
        testlib::assert_times_eq(a.merge(&b).times(), &[0.0, 1.0, 2.0]);
    }

    #[test]
    fn merge_unordered_operand() {
        let mut a = Grid::with_count(3);
        a.set_time(0, 2.0).unwrap();
        a.set_time(1, 0.0).unwrap();
        a.set_time(2, 1.0).unwrap();
        let b = Grid::from_times(vec![1.5]).unwrap();

        let merged = a.merge(&b);
        testlib::assert_times_eq(merged.times(), &[0.0, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn merge_with_tolerance() {
        let a = Grid::from_times(vec![0.0, 1.0, 2.0]).unwrap();
        let b = Grid::from_times(vec![1.0 + 1.0e-10, 3.0]).unwrap();

        assert_eq!(a.merge(&b).num_points(), 5);

        let merged = a.merge_with_tolerance(&b, 1.0e-8).unwrap();
        testlib::assert_times_eq(merged.times(), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(merged.time(1).unwrap(), 1.0);

        assert!(matches!(
            a.merge_with_tolerance(&b, -1.0),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn merge_nan() {
        let mut a = Grid::with_count(40);
        for i in 0..40 {
            let t = if i % 3 == 0 { f64::NAN } else { i as f64 };
            a.set_time(i, t).unwrap();
        }
        assert!(!a.is_valid_time_order());

        let merged = a.merge(&Grid::from_times(vec![1.0, 100.0]).unwrap());
        // 26 numbers plus 100.0, the 14 NaNs never compare equal
        assert_eq!(merged.num_points(), 41);

        // numbers come first in order, the NaNs are kept behind them
        let (numbers, nans) = merged.times().split_at(27);
        assert!(nans.iter().all(|t| t.is_nan()));
        assert!(numbers.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(numbers[26], 100.0);

        let merged = a.merge_with_tolerance(&Grid::new(), 0.5).unwrap();
        assert_eq!(merged.num_points(), 40);
    }

    #[test]
    fn merge_infinite() {
        let mut a = Grid::new();
        a.add_time(0.0).unwrap();
        a.add_time(f64::INFINITY).unwrap();
        let mut b = Grid::new();
        b.add_time(f64::INFINITY).unwrap();

        let merged = a.merge(&b);
        assert_eq!(merged.times(), &[0.0, f64::INFINITY]);
        assert!(merged.is_valid_time_order());

        let merged = a.merge_with_tolerance(&b, 1.0).unwrap();
        assert_eq!(merged.times(), &[0.0, f64::INFINITY]);

        let c = Grid::from_times(vec![f64::NEG_INFINITY, 0.0]).unwrap();
        let merged = c.merge(&a);
        assert_eq!(merged.times(), &[f64::NEG_INFINITY, 0.0, f64::INFINITY]);
    }

    #[test]
    fn nan_order() {
        let mut grid = Grid::from_times(vec![0.0, 1.0, 2.0]).unwrap();
        grid.set_time(1, f64::NAN).unwrap();
        assert!(!grid.is_valid_time_order());
        assert!(matches!(
            Grid::from_times(vec![0.0, f64::NAN]),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn display() {
        let grid = Grid::from_times(vec![0.0, 0.5, 2.0]).unwrap();
        assert_eq!(grid.to_string(), "0\n0.5\n2\n");
    }
}
