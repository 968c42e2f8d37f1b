use crate::error::MalformedInput;
use crate::format;
use crate::Error;
use crate::Grid;
use num_traits::Float;

/// a [`Grid`] with one vector of fixed dimension per grid point
///
/// The vectors are stored row-wise in a single `(num_points, dimension)`
/// array, row `i` belongs to the time instant at index `i`.
/// The dimension is fixed when the instance is created.
#[derive(Clone, Debug, PartialEq)]
pub struct VariablesGrid<A = f64> {
    grid: Grid<A>,
    values: ndarray::Array2<A>,
}

impl<A: Float> VariablesGrid<A> {
    /// trajectory without any points
    pub fn with_dimension(dimension: usize) -> Self {
        Self::from_grid(dimension, Grid::new())
    }

    /// takes over `grid` as time axis, all vectors start out zeroed
    pub fn from_grid(dimension: usize, grid: Grid<A>) -> Self {
        let values = ndarray::Array2::zeros((grid.num_points(), dimension));
        Self { grid, values }
    }

    /// zeroed vectors on an equidistant time axis, see [`Grid::equidistant`]
    pub fn equidistant(
        dimension: usize,
        start: A,
        end: A,
        num_points: usize,
    ) -> Result<Self, Error> {
        Ok(Self::from_grid(
            dimension,
            Grid::equidistant(start, end, num_points)?,
        ))
    }

    /// load a trajectory file
    ///
    /// The file is read completely before anything gets parsed. Times are
    /// taken in file order, out of order files are accepted with a warning.
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Error>
    where
        A: std::str::FromStr,
    {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(MalformedInput::from)?;
        let vg: Self = text.parse()?;

        log::debug!(
            "loaded {} points of dimension {} from {}",
            vg.num_points(),
            vg.num_values(),
            path.display()
        );
        Ok(vg)
    }

    pub fn num_points(&self) -> usize {
        self.grid.num_points()
    }

    /// dimension of each vector
    pub fn num_values(&self) -> usize {
        self.values.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    pub fn grid(&self) -> &Grid<A> {
        &self.grid
    }

    pub fn time(&self, index: usize) -> Result<A, Error> {
        self.grid.time(index)
    }

    /// all vectors, one row per grid point
    pub fn values(&self) -> ndarray::ArrayView2<'_, A> {
        self.values.view()
    }

    fn check_dimension(&self, len: usize) -> Result<(), Error> {
        if len != self.num_values() {
            return Err(Error::DimensionMismatch {
                expected: self.num_values(),
                actual: len,
            });
        }
        Ok(())
    }

    pub fn vector(&self, index: usize) -> Result<ndarray::ArrayView1<'_, A>, Error> {
        self.grid.check_index(index)?;
        Ok(self.values.row(index))
    }

    pub fn set_vector<S>(
        &mut self,
        index: usize,
        vector: &ndarray::ArrayBase<S, ndarray::Ix1>,
    ) -> Result<(), Error>
    where
        S: ndarray::Data<Elem = A>,
    {
        self.grid.check_index(index)?;
        self.check_dimension(vector.len())?;

        self.values.row_mut(index).assign(vector);
        Ok(())
    }

    pub fn first_vector(&self) -> Result<ndarray::ArrayView1<'_, A>, Error> {
        if self.is_empty() {
            return Err(Error::EmptyGrid);
        }
        Ok(self.values.row(0))
    }

    pub fn last_vector(&self) -> Result<ndarray::ArrayView1<'_, A>, Error> {
        if self.is_empty() {
            return Err(Error::EmptyGrid);
        }
        Ok(self.values.row(self.num_points() - 1))
    }

    pub fn set_zero(&mut self) {
        self.values.fill(A::zero());
    }

    /// appends a single point, same ordering rule as [`Grid::add_time`]
    pub fn add_vector<S>(
        &mut self,
        time: A,
        vector: &ndarray::ArrayBase<S, ndarray::Ix1>,
    ) -> Result<(), Error>
    where
        S: ndarray::Data<Elem = A>,
    {
        self.check_dimension(vector.len())?;
        self.grid.check_next_time(time)?;

        self.values.push_row(vector.view())?;
        self.grid.extend_unchecked(&[time]);
        Ok(())
    }

    /// puts all points of `other` behind the points of `self`
    ///
    /// This is a plain concatenation: nothing gets sorted or deduplicated
    /// and `other` is expected to start at or after the last time of `self`.
    /// Use [`Grid::merge`] for a set union of time axes.
    pub fn append_times(&mut self, other: &Self) -> Result<(), Error> {
        self.check_dimension(other.num_values())?;

        if let (Ok(last), Ok(first)) = (self.grid.last_time(), other.grid.first_time()) {
            if first < last {
                log::warn!(
                    "appended trajectory starts at {} before the current end {}",
                    first.to_f64().unwrap_or(f64::NAN),
                    last.to_f64().unwrap_or(f64::NAN)
                );
            }
        }

        self.values.append(ndarray::Axis(0), other.values.view())?;
        self.grid.extend_unchecked(other.grid.times());
        Ok(())
    }

    /// copy of the points in `range`
    pub fn sub_grid(&self, range: std::ops::Range<usize>) -> Result<Self, Error> {
        if range.start > range.end {
            return Err(Error::InvalidArgument("sub grid range is inverted"));
        }
        if range.end > self.num_points() {
            return Err(Error::OutOfRange {
                index: range.end,
                len: self.num_points(),
            });
        }

        Ok(Self {
            grid: Grid::from_times_unchecked(self.grid.times()[range.clone()].to_vec()),
            values: self.values.slice(ndarray::s![range, ..]).to_owned(),
        })
    }

    pub fn shift_times(&mut self, offset: A) {
        self.grid.shift_times(offset);
    }

    pub fn is_valid_time_order(&self) -> bool {
        self.grid.is_valid_time_order()
    }

    /// textual dump, `precision` is the number of fractional digits
    ///
    /// Without a precision every number is written in its shortest form that
    /// parses back to the same value.
    pub fn display(&self, precision: Option<usize>) -> format::Dump<'_, A> {
        format::Dump {
            times: self.grid.times(),
            values: self.values.view(),
            precision,
        }
    }

    pub fn write_to<W: std::io::Write>(
        &self,
        writer: &mut W,
        precision: Option<usize>,
    ) -> Result<(), Error>
    where
        A: std::fmt::Display,
    {
        write!(writer, "{}", self.display(precision))?;
        Ok(())
    }
}

impl<A: Float + std::str::FromStr> std::str::FromStr for VariablesGrid<A> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = format::parse(s)?;
        let vg = Self {
            grid: Grid::from_times_unchecked(rows.times),
            values: rows.values,
        };

        if !vg.is_valid_time_order() {
            log::warn!("trajectory times are not in order, keeping them as they are");
        }
        Ok(vg)
    }
}

impl<A: Float + std::fmt::Display> std::fmt::Display for VariablesGrid<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.display(None), f)
    }
}
