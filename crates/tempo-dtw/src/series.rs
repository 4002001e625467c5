//! Time series types with validation guarantees.

use std::ops::Index;
use std::slice::ChunksExact;

use crate::error::{DtwError, ShapeError};

/// Owned, validated multivariate time series.
///
/// Guaranteed non-empty, with every feature vector sharing one dimensionality
/// of at least 1 and every component finite. Stored row-major in a single
/// buffer: step `t` occupies `data[t * dim..(t + 1) * dim]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    dim: usize,
    data: Vec<f64>,
}

impl TimeSeries {
    /// Create a new time series from one feature vector per time step.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ShapeError::EmptySeries`] | `frames` is empty |
    /// | [`ShapeError::ZeroDimension`] | The first vector has no components |
    /// | [`ShapeError::RaggedSeries`] | A vector's length differs from the first |
    /// | [`DtwError::NonFiniteValue`] | Any component is NaN or infinite |
    pub fn new(frames: Vec<Vec<f64>>) -> Result<Self, DtwError> {
        let dim = frames.first().ok_or(ShapeError::EmptySeries)?.len();
        if dim == 0 {
            return Err(ShapeError::ZeroDimension.into());
        }

        let mut data = Vec::with_capacity(frames.len() * dim);
        for (step, frame) in frames.into_iter().enumerate() {
            if frame.len() != dim {
                return Err(ShapeError::RaggedSeries {
                    step,
                    expected: dim,
                    got: frame.len(),
                }
                .into());
            }
            data.extend(frame);
        }

        Self::from_flat(dim, data)
    }

    /// Create a single-dimension series with one scalar per time step.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ShapeError::EmptySeries`] | `values` is empty |
    /// | [`DtwError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn from_scalars(values: Vec<f64>) -> Result<Self, DtwError> {
        Self::from_flat(1, values)
    }

    /// Create a series from a row-major buffer of `dim`-sized vectors.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ShapeError::ZeroDimension`] | `dim` is zero |
    /// | [`ShapeError::EmptySeries`] | `data` is empty |
    /// | [`ShapeError::RaggedSeries`] | `data.len()` is not a multiple of `dim` |
    /// | [`DtwError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn from_flat(dim: usize, data: Vec<f64>) -> Result<Self, DtwError> {
        TimeSeriesView::new(dim, &data)?;
        Ok(Self { dim, data })
    }

    /// Borrow this series as a zero-copy view.
    #[must_use]
    pub fn as_view(&self) -> TimeSeriesView<'_> {
        TimeSeriesView::new_unchecked(self.dim, &self.data)
    }

    /// Return the number of time steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    /// Return true if the series has no time steps.
    ///
    /// Always `false` for a constructed [`TimeSeries`]. Provided to satisfy
    /// the `len_without_is_empty` convention.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return the dimensionality of every feature vector.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Return the feature vector at time step `step`.
    ///
    /// # Panics
    ///
    /// Panics if `step >= self.len()`.
    #[must_use]
    pub fn frame(&self, step: usize) -> &[f64] {
        self.as_view().frame(step)
    }

    /// Iterate over the feature vectors in time order.
    pub fn frames(&self) -> ChunksExact<'_, f64> {
        self.data.chunks_exact(self.dim)
    }

    /// Return the underlying row-major buffer.
    #[must_use]
    pub fn as_flat(&self) -> &[f64] {
        &self.data
    }

    /// Consume the series and return one owned vector per time step.
    #[must_use]
    pub fn into_frames(self) -> Vec<Vec<f64>> {
        self.frames().map(<[f64]>::to_vec).collect()
    }
}

impl TryFrom<Vec<Vec<f64>>> for TimeSeries {
    type Error = DtwError;

    fn try_from(frames: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::new(frames)
    }
}

impl Index<usize> for TimeSeries {
    type Output = [f64];

    fn index(&self, step: usize) -> &Self::Output {
        self.frame(step)
    }
}

/// Borrowed, validated view into a time series. Zero-copy reference.
#[derive(Debug, Clone, Copy)]
pub struct TimeSeriesView<'a> {
    dim: usize,
    data: &'a [f64],
}

impl<'a> TimeSeriesView<'a> {
    /// Create a new view over a row-major buffer of `dim`-sized vectors.
    ///
    /// # Errors
    ///
    /// Same conditions as [`TimeSeries::from_flat`].
    pub fn new(dim: usize, data: &'a [f64]) -> Result<Self, DtwError> {
        if dim == 0 {
            return Err(ShapeError::ZeroDimension.into());
        }
        if data.is_empty() {
            return Err(ShapeError::EmptySeries.into());
        }
        if data.len() % dim != 0 {
            return Err(ShapeError::RaggedSeries {
                step: data.len() / dim,
                expected: dim,
                got: data.len() % dim,
            }
            .into());
        }
        if let Some(index) = data.iter().position(|v| !v.is_finite()) {
            return Err(DtwError::NonFiniteValue {
                step: index / dim,
                component: index % dim,
            });
        }
        Ok(Self { dim, data })
    }

    /// Create a view without validation. For internal use where data is already validated.
    pub(crate) fn new_unchecked(dim: usize, data: &'a [f64]) -> Self {
        Self { dim, data }
    }

    /// Return the number of time steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    /// Return true if the view has no time steps.
    ///
    /// Always `false` for a validated view.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return the dimensionality of every feature vector.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Return the feature vector at time step `step`.
    ///
    /// # Panics
    ///
    /// Panics if `step >= self.len()`.
    #[must_use]
    pub fn frame(&self, step: usize) -> &'a [f64] {
        &self.data[step * self.dim..(step + 1) * self.dim]
    }

    /// Iterate over the feature vectors in time order.
    pub fn frames(&self) -> ChunksExact<'a, f64> {
        self.data.chunks_exact(self.dim)
    }

    /// Return the underlying row-major buffer.
    #[must_use]
    pub fn as_flat(&self) -> &'a [f64] {
        self.data
    }
}

impl Index<usize> for TimeSeriesView<'_> {
    type Output = [f64];

    fn index(&self, step: usize) -> &Self::Output {
        self.frame(step)
    }
}
