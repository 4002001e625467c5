//! Dense row-major matrices for pairwise distances and cumulative costs.

use std::ops::Index;

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::error::{DtwError, ShapeError};
use crate::metric::Metric;
use crate::series::TimeSeriesView;

/// Dense `rows × cols` distance matrix between two series.
///
/// `get(i, j)` is the distance between step `i` of the first series and step
/// `j` of the second. Always at least 1×1.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Build a distance matrix from caller-supplied rows.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ShapeError::EmptyMatrix`] | No rows, or the first row is empty |
    /// | [`ShapeError::RaggedMatrix`] | A row's length differs from the first |
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ShapeError> {
        let cols = rows.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(ShapeError::EmptyMatrix);
        }
        let n_rows = rows.len();
        let mut data = Vec::with_capacity(n_rows * cols);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != cols {
                return Err(ShapeError::RaggedMatrix {
                    row,
                    expected: cols,
                    got: values.len(),
                });
            }
            data.extend(values);
        }
        Ok(Self {
            rows: n_rows,
            cols,
            data,
        })
    }

    /// Compute all pairwise distances between `a` (rows) and `b` (columns).
    ///
    /// Rows are filled in parallel with rayon. Every cell is independent, so
    /// the result is identical to a sequential fill.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ShapeError::DimensionMismatch`] | `a` and `b` have different dimensionality |
    /// | [`ShapeError::NotScalar`] | Signed difference on multi-dimensional series |
    /// | [`DtwError::DegenerateVector`] | Cosine metric and a zero-magnitude vector |
    #[instrument(skip(a, b), fields(rows = a.len(), cols = b.len()))]
    pub fn build(
        metric: Metric,
        a: TimeSeriesView<'_>,
        b: TimeSeriesView<'_>,
    ) -> Result<Self, DtwError> {
        let prepared = metric.prepare(a, b)?;
        let rows = prepared.rows();
        let cols = prepared.cols();

        let mut data = vec![0.0; rows * cols];
        data.par_chunks_mut(cols)
            .enumerate()
            .for_each(|(i, row)| {
                for (j, cell) in row.iter_mut().enumerate() {
                    *cell = prepared.cell(i, j);
                }
            });

        debug!(cells = data.len(), "distance matrix built");
        Ok(Self { rows, cols, data })
    }

    /// Return the number of rows (steps in the first series).
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Return the number of columns (steps in the second series).
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Return the distance at `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= rows` or `j >= cols`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self[(i, j)]
    }

    /// Return row `i` as a slice.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Copy the matrix out as nested rows, e.g. for heatmap rendering.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.chunks_exact(self.cols).map(<[f64]>::to_vec).collect()
    }
}

impl Index<(usize, usize)> for DistanceMatrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        assert!(i < self.rows, "row index {i} out of bounds for {} rows", self.rows);
        assert!(j < self.cols, "column index {j} out of bounds for {} columns", self.cols);
        &self.data[i * self.cols + j]
    }
}

/// Dense cumulative-cost matrix produced by the alignment engine.
///
/// `get(i, j)` is the minimum cost of a monotonic path from `(0, 0)` to `(i, j)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl CostMatrix {
    pub(crate) fn from_raw(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self { rows, cols, data }
    }

    /// Return the number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Return the number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Return the cumulative cost at `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= rows` or `j >= cols`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self[(i, j)]
    }

    /// Return the cost at the bottom-right cell, i.e. the total alignment cost.
    #[must_use]
    pub fn terminal(&self) -> f64 {
        self.data[self.data.len() - 1]
    }

    /// Copy the matrix out as nested rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.chunks_exact(self.cols).map(<[f64]>::to_vec).collect()
    }
}

impl Index<(usize, usize)> for CostMatrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        assert!(i < self.rows, "row index {i} out of bounds for {} rows", self.rows);
        assert!(j < self.cols, "column index {j} out of bounds for {} columns", self.cols);
        &self.data[i * self.cols + j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::TimeSeries;

    #[test]
    fn from_rows_rejects_empty() {
        assert_eq!(DistanceMatrix::from_rows(vec![]), Err(ShapeError::EmptyMatrix));
        assert_eq!(
            DistanceMatrix::from_rows(vec![vec![], vec![]]),
            Err(ShapeError::EmptyMatrix)
        );
    }

    #[test]
    fn from_rows_rejects_ragged() {
        let result = DistanceMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0]]);
        assert_eq!(
            result,
            Err(ShapeError::RaggedMatrix {
                row: 2,
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn from_rows_layout() {
        let m = DistanceMatrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(m.get(1, 0), 4.0);
        assert_eq!(m[(0, 2)], 3.0);
        assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn build_cosine_orthonormal() {
        let a = TimeSeries::new(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        let m = DistanceMatrix::build(Metric::Cosine, a.as_view(), a.as_view()).unwrap();
        assert_eq!(m.to_rows(), vec![vec![0.0, 1.0], vec![1.0, 0.0]]);
    }

    #[test]
    fn build_signed_difference() {
        let a = TimeSeries::from_scalars(vec![1.0, 2.0, 3.0]).unwrap();
        let b = TimeSeries::from_scalars(vec![1.0, 2.0, 3.0]).unwrap();
        let m = DistanceMatrix::build(Metric::SignedDifference, a.as_view(), b.as_view()).unwrap();
        assert_eq!(
            m.to_rows(),
            vec![
                vec![0.0, -1.0, -2.0],
                vec![1.0, 0.0, -1.0],
                vec![2.0, 1.0, 0.0],
            ]
        );
    }

    #[test]
    fn build_matches_sequential_fill() {
        let a = TimeSeries::new(
            (0..37)
                .map(|i| vec![(i as f64 * 0.3).sin() + 1.5, (i as f64 * 0.2).cos() + 1.5])
                .collect(),
        )
        .unwrap();
        let b = TimeSeries::new(
            (0..23)
                .map(|i| vec![(i as f64 * 0.5).cos() + 1.5, (i as f64 * 0.1).sin() + 1.5])
                .collect(),
        )
        .unwrap();
        let m = DistanceMatrix::build(Metric::Cosine, a.as_view(), b.as_view()).unwrap();
        assert_eq!(m.rows(), 37);
        assert_eq!(m.cols(), 23);
        for i in 0..37 {
            for j in 0..23 {
                let expected = Metric::Cosine.distance(a.frame(i), b.frame(j)).unwrap();
                assert_eq!(m.get(i, j), expected, "cell ({i}, {j})");
            }
        }
    }

    #[test]
    fn build_reports_degenerate_vector() {
        let a = TimeSeries::new(vec![vec![0.0, 0.0]]).unwrap();
        let b = TimeSeries::new(vec![vec![1.0, 1.0]]).unwrap();
        let err = DistanceMatrix::build(Metric::Cosine, a.as_view(), b.as_view()).unwrap_err();
        assert!(matches!(err, DtwError::DegenerateVector { step: 0, .. }));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn index_out_of_bounds_panics() {
        let m = DistanceMatrix::from_rows(vec![vec![1.0]]).unwrap();
        let _ = m.get(1, 0);
    }

    #[test]
    fn cost_matrix_terminal() {
        let c = CostMatrix::from_raw(2, 2, vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(c.terminal(), 3.0);
        assert_eq!(c.get(1, 0), 2.0);
        assert_eq!(c.to_rows(), vec![vec![0.0, 1.0], vec![2.0, 3.0]]);
    }
}
