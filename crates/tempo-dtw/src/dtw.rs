//! DTW alignment engine: cost-matrix fill, traceback and scoring.

use tracing::{debug, instrument};

use crate::error::DtwError;
use crate::matrix::{CostMatrix, DistanceMatrix};
use crate::metric::Metric;
use crate::path::{WarpingPath, WarpingStep};
use crate::score::NormalizedScore;
use crate::series::TimeSeriesView;

/// Predecessor chosen for a cell during the fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Move {
    Diagonal,
    Up,
    Left,
}

/// Cost matrix and optimal warping path for one distance matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    /// Minimum cumulative cost to reach every cell from `(0, 0)`.
    pub cost_matrix: CostMatrix,
    /// Optimal path from `(0, 0)` to the bottom-right cell.
    pub path: WarpingPath,
}

impl Alignment {
    /// Return the raw cumulative cost of the optimal path.
    #[must_use]
    pub fn cost(&self) -> f64 {
        self.cost_matrix.terminal()
    }

    /// Return the cost normalized by the combined length of both series.
    #[must_use]
    pub fn score(&self) -> NormalizedScore {
        NormalizedScore::normalize(self.cost(), self.cost_matrix.rows(), self.cost_matrix.cols())
    }
}

/// Full result of comparing two series: distances, alignment and score.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// Pairwise distances between the two series.
    pub distances: DistanceMatrix,
    /// Cost matrix and warping path.
    pub alignment: Alignment,
    /// Normalized alignment cost.
    pub score: NormalizedScore,
}

/// Align a distance matrix: fill the cumulative cost matrix and trace back
/// the minimum-cost monotonic path.
///
/// The first row and column are forced walks. Interior cells take
/// `D[i][j] + min(C[i-1][j], C[i][j-1], C[i-1][j-1])`. When predecessors tie
/// the path prefers the diagonal, then up (`i-1`), then left (`j-1`), so
/// paths are reproducible.
///
/// Runs in O(rows * cols) time and space.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DtwError::NonFiniteCost`] | A cumulative cost overflows or a distance is not finite |
#[instrument(skip(distances), fields(rows = distances.rows(), cols = distances.cols()))]
pub fn align(distances: &DistanceMatrix) -> Result<Alignment, DtwError> {
    let n = distances.rows();
    let m = distances.cols();

    let mut cost = vec![0.0; n * m];
    let mut moves = vec![Move::Diagonal; n * m];

    cost[0] = finite(distances.get(0, 0), 0, 0)?;
    for j in 1..m {
        cost[j] = finite(cost[j - 1] + distances.get(0, j), 0, j)?;
        moves[j] = Move::Left;
    }

    for i in 1..n {
        let row = distances.row(i);
        let base = i * m;
        cost[base] = finite(cost[base - m] + row[0], i, 0)?;
        moves[base] = Move::Up;
        for j in 1..m {
            let idx = base + j;
            let (min_val, mv) = cheapest(cost[idx - m - 1], cost[idx - m], cost[idx - 1]);
            cost[idx] = finite(row[j] + min_val, i, j)?;
            moves[idx] = mv;
        }
    }

    // Traceback from (n-1, m-1) to (0, 0).
    let mut steps = Vec::with_capacity(n + m - 1);
    let mut i = n - 1;
    let mut j = m - 1;
    loop {
        steps.push(WarpingStep { a: i, b: j });
        if i == 0 && j == 0 {
            break;
        }
        match moves[i * m + j] {
            Move::Diagonal => {
                i -= 1;
                j -= 1;
            }
            Move::Up => i -= 1,
            Move::Left => j -= 1,
        }
    }
    steps.reverse();

    debug!(path_len = steps.len(), cost = cost[n * m - 1], "alignment complete");

    Ok(Alignment {
        cost_matrix: CostMatrix::from_raw(n, m, cost),
        path: WarpingPath::new(steps),
    })
}

/// Every cumulative cost must stay finite.
#[inline]
fn finite(value: f64, row: usize, col: usize) -> Result<f64, DtwError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DtwError::NonFiniteCost { row, col })
    }
}

/// Pick the cheapest predecessor, breaking ties diagonal, then up, then left.
#[inline]
fn cheapest(diag: f64, above: f64, left: f64) -> (f64, Move) {
    if diag <= above && diag <= left {
        (diag, Move::Diagonal)
    } else if above <= left {
        (above, Move::Up)
    } else {
        (left, Move::Left)
    }
}

/// Rolling two-row DTW: computes only the terminal cost.
///
/// Visits cells in the same order and performs the same additions as
/// [`align`], so the result (and the first non-finite cell reported) is
/// identical to `align(..)`.
fn rolling_cost(
    rows: usize,
    cols: usize,
    cell: impl Fn(usize, usize) -> f64,
) -> Result<f64, DtwError> {
    let mut prev = vec![0.0; cols];
    let mut curr = vec![0.0; cols];

    prev[0] = finite(cell(0, 0), 0, 0)?;
    for j in 1..cols {
        prev[j] = finite(prev[j - 1] + cell(0, j), 0, j)?;
    }

    for i in 1..rows {
        curr[0] = finite(prev[0] + cell(i, 0), i, 0)?;
        for j in 1..cols {
            let (min_val, _) = cheapest(prev[j - 1], prev[j], curr[j - 1]);
            curr[j] = finite(cell(i, j) + min_val, i, j)?;
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    Ok(prev[cols - 1])
}

/// Immutable DTW configuration. Thread-safe and copyable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dtw {
    metric: Metric,
}

impl Dtw {
    /// Create a DTW calculator using the given metric.
    #[must_use]
    pub fn new(metric: Metric) -> Self {
        Self { metric }
    }

    /// Create a DTW calculator over multivariate feature vectors using cosine distance.
    #[must_use]
    pub fn cosine() -> Self {
        Self::new(Metric::Cosine)
    }

    /// Create a DTW calculator over single-dimension series using signed difference.
    #[must_use]
    pub fn signed_difference() -> Self {
        Self::new(Metric::SignedDifference)
    }

    /// Return the distance metric.
    #[must_use]
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Compute the pairwise distance matrix between two series.
    ///
    /// # Errors
    ///
    /// Same conditions as [`DistanceMatrix::build`].
    pub fn distance_matrix(
        &self,
        a: TimeSeriesView<'_>,
        b: TimeSeriesView<'_>,
    ) -> Result<DistanceMatrix, DtwError> {
        DistanceMatrix::build(self.metric, a, b)
    }

    /// Compare two series, keeping the distance matrix, cost matrix and path.
    ///
    /// Use [`score`][Dtw::score] when only the normalized score is needed.
    ///
    /// # Errors
    ///
    /// Same conditions as [`DistanceMatrix::build`], plus
    /// [`DtwError::NonFiniteCost`] when a cumulative cost overflows.
    #[instrument(skip(a, b), fields(rows = a.len(), cols = b.len()))]
    pub fn compare(
        &self,
        a: TimeSeriesView<'_>,
        b: TimeSeriesView<'_>,
    ) -> Result<Comparison, DtwError> {
        let distances = self.distance_matrix(a, b)?;
        let alignment = align(&distances)?;
        let score = alignment.score();
        Ok(Comparison {
            distances,
            alignment,
            score,
        })
    }

    /// Compute the raw cumulative alignment cost without allocating the full
    /// matrices. Runs in O(rows * cols) time and O(cols) space.
    ///
    /// # Errors
    ///
    /// Same conditions as [`compare`][Dtw::compare].
    #[instrument(skip(a, b), fields(rows = a.len(), cols = b.len()))]
    pub fn cost(&self, a: TimeSeriesView<'_>, b: TimeSeriesView<'_>) -> Result<f64, DtwError> {
        let prepared = self.metric.prepare(a, b)?;
        rolling_cost(prepared.rows(), prepared.cols(), |i, j| prepared.cell(i, j))
    }

    /// Compute the normalized alignment score: `cost / (a.len() + b.len())`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`compare`][Dtw::compare].
    pub fn score(
        &self,
        a: TimeSeriesView<'_>,
        b: TimeSeriesView<'_>,
    ) -> Result<NormalizedScore, DtwError> {
        let cost = self.cost(a, b)?;
        Ok(NormalizedScore::normalize(cost, a.len(), b.len()))
    }
}
