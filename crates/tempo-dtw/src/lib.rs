//! Dynamic Time Warping alignment of multivariate time series.
//!
//! Pure math library with zero I/O. Provides validated series types, pluggable
//! distance metrics (cosine and signed difference), parallel distance matrix
//! construction, the cost-matrix fill and traceback of the alignment engine,
//! and length-normalized scores.

mod dtw;
mod error;
mod matrix;
mod metric;
mod path;
mod score;
mod series;

pub use dtw::{Alignment, Comparison, Dtw, align};
pub use error::{DtwError, MetricError, ShapeError, Side};
pub use matrix::{CostMatrix, DistanceMatrix};
pub use metric::{Metric, cosine_distance, signed_difference};
pub use path::{WarpingPath, WarpingStep};
pub use score::NormalizedScore;
pub use series::{TimeSeries, TimeSeriesView};
