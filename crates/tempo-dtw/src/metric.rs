//! Pluggable distance metrics between feature vectors.

use crate::error::{DtwError, MetricError, ShapeError, Side};
use crate::series::TimeSeriesView;

/// Distance between two feature vectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Metric {
    /// `1 - (a·b) / (‖a‖·‖b‖)`, for multivariate feature vectors.
    ///
    /// Undefined for zero-magnitude vectors, which are reported as errors.
    #[default]
    Cosine,

    /// Plain signed difference `a - b`, for single-dimension series.
    ///
    /// Not a true distance: it is negative whenever `a < b`, and
    /// `d(a, b) == -d(b, a)`. Scores built on it keep that sign.
    SignedDifference,
}

impl Metric {
    /// Compute the distance between two feature vectors.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ShapeError::DimensionMismatch`] | `a` and `b` have different lengths |
    /// | [`ShapeError::NotScalar`] | Signed difference on vectors that are not 1-dimensional |
    /// | [`MetricError::ZeroMagnitude`] | Cosine distance with a zero-magnitude operand |
    /// | [`MetricError::NonFiniteDistance`] | An operand holds NaN or infinity |
    pub fn distance(self, a: &[f64], b: &[f64]) -> Result<f64, MetricError> {
        if a.len() != b.len() {
            return Err(ShapeError::DimensionMismatch {
                left: a.len(),
                right: b.len(),
            }
            .into());
        }
        let d = match self {
            Self::Cosine => {
                if a.iter().chain(b).any(|x| !x.is_finite()) {
                    return Err(MetricError::NonFiniteDistance);
                }
                let mag_a = Magnitude::of(a).ok_or(MetricError::ZeroMagnitude(Side::First))?;
                let mag_b = Magnitude::of(b).ok_or(MetricError::ZeroMagnitude(Side::Second))?;
                cosine_with_magnitudes(a, b, mag_a, mag_b)
            }
            Self::SignedDifference => {
                if a.len() != 1 {
                    return Err(ShapeError::NotScalar { dim: a.len() }.into());
                }
                signed_difference(a[0], b[0])
            }
        };
        if d.is_finite() {
            Ok(d)
        } else {
            Err(MetricError::NonFiniteDistance)
        }
    }

    /// Validate two series against this metric and precompute per-vector state.
    pub(crate) fn prepare<'a>(
        self,
        a: TimeSeriesView<'a>,
        b: TimeSeriesView<'a>,
    ) -> Result<PreparedMetric<'a>, DtwError> {
        if a.dim() != b.dim() {
            return Err(ShapeError::DimensionMismatch {
                left: a.dim(),
                right: b.dim(),
            }
            .into());
        }
        let (mags_a, mags_b) = match self {
            Self::Cosine => (magnitudes(a, Side::First)?, magnitudes(b, Side::Second)?),
            Self::SignedDifference => {
                if a.dim() != 1 {
                    return Err(ShapeError::NotScalar { dim: a.dim() }.into());
                }
                (Vec::new(), Vec::new())
            }
        };
        Ok(PreparedMetric {
            metric: self,
            a,
            b,
            mags_a,
            mags_b,
        })
    }
}

/// A metric bound to a validated pair of series, ready for per-cell evaluation.
///
/// Cosine magnitudes are computed once per vector instead of once per cell.
#[derive(Debug)]
pub(crate) struct PreparedMetric<'a> {
    metric: Metric,
    a: TimeSeriesView<'a>,
    b: TimeSeriesView<'a>,
    mags_a: Vec<Magnitude>,
    mags_b: Vec<Magnitude>,
}

impl PreparedMetric<'_> {
    /// Number of rows (steps in the first series).
    pub(crate) fn rows(&self) -> usize {
        self.a.len()
    }

    /// Number of columns (steps in the second series).
    pub(crate) fn cols(&self) -> usize {
        self.b.len()
    }

    /// Distance between step `i` of the first series and step `j` of the second.
    #[inline]
    pub(crate) fn cell(&self, i: usize, j: usize) -> f64 {
        match self.metric {
            Metric::Cosine => cosine_with_magnitudes(
                self.a.frame(i),
                self.b.frame(j),
                self.mags_a[i],
                self.mags_b[j],
            ),
            Metric::SignedDifference => signed_difference(self.a.frame(i)[0], self.b.frame(j)[0]),
        }
    }
}

/// Cosine distance between two vectors.
///
/// # Errors
///
/// Same conditions as [`Metric::distance`] in cosine mode.
pub fn cosine_distance(a: &[f64], b: &[f64]) -> Result<f64, MetricError> {
    Metric::Cosine.distance(a, b)
}

/// Signed difference between two scalars: `a - b`.
#[must_use]
#[inline]
pub fn signed_difference(a: f64, b: f64) -> f64 {
    a - b
}

/// Euclidean length of a vector, split into its largest absolute component
/// and the norm of the vector divided by it.
///
/// Dividing first keeps squares in `[0, 1]`, so vectors near the limits of
/// f64 neither overflow nor underflow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Magnitude {
    scale: f64,
    norm: f64,
}

impl Magnitude {
    /// `None` for a zero-magnitude vector.
    fn of(v: &[f64]) -> Option<Self> {
        let scale = v.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
        if scale == 0.0 {
            return None;
        }
        let norm = v.iter().map(|x| (x / scale).powi(2)).sum::<f64>().sqrt();
        Some(Self { scale, norm })
    }
}

/// Rounding can push `1 - cos` a hair below zero for parallel vectors; clamp
/// it without masking NaN.
#[inline]
fn cosine_with_magnitudes(a: &[f64], b: &[f64], mag_a: Magnitude, mag_b: Magnitude) -> f64 {
    let dot: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| (x / mag_a.scale) * (y / mag_b.scale))
        .sum();
    let d = 1.0 - dot / (mag_a.norm * mag_b.norm);
    if d < 0.0 { 0.0 } else { d }
}

fn magnitudes(series: TimeSeriesView<'_>, side: Side) -> Result<Vec<Magnitude>, DtwError> {
    series
        .frames()
        .enumerate()
        .map(|(step, frame)| Magnitude::of(frame).ok_or(DtwError::DegenerateVector { side, step }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::TimeSeries;

    #[test]
    fn cosine_orthogonal_is_one() {
        let d = cosine_distance(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert!((d - 1.0).abs() < 1e-12);
    }

    #[test]
    fn cosine_opposite_is_two() {
        let d = cosine_distance(&[1.0, 2.0], &[-1.0, -2.0]).unwrap();
        assert!((d - 2.0).abs() < 1e-12);
    }

    #[test]
    fn cosine_ignores_magnitude() {
        let d = cosine_distance(&[0.3, 0.4, 0.5], &[3.0, 4.0, 5.0]).unwrap();
        assert!(d.abs() < 1e-12);
        assert!(d >= 0.0);
    }

    #[test]
    fn cosine_is_symmetric() {
        let a = [0.1, 0.2, 0.3, 0.4, 0.5];
        let b = [0.5, 0.1, 0.4, 0.2, 0.3];
        let ab = cosine_distance(&a, &b).unwrap();
        let ba = cosine_distance(&b, &a).unwrap();
        assert!((ab - ba).abs() < 1e-15);
    }

    #[test]
    fn cosine_rejects_zero_vector() {
        assert_eq!(
            cosine_distance(&[0.0, 0.0], &[1.0, 0.0]),
            Err(MetricError::ZeroMagnitude(Side::First))
        );
        assert_eq!(
            cosine_distance(&[1.0, 0.0], &[0.0, 0.0]),
            Err(MetricError::ZeroMagnitude(Side::Second))
        );
    }

    #[test]
    fn cosine_handles_huge_components() {
        let d = cosine_distance(&[1e200, 1e200], &[1e200, -1e200]).unwrap();
        assert_eq!(d, 1.0);
    }

    #[test]
    fn cosine_handles_tiny_components() {
        let d = cosine_distance(&[1e-170, 0.0], &[1.0, 0.0]).unwrap();
        assert_eq!(d, 0.0);
    }

    #[test]
    fn non_finite_operands_rejected() {
        assert_eq!(
            cosine_distance(&[f64::NAN, 1.0], &[1.0, 0.0]),
            Err(MetricError::NonFiniteDistance)
        );
        assert_eq!(
            cosine_distance(&[f64::INFINITY, 1.0], &[1.0, 0.0]),
            Err(MetricError::NonFiniteDistance)
        );
        assert_eq!(
            cosine_distance(&[f64::NAN, f64::NAN], &[1.0, 0.0]),
            Err(MetricError::NonFiniteDistance)
        );
        assert_eq!(
            Metric::SignedDifference.distance(&[f64::NAN], &[1.0]),
            Err(MetricError::NonFiniteDistance)
        );
    }

    #[test]
    fn mismatched_lengths_rejected() {
        assert_eq!(
            Metric::Cosine.distance(&[1.0, 2.0], &[1.0, 2.0, 3.0]),
            Err(ShapeError::DimensionMismatch { left: 2, right: 3 }.into())
        );
    }

    #[test]
    fn signed_difference_is_antisymmetric() {
        let ab = Metric::SignedDifference.distance(&[1.0], &[3.5]).unwrap();
        let ba = Metric::SignedDifference.distance(&[3.5], &[1.0]).unwrap();
        assert_eq!(ab, -2.5);
        assert_eq!(ba, 2.5);
        assert_eq!(ab, -ba);
    }

    #[test]
    fn signed_difference_requires_scalars() {
        assert_eq!(
            Metric::SignedDifference.distance(&[1.0, 2.0], &[3.0, 4.0]),
            Err(ShapeError::NotScalar { dim: 2 }.into())
        );
    }

    #[test]
    fn prepare_reports_degenerate_step() {
        let a = TimeSeries::new(vec![vec![1.0, 0.0], vec![1.0, 1.0]]).unwrap();
        let b = TimeSeries::new(vec![vec![1.0, 0.0], vec![0.0, 0.0], vec![2.0, 1.0]]).unwrap();
        let err = Metric::Cosine.prepare(a.as_view(), b.as_view()).unwrap_err();
        assert_eq!(
            err,
            DtwError::DegenerateVector {
                side: Side::Second,
                step: 1
            }
        );
    }

    #[test]
    fn prepare_rejects_dimension_mismatch() {
        let a = TimeSeries::from_scalars(vec![1.0, 2.0]).unwrap();
        let b = TimeSeries::new(vec![vec![1.0, 2.0]]).unwrap();
        let err = Metric::SignedDifference
            .prepare(a.as_view(), b.as_view())
            .unwrap_err();
        assert_eq!(err, ShapeError::DimensionMismatch { left: 1, right: 2 }.into());
    }

    #[test]
    fn prepared_cell_matches_distance() {
        let a = TimeSeries::new(vec![vec![0.2, 0.9], vec![0.7, 0.1], vec![1e200, 1e-200]]).unwrap();
        let b = TimeSeries::new(vec![vec![0.5, 0.5], vec![0.1, 0.8]]).unwrap();
        let prepared = Metric::Cosine.prepare(a.as_view(), b.as_view()).unwrap();
        for i in 0..3 {
            for j in 0..2 {
                let direct = cosine_distance(a.frame(i), b.frame(j)).unwrap();
                assert_eq!(prepared.cell(i, j), direct);
            }
        }
    }
}
