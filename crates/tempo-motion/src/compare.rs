//! Comparison facade: shape and speed scores of a recording against a reference.
//!
//! The recorded series always indexes the rows of the distance matrix and the
//! reference series the columns.

use tempo_dtw::{Comparison, Dtw, NormalizedScore, TimeSeries};
use tracing::{debug, instrument};

use crate::config::SpeedConfig;
use crate::error::MotionError;
use crate::result::SpeedScores;
use crate::speed::{scaled, speed_series};

/// Score how closely the shape of `recorded` follows `reference`.
///
/// Runs multivariate DTW with cosine distance over the full feature vectors.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`MotionError::Dtw`] | The series differ in dimensionality, or a feature vector has zero magnitude |
pub fn compare_shape(
    recorded: &TimeSeries,
    reference: &TimeSeries,
) -> Result<NormalizedScore, MotionError> {
    Ok(Dtw::cosine().score(recorded.as_view(), reference.as_view())?)
}

/// Like [`compare_shape`], but keeps the distance matrix, cost matrix and
/// warping path for visualization.
///
/// # Errors
///
/// Same conditions as [`compare_shape`].
pub fn align_shape(
    recorded: &TimeSeries,
    reference: &TimeSeries,
) -> Result<Comparison, MotionError> {
    Ok(Dtw::cosine().compare(recorded.as_view(), reference.as_view())?)
}

/// Compare the speed profiles of `recorded` and `reference` with the default
/// [`SpeedConfig`].
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`MotionError::Dtw`] | The series differ in dimensionality, or a speed or cumulative cost overflows |
pub fn compare_speed(
    recorded: &TimeSeries,
    reference: &TimeSeries,
) -> Result<SpeedScores, MotionError> {
    SpeedConfig::default().compare(recorded, reference)
}

#[instrument(skip(recorded, reference), fields(
    recorded_len = recorded.len(),
    reference_len = reference.len(),
    fast_factor = config.fast_factor,
))]
pub(crate) fn speed_scores(
    config: &SpeedConfig,
    recorded: &TimeSeries,
    reference: &TimeSeries,
) -> Result<SpeedScores, MotionError> {
    if recorded.dim() != reference.dim() {
        return Err(MotionError::Dtw(
            tempo_dtw::ShapeError::DimensionMismatch {
                left: recorded.dim(),
                right: reference.dim(),
            }
            .into(),
        ));
    }

    let recorded_speed = speed_series(recorded)?;
    let reference_speed = speed_series(reference)?;
    let fast_reference = scaled(&reference_speed, config.fast_factor)?;

    let dtw = Dtw::signed_difference();
    let normal = dtw.score(recorded_speed.as_view(), reference_speed.as_view())?;
    let fast = dtw.score(recorded_speed.as_view(), fast_reference.as_view())?;
    debug!(normal = normal.value(), fast = fast.value(), "speed scores computed");

    Ok(SpeedScores { normal, fast })
}
