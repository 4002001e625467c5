//! Configuration builders for speed comparison and registration checks.

use tempo_dtw::TimeSeries;

use crate::error::MotionError;
use crate::pose::Keypoint;
use crate::registration::Registration;
use crate::result::SpeedScores;

/// Configuration for speed-profile comparison.
///
/// Construct via [`SpeedConfig::default`] or [`SpeedConfig::new`], then chain
/// `with_*` methods to override defaults.
///
/// # Defaults
///
/// | Parameter     | Default |
/// |---------------|---------|
/// | `fast_factor` | 2.0     |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedConfig {
    pub(crate) fast_factor: f64,
}

impl SpeedConfig {
    /// Multiplier applied to the reference speed series for the "fast" score.
    pub const DEFAULT_FAST_FACTOR: f64 = 2.0;

    /// Create a speed comparison configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fast_factor: Self::DEFAULT_FAST_FACTOR,
        }
    }

    /// Set the multiplier applied to the reference speeds for the "fast" score.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MotionError::InvalidFactor`] | `factor` is not finite or not positive |
    pub fn with_fast_factor(mut self, factor: f64) -> Result<Self, MotionError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(MotionError::InvalidFactor { factor });
        }
        self.fast_factor = factor;
        Ok(self)
    }

    /// Return the fast-reference multiplier.
    #[must_use]
    pub fn fast_factor(&self) -> f64 {
        self.fast_factor
    }

    /// Compare the speed profiles of `recorded` and `reference`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MotionError::Dtw`] | The series have different dimensionality, or a speed or cumulative cost overflows |
    pub fn compare(
        &self,
        recorded: &TimeSeries,
        reference: &TimeSeries,
    ) -> Result<SpeedScores, MotionError> {
        crate::compare::speed_scores(self, recorded, reference)
    }
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for the pre-recording registration check.
///
/// # Defaults
///
/// | Parameter              | Default |
/// |------------------------|---------|
/// | `confidence_threshold` | 0.1     |
/// | `angle_threshold`      | 0.5     |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegistrationConfig {
    pub(crate) confidence_threshold: f64,
    pub(crate) angle_threshold: f64,
}

impl RegistrationConfig {
    /// Create a registration configuration with default thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            confidence_threshold: 0.1,
            angle_threshold: 0.5,
        }
    }

    /// Set the confidence a keypoint must exceed to count as visible.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MotionError::InvalidThreshold`] | `threshold` is negative or not finite |
    pub fn with_confidence_threshold(mut self, threshold: f64) -> Result<Self, MotionError> {
        self.confidence_threshold = validate_threshold("confidence threshold", threshold)?;
        Ok(self)
    }

    /// Set the bound on `|tan(dy/dx)|` for an arm segment to count as level.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MotionError::InvalidThreshold`] | `threshold` is negative or not finite |
    pub fn with_angle_threshold(mut self, threshold: f64) -> Result<Self, MotionError> {
        self.angle_threshold = validate_threshold("angle threshold", threshold)?;
        Ok(self)
    }

    /// Return the keypoint confidence threshold.
    #[must_use]
    pub fn confidence_threshold(&self) -> f64 {
        self.confidence_threshold
    }

    /// Return the arm level threshold.
    #[must_use]
    pub fn angle_threshold(&self) -> f64 {
        self.angle_threshold
    }

    /// Check whether one frame of keypoints is ready for recording.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MotionError::MissingKeypoints`] | Fewer than 11 keypoints in the frame |
    pub fn check(&self, keypoints: &[Keypoint]) -> Result<Registration, MotionError> {
        crate::registration::check(self, keypoints)
    }
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_threshold(name: &'static str, value: f64) -> Result<f64, MotionError> {
    if !value.is_finite() || value < 0.0 {
        return Err(MotionError::InvalidThreshold { name, value });
    }
    Ok(value)
}
