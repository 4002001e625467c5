use tempo_dtw::DtwError;

/// Errors from motion comparison, feature extraction and configuration.
#[derive(Debug, thiserror::Error)]
pub enum MotionError {
    /// Wraps a DTW error encountered while comparing two series.
    #[error("DTW error during comparison: {0}")]
    Dtw(#[from] DtwError),

    /// Returned when a pose frame does not contain the keypoints feature extraction needs.
    #[error("pose frame {frame} has {got} keypoints, need at least {needed}")]
    MissingKeypoints {
        /// Index of the offending frame.
        frame: usize,
        /// Number of keypoints the frame contained.
        got: usize,
        /// Minimum number of keypoints required.
        needed: usize,
    },

    /// Returned when feature extraction is given no frames.
    #[error("no pose frames to extract features from")]
    NoFrames,

    /// Returned when the fast-reference speed factor is not finite and positive.
    #[error("fast reference factor must be finite and positive, got {factor}")]
    InvalidFactor {
        /// The invalid factor.
        factor: f64,
    },

    /// Returned when a registration threshold is negative or not finite.
    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidThreshold {
        /// Name of the threshold.
        name: &'static str,
        /// The invalid value.
        value: f64,
    },
}
