//! Readiness check run before a recording starts.

use crate::config::RegistrationConfig;
use crate::error::MotionError;
use crate::pose::{Displacement, Keypoint, PoseFeatures, keypoint};

/// Outcome of a registration check on one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    /// Every upper-body keypoint is detected above the confidence threshold.
    pub keypoints_visible: bool,
    /// Every arm segment is within the level threshold.
    pub arms_level: bool,
}

impl Registration {
    /// Return true when the pose is ready for recording.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.keypoints_visible && self.arms_level
    }
}

pub(crate) fn check(
    config: &RegistrationConfig,
    keypoints: &[Keypoint],
) -> Result<Registration, MotionError> {
    let features = PoseFeatures::extract(keypoints)?;

    let keypoints_visible = keypoint::UPPER_BODY
        .iter()
        .all(|&i| keypoints[i].confidence > config.confidence_threshold);

    let arms_level = features
        .arm_segments()
        .iter()
        .all(|segment| is_level(segment, config.angle_threshold));

    Ok(Registration {
        keypoints_visible,
        arms_level,
    })
}

/// The level test applies `tan` to the segment slope `dy / dx`. Vertical
/// segments never pass.
fn is_level(segment: &Displacement, threshold: f64) -> bool {
    if segment.dx == 0.0 {
        return false;
    }
    (segment.dy / segment.dx).tan().abs() < threshold
}
