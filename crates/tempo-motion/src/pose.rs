//! Upper-body displacement features from pose keypoints.
//!
//! Keypoints follow the 17-point MoveNet layout. Only the nose, shoulders,
//! elbows and wrists are used.

use serde::{Deserialize, Serialize};
use tempo_dtw::TimeSeries;
use tracing::{debug, instrument};

use crate::error::MotionError;

/// Index of each keypoint used by feature extraction.
pub mod keypoint {
    /// Nose.
    pub const NOSE: usize = 0;
    /// Left shoulder.
    pub const LEFT_SHOULDER: usize = 5;
    /// Right shoulder.
    pub const RIGHT_SHOULDER: usize = 6;
    /// Left elbow.
    pub const LEFT_ELBOW: usize = 7;
    /// Right elbow.
    pub const RIGHT_ELBOW: usize = 8;
    /// Left wrist.
    pub const LEFT_WRIST: usize = 9;
    /// Right wrist.
    pub const RIGHT_WRIST: usize = 10;

    /// Every keypoint the features depend on.
    pub const UPPER_BODY: [usize; 7] = [
        NOSE,
        LEFT_SHOULDER,
        RIGHT_SHOULDER,
        LEFT_ELBOW,
        RIGHT_ELBOW,
        LEFT_WRIST,
        RIGHT_WRIST,
    ];

    /// Minimum number of keypoints a frame must contain.
    pub const REQUIRED: usize = RIGHT_WRIST + 1;
}

/// A single detected keypoint in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Detector confidence in `[0, 1]`.
    pub confidence: f64,
}

/// A 2D displacement between two keypoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Displacement {
    /// Horizontal component.
    pub dx: f64,
    /// Vertical component.
    pub dy: f64,
}

impl Displacement {
    fn between(from: (f64, f64), to: (f64, f64)) -> Self {
        Self {
            dx: to.0 - from.0,
            dy: to.1 - from.1,
        }
    }
}

/// Upper-body displacement features for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseFeatures {
    /// Nose relative to the shoulder midpoint.
    pub head: Displacement,
    /// Left elbow relative to the left shoulder.
    pub left_upper_arm: Displacement,
    /// Left wrist relative to the left elbow.
    pub left_lower_arm: Displacement,
    /// Right elbow relative to the right shoulder.
    pub right_upper_arm: Displacement,
    /// Right wrist relative to the right elbow.
    pub right_lower_arm: Displacement,
}

impl PoseFeatures {
    /// Number of components in [`to_vector`][Self::to_vector].
    pub const DIM: usize = 10;

    /// Extract features from one frame of keypoints.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MotionError::MissingKeypoints`] | Fewer than 11 keypoints in the frame |
    pub fn extract(keypoints: &[Keypoint]) -> Result<Self, MotionError> {
        Self::extract_frame(0, keypoints)
    }

    fn extract_frame(frame: usize, keypoints: &[Keypoint]) -> Result<Self, MotionError> {
        if keypoints.len() < keypoint::REQUIRED {
            return Err(MotionError::MissingKeypoints {
                frame,
                got: keypoints.len(),
                needed: keypoint::REQUIRED,
            });
        }
        let at = |index: usize| (keypoints[index].x, keypoints[index].y);

        let left_shoulder = at(keypoint::LEFT_SHOULDER);
        let right_shoulder = at(keypoint::RIGHT_SHOULDER);
        let mid_shoulder = (
            left_shoulder.0 + (right_shoulder.0 - left_shoulder.0) / 2.0,
            left_shoulder.1 + (right_shoulder.1 - left_shoulder.1) / 2.0,
        );

        Ok(Self {
            head: Displacement::between(mid_shoulder, at(keypoint::NOSE)),
            left_upper_arm: Displacement::between(left_shoulder, at(keypoint::LEFT_ELBOW)),
            left_lower_arm: Displacement::between(
                at(keypoint::LEFT_ELBOW),
                at(keypoint::LEFT_WRIST),
            ),
            right_upper_arm: Displacement::between(right_shoulder, at(keypoint::RIGHT_ELBOW)),
            right_lower_arm: Displacement::between(
                at(keypoint::RIGHT_ELBOW),
                at(keypoint::RIGHT_WRIST),
            ),
        })
    }

    /// Return the four arm segments: left upper, left lower, right upper, right lower.
    #[must_use]
    pub fn arm_segments(&self) -> [Displacement; 4] {
        [
            self.left_upper_arm,
            self.left_lower_arm,
            self.right_upper_arm,
            self.right_lower_arm,
        ]
    }

    /// Flatten into a feature vector: head, left upper arm, left lower arm,
    /// right upper arm, right lower arm, each as `(dx, dy)`.
    #[must_use]
    pub fn to_vector(&self) -> [f64; Self::DIM] {
        let [lu, ll, ru, rl] = self.arm_segments();
        [
            self.head.dx,
            self.head.dy,
            lu.dx,
            lu.dy,
            ll.dx,
            ll.dy,
            ru.dx,
            ru.dy,
            rl.dx,
            rl.dy,
        ]
    }
}

/// Turn a sequence of keypoint frames into a 10-dimensional feature series.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`MotionError::NoFrames`] | `frames` is empty |
/// | [`MotionError::MissingKeypoints`] | A frame has fewer than 11 keypoints |
/// | [`MotionError::Dtw`] | A keypoint coordinate is not finite |
#[instrument(skip(frames), fields(n_frames = frames.len()))]
pub fn extract_series(frames: &[Vec<Keypoint>]) -> Result<TimeSeries, MotionError> {
    if frames.is_empty() {
        return Err(MotionError::NoFrames);
    }
    let mut data = Vec::with_capacity(frames.len() * PoseFeatures::DIM);
    for (frame, keypoints) in frames.iter().enumerate() {
        data.extend(PoseFeatures::extract_frame(frame, keypoints)?.to_vector());
    }
    let series = TimeSeries::from_flat(PoseFeatures::DIM, data)?;
    debug!(len = series.len(), "feature series extracted");
    Ok(series)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A T-pose facing the camera: shoulders at y=100, arms straight out.
    pub(crate) fn t_pose() -> Vec<Keypoint> {
        let mut points = vec![
            Keypoint {
                x: 0.0,
                y: 0.0,
                confidence: 0.0,
            };
            17
        ];
        let mut set = |i: usize, x: f64, y: f64| {
            points[i] = Keypoint {
                x,
                y,
                confidence: 0.9,
            };
        };
        set(keypoint::NOSE, 200.0, 60.0);
        set(keypoint::LEFT_SHOULDER, 240.0, 100.0);
        set(keypoint::RIGHT_SHOULDER, 160.0, 100.0);
        set(keypoint::LEFT_ELBOW, 300.0, 100.0);
        set(keypoint::RIGHT_ELBOW, 100.0, 100.0);
        set(keypoint::LEFT_WRIST, 360.0, 102.0);
        set(keypoint::RIGHT_WRIST, 40.0, 98.0);
        points
    }

    #[test]
    fn t_pose_features() {
        let features = PoseFeatures::extract(&t_pose()).unwrap();
        assert_eq!(features.head, Displacement { dx: 0.0, dy: -40.0 });
        assert_eq!(features.left_upper_arm, Displacement { dx: 60.0, dy: 0.0 });
        assert_eq!(features.left_lower_arm, Displacement { dx: 60.0, dy: 2.0 });
        assert_eq!(features.right_upper_arm, Displacement { dx: -60.0, dy: 0.0 });
        assert_eq!(features.right_lower_arm, Displacement { dx: -60.0, dy: -2.0 });
        assert_eq!(
            features.to_vector(),
            [0.0, -40.0, 60.0, 0.0, 60.0, 2.0, -60.0, 0.0, -60.0, -2.0]
        );
    }

    #[test]
    fn eleven_keypoints_are_enough() {
        let mut points = t_pose();
        points.truncate(11);
        assert!(PoseFeatures::extract(&points).is_ok());
    }

    #[test]
    fn too_few_keypoints_rejected() {
        let frames = vec![t_pose(), t_pose()[..7].to_vec()];
        let err = extract_series(&frames).unwrap_err();
        assert!(matches!(
            err,
            MotionError::MissingKeypoints {
                frame: 1,
                got: 7,
                needed: 11
            }
        ));
    }

    #[test]
    fn series_has_one_step_per_frame() {
        let frames = vec![t_pose(); 4];
        let series = extract_series(&frames).unwrap();
        assert_eq!(series.len(), 4);
        assert_eq!(series.dim(), PoseFeatures::DIM);
    }

    #[test]
    fn empty_frames_rejected() {
        assert!(matches!(extract_series(&[]), Err(MotionError::NoFrames)));
    }

    #[test]
    fn non_finite_coordinate_rejected() {
        let mut points = t_pose();
        points[keypoint::LEFT_WRIST].x = f64::NAN;
        let err = extract_series(&[points]).unwrap_err();
        assert!(matches!(err, MotionError::Dtw(_)));
    }

    #[test]
    fn keypoint_json_shape() {
        let k: Keypoint = serde_json::from_str(r#"{"x": 1.5, "y": -2.0, "confidence": 0.25}"#)
            .unwrap();
        assert_eq!(
            k,
            Keypoint {
                x: 1.5,
                y: -2.0,
                confidence: 0.25
            }
        );
    }
}
