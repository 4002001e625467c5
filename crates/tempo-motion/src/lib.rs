//! Motion comparison on top of the DTW engine.
//!
//! Provides the shape and speed comparison facade, speed-profile derivation,
//! pose feature extraction from detector keypoints, the pre-recording
//! registration check and score grading.

mod compare;
mod config;
mod error;
mod grade;
mod pose;
mod registration;
mod result;
mod speed;

pub use compare::{align_shape, compare_shape, compare_speed};
pub use config::{RegistrationConfig, SpeedConfig};
pub use error::MotionError;
pub use grade::Grade;
pub use pose::{Displacement, Keypoint, PoseFeatures, extract_series, keypoint};
pub use registration::Registration;
pub use result::SpeedScores;
pub use speed::{scaled, speed_series};
