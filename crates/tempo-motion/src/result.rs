//! Result types for motion comparison.

use tempo_dtw::NormalizedScore;

use crate::grade::Grade;

/// Speed-profile scores of a recording against its reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedScores {
    /// Recorded speeds aligned against the reference speeds.
    pub normal: NormalizedScore,
    /// Recorded speeds aligned against the reference speeds scaled by the fast factor.
    pub fast: NormalizedScore,
}

impl SpeedScores {
    /// Grade the normal-speed score.
    #[must_use]
    pub fn normal_grade(&self) -> Grade {
        Grade::from_score(self.normal)
    }

    /// Grade the fast-speed score.
    #[must_use]
    pub fn fast_grade(&self) -> Grade {
        Grade::from_score(self.fast)
    }
}
