use std::fmt;

use serde::Serialize;
use tempo_dtw::NormalizedScore;

/// Coarse feedback label for a normalized score. Lower scores grade better.
///
/// | Score range      | Grade       |
/// |------------------|-------------|
/// | `< 0.001`        | `Perfect`   |
/// | `[0.001, 0.005)` | `Great`     |
/// | `[0.005, 0.01)`  | `Good`      |
/// | `[0.01, 0.05)`   | `Okay`      |
/// | otherwise        | `TryAgain`  |
///
/// Negative scores, which only signed-difference alignments produce, grade
/// as `Perfect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Grade {
    /// Score below 0.001.
    Perfect,
    /// Score in `[0.001, 0.005)`.
    Great,
    /// Score in `[0.005, 0.01)`.
    Good,
    /// Score in `[0.01, 0.05)`.
    Okay,
    /// Score of 0.05 or more. Serialized as `"Try Again"`.
    #[serde(rename = "Try Again")]
    TryAgain,
}

impl Grade {
    const BANDS: [(f64, Grade); 4] = [
        (0.001, Grade::Perfect),
        (0.005, Grade::Great),
        (0.01, Grade::Good),
        (0.05, Grade::Okay),
    ];

    /// Grade a normalized score.
    #[must_use]
    pub fn from_score(score: NormalizedScore) -> Self {
        let value = score.value();
        Self::BANDS
            .iter()
            .find(|(upper, _)| value < *upper)
            .map_or(Grade::TryAgain, |&(_, grade)| grade)
    }

    /// Return the display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Grade::Perfect => "Perfect",
            Grade::Great => "Great",
            Grade::Good => "Good",
            Grade::Okay => "Okay",
            Grade::TryAgain => "Try Again",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
