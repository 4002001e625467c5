//! Length-normalized alignment score.

use std::cmp::Ordering;
use std::fmt;

/// Alignment cost divided by the combined length of both series.
///
/// Lower means more similar; identical series score 0. There is no fixed
/// upper bound, and under [`Metric::SignedDifference`](crate::Metric) the
/// score can be negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct NormalizedScore(f64);

impl NormalizedScore {
    /// Normalize a raw cumulative cost by `rows + cols`.
    ///
    /// `rows` and `cols` are the lengths of the two aligned series.
    #[must_use]
    pub fn normalize(cost: f64, rows: usize, cols: usize) -> Self {
        Self(cost / (rows + cols) as f64)
    }

    /// Return the raw score value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Total ordering comparison using [`f64::total_cmp`].
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for NormalizedScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divides_by_combined_length() {
        let s = NormalizedScore::normalize(6.0, 1, 5);
        assert_eq!(s.value(), 1.0);
    }

    #[test]
    fn display_five_decimals() {
        let s = NormalizedScore::normalize(1.0, 1, 2);
        assert_eq!(format!("{s}"), "0.33333");
    }

    #[test]
    fn total_cmp_ordering() {
        let a = NormalizedScore::normalize(1.0, 1, 1);
        let b = NormalizedScore::normalize(2.0, 1, 1);
        assert_eq!(a.total_cmp(&b), Ordering::Less);
        assert_eq!(b.total_cmp(&a), Ordering::Greater);
        assert_eq!(a.total_cmp(&a), Ordering::Equal);
    }

    #[test]
    fn negative_cost_keeps_sign() {
        let s = NormalizedScore::normalize(-4.0, 3, 3);
        assert!(s.value() < 0.0);
    }
}
