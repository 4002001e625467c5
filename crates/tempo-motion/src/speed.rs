//! Speed profile derivation from position-like feature series.

use tempo_dtw::{DtwError, TimeSeries};

/// Derive the per-step speed series of `series`.
///
/// Speed at step `t` is the squared Euclidean norm of `x[t] - x[t-1]`. Step 0
/// is compared with itself, so its speed is always 0. The result is a
/// single-dimension series of the same length.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DtwError::NonFiniteValue`] | A squared step overflows to infinity |
pub fn speed_series(series: &TimeSeries) -> Result<TimeSeries, DtwError> {
    let speeds: Vec<f64> = (0..series.len())
        .map(|t| squared_step(series.frame(t), series.frame(t.saturating_sub(1))))
        .collect();
    TimeSeries::from_scalars(speeds)
}

/// Multiply every component of `series` by `factor`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DtwError::NonFiniteValue`] | A scaled value overflows or `factor` is not finite |
pub fn scaled(series: &TimeSeries, factor: f64) -> Result<TimeSeries, DtwError> {
    let data = series.as_flat().iter().map(|v| v * factor).collect();
    TimeSeries::from_flat(series.dim(), data)
}

fn squared_step(current: &[f64], previous: &[f64]) -> f64 {
    current
        .iter()
        .zip(previous)
        .map(|(c, p)| (c - p).powi(2))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_is_stationary() {
        let ts = TimeSeries::new(vec![vec![3.0, 4.0], vec![0.0, 0.0]]).unwrap();
        let speed = speed_series(&ts).unwrap();
        assert_eq!(speed.as_flat(), &[0.0, 25.0]);
    }

    #[test]
    fn speed_is_squared_magnitude() {
        let ts = TimeSeries::new(vec![
            vec![0.0, 0.0, 0.0],
            vec![1.0, 2.0, 2.0],
            vec![1.0, 2.0, 2.0],
            vec![0.0, 0.0, 0.0],
        ])
        .unwrap();
        let speed = speed_series(&ts).unwrap();
        assert_eq!(speed.dim(), 1);
        assert_eq!(speed.as_flat(), &[0.0, 9.0, 0.0, 9.0]);
    }

    #[test]
    fn scalar_series_speed() {
        let ts = TimeSeries::from_scalars(vec![1.0, 3.0, 2.0]).unwrap();
        assert_eq!(speed_series(&ts).unwrap().as_flat(), &[0.0, 4.0, 1.0]);
    }

    #[test]
    fn scaled_doubles_values() {
        let ts = TimeSeries::from_scalars(vec![0.0, 1.5, 4.0]).unwrap();
        assert_eq!(scaled(&ts, 2.0).unwrap().as_flat(), &[0.0, 3.0, 8.0]);
    }

    #[test]
    fn overflowing_speed_is_an_error() {
        let ts = TimeSeries::from_scalars(vec![0.0, 1e200]).unwrap();
        assert!(matches!(
            speed_series(&ts),
            Err(DtwError::NonFiniteValue { step: 1, .. })
        ));
    }
}
