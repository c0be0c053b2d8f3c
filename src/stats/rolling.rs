//! Centered rolling mean / standard deviation band.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BandError {
    #[error("rolling window must be at least 1")]
    ZeroWindow,
}

/// Rolling statistics over one numeric column, one entry per row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RollingBand {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

impl RollingBand {
    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    /// Whether every row carries a concrete band.
    pub fn is_complete(&self) -> bool {
        self.mean.iter().chain(&self.std).all(|v| !v.is_nan())
    }
}

/// Index range `[start, end)` of the centered window of width `window`
/// around `i`, clipped to `len`.  For odd widths the window is symmetric;
/// for even widths it reaches one further back than forward.
pub fn centered_window(i: usize, window: usize, len: usize) -> (usize, usize) {
    let offset = window.saturating_sub(1) / 2;
    let end = (i + offset + 1).min(len);
    let start = (i + offset + 1).saturating_sub(window);
    (start, end)
}

/// Mean and sample std over the centered window at every index.
///
/// A window needs at least `min_periods` present values to produce a mean
/// and at least two to produce a std.  Otherwise the slot is `NaN`.
pub fn rolling_mean_std(
    values: &[Option<f64>],
    window: usize,
    min_periods: usize,
) -> Result<(Vec<f64>, Vec<f64>), BandError> {
    if window == 0 {
        return Err(BandError::ZeroWindow);
    }
    let min_periods = min_periods.max(1);
    let len = values.len();
    let mut mean = vec![f64::NAN; len];
    let mut std = vec![f64::NAN; len];

    for i in 0..len {
        let (start, end) = centered_window(i, window, len);
        let present: Vec<f64> = values[start..end]
            .iter()
            .flatten()
            .copied()
            .filter(|v| !v.is_nan())
            .collect();
        let n = present.len();
        if n < min_periods {
            continue;
        }

        let m = present.iter().sum::<f64>() / n as f64;
        mean[i] = m;
        if n >= 2 {
            let var = present.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (n - 1) as f64;
            std[i] = var.sqrt();
        }
    }

    Ok((mean, std))
}

/// Copy the next defined value into every undefined slot before it.
pub fn backward_fill(values: &mut [f64]) {
    let mut next = f64::NAN;
    for v in values.iter_mut().rev() {
        if v.is_nan() {
            *v = next;
        } else {
            next = *v;
        }
    }
}

/// Copy the previous defined value into every undefined slot after it.
pub fn forward_fill(values: &mut [f64]) {
    let mut prev = f64::NAN;
    for v in values.iter_mut() {
        if v.is_nan() {
            *v = prev;
        } else {
            prev = *v;
        }
    }
}

/// Rolling ±1 std band with gaps filled, backward pass then forward pass.
///
/// Each window uses whatever values are present in it, so clipped edge
/// windows and windows spanning nulls still count.  Only windows with no
/// present value (no mean) or a single one (no std) are filled in from
/// their neighbours.
pub fn rolling_band(values: &[Option<f64>], window: usize) -> Result<RollingBand, BandError> {
    rolling_band_with_min_periods(values, window, 1)
}

pub fn rolling_band_with_min_periods(
    values: &[Option<f64>],
    window: usize,
    min_periods: usize,
) -> Result<RollingBand, BandError> {
    let (mut mean, mut std) = rolling_mean_std(values, window, min_periods)?;

    backward_fill(&mut mean);
    forward_fill(&mut mean);
    backward_fill(&mut std);
    forward_fill(&mut std);

    let upper = mean.iter().zip(&std).map(|(m, s)| m + s).collect();
    let lower = mean.iter().zip(&std).map(|(m, s)| m - s).collect();

    Ok(RollingBand {
        mean,
        std,
        upper,
        lower,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(v: &[f64]) -> Vec<Option<f64>> {
        v.iter().copied().map(Some).collect()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn window_bounds_follow_center_offset() {
        assert_eq!(centered_window(2, 3, 5), (1, 4));
        assert_eq!(centered_window(0, 3, 5), (0, 2));
        assert_eq!(centered_window(4, 3, 5), (3, 5));
        // even width: two back, one forward
        assert_eq!(centered_window(5, 4, 10), (3, 7));
    }

    #[test]
    fn three_point_example() {
        let band = rolling_band(&some(&[10.0, 12.0, 11.0, 13.0, 12.0]), 3).unwrap();

        assert!(close(band.mean[2], 12.0));
        assert!(close(band.std[2], 1.0));
        assert!(close(band.upper[2], 13.0));
        assert!(close(band.lower[2], 11.0));
    }

    #[test]
    fn edges_use_clipped_windows() {
        let band = rolling_band(&some(&[10.0, 12.0, 11.0, 13.0, 12.0]), 3).unwrap();

        // row 0 sees [10, 12], row 4 sees [13, 12]
        assert!(close(band.mean[0], 11.0));
        assert!(close(band.std[0], 2f64.sqrt()));
        assert!(close(band.mean[4], 12.5));
        assert!(close(band.std[4], 0.5f64.sqrt()));
        assert!(band.is_complete());
    }

    #[test]
    fn band_width_is_twice_std() {
        let values: Vec<Option<f64>> = (0..120)
            .map(|i| Some((i as f64 * 0.3).sin() * 5.0 + i as f64 * 0.1))
            .collect();
        let band = rolling_band(&values, 30).unwrap();

        assert_eq!(band.len(), values.len());
        assert!(band.is_complete());
        for i in 0..band.len() {
            assert!(close(band.upper[i] - band.lower[i], 2.0 * band.std[i]));
        }
    }

    #[test]
    fn constant_series_has_zero_spread() {
        let band = rolling_band(&some(&[4.2; 40]), 5).unwrap();
        for i in 0..40 {
            assert!(close(band.std[i], 0.0));
            assert!(close(band.mean[i], 4.2));
            assert!(close(band.upper[i], 4.2));
            assert!(close(band.lower[i], 4.2));
        }
    }

    #[test]
    fn strict_min_periods_leaves_gaps_that_get_filled() {
        let mut values = some(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        values[3] = None;
        let (mean, _) = rolling_mean_std(&values, 3, 3).unwrap();

        // windows touching row 3 lack a full set of values
        assert!(mean[2].is_nan() && mean[3].is_nan() && mean[4].is_nan());

        let band = rolling_band_with_min_periods(&values, 3, 3).unwrap();
        assert!(band.is_complete());
        // backward pass runs first, so the gap takes the later window
        assert!(close(band.mean[3], 6.0));
    }

    #[test]
    fn nulls_inside_window_are_skipped() {
        let mut values = some(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        values[3] = None;
        let band = rolling_band(&values, 3).unwrap();

        assert!(band.is_complete());
        assert!(close(band.mean[3], 4.0));
        assert!(close(band.std[3], 2f64.sqrt()));
        assert!(close(band.mean[2], 2.5));
    }

    #[test]
    fn lower_min_periods_uses_present_values() {
        let values = vec![Some(1.0), None, Some(3.0)];
        let (mean, std) = rolling_mean_std(&values, 3, 2).unwrap();

        assert!(close(mean[1], 2.0));
        assert!(close(std[1], 2f64.sqrt()));
        // a single present value gives a mean but no std
        let (mean, std) = rolling_mean_std(&[Some(5.0)], 3, 1).unwrap();
        assert!(close(mean[0], 5.0));
        assert!(std[0].is_nan());
    }

    #[test]
    fn window_longer_than_data_covers_every_row() {
        let values: Vec<Option<f64>> = (0..10).map(|i| Some(i as f64)).collect();
        let band = rolling_band(&values, 30).unwrap();

        assert_eq!(band.len(), 10);
        assert!(band.is_complete());
        // every clipped window reaches the whole series
        for i in 0..10 {
            assert!(close(band.mean[i], 4.5));
        }
    }

    #[test]
    fn periodic_gaps_keep_band_complete() {
        let values: Vec<Option<f64>> = (0..200)
            .map(|i| (i % 20 != 0).then_some((i as f64 * 0.2).cos() * 3.0 + 10.0))
            .collect();
        let band = rolling_band(&values, 30).unwrap();

        assert!(band.is_complete());
        assert!(!band.mean[100].is_nan());
        for i in 0..band.len() {
            assert!(close(band.upper[i] - band.lower[i], 2.0 * band.std[i]));
        }
    }

    #[test]
    fn isolated_value_borrows_neighbouring_std() {
        // rows 0..=2 each see one value; backward fill gives them row 3's std
        let band = rolling_band(&[Some(2.0), None, Some(4.0), Some(6.0)], 2).unwrap();
        assert!(band.is_complete());
        assert!(close(band.mean[0], 2.0));
        assert!(close(band.std[0], band.std[1]));
    }

    #[test]
    fn single_value_has_no_spread() {
        let band = rolling_band(&[Some(3.0)], 30).unwrap();
        assert!(close(band.mean[0], 3.0));
        assert!(band.std[0].is_nan());
    }

    #[test]
    fn zero_window_is_rejected() {
        assert_eq!(rolling_band(&[], 0), Err(BandError::ZeroWindow));
    }
}
