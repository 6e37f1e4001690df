//! Numeric utilities shared by every forecaster.
//!
//! - [`interpolate`]: piecewise-linear lookup over a sorted grid
//! - [`weighted_average_slope`]: recency-weighted slope of a curve's tail
//! - [`fit_stats`]: R² and RMSE of fitted values against observations
//! - [`prediction_stats`]: the same statistics evaluated through a predictor
//!
//! # Examples
//!
//! ```
//! use u_trend::numeric::{fit_stats, interpolate};
//!
//! let xs = [0.0, 1.0, 2.0];
//! let vals = [0.0, 10.0, 20.0];
//! assert!((interpolate(&xs, &vals, 1.5) - 15.0).abs() < 1e-12);
//!
//! let stats = fit_stats(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
//! assert!((stats.r2 - 1.0).abs() < 1e-12);
//! assert!(stats.rmse.abs() < 1e-12);
//! ```

use crate::Point;

/// Goodness-of-fit statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitStats {
    /// Coefficient of determination. Zero for a flat series.
    pub r2: f64,
    /// Root mean squared error.
    pub rmse: f64,
}

/// Fraction of the curve used to estimate the extrapolation slope.
const SLOPE_TAIL_FRACTION: f64 = 0.2;

/// Linearly interpolates `vals` at `x` over the ascending grid `xs`.
///
/// Outside `[xs[0], xs[last]]` the nearest end value is returned. At a
/// duplicated x the value of the last duplicate wins, which is the lower end
/// of the bracket the search settles on. Returns NaN for an empty grid or a
/// NaN `x`.
pub fn interpolate(xs: &[f64], vals: &[f64], x: f64) -> f64 {
    let n = xs.len().min(vals.len());
    if n == 0 {
        return f64::NAN;
    }
    if x <= xs[0] {
        return vals[0];
    }
    if x >= xs[n - 1] {
        return vals[n - 1];
    }

    let (mut lo, mut hi) = (0, n - 1);
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if xs[mid] <= x {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    // xs[lo] <= x < xs[hi], so the bracket never has zero width.
    let t = (x - xs[lo]) / (xs[hi] - xs[lo]);
    vals[lo] + t * (vals[hi] - vals[lo])
}

/// Recency-weighted mean slope over the tail of a curve.
///
/// # Algorithm
///
/// The window is the last `max(2, ⌈0.2·n⌉)` points. Each adjacent pair in
/// the window with a nonzero Δx contributes its slope, weighted by the
/// pair's 1-based position, so the most recent segment weighs most.
///
/// Returns 0 when there are fewer than two points or every Δx is zero.
pub fn weighted_average_slope(xs: &[f64], vals: &[f64]) -> f64 {
    let n = xs.len().min(vals.len());
    if n < 2 {
        return 0.0;
    }

    let window = ((SLOPE_TAIL_FRACTION * n as f64).ceil() as usize).clamp(2, n);
    let start = n - window;

    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    for (position, i) in (start + 1..n).enumerate() {
        let dx = xs[i] - xs[i - 1];
        if dx == 0.0 {
            continue;
        }
        let weight = (position + 1) as f64;
        weighted_sum += weight * (vals[i] - vals[i - 1]) / dx;
        weight_total += weight;
    }

    if weight_total == 0.0 {
        0.0
    } else {
        weighted_sum / weight_total
    }
}

/// Computes R² and RMSE of `fitted` against the observations `y`.
///
/// ```text
/// SS_tot = Σ(yᵢ - ȳ)²
/// SS_res = Σ(yᵢ - ŷᵢ)²
/// R²     = 1 - SS_res / SS_tot      (0 when SS_tot = 0)
/// RMSE   = √(SS_res / n)
/// ```
pub fn fit_stats(y: &[f64], fitted: &[f64]) -> FitStats {
    let n = y.len().min(fitted.len());
    if n == 0 {
        return FitStats { r2: 0.0, rmse: 0.0 };
    }
    let y = &y[..n];
    let mean = y.iter().sum::<f64>() / n as f64;

    let ss_tot: f64 = y.iter().map(|&yi| (yi - mean).powi(2)).sum();
    let ss_res: f64 = y
        .iter()
        .zip(fitted)
        .map(|(&yi, &fi)| (yi - fi).powi(2))
        .sum();

    let r2 = if ss_tot == 0.0 {
        0.0
    } else {
        1.0 - ss_res / ss_tot
    };
    FitStats {
        r2,
        rmse: (ss_res / n as f64).sqrt(),
    }
}

/// Computes R² and RMSE by evaluating `predict` at every observed x.
///
/// Observations whose prediction is not finite are left out of the residual
/// sum and of the RMSE denominator. RMSE is 0 when no prediction is finite.
pub fn prediction_stats<F>(series: &[Point], predict: F) -> FitStats
where
    F: Fn(f64) -> f64,
{
    let n = series.len();
    if n == 0 {
        return FitStats { r2: 0.0, rmse: 0.0 };
    }
    let mean = series.iter().map(|&(_, y)| y).sum::<f64>() / n as f64;

    let mut ss_tot = 0.0;
    let mut ss_res = 0.0;
    let mut counted = 0usize;
    for &(x, y) in series {
        ss_tot += (y - mean).powi(2);
        let predicted = predict(x);
        if predicted.is_finite() {
            ss_res += (y - predicted).powi(2);
            counted += 1;
        }
    }

    let r2 = if ss_tot == 0.0 {
        0.0
    } else {
        1.0 - ss_res / ss_tot
    };
    let rmse = if counted > 0 {
        (ss_res / counted as f64).sqrt()
    } else {
        0.0
    };
    FitStats { r2, rmse }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn interpolate_clamps_outside_domain() {
        let xs = [1.0, 2.0, 4.0];
        let vals = [10.0, 20.0, 40.0];
        assert_eq!(interpolate(&xs, &vals, -100.0), 10.0);
        assert_eq!(interpolate(&xs, &vals, 1.0), 10.0);
        assert_eq!(interpolate(&xs, &vals, 4.0), 40.0);
        assert_eq!(interpolate(&xs, &vals, 1e9), 40.0);
    }

    #[test]
    fn interpolate_hits_grid_points_exactly() {
        let xs = [0.0, 1.5, 3.0, 7.0, 9.0];
        let vals = [3.0, -1.0, 8.0, 2.5, 6.0];
        for (&x, &v) in xs.iter().zip(&vals) {
            assert_eq!(interpolate(&xs, &vals, x), v);
        }
    }

    #[test]
    fn interpolate_midpoint() {
        let xs = [0.0, 2.0, 4.0];
        let vals = [0.0, 4.0, 0.0];
        assert_abs_diff_eq!(interpolate(&xs, &vals, 1.0), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(interpolate(&xs, &vals, 3.0), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn interpolate_duplicate_x_resolves_to_last_duplicate() {
        let xs = [0.0, 1.0, 1.0, 2.0];
        let vals = [0.0, 5.0, 9.0, 10.0];
        assert_eq!(interpolate(&xs, &vals, 1.0), 9.0);
        assert_abs_diff_eq!(interpolate(&xs, &vals, 0.5), 2.5, epsilon = 1e-12);
        assert_abs_diff_eq!(interpolate(&xs, &vals, 1.5), 9.5, epsilon = 1e-12);
    }

    #[test]
    fn interpolate_nan_x_is_nan() {
        let xs = [0.0, 0.0, 1.0];
        let vals = [4.0, 6.0, 8.0];
        assert!(interpolate(&xs, &vals, f64::NAN).is_nan());
    }

    #[test]
    fn interpolate_empty_is_nan() {
        assert!(interpolate(&[], &[], 1.0).is_nan());
    }

    #[test]
    fn slope_of_straight_line() {
        let xs: Vec<f64> = (0..20).map(f64::from).collect();
        let vals: Vec<f64> = xs.iter().map(|x| 3.0 * x - 2.0).collect();
        assert_abs_diff_eq!(weighted_average_slope(&xs, &vals), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn slope_weights_recent_segments_more() {
        // Window for n = 5 is 2 points: only the last segment counts.
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let vals = [0.0, 1.0, 2.0, 3.0, 13.0];
        assert_abs_diff_eq!(weighted_average_slope(&xs, &vals), 10.0, epsilon = 1e-12);

        // n = 16 → window of 4 points, segments weighted 1, 2, 3.
        let xs: Vec<f64> = (0..16).map(f64::from).collect();
        let mut vals: Vec<f64> = xs.clone();
        vals[15] = vals[14] + 4.0;
        // slopes 1, 1, 4 → (1 + 2 + 12) / 6
        assert_abs_diff_eq!(weighted_average_slope(&xs, &vals), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn slope_degenerate_inputs() {
        assert_eq!(weighted_average_slope(&[], &[]), 0.0);
        assert_eq!(weighted_average_slope(&[1.0], &[5.0]), 0.0);
        assert_eq!(weighted_average_slope(&[2.0, 2.0], &[1.0, 5.0]), 0.0);
    }

    #[test]
    fn fit_stats_perfect_fit() {
        let y = [1.0, 4.0, 2.0, 8.0, 5.0];
        let s = fit_stats(&y, &y);
        assert_abs_diff_eq!(s.r2, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.rmse, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn fit_stats_flat_series_is_zero_r2() {
        let y = [5.0; 8];
        let s = fit_stats(&y, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(s.r2, 0.0);
        assert!(s.rmse > 0.0);
    }

    #[test]
    fn fit_stats_known_values() {
        let y = [1.0, 2.0, 3.0];
        let fitted = [2.0, 2.0, 2.0];
        let s = fit_stats(&y, &fitted);
        // SS_tot = 2, SS_res = 2
        assert_abs_diff_eq!(s.r2, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.rmse, (2.0_f64 / 3.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn prediction_stats_skips_non_finite() {
        let series = [(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)];
        let s = prediction_stats(&series, |x| if x == 1.0 { f64::NAN } else { x + 1.0 });
        assert_abs_diff_eq!(s.r2, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.rmse, 0.0, epsilon = 1e-12);

        let none_finite = prediction_stats(&series, |_| f64::INFINITY);
        assert_eq!(none_finite.rmse, 0.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn sorted_grid(steps: Vec<f64>) -> Vec<f64> {
        steps
            .iter()
            .scan(0.0, |acc, s| {
                *acc += s;
                Some(*acc)
            })
            .collect()
    }

    proptest! {
        #[test]
        fn interpolation_stays_within_value_range(
            data in proptest::collection::vec((0.01_f64..10.0, -1e3_f64..1e3), 2..=40),
            x in -50.0_f64..500.0,
        ) {
            let (steps, vals): (Vec<f64>, Vec<f64>) = data.into_iter().unzip();
            let xs = sorted_grid(steps);
            let v = interpolate(&xs, &vals, x);
            let lo = vals.iter().cloned().fold(f64::INFINITY, f64::min);
            let hi = vals.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(v >= lo - 1e-9 && v <= hi + 1e-9, "v = {v} outside [{lo}, {hi}]");
        }

        #[test]
        fn r2_never_exceeds_one(
            pairs in proptest::collection::vec((-1e3_f64..1e3, -1e3_f64..1e3), 2..=50),
        ) {
            let (y, fitted): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
            let s = fit_stats(&y, &fitted);
            prop_assert!(s.r2 <= 1.0 + 1e-12, "R² = {}", s.r2);
            prop_assert!(s.rmse >= 0.0);
        }
    }
}
