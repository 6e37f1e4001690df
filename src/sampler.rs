//! Evenly spaced prediction sampling for rendering.
//!
//! # Examples
//!
//! ```
//! use u_trend::sampler::generate_prediction_points;
//!
//! let points = generate_prediction_points(|x| x * 2.0, 0.0, 100.0, 50.0, 50);
//! assert_eq!(points.len(), 50);
//! assert_eq!(points[0], (0.0, 0.0));
//! assert!((points[49].0 - 150.0).abs() < 1e-9);
//! ```

use crate::Point;

/// Default number of samples requested by renderers.
pub const DEFAULT_PREDICTION_POINTS: usize = 200;

/// Samples `predict` at `num_points` evenly spaced x values spanning
/// `[start_x, last_x + horizon]` inclusive.
///
/// Samples whose prediction is not finite are dropped, so the output may be
/// shorter than requested. A single requested point is taken at `start_x`.
pub fn generate_prediction_points<F>(
    predict: F,
    start_x: f64,
    last_x: f64,
    horizon: f64,
    num_points: usize,
) -> Vec<Point>
where
    F: Fn(f64) -> f64,
{
    if num_points == 0 {
        return Vec::new();
    }
    let end_x = last_x + horizon;
    let step = if num_points > 1 {
        (end_x - start_x) / (num_points - 1) as f64
    } else {
        0.0
    };

    (0..num_points)
        .map(|i| start_x + step * i as f64)
        .filter_map(|x| {
            let y = predict(x);
            y.is_finite().then_some((x, y))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn spans_requested_range() {
        let points = generate_prediction_points(|x| x * 2.0, 0.0, 100.0, 50.0, 50);
        assert_eq!(points.len(), 50);
        assert_abs_diff_eq!(points[0].0, 0.0);
        assert_abs_diff_eq!(points[49].0, 150.0, epsilon = 1e-9);
        for w in points.windows(2) {
            assert_abs_diff_eq!(w[1].0 - w[0].0, 150.0 / 49.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn drops_non_finite_predictions() {
        let points =
            generate_prediction_points(|x| if x == 0.0 { f64::INFINITY } else { x }, 0.0, 10.0, 5.0, 10);
        assert_eq!(points.len(), 9);
        assert!(points.iter().all(|&(_, y)| y.is_finite()));

        let none = generate_prediction_points(|_| f64::NAN, 0.0, 10.0, 5.0, 10);
        assert!(none.is_empty());
    }

    #[test]
    fn degenerate_counts() {
        assert!(generate_prediction_points(|x| x, 0.0, 1.0, 1.0, 0).is_empty());
        assert_eq!(
            generate_prediction_points(|x| x + 1.0, 3.0, 10.0, 1.0, 1),
            vec![(3.0, 4.0)]
        );
    }

    #[test]
    fn samples_a_fit_result() {
        use crate::config::{Family, FitConfig};
        use crate::engine::fit_trend;

        let series: Vec<Point> = (0..20).map(|i| (i as f64, 3.0 * i as f64 + 5.0)).collect();
        let fit = fit_trend(&series, &FitConfig::new(Family::Holts)).unwrap();
        let points = generate_prediction_points(|x| fit.predict(x), 0.0, 19.0, 10.0, DEFAULT_PREDICTION_POINTS);
        assert_eq!(points.len(), DEFAULT_PREDICTION_POINTS);
        assert!(points.last().unwrap().1 > points[0].1);
    }
}
