//! Goodness-of-fit metrics shared by the fitter and the model validator.
//!
//! R² is defined as `1 − SS_res/SS_tot`, clamped to `[0, 1]`: pathological
//! constant-yield data (zero total sum of squares) floors at 0 rather than
//! going negative or dividing by zero, so every reported coefficient of
//! determination is a valid quality fraction.

use crate::utils::mean;

/// Coefficient of determination, clamped to `[0, 1]`.
pub fn r_squared(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return 0.0;
    }
    let mean_actual = mean(&actual[..n]);
    let ss_tot: f64 = actual[..n].iter().map(|y| (y - mean_actual).powi(2)).sum();
    if ss_tot <= f64::EPSILON {
        return 0.0;
    }
    let ss_res: f64 = actual[..n]
        .iter()
        .zip(&predicted[..n])
        .map(|(y, y_hat)| (y - y_hat).powi(2))
        .sum();
    (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
}

/// Mean squared error. Returns 0.0 for empty input.
pub fn mse(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return 0.0;
    }
    actual[..n]
        .iter()
        .zip(&predicted[..n])
        .map(|(y, y_hat)| (y - y_hat).powi(2))
        .sum::<f64>()
        / n as f64
}

/// Root mean squared error.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> f64 {
    mse(actual, predicted).sqrt()
}

/// Mean absolute error. Returns 0.0 for empty input.
pub fn mae(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return 0.0;
    }
    actual[..n]
        .iter()
        .zip(&predicted[..n])
        .map(|(y, y_hat)| (y - y_hat).abs())
        .sum::<f64>()
        / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_predictions_score_one_and_zero_error() {
        let y = [1.0_f64, 2.0, 3.0, 4.0];
        assert!((r_squared(&y, &y) - 1.0).abs() < 1e-12);
        assert_eq!(rmse(&y, &y), 0.0);
        assert_eq!(mae(&y, &y), 0.0);
    }

    #[test]
    fn constant_actuals_floor_r_squared_at_zero() {
        // SS_tot is zero: R² must floor at 0 instead of dividing by zero.
        let actual = [5.0_f64, 5.0, 5.0];
        let predicted = [4.0_f64, 5.0, 6.0];
        assert_eq!(r_squared(&actual, &predicted), 0.0);
    }

    #[test]
    fn worse_than_mean_predictions_clamp_at_zero() {
        let actual = [1.0_f64, 2.0, 3.0];
        let predicted = [30.0_f64, -20.0, 50.0];
        assert_eq!(r_squared(&actual, &predicted), 0.0);
    }

    #[test]
    fn error_metrics_match_hand_computation() {
        let actual = [1.0_f64, 2.0, 3.0];
        let predicted = [2.0_f64, 2.0, 1.0];
        // Squared errors: 1, 0, 4 → MSE 5/3; abs errors: 1, 0, 2 → MAE 1.
        assert!((mse(&actual, &predicted) - 5.0 / 3.0).abs() < 1e-12);
        assert!((rmse(&actual, &predicted) - (5.0_f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!((mae(&actual, &predicted) - 1.0).abs() < 1e-12);
    }
}
