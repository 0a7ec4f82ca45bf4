//! # Carbon Forecaster
//!
//! Takes a user's monthly emission series (oldest to newest) and a horizon
//! in days, classifies the trend, and projects a future score. The trend
//! rule is fixed; the numeric projection sits behind [`ForecastModel`] so
//! the model can be swapped without touching classification or validation.
use thiserror::Error;

use crate::types::TrendDirection;

pub const MIN_HORIZON_DAYS: i64 = 1;
pub const MAX_HORIZON_DAYS: i64 = 365;

#[derive(Error, Debug, PartialEq)]
pub enum ForecastError {
    #[error("horizon must be between {MIN_HORIZON_DAYS} and {MAX_HORIZON_DAYS} days, got {0}")]
    InvalidHorizon(i64),
}

/// Rejected before any computation happens.
pub fn validate_horizon(days: i64) -> Result<u16, ForecastError> {
    if !(MIN_HORIZON_DAYS..=MAX_HORIZON_DAYS).contains(&days) {
        return Err(ForecastError::InvalidHorizon(days));
    }

    Ok(days as u16)
}

/// Mean of the most recent observations against the mean of everything
/// earlier. The recent window is at most 3 wide and always leaves at least
/// one earlier observation, so both windows are non-empty once there are
/// two data points.
pub fn analyze_trend(history: &[f64]) -> TrendDirection {
    if history.len() < 2 {
        return TrendDirection::InsufficientData;
    }

    let recent_len = (history.len() - 1).min(3);
    let split = history.len() - recent_len;

    let older_mean = mean(&history[..split]);
    let recent_mean = mean(&history[split..]);

    if recent_mean < 0.9 * older_mean {
        TrendDirection::Improving
    } else if recent_mean > 1.1 * older_mean {
        TrendDirection::Worsening
    } else {
        TrendDirection::Stable
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub predicted_score: f64,
    pub confidence: f64,
}

pub trait ForecastModel {
    fn project(&self, history: &[f64], horizon_days: u16) -> Projection;
}

/// Default model: least-squares slope over the monthly series, extrapolated
/// to the horizon and floored at zero. Confidence grows with history length.
pub struct DriftModel;

impl ForecastModel for DriftModel {
    fn project(&self, history: &[f64], horizon_days: u16) -> Projection {
        let n = history.len() as f64;
        let mean_x = (n - 1.0) / 2.0;
        let mean_y = mean(history);

        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for (i, y) in history.iter().enumerate() {
            let dx = i as f64 - mean_x;
            numerator += dx * (y - mean_y);
            denominator += dx * dx;
        }

        let slope = if denominator > 0.0 {
            numerator / denominator
        } else {
            0.0
        };

        let months_ahead = f64::from(horizon_days) / 30.0;
        let predicted = mean_y + slope * (n - 1.0 - mean_x + months_ahead);

        Projection {
            predicted_score: round2(predicted.max(0.0)),
            confidence: round2((0.35 + 0.05 * n).min(0.9)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastOutcome {
    pub trend: TrendDirection,
    pub projection: Option<Projection>,
}

/// Validate, classify, and project in one pass. Fewer than 2 observations
/// classify as insufficient data and produce no numeric forecast.
pub fn generate(
    history: &[f64],
    horizon_days: i64,
    model: &dyn ForecastModel,
) -> Result<ForecastOutcome, ForecastError> {
    let horizon = validate_horizon(horizon_days)?;

    if history.len() < 2 {
        return Ok(ForecastOutcome {
            trend: TrendDirection::InsufficientData,
            projection: None,
        });
    }

    Ok(ForecastOutcome {
        trend: analyze_trend(history),
        projection: Some(model.project(history, horizon)),
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const HISTORY: [f64; 5] = [30.0, 28.0, 25.0, 20.0, 18.0];

    #[test]
    fn test_horizon_bounds() {
        assert_eq!(validate_horizon(1), Ok(1));
        assert_eq!(validate_horizon(365), Ok(365));
        assert_eq!(validate_horizon(0), Err(ForecastError::InvalidHorizon(0)));
        assert_eq!(
            validate_horizon(366),
            Err(ForecastError::InvalidHorizon(366))
        );
        assert_eq!(
            validate_horizon(-30),
            Err(ForecastError::InvalidHorizon(-30))
        );
    }

    #[test]
    fn test_trend_improving() {
        assert_eq!(analyze_trend(&HISTORY), TrendDirection::Improving);
    }

    #[test]
    fn test_trend_worsening() {
        assert_eq!(
            analyze_trend(&[15.0, 18.0, 22.0, 28.0, 30.0]),
            TrendDirection::Worsening
        );
    }

    #[test]
    fn test_trend_stable() {
        assert_eq!(
            analyze_trend(&[20.0, 21.0, 20.0, 19.5, 20.5]),
            TrendDirection::Stable
        );
    }

    #[test]
    fn test_trend_insufficient_data() {
        assert_eq!(analyze_trend(&[20.0]), TrendDirection::InsufficientData);
        assert_eq!(analyze_trend(&[]), TrendDirection::InsufficientData);
    }

    #[test]
    fn test_trend_with_two_points() {
        assert_eq!(analyze_trend(&[30.0, 20.0]), TrendDirection::Improving);
        assert_eq!(analyze_trend(&[20.0, 30.0]), TrendDirection::Worsening);
    }

    #[test]
    fn test_generate_rejects_bad_horizon_first() {
        let result = generate(&HISTORY, 0, &DriftModel);

        assert_eq!(result, Err(ForecastError::InvalidHorizon(0)));
    }

    #[test]
    fn test_generate_short_history_has_no_projection() {
        let outcome = generate(&[20.0], 30, &DriftModel).unwrap();

        assert_eq!(outcome.trend, TrendDirection::InsufficientData);
        assert!(outcome.projection.is_none());
    }

    #[test]
    fn test_drift_model_follows_the_trend() {
        let outcome = generate(&HISTORY, 30, &DriftModel).unwrap();
        let projection = outcome.projection.unwrap();

        // Falling series keeps falling.
        assert!(projection.predicted_score < 18.0);
        assert!(projection.predicted_score >= 0.0);
        assert_eq!(projection.confidence, 0.6);
    }

    #[test]
    fn test_drift_model_floors_at_zero() {
        let outcome = generate(&HISTORY, 365, &DriftModel).unwrap();

        assert_eq!(outcome.projection.unwrap().predicted_score, 0.0);
    }

    #[test]
    fn test_flat_series_projects_itself() {
        let outcome = generate(&[20.0, 20.0, 20.0, 20.0], 90, &DriftModel).unwrap();

        assert_eq!(outcome.trend, TrendDirection::Stable);
        assert_eq!(outcome.projection.unwrap().predicted_score, 20.0);
    }
}
