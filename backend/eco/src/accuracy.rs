//! # Accuracy Tracker
//!
//! Once the horizon of a forecast has passed, the observed actual comes in
//! and gets scored against the prediction. The result lands back on the
//! originating forecast; a later submission for the same forecast simply
//! overwrites it.
use thiserror::Error;

use crate::types::CarbonForecast;

#[derive(Error, Debug, PartialEq)]
pub enum AccuracyError {
    #[error("forecast {0} has no numeric prediction to score against")]
    NoPrediction(u64),
}

/// Percentage closeness of predicted to actual, two decimals, always in
/// [0, 100]. A zero prediction is an explicit special case so this never
/// divides by zero.
pub fn calculate_accuracy(predicted: f64, actual: f64) -> f64 {
    if predicted == 0.0 {
        return if actual == 0.0 { 100.0 } else { 0.0 };
    }

    let pct = 100.0 - (predicted - actual).abs() / predicted.abs() * 100.0;

    round2(pct.clamp(0.0, 100.0))
}

/// Write the observed actual and its accuracy onto the forecast.
pub fn record_actual(forecast: &mut CarbonForecast, actual: f64) -> Result<f64, AccuracyError> {
    let predicted = forecast
        .predicted_score
        .ok_or(AccuracyError::NoPrediction(forecast.id))?;

    let accuracy = calculate_accuracy(predicted, actual);

    forecast.actual_score = Some(actual);
    forecast.accuracy = Some(accuracy);

    Ok(accuracy)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrendDirection;

    fn forecast(predicted: Option<f64>) -> CarbonForecast {
        CarbonForecast {
            id: 7,
            user_id: "u-42".to_string(),
            horizon_days: 30,
            predicted_score: predicted,
            confidence: predicted.map(|_| 0.6),
            trend_direction: TrendDirection::Stable,
            actual_score: None,
            accuracy: None,
        }
    }

    #[test]
    fn test_exact_prediction() {
        assert_eq!(calculate_accuracy(25.0, 25.0), 100.0);
    }

    #[test]
    fn test_partial_accuracy() {
        assert_eq!(calculate_accuracy(25.0, 20.0), 80.0);
    }

    #[test]
    fn test_zero_prediction_special_case() {
        assert_eq!(calculate_accuracy(0.0, 0.0), 100.0);
        assert_eq!(calculate_accuracy(0.0, 10.0), 0.0);
    }

    #[test]
    fn test_far_miss_floors_at_zero() {
        assert_eq!(calculate_accuracy(10.0, 50.0), 0.0);
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        assert_eq!(calculate_accuracy(3.0, 2.0), 66.67);
    }

    #[test]
    fn test_record_actual_writes_back() {
        let mut forecast = forecast(Some(25.0));

        let accuracy = record_actual(&mut forecast, 20.0).unwrap();

        assert_eq!(accuracy, 80.0);
        assert_eq!(forecast.actual_score, Some(20.0));
        assert_eq!(forecast.accuracy, Some(80.0));
    }

    #[test]
    fn test_record_actual_overwrites_on_resubmission() {
        let mut forecast = forecast(Some(25.0));

        record_actual(&mut forecast, 20.0).unwrap();
        record_actual(&mut forecast, 25.0).unwrap();

        assert_eq!(forecast.actual_score, Some(25.0));
        assert_eq!(forecast.accuracy, Some(100.0));
    }

    #[test]
    fn test_record_actual_without_prediction() {
        let mut forecast = forecast(None);

        assert_eq!(
            record_actual(&mut forecast, 20.0),
            Err(AccuracyError::NoPrediction(7))
        );
        assert_eq!(forecast.actual_score, None);
    }
}
