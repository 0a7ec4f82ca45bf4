//! # Aggregate Scorer
//!
//! Two aggregates: a product's score over its per-category ratings, and a
//! user's score over their emission and purchase history. A product with no
//! ratings has no score at all, never a zero.
use serde::{Deserialize, Serialize};

/// Arithmetic mean of all rating values, one decimal.
pub fn product_score(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;

    Some(round1(mean))
}

/// What the user score is computed from: the latest monthly emission total
/// (kg CO2e) and how many sustainable purchases they have made.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UserActivity {
    pub monthly_emissions: f64,
    pub sustainable_purchases: u32,
}

/// Emission component is worth up to 50 points around the 20 kg reference
/// point, purchase component up to 50 points at 5 points per purchase,
/// total clamped to [0, 100].
pub fn user_score(activity: &UserActivity) -> f64 {
    let emission_component = (50.0 - (activity.monthly_emissions - 20.0) * 2.0).max(0.0);
    let purchase_component = (f64::from(activity.sustainable_purchases) * 5.0).min(50.0);

    round1((emission_component + purchase_component).clamp(0.0, 100.0))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_score_mean() {
        assert_eq!(product_score(&[70.0, 80.0, 90.0]), Some(80.0));
        assert_eq!(product_score(&[70.0, 75.0]), Some(72.5));
    }

    #[test]
    fn test_product_score_rounds_to_one_decimal() {
        assert_eq!(product_score(&[70.0, 80.0, 85.0]), Some(78.3));
    }

    #[test]
    fn test_no_ratings_means_no_score() {
        assert_eq!(product_score(&[]), None);
    }

    #[test]
    fn test_user_score_clamps_high() {
        let activity = UserActivity {
            monthly_emissions: 15.0,
            sustainable_purchases: 8,
        };

        assert_eq!(user_score(&activity), 100.0);
    }

    #[test]
    fn test_user_score_floors_at_zero() {
        let activity = UserActivity {
            monthly_emissions: 50.0,
            sustainable_purchases: 0,
        };

        assert_eq!(user_score(&activity), 0.0);
    }

    #[test]
    fn test_user_score_reference_point() {
        let activity = UserActivity {
            monthly_emissions: 20.0,
            sustainable_purchases: 0,
        };

        assert_eq!(user_score(&activity), 50.0);
    }

    #[test]
    fn test_purchase_component_caps_at_fifty() {
        let low = UserActivity {
            monthly_emissions: 45.0,
            sustainable_purchases: 10,
        };
        let high = UserActivity {
            monthly_emissions: 45.0,
            sustainable_purchases: 40,
        };

        assert_eq!(user_score(&low), user_score(&high));
    }
}
