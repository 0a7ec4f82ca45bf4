use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::rating::normalize;

/// A named category of environmental impact. Reference data, created at
/// setup time and rarely mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SustainabilityType {
    pub id: u32,
    pub type_name: String,
    pub importance_level: u32,
    pub is_active: bool,
}

/// One score linking a product to a sustainability type. Value is always
/// in [0, 100]; the rating mapper enforces that before one of these exists.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SustainabilityRating {
    pub product_id: u32,
    pub type_id: u32,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Worsening,
    Stable,
    InsufficientData,
}

/// A predicted future emissions score for a user over a horizon.
///
/// `predicted_score` and `confidence` are `None` when the user's history was
/// too short to project. `actual_score` and `accuracy` stay `None` until an
/// observed actual arrives; resubmitting an actual overwrites both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarbonForecast {
    pub id: u64,
    pub user_id: String,
    pub horizon_days: u16,
    pub predicted_score: Option<f64>,
    pub confidence: Option<f64>,
    pub trend_direction: TrendDirection,
    pub actual_score: Option<f64>,
    pub accuracy: Option<f64>,
}

/// Lookup table from normalized field name to sustainability type.
pub struct TypeRegistry {
    by_name: HashMap<String, SustainabilityType>,
}

impl TypeRegistry {
    pub fn new(types: impl IntoIterator<Item = SustainabilityType>) -> Self {
        let by_name = types
            .into_iter()
            .map(|t| (normalize(&t.type_name), t))
            .collect();

        Self { by_name }
    }

    pub fn defaults() -> Self {
        Self::new(default_types())
    }

    /// Only active types participate in matching; an inactive type reads the
    /// same as an unknown name to callers.
    pub fn lookup(&self, normalized_name: &str) -> Option<&SustainabilityType> {
        self.by_name
            .get(normalized_name)
            .filter(|t| t.is_active)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// The fixed set of recognized rating categories, used to seed the ledger.
pub fn default_types() -> Vec<SustainabilityType> {
    [
        (1, "energy_efficiency", 5),
        (2, "carbon_footprint", 5),
        (3, "recyclability", 4),
        (4, "renewable_materials", 4),
        (5, "water_usage", 3),
        (6, "packaging_waste", 3),
    ]
    .into_iter()
    .map(|(id, type_name, importance_level)| SustainabilityType {
        id,
        type_name: type_name.to_string(),
        importance_level,
        is_active: true,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = TypeRegistry::defaults();

        assert!(registry.lookup(&normalize("Energy Efficiency")).is_some());
        assert!(registry.lookup(&normalize("CARBON_FOOTPRINT")).is_some());
        assert!(registry.lookup(&normalize("bogus_field")).is_none());
    }

    #[test]
    fn test_inactive_types_do_not_match() {
        let mut types = default_types();
        types[0].is_active = false;
        let registry = TypeRegistry::new(types);

        assert!(registry.lookup("energy_efficiency").is_none());
        assert!(registry.lookup("recyclability").is_some());
    }
}
