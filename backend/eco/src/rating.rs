//! # Rating Mapper
//!
//! Incoming rating payloads carry free-form field names. Each field is
//! normalized, looked up against the type registry, and reported back with
//! an explicit outcome. Nothing is silently dropped: callers always see the
//! original field name next to what happened to it, and "present but
//! unmatched" is a different state from "absent" or "present but null".
use regex::Regex;
use serde::Serialize;

use crate::types::TypeRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FieldOutcome {
    /// Recognized name, value present and in [0, 100].
    Matched { type_id: u32, value: f64 },
    /// Present with a value, but no active type carries this name.
    Unrecognized,
    /// Present but null; never looked up.
    Empty,
    /// Recognized name, but the value falls outside [0, 100].
    OutOfRange,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldReport {
    pub field: String,
    #[serde(flatten)]
    pub outcome: FieldOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchedRating {
    pub type_id: u32,
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct MappedRatings {
    pub matched: Vec<MatchedRating>,
    pub report: Vec<FieldReport>,
    pub unmatched: usize,
}

pub fn map_fields<'a, I>(fields: I, registry: &TypeRegistry) -> MappedRatings
where
    I: IntoIterator<Item = (&'a str, Option<f64>)>,
{
    let mut matched = Vec::new();
    let mut report = Vec::new();
    let mut unmatched = 0;

    for (field, value) in fields {
        let outcome = match (value, registry.lookup(&normalize(field))) {
            (None, _) => FieldOutcome::Empty,
            (Some(_), None) => {
                unmatched += 1;
                FieldOutcome::Unrecognized
            }
            (Some(value), Some(matched_type)) => {
                if (0.0..=100.0).contains(&value) {
                    matched.push(MatchedRating {
                        type_id: matched_type.id,
                        value,
                    });
                    FieldOutcome::Matched {
                        type_id: matched_type.id,
                        value,
                    }
                } else {
                    FieldOutcome::OutOfRange
                }
            }
        };

        report.push(FieldReport {
            field: field.to_string(),
            outcome,
        });
    }

    MappedRatings {
        matched,
        report,
        unmatched,
    }
}

/// Collapse a free-form field name onto the registry's snake_case keys.
pub fn normalize(input: &str) -> String {
    let collapse = Regex::new(r"[^a-z0-9]+").unwrap();

    let lowered = input.to_lowercase();

    collapse
        .replace_all(&lowered, "_")
        .trim_matches('_')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize("energy_efficiency"), "energy_efficiency");
        assert_eq!(normalize("Energy Efficiency"), "energy_efficiency");
        assert_eq!(normalize("Carbon-Footprint"), "carbon_footprint");
    }

    #[test]
    fn test_normalize_leading_trailing() {
        assert_eq!(normalize("  water usage  "), "water_usage");
        assert_eq!(normalize("__packaging__waste__"), "packaging_waste");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("!@#$"), "");
    }

    #[test]
    fn test_matched_and_unrecognized() {
        let registry = TypeRegistry::defaults();
        let fields = [
            ("energy_efficiency", Some(70.0)),
            ("bogus_field", Some(5.0)),
        ];

        let mapped = map_fields(fields, &registry);

        assert_eq!(mapped.matched.len(), 1);
        assert_eq!(mapped.matched[0].type_id, 1);
        assert_eq!(mapped.matched[0].value, 70.0);
        assert_eq!(mapped.unmatched, 1);
        assert_eq!(mapped.report.len(), 2);
        assert_eq!(mapped.report[0].outcome, FieldOutcome::Matched {
            type_id: 1,
            value: 70.0
        });
        assert_eq!(mapped.report[1].field, "bogus_field");
        assert_eq!(mapped.report[1].outcome, FieldOutcome::Unrecognized);
    }

    #[test]
    fn test_null_field_is_empty_not_unmatched() {
        let registry = TypeRegistry::defaults();
        let fields = [("recyclability", None), ("nonsense", None)];

        let mapped = map_fields(fields, &registry);

        assert!(mapped.matched.is_empty());
        assert_eq!(mapped.unmatched, 0);
        assert_eq!(mapped.report[0].outcome, FieldOutcome::Empty);
        assert_eq!(mapped.report[1].outcome, FieldOutcome::Empty);
    }

    #[test]
    fn test_out_of_range_is_not_persisted() {
        let registry = TypeRegistry::defaults();
        let fields = [
            ("water_usage", Some(101.0)),
            ("carbon_footprint", Some(-3.0)),
        ];

        let mapped = map_fields(fields, &registry);

        assert!(mapped.matched.is_empty());
        assert_eq!(mapped.unmatched, 0);
        assert_eq!(mapped.report[0].outcome, FieldOutcome::OutOfRange);
        assert_eq!(mapped.report[1].outcome, FieldOutcome::OutOfRange);
    }

    #[test]
    fn test_boundary_values_match() {
        let registry = TypeRegistry::defaults();
        let fields = [("recyclability", Some(0.0)), ("water_usage", Some(100.0))];

        let mapped = map_fields(fields, &registry);

        assert_eq!(mapped.matched.len(), 2);
    }
}
