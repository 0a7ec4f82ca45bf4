use serde_json::{Map, Value};

use ledger::snapshot::{EmissionSeries, Product};

use crate::{error::AppError, state::State};

/// Pull (name, value) pairs out of the raw fields object, keeping
/// submission order. Null stays as an explicit "present but empty" marker;
/// anything that is neither null nor numeric is a malformed payload.
pub fn get_fields(fields: &Map<String, Value>) -> Result<Vec<(String, Option<f64>)>, AppError> {
    if fields.is_empty() {
        return Err(AppError::Validation(
            "no rating fields submitted".to_string(),
        ));
    }

    fields
        .iter()
        .map(|(name, value)| match value {
            Value::Null => Ok((name.clone(), None)),
            Value::Number(number) => number
                .as_f64()
                .map(|value| (name.clone(), Some(value)))
                .ok_or(AppError::MalformedPayload),
            _ => Err(AppError::MalformedPayload),
        })
        .collect()
}

pub fn get_product<'a>(
    state: &'a State,
    product_id: u32,
) -> Result<(&'a str, &'a Product), AppError> {
    let name = state
        .remote_ledger
        .product_id_to_name
        .get(product_id as usize)
        .filter(|name| !name.is_empty())
        .ok_or(AppError::NotFound("product"))?;

    let product = state
        .remote_ledger
        .ledger
        .products
        .get(name)
        .ok_or(AppError::NotFound("product"))?;

    Ok((name, product))
}

pub fn get_user_history<'a>(
    state: &'a State,
    user_id: &str,
) -> Result<&'a EmissionSeries, AppError> {
    state
        .remote_ledger
        .ledger
        .emissions
        .get(user_id)
        .ok_or(AppError::NotFound("user"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_numbers_and_nulls_pass() {
        let map = fields(json!({"energy_efficiency": 70.0, "recyclability": null}));

        let parsed = get_fields(&map).unwrap();

        assert_eq!(parsed[0], ("energy_efficiency".to_string(), Some(70.0)));
        assert_eq!(parsed[1], ("recyclability".to_string(), None));
    }

    #[test]
    fn test_empty_object_is_rejected() {
        let map = fields(json!({}));

        assert!(matches!(
            get_fields(&map),
            Err(AppError::Validation { .. })
        ));
    }

    #[test]
    fn test_non_numeric_value_is_malformed() {
        let map = fields(json!({"energy_efficiency": "high"}));

        assert!(matches!(
            get_fields(&map),
            Err(AppError::MalformedPayload)
        ));
    }
}
