//! # Redis
//!
//! RAM database for everything mutable per request.
//!
//! ## Requirements
//!
//! - One hash per product for ratings, field is the type id, value the score
//! - Resubmitting a (product, type) pair overwrites the previous value
//! - Forecasts keyed by a counter so actuals can find their record later
//! - Small dataset, catalog on the order of thousands of products
//!
//! ## Implementation
//!
//! - `ratings:{product_id}` hash: type id → value, HVALS feeds the mean
//! - `forecasts` hash: id → JSON blob, rewritten in place when actuals land
//! - `forecast_seq` counter: atomic INCR hands out forecast ids
use std::{collections::HashMap, time::Duration};

use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};

use eco::{
    score::product_score,
    types::{CarbonForecast, SustainabilityRating},
};
use ledger::remote::RemoteLedger;

use crate::error::AppError;

pub const RATINGS_PREFIX: &str = "ratings:";
pub const FORECASTS_KEY: &str = "forecasts";
pub const FORECAST_SEQ_KEY: &str = "forecast_seq";

pub async fn init_redis(
    redis_url: &str,
    remote_ledger: &RemoteLedger,
) -> (ConnectionManager, HashMap<u32, f64>) {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url).unwrap();
    let mut connection_manager = client
        .get_connection_manager_with_config(config)
        .await
        .unwrap();

    let product_scores = load_product_scores(&mut connection_manager, remote_ledger)
        .await
        .unwrap();

    (connection_manager, product_scores)
}

/// Current aggregate score of every rated product, for seeding the search
/// index. Products without ratings stay absent.
async fn load_product_scores(
    connection: &mut ConnectionManager,
    remote_ledger: &RemoteLedger,
) -> Result<HashMap<u32, f64>, AppError> {
    let mut scores = HashMap::new();

    for product in remote_ledger.ledger.products.values() {
        let values = get_rating_values(connection, product.id).await?;

        if let Some(score) = product_score(&values) {
            scores.insert(product.id, score);
        }
    }

    Ok(scores)
}

fn ratings_key(product_id: u32) -> String {
    format!("{RATINGS_PREFIX}{product_id}")
}

pub async fn put_ratings(
    connection: &mut ConnectionManager,
    ratings: &[SustainabilityRating],
) -> Result<(), AppError> {
    for rating in ratings {
        connection
            .hset::<_, _, _, ()>(ratings_key(rating.product_id), rating.type_id, rating.value)
            .await?;
    }

    Ok(())
}

pub async fn get_rating_values(
    connection: &mut ConnectionManager,
    product_id: u32,
) -> Result<Vec<f64>, AppError> {
    let values: Vec<f64> = connection.hvals(ratings_key(product_id)).await?;

    Ok(values)
}

pub async fn next_forecast_id(connection: &mut ConnectionManager) -> Result<u64, AppError> {
    let id: u64 = connection.incr(FORECAST_SEQ_KEY, 1).await?;

    Ok(id)
}

pub async fn put_forecast(
    connection: &mut ConnectionManager,
    forecast: &CarbonForecast,
) -> Result<(), AppError> {
    let json = serde_json::to_string(forecast)?;

    connection
        .hset::<_, _, _, ()>(FORECASTS_KEY, forecast.id, json)
        .await?;

    Ok(())
}

pub async fn get_forecast(
    connection: &mut ConnectionManager,
    id: u64,
) -> Result<Option<CarbonForecast>, AppError> {
    let json: Option<String> = connection.hget(FORECASTS_KEY, id).await?;

    match json {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}
