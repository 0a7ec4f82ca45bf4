use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use eco::{
    accuracy::record_actual,
    forecast::{DriftModel, generate},
    rating::{FieldReport, MatchedRating, map_fields},
    score::{UserActivity, product_score, user_score},
    types::{CarbonForecast, SustainabilityRating},
};

use crate::{
    database::{get_forecast, get_rating_values, next_forecast_id, put_forecast, put_ratings},
    error::AppError,
    search::{MeiliProduct, PRODUCT_INDEX, PRODUCT_RETAILER, sync_product_score},
    state::State as AppState,
    utils::{get_fields, get_product, get_user_history},
};

const SCORE_SORT: [&str; 1] = ["eco_score:desc"];

#[derive(Deserialize)]
pub struct RatingSubmission {
    pub fields: Map<String, Value>,
}

#[derive(Serialize)]
pub struct RatingResponse {
    pub product_id: u32,
    pub matched: Vec<MatchedRating>,
    pub report: Vec<FieldReport>,
    pub unmatched: usize,
    pub score: Option<f64>,
}

pub async fn submit_ratings_handler(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<u32>,
    Json(payload): Json<RatingSubmission>,
) -> Result<Json<RatingResponse>, AppError> {
    let (name, product) = get_product(&state, product_id)?;
    let fields = get_fields(&payload.fields)?;

    let mapped = map_fields(
        fields.iter().map(|(name, value)| (name.as_str(), *value)),
        &state.registry,
    );

    let mut connection = state.redis_connection.clone();

    if !mapped.matched.is_empty() {
        let ratings: Vec<SustainabilityRating> = mapped
            .matched
            .iter()
            .map(|pair| SustainabilityRating {
                product_id,
                type_id: pair.type_id,
                value: pair.value,
            })
            .collect();

        put_ratings(&mut connection, &ratings).await?;
    }

    let values = get_rating_values(&mut connection, product_id).await?;
    let score = product_score(&values);

    if !mapped.matched.is_empty() {
        sync_product_score(
            state.meili_client.clone(),
            MeiliProduct {
                id: product_id,
                name: name.to_string(),
                retailer: product.retailer.clone(),
                eco_score: score,
            },
        )
        .await?;
    }

    info!(
        "Rated product {product_id}: {} matched, {} unmatched",
        mapped.matched.len(),
        mapped.unmatched
    );

    Ok(Json(RatingResponse {
        product_id,
        matched: mapped.matched,
        report: mapped.report,
        unmatched: mapped.unmatched,
        score,
    }))
}

#[derive(Serialize)]
pub struct ScoreResponse {
    pub product_id: u32,
    pub score: Option<f64>,
}

pub async fn product_score_handler(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<u32>,
) -> Result<Json<ScoreResponse>, AppError> {
    get_product(&state, product_id)?;

    let mut connection = state.redis_connection.clone();
    let values = get_rating_values(&mut connection, product_id).await?;

    Ok(Json(ScoreResponse {
        product_id,
        score: product_score(&values),
    }))
}

#[derive(Serialize)]
pub struct UserScoreResponse {
    pub user_id: String,
    pub score: f64,
    pub monthly_emissions: f64,
    pub sustainable_purchases: u32,
}

pub async fn user_score_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserScoreResponse>, AppError> {
    let series = get_user_history(&state, &user_id)?;

    let activity = UserActivity {
        monthly_emissions: series.monthly_totals.last().copied().unwrap_or(0.0),
        sustainable_purchases: series.sustainable_purchases,
    };

    Ok(Json(UserScoreResponse {
        user_id,
        score: user_score(&activity),
        monthly_emissions: activity.monthly_emissions,
        sustainable_purchases: activity.sustainable_purchases,
    }))
}

#[derive(Deserialize)]
pub struct ForecastRequest {
    pub horizon_days: i64,
}

pub async fn forecast_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(payload): Json<ForecastRequest>,
) -> Result<Json<CarbonForecast>, AppError> {
    let series = get_user_history(&state, &user_id)?;

    let outcome = generate(&series.monthly_totals, payload.horizon_days, &DriftModel)?;

    let mut connection = state.redis_connection.clone();
    let id = next_forecast_id(&mut connection).await?;

    let forecast = CarbonForecast {
        id,
        user_id,
        horizon_days: payload.horizon_days as u16,
        predicted_score: outcome.projection.map(|p| p.predicted_score),
        confidence: outcome.projection.map(|p| p.confidence),
        trend_direction: outcome.trend,
        actual_score: None,
        accuracy: None,
    };

    put_forecast(&mut connection, &forecast).await?;

    info!(
        "Forecast {id} for {}: {:?} over {} days",
        forecast.user_id, forecast.trend_direction, forecast.horizon_days
    );

    Ok(Json(forecast))
}

#[derive(Deserialize)]
pub struct ActualSubmission {
    pub actual_score: f64,
}

pub async fn record_actual_handler(
    State(state): State<Arc<AppState>>,
    Path(forecast_id): Path<u64>,
    Json(payload): Json<ActualSubmission>,
) -> Result<Json<CarbonForecast>, AppError> {
    let mut connection = state.redis_connection.clone();

    let mut forecast = get_forecast(&mut connection, forecast_id)
        .await?
        .ok_or(AppError::NotFound("forecast"))?;

    record_actual(&mut forecast, payload.actual_score)?;

    put_forecast(&mut connection, &forecast).await?;

    Ok(Json(forecast))
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub retailer: Option<String>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub hits: Vec<MeiliProduct>,
}

pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let index = state.meili_client.index(PRODUCT_INDEX);

    let mut search = index.search();
    search.with_query(&params.q);
    search.with_sort(&SCORE_SORT);

    let filter = params
        .retailer
        .map(|retailer| format!("{PRODUCT_RETAILER} = \"{retailer}\""));
    if let Some(filter) = &filter {
        search.with_filter(filter);
    }

    let results = search.execute::<MeiliProduct>().await?;

    Ok(Json(SearchResponse {
        hits: results.hits.into_iter().map(|hit| hit.result).collect(),
    }))
}
