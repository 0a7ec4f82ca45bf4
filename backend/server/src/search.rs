//! # Meilisearch
//!
//! Search engine serving the product catalog by proxy.
//!
//!
//!
//! ## Schema
//! - One index for all products
//! - Fields: name (**string**), retailer (**string**), eco_score (**float**,
//!   absent until the product has ratings)
//!
//!
//!
//! ## Score Sync
//! - The catalog and the scores of already-rated products are pushed at
//!   startup from the ledger and Redis
//! - After every rating submission, the affected product's document is
//!   re-upserted with its new aggregate score
//! - Queries can sort on eco_score so the greenest products surface first
//!
//!
//!
//! ## Proxy
//! Meilisearch is never exposed directly. Search queries go through the
//! backend, which holds the admin key, and both run on the same machine so
//! the extra hop stays magnitudes smaller than the user round trip.
use std::{collections::HashMap, sync::Arc};

use meilisearch_sdk::{
    client::Client,
    settings::{MinWordSizeForTypos, Settings, TypoToleranceSettings},
};
use serde::{Deserialize, Serialize};

use ledger::snapshot::Product;

use crate::error::AppError;

pub const PRODUCT_INDEX: &str = "products";
pub const PRODUCT_ID: &str = "id";
pub const PRODUCT_NAME: &str = "name";
pub const PRODUCT_RETAILER: &str = "retailer";
pub const PRODUCT_SCORE: &str = "eco_score";

#[derive(Serialize, Deserialize)]
pub struct MeiliProduct {
    pub id: u32,
    pub name: String,
    pub retailer: String,
    pub eco_score: Option<f64>,
}

pub async fn init_meilisearch(
    meili_url: &str,
    meili_admin_key: &str,
    products_map: &HashMap<String, Product>,
    product_scores: &HashMap<u32, f64>,
) -> Arc<Client> {
    let meili_client = Arc::new(Client::new(meili_url, Some(meili_admin_key)).unwrap());

    upsert_products(meili_client.clone(), products_map, product_scores).await;

    meili_client
}

pub async fn upsert_products(
    meili_client: Arc<Client>,
    products_map: &HashMap<String, Product>,
    product_scores: &HashMap<u32, f64>,
) {
    let meili_products: Vec<MeiliProduct> = products_map
        .iter()
        .map(|(name, product)| MeiliProduct {
            id: product.id,
            name: name.clone(),
            retailer: product.retailer.clone(),
            eco_score: product_scores.get(&product.id).copied(),
        })
        .collect();

    meili_client
        .index(PRODUCT_INDEX)
        .set_settings(&init_settings())
        .await
        .unwrap();

    upsert_items(
        meili_client.clone(),
        PRODUCT_INDEX,
        &meili_products,
        PRODUCT_ID,
    )
    .await;
}

/// Push one product's fresh aggregate score. Fire and forget from the
/// request path, no waiting on the index task.
pub async fn sync_product_score(
    meili_client: Arc<Client>,
    product: MeiliProduct,
) -> Result<(), AppError> {
    meili_client
        .index(PRODUCT_INDEX)
        .add_or_update(&[product], Some(PRODUCT_ID))
        .await?;

    Ok(())
}

async fn upsert_items<T>(meili_client: Arc<Client>, index_name: &str, items: &[T], id_name: &str)
where
    T: Serialize + Send + Sync,
{
    let _result = meili_client
        .index(index_name)
        .add_or_update(items, Some(id_name))
        .await
        .unwrap()
        .wait_for_completion(&meili_client, None, None)
        .await
        .unwrap();

    #[cfg(feature = "verbose")]
    println!("Meili task result: {:?}", _result);
}

fn init_settings() -> Settings {
    Settings::new()
        .with_ranking_rules([
            "words",
            "typo",
            "proximity",
            "exactness",
            "attribute",
            "sort",
        ])
        .with_distinct_attribute(Some(PRODUCT_NAME))
        .with_filterable_attributes([PRODUCT_RETAILER])
        .with_searchable_attributes([PRODUCT_NAME])
        .with_sortable_attributes([PRODUCT_SCORE])
        .with_typo_tolerance(TypoToleranceSettings {
            enabled: Some(true),
            disable_on_attributes: None,
            disable_on_words: None,
            min_word_size_for_typos: Some(MinWordSizeForTypos {
                one_typo: Some(5),
                two_typos: Some(9),
            }),
        })
}
