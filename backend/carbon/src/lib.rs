//! # Carbon Ingestion
//!
//! Derives the ledger snapshot from order history.
//!
//! ## Overall Data Structures
//!
//! - Per-user emission series (list of **doubles**): one total per month,
//!   oldest to newest, built by bucketing each order's carbon weight into
//!   its month window. Users that stop ordering keep zero months so every
//!   series spans the same range.
//!
//! - Sustainable purchase counts (**int** per user): incremented once per
//!   order flagged sustainable, feeds the user sustainability score.
//!
//! - Product catalog (name (**string**) to id/retailer): folded from order
//!   line items. Names are sanitized before keying so the same product
//!   spelled differently across retailers collapses onto one entry. Ids are
//!   stable across runs; only new names allocate one.
//!
//! - Sustainability type registry: seeded once from the fixed recognized
//!   set, then carried forward untouched on later runs.
//!
//! ## Monthly Run -- Orders API
//! 1. Load the current ledger, sanitize keys, seed types if first run.
//!
//! 2. Clear emission series; they are rebuilt from scratch so a rerun after
//!    a bad month self-heals.
//!
//! 3. Walk month windows oldest to newest, one orders query per window.
//!
//! 4. For each order: pad the user's series with leading zeros up to the
//!    current month index, add the order's carbon weight, bump the
//!    sustainable count if flagged.
//!
//! 5. For each line item: sanitize the product name, insert new products
//!    with the next free id, refresh the retailer on known ones.
//!
//! 6. Pad every series to the full window and write the ledger back.
use std::collections::hash_map::Entry;

use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;

pub mod models;
pub mod utils;

use eco::types::default_types;
use ledger::{
    get_ledger,
    snapshot::{Ledger, Product, SustainabilityType},
    write_ledger,
};
use models::{ENDPOINT, Response};
use utils::{build_payload, format, month_windows, sanitize, sanitize_ledger};

pub async fn load_emissions(months_back: u32) {
    let mut ledger = get_ledger();
    sanitize_ledger(&mut ledger);
    seed_types(&mut ledger);

    // Series are rebuilt from scratch each run.
    ledger.emissions.clear();

    println!("Loaded products: {}", ledger.products.len());
    println!("Loaded types: {}\n", ledger.types.len());

    let (new_products, orders) = fetch_order_range(&mut ledger, months_back).await;

    if new_products == 0 {
        println!("No new products found.");
    } else {
        println!("Total new products: {}", new_products);
        println!("Product verification: {}", ledger.products.len());
    }

    println!("Orders processed: {}", orders);
    println!("Users with history: {}\n", ledger.emissions.len());

    write_ledger(&ledger);
}

fn seed_types(ledger: &mut Ledger) {
    if !ledger.types.is_empty() {
        return;
    }

    ledger.types = default_types()
        .into_iter()
        .map(|t| SustainabilityType {
            id: t.id,
            type_name: t.type_name,
            importance_level: t.importance_level,
            is_active: t.is_active,
        })
        .collect();
}

async fn fetch_orders(
    ledger: &mut Ledger,
    client: &Client,
    month_index: usize,
    window: (NaiveDate, NaiveDate),
) -> (usize, usize) {
    let payload = build_payload(&format(window.0), &format(window.1));
    let res = client.post(ENDPOINT).json(&payload).send().await.unwrap();

    #[cfg(feature = "verbose")]
    println!("Status: {}\n", res.status());

    let json_string = res.text().await.unwrap();
    let json: Response = serde_json::from_str(&json_string).unwrap();

    let mut new_products = 0;
    let mut orders = 0;

    for order in json.data.orders {
        orders += 1;

        let series = ledger.emissions.entry(order.user_id.clone()).or_default();

        // Leading zeros for months before the user's first order.
        while series.monthly_totals.len() <= month_index {
            series.monthly_totals.push(0.0);
        }
        series.monthly_totals[month_index] += order.carbon_kg;

        if order.sustainable {
            series.sustainable_purchases += 1;
        }

        for item in order.items {
            let sanitized_name = sanitize(&item.product.name);

            if sanitized_name.is_empty() {
                continue;
            }

            match ledger.products.entry(sanitized_name) {
                Entry::Vacant(entry) => {
                    #[cfg(feature = "verbose")]
                    println!("New product! {}", entry.key());

                    entry.insert(Product {
                        id: ledger.next_product_id,
                        retailer: item.product.retailer,
                    });

                    ledger.next_product_id += 1;
                    new_products += 1;
                }
                Entry::Occupied(mut entry) => {
                    entry.get_mut().retailer = item.product.retailer;
                }
            }
        }
    }

    (new_products, orders)
}

async fn fetch_order_range(ledger: &mut Ledger, months_back: u32) -> (usize, usize) {
    let client = Client::new();
    let windows = month_windows(months_back);

    let pb = ProgressBar::new(windows.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap()
        .progress_chars("=> "),
    );

    let mut new_products = 0;
    let mut orders = 0;

    for (month_index, window) in windows.into_iter().enumerate() {
        pb.set_message(format!("Fetching {}", window.0));

        let (fetched_products, fetched_orders) =
            fetch_orders(ledger, &client, month_index, window).await;

        new_products += fetched_products;
        orders += fetched_orders;

        pb.inc(1);
    }

    // Trailing zeros so every series spans the full window.
    for series in ledger.emissions.values_mut() {
        while (series.monthly_totals.len() as u32) < months_back {
            series.monthly_totals.push(0.0);
        }
    }

    pb.finish_with_message("Done");
    (new_products, orders)
}
