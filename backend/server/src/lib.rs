//! Documentation of the GreenCart sustainability backend.
//!
//!
//!
//! # General Infrastructure
//! - User traffic lands on the public endpoint and is reverse proxied into
//!   the backend container
//! - Backend, Redis and Meilisearch run as containers on the same machine
//!   and talk to each other using internal names
//! - The ledger snapshot is produced out of band by the carbon job and
//!   published for the server to fetch at startup
//!
//!
//!
//! # Notes
//!
//! ## Redis + Meilisearch
//! In theory, Meilisearch alone could hold products, ratings and forecasts.
//! But it is fundamentally a search engine, not a database: per-request
//! rating writes and forecast lookups want atomic operations and O(1)
//! access, which is exactly Redis territory.
//!
//! So the split is: Redis owns the mutable request state (rating hashes,
//! forecast records, the id counter), Meilisearch owns the read-side product
//! index, and the two are synced by re-upserting a product's document
//! whenever its aggregate score changes. Eventual consistency on the search
//! side is acceptable; a score that is seconds stale in search results is
//! not a correctness problem.
//!
//! ## Scores
//! All scoring and forecasting arithmetic lives in the `eco` crate and is
//! pure; this crate only fetches inputs and persists outputs around it.
//!
//!
//!
//! # Setup
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
//!
//! Run the server (expects Redis, Meilisearch and a published ledger).
//! ```sh
//! cargo run -p greencart
//! ```
//!
//! Rebuild the ledger snapshot from order history first.
//! ```sh
//! cargo run -p greencart --features ingest
//! ```
use std::time::Duration;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod routes;
pub mod search;
pub mod state;
pub mod utils;

use routes::{
    forecast_handler, product_score_handler, record_actual_handler, search_handler,
    submit_ratings_handler, user_score_handler,
};
use state::State;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new().await;

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route("/products/{id}/ratings", post(submit_ratings_handler))
        .route("/products/{id}/score", get(product_score_handler))
        .route("/users/{id}/score", get(user_score_handler))
        .route("/users/{id}/forecast", post(forecast_handler))
        .route("/forecasts/{id}/actual", post(record_actual_handler))
        .route("/search", get(search_handler))
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
