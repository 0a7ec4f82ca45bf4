//! # Eco
//!
//! Sustainability core for GreenCart.
//!
//! Everything in here is a pure computation over data the caller already
//! fetched: mapping free-form rating fields onto the typed category registry,
//! aggregating product and user scores, classifying emission trends and
//! projecting them forward, and scoring forecasts against observed actuals.
//!
//! No IO and no async. The server crate owns fetching inputs from Redis and
//! the ledger snapshot and persisting whatever comes out.

pub mod accuracy;
pub mod forecast;
pub mod rating;
pub mod score;
pub mod types;
