//! # Ledger
//!
//! Snapshot of the reference data every other crate works from: the
//! sustainability-type registry, the product catalog, and per-user monthly
//! emission history.
//!
//! The `carbon` job rewrites the snapshot from order history; the server
//! fetches the published copy at startup and keeps it in memory. Mutable
//! state (ratings, forecasts) lives in Redis, never here.
use std::fs;

use prost::Message;

pub mod snapshot {
    include!(concat!(env!("OUT_DIR"), "/snapshot.rs"));
}

pub mod remote;

use snapshot::Ledger;

const LEDGER_PATH: &str = "../ledger.bin";

pub fn get_ledger() -> Ledger {
    // Missing file decodes as the empty ledger so first ingestion runs clean.
    let data = fs::read(LEDGER_PATH).unwrap_or_default();

    Ledger::decode(&*data).unwrap()
}

pub fn write_ledger(ledger: &Ledger) {
    fs::write(LEDGER_PATH, ledger.encode_to_vec()).unwrap();
}
