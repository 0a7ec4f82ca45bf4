use std::collections::HashMap;

use chrono::{Datelike, Local, Months, NaiveDate};
use regex::Regex;
use serde_json::json;

use ledger::snapshot::Ledger;

use crate::models::QUERY;

pub fn sanitize_ledger(ledger: &mut Ledger) {
    sanitize_keys(&mut ledger.products);
}

pub fn build_payload(from: &str, to: &str) -> serde_json::Value {
    json!({
        "operationName": "getOrderHistory",
        "variables": { "from": from, "to": to },
        "query": QUERY
    })
}

pub fn format(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn month_start() -> NaiveDate {
    Local::now().date_naive().with_day(1).unwrap()
}

/// Consecutive [start, end) month windows, oldest first, ending with the
/// current month.
pub fn month_windows(months_back: u32) -> Vec<(NaiveDate, NaiveDate)> {
    let current = month_start();

    (0..months_back)
        .rev()
        .map(|offset| {
            let start = current - Months::new(offset);
            (start, start + Months::new(1))
        })
        .collect()
}

pub fn sanitize_keys<V>(map: &mut HashMap<String, V>) {
    let new_map: HashMap<String, V> = map.drain().map(|(k, v)| (sanitize(&k), v)).collect();

    *map = new_map;
}

pub fn sanitize(input: &str) -> String {
    let strip = Regex::new(r"[^A-Za-z0-9- ]").unwrap();
    let s = strip
        .replace_all(&input.replace('_', " "), "")
        .into_owned();

    let collapse = Regex::new(r" +").unwrap();
    collapse.replace_all(s.trim(), " ").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_basic() {
        assert_eq!(sanitize("Bamboo_Toothbrush"), "bamboo toothbrush");
        assert_eq!(sanitize("Re-Usable Bag"), "re-usable bag");
        assert_eq!(sanitize("clean-this_name!"), "clean-this name");
    }

    #[test]
    fn test_sanitize_leading_trailing_spaces() {
        assert_eq!(sanitize("   oat milk   "), "oat milk");
        assert_eq!(sanitize("  multiple   spaces  "), "multiple spaces");
    }

    #[test]
    fn test_sanitize_special_characters() {
        assert_eq!(sanitize("!@#$%^&*()"), "");
        assert_eq!(sanitize("abc123!@#"), "abc123");
    }

    #[test]
    fn test_sanitize_empty_string() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("     "), "");
    }

    #[test]
    fn test_month_windows_are_contiguous() {
        let windows = month_windows(6);

        assert_eq!(windows.len(), 6);
        for pair in windows.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
        assert_eq!(windows[5].0, month_start());
    }

    #[test]
    fn test_build_payload_shape() {
        let payload = build_payload("2026-01-01", "2026-02-01");

        assert_eq!(payload["operationName"], "getOrderHistory");
        assert_eq!(payload["variables"]["from"], "2026-01-01");
        assert_eq!(payload["variables"]["to"], "2026-02-01");
    }
}
