//! Value normalization for order-independent dataset comparison.

use std::collections::{BTreeMap, BTreeSet};

use crate::data::Row;

/// Trimmed, with CRLF and lone CR folded to LF.
pub fn normalize_value(value: &str) -> String {
    value.trim().replace("\r\n", "\n").replace('\r', "\n")
}

/// Same keys, every value passed through [`normalize_value`].
pub fn normalize_cells(row: &Row) -> Row {
    let mut normalized = Row::new();
    for (key, value) in row.iter() {
        normalized.insert(key, normalize_value(value));
    }
    normalized
}

/// Normalized copy of `row` with every header present.
pub fn normalize_row(row: &Row, headers: &[String]) -> BTreeMap<String, String> {
    let mut normalized: BTreeMap<String, String> = row
        .iter()
        .map(|(k, v)| (k.to_string(), normalize_value(v)))
        .collect();
    for header in headers {
        normalized.entry(header.clone()).or_default();
    }
    normalized
}

/// Sorted canonical JSON of each normalized row. Equal fingerprints mean
/// equal datasets regardless of row order.
pub fn fingerprints(rows: &[Row], headers: &[String]) -> Vec<String> {
    let mut prints: Vec<String> = rows
        .iter()
        .map(|row| serde_json::to_string(&normalize_row(row, headers)).unwrap_or_default())
        .collect();
    prints.sort();
    prints
}

/// Sorted union of the keys of both datasets.
pub fn all_headers(local: &[Row], remote: &[Row]) -> Vec<String> {
    local
        .iter()
        .chain(remote)
        .flat_map(|row| row.keys().map(str::to_string))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn same_content(local: &[Row], remote: &[Row]) -> bool {
    let headers = all_headers(local, remote);
    fingerprints(local, &headers) == fingerprints(remote, &headers)
}
