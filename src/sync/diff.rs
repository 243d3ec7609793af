//! Local-versus-remote row diffs.
//!
//! Rows are matched on a per-resource composite key. A local row is reported
//! when no remote row has its key, or when any column differs.

use std::collections::HashMap;

use crate::data::{csv, ResourceType, Row};
use crate::sync::normalize::{all_headers, normalize_row};

/// Resources that can be diffed, with their composite key fields.
pub const DIFF_KEYS: [(ResourceType, &[&str]); 4] = [
    (ResourceType::Config, &["key"]),
    (ResourceType::Services, &["title", "category"]),
    (ResourceType::Reviews, &["author", "text"]),
    (ResourceType::Dialogs, &["title"]),
];

/// Composite key, or `None` when any key field is blank.
fn composite_key(row: &std::collections::BTreeMap<String, String>, fields: &[&str]) -> Option<Vec<String>> {
    fields
        .iter()
        .map(|field| row.get(*field).filter(|v| !v.is_empty()).cloned())
        .collect()
}

/// CSV of local rows missing from or differing with `remote`. `None` when
/// there is nothing to report.
pub fn diff_csv(local: &[Row], remote: &[Row], key_fields: &[&str]) -> Option<String> {
    let headers = all_headers(local, remote);
    if headers.is_empty() {
        return None;
    }

    let remote_by_key: HashMap<Vec<String>, _> = remote
        .iter()
        .map(|row| normalize_row(row, &headers))
        .filter_map(|row| composite_key(&row, key_fields).map(|key| (key, row)))
        .collect();

    let mut changed: Vec<Row> = Vec::new();
    for row in local {
        let normalized = normalize_row(row, &headers);
        let Some(key) = composite_key(&normalized, key_fields) else {
            continue;
        };
        let differs = match remote_by_key.get(&key) {
            None => true,
            Some(remote_row) => headers.iter().any(|h| normalized.get(h) != remote_row.get(h)),
        };
        if differs {
            changed.push(normalized.into_iter().collect());
        }
    }

    if changed.is_empty() {
        None
    } else {
        Some(csv::rows_to_csv(&headers, &changed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_new_and_changed_rows() {
        let local = csv::parse("key,value\nTITLE,Studio\nPHONE,123\nEMAIL,a@b.c\n,orphan");
        let remote = csv::parse("key,value\nTITLE,Studio\nPHONE,999");

        let out = diff_csv(&local, &remote, &["key"]).unwrap();
        assert_eq!(out, "key,value\nPHONE,123\nEMAIL,a@b.c\n");
    }

    #[test]
    fn test_composite_keys() {
        let local = csv::parse("title,category,price\nGlow,Bridal,100\nGlow,Party,80");
        let remote = csv::parse("title,category,price\nGlow,Bridal,100\nGlow,Party,80");
        assert_eq!(diff_csv(&local, &remote, &["title", "category"]), None);
    }

    #[test]
    fn test_headers_are_union_of_both_sides() {
        let local = csv::parse("author,text\nMira,Lovely");
        let remote = csv::parse("author,text,rating\nMira,Lovely,5");
        let out = diff_csv(&local, &remote, &["author", "text"]).unwrap();
        assert_eq!(out, "author,rating,text\nMira,,Lovely\n");
    }

    #[test]
    fn test_nothing_to_compare() {
        assert_eq!(diff_csv(&[], &[], &["key"]), None);
    }
}
