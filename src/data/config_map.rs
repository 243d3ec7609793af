//! Flat key → value site configuration.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::Row;

/// String-keyed, string-valued settings derived from the `config` rows.
///
/// Values are never interpreted; consumers decide what a value means.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfigMap(BTreeMap<String, String>);

impl ConfigMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// First column is the key; the remaining columns, joined with `,`, are the value.
    ///
    /// Trailing empty columns are dropped before joining. Rows with an empty
    /// key are skipped.
    pub fn from_rows(rows: &[Row]) -> Self {
        let mut map = BTreeMap::new();
        for row in rows {
            let mut values = row.values();
            let Some(key) = values.next().map(str::trim) else {
                continue;
            };
            if key.is_empty() {
                continue;
            }

            let mut rest: Vec<&str> = values.collect();
            while rest.last().is_some_and(|v| v.is_empty()) {
                rest.pop();
            }
            map.insert(key.to_string(), rest.join(","));
        }
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ConfigMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
