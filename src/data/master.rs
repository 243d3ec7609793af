//! Aggregate master document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::version::extract_version;
use crate::data::{ResourceType, Row};

/// Every resource collection in one versioned document, plus the assets manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterData {
    /// Folder key (e.g. `home-page/logos`) → sorted image file names.
    #[serde(default)]
    pub assets_manifest: BTreeMap<String, Vec<String>>,

    /// Resource name → rows.
    #[serde(flatten)]
    pub collections: BTreeMap<String, Vec<Row>>,
}

impl MasterData {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn rows(&self, resource: ResourceType) -> Option<&[Row]> {
        self.collections.get(resource.as_str()).map(Vec::as_slice)
    }

    pub fn insert(&mut self, resource: ResourceType, rows: Vec<Row>) {
        self.collections.insert(resource.as_str().to_string(), rows);
    }

    /// Version string carried by the `version` collection, if any.
    pub fn version(&self) -> Option<String> {
        self.rows(ResourceType::Version).and_then(extract_version)
    }

    /// Image file names under `folder`; empty when the folder is unknown.
    pub fn assets(&self, folder: &str) -> &[String] {
        self.assets_manifest
            .get(folder)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "version": [{"key": "version", "value": "2.4.1"}],
        "config": [{"key": "TITLE", "value": "Style Plan(it)"}],
        "reviews": [{"text": "Lovely", "author": "Mira"}],
        "assets_manifest": {"home-page/logos": ["a.png", "b.png"]}
    }"#;

    #[test]
    fn test_parse_master_document() {
        let master = MasterData::from_json(SAMPLE).unwrap();
        assert_eq!(master.version().as_deref(), Some("2.4.1"));
        assert_eq!(master.rows(ResourceType::Reviews).unwrap().len(), 1);
        assert!(master.rows(ResourceType::Team).is_none());
        assert_eq!(master.assets("home-page/logos"), ["a.png", "b.png"]);
        assert!(master.assets("portfolio").is_empty());
    }

    #[test]
    fn test_row_order_survives_flatten() {
        let master = MasterData::from_json(SAMPLE).unwrap();
        let review = &master.rows(ResourceType::Reviews).unwrap()[0];
        assert_eq!(review.keys().collect::<Vec<_>>(), vec!["text", "author"]);
    }

    #[test]
    fn test_serialize_round_trip() {
        let master = MasterData::from_json(SAMPLE).unwrap();
        let json = serde_json::to_string(&master).unwrap();
        assert_eq!(MasterData::from_json(&json).unwrap(), master);
    }
}
